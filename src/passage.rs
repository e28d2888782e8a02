use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::{
    error::{Result, StenoError},
    language::Language,
};

static PASSAGE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/passages");

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Passage {
    pub title: String,
    pub text: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct PassageLibrary {
    pub language: Language,
    pub passages: Vec<Passage>,
}

impl PassageLibrary {
    /// The passages bundled for `language`.
    pub fn builtin(language: Language) -> Result<Self> {
        let file_name = format!("{language}.json");
        let file = PASSAGE_DIR
            .get_file(&file_name)
            .ok_or_else(|| StenoError::Catalog(format!("no passages for {language}")))?;
        let library: PassageLibrary = serde_json::from_slice(file.contents())?;
        if library.passages.is_empty() {
            return Err(StenoError::Catalog(format!("{file_name} has no passages")));
        }
        Ok(library)
    }

    pub fn random(&self) -> Option<&Passage> {
        self.passages.choose(&mut rand::thread_rng())
    }

    /// Case-insensitive title match.
    pub fn by_title(&self, title: &str) -> Option<&Passage> {
        self.passages
            .iter()
            .find(|p| p.title.eq_ignore_ascii_case(title))
    }
}
