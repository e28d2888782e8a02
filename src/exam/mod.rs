//! Exam profiles and the level rules behind their pass mark.

use std::{collections::BTreeMap, fs, path::Path};

use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Result, StenoError},
    language::Language,
    rules::{ExamRule, RuleSet},
};

static PROFILE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/profiles");
const LEVELS_FILE: &str = "levels.json";

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Senior,
    #[default]
    Junior,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedSpeed {
    pub english: String,
    pub hindi: String,
}

impl ExpectedSpeed {
    pub fn for_language(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english,
            Language::Hindi => &self.hindi,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRule {
    /// Whole percent of words typed.
    pub allowed_mistake_percent: u32,
    pub expected_speed: ExpectedSpeed,
}

impl LevelRule {
    /// `floor(percent * words_typed)`, in integers.
    pub fn allowed_max(&self, words_typed: usize) -> usize {
        allowed_max(self.allowed_mistake_percent, words_typed)
    }
}

pub fn allowed_max(percent: u32, words_typed: usize) -> usize {
    words_typed.saturating_mul(percent as usize) / 100
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Levels {
    pub senior: LevelRule,
    pub junior: LevelRule,
}

impl Levels {
    pub fn get(&self, level: Level) -> &LevelRule {
        match level {
            Level::Senior => &self.senior,
            Level::Junior => &self.junior,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamProfile {
    pub key: String,
    pub name: String,
    pub level: Level,
    pub time_options_minutes: Vec<u32>,
    #[serde(default)]
    pub rules: Vec<ExamRule>,
}

impl ExamProfile {
    pub fn rule_set(&self) -> RuleSet {
        RuleSet::from_rules(&self.rules)
    }

    /// Time limit to use when none is asked for.
    pub fn default_minutes(&self) -> Option<u32> {
        self.time_options_minutes.first().copied()
    }
}

/// Static configuration shared by every evaluation: the profiles by key and
/// the level table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamCatalog {
    profiles: BTreeMap<String, ExamProfile>,
    levels: Levels,
}

fn canonical_key(key: &str) -> String {
    key.trim().to_uppercase()
}

impl ExamCatalog {
    pub fn new(levels: Levels, profiles: Vec<ExamProfile>) -> Result<Self> {
        let mut catalog = Self {
            profiles: BTreeMap::new(),
            levels,
        };
        for profile in profiles {
            catalog.insert(profile)?;
        }
        Ok(catalog)
    }

    /// The profiles and levels compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let levels_file = PROFILE_DIR
            .get_file(LEVELS_FILE)
            .ok_or_else(|| StenoError::Catalog(format!("{LEVELS_FILE} is missing")))?;
        let levels: Levels = serde_json::from_slice(levels_file.contents())?;

        let mut profiles = Vec::new();
        for file in PROFILE_DIR.files() {
            let path = file.path();
            let is_profile = path.extension().is_some_and(|ext| ext == "json")
                && path.file_name().is_some_and(|name| name != LEVELS_FILE);
            if is_profile {
                profiles.push(serde_json::from_slice::<ExamProfile>(file.contents())?);
            }
        }

        Self::new(levels, profiles)
    }

    fn insert(&mut self, mut profile: ExamProfile) -> Result<()> {
        let key = canonical_key(&profile.key);
        if key.is_empty() {
            return Err(StenoError::Catalog(format!(
                "profile \"{}\" has an empty key",
                profile.name
            )));
        }
        if profile.time_options_minutes.iter().any(|m| *m == 0) {
            return Err(StenoError::Catalog(format!(
                "profile {key} has a zero-minute time option"
            )));
        }
        profile.key = key.clone();
        self.profiles.insert(key, profile);
        Ok(())
    }

    /// Adds the profiles of a user catalog (a JSON array of profiles), replacing
    /// built-ins with the same key. Returns how many were read.
    pub fn merge_file(&mut self, path: &Path) -> Result<usize> {
        let contents = fs::read_to_string(path)?;
        let profiles: Vec<ExamProfile> = serde_json::from_str(&contents)?;
        let count = profiles.len();
        for profile in profiles {
            debug!(key = %profile.key, "loading user exam profile");
            self.insert(profile)?;
        }
        Ok(count)
    }

    /// Case-insensitive lookup.
    pub fn get(&self, key: &str) -> Option<&ExamProfile> {
        self.profiles.get(&canonical_key(key))
    }

    pub fn profiles(&self) -> impl Iterator<Item = &ExamProfile> {
        self.profiles.values()
    }

    pub fn levels(&self) -> &Levels {
        &self.levels
    }

    pub fn level_rule(&self, level: Level) -> &LevelRule {
        self.levels.get(level)
    }
}
