//! What a key does to the transcript. The transcript is append-only: there is
//! no caret to move, only text to add or take back.

use crate::practice::Practice;

fn accepts_input(practice: &Practice) -> bool {
    !practice.state.paused && practice.state.finished.is_none()
}

pub fn apply_write(practice: &mut Practice, c: char) -> bool {
    if !accepts_input(practice) {
        return false;
    }
    if !practice.state.started {
        practice.start();
    }
    practice.typed.push(c);
    practice.state.keystrokes += 1;
    true
}

/// Removes the last character when corrections are allowed. Blocked attempts
/// are still counted.
pub fn apply_backspace(practice: &mut Practice) -> bool {
    if !accepts_input(practice) {
        return false;
    }
    if !practice.config.allow_backspace {
        practice.state.blocked_backspaces += 1;
        return false;
    }
    if practice.typed.pop().is_none() {
        return false;
    }
    practice.state.backspaces += 1;
    true
}

/// Ctrl-W: drops trailing whitespace and the word before it.
pub fn apply_delete_word(practice: &mut Practice) -> bool {
    if !accepts_input(practice) {
        return false;
    }
    if !practice.config.allow_backspace {
        practice.state.blocked_backspaces += 1;
        return false;
    }
    let trimmed = practice.typed.trim_end();
    let cut = trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    if cut == practice.typed.len() {
        return false;
    }
    practice.typed.truncate(cut);
    practice.state.backspaces += 1;
    true
}
