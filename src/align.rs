//! Word-level minimum edit distance alignment.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One step of the alignment between reference and typed words.
///
/// Indices are zero-based positions in the respective word sequences. A
/// merged `Substitute` covers two reference words (`reference_index` and the
/// one after it) whose text is joined by a single space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WordOp {
    Equal {
        reference: String,
        typed: String,
        reference_index: usize,
        typed_index: usize,
    },
    Substitute {
        reference: String,
        typed: String,
        reference_index: usize,
        typed_index: usize,
        #[serde(default)]
        merged: bool,
    },
    Insert {
        typed: String,
        typed_index: usize,
    },
    Delete {
        reference: String,
        reference_index: usize,
    },
}

impl WordOp {
    pub fn is_equal(&self) -> bool {
        matches!(self, WordOp::Equal { .. })
    }

    pub fn reference_indices(&self) -> Range<usize> {
        match self {
            WordOp::Equal {
                reference_index, ..
            }
            | WordOp::Delete {
                reference_index, ..
            } => *reference_index..*reference_index + 1,
            WordOp::Substitute {
                reference_index,
                merged,
                ..
            } => {
                let span = if *merged { 2 } else { 1 };
                *reference_index..*reference_index + span
            }
            WordOp::Insert { .. } => 0..0,
        }
    }

    pub fn typed_index(&self) -> Option<usize> {
        match self {
            WordOp::Equal { typed_index, .. }
            | WordOp::Substitute { typed_index, .. }
            | WordOp::Insert { typed_index, .. } => Some(*typed_index),
            WordOp::Delete { .. } => None,
        }
    }

    pub fn reference_text(&self) -> Option<&str> {
        match self {
            WordOp::Equal { reference, .. }
            | WordOp::Substitute { reference, .. }
            | WordOp::Delete { reference, .. } => Some(reference),
            WordOp::Insert { .. } => None,
        }
    }

    pub fn typed_text(&self) -> Option<&str> {
        match self {
            WordOp::Equal { typed, .. }
            | WordOp::Substitute { typed, .. }
            | WordOp::Insert { typed, .. } => Some(typed),
            WordOp::Delete { .. } => None,
        }
    }

    /// Unit edit cost of this step.
    pub fn cost(&self) -> usize {
        usize::from(!self.is_equal())
    }
}

/// Flattened `(n + 1) x (m + 1)` Wagner-Fischer table.
pub struct EditTable {
    cols: usize,
    cells: Vec<u32>,
}

impl EditTable {
    pub fn build<R: AsRef<str>, T: AsRef<str>>(reference: &[R], typed: &[T]) -> Self {
        let rows = reference.len() + 1;
        let cols = typed.len() + 1;
        let mut cells = vec![0u32; rows * cols];

        for i in 0..rows {
            cells[i * cols] = i as u32;
        }
        for (j, cell) in cells.iter_mut().enumerate().take(cols) {
            *cell = j as u32;
        }

        for i in 1..rows {
            for j in 1..cols {
                let cost = u32::from(reference[i - 1].as_ref() != typed[j - 1].as_ref());
                let del = cells[(i - 1) * cols + j] + 1;
                let ins = cells[i * cols + j - 1] + 1;
                let diag = cells[(i - 1) * cols + j - 1] + cost;
                cells[i * cols + j] = del.min(ins).min(diag);
            }
        }

        Self { cols, cells }
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.cols + j]
    }

    /// The edit distance, `dp[n][m]`.
    pub fn distance(&self) -> u32 {
        self.cells[self.cells.len() - 1]
    }
}

/// Aligns `typed` against `reference`, returning operations in reading order.
///
/// Among equal-cost paths the backtrack prefers, at every step, a deletion,
/// then an insertion, then the diagonal.
pub fn align<R: AsRef<str>, T: AsRef<str>>(reference: &[R], typed: &[T]) -> Vec<WordOp> {
    let table = EditTable::build(reference, typed);
    let mut ops = Vec::with_capacity(reference.len().max(typed.len()));

    let (mut i, mut j) = (reference.len(), typed.len());
    while i > 0 || j > 0 {
        let here = table.get(i, j);
        if i > 0 && here == table.get(i - 1, j) + 1 {
            ops.push(WordOp::Delete {
                reference: reference[i - 1].as_ref().to_string(),
                reference_index: i - 1,
            });
            i -= 1;
        } else if j > 0 && here == table.get(i, j - 1) + 1 {
            ops.push(WordOp::Insert {
                typed: typed[j - 1].as_ref().to_string(),
                typed_index: j - 1,
            });
            j -= 1;
        } else {
            let reference_word = reference[i - 1].as_ref().to_string();
            let typed_word = typed[j - 1].as_ref().to_string();
            ops.push(if reference_word == typed_word {
                WordOp::Equal {
                    reference: reference_word,
                    typed: typed_word,
                    reference_index: i - 1,
                    typed_index: j - 1,
                }
            } else {
                WordOp::Substitute {
                    reference: reference_word,
                    typed: typed_word,
                    reference_index: i - 1,
                    typed_index: j - 1,
                    merged: false,
                }
            });
            i -= 1;
            j -= 1;
        }
    }

    ops.reverse();
    ops
}

/// Collapses `Substitute` + `Delete` pairs where the typed word is the two
/// reference words run together (a missing space) into one merged
/// `Substitute`. `normalize` decides equality of the typed word and the
/// concatenation. Already merged operations are left alone.
pub fn merge_missing_spaces<F>(ops: Vec<WordOp>, normalize: F) -> Vec<WordOp>
where
    F: Fn(&str) -> String,
{
    let mut out = Vec::with_capacity(ops.len());
    let mut iter = ops.into_iter().peekable();

    while let Some(op) = iter.next() {
        if let WordOp::Substitute {
            reference,
            typed,
            reference_index,
            typed_index,
            merged: false,
        } = &op
        {
            if let Some(WordOp::Delete {
                reference: next_reference,
                ..
            }) = iter.peek()
            {
                let normalized_typed = normalize(typed);
                let joined = format!("{reference}{next_reference}");
                if !normalized_typed.is_empty() && normalized_typed == normalize(&joined) {
                    let merged_reference = format!("{reference} {next_reference}");
                    out.push(WordOp::Substitute {
                        reference: merged_reference,
                        typed: typed.clone(),
                        reference_index: *reference_index,
                        typed_index: *typed_index,
                        merged: true,
                    });
                    iter.next();
                    continue;
                }
            }
        }
        out.push(op);
    }

    out
}
