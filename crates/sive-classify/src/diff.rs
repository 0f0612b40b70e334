//! Line-level diff measurement
//!
//! Computes an LCS-based alignment between two texts and counts lines by
//! change kind. Pure insertions are the signal the classifier cares about:
//! they approximate how much genuinely new text appeared at once, which
//! correlates with copy-paste far better than a raw size delta.

use similar::{ChangeTag, TextDiff};

/// Line counts from one alignment of old against new
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineDelta {
    /// Lines present in new but absent from the alignment
    pub inserted: usize,
    /// Lines present in old but absent from the alignment
    pub deleted: usize,
    /// Lines common to both sides
    pub unchanged: usize,
}

impl LineDelta {
    /// Whether the transition changed anything at all
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.deleted == 0
    }
}

/// Measure the line delta between two texts
///
/// Lines are compared without terminators, so a missing trailing newline on
/// one side does not show up as a phantom edit. An in-place rewrite of a
/// line counts as one deletion plus one insertion.
#[must_use]
pub fn line_delta(old: &str, new: &str) -> LineDelta {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let diff = TextDiff::from_slices(&old_lines, &new_lines);

    let mut delta = LineDelta::default();
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => delta.inserted += 1,
            ChangeTag::Delete => delta.deleted += 1,
            ChangeTag::Equal => delta.unchanged += 1,
        }
    }
    delta
}
