// Chunk: docs/chunks/edit_diff - Flat-text delta extraction over UTF-16 units
//!
//! Single-span diff between two snapshots of a surface's flattened text.
//!
//! The surface reports edits only as "the text is now different", so the
//! delta is reconstructed by trimming the longest common prefix and then the
//! longest common suffix that does not overlap the prefix. Whatever is left
//! in the middle is one contiguous replace. Compound changes (e.g. an
//! autocorrect touching two words) collapse into a single span.
//!
//! Classification is purely geometric: changing one character in the middle
//! of a long text is reported as "delete 1, insert 1", never as two ops.

use crate::types::EditDelta;
use crate::utf16;

/// Computes the edit that turns `prev` into `next`.
///
/// Returns `None` when the texts are equal.
///
/// # Example
///
/// ```
/// use twin_edit_text::{diff_text, EditDelta};
///
/// assert_eq!(diff_text("abc", "abc"), None);
/// assert_eq!(diff_text("abc", "aXbc"), Some(EditDelta::new(1, 0, "X")));
/// assert_eq!(diff_text("abc", "ac"), Some(EditDelta::new(1, 1, "")));
/// ```
pub fn diff_text(prev: &str, next: &str) -> Option<EditDelta> {
    if prev == next {
        return None;
    }

    let prev_units: Vec<u16> = prev.encode_utf16().collect();
    let next_units: Vec<u16> = next.encode_utf16().collect();
    let span = changed_span(&prev_units, &next_units);

    Some(EditDelta {
        start: span.start,
        delete_count: span.prev_end - span.start,
        insert_text: String::from_utf16_lossy(&next_units[span.start..span.next_end]),
    })
}

/// Bounds of the region that differs, as exclusive ends in each text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChangedSpan {
    start: usize,
    prev_end: usize,
    next_end: usize,
}

fn changed_span(prev: &[u16], next: &[u16]) -> ChangedSpan {
    let mut start = 0;
    while start < prev.len() && start < next.len() && prev[start] == next[start] {
        start += 1;
    }
    // Never end the prefix between the halves of a surrogate pair.
    if start > 0 && utf16::is_high_surrogate(prev[start - 1]) {
        start -= 1;
    }

    let mut prev_end = prev.len();
    let mut next_end = next.len();
    while prev_end > start && next_end > start && prev[prev_end - 1] == next[next_end - 1] {
        prev_end -= 1;
        next_end -= 1;
    }
    // Same for the suffix: a shared low surrogate belongs with its pair.
    if prev_end < prev.len() && utf16::is_low_surrogate(prev[prev_end]) {
        prev_end += 1;
        next_end += 1;
    }

    ChangedSpan {
        start,
        prev_end,
        next_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_texts_have_no_delta() {
        assert_eq!(diff_text("", ""), None);
        assert_eq!(diff_text("same", "same"), None);
    }

    #[test]
    fn insertion_at_start() {
        assert_eq!(
            diff_text("Offline mode", "XOffline mode"),
            Some(EditDelta::new(0, 0, "X"))
        );
    }

    #[test]
    fn insertion_at_end() {
        assert_eq!(diff_text("abc", "abcd"), Some(EditDelta::new(3, 0, "d")));
    }

    #[test]
    fn deletion_at_end() {
        assert_eq!(diff_text("abcd", "abc"), Some(EditDelta::new(3, 1, "")));
    }

    #[test]
    fn full_replacement() {
        assert_eq!(diff_text("abc", "xyz"), Some(EditDelta::new(0, 3, "xyz")));
    }

    #[test]
    fn middle_character_change_is_a_replace() {
        assert_eq!(
            diff_text("the cat sat", "the bat sat"),
            Some(EditDelta::new(4, 1, "b"))
        );
    }

    #[test]
    fn repeated_characters_prefer_prefix() {
        // "aa" -> "aaa": prefix eats both, the suffix is bounded by it.
        assert_eq!(diff_text("aa", "aaa"), Some(EditDelta::new(2, 0, "a")));
        assert_eq!(diff_text("aaa", "aa"), Some(EditDelta::new(2, 1, "")));
    }

    #[test]
    fn from_empty_and_to_empty() {
        assert_eq!(diff_text("", "hi"), Some(EditDelta::new(0, 0, "hi")));
        assert_eq!(diff_text("hi", ""), Some(EditDelta::new(0, 2, "")));
    }

    #[test]
    fn compound_change_collapses_into_one_span() {
        assert_eq!(
            diff_text("one two three", "One two threE"),
            Some(EditDelta::new(0, 13, "One two threE"))
        );
    }

    #[test]
    fn offsets_are_utf16_units() {
        assert_eq!(
            diff_text("\u{1F600}ab", "\u{1F600}aXb"),
            Some(EditDelta::new(3, 0, "X"))
        );
    }

    #[test]
    fn surrogate_pair_is_never_split() {
        // Both emoji share their high surrogate.
        assert_eq!(
            diff_text("\u{1F600}", "\u{1F601}"),
            Some(EditDelta::new(0, 2, "\u{1F601}"))
        );
        // U+1F600 and U+1F200 share their low surrogate.
        assert_eq!(
            diff_text("a\u{1F600}", "a\u{1F200}"),
            Some(EditDelta::new(1, 2, "\u{1F200}"))
        );
    }
}
