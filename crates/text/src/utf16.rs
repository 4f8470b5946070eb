// Chunk: docs/chunks/edit_diff - Flat-text delta extraction over UTF-16 units
//!
//! UTF-16 helpers.
//!
//! The document engine addresses text in UTF-16 code units while Rust strings
//! are UTF-8. Everything that crosses that boundary goes through here.

/// Non-breaking space as produced by `&nbsp;` in rendered markup.
pub const NBSP: char = '\u{00A0}';

/// Returns the length of `s` in UTF-16 code units.
pub fn len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Returns true for the first unit of a surrogate pair.
pub fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

/// Returns true for the second unit of a surrogate pair.
pub fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Returns the UTF-8 byte index of the UTF-16 offset `offset` in `s`.
///
/// Offsets past the end clamp to `s.len()`. An offset that falls between
/// the two halves of a surrogate pair rounds down to the start of that char.
pub fn byte_index(s: &str, offset: usize) -> usize {
    let mut units = 0;
    for (idx, ch) in s.char_indices() {
        let next = units + ch.len_utf16();
        if next > offset {
            return idx;
        }
        units = next;
    }
    s.len()
}

/// Returns the substring between two UTF-16 offsets.
pub fn slice(s: &str, start: usize, end: usize) -> &str {
    let start = byte_index(s, start);
    let end = byte_index(s, end).max(start);
    &s[start..end]
}

/// Replaces non-breaking spaces with ordinary spaces.
///
/// Both are a single UTF-16 unit, so offsets are unaffected.
pub fn normalize_nbsp(s: &str) -> String {
    s.replace(NBSP, " ")
}
