// Chunk: docs/chunks/edit_diff - Flat-text delta extraction over UTF-16 units

use crate::utf16;

/// A selection expressed as offsets into a replica's flattened text.
///
/// Offsets count UTF-16 code units, the same unit the document engine
/// addresses. `start <= end` always holds for values built with [`Offsets::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Offsets {
    pub start: usize,
    pub end: usize,
}

impl Offsets {
    /// Creates offsets from two endpoints in either order.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A caret at `offset`.
    pub fn collapsed(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns true if start and end coincide (a caret, not a range).
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Number of code units covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Clamps both bounds into `[0, text_len]`.
    ///
    /// Returns `None` when the clamped range is empty, so a collapsed or
    /// fully out-of-range selection never reaches the engine.
    pub fn clamp_to(&self, text_len: usize) -> Option<Offsets> {
        let start = self.start.min(text_len);
        let end = self.end.min(text_len);
        if end <= start {
            return None;
        }
        Some(Offsets { start, end })
    }
}

/// A single contiguous replace inferred from comparing two texts.
///
/// `start + delete_count` never exceeds the UTF-16 length of the text the
/// delta was computed against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditDelta {
    pub start: usize,
    pub delete_count: usize,
    pub insert_text: String,
}

impl EditDelta {
    pub fn new(start: usize, delete_count: usize, insert_text: impl Into<String>) -> Self {
        Self {
            start,
            delete_count,
            insert_text: insert_text.into(),
        }
    }

    /// True when nothing is removed.
    pub fn is_insertion(&self) -> bool {
        self.delete_count == 0 && !self.insert_text.is_empty()
    }

    /// True when nothing is inserted.
    pub fn is_deletion(&self) -> bool {
        self.delete_count > 0 && self.insert_text.is_empty()
    }

    /// Length of the inserted text in UTF-16 code units.
    pub fn insert_len(&self) -> usize {
        utf16::len(&self.insert_text)
    }

    /// Applies this delta to `prev`, returning the edited text.
    ///
    /// Bounds past the end of `prev` are clamped.
    pub fn apply_to(&self, prev: &str) -> String {
        let units: Vec<u16> = prev.encode_utf16().collect();
        let start = self.start.min(units.len());
        let end = (self.start + self.delete_count).min(units.len());

        let mut out: Vec<u16> = Vec::with_capacity(units.len() + self.insert_len());
        out.extend_from_slice(&units[..start]);
        out.extend(self.insert_text.encode_utf16());
        out.extend_from_slice(&units[end..]);
        String::from_utf16_lossy(&out)
    }
}
