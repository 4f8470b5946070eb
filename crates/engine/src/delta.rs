// Chunk: docs/chunks/document_engine - Document engine capability + local reference engine
//!
//! Positional deltas and their transform.
//!
//! A delta walks a document from the start as a list of pieces:
//! retain (optionally changing one mark), insert, or delete. Anything past the
//! last piece is retained untouched.
//!
//! [`transform`] rewrites a delta made concurrently with another so it can be
//! applied after it. For any two concurrent deltas `a` and `b`,
//! `apply(a); apply(transform(a, b, p))` and
//! `apply(b); apply(transform(b, a, !p))` leave the same document. `p` picks
//! which side's insert goes first at the same position, and whose mark wins
//! when both change the same mark over the same units.

use crate::mark::MarkKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece {
    Retain {
        len: usize,
        mark: Option<(MarkKind, bool)>,
    },
    Insert(Vec<u16>),
    Delete(usize),
}

impl Piece {
    fn len(&self) -> usize {
        match self {
            Piece::Retain { len, .. } => *len,
            Piece::Insert(units) => units.len(),
            Piece::Delete(len) => *len,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Retain,
    Insert,
    Delete,
}

/// An ordered piece list that merges neighbours of the same kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Delta {
    pieces: Vec<Piece>,
}

impl Delta {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub(crate) fn into_pieces(self) -> Vec<Piece> {
        self.pieces
    }

    pub(crate) fn retain(&mut self, len: usize, mark: Option<(MarkKind, bool)>) -> &mut Self {
        self.push(Piece::Retain { len, mark })
    }

    pub(crate) fn insert(&mut self, units: Vec<u16>) -> &mut Self {
        self.push(Piece::Insert(units))
    }

    pub(crate) fn delete(&mut self, len: usize) -> &mut Self {
        self.push(Piece::Delete(len))
    }

    fn push(&mut self, piece: Piece) -> &mut Self {
        if piece.len() == 0 {
            return self;
        }
        match (self.pieces.last_mut(), piece) {
            (Some(Piece::Retain { len, mark }), Piece::Retain { len: more, mark: m }) if *mark == m => {
                *len += more;
            }
            (Some(Piece::Insert(units)), Piece::Insert(more)) => units.extend(more),
            (Some(Piece::Delete(len)), Piece::Delete(more)) => *len += more,
            (_, piece) => self.pieces.push(piece),
        }
        self
    }

    /// Drops a trailing plain retain, which changes nothing.
    fn chop(mut self) -> Self {
        if let Some(Piece::Retain { mark: None, .. }) = self.pieces.last() {
            self.pieces.pop();
        }
        self
    }
}

/// Walks a piece list, handing out pieces whole or split.
struct Cursor<'a> {
    pieces: &'a [Piece],
    index: usize,
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(pieces: &'a [Piece]) -> Self {
        Self {
            pieces,
            index: 0,
            offset: 0,
        }
    }

    fn has_next(&self) -> bool {
        self.index < self.pieces.len()
    }

    /// Past the end everything is an endless plain retain.
    fn peek_kind(&self) -> Kind {
        match self.pieces.get(self.index) {
            Some(Piece::Insert(_)) => Kind::Insert,
            Some(Piece::Delete(_)) => Kind::Delete,
            Some(Piece::Retain { .. }) | None => Kind::Retain,
        }
    }

    fn peek_len(&self) -> usize {
        self.pieces
            .get(self.index)
            .map(|piece| piece.len() - self.offset)
            .unwrap_or(usize::MAX)
    }

    /// Takes up to `max` units of the current piece.
    fn next(&mut self, max: usize) -> Piece {
        let Some(piece) = self.pieces.get(self.index) else {
            return Piece::Retain { len: max, mark: None };
        };
        let take = max.min(piece.len() - self.offset);
        let out = match piece {
            Piece::Retain { mark, .. } => Piece::Retain { len: take, mark: *mark },
            Piece::Insert(units) => Piece::Insert(units[self.offset..self.offset + take].to_vec()),
            Piece::Delete(_) => Piece::Delete(take),
        };
        self.offset += take;
        if self.offset == piece.len() {
            self.index += 1;
            self.offset = 0;
        }
        out
    }
}

/// Rewrites `other` to apply after `first`, both made against the same
/// document. With `first_wins`, `first`'s inserts go before `other`'s at the
/// same position and `first`'s mark changes override `other`'s.
pub(crate) fn transform(first: &[Piece], other: &[Piece], first_wins: bool) -> Vec<Piece> {
    let mut ours = Cursor::new(first);
    let mut theirs = Cursor::new(other);
    let mut out = Delta::new();

    while ours.has_next() || theirs.has_next() {
        if ours.peek_kind() == Kind::Insert && (first_wins || theirs.peek_kind() != Kind::Insert) {
            let len = ours.next(usize::MAX).len();
            out.retain(len, None);
        } else if theirs.peek_kind() == Kind::Insert {
            out.push(theirs.next(usize::MAX));
        } else {
            let len = ours.peek_len().min(theirs.peek_len());
            let mine = ours.next(len);
            let theirs_piece = theirs.next(len);
            match (mine, theirs_piece) {
                // Already gone: their retain or delete has nothing left to act on.
                (Piece::Delete(_), _) => {}
                (_, Piece::Delete(len)) => {
                    out.delete(len);
                }
                (Piece::Retain { mark: mine, .. }, Piece::Retain { len, mark }) => {
                    let mark = match (mine, mark) {
                        (Some((a, _)), Some((b, _))) if first_wins && a == b => None,
                        (_, mark) => mark,
                    };
                    out.retain(len, mark);
                }
                (_, piece) => {
                    out.push(piece);
                }
            }
        }
    }
    out.chop().pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    /// Applies pieces to plain text (marks ignored).
    fn apply(text: &str, pieces: &[Piece]) -> String {
        let mut src = units(text).into_iter();
        let mut out = Vec::new();
        for piece in pieces {
            match piece {
                Piece::Retain { len, .. } => out.extend(src.by_ref().take(*len)),
                Piece::Insert(ins) => out.extend(ins.iter().copied()),
                Piece::Delete(len) => {
                    src.by_ref().take(*len).for_each(drop);
                }
            }
        }
        out.extend(src);
        String::from_utf16_lossy(&out)
    }

    fn edit(start: usize, delete: usize, insert: &str) -> Vec<Piece> {
        let mut delta = Delta::new();
        delta.retain(start, None).insert(units(insert)).delete(delete);
        delta.pieces().to_vec()
    }

    fn converges(base: &str, a: &[Piece], b: &[Piece]) -> String {
        let left = apply(&apply(base, a), &transform(a, b, true));
        let right = apply(&apply(base, b), &transform(b, a, false));
        assert_eq!(left, right);
        left
    }

    #[test]
    fn push_merges_neighbours() {
        let mut delta = Delta::new();
        delta.retain(2, None).retain(3, None).insert(units("a")).insert(units("b")).delete(0);
        assert_eq!(
            delta.pieces(),
            &[Piece::Retain { len: 5, mark: None }, Piece::Insert(units("ab"))]
        );
    }

    #[test]
    fn inserts_at_opposite_ends() {
        let text = converges("abc.", &edit(0, 0, "X"), &edit(4, 0, " tail"));
        assert_eq!(text, "Xabc. tail");
    }

    #[test]
    fn same_position_tie_goes_to_winner() {
        assert_eq!(converges("ab", &edit(1, 0, "X"), &edit(1, 0, "Y")), "aXYb");
    }

    #[test]
    fn overlapping_deletes() {
        assert_eq!(converges("abcdef", &edit(1, 3, ""), &edit(2, 3, "")), "af");
    }

    #[test]
    fn insert_inside_deleted_range_survives() {
        assert_eq!(converges("abcdef", &edit(1, 4, ""), &edit(3, 0, "X")), "aXf");
    }

    #[test]
    fn replace_against_replace() {
        assert_eq!(converges("Offline mode", &edit(0, 7, "Online"), &edit(8, 4, "state")), "Online state");
    }

    #[test]
    fn mark_skips_concurrent_insert() {
        let mut mark = Delta::new();
        mark.retain(1, None).retain(3, Some((MarkKind::Bold, true)));
        let moved = transform(&edit(2, 0, "XY"), mark.pieces(), false);
        assert_eq!(
            moved,
            vec![
                Piece::Retain { len: 1, mark: None },
                Piece::Retain { len: 1, mark: Some((MarkKind::Bold, true)) },
                Piece::Retain { len: 2, mark: None },
                Piece::Retain { len: 2, mark: Some((MarkKind::Bold, true)) },
            ]
        );
    }

    #[test]
    fn conflicting_marks_loser_yields() {
        let mut on = Delta::new();
        on.retain(4, Some((MarkKind::Bold, true)));
        let mut off = Delta::new();
        off.retain(2, Some((MarkKind::Bold, false)));
        // `on` wins: the off change is dropped when applied after it.
        assert_eq!(transform(on.pieces(), off.pieces(), true), Vec::<Piece>::new());
        // The winner keeps its change when applied after the loser.
        assert_eq!(transform(off.pieces(), on.pieces(), false), on.pieces().to_vec());
    }
}
