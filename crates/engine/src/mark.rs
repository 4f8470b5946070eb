// Chunk: docs/chunks/document_engine - Document engine capability + local reference engine

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

/// The formatting marks the toolbar knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkKind {
    Bold,
    Italic,
    Underline,
    Code,
}

impl MarkKind {
    /// Every recognized mark, in rendering (outermost first) order.
    pub const ALL: [MarkKind; 4] = [
        MarkKind::Bold,
        MarkKind::Italic,
        MarkKind::Underline,
        MarkKind::Code,
    ];

    /// The mark name the engine is addressed with.
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkKind::Bold => "bold",
            MarkKind::Italic => "italic",
            MarkKind::Underline => "underline",
            MarkKind::Code => "code",
        }
    }

    /// The element a rendered run carrying this mark is wrapped in.
    pub fn tag(&self) -> &'static str {
        match self {
            MarkKind::Bold => "strong",
            MarkKind::Italic => "em",
            MarkKind::Underline => "u",
            MarkKind::Code => "code",
        }
    }

    pub(crate) fn bit(&self) -> u8 {
        match self {
            MarkKind::Bold => 1,
            MarkKind::Italic => 1 << 1,
            MarkKind::Underline => 1 << 2,
            MarkKind::Code => 1 << 3,
        }
    }
}

impl fmt::Display for MarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarkKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EngineError::UnknownMark(s.to_string()))
    }
}

/// The set of marks on one code unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct MarkSet(u8);

impl MarkSet {
    pub(crate) fn insert(&mut self, kind: MarkKind) {
        self.0 |= kind.bit();
    }

    pub(crate) fn remove(&mut self, kind: MarkKind) {
        self.0 &= !kind.bit();
    }

    pub(crate) fn contains(&self, kind: MarkKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub(crate) fn kinds(&self) -> impl Iterator<Item = MarkKind> + '_ {
        MarkKind::ALL.into_iter().filter(move |kind| self.contains(*kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_names() {
        for kind in MarkKind::ALL {
            assert_eq!(kind.as_str().parse::<MarkKind>(), Ok(kind));
        }
    }

    #[test]
    fn parse_unknown_name() {
        assert_eq!(
            "strike".parse::<MarkKind>(),
            Err(EngineError::UnknownMark("strike".to_string()))
        );
    }

    #[test]
    fn mark_set_insert_remove() {
        let mut set = MarkSet::default();
        set.insert(MarkKind::Bold);
        set.insert(MarkKind::Code);
        assert_eq!(set.kinds().collect::<Vec<_>>(), vec![MarkKind::Bold, MarkKind::Code]);
        set.remove(MarkKind::Bold);
        assert!(!set.contains(MarkKind::Bold));
        assert!(set.contains(MarkKind::Code));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&MarkKind::Underline).unwrap(), "\"underline\"");
    }
}
