use crate::constants::{
    BRACKET_CLOSE, COMMENT_MARKER, DICT_CLOSE, DICT_OPEN, HEX_OPEN, LIST_OPEN,
};
use crate::scan::strip_commas;
use crate::{Error, Result};

/// The five structural tokens a line can reduce to. Lists and hex blobs
/// open with distinct tokens but share `BracketClose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    DictOpen,
    DictClose,
    ListOpen,
    HexOpen,
    BracketClose,
}

impl BoundaryKind {
    pub fn is_open(self) -> bool {
        self.close().is_some()
    }

    /// The closing kind matching this open kind; `None` for close kinds.
    pub fn close(self) -> Option<BoundaryKind> {
        match self {
            BoundaryKind::DictOpen => Some(BoundaryKind::DictClose),
            BoundaryKind::ListOpen | BoundaryKind::HexOpen => Some(BoundaryKind::BracketClose),
            BoundaryKind::DictClose | BoundaryKind::BracketClose => None,
        }
    }
}

/// Classifies one line of content. Comment lines are the caller's concern;
/// this only matches the trimmed, comma-stripped text against the tokens.
pub fn classify(content: &str) -> Option<BoundaryKind> {
    let stripped = strip_commas(content);
    match stripped.trim() {
        s if s == DICT_OPEN => Some(BoundaryKind::DictOpen),
        s if s == DICT_CLOSE => Some(BoundaryKind::DictClose),
        s if s == HEX_OPEN => Some(BoundaryKind::HexOpen),
        s if s == LIST_OPEN => Some(BoundaryKind::ListOpen),
        s if s == BRACKET_CLOSE => Some(BoundaryKind::BracketClose),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub line: usize,
    pub kind: BoundaryKind,
}

/// Every structural line of the document, in ascending line order. Built
/// once at construction; all navigation walks this index instead of the
/// text.
#[derive(Debug, Default)]
pub struct BoundaryIndex {
    entries: Vec<Boundary>,
}

impl BoundaryIndex {
    /// One forward pass over the line contents. Lines containing the
    /// comment marker are skipped before classification.
    pub fn build<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries = Vec::new();
        for (line, content) in lines.into_iter().enumerate() {
            if content.contains(COMMENT_MARKER) {
                continue;
            }
            if let Some(kind) = classify(content) {
                entries.push(Boundary { line, kind });
            }
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first_line(&self) -> Option<usize> {
        self.entries.first().map(|boundary| boundary.line)
    }

    pub fn kind_at(&self, line: usize) -> Option<BoundaryKind> {
        self.entries
            .binary_search_by_key(&line, |boundary| boundary.line)
            .ok()
            .map(|idx| self.entries[idx].kind)
    }

    /// Entries strictly after `line`, in ascending order.
    pub fn after(&self, line: usize) -> &[Boundary] {
        let idx = self.entries.partition_point(|boundary| boundary.line <= line);
        &self.entries[idx..]
    }

    /// The two global balance invariants. Checked once, at construction,
    /// when strict mode is on; nothing else validates structure.
    pub fn validate_balance(&self) -> Result<()> {
        let mut dict_opens = 0usize;
        let mut dict_closes = 0usize;
        let mut seq_opens = 0usize;
        let mut seq_closes = 0usize;
        for boundary in &self.entries {
            match boundary.kind {
                BoundaryKind::DictOpen => dict_opens += 1,
                BoundaryKind::DictClose => dict_closes += 1,
                BoundaryKind::ListOpen | BoundaryKind::HexOpen => seq_opens += 1,
                BoundaryKind::BracketClose => seq_closes += 1,
            }
        }
        if dict_opens != dict_closes || seq_opens != seq_closes {
            return Err(Error::Unbalanced {
                dict_opens,
                dict_closes,
                seq_opens,
                seq_closes,
            });
        }
        Ok(())
    }

    /// Depth-counting walk from an open boundary to its matching close.
    ///
    /// Dict and list/hex nesting use disjoint token pairs, so entries of
    /// the other family pass through without touching the counters; they
    /// are balanced internally. The one coupling is a hex blob nested in
    /// a list: it closes with the list's own closing token, so its open
    /// must count against the list's depth.
    pub fn walk_end(&self, start: usize) -> Option<usize> {
        let open_kind = self.kind_at(start)?;
        let close_kind = open_kind.close()?;
        let mut depth_open = 1usize;
        let mut depth_close = 0usize;
        for boundary in self.after(start) {
            if boundary.kind == open_kind
                || (open_kind == BoundaryKind::ListOpen && boundary.kind == BoundaryKind::HexOpen)
            {
                depth_open += 1;
            } else if boundary.kind == close_kind {
                depth_close += 1;
                if depth_open == depth_close {
                    return Some(boundary.line);
                }
            }
        }
        None
    }
}
