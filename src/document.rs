use std::cell::RefCell;
use std::collections::HashMap;

use crate::boundary::{BoundaryIndex, BoundaryKind};
use crate::container::{Dict, Hex, List};
use crate::options::ParseOptions;
use crate::path::PathSeg;
use crate::scan::{scan_lines, Span};
use crate::value::{decode_scalar, Value};
use crate::Result;

/// A parsed document: the borrowed source text, its line table, the
/// boundary index, and the two memo caches. Nothing beyond the index is
/// computed up front; queries re-scan only the spans their path touches.
///
/// The caches are interior-mutable and unguarded, which makes `Document`
/// `!Sync`; a document belongs to one thread. Both are write-once per key
/// and never invalidated, since the text cannot change after construction.
#[derive(Debug)]
pub struct Document<'a> {
    input: &'a str,
    lines: Vec<Span>,
    index: BoundaryIndex,
    ends: RefCell<HashMap<usize, usize>>,
    progress: RefCell<HashMap<usize, Vec<(usize, usize)>>>,
}

impl<'a> Document<'a> {
    pub fn parse(input: &'a str) -> Result<Self> {
        Self::parse_with_options(input, &ParseOptions::default())
    }

    pub fn parse_with_options(input: &'a str, options: &ParseOptions) -> Result<Self> {
        let lines = scan_lines(input);
        let index = BoundaryIndex::build(
            lines.iter().map(|span| &input[span.start..span.end]),
        );
        if options.strict {
            index.validate_balance()?;
        }
        Ok(Self {
            input,
            lines,
            index,
            ends: RefCell::new(HashMap::new()),
            progress: RefCell::new(HashMap::new()),
        })
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The root container, at the document's first boundary line. `None`
    /// when the document has no structural lines at all.
    pub fn root(&self) -> Option<Value<'_>> {
        self.container_at(self.index.first_line()?)
    }

    /// Walks the path from the root. Key segments descend into dicts,
    /// index segments into lists; any mismatch or missing entry resolves
    /// the whole query to `Ok(None)`. Decode failures on the requested
    /// leaf (and only that leaf) surface as errors.
    pub fn search(&self, path: &[PathSeg]) -> Result<Option<Value<'_>>> {
        let Some(mut current) = self.root() else {
            return Ok(None);
        };
        for segment in path {
            let next = match (segment, current) {
                (PathSeg::Key(name), Value::Dict(dict)) => dict.get(name)?,
                (PathSeg::Index(index), Value::List(list)) => list.get(*index)?,
                _ => return Ok(None),
            };
            match next {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// The line closing the container opened at `start`, or `None` when
    /// `start` is not an open boundary or the span never closes. First
    /// computation per `start` walks the boundary index; the result is
    /// memoized for the document's lifetime.
    pub fn match_end(&self, start: usize) -> Option<usize> {
        if let Some(&end) = self.ends.borrow().get(&start) {
            return Some(end);
        }
        let end = self.index.walk_end(start)?;
        self.ends.borrow_mut().insert(start, end);
        Some(end)
    }

    pub(crate) fn line(&self, number: usize) -> &str {
        let span = self.lines[number];
        &self.input[span.start..span.end]
    }

    pub(crate) fn boundary_kind(&self, line: usize) -> Option<BoundaryKind> {
        self.index.kind_at(line)
    }

    /// A fresh container view for an open boundary line. Views carry only
    /// their start and derived end; they are constructed anew on every
    /// descent.
    pub(crate) fn container_at(&self, line: usize) -> Option<Value<'_>> {
        let kind = self.index.kind_at(line)?;
        let end = self.match_end(line)?;
        match kind {
            BoundaryKind::DictOpen => Some(Value::Dict(Dict::new(self, line, end))),
            BoundaryKind::ListOpen => Some(Value::List(List::new(self, line, end))),
            BoundaryKind::HexOpen => Some(Value::Hex(Hex::new(self, line, end))),
            BoundaryKind::DictClose | BoundaryKind::BracketClose => None,
        }
    }

    /// Decodes the value beginning on `line`: a container when the line is
    /// an open boundary, a scalar otherwise.
    pub(crate) fn value_at(&self, line: usize) -> Result<Option<Value<'_>>> {
        match self.index.kind_at(line) {
            Some(kind) if kind.is_open() => Ok(self.container_at(line)),
            Some(_) => Ok(None),
            None => decode_scalar(self.line(line), line).map(Some),
        }
    }

    pub(crate) fn progress_hit(&self, start: usize, index: usize) -> Option<(usize, usize)> {
        self.progress
            .borrow()
            .get(&start)
            .and_then(|entries| entries.get(index))
            .copied()
    }

    /// Resumption point for a list scan: the element count recorded so far
    /// and the last recorded element's span.
    pub(crate) fn progress_resume(&self, start: usize) -> Option<(usize, usize)> {
        let progress = self.progress.borrow();
        let entries = progress.get(&start)?;
        let &(_, span_end) = entries.last()?;
        Some((entries.len(), span_end))
    }

    pub(crate) fn progress_push(&self, start: usize, index: usize, entry: (usize, usize)) {
        let mut progress = self.progress.borrow_mut();
        let entries = progress.entry(start).or_default();
        // append-only: an element is recorded exactly once
        if entries.len() == index {
            entries.push(entry);
        }
    }
}
