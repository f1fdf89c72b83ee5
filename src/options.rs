/// Construction options for [`crate::Document`].
///
/// Strict mode (the default) validates the global boundary balance at
/// construction and fails on a malformed document. Non-strict skips only
/// that check; navigation stays bounded by the boundary index and degrades
/// to absence on spans that never close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub strict: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}
