use thiserror::Error;

/// Failures surfaced by parsing and navigation. Absence of a name, index, or
/// path is never an error; lookups report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(
        "unbalanced boundaries: {dict_opens} dict opens vs {dict_closes} closes, \
         {seq_opens} list/hex opens vs {seq_closes} closes"
    )]
    Unbalanced {
        dict_opens: usize,
        dict_closes: usize,
        seq_opens: usize,
        seq_closes: usize,
    },

    #[error("invalid scalar token {token:?} on line {line}")]
    Scalar { token: String, line: usize },

    #[error("invalid hex digit {ch:?} on line {line}")]
    HexChar { ch: char, line: usize },

    #[error("odd number of hex digits in blob opened on line {line}")]
    HexOddLength { line: usize },

    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}
