pub mod boundary;
pub mod constants;
pub mod container;
pub mod document;
pub mod error;
pub mod hex;
pub mod num;
pub mod options;
pub mod path;
pub mod scan;
pub mod value;

pub use crate::boundary::{classify, Boundary, BoundaryIndex, BoundaryKind};
pub use crate::container::{Dict, DictIter, Hex, List, ListIter};
pub use crate::document::Document;
pub use crate::error::Error;
pub use crate::hex::encode_hex;
pub use crate::options::ParseOptions;
pub use crate::path::{parse_path, Path, PathSeg};
pub use crate::value::Value;

pub type Result<T> = std::result::Result<T, Error>;

pub fn parse(input: &str) -> Result<Document<'_>> {
    Document::parse(input)
}

pub fn parse_with_options<'a>(input: &'a str, options: &ParseOptions) -> Result<Document<'a>> {
    Document::parse_with_options(input, options)
}

pub fn parse_slice(input: &[u8]) -> Result<Document<'_>> {
    Document::parse(std::str::from_utf8(input)?)
}

pub fn parse_slice_with_options<'a>(
    input: &'a [u8],
    options: &ParseOptions,
) -> Result<Document<'a>> {
    Document::parse_with_options(std::str::from_utf8(input)?, options)
}
