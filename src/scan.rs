use std::borrow::Cow;

use memchr::{memchr, memchr_iter};

/// Byte range of one line's content within the source text, with the
/// leading indentation (spaces and tabs) and any trailing `\r` excluded.
/// Trailing content is kept verbatim so the `name = ` empty-value form
/// survives the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Splits the input into content spans, one per line, in a single pass.
pub fn scan_lines(input: &str) -> Vec<Span> {
    let bytes = input.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    for idx in memchr_iter(b'\n', bytes) {
        lines.push(content_span(bytes, start, idx));
        start = idx + 1;
    }
    lines.push(content_span(bytes, start, bytes.len()));
    lines
}

fn content_span(bytes: &[u8], start: usize, mut end: usize) -> Span {
    if end > start && bytes[end - 1] == b'\r' {
        end -= 1;
    }
    let mut content = start;
    while content < end && (bytes[content] == b' ' || bytes[content] == b'\t') {
        content += 1;
    }
    Span {
        start: content,
        end,
    }
}

/// Removes every comma from the content, borrowing when there are none.
pub fn strip_commas(content: &str) -> Cow<'_, str> {
    if memchr(b',', content.as_bytes()).is_none() {
        Cow::Borrowed(content)
    } else {
        Cow::Owned(content.replace(',', ""))
    }
}
