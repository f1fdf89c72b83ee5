use std::fmt;
use std::iter::FusedIterator;

use crate::constants::ENTRY_SEPARATOR;
use crate::document::Document;
use crate::hex::decode_nibble;
use crate::scan::strip_commas;
use crate::value::{decode_scalar, Value};
use crate::{Error, Result};

/// Splits a dict entry line into name and value. The separator must occur
/// exactly once; a line ending in ` =` (trailing space lost in transit) is
/// the empty-value form.
fn split_entry(content: &str) -> Option<(&str, &str)> {
    let mut matches = content.match_indices(ENTRY_SEPARATOR);
    match (matches.next(), matches.next()) {
        (Some((pos, _)), None) => {
            Some((&content[..pos], &content[pos + ENTRY_SEPARATOR.len()..]))
        }
        (None, None) => content.strip_suffix(" =").map(|name| (name, "")),
        _ => None,
    }
}

/// A dict span. `name = value` lines are entries; an empty value means the
/// entry's container opens on the following line.
#[derive(Clone, Copy)]
pub struct Dict<'d> {
    doc: &'d Document<'d>,
    start: usize,
    end: usize,
}

impl<'d> Dict<'d> {
    pub(crate) fn new(doc: &'d Document<'d>, start: usize, end: usize) -> Self {
        Self { doc, start, end }
    }

    pub fn start_line(&self) -> usize {
        self.start
    }

    pub fn end_line(&self) -> usize {
        self.end
    }

    /// Linear scan from the line after the open boundary, deliberately
    /// uncached: every call re-walks the span. Sub-containers are skipped
    /// wholesale; their entries are invisible at this level. Only the
    /// matched entry's value is ever decoded.
    pub fn get(&self, name: &str) -> Result<Option<Value<'d>>> {
        let mut line = self.start + 1;
        while line < self.end {
            let content = self.doc.line(line);
            if content.is_empty() {
                line += 1;
                continue;
            }
            if self.doc.boundary_kind(line).is_some_and(|kind| kind.is_open()) {
                match self.doc.match_end(line) {
                    Some(end) => {
                        line = end + 1;
                        continue;
                    }
                    None => return Ok(None),
                }
            }
            let Some((entry_name, entry_value)) = split_entry(content) else {
                line += 1;
                continue;
            };
            if entry_name.trim() != name {
                line += 1;
                continue;
            }
            if strip_commas(entry_value).trim().is_empty() {
                return Ok(self.doc.container_at(line + 1));
            }
            return decode_scalar(entry_value, line).map(Some);
        }
        Ok(None)
    }

    /// Entries in document order, decoded lazily one at a time. Stops
    /// after the first decode error.
    pub fn iter(&self) -> DictIter<'d> {
        DictIter {
            dict: *self,
            line: self.start + 1,
            failed: false,
        }
    }
}

impl fmt::Debug for Dict<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dict(lines {}..={})", self.start, self.end)
    }
}

pub struct DictIter<'d> {
    dict: Dict<'d>,
    line: usize,
    failed: bool,
}

impl<'d> Iterator for DictIter<'d> {
    type Item = Result<(&'d str, Value<'d>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while self.line < self.dict.end {
            let line = self.line;
            let doc = self.dict.doc;
            let content = doc.line(line);
            if content.is_empty() {
                self.line += 1;
                continue;
            }
            if doc.boundary_kind(line).is_some_and(|kind| kind.is_open()) {
                // a container already emitted with its entry line
                match doc.match_end(line) {
                    Some(end) => {
                        self.line = end + 1;
                        continue;
                    }
                    None => {
                        self.failed = true;
                        return None;
                    }
                }
            }
            self.line += 1;
            let Some((name, value)) = split_entry(content) else {
                continue;
            };
            let name = name.trim();
            if strip_commas(value).trim().is_empty() {
                match doc.container_at(line + 1) {
                    Some(container) => return Some(Ok((name, container))),
                    // dangling entry: no container follows, resolves to absence
                    None => continue,
                }
            }
            return match decode_scalar(value, line) {
                Ok(scalar) => Some(Ok((name, scalar))),
                Err(err) => {
                    self.failed = true;
                    Some(Err(err))
                }
            };
        }
        None
    }
}

impl FusedIterator for DictIter<'_> {}

/// A list span. Elements are positional: every non-blank line is one
/// element, a container-opening line counting as a single element spanning
/// through its matched close.
#[derive(Clone, Copy)]
pub struct List<'d> {
    doc: &'d Document<'d>,
    start: usize,
    end: usize,
}

impl<'d> List<'d> {
    pub(crate) fn new(doc: &'d Document<'d>, start: usize, end: usize) -> Self {
        Self { doc, start, end }
    }

    pub fn start_line(&self) -> usize {
        self.start
    }

    pub fn end_line(&self) -> usize {
        self.end
    }

    /// Positional lookup backed by the document's progress cache: an exact
    /// hit re-decodes from the recorded line, otherwise the scan resumes
    /// after the highest element recorded so far. Values are never cached
    /// decoded; containers are constructed fresh on every lookup.
    pub fn get(&self, index: usize) -> Result<Option<Value<'d>>> {
        if let Some((line, _)) = self.doc.progress_hit(self.start, index) {
            return self.doc.value_at(line);
        }
        let (mut counter, mut line) = match self.doc.progress_resume(self.start) {
            Some((recorded, span_end)) => (recorded, span_end + 1),
            None => (0, self.start + 1),
        };
        while line < self.end {
            let content = self.doc.line(line);
            if content.is_empty() {
                line += 1;
                continue;
            }
            let span_end = if self.doc.boundary_kind(line).is_some_and(|kind| kind.is_open()) {
                match self.doc.match_end(line) {
                    Some(end) => end,
                    None => return Ok(None),
                }
            } else {
                line
            };
            self.doc.progress_push(self.start, counter, (line, span_end));
            if counter == index {
                return self.doc.value_at(line);
            }
            counter += 1;
            line = span_end + 1;
        }
        Ok(None)
    }

    /// Sequential elements, amortized O(1) per step through the progress
    /// cache. Ends at the first absent index; stops after the first error.
    pub fn iter(&self) -> ListIter<'d> {
        ListIter {
            list: *self,
            index: 0,
            failed: false,
        }
    }
}

impl fmt::Debug for List<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "List(lines {}..={})", self.start, self.end)
    }
}

pub struct ListIter<'d> {
    list: List<'d>,
    index: usize,
    failed: bool,
}

impl<'d> Iterator for ListIter<'d> {
    type Item = Result<Value<'d>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.list.get(self.index) {
            Ok(Some(value)) => {
                self.index += 1;
                Some(Ok(value))
            }
            Ok(None) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for ListIter<'_> {}

/// A hex blob span: hexadecimal text between the `#[` line and its
/// matching close, decoded to bytes on demand.
#[derive(Clone, Copy)]
pub struct Hex<'d> {
    doc: &'d Document<'d>,
    start: usize,
    end: usize,
}

impl<'d> Hex<'d> {
    pub(crate) fn new(doc: &'d Document<'d>, start: usize, end: usize) -> Self {
        Self { doc, start, end }
    }

    pub fn start_line(&self) -> usize {
        self.start
    }

    pub fn end_line(&self) -> usize {
        self.end
    }

    /// Decodes the body as hex digit pairs. Whitespace separates freely,
    /// including across lines; any other non-digit character fails with
    /// its line, an odd total digit count fails naming the blob's opening
    /// line.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut pending: Option<u8> = None;
        for line in self.start + 1..self.end {
            for ch in self.doc.line(line).chars() {
                if ch.is_ascii_whitespace() {
                    continue;
                }
                let Some(nibble) = decode_nibble(ch) else {
                    return Err(Error::HexChar { ch, line });
                };
                match pending.take() {
                    Some(high) => out.push(high << 4 | nibble),
                    None => pending = Some(nibble),
                }
            }
        }
        if pending.is_some() {
            return Err(Error::HexOddLength { line: self.start });
        }
        Ok(out)
    }

    /// The body text, lines trimmed and joined with single spaces.
    pub fn text(&self) -> String {
        let mut body = String::new();
        for line in self.start + 1..self.end {
            let content = self.doc.line(line).trim();
            if content.is_empty() {
                continue;
            }
            if !body.is_empty() {
                body.push(' ');
            }
            body.push_str(content);
        }
        body
    }
}

impl fmt::Debug for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hex(lines {}..={})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;
    use rstest::rstest;

    #[rstest]
    #[case("name = 5", Some(("name", "5")))]
    #[case("nested = ", Some(("nested", "")))]
    #[case("nested =", Some(("nested", "")))]
    #[case("a = b = c", None)]
    #[case("deadbeef", None)]
    #[case("{", None)]
    fn test_split_entry(#[case] content: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(split_entry(content), expected);
    }

    fn dict_doc() -> &'static str {
        "{\n\
         first = 1\n\
         \n\
         nested = \n\
         {\n\
         inner = 2\n\
         }\n\
         after = 3.5\n\
         flag = TRUE\n\
         }"
    }

    #[rstest]
    fn test_dict_get_scalars() {
        let doc = Document::parse(dict_doc()).unwrap();
        let Some(Value::Dict(dict)) = doc.root() else {
            panic!("root dict");
        };
        assert_eq!(dict.get("first").unwrap().unwrap().as_i64(), Some(1));
        assert_eq!(dict.get("after").unwrap().unwrap().as_f64(), Some(3.5));
        assert_eq!(dict.get("flag").unwrap().unwrap().as_bool(), Some(true));
        assert!(dict.get("missing").unwrap().is_none());
    }

    #[rstest]
    fn test_dict_get_skips_sub_containers() {
        let doc = Document::parse(dict_doc()).unwrap();
        let Some(Value::Dict(dict)) = doc.root() else {
            panic!("root dict");
        };
        // "inner" lives one level down and must not leak out
        assert!(dict.get("inner").unwrap().is_none());
        let nested = dict.get("nested").unwrap().unwrap();
        let nested = nested.as_dict().expect("nested dict");
        assert_eq!(nested.get("inner").unwrap().unwrap().as_i64(), Some(2));
    }

    #[rstest]
    fn test_dict_entry_after_container_found() {
        // the scan must hop over the nested span and keep going
        let doc = Document::parse(dict_doc()).unwrap();
        let Some(Value::Dict(dict)) = doc.root() else {
            panic!("root dict");
        };
        assert_eq!(dict.get("after").unwrap().unwrap().as_f64(), Some(3.5));
    }

    #[rstest]
    fn test_dict_iter_order_and_kinds() {
        let doc = Document::parse(dict_doc()).unwrap();
        let Some(Value::Dict(dict)) = doc.root() else {
            panic!("root dict");
        };
        let names: Vec<&str> = dict
            .iter()
            .map(|entry| entry.unwrap().0)
            .collect();
        assert_eq!(names, vec!["first", "nested", "after", "flag"]);
    }

    #[rstest]
    fn test_dict_bad_scalar_only_fails_when_requested() {
        let doc = Document::parse("{\nbad = 1x\ngood = 2\n}").unwrap();
        let Some(Value::Dict(dict)) = doc.root() else {
            panic!("root dict");
        };
        assert_eq!(dict.get("good").unwrap().unwrap().as_i64(), Some(2));
        assert!(matches!(
            dict.get("bad"),
            Err(Error::Scalar { line: 1, .. })
        ));
    }

    fn list_doc() -> &'static str {
        "{\n\
         items = \n\
         [\n\
         1,\n\
         \n\
         {\n\
         x = 2,\n\
         },\n\
         3,\n\
         #[\n\
         de ad\n\
         be ef\n\
         ],\n\
         4,\n\
         ]\n\
         }"
    }

    fn root_list<'a>(doc: &'a Document<'a>) -> List<'a> {
        let Some(Value::Dict(dict)) = doc.root() else {
            panic!("root dict");
        };
        dict.get("items")
            .unwrap()
            .unwrap()
            .as_list()
            .expect("items list")
    }

    #[rstest]
    fn test_list_positional_elements() {
        let doc = Document::parse(list_doc()).unwrap();
        let list = root_list(&doc);
        assert_eq!(list.get(0).unwrap().unwrap().as_i64(), Some(1));
        assert!(matches!(list.get(1).unwrap(), Some(Value::Dict(_))));
        assert_eq!(list.get(2).unwrap().unwrap().as_i64(), Some(3));
        assert!(matches!(list.get(3).unwrap(), Some(Value::Hex(_))));
        assert_eq!(list.get(4).unwrap().unwrap().as_i64(), Some(4));
        assert!(list.get(5).unwrap().is_none());
    }

    #[rstest]
    fn test_list_random_then_sequential_agree() {
        let doc = Document::parse(list_doc()).unwrap();
        let list = root_list(&doc);
        // jump to the back first, then read from the front
        assert_eq!(list.get(4).unwrap().unwrap().as_i64(), Some(4));
        assert_eq!(list.get(0).unwrap().unwrap().as_i64(), Some(1));
        assert_eq!(list.get(2).unwrap().unwrap().as_i64(), Some(3));
        assert_eq!(list.get(4).unwrap().unwrap().as_i64(), Some(4));
    }

    #[rstest]
    fn test_list_iter_matches_indexing() {
        let doc = Document::parse(list_doc()).unwrap();
        let list = root_list(&doc);
        let count = list.iter().map(|element| element.unwrap()).count();
        assert_eq!(count, 5);
    }

    #[rstest]
    fn test_list_iter_stops_after_bad_scalar() {
        let doc = Document::parse("{\nitems = \n[\n1\nbogus\n3\n]\n}").unwrap();
        let Some(Value::Dict(dict)) = doc.root() else {
            panic!("root dict");
        };
        let list = dict
            .get("items")
            .unwrap()
            .unwrap()
            .as_list()
            .expect("items list");
        let mut iter = list.iter();
        assert_eq!(iter.next().unwrap().unwrap().as_i64(), Some(1));
        assert!(matches!(
            iter.next(),
            Some(Err(Error::Scalar { line: 4, .. }))
        ));
        // fused: nothing after the error, not even the valid tail
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[rstest]
    fn test_dict_iter_stops_after_bad_scalar() {
        let doc = Document::parse("{\na = 1\nb = 2x\nc = 3\n}").unwrap();
        let Some(Value::Dict(dict)) = doc.root() else {
            panic!("root dict");
        };
        let mut iter = dict.iter();
        let (name, value) = iter.next().unwrap().unwrap();
        assert_eq!((name, value.as_i64()), ("a", Some(1)));
        assert!(matches!(
            iter.next(),
            Some(Err(Error::Scalar { line: 2, .. }))
        ));
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[rstest]
    fn test_hex_bytes_and_text() {
        let doc = Document::parse(list_doc()).unwrap();
        let list = root_list(&doc);
        let Some(Value::Hex(hex)) = list.get(3).unwrap() else {
            panic!("hex element");
        };
        assert_eq!(hex.bytes().unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(hex.text(), "de ad be ef");
    }

    #[rstest]
    fn test_hex_rejects_bad_digit_and_odd_length() {
        let doc = Document::parse("{\nblob = \n#[\nzz\n]\n}").unwrap();
        let Some(Value::Dict(dict)) = doc.root() else {
            panic!("root dict");
        };
        let Some(Value::Hex(hex)) = dict.get("blob").unwrap() else {
            panic!("hex value");
        };
        assert!(matches!(hex.bytes(), Err(Error::HexChar { ch: 'z', line: 3 })));

        let doc = Document::parse("{\nblob = \n#[\ndea\n]\n}").unwrap();
        let Some(Value::Dict(dict)) = doc.root() else {
            panic!("root dict");
        };
        let Some(Value::Hex(hex)) = dict.get("blob").unwrap() else {
            panic!("hex value");
        };
        assert!(matches!(hex.bytes(), Err(Error::HexOddLength { line: 2 })));
    }

    #[rstest]
    fn test_hex_pairs_span_lines() {
        let doc = Document::parse("{\nblob = \n#[\ndeadb\neef\n]\n}").unwrap();
        let Some(Value::Dict(dict)) = doc.root() else {
            panic!("root dict");
        };
        let Some(Value::Hex(hex)) = dict.get("blob").unwrap() else {
            panic!("hex value");
        };
        assert_eq!(hex.bytes().unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }
}
