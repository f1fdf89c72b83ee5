use std::fmt;

use smallvec::SmallVec;
use smol_str::SmolStr;

/// One step of a query path: a dict key or a list index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSeg {
    Key(SmolStr),
    Index(usize),
}

impl From<&str> for PathSeg {
    fn from(value: &str) -> Self {
        PathSeg::Key(SmolStr::new(value))
    }
}

impl From<String> for PathSeg {
    fn from(value: String) -> Self {
        PathSeg::Key(SmolStr::new(value))
    }
}

impl From<usize> for PathSeg {
    fn from(value: usize) -> Self {
        PathSeg::Index(value)
    }
}

impl From<u32> for PathSeg {
    fn from(value: u32) -> Self {
        PathSeg::Index(value as usize)
    }
}

impl fmt::Display for PathSeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSeg::Key(name) => f.write_str(name),
            PathSeg::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Paths stay inline up to eight segments; the deepest query the collision
/// pipeline makes is seven.
pub type Path = SmallVec<[PathSeg; 8]>;

/// Parses a dot-separated path. Digit-only segments that fit a `usize`
/// become list indices, everything else a dict key; a digit run too long
/// for `usize` falls back to a key, which can only resolve to absence
/// against a list. Empty segments are dropped, so `""` is the root path.
pub fn parse_path(raw: &str) -> Path {
    let mut path = Path::new();
    for segment in raw.split('.') {
        if segment.is_empty() {
            continue;
        }
        let digits_only = segment.bytes().all(|b| b.is_ascii_digit());
        match segment.parse::<usize>() {
            Ok(index) if digits_only => path.push(PathSeg::Index(index)),
            _ => path.push(PathSeg::Key(SmolStr::new(segment))),
        }
    }
    path
}

/// Builds a [`Path`] from key and index literals:
/// `path!["m_parts", 0usize, "m_rnShape"]`.
#[macro_export]
macro_rules! path {
    () => { $crate::Path::new() };
    ($($seg:expr),+ $(,)?) => {{
        let mut path = $crate::Path::new();
        $(path.push($crate::PathSeg::from($seg));)+
        path
    }};
}
