use std::fmt;

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::container::{Dict, Hex, List};
use crate::hex::encode_hex;
use crate::scan::strip_commas;
use crate::{Error, Result};

/// The result of resolving a path: a decoded scalar, or a lazy view over a
/// container span. Views are cheap copies (a document reference and two
/// line numbers); descending into one never materializes its contents.
#[derive(Clone, Copy)]
pub enum Value<'d> {
    Bool(bool),
    Int(i64),
    Float(f64),
    Dict(Dict<'d>),
    List(List<'d>),
    Hex(Hex<'d>),
}

impl<'d> Value<'d> {
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(value) => Some(value),
            Value::Int(value) => Some(value as f64),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<Dict<'d>> {
        match *self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<List<'d>> {
        match *self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_hex(&self) -> Option<Hex<'d>> {
        match *self {
            Value::Hex(hex) => Some(hex),
            _ => None,
        }
    }

    /// Decoded blob bytes for a hex value, `Ok(None)` for every other
    /// kind. Decode failures surface here, when the bytes are requested.
    pub fn bytes(&self) -> Result<Option<Vec<u8>>> {
        match self {
            Value::Hex(hex) => hex.bytes().map(Some),
            _ => Ok(None),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value:?}"),
            Value::Dict(dict) => dict.fmt(f),
            Value::List(list) => list.fmt(f),
            Value::Hex(hex) => hex.fmt(f),
        }
    }
}

/// Streaming serialization straight off the lazy views; no intermediate
/// tree is built. Hex blobs serialize as their uppercase text form.
impl Serialize for Value<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            Value::Bool(value) => serializer.serialize_bool(value),
            Value::Int(value) => serializer.serialize_i64(value),
            Value::Float(value) => serializer.serialize_f64(value),
            Value::Dict(dict) => {
                let mut map = serializer.serialize_map(None)?;
                for entry in dict.iter() {
                    let (name, value) = entry.map_err(S::Error::custom)?;
                    map.serialize_entry(name, &value)?;
                }
                map.end()
            }
            Value::List(list) => {
                let mut seq = serializer.serialize_seq(None)?;
                for element in list.iter() {
                    let value = element.map_err(S::Error::custom)?;
                    seq.serialize_element(&value)?;
                }
                seq.end()
            }
            Value::Hex(hex) => {
                let bytes = hex.bytes().map_err(S::Error::custom)?;
                serializer.serialize_str(&encode_hex(&bytes))
            }
        }
    }
}

/// The shared scalar decoder: comma characters removed, whitespace
/// trimmed, then booleans case-insensitively, floats when a `.` is
/// present, integers otherwise.
pub(crate) fn decode_scalar<'d>(raw: &str, line: usize) -> Result<Value<'d>> {
    let stripped = strip_commas(raw);
    let token = stripped.trim();
    if token.eq_ignore_ascii_case("true") {
        return Ok(Value::Bool(true));
    }
    if token.eq_ignore_ascii_case("false") {
        return Ok(Value::Bool(false));
    }
    if token.contains('.') {
        if let Ok(value) = token.parse::<f64>() {
            return Ok(Value::Float(value));
        }
    } else if let Ok(value) = token.parse::<i64>() {
        return Ok(Value::Int(value));
    }
    Err(Error::Scalar {
        token: token.to_string(),
        line,
    })
}
