pub const COMMENT_MARKER: &str = "//";

pub const ENTRY_SEPARATOR: &str = " = ";

pub const DICT_OPEN: &str = "{";
pub const DICT_CLOSE: &str = "}";
pub const LIST_OPEN: &str = "[";
pub const HEX_OPEN: &str = "#[";
pub const BRACKET_CLOSE: &str = "]";
