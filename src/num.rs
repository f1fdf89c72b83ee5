/// Scalar formatting for bare output, shared with the CLI's raw mode.
pub fn format_int(value: i64) -> String {
    let mut buffer = itoa::Buffer::new();
    buffer.format(value).to_string()
}

pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let mut buffer = ryu::Buffer::new();
    buffer.format(value).to_string()
}
