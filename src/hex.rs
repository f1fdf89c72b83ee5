const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Uppercase hex text with one space between byte pairs, the layout the
/// collision toolchain writes blobs in.
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, &byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(HEX_UPPER[(byte >> 4) as usize] as char);
        out.push(HEX_UPPER[(byte & 0x0f) as usize] as char);
    }
    out
}

pub(crate) fn decode_nibble(ch: char) -> Option<u8> {
    ch.to_digit(16).map(|digit| digit as u8)
}
