// src/utils/string_encoding.rs

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Lowercase hex rendering used for binary segment values.
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(HEX_DIGITS[(b >> 4) as usize] as char);
        out.push(HEX_DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

/// Text of a binary value when it is valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Option<String> {
    std::str::from_utf8(bytes).ok().map(str::to_string)
}

/// Printable rendering of magic bytes for error messages.
pub fn decode_text_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_string()
}
