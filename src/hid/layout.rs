//! US keyboard layout for typing text.

/// Usage code and shift state producing `ascii` on a US layout.
///
/// Control characters other than newline and tab have no key and map to
/// `None`.
pub fn from_ascii(ascii: u8) -> Option<(u8, bool)> {
    let key = match ascii {
        b'a'..=b'z' => (0x04 + (ascii - b'a'), false),
        b'A'..=b'Z' => (0x04 + (ascii - b'A'), true),
        b'1'..=b'9' => (0x1E + (ascii - b'1'), false),
        b'0' => (0x27, false),
        b'\n' => (0x28, false),
        b'\t' => (0x2B, false),
        b' ' => (0x2C, false),
        b'-' => (0x2D, false),
        b'=' => (0x2E, false),
        b'[' => (0x2F, false),
        b']' => (0x30, false),
        b'\\' => (0x31, false),
        b';' => (0x33, false),
        b'\'' => (0x34, false),
        b'`' => (0x35, false),
        b',' => (0x36, false),
        b'.' => (0x37, false),
        b'/' => (0x38, false),
        b'!' => (0x1E, true),
        b'@' => (0x1F, true),
        b'#' => (0x20, true),
        b'$' => (0x21, true),
        b'%' => (0x22, true),
        b'^' => (0x23, true),
        b'&' => (0x24, true),
        b'*' => (0x25, true),
        b'(' => (0x26, true),
        b')' => (0x27, true),
        b'_' => (0x2D, true),
        b'+' => (0x2E, true),
        b'{' => (0x2F, true),
        b'}' => (0x30, true),
        b'|' => (0x31, true),
        b':' => (0x33, true),
        b'"' => (0x34, true),
        b'~' => (0x35, true),
        b'<' => (0x36, true),
        b'>' => (0x37, true),
        b'?' => (0x38, true),
        _ => return None,
    };
    Some(key)
}
