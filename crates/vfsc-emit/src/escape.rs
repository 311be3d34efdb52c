//! String and byte literal rendering shared by the text backends.

use std::fmt::Write as _;
use std::io::{self, Write};

/// Bytes per line in emitted byte arrays
pub const BYTES_PER_LINE: usize = 16;

/// Quote `s` as an Odin string literal.
///
/// Quotes, backslashes and control characters are escaped; other UTF-8 text
/// is kept as is.
pub fn odin_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Quote `s` as a C string literal.
///
/// Anything outside printable ASCII is written as a three-digit octal escape,
/// which cannot run into a following digit the way `\x` escapes can. `?` is
/// escaped so no trigraph can form.
pub fn c_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for &b in s.as_bytes() {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'?' => out.push_str("\\?"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out.push('"');
    out
}

/// Write `bytes` as comma-separated `0xNN` literals, one indented line per
/// [`BYTES_PER_LINE`] bytes, each line ending with a comma.
pub fn write_hex_lines(out: &mut dyn Write, bytes: &[u8], indent: &str) -> io::Result<()> {
    for chunk in bytes.chunks(BYTES_PER_LINE) {
        out.write_all(indent.as_bytes())?;
        for (i, b) in chunk.iter().enumerate() {
            if i > 0 {
                out.write_all(b" ")?;
            }
            write!(out, "0x{:02x},", b)?;
        }
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// True if `name` can be used as an identifier in both Odin and C
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Odin reserved words, which cannot name a package
const ODIN_KEYWORDS: &[&str] = &[
    "asm", "auto_cast", "bit_set", "break", "case", "cast", "context", "continue", "defer",
    "distinct", "do", "dynamic", "else", "enum", "fallthrough", "for", "foreign", "if",
    "import", "in", "map", "matrix", "not_in", "or_break", "or_continue", "or_else",
    "or_return", "package", "proc", "return", "struct", "switch", "transmute", "typeid",
    "union", "using", "when", "where",
];

/// True if `name` is reserved in Odin
pub fn is_odin_keyword(name: &str) -> bool {
    ODIN_KEYWORDS.contains(&name)
}
