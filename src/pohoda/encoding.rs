//! Windows-1250 output with in-place escapes for unmappable characters.
//!
//! A character the code page cannot represent is written as `\xNN` (below
//! U+0100), `\uNNNN` (BMP) or `\UNNNNNNNN`, all lowercase hex. Nothing is
//! dropped and encoding never fails.

use encoding_rs::WINDOWS_1250;
use tracing::debug;

/// Name used in the XML declaration.
pub const WINDOWS_1250_LABEL: &str = "Windows-1250";

/// Encoded bytes plus the number of escaped characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub escaped: usize,
}

/// Encode `text` as Windows-1250.
pub fn encode_windows_1250(text: &str) -> Encoded {
    let mut bytes = Vec::with_capacity(text.len());
    let mut escaped = 0;
    let mut buf = [0u8; 4];

    for ch in text.chars() {
        if ch.is_ascii() {
            bytes.push(ch as u8);
            continue;
        }
        let (out, _, unmappable) = WINDOWS_1250.encode(ch.encode_utf8(&mut buf));
        if unmappable {
            escaped += 1;
            bytes.extend_from_slice(backslash_escape(ch).as_bytes());
        } else {
            bytes.extend_from_slice(&out);
        }
    }

    if escaped > 0 {
        debug!(escaped, "characters outside Windows-1250 escaped");
    }
    Encoded { bytes, escaped }
}

fn backslash_escape(ch: char) -> String {
    let cp = ch as u32;
    if cp < 0x100 {
        format!("\\x{cp:02x}")
    } else if cp < 0x1_0000 {
        format!("\\u{cp:04x}")
    } else {
        format!("\\U{cp:08x}")
    }
}
