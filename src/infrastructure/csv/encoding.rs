// ============================================================
// ENCODING DETECTION
// ============================================================
// Decode uploaded spreadsheet bytes into text

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Decoded document text and the name of the encoding that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
}

/// Decode bytes: BOM first, then strict UTF-8, then Windows-1252.
///
/// Spreadsheet tools on Windows export CSV as Windows-1252 unless told otherwise,
/// which is why that is the fallback rather than a lossy UTF-8 decode.
pub fn decode_bytes(bytes: &[u8]) -> DecodedText {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return DecodedText {
            text: text.into_owned(),
            encoding: encoding.name(),
        };
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return DecodedText {
            text: text.to_string(),
            encoding: UTF_8.name(),
        };
    }

    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    DecodedText {
        text: text.into_owned(),
        encoding: WINDOWS_1252.name(),
    }
}
