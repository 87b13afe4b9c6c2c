//! Decoding of uploaded byte buffers into text.

use encoding_rs::WINDOWS_1250;

use crate::error::EvalError;

/// Character encoding that produced a decoded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Windows1250,
}

/// A decoded text together with the encoding that applied.
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding: TextEncoding,
}

/// Decodes a raw byte buffer, trying UTF-8 first and falling back to
/// Windows-1250. Fails when neither encoding applies; the fallback is a
/// strict decode, so an unmappable byte is an error rather than a
/// replacement character.
pub fn decode_text(bytes: &[u8]) -> Result<DecodedText, EvalError> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(DecodedText {
            text: text.to_string(),
            encoding: TextEncoding::Utf8,
        });
    }

    match WINDOWS_1250.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => Ok(DecodedText {
            text: text.into_owned(),
            encoding: TextEncoding::Windows1250,
        }),
        None => Err(EvalError::DecodeError(
            "input is neither valid UTF-8 nor valid Windows-1250".to_string(),
        )),
    }
}
