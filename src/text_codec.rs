//! Byte/text conversion. DOT text is always UTF-8; invalid input is an error, never
//! replaced.

use crate::error::DotError;

pub fn decode_text(bytes: &[u8]) -> Result<&str, DotError> {
  std::str::from_utf8(bytes).map_err(|source| DotError::NotValidTextEncoding {
    valid_up_to: source.valid_up_to(),
    source,
  })
}

/// Owned variant of [`decode_text`]; reuses the buffer.
pub fn decode_text_owned(bytes: Vec<u8>) -> Result<String, DotError> {
  String::from_utf8(bytes).map_err(|e| {
    let source = e.utf8_error();
    DotError::NotValidTextEncoding {
      valid_up_to: source.valid_up_to(),
      source,
    }
  })
}

pub fn encode_text(text: &str) -> &[u8] {
  text.as_bytes()
}
