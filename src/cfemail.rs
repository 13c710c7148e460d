//! Decoding of the XOR-obfuscated addresses the reply page embeds in
//! `data-cfemail` attributes.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("obfuscated address has no key byte")]
    Empty,
    #[error("obfuscated address is not valid hex")]
    Hex(#[from] hex::FromHexError),
}

/// Decodes one obfuscated address.
///
/// The first hex byte is the key, every following byte XOR the key is one
/// character. A trailing unpaired digit is ignored.
pub fn decode(encoded: &str) -> Result<String, DecodeError> {
    let even = encoded.len() - encoded.len() % 2;
    let bytes = hex::decode(encoded.get(..even).unwrap_or(encoded))?;
    let (&key, cipher) = bytes.split_first().ok_or(DecodeError::Empty)?;

    Ok(cipher.iter().map(|&byte| char::from(byte ^ key)).collect())
}
