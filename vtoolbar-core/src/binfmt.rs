//! Small binary container: a 4-byte magic, a little-endian `u32` version
//! and a bincode payload.

use serde::de::DeserializeOwned;
use serde::Serialize;

const HEADER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    Truncated,
    BadMagic,
    Version(u32),
    Payload,
}

pub fn encode<T: Serialize>(magic: [u8; 4], version: u32, payload: &T) -> Option<Vec<u8>> {
    let body = bincode::serialize(payload).ok()?;
    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(&magic);
    out.extend_from_slice(&version.to_le_bytes());
    out.extend_from_slice(&body);
    Some(out)
}

/// Reads the header only. Returns the stored version.
pub fn peek_version(bytes: &[u8], magic: [u8; 4]) -> Result<u32, HeaderError> {
    if bytes.len() < HEADER_LEN {
        return Err(HeaderError::Truncated);
    }
    if bytes[0..4] != magic {
        return Err(HeaderError::BadMagic);
    }
    let mut ver = [0u8; 4];
    ver.copy_from_slice(&bytes[4..8]);
    Ok(u32::from_le_bytes(ver))
}

pub fn decode<T: DeserializeOwned>(
    bytes: &[u8],
    magic: [u8; 4],
    version: u32,
) -> Result<T, HeaderError> {
    let found = peek_version(bytes, magic)?;
    if found != version {
        return Err(HeaderError::Version(found));
    }
    bincode::deserialize(&bytes[HEADER_LEN..]).map_err(|_| HeaderError::Payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Dummy {
        value: u32,
    }

    #[test]
    fn encoded_payload_decodes() {
        let input = Dummy { value: 42 };
        let bytes = encode(*b"TEST", 1, &input).expect("encode");
        assert_eq!(peek_version(&bytes, *b"TEST"), Ok(1));
        let output: Dummy = decode(&bytes, *b"TEST", 1).expect("decode");
        assert_eq!(input, output);
    }

    #[test]
    fn decode_fails_on_magic_mismatch() {
        let bytes = encode(*b"GOOD", 1, &Dummy { value: 1 }).expect("encode");
        let output: Result<Dummy, _> = decode(&bytes, *b"BAD!", 1);
        assert_eq!(output, Err(HeaderError::BadMagic));
    }

    #[test]
    fn decode_reports_stored_version() {
        let bytes = encode(*b"TEST", 1, &Dummy { value: 1 }).expect("encode");
        let output: Result<Dummy, _> = decode(&bytes, *b"TEST", 2);
        assert_eq!(output, Err(HeaderError::Version(1)));
    }

    #[test]
    fn decode_fails_on_short_input() {
        let output: Result<Dummy, _> = decode(b"TES", *b"TEST", 1);
        assert_eq!(output, Err(HeaderError::Truncated));
    }
}
