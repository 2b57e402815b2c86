//! Length-prefixed framing: a 4-digit ASCII decimal length followed by
//! exactly that many bytes of payload.

use std::fmt;

/// Largest payload a single frame may carry (four decimal digits).
pub const MAX_PAYLOAD_LEN: usize = 9999;

/// Errors from encoding or decoding a frame's length prefix.
#[derive(Debug, Clone, PartialEq)]
pub enum FramingError {
    /// Payload is larger than [`MAX_PAYLOAD_LEN`] and cannot be framed.
    PayloadTooLarge(usize),
    /// The 4-byte length prefix was not ASCII decimal digits.
    InvalidLengthPrefix,
    /// The connection closed before a full frame could be read.
    ShortRead,
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PayloadTooLarge(n) => write!(f, "payload of {n} bytes exceeds {MAX_PAYLOAD_LEN}"),
            Self::InvalidLengthPrefix => write!(f, "length prefix is not 4 ASCII digits"),
            Self::ShortRead => write!(f, "connection closed mid-frame"),
        }
    }
}

impl std::error::Error for FramingError {}

/// Encode a frame: `LLLL` + `payload`.
pub fn encode_frame(payload: &[u8]) -> Result<Vec<u8>, FramingError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(FramingError::PayloadTooLarge(payload.len()));
    }
    let mut out = Vec::with_capacity(4 + payload.len());
    out.extend_from_slice(format!("{:04}", payload.len()).as_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

/// Parse a 4-byte ASCII-decimal length prefix.
pub fn decode_len(prefix: &[u8; 4]) -> Result<usize, FramingError> {
    let text = std::str::from_utf8(prefix).map_err(|_| FramingError::InvalidLengthPrefix)?;
    text.parse::<usize>().map_err(|_| FramingError::InvalidLengthPrefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_short_payload() {
        let frame = encode_frame(b"hello").unwrap();
        assert_eq!(&frame[..4], b"0005");
        let len = decode_len(frame[..4].try_into().unwrap()).unwrap();
        assert_eq!(&frame[4..4 + len], b"hello");
    }

    #[test]
    fn empty_payload_encodes_as_zero_length() {
        let frame = encode_frame(b"").unwrap();
        assert_eq!(frame, b"0000");
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = vec![0u8; MAX_PAYLOAD_LEN + 1];
        assert!(matches!(encode_frame(&payload), Err(FramingError::PayloadTooLarge(_))));
    }

    #[test]
    fn non_digit_prefix_is_rejected() {
        assert!(decode_len(b"12ab").is_err());
    }

    #[test]
    fn max_len_round_trips() {
        let payload = vec![7u8; MAX_PAYLOAD_LEN];
        let frame = encode_frame(&payload).unwrap();
        assert_eq!(&frame[..4], b"9999");
    }
}
