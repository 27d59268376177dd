//! Script number encoding with Bitcoin Cash stack-integer rules.
//!
//! Numbers on the script stack are encoded as little-endian byte arrays
//! with a sign bit in the most significant bit of the last byte, using the
//! minimal possible length. Zero encodes as the empty byte array.

use crate::ScriptError;

/// Encode an i64 as a minimally-encoded script number.
///
/// # Arguments
/// * `value` - The number to encode.
///
/// # Returns
/// Little-endian bytes with a sign bit, or an empty vector for zero.
pub fn encode(value: i64) -> Vec<u8> {
    if value == 0 {
        return Vec::new();
    }

    let negative = value < 0;
    let mut abs = value.unsigned_abs();

    let mut result = Vec::new();
    while abs > 0 {
        result.push((abs & 0xff) as u8);
        abs >>= 8;
    }

    // If the most significant byte already uses the 0x80 bit, an extra
    // byte is required to hold the sign.
    let last = *result.last().expect("non-zero value has bytes");
    if last & 0x80 != 0 {
        result.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        *result.last_mut().expect("non-zero value has bytes") |= 0x80;
    }

    result
}

/// Decode a minimally-encoded script number into an i64.
///
/// # Arguments
/// * `bytes` - Little-endian sign-bit encoding; empty means zero.
///
/// # Returns
/// The decoded value, or an error if the encoding is not minimal or
/// exceeds 8 bytes.
pub fn decode(bytes: &[u8]) -> Result<i64, ScriptError> {
    if bytes.is_empty() {
        return Ok(0);
    }
    if bytes.len() > 8 {
        return Err(ScriptError::InvalidNumber(format!(
            "{} bytes exceeds the max allowed of 8",
            bytes.len()
        )));
    }

    // Reject non-minimal encodings: the last byte may only be a bare sign
    // bit when the preceding byte needs its high bit.
    let last = bytes[bytes.len() - 1];
    if last & 0x7f == 0 && (bytes.len() == 1 || bytes[bytes.len() - 2] & 0x80 == 0) {
        return Err(ScriptError::InvalidNumber(
            "non-minimal encoding".to_string(),
        ));
    }

    let mut value: i64 = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let byte = if i == bytes.len() - 1 { b & 0x7f } else { b };
        value |= (byte as i64) << (8 * i);
    }

    if last & 0x80 != 0 {
        value = -value;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    //! Tests for minimal script number encoding and decoding.

    use super::*;

    /// Verify known encodings for small and boundary values.
    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode(0), Vec::<u8>::new());
        assert_eq!(encode(1), vec![0x01]);
        assert_eq!(encode(-1), vec![0x81]);
        assert_eq!(encode(127), vec![0x7f]);
        assert_eq!(encode(128), vec![0x80, 0x00]);
        assert_eq!(encode(-128), vec![0x80, 0x80]);
        assert_eq!(encode(255), vec![0xff, 0x00]);
        assert_eq!(encode(256), vec![0x00, 0x01]);
        assert_eq!(encode(10000), vec![0x10, 0x27]);
        assert_eq!(encode(-10000), vec![0x10, 0xa7]);
    }

    /// Verify encode/decode roundtrips over a spread of values.
    #[test]
    fn test_roundtrip() {
        for v in [
            0i64, 1, -1, 2, 127, -127, 128, -128, 255, 256, 1000, 100_000, -100_000,
            i32::MAX as i64, i32::MIN as i64 + 1, 1 << 40, -(1 << 40),
        ] {
            assert_eq!(decode(&encode(v)).expect("roundtrip"), v, "value {v}");
        }
    }

    /// Verify non-minimal encodings are rejected.
    #[test]
    fn test_reject_non_minimal() {
        // 1 encoded with a trailing zero byte
        assert!(decode(&[0x01, 0x00]).is_err());
        // bare zero byte instead of empty
        assert!(decode(&[0x00]).is_err());
        // 128 correctly needs the trailing byte -- accepted
        assert_eq!(decode(&[0x80, 0x00]).expect("minimal"), 128);
    }

    /// Verify oversized encodings are rejected.
    #[test]
    fn test_reject_oversized() {
        assert!(decode(&[0x01; 9]).is_err());
    }
}
