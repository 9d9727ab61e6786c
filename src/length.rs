//! Definite-form length octets.

use crate::error::DecodeError;
use byteorder::{BigEndian, ByteOrder};

/// Largest number of subsequent length octets accepted (lengths fit in a u64).
pub const MAX_LENGTH_OCTETS: usize = 8;

const LONG_FORM: u8 = 0x80;
const RESERVED: u8 = 0xff;

/// Decode the length octets at `*pos`, advancing `pos` past them.
///
/// Short form is a single octet below 0x80. Long form is `0x80 | k` followed by `k`
/// big-endian octets, `1 <= k <= 8`. `0xff` is reserved, and `0x80` (the indefinite
/// form) is rejected along with it since only definite lengths are supported.
pub fn decode_length(data: &[u8], pos: &mut usize) -> Result<u64, DecodeError> {
    let code = *data.get(*pos).ok_or(DecodeError::Truncated)?;
    *pos += 1;

    if code & LONG_FORM == 0 {
        return Ok(code as u64);
    }
    if code == RESERVED || code == LONG_FORM {
        return Err(DecodeError::InvalidLengthOfLength);
    }
    let count = (code & !LONG_FORM) as usize;
    if count > MAX_LENGTH_OCTETS {
        return Err(DecodeError::LengthOfLengthTooBig(count));
    }
    if data.len() - *pos < count {
        return Err(DecodeError::Truncated);
    }
    let len = BigEndian::read_uint(&data[*pos..], count);
    *pos += count;
    Ok(len)
}
