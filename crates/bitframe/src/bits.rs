//! Low-level bit range reads from byte slices.
//!
//! Bits are addressed in MSB-first order: bit 0 is the high bit of the first byte,
//! bit 7 its low bit, bit 8 the high bit of the second byte. Ranges are inclusive.

use crate::errors::ReadError;

fn check_range(data: &[u8], start: usize, end: usize) -> Result<(), ReadError> {
    if start > end {
        return Err(ReadError::InvalidRange { start, end });
    }

    let available_bits = data.len() * 8;
    if end >= available_bits {
        return Err(ReadError::OutOfRange {
            end,
            available_bits,
        });
    }

    Ok(())
}

/// Reads the inclusive bit range `[start, end]` as an unsigned integer.
///
/// `start` becomes the most significant bit of the result and `end` the least
/// significant. The range may cross any number of byte boundaries but must be
/// at most 64 bits wide.
pub fn read_bits(data: &[u8], start: usize, end: usize) -> Result<u64, ReadError> {
    check_range(data, start, end)?;

    let n = end - start + 1;
    if n > 64 {
        return Err(ReadError::TooManyBitsRead(n));
    }

    let byte_start = start / 8;
    let byte_end = end / 8;
    let bit_start = start % 8;
    let bit_end = end % 8;

    // a 64-bit range can straddle nine bytes
    let mut value = 0u128;

    for i in byte_start..=byte_end {
        let mut byte = data[i];
        if i == byte_start {
            byte &= 0xFF >> bit_start;
        }
        if i == byte_end {
            byte &= 0xFF << (7 - bit_end);
        }

        value = (value << 8) | byte as u128;
    }

    Ok((value >> (7 - bit_end)) as u64)
}

/// Reads the inclusive bit range `[start, end]` of any width as big-endian bytes.
///
/// The bits are right-aligned: the result has `ceil(n / 8)` bytes and the unused
/// high bits of the first byte are zero.
pub fn read_bits_bytes(data: &[u8], start: usize, end: usize) -> Result<Vec<u8>, ReadError> {
    check_range(data, start, end)?;

    let n = end - start + 1;
    let mut out = Vec::with_capacity((n + 7) / 8);

    let head = match n % 8 {
        0 => 8,
        rem => rem,
    };
    out.push(read_bits(data, start, start + head - 1)? as u8);

    let mut pos = start + head;
    while pos <= end {
        out.push(read_bits(data, pos, pos + 7)? as u8);
        pos += 8;
    }

    Ok(out)
}
