use crate::error::ConvertError;

/// Resting level between pulses.
pub const SILENCE: u8 = 128;
/// Positive half of a pulse pair.
pub const POS_PEAK: u8 = 248;
/// Negative half of a pulse pair.
pub const NEG_PEAK: u8 = 8;

// Half-pulse widths in samples. A long pair is a 0, a short pair is a 1.
const ZERO_HALF: usize = 8;
const ONE_HALF: usize = 3;

const FILE_SYNC_BYTE: u8 = 0xAA;
const FILE_SYNC_COUNT: usize = 512;
const BLOCK_SYNC_BYTE: u8 = 0xFF;
const BLOCK_SYNC_COUNT: usize = 96;
const BLOCK_MARK_BYTE: u8 = 0xD3;
const BLOCK_MARK_COUNT: usize = 3;

/// Number of samples produced by `encode_bit(bit)`.
pub fn bit_len(bit: bool) -> usize {
    if bit {
        2 * ONE_HALF
    } else {
        2 * ZERO_HALF
    }
}

/// Number of samples produced by `encode_byte(byte)`.
pub fn byte_len(byte: u8) -> usize {
    let ones = byte.count_ones() as usize;
    ones * bit_len(true) + (8 - ones) * bit_len(false)
}

/// Length of the file sync preamble in samples.
pub fn file_sync_len() -> usize {
    FILE_SYNC_COUNT * byte_len(FILE_SYNC_BYTE)
}

/// Length of one block sync marker in samples.
pub fn block_sync_len() -> usize {
    BLOCK_SYNC_COUNT * byte_len(BLOCK_SYNC_BYTE) + BLOCK_MARK_COUNT * byte_len(BLOCK_MARK_BYTE)
}

pub fn encode_bit(bit: bool, out: &mut Vec<u8>) {
    let half = if bit { ONE_HALF } else { ZERO_HALF };
    out.extend(std::iter::repeat(POS_PEAK).take(half));
    out.extend(std::iter::repeat(NEG_PEAK).take(half));
}

/// Encodes a byte most significant bit first.
pub fn encode_byte(byte: u8, out: &mut Vec<u8>) {
    for shift in (0..8).rev() {
        encode_bit((byte >> shift) & 1 == 1, out);
    }
}

/// Checked variant of [`encode_byte`] for values coming from a wider
/// integer type. Nothing is appended when the value is rejected.
pub fn encode_value(value: i64, out: &mut Vec<u8>) -> Result<(), ConvertError> {
    let byte = u8::try_from(value).map_err(|_| ConvertError::InvalidByte { value })?;
    encode_byte(byte, out);
    Ok(())
}

pub fn encode_silence(count: usize, out: &mut Vec<u8>) {
    out.extend(std::iter::repeat(SILENCE).take(count));
}

/// File-level preamble, emitted once after the leading silence.
pub fn encode_file_sync(out: &mut Vec<u8>) {
    for _ in 0..FILE_SYNC_COUNT {
        encode_byte(FILE_SYNC_BYTE, out);
    }
}

/// Per-block marker, emitted before every block payload.
pub fn encode_block_sync(out: &mut Vec<u8>) {
    for _ in 0..BLOCK_SYNC_COUNT {
        encode_byte(BLOCK_SYNC_BYTE, out);
    }
    for _ in 0..BLOCK_MARK_COUNT {
        encode_byte(BLOCK_MARK_BYTE, out);
    }
}
