use std::io;
use thiserror::Error;

/// Errors that abort a PTP to WAV conversion.
///
/// An unrecognised block id is deliberately absent: it ends the block
/// stream like an end-of-file marker and the conversion still succeeds.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A value handed to the byte encoder does not fit in 0..=255
    #[error("invalid byte value: {value}")]
    InvalidByte {
        /// The rejected value
        value: i64,
    },

    /// A block declares more payload than the input holds
    #[error(
        "block {block} at offset {offset} declares {declared} payload bytes but only {available} remain"
    )]
    TruncatedInput {
        /// 1-based block index
        block: usize,
        /// Offset of the block id byte
        offset: usize,
        /// Payload length from the block header
        declared: usize,
        /// Bytes actually left after the block header
        available: usize,
    },

    /// Reading a PTP file or writing a WAV file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Reading back a produced WAV file failed
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}
