//! Converts PTP tape images into 8-bit mono 8000 Hz WAV audio that a
//! cassette interface can load.

pub mod convert;
pub mod error;
pub mod ptp;
pub mod waveform;
pub mod wav;

pub use convert::{convert, output_path_for, Conversion, Converter, ConverterConfig};
pub use error::ConvertError;
