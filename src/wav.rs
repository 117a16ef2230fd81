use crate::error::ConvertError;
use hound::WavReader;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

pub const SAMPLE_RATE: u32 = 8000;
pub const BITS_PER_SAMPLE: u16 = 8;
pub const CHANNELS: u16 = 1;
pub const HEADER_LEN: usize = 44;

/// Builds the canonical 44-byte RIFF/WAVE header for 8-bit mono PCM.
pub fn wav_header(data_len: u32) -> [u8; HEADER_LEN] {
    let block_align: u16 = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = SAMPLE_RATE * u32::from(block_align);

    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&(36 + data_len).to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
    header[22..24].copy_from_slice(&CHANNELS.to_le_bytes());
    header[24..28].copy_from_slice(&SAMPLE_RATE.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_len.to_le_bytes());
    header
}

/// Prepends the header to a run of unsigned 8-bit samples.
pub fn wrap_samples(samples: &[u8]) -> Vec<u8> {
    let mut wav = Vec::with_capacity(HEADER_LEN + samples.len());
    wav.extend_from_slice(&wav_header(samples.len() as u32));
    wav.extend_from_slice(samples);
    wav
}

/// Format details of a WAV stream, as reported by `hound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub channels: u16,
    /// Length in samples per channel
    pub duration: u32,
}

impl WavInfo {
    pub fn seconds(&self) -> f64 {
        self.duration as f64 / self.sample_rate as f64
    }
}

pub fn read_wav_info(bytes: &[u8]) -> Result<WavInfo, ConvertError> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    Ok(WavInfo {
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        channels: spec.channels,
        duration: reader.duration(),
    })
}

pub fn read_wav_file_info(file_path: &Path) -> Result<WavInfo, ConvertError> {
    debug!("Reading WAV file from {}", file_path.display());
    let reader = WavReader::open(file_path)?;
    let spec = reader.spec();
    Ok(WavInfo {
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        channels: spec.channels,
        duration: reader.duration(),
    })
}

pub fn write_wav_file(output_path: &Path, wav: &[u8]) -> Result<(), ConvertError> {
    debug!("Writing WAV file to {}", output_path.display());
    fs::write(output_path, wav)?;
    debug!("Finished writing WAV file to {}", output_path.display());
    Ok(())
}
