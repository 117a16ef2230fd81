use crate::error::ConvertError;
use crate::ptp::Blocks;
use crate::waveform::{
    block_sync_len, byte_len, encode_block_sync, encode_byte, encode_file_sync, encode_silence,
    file_sync_len,
};
use crate::wav::{self, SAMPLE_RATE};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_LEADING_SILENCE: usize = 2000;
pub const DEFAULT_TRAILING_SILENCE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Silence before the file sync preamble, in samples
    pub leading_silence: usize,
    /// Silence after the last block, in samples
    pub trailing_silence: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            leading_silence: DEFAULT_LEADING_SILENCE,
            trailing_silence: DEFAULT_TRAILING_SILENCE,
        }
    }
}

/// What was encoded for one PTP block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSummary {
    pub index: usize,
    pub id: u8,
    pub len: usize,
}

/// Samples produced by a successful conversion, before the WAV header.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub samples: Vec<u8>,
    pub blocks: Vec<BlockSummary>,
}

impl Conversion {
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / SAMPLE_RATE as f64
    }

    pub fn into_wav(self) -> Vec<u8> {
        wav::wrap_samples(&self.samples)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Synthesises the tape signal for a PTP image.
    ///
    /// Parsing ends at the first unrecognised block id; everything encoded
    /// up to that point is kept. A truncated payload fails the whole call.
    pub fn encode(&self, ptp: &[u8]) -> Result<Conversion, ConvertError> {
        debug!("Converting {} bytes of PTP data", ptp.len());

        // Validate first so the buffer can be sized exactly.
        let blocks = Blocks::new(ptp).collect::<Result<Vec<_>, _>>()?;
        let capacity = self.config.leading_silence
            + file_sync_len()
            + blocks
                .iter()
                .map(|b| block_sync_len() + b.payload.iter().map(|&x| byte_len(x)).sum::<usize>())
                .sum::<usize>()
            + self.config.trailing_silence;

        let mut samples = Vec::with_capacity(capacity);
        encode_silence(self.config.leading_silence, &mut samples);
        encode_file_sync(&mut samples);

        let mut summaries = Vec::with_capacity(blocks.len());
        for block in &blocks {
            encode_block_sync(&mut samples);
            for &byte in block.payload {
                encode_byte(byte, &mut samples);
            }
            summaries.push(BlockSummary {
                index: block.index,
                id: block.id,
                len: block.payload.len(),
            });
        }

        encode_silence(self.config.trailing_silence, &mut samples);

        let conversion = Conversion {
            samples,
            blocks: summaries,
        };
        info!(
            "Total samples: {}, Duration: {:.2}s, Blocks: {}",
            conversion.samples.len(),
            conversion.duration_secs(),
            conversion.blocks.len()
        );
        Ok(conversion)
    }

    pub fn convert(&self, ptp: &[u8]) -> Result<Vec<u8>, ConvertError> {
        Ok(self.encode(ptp)?.into_wav())
    }

    /// Reads `input_path`, converts it and writes the WAV to `output_path`.
    pub fn convert_file(&self, input_path: &Path, output_path: &Path) -> Result<(), ConvertError> {
        debug!("Reading PTP file from {}", input_path.display());
        let ptp = fs::read(input_path)?;
        let wav = self.convert(&ptp)?;
        wav::write_wav_file(output_path, &wav)
    }
}

/// Converts a PTP image to WAV bytes with the default silence padding.
pub fn convert(ptp: &[u8]) -> Result<Vec<u8>, ConvertError> {
    Converter::new().convert(ptp)
}

/// `GAME.PTP` becomes `GAME.wav`; other names get `.wav` appended.
pub fn output_path_for(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("ptp") => input.with_extension("wav"),
        _ => {
            let mut name = input.as_os_str().to_os_string();
            name.push(".wav");
            PathBuf::from(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::{NEG_PEAK, POS_PEAK, SILENCE};
    use proptest::prelude::*;

    const EMPTY_SAMPLES: usize = 2000 + 512 * 88 + 1000;

    #[test]
    fn test_lead_in_only() {
        let wav = convert(&[0x00, 0x01, 0x02]).unwrap();
        assert_eq!(wav.len(), 44 + EMPTY_SAMPLES);

        let samples = &wav[44..];
        assert!(samples[..2000].iter().all(|&s| s == SILENCE));
        assert!(samples[2000..2000 + 512 * 88]
            .iter()
            .all(|&s| s == POS_PEAK || s == NEG_PEAK));
        assert!(samples[samples.len() - 1000..].iter().all(|&s| s == SILENCE));
    }

    #[test]
    fn test_single_block_sample_count() {
        let wav = convert(&[0, 0, 0, 0x55, 1, 0, 0x00]).unwrap();
        let expected = 2000 + 512 * 88 + 96 * 48 + 3 * 78 + 128 + 1000;
        assert_eq!(expected, 53_026);
        assert_eq!(wav.len() - 44, expected);
    }

    #[test]
    fn test_block_layout() {
        let conversion = Converter::new().encode(&[0, 0, 0, 0xAA, 1, 0, 0x80]).unwrap();
        let start = 2000 + file_sync_len();

        let mut sync = Vec::new();
        encode_block_sync(&mut sync);
        assert_eq!(&conversion.samples[start..start + sync.len()], sync.as_slice());

        let mut payload = Vec::new();
        encode_byte(0x80, &mut payload);
        let payload_start = start + sync.len();
        assert_eq!(
            &conversion.samples[payload_start..payload_start + payload.len()],
            payload.as_slice()
        );
        assert_eq!(
            conversion.blocks,
            vec![BlockSummary {
                index: 1,
                id: 0xAA,
                len: 1
            }]
        );
    }

    #[test]
    fn test_zero_length_block_still_syncs() {
        let conversion = Converter::new()
            .encode(&[0, 0, 0, 0x55, 0, 0, 0xAA, 1, 0, 0xFF])
            .unwrap();
        assert_eq!(conversion.blocks.len(), 2);
        assert_eq!(
            conversion.samples.len(),
            EMPTY_SAMPLES + 2 * block_sync_len() + byte_len(0xFF)
        );
    }

    #[test]
    fn test_unknown_id_matches_truncated_input() {
        let mut input = vec![0, 0, 0, 0x55, 2, 0, 0x12, 0x34];
        let clean = convert(&input).unwrap();
        input.extend([0x00, 0x55, 1, 0, 0x99]);
        assert_eq!(convert(&input).unwrap(), clean);
    }

    #[test]
    fn test_truncated_block_fails() {
        let result = convert(&[0, 0, 0, 0x55, 1, 0, 0x12, 0xAA, 9, 0, 1]);
        assert!(matches!(
            result,
            Err(ConvertError::TruncatedInput {
                block: 2,
                offset: 7,
                declared: 9,
                available: 1
            })
        ));
    }

    #[test]
    fn test_custom_silence() {
        let converter = Converter::with_config(ConverterConfig {
            leading_silence: 10,
            trailing_silence: 0,
        });
        let conversion = converter.encode(&[0, 0, 0]).unwrap();
        assert_eq!(conversion.samples.len(), 10 + file_sync_len());
        assert!(conversion.samples[..10].iter().all(|&s| s == SILENCE));
        assert_ne!(*conversion.samples.last().unwrap(), SILENCE);
    }

    #[test]
    fn test_duration() {
        let conversion = Converter::new().encode(&[0, 0, 0]).unwrap();
        assert!((conversion.duration_secs() - EMPTY_SAMPLES as f64 / 8000.0).abs() < 1e-9);
    }

    #[test]
    fn test_output_path_for() {
        assert_eq!(output_path_for(Path::new("dir/GAME.PTP")), PathBuf::from("dir/GAME.wav"));
        assert_eq!(output_path_for(Path::new("a.ptp")), PathBuf::from("a.wav"));
        assert_eq!(output_path_for(Path::new("tape.bin")), PathBuf::from("tape.bin.wav"));
        assert_eq!(output_path_for(Path::new("tape")), PathBuf::from("tape.wav"));
    }

    fn block_strategy() -> impl Strategy<Value = (bool, Vec<u8>)> {
        (any::<bool>(), proptest::collection::vec(any::<u8>(), 0..16))
    }

    proptest! {
        #[test]
        fn test_header_lengths_match_output(
            blocks in proptest::collection::vec(block_strategy(), 0..4),
            tail in proptest::collection::vec(any::<u8>(), 0..3),
        ) {
            let mut input = vec![0u8; 3];
            for (a, payload) in &blocks {
                input.push(if *a { 0x55 } else { 0xAA });
                input.extend((payload.len() as u16).to_le_bytes());
                input.extend(payload);
            }
            // Fewer than four trailing bytes never start a block.
            input.extend(&tail);

            let wav = convert(&input).unwrap();
            let data_len = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]) as usize;
            let riff_len = u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]) as usize;
            prop_assert_eq!(data_len, wav.len() - 44);
            prop_assert_eq!(riff_len, wav.len() - 8);
        }

        #[test]
        fn test_any_input_never_panics(input in proptest::collection::vec(any::<u8>(), 0..64)) {
            let _ = convert(&input);
        }
    }
}
