//! Deterministic mono WAV encoder.
//!
//! Writes 16-bit PCM with no timestamps or variable metadata so that a
//! given sample buffer always produces byte-identical output. The BLAKE3
//! hash of the PCM data is carried alongside for content validation.

use std::io::{self, Write};

/// Result of encoding a sample buffer.
#[derive(Debug, Clone)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash (hex) of the raw PCM data.
    pub pcm_hash: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of samples encoded.
    pub num_samples: usize,
}

/// Encodes a mono f64 buffer as a complete 16-bit PCM WAV file.
pub fn encode_mono(samples: &[f64], sample_rate: u32) -> WavResult {
    let pcm = samples_to_pcm16(samples);
    let pcm_hash = blake3::hash(&pcm).to_hex().to_string();

    let mut wav_data = Vec::with_capacity(44 + pcm.len());
    write_wav(&mut wav_data, sample_rate, &pcm).expect("writing to Vec should not fail");

    WavResult {
        wav_data,
        pcm_hash,
        sample_rate,
        num_samples: samples.len(),
    }
}

/// Writes a complete mono WAV file to a writer.
pub fn write_wav<W: Write>(writer: &mut W, sample_rate: u32, pcm_data: &[u8]) -> io::Result<()> {
    const CHANNELS: u16 = 1;
    const BITS_PER_SAMPLE: u16 = 16;

    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate * block_align as u32;
    let data_size = pcm_data.len() as u32;
    let file_size = 36 + data_size; // Total file size minus 8 bytes for RIFF header

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?; // Chunk size (16 for PCM)
    writer.write_all(&1u16.to_le_bytes())?; // Audio format (1 = PCM)
    writer.write_all(&CHANNELS.to_le_bytes())?;
    writer.write_all(&sample_rate.to_le_bytes())?;
    writer.write_all(&byte_rate.to_le_bytes())?;
    writer.write_all(&block_align.to_le_bytes())?;
    writer.write_all(&BITS_PER_SAMPLE.to_le_bytes())?;

    // data chunk
    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;

    Ok(())
}

/// Converts f64 samples to little-endian 16-bit PCM bytes.
///
/// Samples outside [-1.0, 1.0] are clipped.
pub fn samples_to_pcm16(samples: &[f64]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);

    for &sample in samples {
        let clipped = sample.clamp(-1.0, 1.0);
        let pcm_value = (clipped * 32767.0).round() as i16;
        pcm.extend_from_slice(&pcm_value.to_le_bytes());
    }

    pcm
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wav_header() {
        let result = encode_mono(&[0.0, 0.5, -0.5], 44_100);

        assert_eq!(&result.wav_data[0..4], b"RIFF");
        assert_eq!(&result.wav_data[8..12], b"WAVE");
        assert_eq!(&result.wav_data[12..16], b"fmt ");
        assert_eq!(&result.wav_data[36..40], b"data");
        assert_eq!(result.wav_data.len(), 44 + 6);
    }

    #[test]
    fn test_pcm16_clipping() {
        let pcm = samples_to_pcm16(&[2.0, -2.0]);
        let hi = i16::from_le_bytes([pcm[0], pcm[1]]);
        let lo = i16::from_le_bytes([pcm[2], pcm[3]]);
        assert_eq!(hi, 32767);
        assert_eq!(lo, -32767);
    }

    #[test]
    fn test_encode_determinism() {
        let samples: Vec<f64> = (0..100).map(|i| (i as f64 / 100.0).sin()).collect();
        let a = encode_mono(&samples, 44_100);
        let b = encode_mono(&samples, 44_100);

        assert_eq!(a.wav_data, b.wav_data);
        assert_eq!(a.pcm_hash, b.pcm_hash);
    }

    #[test]
    fn test_pcm_hash_format() {
        let result = encode_mono(&[0.1; 64], 22_050);
        assert_eq!(result.pcm_hash.len(), 64);
        assert!(result.pcm_hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
