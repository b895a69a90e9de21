//! WAV container encoding.

use super::error::WavEncodeError;
use super::model::{AudioResult, WavBuffer};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Encode integer PCM audio into an in-memory WAV file.
///
/// The header carries the audio's sample rate, channel count and bit depth
/// verbatim; the data section holds `frames * channels * bit_depth / 8`
/// bytes of little-endian PCM.
pub fn encode_wav(audio: &AudioResult) -> Result<WavBuffer, WavEncodeError> {
    validate(audio)?;

    let spec = WavSpec {
        channels: audio.channel_count,
        sample_rate: audio.sample_rate,
        bits_per_sample: audio.bit_depth,
        sample_format: SampleFormat::Int,
    };

    let data_len = audio.samples.len() * (audio.bit_depth as usize / 8);
    let mut cursor = Cursor::new(Vec::with_capacity(data_len + 68));

    {
        let mut writer =
            WavWriter::new(&mut cursor, spec).map_err(|e| map_hound(e, audio.bit_depth))?;
        for &sample in &audio.samples {
            writer
                .write_sample(sample)
                .map_err(|e| map_hound(e, audio.bit_depth))?;
        }
        writer.finalize().map_err(|e| map_hound(e, audio.bit_depth))?;
    }

    Ok(WavBuffer::new(cursor.into_inner(), audio))
}

fn validate(audio: &AudioResult) -> Result<(), WavEncodeError> {
    if audio.sample_rate == 0 {
        return Err(WavEncodeError::ZeroSampleRate);
    }
    if audio.channel_count == 0 {
        return Err(WavEncodeError::ZeroChannels);
    }
    if !matches!(audio.bit_depth, 8 | 16 | 24 | 32) {
        return Err(WavEncodeError::UnsupportedBitDepth(audio.bit_depth));
    }
    if audio.samples.len() % audio.channel_count as usize != 0 {
        return Err(WavEncodeError::PartialFrame {
            samples: audio.samples.len(),
            channels: audio.channel_count,
        });
    }
    Ok(())
}

fn map_hound(err: hound::Error, bit_depth: u16) -> WavEncodeError {
    match err {
        hound::Error::TooWide => WavEncodeError::SampleOutOfRange(bit_depth),
        other => WavEncodeError::Writer(other.to_string()),
    }
}
