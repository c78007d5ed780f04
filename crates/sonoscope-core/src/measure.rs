//! Scalar measurements over a buffer: duration, RMS amplitude, power.

use crate::buffer::SampleBuffer;
use crate::error::{AnalysisError, Result};

/// Summary statistics for a clip or a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Measurements {
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// `sqrt(mean(x^2))`, same units as the samples.
    pub rms_amplitude: f64,
    /// `rms_amplitude^2`.
    pub power: f64,
}

/// Measure the whole buffer, downmixing channels sample-wise first.
///
/// An empty buffer yields zero duration and zero RMS rather than an error.
pub fn measure(buffer: &SampleBuffer) -> Measurements {
    let mono = buffer.mix_to_mono();
    let rms = rms_of(mono.channel(0).unwrap_or(&[]));
    Measurements {
        duration_secs: buffer.duration(),
        sample_rate: buffer.sample_rate(),
        rms_amplitude: rms,
        power: rms * rms,
    }
}

/// Measure a single channel.
pub fn measure_channel(buffer: &SampleBuffer, channel: usize) -> Result<Measurements> {
    let samples = buffer.channel(channel).ok_or_else(|| {
        AnalysisError::InvalidInput(format!(
            "channel {} out of range ({} channels)",
            channel,
            buffer.num_channels()
        ))
    })?;
    let rms = rms_of(samples);
    Ok(Measurements {
        duration_secs: buffer.duration(),
        sample_rate: buffer.sample_rate(),
        rms_amplitude: rms,
        power: rms * rms,
    })
}

/// RMS of a sample slice. NaN samples contribute zero so a corrupt decode
/// cannot poison the statistics.
pub fn rms_of(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples
        .iter()
        .map(|&s| {
            let s = if s.is_finite() { s as f64 } else { 0.0 };
            s * s
        })
        .sum();
    (sum_sq / samples.len() as f64).sqrt()
}
