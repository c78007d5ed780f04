//! STFT pipeline: overlapping windowed frames assembled into a
//! time-frequency matrix.
//!
//! The time-frequency trade-off is a property, not a bug: doubling the window
//! length halves temporal resolution and doubles frequency resolution.

use crate::fft::{self, FftEngine};
use crate::window::WindowSpec;
use rayon::prelude::*;
use rustfft::num_complex::Complex;
use sonoscope_core::{AnalysisError, Result};

/// How spectrum values are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Scale {
    /// Squared magnitude (default).
    #[default]
    Power,
    /// Linear magnitude.
    Magnitude,
}

/// Time-frequency matrix produced by [`spectrogram`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SpectrogramResult {
    /// Frame center times in seconds.
    pub time_bins: Vec<f64>,
    /// Frequency bin centers in Hz, `0..=sample_rate/2`.
    pub freq_bins: Vec<f64>,
    /// Non-negative values, time-major: `values[time][freq]`.
    pub values: Vec<Vec<f64>>,
}

impl SpectrogramResult {
    /// Number of time frames.
    pub fn num_frames(&self) -> usize {
        self.time_bins.len()
    }

    /// Number of frequency bins per frame.
    pub fn num_bins(&self) -> usize {
        self.freq_bins.len()
    }
}

/// Compute a spectrogram of one channel.
///
/// Frames start at sample 0 and advance by the spec's hop; the final partial
/// frame is zero-padded rather than dropped, so the full input duration is
/// covered. When the window length exceeds `samples.len()` (including an
/// empty input) a single zero-padded frame is produced instead of failing.
///
/// Each frame is windowed, transformed (the FFT zero-pads the window length
/// to a power of two), and the one-sided bins `0..=padded/2` retained, so the
/// frequency axis always reaches Nyquist; the mirrored upper half of the
/// real-input spectrum is discarded. Frame center time is
/// `(start + length/2) / sample_rate`.
pub fn spectrogram(
    samples: &[f32],
    sample_rate: u32,
    spec: &WindowSpec,
    scale: Scale,
) -> Result<SpectrogramResult> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "sample rate must be positive".into(),
        ));
    }

    let length = spec.length();
    let padded = FftEngine::padded_len(length);
    let num_bins = padded / 2 + 1;
    let weights = spec.weights();

    let starts: Vec<usize> = if samples.len() <= length {
        vec![0]
    } else {
        (0..samples.len()).step_by(spec.hop()).collect()
    };

    log::trace!(
        "spectrogram: {} samples, {} frames of {} (hop {}, padded {})",
        samples.len(),
        starts.len(),
        length,
        spec.hop(),
        padded
    );

    let plan = FftEngine::new().plan(length);

    // Frames are independent: each reads the immutable input and produces its
    // own row, so the loop parallelizes without shared mutable state.
    let values: Vec<Vec<f64>> = starts
        .par_iter()
        .map(|&start| {
            let mut buffer = vec![Complex::new(0.0, 0.0); padded];
            let avail = samples.len().saturating_sub(start).min(length);
            for i in 0..avail {
                let s = samples[start + i];
                let s = if s.is_finite() { s as f64 } else { 0.0 };
                buffer[i] = Complex::new(s * weights[i], 0.0);
            }
            plan.process(&mut buffer);

            buffer[..num_bins]
                .iter()
                .map(|c| match scale {
                    Scale::Power => c.norm_sqr(),
                    Scale::Magnitude => c.norm(),
                })
                .collect()
        })
        .collect();

    let sr = sample_rate as f64;
    let time_bins = starts
        .iter()
        .map(|&start| (start + length / 2) as f64 / sr)
        .collect();
    let freq_bins = (0..num_bins)
        .map(|k| fft::bin_frequency(k, sample_rate, padded))
        .collect();

    Ok(SpectrogramResult {
        time_bins,
        freq_bins,
        values,
    })
}
