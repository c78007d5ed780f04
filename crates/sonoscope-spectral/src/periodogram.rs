//! Welch-averaged power spectral density.
//!
//! Averaging windowed, overlapping segments trades frequency resolution for
//! variance reduction; with a single segment the estimate degenerates to one
//! windowed FFT's power spectrum.

use crate::fft::{self, FftEngine};
use crate::window::WindowKind;
use rayon::prelude::*;
use rustfft::num_complex::Complex;
use sonoscope_core::{AnalysisError, Result};

/// Cap on the default segment length, to bound FFT cost on long clips.
pub const MAX_SEGMENT_LENGTH: usize = 8192;

/// Floor applied before the dB conversion so silent bins stay finite.
pub const DB_EPSILON: f64 = 1e-12;

/// Welch estimation parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PeriodogramConfig {
    /// Segment length in samples. `None` uses the full buffer length, capped
    /// at [`MAX_SEGMENT_LENGTH`]. Values longer than the input are clamped to
    /// the input length (single-segment case).
    pub segment_length: Option<usize>,
    /// Fractional overlap between consecutive segments, `0.0..1.0`.
    pub overlap: f64,
    /// Window applied to each segment.
    pub window: WindowKind,
}

impl Default for PeriodogramConfig {
    fn default() -> Self {
        Self {
            segment_length: None,
            overlap: 0.5,
            window: WindowKind::Hann,
        }
    }
}

impl PeriodogramConfig {
    /// Fixed segment length with the default 50 % overlap and Hann window.
    pub fn with_segment_length(segment_length: usize) -> Self {
        Self {
            segment_length: Some(segment_length),
            ..Default::default()
        }
    }
}

/// Averaged power spectral density for one channel.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PeriodogramResult {
    /// Frequency bin centers in Hz, `0..=sample_rate/2`.
    pub freq_bins: Vec<f64>,
    /// Averaged power per bin, aligned with `freq_bins`.
    pub power: Vec<f64>,
    /// `10 * log10(max(power, epsilon))`.
    pub power_db: Vec<f64>,
}

impl PeriodogramResult {
    /// Frequency of the power-maximizing bin.
    pub fn peak_frequency(&self) -> Option<f64> {
        self.power
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| self.freq_bins[i])
    }
}

/// Compute a Welch periodogram of one channel.
///
/// Segments are windowed, transformed, square-magnituded and averaged
/// bin-wise. Per-segment power is normalized by the window's sum of squared
/// weights, so the single-segment case equals that windowed FFT's power
/// spectrum exactly. A trailing partial segment is dropped (standard Welch);
/// at least one segment is always computed.
pub fn periodogram(
    samples: &[f32],
    sample_rate: u32,
    config: &PeriodogramConfig,
) -> Result<PeriodogramResult> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "sample rate must be positive".into(),
        ));
    }
    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "cannot estimate a spectrum from an empty signal".into(),
        ));
    }
    if config.segment_length == Some(0) {
        return Err(AnalysisError::InvalidInput(
            "segment length must be at least 1".into(),
        ));
    }
    if !(0.0..1.0).contains(&config.overlap) {
        return Err(AnalysisError::InvalidInput(format!(
            "overlap must be in [0, 1), got {}",
            config.overlap
        )));
    }

    let seg_len = config
        .segment_length
        .unwrap_or(samples.len().min(MAX_SEGMENT_LENGTH))
        .min(samples.len());
    let hop = ((seg_len as f64 * (1.0 - config.overlap)).round() as usize).max(1);

    let mut starts = Vec::new();
    let mut start = 0usize;
    while start + seg_len <= samples.len() {
        starts.push(start);
        start += hop;
    }
    debug_assert!(!starts.is_empty());

    let weights = config.window.weights(seg_len);
    let window_ssq: f64 = weights.iter().map(|w| w * w).sum();
    let padded = FftEngine::padded_len(seg_len);
    let num_bins = seg_len / 2 + 1;
    let plan = FftEngine::new().plan(seg_len);

    log::trace!(
        "periodogram: {} samples, {} segments of {} (hop {}, padded {})",
        samples.len(),
        starts.len(),
        seg_len,
        hop,
        padded
    );

    let summed: Vec<f64> = starts
        .par_iter()
        .map(|&seg_start| {
            let mut buffer = vec![Complex::new(0.0, 0.0); padded];
            for i in 0..seg_len {
                let s = samples[seg_start + i];
                let s = if s.is_finite() { s as f64 } else { 0.0 };
                buffer[i] = Complex::new(s * weights[i], 0.0);
            }
            plan.process(&mut buffer);

            buffer[..num_bins]
                .iter()
                .map(|c| c.norm_sqr() / window_ssq)
                .collect::<Vec<f64>>()
        })
        .reduce(
            || vec![0.0; num_bins],
            |mut acc, seg| {
                for (a, s) in acc.iter_mut().zip(seg.iter()) {
                    *a += s;
                }
                acc
            },
        );

    let num_segments = starts.len() as f64;
    let power: Vec<f64> = summed.into_iter().map(|p| p / num_segments).collect();
    let power_db = power
        .iter()
        .map(|&p| 10.0 * p.max(DB_EPSILON).log10())
        .collect();
    let freq_bins = (0..num_bins)
        .map(|k| fft::bin_frequency(k, sample_rate, padded))
        .collect();

    Ok(PeriodogramResult {
        freq_bins,
        power,
        power_db,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sine(freq: f64, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin() as f32
            })
            .collect()
    }

    #[test]
    fn test_empty_input_rejected() {
        let result = periodogram(&[], 44_100, &PeriodogramConfig::default());
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let samples = sine(440.0, 44_100, 1024);
        assert!(periodogram(&samples, 44_100, &PeriodogramConfig::with_segment_length(0)).is_err());

        let bad_overlap = PeriodogramConfig {
            overlap: 1.0,
            ..Default::default()
        };
        assert!(periodogram(&samples, 44_100, &bad_overlap).is_err());
    }

    #[test]
    fn test_degenerates_to_single_windowed_fft() {
        let samples = sine(440.0, 44_100, 2000);
        let config = PeriodogramConfig::with_segment_length(4096); // longer than input
        let result = periodogram(&samples, 44_100, &config).unwrap();

        // Reference: one full-length windowed FFT's power spectrum.
        let weights = WindowKind::Hann.weights(samples.len());
        let ssq: f64 = weights.iter().map(|w| w * w).sum();
        let windowed: Vec<f64> = samples
            .iter()
            .zip(weights.iter())
            .map(|(&s, &w)| s as f64 * w)
            .collect();
        let spectrum = FftEngine::new().forward(&windowed).unwrap();

        assert_eq!(result.power.len(), samples.len() / 2 + 1);
        for (k, &p) in result.power.iter().enumerate() {
            assert_relative_eq!(
                p,
                spectrum[k].norm_sqr() / ssq,
                epsilon = 1e-12,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_sine_peak_within_one_bin() {
        // 2 s of a pure 440 Hz tone at 44100 Hz, analyzed in 1024-sample
        // Hann segments: the peak must land within one bin of 440 Hz.
        let sample_rate = 44_100;
        let samples = sine(440.0, sample_rate, 2 * sample_rate as usize);
        let config = PeriodogramConfig::with_segment_length(1024);
        let result = periodogram(&samples, sample_rate, &config).unwrap();

        let resolution = fft::freq_resolution(sample_rate, 1024);
        let peak = result.peak_frequency().unwrap();
        assert!(
            (peak - 440.0).abs() <= resolution,
            "peak {peak} Hz not within {resolution} Hz of 440 Hz"
        );
    }

    #[test]
    fn test_silence_floors_to_epsilon_db() {
        let samples = vec![0.0f32; 8192];
        let config = PeriodogramConfig::with_segment_length(1024);
        let result = periodogram(&samples, 44_100, &config).unwrap();

        let floor_db = 10.0 * DB_EPSILON.log10();
        for (&p, &db) in result.power.iter().zip(result.power_db.iter()) {
            assert_eq!(p, 0.0);
            assert_relative_eq!(db, floor_db);
        }
    }

    #[test]
    fn test_averaging_reduces_variance() {
        // White-ish noise via a deterministic LCG: averaged estimate should
        // vary less across bins than the single-segment estimate.
        let mut state = 0x2545F491_4F6CDD1Du64;
        let noise: Vec<f32> = (0..32_768)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                ((state >> 40) as f32 / (1u32 << 24) as f32) - 0.5
            })
            .collect();

        let averaged = periodogram(
            &noise,
            44_100,
            &PeriodogramConfig::with_segment_length(1024),
        )
        .unwrap();
        let single = periodogram(
            &noise,
            44_100,
            &PeriodogramConfig::with_segment_length(32_768),
        )
        .unwrap();

        let rel_var = |p: &[f64]| {
            // Skip DC and Nyquist edges.
            let inner = &p[1..p.len() - 1];
            let mean: f64 = inner.iter().sum::<f64>() / inner.len() as f64;
            let var: f64 =
                inner.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / inner.len() as f64;
            var / (mean * mean)
        };

        assert!(rel_var(&averaged.power) < rel_var(&single.power));
    }

    #[test]
    fn test_default_segment_cap() {
        let samples = sine(440.0, 44_100, 100_000);
        let result = periodogram(&samples, 44_100, &PeriodogramConfig::default()).unwrap();
        assert_eq!(result.power.len(), MAX_SEGMENT_LENGTH / 2 + 1);
    }
}
