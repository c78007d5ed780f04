//! Forward FFT with power-of-two zero padding.
//!
//! Inputs of arbitrary length are zero-padded to the next power of two so the
//! planner always runs radix-2 transforms. The result is the DFT of the
//! padded sequence: callers needing exact frequencies must use the padded
//! length for bin spacing (`freq_resolution = sample_rate / padded_len`).

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use sonoscope_core::{AnalysisError, Result};
use std::sync::Arc;

/// Forward FFT engine with plan reuse.
pub struct FftEngine {
    planner: FftPlanner<f64>,
}

impl FftEngine {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Padded transform length for an input of `len` samples.
    pub fn padded_len(len: usize) -> usize {
        len.next_power_of_two()
    }

    /// Plan a forward transform of the padded length for `len` input samples.
    ///
    /// The returned plan is `Send + Sync` and can be shared across a parallel
    /// frame loop; each worker supplies its own buffer.
    pub fn plan(&mut self, len: usize) -> Arc<dyn Fft<f64>> {
        self.planner.plan_fft_forward(Self::padded_len(len))
    }

    /// Complex DFT of a real-valued sequence, zero-padded to a power of two.
    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<Complex<f64>>> {
        if input.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "cannot transform an empty sequence".into(),
            ));
        }
        let padded = Self::padded_len(input.len());
        let mut buffer = vec![Complex::new(0.0, 0.0); padded];
        for (dst, &src) in buffer.iter_mut().zip(input.iter()) {
            *dst = Complex::new(src, 0.0);
        }
        self.planner.plan_fft_forward(padded).process(&mut buffer);
        Ok(buffer)
    }

    /// Complex DFT of a complex-valued sequence, zero-padded to a power of two.
    pub fn forward_complex(&mut self, input: &[Complex<f64>]) -> Result<Vec<Complex<f64>>> {
        if input.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "cannot transform an empty sequence".into(),
            ));
        }
        let padded = Self::padded_len(input.len());
        let mut buffer = vec![Complex::new(0.0, 0.0); padded];
        buffer[..input.len()].copy_from_slice(input);
        self.planner.plan_fft_forward(padded).process(&mut buffer);
        Ok(buffer)
    }

    /// One-sided magnitude spectrum: bins `0..=padded/2`.
    pub fn real_spectrum(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        let spectrum = self.forward(input)?;
        let n = spectrum.len();
        Ok(spectrum[..=n / 2].iter().map(|c| c.norm()).collect())
    }
}

impl Default for FftEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Frequency spacing between bins for a padded transform length.
pub fn freq_resolution(sample_rate: u32, padded_len: usize) -> f64 {
    sample_rate as f64 / padded_len as f64
}

/// Center frequency of `bin` for a padded transform length.
pub fn bin_frequency(bin: usize, sample_rate: u32, padded_len: usize) -> f64 {
    bin as f64 * freq_resolution(sample_rate, padded_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Direct O(N^2) DFT reference, on the same zero-padded length.
    fn direct_dft(input: &[f64]) -> Vec<Complex<f64>> {
        let n = FftEngine::padded_len(input.len());
        let mut padded = vec![0.0; n];
        padded[..input.len()].copy_from_slice(input);

        (0..n)
            .map(|k| {
                let mut acc = Complex::new(0.0, 0.0);
                for (i, &x) in padded.iter().enumerate() {
                    let angle = -2.0 * std::f64::consts::PI * (k * i) as f64 / n as f64;
                    acc += Complex::new(x, 0.0) * Complex::new(angle.cos(), angle.sin());
                }
                acc
            })
            .collect()
    }

    #[test]
    fn test_empty_input_rejected() {
        let mut engine = FftEngine::new();
        assert!(engine.forward(&[]).is_err());
        assert!(engine.forward_complex(&[]).is_err());
    }

    #[test]
    fn test_matches_direct_dft() {
        let mut engine = FftEngine::new();

        for n in [1usize, 2, 7, 16, 100] {
            let input: Vec<f64> = (0..n)
                .map(|i| (i as f64 * 0.37).sin() + 0.5 * (i as f64 * 1.7).cos())
                .collect();

            let fft = engine.forward(&input).unwrap();
            let dft = direct_dft(&input);
            assert_eq!(fft.len(), dft.len());

            let scale: f64 = dft.iter().map(|c| c.norm()).fold(0.0, f64::max).max(1e-30);
            for (a, b) in fft.iter().zip(dft.iter()) {
                assert!(
                    (a - b).norm() / scale < 1e-6,
                    "N={n}: {a} vs {b} exceeds 1e-6 relative error"
                );
            }
        }
    }

    #[test]
    fn test_padding_to_power_of_two() {
        let mut engine = FftEngine::new();
        let out = engine.forward(&vec![1.0; 100]).unwrap();
        assert_eq!(out.len(), 128);
        assert_eq!(FftEngine::padded_len(1), 1);
        assert_eq!(FftEngine::padded_len(1024), 1024);
        assert_eq!(FftEngine::padded_len(1025), 2048);
    }

    #[test]
    fn test_dc_component() {
        let mut engine = FftEngine::new();
        let out = engine.forward(&vec![1.0; 8]).unwrap();
        assert_relative_eq!(out[0].re, 8.0, epsilon = 1e-9);
        assert_relative_eq!(out[0].im, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_real_input_symmetry() {
        let mut engine = FftEngine::new();
        let input: Vec<f64> = (0..16).map(|i| (i as f64 * 0.9).sin()).collect();
        let out = engine.forward(&input).unwrap();
        // X[N-k] = conj(X[k]) for real input.
        for k in 1..8 {
            assert_relative_eq!(out[16 - k].re, out[k].re, epsilon = 1e-9);
            assert_relative_eq!(out[16 - k].im, -out[k].im, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_real_spectrum_bin_count() {
        let mut engine = FftEngine::new();
        let spectrum = engine.real_spectrum(&vec![0.5; 100]).unwrap();
        assert_eq!(spectrum.len(), 128 / 2 + 1);
        assert!(spectrum.iter().all(|&m| m >= 0.0));
    }

    #[test]
    fn test_bin_frequency_uses_padded_length() {
        assert_relative_eq!(freq_resolution(44_100, 1024), 43.066_406_25);
        assert_relative_eq!(bin_frequency(10, 44_100, 1024), 430.664_062_5);
    }
}
