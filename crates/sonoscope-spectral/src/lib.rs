//! # Sonoscope Spectral
//!
//! Windowed transform computation and spectral estimation:
//! - **Window functions**: Hann, Hamming, Rectangular weight generation
//! - **FFT engine**: forward transforms with power-of-two zero padding
//! - **Spectrogram**: overlapping STFT frames as a time-frequency matrix
//! - **Periodogram**: Welch-averaged power spectral density
//!
//! All functions operate on raw sample slices; the buffer types live in
//! `sonoscope-core` and rendering belongs to an external collaborator.
//!
//! ## Example
//!
//! ```rust
//! use sonoscope_spectral::{
//!     periodogram, spectrogram, PeriodogramConfig, Scale, WindowSpec,
//! };
//!
//! let sample_rate = 44_100;
//! let samples: Vec<f32> = (0..sample_rate as usize)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate as f32).sin())
//!     .collect();
//!
//! let spec = WindowSpec::new(1024)?;
//! let sgram = spectrogram(&samples, sample_rate, &spec, Scale::Power)?;
//! let psd = periodogram(&samples, sample_rate, &PeriodogramConfig::default())?;
//! assert_eq!(sgram.freq_bins.len(), 513);
//! assert!(psd.peak_frequency().is_some());
//! # Ok::<(), sonoscope_core::AnalysisError>(())
//! ```

pub mod fft;
pub mod periodogram;
pub mod spectrogram;
pub mod window;

pub use fft::{bin_frequency, freq_resolution, FftEngine};
pub use periodogram::{
    periodogram, PeriodogramConfig, PeriodogramResult, DB_EPSILON, MAX_SEGMENT_LENGTH,
};
pub use spectrogram::{spectrogram, Scale, SpectrogramResult};
pub use window::{WindowKind, WindowSpec};
