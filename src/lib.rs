//! # Sonoscope - Audio Spectral Analysis Engine
//!
//! Turns a decoded sample buffer into the three canonical inspection views:
//! time-domain waveform, time-frequency spectrogram and frequency-domain
//! periodogram, plus scalar measurements (duration, RMS amplitude, power).
//!
//! ## Architecture
//!
//! Sonoscope is an umbrella crate coordinating:
//! - **sonoscope-core** - Sample buffers, trim/mix, measurements, waveform
//!   summaries
//! - **sonoscope-spectral** - Window functions, FFT engine, STFT spectrogram,
//!   Welch periodogram
//! - **sonoscope-session** - Interactive session controller (coalescing
//!   recomputation, result cache, lock-free publication)
//!
//! Codec I/O, capture and rendering are external collaborators: the engine
//! consumes decoded samples and produces plain numeric structures. A renderer
//! maps spectrogram/periodogram values to color and draws the axes.
//!
//! ## Quick Start
//!
//! ```rust
//! use sonoscope::{SampleBuffer, SessionController, SessionParameters};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! // Decoded by the codec collaborator.
//! let samples: Vec<f32> = (0..44_100)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44_100.0).sin())
//!     .collect();
//! let buffer = Arc::new(SampleBuffer::from_mono(44_100, samples)?);
//!
//! let controller = SessionController::new(SessionParameters::new(buffer));
//! controller.wait_for_update(Duration::from_secs(5));
//!
//! let views = controller.current_views().expect("initial views");
//! assert!(!views.spectrogram.time_bins.is_empty());
//!
//! // Interactive parameter changes trigger coalesced recomputation.
//! controller.mutate(|p| p.set_window_length(2048))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Core analysis plus the session controller
//! - `session` - Interactive session controller
//! - `serialization` - serde derives on the result structs

/// Re-export of sonoscope-core for direct access
pub use sonoscope_core as core;

/// Re-export of sonoscope-spectral for direct access
pub use sonoscope_spectral as spectral;

// Buffers and measurements
pub use sonoscope_core::{
    measure, measure_channel, rms_of, waveform_summary, AnalysisError, Measurements, Result,
    SampleBuffer, WaveformBlock, WaveformSummary,
};

// Spectral analysis
pub use sonoscope_spectral::{
    bin_frequency, freq_resolution, periodogram, spectrogram, FftEngine, PeriodogramConfig,
    PeriodogramResult, Scale, SpectrogramResult, WindowKind, WindowSpec,
};

// Session subsystem
#[cfg(feature = "session")]
pub use sonoscope_session as session;

#[cfg(feature = "session")]
pub use sonoscope_session::{
    compute_views, AnalysisViews, SessionController, SessionError, SessionParameters,
};
