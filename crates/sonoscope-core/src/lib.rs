//! # Sonoscope Core
//!
//! Sample containers and scalar measurements for the Sonoscope
//! spectral-analysis engine.
//!
//! This crate provides:
//! - **SampleBuffer**: immutable multichannel sample data plus sample rate,
//!   with trim and mix operations that return new buffers
//! - **Measurements**: duration, RMS amplitude and power
//! - **Waveform summaries**: min/max/RMS blocks for rendering the time-domain
//!   view
//!
//! Decoding, capture and rendering are external collaborators; this crate
//! only deals in decoded samples and plain numeric results.

pub mod buffer;
pub mod error;
pub mod measure;
pub mod waveform;

pub use buffer::SampleBuffer;
pub use error::{AnalysisError, Result};
pub use measure::{measure, measure_channel, rms_of, Measurements};
pub use waveform::{waveform_summary, WaveformBlock, WaveformSummary};
