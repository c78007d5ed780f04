//! # Sonoscope Session
//!
//! Interactive recomputation for the Sonoscope analysis engine.
//!
//! A [`SessionController`] owns the current [`SessionParameters`], runs the
//! analysis pipeline on a worker thread whenever parameters change, debounces
//! and coalesces rapid updates so only the newest parameter set is ever
//! computed, caches results per parameter tuple, and publishes immutable
//! [`AnalysisViews`] bundles lock-free for the renderer.
//!
//! ## Example
//!
//! ```rust
//! use sonoscope_core::SampleBuffer;
//! use sonoscope_session::{SessionController, SessionParameters};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let buffer = Arc::new(SampleBuffer::from_mono(44_100, vec![0.1; 44_100])?);
//! let controller = SessionController::new(SessionParameters::new(buffer));
//!
//! controller.wait_for_update(Duration::from_secs(5));
//! let views = controller.current_views().expect("initial views");
//! assert!(!views.spectrogram.time_bins.is_empty());
//!
//! controller.mutate(|p| p.set_window_length(2048))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod controller;
pub mod error;
pub mod params;
pub mod views;

pub use controller::{SessionAction, SessionController, SessionFsm, SessionState, DEBOUNCE};
pub use error::{Result, SessionError};
pub use params::{SessionParameters, DEFAULT_WINDOW_LENGTH};
pub use views::{compute_views, AnalysisViews, WAVEFORM_BLOCK_SIZE};
