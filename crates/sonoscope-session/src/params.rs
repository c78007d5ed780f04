//! Explicit session parameter state.
//!
//! All interactive state lives in a [`SessionParameters`] value owned by the
//! controller and passed by snapshot into each computation; there is no
//! process-wide mutable singleton. Every mutation leaves the set fully valid.

use crate::error::Result;
use sonoscope_core::{AnalysisError, SampleBuffer};
use sonoscope_spectral::{PeriodogramConfig, Scale, WindowKind, WindowSpec};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Default analysis window length in samples.
pub const DEFAULT_WINDOW_LENGTH: usize = 1024;

/// Parameter state for one interactive analysis session.
#[derive(Debug, Clone)]
pub struct SessionParameters {
    buffer: Arc<SampleBuffer>,
    trim: Option<(f64, f64)>,
    window: WindowSpec,
    scale: Scale,
    periodogram: PeriodogramConfig,
    color_scheme: String,
}

impl SessionParameters {
    /// Parameters over `buffer` with defaults: no trim, 1024-sample Hann
    /// window at 75 % overlap, power scale, default Welch config.
    pub fn new(buffer: Arc<SampleBuffer>) -> Self {
        Self {
            buffer,
            trim: None,
            window: WindowSpec::new(DEFAULT_WINDOW_LENGTH)
                .expect("BUG: the default window length is valid"),
            scale: Scale::Power,
            periodogram: PeriodogramConfig::default(),
            color_scheme: String::new(),
        }
    }

    pub fn buffer(&self) -> &Arc<SampleBuffer> {
        &self.buffer
    }

    pub fn trim(&self) -> Option<(f64, f64)> {
        self.trim
    }

    pub fn window(&self) -> &WindowSpec {
        &self.window
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn periodogram(&self) -> &PeriodogramConfig {
        &self.periodogram
    }

    pub fn color_scheme(&self) -> &str {
        &self.color_scheme
    }

    /// Replace the source buffer. A trim range that no longer fits the new
    /// buffer's duration is cleared.
    pub fn set_buffer(&mut self, buffer: Arc<SampleBuffer>) {
        if let Some((start, end)) = self.trim {
            if start < 0.0 || end > buffer.duration() || start >= end {
                self.trim = None;
            }
        }
        self.buffer = buffer;
    }

    /// Set the analyzed time range in seconds.
    ///
    /// Validated against the current buffer with the same rules as
    /// [`SampleBuffer::trim`]; the parameter set is unchanged on error.
    pub fn set_trim(&mut self, start_secs: f64, end_secs: f64) -> Result<()> {
        let duration = self.buffer.duration();
        if start_secs < 0.0 || end_secs > duration || start_secs >= end_secs {
            return Err(AnalysisError::Range {
                start: start_secs,
                end: end_secs,
                duration,
            }
            .into());
        }
        self.trim = Some((start_secs, end_secs));
        Ok(())
    }

    /// Analyze the whole buffer again.
    pub fn clear_trim(&mut self) {
        self.trim = None;
    }

    /// Set the spectrogram window length, keeping the kind and re-deriving
    /// the hop as `length / 4`.
    pub fn set_window_length(&mut self, length: usize) -> Result<()> {
        self.window = WindowSpec::with_hop(self.window.kind(), length, (length / 4).max(1))?;
        Ok(())
    }

    /// Set a fully specified window. [`WindowSpec`] values are validated at
    /// construction, so forwarding one cannot make the set invalid.
    pub fn set_window(&mut self, window: WindowSpec) {
        self.window = window;
    }

    /// Change only the window shape.
    pub fn set_window_kind(&mut self, kind: WindowKind) {
        self.window = self.window.with_kind(kind);
    }

    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    /// Set Welch estimation parameters; rejected if the overlap or segment
    /// length would be invalid, leaving the set unchanged.
    pub fn set_periodogram(&mut self, config: PeriodogramConfig) -> Result<()> {
        if !(0.0..1.0).contains(&config.overlap) {
            return Err(AnalysisError::InvalidInput(format!(
                "overlap must be in [0, 1), got {}",
                config.overlap
            ))
            .into());
        }
        if config.segment_length == Some(0) {
            return Err(
                AnalysisError::InvalidInput("segment length must be at least 1".into()).into(),
            );
        }
        self.periodogram = config;
        Ok(())
    }

    /// Renderer color scheme, opaque to the engine and echoed in the views.
    pub fn set_color_scheme(&mut self, scheme: impl Into<String>) {
        self.color_scheme = scheme.into();
    }

    /// Hash identifying this parameter tuple, used as the result cache key.
    pub fn cache_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.buffer.content_hash().hash(&mut hasher);
        match self.trim {
            Some((s, e)) => {
                1u8.hash(&mut hasher);
                s.to_bits().hash(&mut hasher);
                e.to_bits().hash(&mut hasher);
            }
            None => 0u8.hash(&mut hasher),
        }
        self.window.hash(&mut hasher);
        self.scale.hash(&mut hasher);
        self.periodogram.segment_length.hash(&mut hasher);
        self.periodogram.overlap.to_bits().hash(&mut hasher);
        self.periodogram.window.hash(&mut hasher);
        self.color_scheme.hash(&mut hasher);
        hasher.finish()
    }
}
