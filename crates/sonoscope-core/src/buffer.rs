//! Multichannel sample buffers.
//!
//! A [`SampleBuffer`] is produced once by the decoder/capture collaborator and
//! owned read-only by the engine afterwards. Trim and mix return new buffers
//! instead of mutating in place, so cached results and concurrent readers
//! never observe a change.

use crate::error::{AnalysisError, Result};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Immutable multichannel sample data plus sample rate.
///
/// All channels have equal length; length may be zero. Samples are nominally
/// in `[-1, 1]` but out-of-range and non-finite values are accepted and must
/// not panic downstream.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SampleBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    /// Create a buffer from per-channel sample vectors.
    ///
    /// Rejects a zero sample rate, an empty channel list, and ragged channel
    /// lengths.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "sample rate must be positive".into(),
            ));
        }
        if channels.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "buffer needs at least one channel".into(),
            ));
        }
        let len = channels[0].len();
        if channels.iter().any(|c| c.len() != len) {
            return Err(AnalysisError::InvalidInput(
                "all channels must have equal length".into(),
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Convenience constructor for a single channel.
    pub fn from_mono(sample_rate: u32, samples: Vec<f32>) -> Result<Self> {
        Self::new(sample_rate, vec![samples])
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples per channel.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Samples of one channel, if it exists.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(|c| c.as_slice())
    }

    /// All channels.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// New buffer holding samples in `[round(start*sr), round(end*sr))`.
    ///
    /// Fails with [`AnalysisError::Range`] when `start < 0`, `end` exceeds the
    /// buffer duration, or `start >= end`. The source buffer is unchanged on
    /// error.
    pub fn trim(&self, start_secs: f64, end_secs: f64) -> Result<Self> {
        let duration = self.duration();
        if start_secs < 0.0 || end_secs > duration || start_secs >= end_secs {
            return Err(AnalysisError::Range {
                start: start_secs,
                end: end_secs,
                duration,
            });
        }

        let sr = self.sample_rate as f64;
        let start = (start_secs * sr).round() as usize;
        let end = ((end_secs * sr).round() as usize).min(self.len());
        let start = start.min(end);

        let channels = self
            .channels
            .iter()
            .map(|c| c[start..end].to_vec())
            .collect();

        Ok(Self {
            sample_rate: self.sample_rate,
            channels,
        })
    }

    /// New single-channel buffer: arithmetic mean across channels per index.
    ///
    /// Identity for mono input (the channel is copied unchanged).
    pub fn mix_to_mono(&self) -> Self {
        if self.num_channels() == 1 {
            return self.clone();
        }

        let scale = 1.0 / self.num_channels() as f32;
        let mut mono = vec![0.0f32; self.len()];
        for channel in &self.channels {
            for (acc, &s) in mono.iter_mut().zip(channel.iter()) {
                *acc += s;
            }
        }
        for s in &mut mono {
            *s *= scale;
        }

        Self {
            sample_rate: self.sample_rate,
            channels: vec![mono],
        }
    }

    /// New single-channel buffer using custom per-channel weights.
    ///
    /// `weights.len()` must match the channel count.
    pub fn mix_weighted(&self, weights: &[f32]) -> Result<Self> {
        if weights.len() != self.num_channels() {
            return Err(AnalysisError::InvalidInput(format!(
                "expected {} mix weights, got {}",
                self.num_channels(),
                weights.len()
            )));
        }

        let mut mono = vec![0.0f32; self.len()];
        for (channel, &w) in self.channels.iter().zip(weights.iter()) {
            for (acc, &s) in mono.iter_mut().zip(channel.iter()) {
                *acc += s * w;
            }
        }

        Ok(Self {
            sample_rate: self.sample_rate,
            channels: vec![mono],
        })
    }

    /// Hash of the buffer contents, for use as a cache key component.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.sample_rate.hash(&mut hasher);
        self.channels.len().hash(&mut hasher);
        for channel in &self.channels {
            channel.len().hash(&mut hasher);
            for &s in channel {
                s.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}
