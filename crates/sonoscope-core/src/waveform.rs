//! Waveform summaries for visualization.
//!
//! A renderer cannot draw millions of raw samples; it draws min/max/RMS
//! blocks. This is the time-domain view in renderable form.

/// A single block of waveform summary data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct WaveformBlock {
    /// Minimum sample value in this block.
    pub min: f32,
    /// Maximum sample value in this block.
    pub max: f32,
    /// RMS level of this block.
    pub rms: f32,
}

/// Waveform summary for a single channel.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct WaveformSummary {
    /// Summary blocks.
    pub blocks: Vec<WaveformBlock>,
    /// Number of samples per block.
    pub samples_per_block: usize,
    /// Total number of samples summarized.
    pub total_samples: usize,
}

impl WaveformSummary {
    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether there are no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Overall peak level.
    pub fn peak(&self) -> f32 {
        self.blocks
            .iter()
            .map(|b| b.min.abs().max(b.max.abs()))
            .fold(0.0f32, |a, b| a.max(b))
    }

    /// Average RMS level across blocks.
    pub fn average_rms(&self) -> f32 {
        if self.blocks.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.blocks.iter().map(|b| b.rms).sum();
        sum / self.blocks.len() as f32
    }
}

/// Summarize mono samples into min/max/RMS blocks.
pub fn waveform_summary(samples: &[f32], samples_per_block: usize) -> WaveformSummary {
    if samples.is_empty() || samples_per_block == 0 {
        return WaveformSummary {
            samples_per_block,
            ..Default::default()
        };
    }

    let num_blocks = samples.len().div_ceil(samples_per_block);
    let mut blocks = Vec::with_capacity(num_blocks);

    for chunk in samples.chunks(samples_per_block) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        let mut sum_sq = 0.0f32;

        for &s in chunk {
            min = min.min(s);
            max = max.max(s);
            sum_sq += s * s;
        }

        blocks.push(WaveformBlock {
            min,
            max,
            rms: (sum_sq / chunk.len() as f32).sqrt(),
        });
    }

    WaveformSummary {
        blocks,
        samples_per_block,
        total_samples: samples.len(),
    }
}
