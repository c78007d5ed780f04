//! Analysis window functions.
//!
//! Window kinds are a closed enum dispatched by a pure weight-generation
//! function, so every case can be tested exhaustively.

use sonoscope_core::{AnalysisError, Result};

/// Analysis window shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum WindowKind {
    /// Hann window (default, good general-purpose choice).
    #[default]
    Hann,
    /// Hamming window.
    Hamming,
    /// Rectangular window (all ones).
    Rectangular,
}

impl WindowKind {
    /// Generate `len` non-negative weights for this window.
    ///
    /// `len == 1` returns `[1.0]` for every kind (no division by zero);
    /// `len == 0` returns an empty vector.
    pub fn weights(&self, len: usize) -> Vec<f64> {
        if len == 0 {
            return Vec::new();
        }
        if len == 1 {
            return vec![1.0];
        }

        let nm1 = (len - 1) as f64;
        match self {
            WindowKind::Hann => (0..len)
                .map(|i| {
                    let angle = 2.0 * std::f64::consts::PI * i as f64 / nm1;
                    0.5 * (1.0 - angle.cos())
                })
                .collect(),
            WindowKind::Hamming => (0..len)
                .map(|i| {
                    let angle = 2.0 * std::f64::consts::PI * i as f64 / nm1;
                    0.54 - 0.46 * angle.cos()
                })
                .collect(),
            WindowKind::Rectangular => vec![1.0; len],
        }
    }
}

/// Windowing parameters for framed analysis.
///
/// The hop controls overlap between consecutive frames; the default is
/// `length / 4` (75 % overlap), standard spectrogram practice. Fields are
/// private so a value cannot exist with a zero length or a hop outside
/// `1..=length`; every constructor validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct WindowSpec {
    kind: WindowKind,
    length: usize,
    hop: usize,
}

impl WindowSpec {
    /// Hann window of `length` samples with the default 75 % overlap.
    pub fn new(length: usize) -> Result<Self> {
        Self::with_hop(WindowKind::Hann, length, (length / 4).max(1))
    }

    /// Fully specified window.
    pub fn with_hop(kind: WindowKind, length: usize, hop: usize) -> Result<Self> {
        if length == 0 {
            return Err(AnalysisError::InvalidInput(
                "window length must be at least 1".into(),
            ));
        }
        if hop == 0 || hop > length {
            return Err(AnalysisError::InvalidInput(format!(
                "hop must be in 1..={length}, got {hop}"
            )));
        }
        Ok(Self { kind, length, hop })
    }

    /// Same length and hop with a different shape. Cannot invalidate the
    /// geometry, so it needs no `Result`.
    pub fn with_kind(self, kind: WindowKind) -> Self {
        Self { kind, ..self }
    }

    /// Window shape.
    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    /// Frame length in samples, always at least 1.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Advance between frame starts in samples, always in `1..=length`.
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Weights for this spec's kind and length.
    pub fn weights(&self) -> Vec<f64> {
        self.kind.weights(self.length)
    }
}
