//! The published output bundle and the pipeline that produces it.

use crate::error::Result;
use crate::params::SessionParameters;
use sonoscope_core::{measure, waveform_summary, Measurements, SampleBuffer, WaveformSummary};
use sonoscope_spectral::{periodogram, spectrogram, PeriodogramResult, SpectrogramResult};

/// Samples per waveform summary block.
pub const WAVEFORM_BLOCK_SIZE: usize = 512;

/// One complete set of renderable analysis outputs.
///
/// Immutable once published; a new computation always produces a new
/// `AnalysisViews` rather than mutating a shared one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AnalysisViews {
    /// Time-domain view: min/max/RMS blocks of the downmixed signal.
    pub waveform: WaveformSummary,
    /// Time-frequency view.
    pub spectrogram: SpectrogramResult,
    /// Frequency-domain view.
    pub periodogram: PeriodogramResult,
    /// Scalar measurements over the analyzed range.
    pub measurements: Measurements,
    /// Renderer color scheme, echoed unchanged from the parameters.
    pub color_scheme: String,
    /// Cache key of the parameter tuple that produced these views.
    pub params_key: u64,
}

/// Run the full pipeline for one parameter snapshot.
///
/// Trims (if requested), downmixes to mono, and computes all three views
/// plus measurements. Synchronous; the session controller calls this from
/// its worker thread, but it is equally usable for one-shot analysis.
pub fn compute_views(params: &SessionParameters) -> Result<AnalysisViews> {
    let working: SampleBuffer = match params.trim() {
        Some((start, end)) => params.buffer().trim(start, end)?,
        None => params.buffer().as_ref().clone(),
    };

    let measurements = measure(&working);
    let mono = working.mix_to_mono();
    let samples = mono.channel(0).unwrap_or(&[]);

    let waveform = waveform_summary(samples, WAVEFORM_BLOCK_SIZE);
    let sgram = spectrogram(
        samples,
        working.sample_rate(),
        params.window(),
        params.scale(),
    )?;
    let psd = periodogram(samples, working.sample_rate(), params.periodogram())?;

    Ok(AnalysisViews {
        waveform,
        spectrogram: sgram,
        periodogram: psd,
        measurements,
        color_scheme: params.color_scheme().to_string(),
        params_key: params.cache_key(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn sine_buffer(freq: f64, sample_rate: u32, secs: f64) -> Arc<SampleBuffer> {
        let len = (sample_rate as f64 * secs) as usize;
        let samples: Vec<f32> = (0..len)
            .map(|i| {
                (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin() as f32
            })
            .collect();
        Arc::new(SampleBuffer::from_mono(sample_rate, samples).unwrap())
    }

    #[test]
    fn test_full_pipeline() {
        let params = SessionParameters::new(sine_buffer(440.0, 44_100, 1.0));
        let views = compute_views(&params).unwrap();

        assert!(!views.waveform.is_empty());
        assert_eq!(views.spectrogram.freq_bins.len(), 513);
        assert!(!views.periodogram.power.is_empty());
        assert_relative_eq!(views.measurements.duration_secs, 1.0, max_relative = 1e-9);
        assert_relative_eq!(
            views.measurements.rms_amplitude,
            1.0 / std::f64::consts::SQRT_2,
            max_relative = 1e-3
        );
        assert_eq!(views.params_key, params.cache_key());
    }

    #[test]
    fn test_trim_narrows_the_analyzed_range() {
        let mut params = SessionParameters::new(sine_buffer(440.0, 44_100, 2.0));
        params.set_trim(0.0, 0.5).unwrap();

        let views = compute_views(&params).unwrap();
        assert_relative_eq!(views.measurements.duration_secs, 0.5, max_relative = 1e-6);
    }

    #[test]
    fn test_color_scheme_passthrough() {
        let mut params = SessionParameters::new(sine_buffer(440.0, 44_100, 0.2));
        params.set_color_scheme("magma");
        let views = compute_views(&params).unwrap();
        assert_eq!(views.color_scheme, "magma");
    }
}
