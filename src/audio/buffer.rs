//! Immutable mono PCM buffer shared by every analysed frame.

use crate::error::{VizError, VizResult};

/// Decoded mono narration track
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer from mono samples at `sample_rate` Hz
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> VizResult<Self> {
        if sample_rate == 0 {
            return Err(VizError::invalid_config("sample rate must be > 0"));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Create a mono buffer by averaging interleaved channel values frame by frame
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(
        interleaved: &[f32],
        channels: usize,
        sample_rate: u32,
    ) -> VizResult<Self> {
        if channels == 0 {
            return Err(VizError::invalid_config("channel count must be > 0"));
        }
        let samples = if channels == 1 {
            interleaved.to_vec()
        } else {
            interleaved
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect()
        };
        Self::new(samples, sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate (Hz)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Track length in seconds (`len / sample_rate`)
    pub fn duration_s(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value, or 1.0 for a silent track
    pub fn peak_amplitude(&self) -> f32 {
        let peak = self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        if peak > 0.0 {
            peak
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let buffer = AudioBuffer::new(vec![0.0; 2000], 1000).unwrap();
        assert_eq!(buffer.len(), 2000);
        assert!((buffer.duration_s() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        assert!(AudioBuffer::new(vec![0.0; 10], 0).is_err());
    }

    #[test]
    fn test_downmix_averages_channels() {
        let interleaved = [1.0, 0.0, 0.5, -0.5, -1.0, -1.0, 0.25];
        let buffer = AudioBuffer::from_interleaved(&interleaved, 2, 8000).unwrap();
        // Trailing half frame dropped
        assert_eq!(buffer.samples(), &[0.5, 0.0, -1.0]);
    }

    #[test]
    fn test_peak_amplitude() {
        let buffer = AudioBuffer::new(vec![0.1, -0.8, 0.3], 100).unwrap();
        assert_eq!(buffer.peak_amplitude(), 0.8);

        let silent = AudioBuffer::new(vec![0.0; 4], 100).unwrap();
        assert_eq!(silent.peak_amplitude(), 1.0);
    }
}
