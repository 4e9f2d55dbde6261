//! Windowed FFT analysis synchronised to the playback clock.

use rustfft::{num_complex::Complex, FftPlanner};

use super::AudioBuffer;

/// Magnitude spectrum for one analysis window (DC up to, not including, Nyquist)
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    magnitudes: Vec<f32>,
    /// Window length actually transformed (after clamping)
    window_len: usize,
}

impl Spectrum {
    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }
}

/// FFT analyzer with a cached planner
///
/// Plans are reused across frames; only the clamped window at the tail of a
/// track asks the planner for a new length.
pub struct SpectralAnalyzer {
    planner: FftPlanner<f32>,
    /// FFT input, transformed in place
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectralAnalyzer {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
            buffer: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// Compute the magnitude spectrum of the window starting at time `t_s`
    ///
    /// # Arguments
    /// * `buffer` - Decoded narration track
    /// * `t_s` - Seconds since narration start
    /// * `window_size` - Nominal window length (samples)
    ///
    /// # Returns
    /// * `None` when `t_s` is outside `(0, duration)` or the window is empty
    pub fn analyze(
        &mut self,
        buffer: &AudioBuffer,
        t_s: f64,
        window_size: usize,
    ) -> Option<Spectrum> {
        let in_range = t_s > 0.0 && t_s < buffer.duration_s();
        if !in_range {
            return None;
        }

        let (start, len) = window_bounds(buffer, t_s, window_size)?;
        let window = &buffer.samples()[start..start + len];

        // No taper: raw rectangular window
        self.buffer.clear();
        self.buffer.extend(window.iter().map(|&s| Complex::new(s, 0.0)));

        let fft = self.planner.plan_fft_forward(len);
        self.scratch.resize(fft.get_inplace_scratch_len(), Complex::new(0.0, 0.0));
        fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        // Normalise by the window length used, not the spectrum length
        let magnitudes = self.buffer[..len / 2]
            .iter()
            .map(|c| c.norm() / len as f32)
            .collect();

        Some(Spectrum {
            magnitudes,
            window_len: len,
        })
    }
}

/// Start index and clamped length of the analysis window at `t_s`
///
/// Returns `None` when nothing remains after the start index.
pub fn window_bounds(
    buffer: &AudioBuffer,
    t_s: f64,
    window_size: usize,
) -> Option<(usize, usize)> {
    let index = (t_s * buffer.sample_rate() as f64).floor() as usize;
    let remaining = buffer.len().checked_sub(index)?;
    let len = window_size.min(remaining);
    (len > 0).then_some((index, len))
}
