//! Reduction of a magnitude spectrum into normalized band intensities.

use super::Spectrum;

/// Normalized band intensities, one per controlled vertex group
///
/// Every value is in `[0, 1]`. The loudest band is exactly 1 unless the
/// spectrum was silent, in which case every band is 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandSet {
    values: Vec<f32>,
}

impl BandSet {
    /// Wrap already-normalized values
    pub fn from_normalized(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Band controlling vertex `vertex_index` (bands repeat cyclically)
    pub fn for_vertex(&self, vertex_index: usize) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values[vertex_index % self.values.len()]
    }

    /// Mean of the upper half of the bands (high-frequency proxy), 0 if empty
    pub fn upper_half_mean(&self) -> f32 {
        let upper = &self.values[self.values.len() / 2..];
        if upper.is_empty() {
            return 0.0;
        }
        upper.iter().sum::<f32>() / upper.len() as f32
    }
}

/// Partition `spectrum` into `requested_bands` equal-width ranges and normalize
///
/// The band count is capped at the spectrum length. Band `i` averages bins
/// `[i*len/n, (i+1)*len/n)`; an empty range counts as 0.
pub fn map_bands(spectrum: &Spectrum, requested_bands: usize) -> BandSet {
    let magnitudes = spectrum.magnitudes();
    let len = magnitudes.len();
    let num_bands = requested_bands.min(len);

    let mut values: Vec<f32> = (0..num_bands)
        .map(|i| {
            let start_idx = i * len / num_bands;
            let end_idx = (i + 1) * len / num_bands;
            let range = &magnitudes[start_idx..end_idx];
            if range.is_empty() {
                0.0
            } else {
                range.iter().sum::<f32>() / range.len() as f32
            }
        })
        .collect();

    // Silence keeps exact zeros: divide by 1, never by an epsilon
    let max_band = values.iter().fold(0.0f32, |acc, &v| acc.max(v));
    let divisor = if max_band > 0.0 { max_band } else { 1.0 };
    for value in &mut values {
        *value /= divisor;
    }

    BandSet { values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioBuffer, SpectralAnalyzer};

    fn spectrum_of(samples: Vec<f32>, sample_rate: u32, t_s: f64, window: usize) -> Spectrum {
        let buffer = AudioBuffer::new(samples, sample_rate).unwrap();
        SpectralAnalyzer::new()
            .analyze(&buffer, t_s, window)
            .unwrap()
    }

    fn noisy_spectrum() -> Spectrum {
        // Deterministic pseudo-noise
        let mut state = 0x2545_f491_u32;
        let samples = (0..4096)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect();
        spectrum_of(samples, 4096, 0.25, 1024)
    }

    #[test]
    fn test_band_count_and_range() {
        let spectrum = noisy_spectrum();
        assert_eq!(spectrum.len(), 512);

        for n in [1, 2, 7, 40, 511, 512] {
            let bands = map_bands(&spectrum, n);
            assert_eq!(bands.len(), n);
            assert!(bands.values().iter().all(|&v| (0.0..=1.0).contains(&v)));
            assert!(bands.values().iter().any(|&v| v == 1.0));
        }
    }

    #[test]
    fn test_band_count_capped_by_spectrum() {
        let spectrum = spectrum_of(vec![0.5, -0.5, 0.25, 0.0, 1.0, 0.0], 6, 0.1, 6);
        assert_eq!(spectrum.len(), 3);
        assert_eq!(map_bands(&spectrum, 40).len(), 3);
    }

    #[test]
    fn test_silence_stays_zero() {
        let spectrum = spectrum_of(vec![0.0; 2000], 1000, 0.5, 1024);
        let bands = map_bands(&spectrum, 40);
        assert_eq!(bands.len(), 40);
        assert!(bands.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_deterministic() {
        let spectrum = noisy_spectrum();
        let a = map_bands(&spectrum, 40);
        let b = map_bands(&spectrum, 40);
        let a_bits: Vec<u32> = a.values().iter().map(|v| v.to_bits()).collect();
        let b_bits: Vec<u32> = b.values().iter().map(|v| v.to_bits()).collect();
        assert_eq!(a_bits, b_bits);
    }

    #[test]
    fn test_empty_spectrum_gives_no_bands() {
        let spectrum = spectrum_of(vec![0.3; 10], 10, 0.95, 1024);
        assert!(map_bands(&spectrum, 40).is_empty());
    }

    #[test]
    fn test_for_vertex_cycles() {
        let bands = BandSet::from_normalized(vec![0.0, 0.5, 1.0]);
        assert_eq!(bands.for_vertex(0), 0.0);
        assert_eq!(bands.for_vertex(4), 0.5);
        assert_eq!(bands.for_vertex(5), 1.0);
        assert_eq!(BandSet::default().for_vertex(3), 0.0);
    }

    #[test]
    fn test_upper_half_mean() {
        let bands = BandSet::from_normalized(vec![1.0, 1.0, 0.2, 0.6]);
        assert!((bands.upper_half_mean() - 0.4).abs() < 1e-6);

        // Single band: upper half is the whole set
        assert_eq!(BandSet::from_normalized(vec![0.8]).upper_half_mean(), 0.8);
        assert_eq!(BandSet::default().upper_half_mean(), 0.0);
    }
}
