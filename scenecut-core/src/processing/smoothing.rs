//! Gaussian smoothing of the change signal.
//!
//! The filter is a zero-order Gaussian convolution truncated at three standard
//! deviations (a kernel of about 6*sigma+1 taps). Edges are handled in
//! reflect mode (`d c b a | a b c d | d c b a`), so a constant signal is
//! returned unchanged.

use crate::error::{CoreError, CoreResult};

/// Kernel half-width in standard deviations.
const TRUNCATE: f64 = 3.0;

/// Smooths `signal` with a Gaussian of standard deviation `sigma` samples.
///
/// # Returns
///
/// * `Ok(Vec<f64>)` - Same length as the input
/// * `Err(CoreError::Config)` - If sigma is not a positive finite number
pub fn smooth(signal: &[f64], sigma: f64) -> CoreResult<Vec<f64>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CoreError::Config(format!(
            "sigma must be a positive number, got {sigma}"
        )));
    }
    if signal.is_empty() {
        return Ok(Vec::new());
    }

    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let len = signal.len() as isize;

    let smoothed = (0..len)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let offset = k as isize - radius;
                    weight * signal[reflect_index(i + offset, len)]
                })
                .sum()
        })
        .collect();

    Ok(smoothed)
}

/// Normalised Gaussian weights for offsets `-radius..=radius`.
fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-((x * x) as f64) / denom).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Maps an out-of-range index back into `0..len` by mirroring about the
/// boundaries, repeating the edge sample. Works for offsets wider than the
/// signal itself.
fn reflect_index(index: isize, len: isize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * len;
    let wrapped = index.rem_euclid(period);
    if wrapped < len {
        wrapped as usize
    } else {
        (period - 1 - wrapped) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_signal_is_unchanged() {
        let signal = vec![2.5; 40];
        let smoothed = smooth(&signal, 3.0).unwrap();
        assert_eq!(smoothed.len(), signal.len());
        for value in smoothed {
            assert!((value - 2.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_signal_shorter_than_kernel() {
        let signal = vec![7.0; 3];
        let smoothed = smooth(&signal, 5.0).unwrap();
        for value in smoothed {
            assert!((value - 7.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_kernel_width_and_normalisation() {
        let kernel = gaussian_kernel(3.0);
        assert_eq!(kernel.len(), 19);
        assert!((kernel.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(kernel[9] > kernel[8]);
        assert!((kernel[0] - kernel[18]).abs() < 1e-15);
    }

    #[test]
    fn test_reflect_index_repeats_edge() {
        assert_eq!(reflect_index(-1, 5), 0);
        assert_eq!(reflect_index(-2, 5), 1);
        assert_eq!(reflect_index(5, 5), 4);
        assert_eq!(reflect_index(6, 5), 3);
        assert_eq!(reflect_index(-4, 3), 2);
        assert_eq!(reflect_index(-7, 3), 0);
    }

    #[test]
    fn test_spike_spreads_but_keeps_mass() {
        let mut signal = vec![0.0; 41];
        signal[20] = 10.0;
        let smoothed = smooth(&signal, 2.0).unwrap();
        let total: f64 = smoothed.iter().sum();
        assert!((total - 10.0).abs() < 1e-9);
        assert!(smoothed[20] < 10.0);
        assert!(smoothed[20] > smoothed[19]);
        assert!((smoothed[19] - smoothed[21]).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_sigma() {
        assert!(smooth(&[1.0, 2.0], 0.0).is_err());
        assert!(smooth(&[1.0, 2.0], f64::NAN).is_err());
    }

    #[test]
    fn test_empty_signal() {
        assert!(smooth(&[], 3.0).unwrap().is_empty());
    }
}
