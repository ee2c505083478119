//! Local maximum detection with height and topographic prominence filters.
//!
//! A peak's prominence is its height above the higher of the two lowest
//! points reachable on either side before climbing over a taller sample (or
//! reaching the end of the signal). Ripples on the flank of a large peak
//! therefore score low even when they rise well above their direct neighbours.

/// A peak index together with its prominence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub index: usize,
    pub prominence: f64,
}

/// Finds peaks in `signal` that reach `min_height` and have at least
/// `min_prominence`. Results are in increasing index order.
pub fn find_peaks(signal: &[f64], min_height: f64, min_prominence: f64) -> Vec<Peak> {
    local_maxima(signal)
        .into_iter()
        .filter(|&index| signal[index] >= min_height)
        .map(|index| Peak {
            index,
            prominence: prominence(signal, index),
        })
        .filter(|peak| peak.prominence >= min_prominence)
        .collect()
}

/// Strict local maxima. A flat-topped peak is reported at its first sample;
/// the first and last samples are never maxima.
fn local_maxima(signal: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if signal.len() < 3 {
        return maxima;
    }

    let last = signal.len() - 1;
    let mut i = 1;
    while i < last {
        if signal[i - 1] < signal[i] {
            // Walk across a possible plateau
            let mut ahead = i + 1;
            while ahead < last && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                maxima.push(i);
            }
            i = ahead;
        } else {
            i += 1;
        }
    }
    maxima
}

/// Topographic prominence of the sample at `peak`.
fn prominence(signal: &[f64], peak: usize) -> f64 {
    let height = signal[peak];

    let mut left_min = height;
    for &value in signal[..peak].iter().rev() {
        if value > height {
            break;
        }
        left_min = left_min.min(value);
    }

    let mut right_min = height;
    for &value in &signal[peak + 1..] {
        if value > height {
            break;
        }
        right_min = right_min.min(value);
    }

    height - left_min.max(right_min)
}
