// src/signal_analysis/cleaning.rs

/// Removes outlier spikes from a signal.
///
/// A sample is flagged when its absolute value is a local maximum
/// (`|x[i]| > |x[i-1]|` and `|x[i]| >= |x[i+1]|`, taking the left edge
/// of a plateau) and exceeds `n_sigma` times the standard deviation of
/// the signal. Each flagged sample is replaced by the mean of its two
/// immediate neighbors, in ascending index order.
///
/// The first and last samples are never flagged: the local-maximum rule
/// requires a neighbor on both sides, so boundary samples have no
/// defined replacement and are left untouched.
///
/// Returns the cleaned signal and the flagged indices in ascending
/// order.
pub fn clean_signal(signal: &[f64], n_sigma: f64) -> (Vec<f64>, Vec<usize>) {
    let mut cleaned = signal.to_vec();
    if signal.len() < 3 {
        return (cleaned, Vec::new());
    }

    let threshold = n_sigma * std_dev(signal);

    let mut removed = Vec::new();
    for i in 1..signal.len() - 1 {
        let amp = signal[i].abs();
        let prev = signal[i - 1].abs();
        let next = signal[i + 1].abs();
        if amp > prev && amp >= next && amp > threshold {
            removed.push(i);
        }
    }

    for &i in &removed {
        cleaned[i] = (cleaned[i - 1] + cleaned[i + 1]) / 2.0;
    }

    (cleaned, removed)
}

/// Population standard deviation.
fn std_dev(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    let n = signal.len() as f64;
    let mean = signal.iter().sum::<f64>() / n;
    let var = signal.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_spike_replaced_by_neighbor_mean() {
        let (cleaned, removed) = clean_signal(&[0.0, 0.0, 100.0, 0.0, 0.0], 1.0);
        assert_eq!(cleaned, vec![0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(removed, vec![2]);
    }

    #[test]
    fn test_no_detection_below_threshold() {
        let signal = vec![1.0, -1.0, 1.0, -1.0, 1.0];
        let (cleaned, removed) = clean_signal(&signal, 10.0);
        assert_eq!(cleaned, signal);
        assert!(removed.is_empty());
    }

    #[test]
    fn test_boundary_samples_never_flagged() {
        // Large first and last values are not local maxima with two
        // neighbors, so they survive untouched.
        let signal = vec![100.0, 0.0, 0.0, 0.0, 100.0];
        let (cleaned, removed) = clean_signal(&signal, 0.1);
        assert_eq!(cleaned, signal);
        assert!(removed.is_empty());
    }

    #[test]
    fn test_negative_spike_detected_on_magnitude() {
        let (cleaned, removed) = clean_signal(&[0.0, 1.0, -80.0, 1.0, 0.0], 1.5);
        assert_eq!(removed, vec![2]);
        assert!((cleaned[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_multiple_spikes_ascending_order() {
        let (cleaned, removed) = clean_signal(&[0.0, 50.0, 0.0, 0.0, 60.0, 0.0, 0.0], 1.0);
        assert_eq!(removed, vec![1, 4]);
        assert_eq!(cleaned[1], 0.0);
        assert_eq!(cleaned[4], 0.0);
    }

    #[test]
    fn test_short_signals_pass_through() {
        let (cleaned, removed) = clean_signal(&[5.0, 7.0], 0.0);
        assert_eq!(cleaned, vec![5.0, 7.0]);
        assert!(removed.is_empty());
    }
}
