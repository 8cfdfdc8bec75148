// src/signal_analysis/fft_utils.rs

use ndarray::Array1;
use num_complex::Complex64;
use realfft::RealFftPlanner;

/// Computes the forward FFT of a real-valued signal.
/// Returns the one-sided complex spectrum. Handles empty input.
pub fn fft_forward(data: &Array1<f64>) -> Array1<Complex64> {
    if data.is_empty() {
        return Array1::zeros(0);
    }
    let n = data.len();
    let mut input = data.to_vec();
    let planner = RealFftPlanner::<f64>::new().plan_fft_forward(n);
    let mut output = planner.make_output_vec();
    if planner.process(&mut input, &mut output).is_err() {
        log::warn!("FFT forward processing failed; returning zeros");
        return Array1::zeros(one_sided_len(n));
    }
    Array1::from(output)
}

/// Number of bins in the one-sided spectrum of an `n`-point real FFT.
pub fn one_sided_len(n: usize) -> usize {
    if n % 2 == 0 {
        n / 2 + 1
    } else {
        (n + 1) / 2
    }
}

/// Frequencies of the one-sided spectrum for an `n_fft`-point transform
/// at `sample_rate` Hz: `k * sample_rate / n_fft`.
pub fn frequency_axis(n_fft: usize, sample_rate: f64) -> Vec<f64> {
    (0..one_sided_len(n_fft))
        .map(|k| k as f64 * sample_rate / n_fft as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_sided_len() {
        assert_eq!(one_sided_len(1024), 513);
        assert_eq!(one_sided_len(7), 4);
    }

    #[test]
    fn test_frequency_axis_spacing() {
        let freqs = frequency_axis(8, 100.0);
        assert_eq!(freqs.len(), 5);
        assert!((freqs[0]).abs() < 1e-12);
        assert!((freqs[1] - 12.5).abs() < 1e-12);
        assert!((freqs[4] - 50.0).abs() < 1e-12); // Nyquist
    }

    #[test]
    fn test_fft_forward_dc_component() {
        // A constant signal concentrates all energy in bin 0.
        let data = Array1::from(vec![2.0; 16]);
        let spectrum = fft_forward(&data);
        assert_eq!(spectrum.len(), 9);
        assert!((spectrum[0].re - 32.0).abs() < 1e-9);
        for k in 1..spectrum.len() {
            assert!(spectrum[k].norm() < 1e-9);
        }
    }

    #[test]
    fn test_fft_forward_single_tone() {
        // One full cycle over 16 samples lands exactly in bin 1 with
        // magnitude n/2.
        let n = 16;
        let data = Array1::from_iter(
            (0..n).map(|i| (2.0 * std::f64::consts::PI * i as f64 / n as f64).sin()),
        );
        let spectrum = fft_forward(&data);
        assert!((spectrum[1].norm() - n as f64 / 2.0).abs() < 1e-9);
        assert!(spectrum[2].norm() < 1e-9);
    }
}
