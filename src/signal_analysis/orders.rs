// src/signal_analysis/orders.rs

use ndarray::Array2;

/// Amplitude of one order line as a function of shaft speed.
#[derive(Debug, Clone)]
pub struct OrderCut {
    /// Multiple of the shaft frequency this cut tracks.
    pub order: f64,
    /// `(speed_hz, amplitude)` pairs, one per spectrogram time bin.
    pub points: Vec<(f64, f64)>,
}

/// Index of the axis entry nearest `value`. The axis must be sorted
/// ascending; ties resolve to the lower index.
pub fn find_nearest(axis: &[f64], value: f64) -> usize {
    debug_assert!(!axis.is_empty());
    let idx = axis.partition_point(|&f| f < value);
    if idx == 0 {
        return 0;
    }
    if idx == axis.len() {
        return axis.len() - 1;
    }
    let below = value - axis[idx - 1];
    let above = axis[idx] - value;
    if below <= above {
        idx - 1
    } else {
        idx
    }
}

/// Extracts order cuts from a spectrogram.
///
/// For each requested order and each speed bin, the expected excitation
/// frequency is `speed_hz * order`; the matrix row whose frequency is
/// nearest that value supplies the amplitude.
pub fn order_cuts(
    speed_bins_hz: &[f64],
    freqs: &[f64],
    matrix: &Array2<f64>,
    orders: &[f64],
) -> Vec<OrderCut> {
    orders
        .iter()
        .map(|&order| {
            let points = speed_bins_hz
                .iter()
                .enumerate()
                .map(|(col, &speed_hz)| {
                    let row = find_nearest(freqs, speed_hz * order);
                    (speed_hz, matrix[[row, col]])
                })
                .collect();
            OrderCut { order, points }
        })
        .collect()
}

/// Endpoints of an order line for rendering: from the origin out to the
/// edge of the speed axis, clipped to the visible frequency ceiling.
///
/// `to_hz` converts speed-axis values to Hz (1.0 when the axis is
/// already in Hz), so the same geometry serves display-unit axes.
pub fn order_line_endpoints(
    order: f64,
    to_hz: f64,
    x_max: f64,
    f_ceiling: f64,
) -> [(f64, f64); 2] {
    let mut x_end = x_max;
    let mut y_end = x_max * to_hz * order;
    if y_end > f_ceiling {
        y_end = f_ceiling;
        x_end = f_ceiling / to_hz / order;
    }
    [(0.0, 0.0), (x_end, y_end)]
}

/// Row range `(i_min, i_max)` covering a requested display frequency
/// band: the first row at or above each bound.
pub fn frequency_range_indices(freqs: &[f64], f_min: f64, f_max: f64) -> (usize, usize) {
    let i_min = freqs.partition_point(|&f| f < f_min);
    let i_max = freqs.partition_point(|&f| f < f_max);
    (i_min, i_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_find_nearest_interior_and_edges() {
        let axis = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(find_nearest(&axis, 9.0), 1);
        assert_eq!(find_nearest(&axis, 11.0), 1);
        assert_eq!(find_nearest(&axis, -5.0), 0);
        assert_eq!(find_nearest(&axis, 99.0), 3);
    }

    #[test]
    fn test_find_nearest_tie_takes_lower_index() {
        let axis = [0.0, 10.0, 20.0];
        assert_eq!(find_nearest(&axis, 5.0), 0);
        assert_eq!(find_nearest(&axis, 15.0), 1);
    }

    #[test]
    fn test_order_one_at_600_rpm_locates_10_hz() {
        // 600 RPM = 10 Hz; the nearest axis entry to 10 Hz is row 2.
        let freqs = [0.0, 4.0, 8.0, 12.0, 16.0];
        let matrix = Array2::from_shape_fn((5, 1), |(r, _)| r as f64);
        let cuts = order_cuts(&[10.0], &freqs, &matrix, &[1.0]);
        assert_eq!(cuts.len(), 1);
        assert_eq!(cuts[0].points, vec![(10.0, 2.0)]);
    }

    #[test]
    fn test_order_cut_tracks_speed_bins() {
        let freqs = [0.0, 5.0, 10.0, 15.0, 20.0];
        // Column j holds value j in every row except the expected row,
        // which holds 100 + j, so a correct lookup is easy to spot.
        let speed_bins = [2.5, 5.0, 7.5];
        let order = 2.0;
        let mut matrix = Array2::from_shape_fn((5, 3), |(_, c)| c as f64);
        for (col, &s) in speed_bins.iter().enumerate() {
            let row = find_nearest(&freqs, s * order);
            matrix[[row, col]] = 100.0 + col as f64;
        }
        let cuts = order_cuts(&speed_bins, &freqs, &matrix, &[order]);
        let amps: Vec<f64> = cuts[0].points.iter().map(|p| p.1).collect();
        assert_eq!(amps, vec![100.0, 101.0, 102.0]);
    }

    #[test]
    fn test_multiple_orders_preserve_request_order() {
        let freqs = [0.0, 10.0, 20.0];
        let matrix = array![[1.0], [2.0], [3.0]];
        let cuts = order_cuts(&[10.0], &freqs, &matrix, &[2.0, 0.5, 1.0]);
        let orders: Vec<f64> = cuts.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![2.0, 0.5, 1.0]);
    }

    #[test]
    fn test_order_line_unclipped() {
        let [start, end] = order_line_endpoints(2.0, 1.0 / 60.0, 3000.0, 500.0);
        assert_eq!(start, (0.0, 0.0));
        assert!((end.0 - 3000.0).abs() < 1e-9);
        assert!((end.1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_order_line_clipped_to_frequency_ceiling() {
        // 10th order at 3000 RPM would reach 500 Hz; a 200 Hz ceiling
        // pulls the endpoint back along the line.
        let [_, end] = order_line_endpoints(10.0, 1.0 / 60.0, 3000.0, 200.0);
        assert!((end.1 - 200.0).abs() < 1e-9);
        assert!((end.0 - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn test_frequency_range_indices() {
        let freqs = [0.0, 10.0, 20.0, 30.0, 40.0];
        assert_eq!(frequency_range_indices(&freqs, 10.0, 30.0), (1, 3));
        assert_eq!(frequency_range_indices(&freqs, 5.0, 100.0), (1, 5));
        assert_eq!(frequency_range_indices(&freqs, 0.0, 0.0), (0, 0));
    }
}
