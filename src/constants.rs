// src/constants.rs

// Floor applied before log10 when converting spectra to dB. Keeps
// exact-zero cells finite.
pub const LOG_EPSILON: f64 = 1e-12;

// Default percent overlap between transform windows.
pub const DEFAULT_PERCENT_OVERLAP: f64 = 50.0;

// Default number of points per transform window.
pub const DEFAULT_N_FFT: usize = 1024;

// Default Butterworth order for the low-pass helper.
pub const DEFAULT_FILTER_ORDER: usize = 5;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1280;
pub const PLOT_HEIGHT: u32 = 960;

// dB range mapped onto the heatmap color ramp. Values outside are
// clamped before color lookup.
pub const WATERFALL_MIN_DB: f64 = -120.0;
pub const WATERFALL_MAX_DB: f64 = 0.0;

// Stroke widths for lines.
pub const LINE_WIDTH_PLOT: u32 = 1;
pub const LINE_WIDTH_ORDER_LINE: u32 = 2;

// src/constants.rs
