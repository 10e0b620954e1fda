// src/constants.rs

// --- Unit conversions ---
pub const K_TO_DEGC: f64 = 273.15;
pub const PA_TO_BAR: f64 = 1.0e5;
pub const S_TO_MIN: f64 = 60.0;

// --- Outlier cleaning of the reactor temperature channel ---
pub const OUTLIER_WINDOW_SIZE: usize = 20;
pub const OUTLIER_THRESHOLD: f64 = 1.0;

// --- Savitzky-Golay smoothing ---
// Primary temperature pass; the window is clamped per call for short runs.
pub const PRIMARY_SMOOTH_WINDOW: usize = 51;
pub const PRIMARY_SMOOTH_POLYORDER: usize = 3;
// The optional user-tunable passes always fit a first-order polynomial.
pub const OPTIONAL_SMOOTH_POLYORDER: usize = 1;

// Reactor setpoints are configured in 25 °C steps; the set temperature is
// inferred by rounding the observed peak to the nearest step.
pub const SET_TEMPERATURE_STEP: f64 = 25.0;
