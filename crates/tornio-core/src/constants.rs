//! Shared constants

/// Tool home position X (mm). The tool returns here on load and reset.
pub const HOME_X: f64 = 30.0;

/// Tool home position Y (mm)
pub const HOME_Y: f64 = -10.0;

/// Sub-segments per unit of distance when a feed move is drawn incrementally
pub const PACING_STEPS_PER_UNIT: f64 = 10.0;

/// Plot extents used by renderers that need a fixed viewport (mm)
pub const PLOT_MIN_X: f64 = 0.0;
pub const PLOT_MAX_X: f64 = 35.0;
pub const PLOT_MIN_Y: f64 = -20.0;
pub const PLOT_MAX_Y: f64 = 20.0;

/// File extension used for stored programs
pub const PROGRAM_EXTENSION: &str = "gcode";

/// File extension of generated firmware sketches
pub const SKETCH_EXTENSION: &str = "ino";
