//! Layout constants for the 128x64 monochrome screens.
//!
//! All positions are the top-left corner of the text or shape, in pixels.

/// Display width in pixels
pub const DISPLAY_WIDTH_PX: u32 = 128;

/// Display height in pixels
pub const DISPLAY_HEIGHT_PX: u32 = 64;

/// Row every screen title is drawn on
pub const TITLE_Y: i32 = 0;

// ============================================================================
// Messages outside the rotation
// ============================================================================

/// Shown while sensors are being probed.
pub const INIT_TEXT: &str = "Initializing...";
pub const INIT_POS: (i32, i32) = (0, 0);

pub const SPLASH_TEXT: &str = "Ready!";
pub const SPLASH_POS: (i32, i32) = (40, 28);

pub const GOODBYE_TEXT: &str = "Goodbye!";
pub const GOODBYE_POS: (i32, i32) = (35, 28);

pub const SENSOR_ERROR_TEXT: &str = "Sensor Error";

// ============================================================================
// Environment screen
// ============================================================================

pub(super) const ENV_TITLE_X: i32 = 20;
pub(super) const ENV_TEMPERATURE_POS: (i32, i32) = (0, 15);
pub(super) const ENV_HUMIDITY_POS: (i32, i32) = (70, 15);
pub(super) const ENV_PRESSURE_POS: (i32, i32) = (0, 28);

/// Failure and absence messages share the first data row
pub(super) const ENV_MESSAGE_POS: (i32, i32) = (0, 15);
pub(super) const ENV_ABSENT_TEXT: &str = "No Env Sensor";

// ============================================================================
// Distance screen
// ============================================================================

pub(super) const DISTANCE_TITLE_X: i32 = 30;
pub(super) const DISTANCE_VALUE_POS: (i32, i32) = (25, 20);
pub(super) const DISTANCE_BAR_Y: i32 = 40;
pub(super) const DISTANCE_BAR_HEIGHT_PX: u32 = 10;
pub(super) const DISTANCE_BAND_Y: i32 = 55;
pub(super) const DISTANCE_MESSAGE_POS: (i32, i32) = (15, 28);
pub(super) const OUT_OF_RANGE_TEXT: &str = "OUT OF RANGE";

// ============================================================================
// Power screen
// ============================================================================

pub(super) const POWER_TITLE_X: i32 = 40;
pub(super) const POWER_VOLTAGE_POS: (i32, i32) = (0, 15);
pub(super) const POWER_CURRENT_POS: (i32, i32) = (0, 28);
pub(super) const POWER_POWER_POS: (i32, i32) = (0, 41);
pub(super) const POWER_BAR_Y: i32 = 54;
pub(super) const POWER_BAR_HEIGHT_PX: u32 = 10;
pub(super) const POWER_ERROR_POS: (i32, i32) = (15, 28);
pub(super) const POWER_ABSENT_POS: (i32, i32) = (25, 28);
pub(super) const POWER_ABSENT_TEXT: &str = "No INA219";

// ============================================================================
// Temperature graph screen
// ============================================================================

pub(super) const GRAPH_TITLE_X: i32 = 25;

/// Baseline of the plot; the minimum sample sits here
pub(super) const GRAPH_BASELINE_Y: i32 = 60;

/// Vertical pixels between the minimum and maximum sample
pub(super) const GRAPH_HEIGHT_PX: i32 = 40;

pub(super) const GRAPH_MAX_LABEL_POS: (i32, i32) = (0, 10);
pub(super) const GRAPH_MIN_LABEL_POS: (i32, i32) = (0, 52);

pub(super) const GRAPH_COLLECTING_TEXT: &str = "Collecting";
pub(super) const GRAPH_COLLECTING_POS: (i32, i32) = (25, 28);
pub(super) const GRAPH_DATA_TEXT: &str = "Data...";
pub(super) const GRAPH_DATA_POS: (i32, i32) = (35, 38);
