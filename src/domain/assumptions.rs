//! Fixed engine assumptions.
//!
//! These belong to the evaluation contract and are deliberately not part of
//! the configuration file.

/// Tons carried per loaded trip.
pub const PAYLOAD_TONS_PER_TRIP: f64 = 40.0;
/// Scheduled operating hours per day, before shift changes.
pub const OPERATING_HOURS_PER_DAY: f64 = 20.0;
pub const SHIFTS_PER_DAY: f64 = 2.0;
pub const OPERATING_DAYS_PER_YEAR: f64 = 365.0;
/// Speed lost per percent of absolute grade.
pub const GRADE_PENALTY_PER_PERCENT: f64 = 0.02;
/// Lower bound of the grade speed factor.
pub const MIN_SPEED_FACTOR: f64 = 0.6;

pub const DEFAULT_SPEED_LOADED_KMPH: f64 = 25.0;
pub const DEFAULT_SPEED_EMPTY_KMPH: f64 = 30.0;
pub const DEFAULT_UPTIME_PERCENT: f64 = 90.0;
/// Speeds are floored here before the grade factor is applied.
pub const MIN_SPEED_KMPH: f64 = 1.0;

/// Inputs larger in magnitude are capped here, keeping every product finite.
pub const MAX_INPUT_MAGNITUDE: f64 = 1.0e9;
/// Inputs smaller in magnitude count as zero, bounding the cycle rate.
pub const MIN_INPUT_MAGNITUDE: f64 = 1.0e-9;
