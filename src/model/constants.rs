// Scalar model
pub const INITIAL_ELO: f64 = 1500.0;
pub const MIN_ELO: f64 = 500.0;
/// Fallback exchange rate when a result type has no entry in the K table
pub const K_FACTOR: f64 = 12.0;
/// Run-value correction per unit of park factor away from neutral
pub const ADJUSTMENT_SCALE: f64 = 0.1;
pub const NEUTRAL_PARK_FACTOR: f64 = 1.0;

// Batted-ball quality (xwOBA) modulation of K
pub const LEAGUE_AVG_XWOBA: f64 = 0.315;
pub const PHYSICS_ALPHA: f64 = 0.4;
pub const PHYSICS_MOD_MIN: f64 = 0.7;
pub const PHYSICS_MOD_MAX: f64 = 1.3;

// Multi-facet model
pub const TALENT_DEFAULT_ELO: f64 = 1500.0;
pub const TALENT_ELO_MIN: f64 = 500.0;
pub const TALENT_ELO_MAX: f64 = 3000.0;
pub const MIN_RELIABILITY: f64 = 0.3;

// Used for any facet missing from the dimension table
pub const DEFAULT_DIMENSION_K: f64 = 12.0;
pub const DEFAULT_DIMENSION_SCALE: f64 = 5.0;
pub const DEFAULT_RELIABILITY_THRESHOLD: f64 = 400.0;
pub const DEFAULT_LOGISTIC_DIVISOR: f64 = 400.0;

pub const LEVERAGE_THRESHOLD: f64 = 2.0;
pub const MAX_CLUTCH_MULTIPLIER: f64 = 2.0;
/// Multiplier applied to a RISP event that would otherwise carry none
pub const RISP_CLUTCH_MULTIPLIER: f64 = 0.5;

/// PAs between progress log lines
pub const PROGRESS_LOG_INTERVAL: usize = 50_000;
