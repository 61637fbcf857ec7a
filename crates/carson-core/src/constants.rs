//! Numerical constants for the Carson correction evaluators
//!
//! Table sizes, published series seeds and the default truncation
//! parameters used throughout the library.

use std::f64::consts::SQRT_2;

// ============================================================================
// Table sizes
// ============================================================================

/// Number of entries in the factorial table (0! through 149!).
pub const FACTORIAL_TABLE_LEN: usize = 150;

/// Upper bound (exclusive) of the harmonic partial-sum table.
/// The odd-square-product table covers odd orders up to and including this value.
pub const HARMONIC_TABLE_LEN: usize = 101;

/// Length of each EMTP coefficient vector (index 0 unused).
pub const EMTP_TABLE_LEN: usize = 50;

/// Highest order for which EMTP coefficients are generated.
pub const EMTP_MAX_ORDER: usize = EMTP_TABLE_LEN - 2;

/// Largest term count the asymptotic series can address without running off
/// the odd-square-product table (it reads index `4k + 5`).
pub const MAX_ASYMPTOTIC_TERMS: usize = (HARMONIC_TABLE_LEN - 1) / 4;

// ============================================================================
// Series constants
// ============================================================================

/// Euler-Mascheroni constant.
pub const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// EMTP seed `b1 = sqrt(2)/6` (EMTP Theory Book eq. 4.12)
pub const EMTP_B1: f64 = SQRT_2 / 6.0;

/// EMTP seed `b2 = 1/16`
pub const EMTP_B2: f64 = 1.0 / 16.0;

/// EMTP seed `c2`, as published
pub const EMTP_C2: f64 = 1.365_931_5;

/// Constant inside the leading Q term `0.5 * (0.6159315 - ln a)`
pub const EMTP_Q_OFFSET: f64 = 0.615_931_5;

// ============================================================================
// Defaults
// ============================================================================

/// Default number of terms per alternating sum in the asymptotic series.
pub const DEFAULT_ASYMPTOTIC_TERMS: usize = 8;

/// Default maximum order of the EMTP series.
pub const DEFAULT_EMTP_ORDER: usize = 25;

/// Default convergence tolerance when the EMTP series is truncated by size
/// of its terms rather than by order.
pub const DEFAULT_EMTP_TOLERANCE: f64 = 1e-6;

/// Default truncated upper bound of the reference integral.
pub const DEFAULT_UPPER_LIMIT: f64 = 10.0;

/// Default number of Simpson intervals.
pub const DEFAULT_INTERVALS: usize = 10_000;

/// Evaluation point used when the caller supplies none.
pub const DEFAULT_P: f64 = 5.0;
pub const DEFAULT_Q: f64 = 1.0;

/// Relative tolerance at which the three methods are considered to agree.
pub const AGREEMENT_TOL: f64 = 1e-3;

/// Per-kilometre scale between the dimensionless correction and Ohm/km,
/// applied as `4 * omega * EARTH_RETURN_SCALE` (omega * mu0 / pi per km).
pub const EARTH_RETURN_SCALE: f64 = 1e-4;
