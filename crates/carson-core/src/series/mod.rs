//! Series expansions of Carson's correction
//!
//! - [`asymptotic`] - Carson's own expansion in six alternating sums
//! - [`emtp`] - the EMTP Theory Book series with published coefficients
//!
//! # References
//!
//! - J. R. Carson, "Wave Propagation in Overhead Wires with Ground Return",
//!   Bell System Technical Journal, vol. 5, 1926
//! - H. W. Dommel, "EMTP Theory Book", chapter 4, eq. 4.12

pub mod asymptotic;
pub mod emtp;

use num_complex::Complex64;

pub use asymptotic::{
    asymptotic_series, BreakdownContext, BreakdownStage, PartialSums, SeriesSum,
};
pub use emtp::{
    emtp_series, emtp_series_to_tolerance, EmtpTruncation, Term, TermRule, P_RULES, Q_RULES,
};

/// Status of a series evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accuracy {
    /// All intermediate tables were finite.
    Normal,
    /// A power or trigonometric table entry was not finite, or a
    /// tolerance-driven series ran out of orders before converging. The
    /// value may be NaN and should not be treated as authoritative.
    Degraded,
}

/// Value of a tolerant series evaluation together with its status
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesValue {
    /// `P + iQ`
    pub value: Complex64,
    pub status: Accuracy,
    /// Highest series order included in `value`
    pub order: usize,
}

impl SeriesValue {
    pub fn is_degraded(&self) -> bool {
        self.status == Accuracy::Degraded
    }
}
