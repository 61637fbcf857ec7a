//! EMTP Theory Book series for Carson's correction
//!
//! With `a = r` and `phi = theta`:
//!
//! ```text
//! P = pi/8 + sum_{n=1}^{N} P_n
//! Q = 0.5 (0.6159315 - ln a) + sum_{n=1}^{N} Q_n
//! ```
//!
//! The terms cycle with period four in `n`. [`P_RULES`] and [`Q_RULES`]
//! hold that cycle, indexed by `n mod 4`.

use std::f64::consts::PI;

use num_complex::Complex64;

use super::{Accuracy, SeriesValue};
use crate::constants::{DEFAULT_EMTP_ORDER, EMTP_MAX_ORDER, EMTP_Q_OFFSET};
use crate::error::CarsonError;
use crate::math::{EmtpCoefficients, PolarPowers};
use crate::point::EvaluationPoint;

/// Shape of one series term, with `C = a^n cos(n phi)`, `S = a^n sin(n phi)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    /// `b[n] * C`
    B,
    /// `d[n] * C`
    D,
    /// `b[n] * ((c[n] - ln a) * C + phi * S)`
    BLog,
}

/// Signed term shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermRule {
    pub sign: f64,
    pub term: Term,
}

impl TermRule {
    pub const fn new(sign: f64, term: Term) -> Self {
        Self { sign, term }
    }

    /// Value of this term at order `n`
    ///
    /// # Arguments
    /// * `coeffs` - EMTP coefficient triple
    /// * `n` - Series order
    /// * `cos_term` - `a^n cos(n phi)`
    /// * `sin_term` - `a^n sin(n phi)`
    /// * `ln_a` - `ln a`
    /// * `phi` - Angle of the evaluation point
    pub fn apply(
        &self,
        coeffs: &EmtpCoefficients,
        n: usize,
        cos_term: f64,
        sin_term: f64,
        ln_a: f64,
        phi: f64,
    ) -> f64 {
        let value = match self.term {
            Term::B => coeffs.b(n) * cos_term,
            Term::D => coeffs.d(n) * cos_term,
            Term::BLog => coeffs.b(n) * ((coeffs.c(n) - ln_a) * cos_term + phi * sin_term),
        };
        self.sign * value
    }
}

/// Real-part terms, indexed by `n mod 4`
pub const P_RULES: [TermRule; 4] = [
    TermRule::new(-1.0, Term::D),
    TermRule::new(-1.0, Term::B),
    TermRule::new(1.0, Term::BLog),
    TermRule::new(1.0, Term::B),
];

/// Imaginary-part terms, indexed by `n mod 4`
pub const Q_RULES: [TermRule; 4] = [
    TermRule::new(-1.0, Term::BLog),
    TermRule::new(1.0, Term::B),
    TermRule::new(-1.0, Term::D),
    TermRule::new(1.0, Term::B),
];

/// Where the EMTP series is cut off
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmtpTruncation {
    /// Sum exactly this many orders
    Order(usize),
    /// Add orders until two successive terms change `P + iQ` by less than
    /// this, capped at the highest generated order
    Tolerance(f64),
}

impl Default for EmtpTruncation {
    fn default() -> Self {
        EmtpTruncation::Order(DEFAULT_EMTP_ORDER)
    }
}

impl EmtpTruncation {
    pub fn validate(&self) -> Result<(), CarsonError> {
        match *self {
            EmtpTruncation::Order(order) if !(1..=EMTP_MAX_ORDER).contains(&order) => {
                Err(CarsonError::InvalidConfig(format!(
                    "EMTP series order must be in 1..={}, got {}",
                    EMTP_MAX_ORDER, order
                )))
            }
            EmtpTruncation::Tolerance(eps) if !(eps.is_finite() && eps > 0.0) => {
                Err(CarsonError::InvalidConfig(format!(
                    "EMTP series tolerance must be positive and finite, got {}",
                    eps
                )))
            }
            _ => Ok(()),
        }
    }

    /// Evaluate the EMTP series with this truncation
    pub fn evaluate(
        &self,
        point: &EvaluationPoint,
        coeffs: &EmtpCoefficients,
    ) -> Result<SeriesValue, CarsonError> {
        match *self {
            EmtpTruncation::Order(order) => emtp_series(point, coeffs, order),
            EmtpTruncation::Tolerance(eps) => emtp_series_to_tolerance(point, coeffs, eps),
        }
    }
}

/// Number of successive small increments that count as convergence. A single
/// one is not enough: at `phi = pi/2` every odd-order term vanishes.
const CONVERGED_RUN: usize = 2;

/// Term generator shared by both truncation modes
struct EmtpTerms<'a> {
    coeffs: &'a EmtpCoefficients,
    powers: PolarPowers,
    a: f64,
    ln_a: f64,
    phi: f64,
}

impl<'a> EmtpTerms<'a> {
    fn new(point: &EvaluationPoint, coeffs: &'a EmtpCoefficients, max_order: usize) -> Self {
        Self {
            coeffs,
            powers: PolarPowers::new(point, max_order),
            a: point.r(),
            ln_a: point.r().ln(),
            phi: point.theta(),
        }
    }

    /// `pi/8 + i 0.5 (0.6159315 - ln a)`
    fn leading(&self) -> Complex64 {
        Complex64::new(PI / 8.0, 0.5 * (EMTP_Q_OFFSET - self.ln_a))
    }

    /// `P_n + i Q_n`
    fn term(&self, n: usize) -> Complex64 {
        let cos_term = self.powers.power(n) * self.powers.cos(n);
        let sin_term = self.powers.power(n) * self.powers.sin(n);
        let rule = |r: &TermRule| r.apply(self.coeffs, n, cos_term, sin_term, self.ln_a, self.phi);
        Complex64::new(rule(&P_RULES[n % 4]), rule(&Q_RULES[n % 4]))
    }

    /// Attach the accuracy status to a sum over orders `1..=order`
    fn finish(&self, value: Complex64, order: usize, converged: bool) -> SeriesValue {
        let mut status = if converged {
            Accuracy::Normal
        } else {
            Accuracy::Degraded
        };
        for (table, n, entry) in self.powers.non_finite_entries(order) {
            log::warn!("EMTP series: {} at order {} is {}", table, n, entry);
            status = Accuracy::Degraded;
        }
        if !value.is_finite() && status == Accuracy::Normal {
            log::warn!("EMTP series at a = {:e}: result {} is not finite", self.a, value);
            status = Accuracy::Degraded;
        }

        log::debug!(
            "EMTP series at a = {}, phi = {}: {} (order {}, {:?})",
            self.a,
            self.phi,
            value,
            order,
            status
        );
        SeriesValue {
            value,
            status,
            order,
        }
    }
}

/// Evaluate the EMTP series up to `order`
///
/// Non-finite entries in the power or trigonometric tables are logged and
/// mark the result [`Accuracy::Degraded`]; evaluation continues and the
/// returned value may be NaN.
///
/// # Arguments
/// * `point` - Evaluation point
/// * `coeffs` - EMTP coefficient triple
/// * `order` - Highest series order, 1..=coeffs.max_order()
pub fn emtp_series(
    point: &EvaluationPoint,
    coeffs: &EmtpCoefficients,
    order: usize,
) -> Result<SeriesValue, CarsonError> {
    if order == 0 || order > coeffs.max_order() {
        return Err(CarsonError::InvalidConfig(format!(
            "EMTP series order must be in 1..={}, got {}",
            coeffs.max_order(),
            order
        )));
    }

    let terms = EmtpTerms::new(point, coeffs, order);
    let value = (1..=order).fold(terms.leading(), |acc, n| acc + terms.term(n));
    Ok(terms.finish(value, order, true))
}

/// Evaluate the EMTP series until it converges to `tolerance`
///
/// Orders are added until two successive terms are each smaller than
/// `tolerance` in magnitude. If the highest generated order is reached first
/// the value is returned marked [`Accuracy::Degraded`].
pub fn emtp_series_to_tolerance(
    point: &EvaluationPoint,
    coeffs: &EmtpCoefficients,
    tolerance: f64,
) -> Result<SeriesValue, CarsonError> {
    EmtpTruncation::Tolerance(tolerance).validate()?;

    let max_order = coeffs.max_order();
    let terms = EmtpTerms::new(point, coeffs, max_order);
    let mut value = terms.leading();
    let mut small = 0;
    for n in 1..=max_order {
        let step = terms.term(n);
        value += step;
        small = if step.norm() < tolerance { small + 1 } else { 0 };
        if small == CONVERGED_RUN {
            return Ok(terms.finish(value, n, true));
        }
    }

    log::warn!(
        "EMTP series at a = {:e} did not converge to {:e} by order {}",
        terms.a,
        tolerance,
        max_order
    );
    Ok(terms.finish(value, max_order, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_terms_match_published_layout() {
        // P = pi/8 - b1 a cos(phi) + b2[(c2 - ln a) a^2 cos 2phi + phi a^2 sin 2phi]
        //     + b3 a^3 cos 3phi - d4 a^4 cos 4phi ...
        assert_eq!(P_RULES[1], TermRule::new(-1.0, Term::B));
        assert_eq!(P_RULES[2], TermRule::new(1.0, Term::BLog));
        assert_eq!(P_RULES[3], TermRule::new(1.0, Term::B));
        assert_eq!(P_RULES[0], TermRule::new(-1.0, Term::D));
        // Q = ... + b1 a cos(phi) - d2 a^2 cos 2phi + b3 a^3 cos 3phi - b4[...]
        assert_eq!(Q_RULES[1], TermRule::new(1.0, Term::B));
        assert_eq!(Q_RULES[2], TermRule::new(-1.0, Term::D));
        assert_eq!(Q_RULES[3], TermRule::new(1.0, Term::B));
        assert_eq!(Q_RULES[0], TermRule::new(-1.0, Term::BLog));
    }

    #[test]
    fn test_log_terms_only_on_even_orders() {
        for (i, rule) in P_RULES.iter().chain(Q_RULES.iter()).enumerate() {
            if rule.term == Term::BLog {
                assert_eq!((i % 4) % 2, 0);
            }
        }
    }

    #[test]
    fn test_order_one_by_hand() {
        let coeffs = EmtpCoefficients::new();
        let point = EvaluationPoint::new(0.5, 0.0).unwrap();
        let value = emtp_series(&point, &coeffs, 1).unwrap();
        let b1 = coeffs.b(1);
        assert_relative_eq!(value.value.re, PI / 8.0 - b1 * 0.5, epsilon = 1e-15);
        assert_relative_eq!(
            value.value.im,
            0.5 * (EMTP_Q_OFFSET - 0.5f64.ln()) + b1 * 0.5,
            epsilon = 1e-15
        );
        assert_eq!(value.status, Accuracy::Normal);
    }

    #[test]
    fn test_order_out_of_range() {
        let coeffs = EmtpCoefficients::new();
        let point = EvaluationPoint::new(1.0, 0.0).unwrap();
        assert!(emtp_series(&point, &coeffs, 0).is_err());
        assert!(emtp_series(&point, &coeffs, coeffs.max_order() + 1).is_err());
        assert!(emtp_series(&point, &coeffs, coeffs.max_order()).is_ok());
    }

    #[test]
    fn test_tolerance_mode_stops_early_near_origin() {
        let coeffs = EmtpCoefficients::new();
        let point = EvaluationPoint::new(0.05, 0.0).unwrap();
        let value = emtp_series_to_tolerance(&point, &coeffs, 1e-6).unwrap();
        assert_eq!(value.status, Accuracy::Normal);
        assert!(value.order <= 6);
        let full = emtp_series(&point, &coeffs, 25).unwrap();
        assert!((value.value - full.value).norm() < 1e-8);
    }

    #[test]
    fn test_tolerance_mode_not_fooled_by_vanishing_odd_terms() {
        // On the imaginary axis cos(n phi) = 0 for odd n, so odd orders add
        // (almost) nothing; convergence needs two small terms in a row
        let coeffs = EmtpCoefficients::new();
        let point = EvaluationPoint::new(0.0, 3.0).unwrap();
        let value = emtp_series_to_tolerance(&point, &coeffs, 1e-6).unwrap();
        let full = emtp_series(&point, &coeffs, EMTP_MAX_ORDER).unwrap();
        assert!(value.order > 3);
        assert!((value.value - full.value).norm() < 1e-6);
    }

    #[test]
    fn test_tolerance_mode_degrades_when_cap_reached() {
        let coeffs = EmtpCoefficients::new();
        let point = EvaluationPoint::new(20.0, 0.0).unwrap();
        let value = emtp_series_to_tolerance(&point, &coeffs, 1e-6).unwrap();
        assert_eq!(value.order, EMTP_MAX_ORDER);
        assert!(value.is_degraded());
    }

    #[test]
    fn test_truncation_validation() {
        assert!(EmtpTruncation::default().validate().is_ok());
        assert!(EmtpTruncation::Order(0).validate().is_err());
        assert!(EmtpTruncation::Order(EMTP_MAX_ORDER + 1).validate().is_err());
        assert!(EmtpTruncation::Tolerance(1e-6).validate().is_ok());
        assert!(EmtpTruncation::Tolerance(0.0).validate().is_err());
        assert!(EmtpTruncation::Tolerance(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_overflow_degrades_without_failing() {
        let coeffs = EmtpCoefficients::new();
        let point = EvaluationPoint::new(1e100, 0.0).unwrap();
        let value = emtp_series(&point, &coeffs, 25).unwrap();
        assert!(value.is_degraded());
    }
}
