//! Carson's series for the earth-return correction
//!
//! With `r = |p + iq|`, `theta = atan2(q, p)` and `L = ln(2/e^gamma) - ln r`:
//!
//! ```text
//! P = pi/8 (1 - s4) + L s2 / 2 + theta s2' / 2 - sigma1/sqrt2 + sigma2/2 + sigma3/sqrt2
//! Q = 1/4 + L (1 - s4) / 2 - theta s4' / 2 + sigma1/sqrt2 - pi/8 s2 + sigma3/sqrt2 - sigma4/2
//! ```
//!
//! where `s2 + i s2'` and `s4 + i s4'` are carried as complex sums and every
//! sum alternates in sign with its iteration index `k`:
//!
//! ```text
//! s2     = sum (r/2)^(4k+2) e^{i(4k+2)theta} / ((2k+1)! (2k+2)!)
//! s4     = sum (r/2)^(4k+4) e^{i(4k+4)theta} / ((2k+2)! (2k+3)!)
//! sigma1 = sum r^(4k+1) cos((4k+1)theta) / PX[4k+3]
//! sigma2 = sum SI[2k+2] (r/2)^(4k+2) cos((4k+2)theta) / ((2k+1)! (2k+2)!)
//! sigma3 = sum r^(4k+3) cos((4k+3)theta) / PX[4k+5]
//! sigma4 = sum SI[2k+3] (r/2)^(4k+4) cos((4k+4)theta) / ((2k+2)! (2k+3)!)
//! ```

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::fmt;

use num_complex::Complex64;

use crate::constants::{EULER_GAMMA, MAX_ASYMPTOTIC_TERMS};
use crate::error::CarsonError;
use crate::math::{PolarPowers, SeriesTables};
use crate::point::EvaluationPoint;

/// One of the six alternating sums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesSum {
    S2,
    S4,
    Sigma1,
    Sigma2,
    Sigma3,
    Sigma4,
}

impl fmt::Display for SeriesSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeriesSum::S2 => "s2",
            SeriesSum::S4 => "s4",
            SeriesSum::Sigma1 => "sigma1",
            SeriesSum::Sigma2 => "sigma2",
            SeriesSum::Sigma3 => "sigma3",
            SeriesSum::Sigma4 => "sigma4",
        };
        f.write_str(name)
    }
}

/// Running values of the six sums
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialSums {
    pub s2: Complex64,
    pub s4: Complex64,
    pub sigma1: f64,
    pub sigma2: f64,
    pub sigma3: f64,
    pub sigma4: f64,
}

impl PartialSums {
    fn is_nan(&self, sum: SeriesSum) -> bool {
        match sum {
            SeriesSum::S2 => self.s2.is_nan(),
            SeriesSum::S4 => self.s4.is_nan(),
            SeriesSum::Sigma1 => self.sigma1.is_nan(),
            SeriesSum::Sigma2 => self.sigma2.is_nan(),
            SeriesSum::Sigma3 => self.sigma3.is_nan(),
            SeriesSum::Sigma4 => self.sigma4.is_nan(),
        }
    }
}

/// Where the series broke down
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakdownStage {
    /// A partial sum turned NaN while adding one term
    Accumulation {
        sum: SeriesSum,
        /// Iteration index `k`
        iteration: usize,
        /// Power order of the offending term
        order: usize,
        /// Term just added
        term: Complex64,
    },
    /// Every sum stayed NaN-free but combining them into `P + iQ` did not
    Combination { value: Complex64 },
}

/// State of the series at the moment a NaN appeared
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownContext {
    pub stage: BreakdownStage,
    /// All partial sums at that moment
    pub partial_sums: PartialSums,
    /// Polar form of the evaluation point
    pub r: f64,
    pub theta: f64,
}

impl BreakdownContext {
    /// The sum that turned NaN, if the breakdown happened during accumulation
    pub fn sum(&self) -> Option<SeriesSum> {
        match self.stage {
            BreakdownStage::Accumulation { sum, .. } => Some(sum),
            BreakdownStage::Combination { .. } => None,
        }
    }
}

impl fmt::Display for BreakdownContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stage {
            BreakdownStage::Accumulation {
                sum,
                iteration,
                order,
                term,
            } => write!(
                f,
                "{} is NaN at k = {} (order {}, term {})",
                sum, iteration, order, term
            )?,
            BreakdownStage::Combination { value } => {
                write!(f, "combining the sums gave {}", value)?
            }
        }
        let s = &self.partial_sums;
        write!(
            f,
            " for r = {:e}, theta = {}; s2 = {}, s4 = {}, sigma = [{:e}, {:e}, {:e}, {:e}]",
            self.r, self.theta, s.s2, s.s4, s.sigma1, s.sigma2, s.sigma3, s.sigma4
        )
    }
}

/// Evaluate Carson's series with `terms` terms per sum
///
/// Returns [`CarsonError::NumericBreakdown`] as soon as any partial sum
/// becomes NaN, which happens when the power tables overflow for very large
/// `r`.
///
/// # Arguments
/// * `point` - Evaluation point
/// * `tables` - Factorial, harmonic and odd-square tables
/// * `terms` - Number of terms per alternating sum (1..=MAX_ASYMPTOTIC_TERMS)
pub fn asymptotic_series(
    point: &EvaluationPoint,
    tables: &SeriesTables,
    terms: usize,
) -> Result<Complex64, CarsonError> {
    if terms == 0 || terms > MAX_ASYMPTOTIC_TERMS {
        return Err(CarsonError::InvalidConfig(format!(
            "asymptotic series needs 1..={} terms, got {}",
            MAX_ASYMPTOTIC_TERMS, terms
        )));
    }

    let powers = PolarPowers::new(point, 4 * terms);
    let sums = accumulate(point, &powers, tables, terms)?;
    let value = combine(point, &sums);

    if value.is_nan() {
        return Err(breakdown(point, BreakdownStage::Combination { value }, sums));
    }

    log::debug!(
        "asymptotic series at r = {}, theta = {}: {} ({} terms)",
        point.r(),
        point.theta(),
        value,
        terms
    );
    Ok(value)
}

fn accumulate(
    point: &EvaluationPoint,
    powers: &PolarPowers,
    tables: &SeriesTables,
    terms: usize,
) -> Result<PartialSums, CarsonError> {
    let mut sums = PartialSums::default();

    for k in 0..terms {
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };

        // s2 and sigma2 share the (2k+1)!(2k+2)! denominator
        let n = 4 * k + 2;
        let term = sign * powers.half_cis(n)
            / (tables.factorial(2 * k + 1) * tables.factorial(2 * k + 2));
        sums.s2 += term;
        check(point, SeriesSum::S2, k, n, term, &sums)?;

        let term = tables.harmonic(2 * k + 2) * term.re;
        sums.sigma2 += term;
        check(point, SeriesSum::Sigma2, k, n, term.into(), &sums)?;

        // s4 and sigma4 share the (2k+2)!(2k+3)! denominator
        let n = 4 * k + 4;
        let term = sign * powers.half_cis(n)
            / (tables.factorial(2 * k + 2) * tables.factorial(2 * k + 3));
        sums.s4 += term;
        check(point, SeriesSum::S4, k, n, term, &sums)?;

        let term = tables.harmonic(2 * k + 3) * term.re;
        sums.sigma4 += term;
        check(point, SeriesSum::Sigma4, k, n, term.into(), &sums)?;

        let n = 4 * k + 1;
        let term = sign * powers.power(n) * powers.cos(n) / tables.odd_square(4 * k + 3);
        sums.sigma1 += term;
        check(point, SeriesSum::Sigma1, k, n, term.into(), &sums)?;

        let n = 4 * k + 3;
        let term = sign * powers.power(n) * powers.cos(n) / tables.odd_square(4 * k + 5);
        sums.sigma3 += term;
        check(point, SeriesSum::Sigma3, k, n, term.into(), &sums)?;
    }

    Ok(sums)
}

fn combine(point: &EvaluationPoint, s: &PartialSums) -> Complex64 {
    let theta = point.theta();
    let log_term = (2.0 / EULER_GAMMA.exp()).ln() - point.r().ln();

    let p = PI / 8.0 * (1.0 - s.s4.re) + 0.5 * log_term * s.s2.re + 0.5 * theta * s.s2.im
        - FRAC_1_SQRT_2 * s.sigma1
        + 0.5 * s.sigma2
        + FRAC_1_SQRT_2 * s.sigma3;

    let q = 0.25 + 0.5 * log_term * (1.0 - s.s4.re) - 0.5 * theta * s.s4.im
        + FRAC_1_SQRT_2 * s.sigma1
        - PI / 8.0 * s.s2.re
        + FRAC_1_SQRT_2 * s.sigma3
        - 0.5 * s.sigma4;

    Complex64::new(p, q)
}

fn check(
    point: &EvaluationPoint,
    sum: SeriesSum,
    iteration: usize,
    order: usize,
    term: Complex64,
    sums: &PartialSums,
) -> Result<(), CarsonError> {
    if sums.is_nan(sum) {
        let stage = BreakdownStage::Accumulation {
            sum,
            iteration,
            order,
            term,
        };
        Err(breakdown(point, stage, *sums))
    } else {
        Ok(())
    }
}

fn breakdown(
    point: &EvaluationPoint,
    stage: BreakdownStage,
    partial_sums: PartialSums,
) -> CarsonError {
    let ctx = BreakdownContext {
        stage,
        partial_sums,
        r: point.r(),
        theta: point.theta(),
    };
    log::error!("asymptotic series breakdown: {}", ctx);
    CarsonError::NumericBreakdown(Box::new(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_small_argument_limit() {
        // For r -> 0 along the real axis, P -> pi/8 - r sqrt(2)/6
        let tables = SeriesTables::new();
        let point = EvaluationPoint::new(1e-3, 0.0).unwrap();
        let value = asymptotic_series(&point, &tables, 8).unwrap();
        assert_relative_eq!(value.re, PI / 8.0 - 1e-3 * 2f64.sqrt() / 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_terms_rejected() {
        let tables = SeriesTables::new();
        let point = EvaluationPoint::new(1.0, 1.0).unwrap();
        assert!(matches!(
            asymptotic_series(&point, &tables, 0),
            Err(CarsonError::InvalidConfig(_))
        ));
        assert!(asymptotic_series(&point, &tables, MAX_ASYMPTOTIC_TERMS + 1).is_err());
    }

    #[test]
    fn test_overflow_is_breakdown() {
        let tables = SeriesTables::new();
        let point = EvaluationPoint::new(1e100, 0.0).unwrap();
        let err = asymptotic_series(&point, &tables, 8).unwrap_err();
        let ctx = err.breakdown().expect("expected a breakdown");
        // (r/2)^4 overflows on the first pass and inf * sin(0) poisons s4
        match ctx.stage {
            BreakdownStage::Accumulation {
                sum,
                iteration,
                order,
                ..
            } => {
                assert_eq!(sum, SeriesSum::S4);
                assert_eq!(iteration, 0);
                assert_eq!(order, 4);
            }
            other => panic!("expected an accumulation breakdown, got {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_single_term_breaks_in_combination() {
        // One term: s4 and sigma4 are +-inf but not NaN; Q subtracts them
        let tables = SeriesTables::new();
        let point = EvaluationPoint::new(1e100, 2e100).unwrap();
        let err = asymptotic_series(&point, &tables, 1).unwrap_err();
        let ctx = err.breakdown().expect("expected a breakdown");
        assert!(matches!(ctx.stage, BreakdownStage::Combination { value } if value.im.is_nan()));
        assert_eq!(ctx.sum(), None);
        assert!(ctx.partial_sums.s4.re.is_infinite());
        assert!(ctx.to_string().starts_with("combining the sums"));
    }
}
