//! Reference quadrature of Carson's integral
//!
//! Evaluates
//!
//! ```text
//! J(p, q) = integral_0^inf (sqrt(mu^2 + i) - mu) e^{-p mu} cos(q mu) d mu
//! ```
//!
//! by composite Simpson over the truncated domain `[0, upper_limit]`. The
//! integrand samples are exposed as a lazy iterator so they can be exported
//! for plotting without touching the quadrature itself.

use std::iter::FusedIterator;

use num_complex::Complex64;

use crate::constants::{DEFAULT_INTERVALS, DEFAULT_UPPER_LIMIT};
use crate::error::CarsonError;
use crate::point::EvaluationPoint;

/// Truncation parameters of the reference integral
///
/// Only constructible through [`QuadratureConfig::new`] or `Default`, so every
/// instance describes a valid composite Simpson rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureConfig {
    upper_limit: f64,
    intervals: usize,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            upper_limit: DEFAULT_UPPER_LIMIT,
            intervals: DEFAULT_INTERVALS,
        }
    }
}

impl QuadratureConfig {
    /// Create a validated configuration
    ///
    /// # Arguments
    /// * `upper_limit` - Upper bound substituted for infinity, positive and finite
    /// * `intervals` - Number of Simpson intervals, positive and even
    pub fn new(upper_limit: f64, intervals: usize) -> Result<Self, CarsonError> {
        if !(upper_limit.is_finite() && upper_limit > 0.0) {
            return Err(CarsonError::InvalidConfig(format!(
                "quadrature upper limit must be positive and finite, got {}",
                upper_limit
            )));
        }
        if intervals == 0 || intervals % 2 != 0 {
            return Err(CarsonError::InvalidConfig(format!(
                "Simpson's rule needs a positive even interval count, got {}",
                intervals
            )));
        }
        Ok(Self {
            upper_limit,
            intervals,
        })
    }

    /// Same upper limit with a different interval count
    pub fn with_intervals(self, intervals: usize) -> Result<Self, CarsonError> {
        Self::new(self.upper_limit, intervals)
    }

    /// Upper bound substituted for infinity
    #[inline]
    pub fn upper_limit(&self) -> f64 {
        self.upper_limit
    }

    /// Number of Simpson intervals (even)
    #[inline]
    pub fn intervals(&self) -> usize {
        self.intervals
    }

    /// Sample spacing `upper_limit / intervals`
    #[inline]
    pub fn step(&self) -> f64 {
        self.upper_limit / self.intervals as f64
    }

    /// Bound on the discarded tail `integral_U^inf |f| d mu <= e^{-pU} / (2pU)`
    ///
    /// Infinite for `p <= 0`, where the integrand does not decay.
    pub fn tail_bound(&self, p: f64) -> f64 {
        if p <= 0.0 {
            return f64::INFINITY;
        }
        (-p * self.upper_limit).exp() / (2.0 * p * self.upper_limit)
    }
}

/// Carson integrand at `mu`
///
/// `sqrt(mu^2 + i) - mu` is evaluated as `i / (sqrt(mu^2 + i) + mu)`, the same
/// quantity without cancellation at large `mu`.
#[inline]
pub fn integrand(p: f64, q: f64, mu: f64) -> Complex64 {
    let root = Complex64::new(mu * mu, 1.0).sqrt();
    Complex64::i() / (root + mu) * ((-p * mu).exp() * (q * mu).cos())
}

/// Simpson weight of sample `j` out of `0..=n`
#[inline]
fn simpson_weight(j: usize, n: usize) -> f64 {
    if j == 0 || j == n {
        1.0
    } else if j % 2 == 1 {
        4.0
    } else {
        2.0
    }
}

/// Lazy stream of `(mu_j, f(mu_j))` for j = 0..=intervals
///
/// Each call to [`IntegrandSamples::new`] starts a fresh pass over the same
/// grid; a clone continues from the position it was taken at.
#[derive(Debug, Clone)]
pub struct IntegrandSamples {
    p: f64,
    q: f64,
    step: f64,
    next: usize,
    intervals: usize,
}

impl IntegrandSamples {
    pub fn new(point: &EvaluationPoint, config: &QuadratureConfig) -> Self {
        Self {
            p: point.p(),
            q: point.q(),
            step: config.step(),
            next: 0,
            intervals: config.intervals,
        }
    }
}

impl Iterator for IntegrandSamples {
    type Item = (f64, Complex64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.intervals {
            return None;
        }
        let mu = self.next as f64 * self.step;
        self.next += 1;
        Some((mu, integrand(self.p, self.q, mu)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.intervals + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for IntegrandSamples {}

impl FusedIterator for IntegrandSamples {}

/// Quadrature value with its error indicators
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureEstimate {
    /// Simpson value on the full grid
    pub value: Complex64,
    /// Richardson estimate `|S_N - S_{N/2}| / 15`, when N is divisible by 4
    pub error_estimate: Option<f64>,
    /// Bound on the truncated tail beyond `upper_limit`
    pub tail_bound: f64,
}

/// Composite Simpson value of the truncated integral
///
pub fn simpson(point: &EvaluationPoint, config: &QuadratureConfig) -> Complex64 {
    let n = config.intervals;
    let sum: Complex64 = IntegrandSamples::new(point, config)
        .enumerate()
        .map(|(j, (_, f))| f * simpson_weight(j, n))
        .sum();
    sum * (config.step() / 3.0)
}

/// Simpson value plus a Richardson error estimate and a tail bound
///
/// The coarse rule reuses the even samples of the fine grid, so both come
/// out of a single pass.
pub fn integrate_with_estimate(
    point: &EvaluationPoint,
    config: &QuadratureConfig,
) -> QuadratureEstimate {
    let n = config.intervals;
    let h = config.step();
    let has_coarse = n % 4 == 0;

    let mut fine = Complex64::new(0.0, 0.0);
    let mut coarse = Complex64::new(0.0, 0.0);
    for (j, (_, f)) in IntegrandSamples::new(point, config).enumerate() {
        fine += f * simpson_weight(j, n);
        if has_coarse && j % 2 == 0 {
            coarse += f * simpson_weight(j / 2, n / 2);
        }
    }
    let fine = fine * (h / 3.0);
    let coarse = coarse * (2.0 * h / 3.0);

    if !point.is_damped() {
        log::warn!(
            "quadrature at p = {} <= 0: integrand does not decay on [0, {}], result unreliable",
            point.p(),
            config.upper_limit
        );
    }

    let estimate = QuadratureEstimate {
        value: fine,
        error_estimate: has_coarse.then(|| (fine - coarse).norm() / 15.0),
        tail_bound: config.tail_bound(point.p()),
    };
    log::debug!(
        "quadrature at p = {}, q = {}: {} (richardson {:?}, tail {:e})",
        point.p(),
        point.q(),
        estimate.value,
        estimate.error_estimate,
        estimate.tail_bound
    );
    estimate
}
