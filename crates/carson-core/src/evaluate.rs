//! Three-way evaluation of the correction
//!
//! [`Evaluator`] owns the series tables and runs the asymptotic series, the
//! EMTP series and the reference quadrature for one `(p, q)`, returning all
//! three side by side. None of them is treated as authoritative; the
//! [`Comparison`] only reports how far the series are from the quadrature.

use num_complex::Complex64;

use crate::constants::{DEFAULT_ASYMPTOTIC_TERMS, MAX_ASYMPTOTIC_TERMS};
use crate::error::CarsonError;
use crate::geometry::EarthReturn;
use crate::math::{EmtpCoefficients, SeriesTables};
use crate::point::EvaluationPoint;
use crate::quadrature::{integrate_with_estimate, IntegrandSamples, QuadratureConfig, QuadratureEstimate};
use crate::series::{asymptotic_series, EmtpTruncation, SeriesValue};

/// Truncation of the two series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesConfig {
    /// Terms per alternating sum in the asymptotic series
    pub asymptotic_terms: usize,
    /// Fixed order or convergence tolerance of the EMTP series
    pub emtp: EmtpTruncation,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            asymptotic_terms: DEFAULT_ASYMPTOTIC_TERMS,
            emtp: EmtpTruncation::default(),
        }
    }
}

impl SeriesConfig {
    pub fn validate(&self) -> Result<(), CarsonError> {
        if !(1..=MAX_ASYMPTOTIC_TERMS).contains(&self.asymptotic_terms) {
            return Err(CarsonError::InvalidConfig(format!(
                "asymptotic_terms must be in 1..={}, got {}",
                MAX_ASYMPTOTIC_TERMS, self.asymptotic_terms
            )));
        }
        self.emtp.validate()
    }
}

/// Full evaluator configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EvaluatorConfig {
    pub series: SeriesConfig,
    pub quadrature: QuadratureConfig,
}

impl EvaluatorConfig {
    pub fn validate(&self) -> Result<(), CarsonError> {
        self.series.validate()
    }
}

/// The three evaluations at one point
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub point: EvaluationPoint,
    /// Reference quadrature with its error indicators
    pub quadrature: QuadratureEstimate,
    /// Carson's series, or the breakdown that stopped it
    pub asymptotic: Result<Complex64, CarsonError>,
    /// EMTP series and its accuracy status
    pub emtp: SeriesValue,
}

impl Comparison {
    /// Quadrature value `P + iQ`
    pub fn reference(&self) -> Complex64 {
        self.quadrature.value
    }

    /// `|value - reference| / |reference|`
    pub fn relative_deviation(&self, value: Complex64) -> f64 {
        (value - self.reference()).norm() / self.reference().norm()
    }

    /// Deviation of the asymptotic series from the quadrature, if it succeeded
    pub fn asymptotic_deviation(&self) -> Option<f64> {
        self.asymptotic
            .as_ref()
            .ok()
            .map(|&value| self.relative_deviation(value))
    }

    /// Deviation of the EMTP series from the quadrature
    pub fn emtp_deviation(&self) -> f64 {
        self.relative_deviation(self.emtp.value)
    }

    /// Whether both series succeeded and sit within `tol` of the quadrature
    pub fn agrees_within(&self, tol: f64) -> bool {
        !self.emtp.is_degraded()
            && self.emtp_deviation() <= tol
            && self.asymptotic_deviation().is_some_and(|d| d <= tol)
    }
}

/// Owner of the precomputed tables
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: EvaluatorConfig,
    tables: SeriesTables,
    coefficients: EmtpCoefficients,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Create an evaluator with the default configuration
    pub fn new() -> Self {
        Self {
            config: EvaluatorConfig::default(),
            tables: SeriesTables::new(),
            coefficients: EmtpCoefficients::new(),
        }
    }

    /// Create an evaluator with a custom configuration
    pub fn with_config(config: EvaluatorConfig) -> Result<Self, CarsonError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate all three methods at `(p, q)`
    ///
    /// # Example
    /// ```
    /// use carson_core::Evaluator;
    /// let evaluator = Evaluator::new();
    /// let cmp = evaluator.evaluate(5.0, 1.0).unwrap();
    /// assert!(cmp.agrees_within(1e-3));
    /// ```
    pub fn evaluate(&self, p: f64, q: f64) -> Result<Comparison, CarsonError> {
        let point = EvaluationPoint::new(p, q)?;
        self.evaluate_point(&point)
    }

    /// Evaluate all three methods at a validated point
    pub fn evaluate_point(&self, point: &EvaluationPoint) -> Result<Comparison, CarsonError> {
        let series = &self.config.series;

        let quadrature = integrate_with_estimate(point, &self.config.quadrature);
        let asymptotic = asymptotic_series(point, &self.tables, series.asymptotic_terms);
        let emtp = series.emtp.evaluate(point, &self.coefficients)?;

        Ok(Comparison {
            point: *point,
            quadrature,
            asymptotic,
            emtp,
        })
    }

    /// Evaluate at the point described by a conductor geometry
    pub fn evaluate_geometry(&self, geometry: &EarthReturn) -> Result<Comparison, CarsonError> {
        self.evaluate_point(&geometry.point()?)
    }

    /// Lazy integrand samples of the reference quadrature, for plotting
    pub fn integrand_samples(&self, p: f64, q: f64) -> Result<IntegrandSamples, CarsonError> {
        let point = EvaluationPoint::new(p, q)?;
        Ok(IntegrandSamples::new(&point, &self.config.quadrature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EvaluatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_series_config() {
        let config = EvaluatorConfig {
            series: SeriesConfig {
                asymptotic_terms: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(Evaluator::with_config(config).is_err());

        let config = EvaluatorConfig {
            series: SeriesConfig {
                asymptotic_terms: 8,
                emtp: EmtpTruncation::Order(crate::constants::EMTP_MAX_ORDER + 1),
            },
            ..Default::default()
        };
        assert!(Evaluator::with_config(config).is_err());

        let config = EvaluatorConfig {
            series: SeriesConfig {
                asymptotic_terms: 8,
                emtp: EmtpTruncation::Tolerance(-1.0),
            },
            ..Default::default()
        };
        assert!(Evaluator::with_config(config).is_err());
    }

    #[test]
    fn test_rejects_origin() {
        let evaluator = Evaluator::new();
        assert!(matches!(
            evaluator.evaluate(0.0, 0.0),
            Err(CarsonError::DegenerateInput { .. })
        ));
        assert!(evaluator.integrand_samples(0.0, 0.0).is_err());
    }
}
