//! carson-core: Carson's earth-return correction, three ways
//!
//! Evaluates the correction integral
//! `J(p, q) = ∫₀^∞ (√(μ² + i) − μ) e^{−pμ} cos(qμ) dμ = P + iQ`
//! with two series expansions and a brute-force quadrature, so that each
//! can be checked against the others.
//!
//! ## Modules
//!
//! - `math` - Factorial/harmonic/odd-square tables, EMTP coefficients, power tables
//! - `series` - Carson's asymptotic series and the EMTP series
//! - `quadrature` - Composite Simpson reference integral and its sample stream
//! - `evaluate` - Evaluator owning the tables and comparing the three methods
//! - `geometry` - Conductor geometry to `(p, q)` and Ohm/km scaling

pub mod constants;
pub mod error;
pub mod evaluate;
pub mod geometry;
pub mod math;
pub mod point;
pub mod quadrature;
pub mod series;

pub use error::CarsonError;
pub use evaluate::{Comparison, Evaluator, EvaluatorConfig, SeriesConfig};
pub use geometry::EarthReturn;
pub use point::EvaluationPoint;
pub use quadrature::QuadratureConfig;
pub use series::{Accuracy, EmtpTruncation, SeriesValue};
