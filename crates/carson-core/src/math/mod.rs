//! Mathematical building blocks
//!
//! Precomputed tables and coefficients for the two series expansions, and
//! the per-point power/trigonometric tables they share.

pub mod coefficients;
pub mod powers;
pub mod tables;

pub use coefficients::EmtpCoefficients;
pub use powers::PolarPowers;
pub use tables::SeriesTables;
