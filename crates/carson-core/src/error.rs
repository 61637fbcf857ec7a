//! Error types shared by the evaluators

use thiserror::Error;

use crate::series::asymptotic::BreakdownContext;

/// Errors raised while setting up or running an evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CarsonError {
    #[error("degenerate evaluation point p = {p}, q = {q}: both must be finite and not both zero")]
    DegenerateInput { p: f64, q: f64 },

    #[error("numerical breakdown in asymptotic series: {0}")]
    NumericBreakdown(Box<BreakdownContext>),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid conductor geometry: {0}")]
    InvalidGeometry(String),
}

impl CarsonError {
    /// Diagnostic context of a breakdown, if this is one
    pub fn breakdown(&self) -> Option<&BreakdownContext> {
        match self {
            CarsonError::NumericBreakdown(ctx) => Some(ctx),
            _ => None,
        }
    }
}
