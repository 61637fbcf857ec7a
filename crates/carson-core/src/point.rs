//! Evaluation point of the correction integral
//!
//! Holds `(p, q)` together with the polar form `r = |p + iq|`,
//! `theta = atan2(q, p)` that both series expansions are written in.

use num_complex::Complex64;

use crate::error::CarsonError;

/// A validated `(p, q)` pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationPoint {
    p: f64,
    q: f64,
    r: f64,
    theta: f64,
}

impl EvaluationPoint {
    /// Create a new evaluation point
    ///
    /// Rejects non-finite components and the origin, where the logarithm in
    /// both series is undefined.
    ///
    /// # Example
    /// ```
    /// use carson_core::EvaluationPoint;
    /// let point = EvaluationPoint::new(3.0, 4.0).unwrap();
    /// assert_eq!(point.r(), 5.0);
    /// ```
    pub fn new(p: f64, q: f64) -> Result<Self, CarsonError> {
        if !p.is_finite() || !q.is_finite() || (p == 0.0 && q == 0.0) {
            return Err(CarsonError::DegenerateInput { p, q });
        }

        Ok(Self {
            p,
            q,
            r: p.hypot(q),
            theta: q.atan2(p),
        })
    }

    /// Create from a complex argument `p + iq`
    pub fn from_complex(z: Complex64) -> Result<Self, CarsonError> {
        Self::new(z.re, z.im)
    }

    #[inline]
    pub fn p(&self) -> f64 {
        self.p
    }

    #[inline]
    pub fn q(&self) -> f64 {
        self.q
    }

    /// Magnitude `|p + iq|`
    #[inline]
    pub fn r(&self) -> f64 {
        self.r
    }

    /// Angle `atan2(q, p)` in radians
    #[inline]
    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn as_complex(&self) -> Complex64 {
        Complex64::new(self.p, self.q)
    }

    /// The same point with `q` negated
    pub fn conjugate(&self) -> Self {
        Self {
            p: self.p,
            q: -self.q,
            r: self.r,
            theta: -self.theta,
        }
    }

    /// Whether the integrand decays over the truncated quadrature domain
    pub fn is_damped(&self) -> bool {
        self.p > 0.0
    }
}
