//! EMTP series coefficients
//!
//! Builds the `b`, `c` and `d` vectors of the EMTP Theory Book series
//! (eq. 4.12). The book states that the sign in the `b` recurrence changes
//! after every four successive terms, i.e. `(-1)^floor((n-1)/4)`; applied
//! inside the recurrence that rule produces wrong signs from `b7` onwards.
//! The recurrence here uses `sign(n) = (-1)^(floor((n+1)/2) mod 2)`, which
//! makes the coefficients themselves change sign every four orders.

use ndarray::Array1;
use std::f64::consts::PI;

use crate::constants::{EMTP_B1, EMTP_B2, EMTP_C2, EMTP_MAX_ORDER, EMTP_TABLE_LEN};

/// Sign applied inside the `b` recurrence at order `n`
#[inline]
pub fn recurrence_sign(n: usize) -> f64 {
    if ((n + 1) / 2) % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// EMTP coefficient triple, indexed from 1
#[derive(Debug, Clone)]
pub struct EmtpCoefficients {
    b: Array1<f64>,
    c: Array1<f64>,
    d: Array1<f64>,
}

impl Default for EmtpCoefficients {
    fn default() -> Self {
        Self::new()
    }
}

impl EmtpCoefficients {
    /// Generate the coefficients for orders 1..=EMTP_MAX_ORDER
    pub fn new() -> Self {
        let mut b = Array1::<f64>::zeros(EMTP_TABLE_LEN);
        let mut c = Array1::<f64>::zeros(EMTP_TABLE_LEN);

        b[1] = EMTP_B1;
        b[2] = EMTP_B2;
        c[2] = EMTP_C2;

        for n in 3..=EMTP_MAX_ORDER {
            let nf = n as f64;
            b[n] = recurrence_sign(n) * b[n - 2] / (nf * (nf + 2.0));
            c[n] = c[n - 2] + 1.0 / nf + 1.0 / (nf + 2.0);
        }

        let d = b.mapv(|bn| PI / 4.0 * bn);

        log::debug!("built EMTP coefficients up to order {}", EMTP_MAX_ORDER);
        Self { b, c, d }
    }

    #[inline]
    pub fn b(&self, n: usize) -> f64 {
        self.b[n]
    }

    #[inline]
    pub fn c(&self, n: usize) -> f64 {
        self.c[n]
    }

    #[inline]
    pub fn d(&self, n: usize) -> f64 {
        self.d[n]
    }

    /// Highest order with a generated coefficient
    pub fn max_order(&self) -> usize {
        EMTP_MAX_ORDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sign_pattern() {
        let signs: Vec<f64> = (3..=10).map(recurrence_sign).collect();
        assert_eq!(signs, vec![1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_coefficient_signs_change_every_four_orders() {
        let coeffs = EmtpCoefficients::new();
        for n in 1..=EMTP_MAX_ORDER {
            let expected = if ((n - 1) / 4) % 2 == 0 { 1.0 } else { -1.0 };
            assert_eq!(coeffs.b(n).signum(), expected, "order {}", n);
        }
    }

    #[test]
    fn test_d_is_quarter_pi_b() {
        let coeffs = EmtpCoefficients::new();
        assert_relative_eq!(coeffs.d(2), PI / 64.0, epsilon = 1e-15);
        assert_eq!(coeffs.d(0), 0.0);
    }
}
