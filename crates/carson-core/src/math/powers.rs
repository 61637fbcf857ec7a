//! Power and trigonometric tables for one evaluation point

use ndarray::Array1;
use num_complex::Complex64;

use crate::point::EvaluationPoint;

/// `r^n`, `(r/2)^n`, `cos(n theta)` and `sin(n theta)` for n = 0..=max_order
#[derive(Debug, Clone)]
pub struct PolarPowers {
    power: Array1<f64>,
    half_power: Array1<f64>,
    cos: Array1<f64>,
    sin: Array1<f64>,
}

impl PolarPowers {
    pub fn new(point: &EvaluationPoint, max_order: usize) -> Self {
        let len = max_order + 1;
        let r = point.r();
        let theta = point.theta();

        let mut power = Array1::<f64>::ones(len);
        let mut half_power = Array1::<f64>::ones(len);
        for n in 1..len {
            power[n] = power[n - 1] * r;
            half_power[n] = half_power[n - 1] * (r / 2.0);
        }

        let cos = Array1::from_shape_fn(len, |n| (n as f64 * theta).cos());
        let sin = Array1::from_shape_fn(len, |n| (n as f64 * theta).sin());

        Self {
            power,
            half_power,
            cos,
            sin,
        }
    }

    pub fn max_order(&self) -> usize {
        self.power.len() - 1
    }

    #[inline]
    pub fn power(&self, n: usize) -> f64 {
        self.power[n]
    }

    #[inline]
    pub fn half_power(&self, n: usize) -> f64 {
        self.half_power[n]
    }

    #[inline]
    pub fn cos(&self, n: usize) -> f64 {
        self.cos[n]
    }

    #[inline]
    pub fn sin(&self, n: usize) -> f64 {
        self.sin[n]
    }

    /// `(r/2)^n * e^{i n theta}`
    #[inline]
    pub fn half_cis(&self, n: usize) -> Complex64 {
        Complex64::new(self.half_power[n] * self.cos[n], self.half_power[n] * self.sin[n])
    }

    /// Every non-finite entry up to `max_order` as `(table name, order, value)`
    pub fn non_finite_entries(&self, max_order: usize) -> Vec<(&'static str, usize, f64)> {
        let len = (max_order + 1).min(self.power.len());
        let tables = [
            ("r^n", &self.power),
            ("(r/2)^n", &self.half_power),
            ("cos(n theta)", &self.cos),
            ("sin(n theta)", &self.sin),
        ];

        tables
            .iter()
            .flat_map(|(name, table)| {
                table
                    .iter()
                    .take(len)
                    .enumerate()
                    .filter(|(_, v)| !v.is_finite())
                    .map(move |(n, &v)| (*name, n, v))
            })
            .collect()
    }
}
