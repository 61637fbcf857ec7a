//! Lookup tables for Carson's series
//!
//! Factorials, partial harmonic sums and products of odd squares. All three
//! are built once and only read afterwards.

use ndarray::Array1;

use crate::constants::{FACTORIAL_TABLE_LEN, HARMONIC_TABLE_LEN};

/// Precomputed tables consumed by the asymptotic series
#[derive(Debug, Clone)]
pub struct SeriesTables {
    /// `n!` for n = 0..FACTORIAL_TABLE_LEN
    factorial: Array1<f64>,
    /// `1 - 1/(2n) + sum_{k=2}^{n} 1/k` for n >= 2
    harmonic: Array1<f64>,
    /// `n * prod_{k=1}^{n/2 - 1} (2k+1)^2` for odd n
    odd_square: Array1<f64>,
}

impl Default for SeriesTables {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesTables {
    /// Build all three tables
    pub fn new() -> Self {
        let tables = Self {
            factorial: build_factorials(FACTORIAL_TABLE_LEN),
            harmonic: build_harmonic_sums(HARMONIC_TABLE_LEN),
            odd_square: build_odd_square_products(HARMONIC_TABLE_LEN),
        };
        log::debug!(
            "built series tables: {} factorials, {} harmonic sums, {} odd-square products",
            tables.factorial.len(),
            tables.harmonic.len(),
            tables.odd_square.len()
        );
        tables
    }

    /// `n!`
    #[inline]
    pub fn factorial(&self, n: usize) -> f64 {
        self.factorial[n]
    }

    /// Partial harmonic sum `SI[n]`, defined for n >= 2
    #[inline]
    pub fn harmonic(&self, n: usize) -> f64 {
        self.harmonic[n]
    }

    /// Odd-square product `PX[n]`, defined for odd n
    #[inline]
    pub fn odd_square(&self, n: usize) -> f64 {
        self.odd_square[n]
    }

    pub fn factorials(&self) -> &Array1<f64> {
        &self.factorial
    }
}

fn build_factorials(len: usize) -> Array1<f64> {
    let mut f = Array1::<f64>::ones(len);
    for n in 1..len {
        f[n] = n as f64 * f[n - 1];
    }
    f
}

fn build_harmonic_sums(len: usize) -> Array1<f64> {
    let mut si = Array1::<f64>::zeros(len);
    let mut h = 1.0;
    for n in 2..len {
        h += 1.0 / n as f64;
        si[n] = h - 0.5 / n as f64;
    }
    si
}

fn build_odd_square_products(max_order: usize) -> Array1<f64> {
    let mut px = Array1::<f64>::zeros(max_order + 1);
    let mut product = 1.0;
    for n in (1..=max_order).step_by(2) {
        // Moving from n - 2 to n adds the factor (n - 2)^2 once n >= 5
        if n >= 5 {
            let odd = (n - 2) as f64;
            product *= odd * odd;
        }
        px[n] = n as f64 * product;
    }
    px
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_factorial_seeds() {
        let t = SeriesTables::new();
        assert_eq!(t.factorial(0), 1.0);
        assert_eq!(t.factorial(1), 1.0);
        assert_eq!(t.factorial(5), 120.0);
        assert_eq!(t.factorials().len(), FACTORIAL_TABLE_LEN);
    }

    #[test]
    fn test_harmonic_first_entries() {
        let t = SeriesTables::new();
        assert_relative_eq!(t.harmonic(2), 1.25, epsilon = 1e-15);
        assert_relative_eq!(t.harmonic(3), 5.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_odd_square_first_entries() {
        let t = SeriesTables::new();
        assert_eq!(t.odd_square(1), 1.0);
        assert_eq!(t.odd_square(3), 3.0);
        assert_eq!(t.odd_square(5), 45.0);
        assert_eq!(t.odd_square(7), 1575.0);
        assert_eq!(t.odd_square(9), 99225.0);
        assert_eq!(t.odd_square(4), 0.0);
    }
}
