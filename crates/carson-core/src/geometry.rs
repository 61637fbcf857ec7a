//! Earth-return geometry
//!
//! Maps a physical conductor arrangement onto the dimensionless evaluation
//! point and scales the resulting correction back to Ohm/km.
//!
//! With `D` the distance from conductor i to the image of conductor k and
//! `phi` the angle between that line and the vertical (EMTP Theory Book,
//! Fig. 4.4 and eq. 4.10):
//!
//! ```text
//! a = 4 pi sqrt(5) 1e-4 D sqrt(f / rho)
//! p = a cos(phi),  q = a sin(phi)
//! dR' + j dX' = 4 omega 1e-4 (P + jQ)    [Ohm/km]
//! ```

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::constants::EARTH_RETURN_SCALE;
use crate::error::CarsonError;
use crate::point::EvaluationPoint;

/// Which impedance term the correction belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conductors {
    /// Self term of a conductor at `height` metres
    SelfTerm { height: f64 },
    /// Mutual term between conductors at heights `h_i`, `h_k`, horizontally
    /// `x_ik` metres apart
    Mutual { h_i: f64, h_k: f64, x_ik: f64 },
}

/// Conductor geometry plus the soil and frequency it is evaluated at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthReturn {
    pub conductors: Conductors,
    /// Frequency in Hz
    pub frequency: f64,
    /// Earth resistivity in Ohm.m
    pub resistivity: f64,
}

fn positive(name: &str, value: f64) -> Result<(), CarsonError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CarsonError::InvalidGeometry(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}

impl EarthReturn {
    /// Self term of a single conductor
    pub fn self_term(height: f64, frequency: f64, resistivity: f64) -> Result<Self, CarsonError> {
        Self::new(Conductors::SelfTerm { height }, frequency, resistivity)
    }

    /// Mutual term between two conductors
    pub fn mutual(
        h_i: f64,
        h_k: f64,
        x_ik: f64,
        frequency: f64,
        resistivity: f64,
    ) -> Result<Self, CarsonError> {
        Self::new(Conductors::Mutual { h_i, h_k, x_ik }, frequency, resistivity)
    }

    pub fn new(
        conductors: Conductors,
        frequency: f64,
        resistivity: f64,
    ) -> Result<Self, CarsonError> {
        match conductors {
            Conductors::SelfTerm { height } => positive("height", height)?,
            Conductors::Mutual { h_i, h_k, x_ik } => {
                positive("h_i", h_i)?;
                positive("h_k", h_k)?;
                if !x_ik.is_finite() {
                    return Err(CarsonError::InvalidGeometry(format!(
                        "x_ik must be finite, got {}",
                        x_ik
                    )));
                }
            }
        }
        positive("frequency", frequency)?;
        positive("resistivity", resistivity)?;

        Ok(Self {
            conductors,
            frequency,
            resistivity,
        })
    }

    /// Distance `D` between conductor i and the image of conductor k, in metres
    pub fn image_distance(&self) -> f64 {
        match self.conductors {
            Conductors::SelfTerm { height } => 2.0 * height,
            Conductors::Mutual { h_i, h_k, x_ik } => (h_i + h_k).hypot(x_ik),
        }
    }

    /// Angle `phi` between the image line and the vertical, in radians
    pub fn angle(&self) -> f64 {
        match self.conductors {
            Conductors::SelfTerm { .. } => 0.0,
            Conductors::Mutual { h_i, h_k, x_ik } => x_ik.atan2(h_i + h_k),
        }
    }

    /// Carson's parameter `a`
    pub fn parameter(&self) -> f64 {
        4.0 * PI * 5f64.sqrt() * 1e-4 * self.image_distance()
            * (self.frequency / self.resistivity).sqrt()
    }

    /// Dimensionless evaluation point `(a cos phi, a sin phi)`
    pub fn point(&self) -> Result<EvaluationPoint, CarsonError> {
        EvaluationPoint::from_complex(Complex64::from_polar(self.parameter(), self.angle()))
    }

    /// Factor `4 omega 1e-4` from the dimensionless correction to Ohm/km
    pub fn scale(&self) -> f64 {
        4.0 * 2.0 * PI * self.frequency * EARTH_RETURN_SCALE
    }

    /// Series corrections `dR' + j dX'` in Ohm/km for a correction `P + jQ`
    pub fn correction(&self, value: Complex64) -> Complex64 {
        value * self.scale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_self_term_is_on_real_axis() {
        let er = EarthReturn::self_term(10.0, 60.0, 100.0).unwrap();
        let point = er.point().unwrap();
        assert_eq!(point.q(), 0.0);
        assert_relative_eq!(point.p(), 0.043_531_184_741_621_23, epsilon = 1e-15);
    }

    #[test]
    fn test_mutual_angle() {
        let er = EarthReturn::mutual(10.0, 10.0, 20.0, 50.0, 100.0).unwrap();
        assert_relative_eq!(er.angle(), PI / 4.0, epsilon = 1e-15);
        assert_relative_eq!(er.image_distance(), 20.0 * 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_scale_at_60_hz() {
        let er = EarthReturn::self_term(10.0, 60.0, 100.0).unwrap();
        assert_relative_eq!(er.scale(), 4.0 * 120.0 * PI * 1e-4, epsilon = 1e-15);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(EarthReturn::self_term(0.0, 60.0, 100.0).is_err());
        assert!(EarthReturn::self_term(10.0, -60.0, 100.0).is_err());
        assert!(EarthReturn::mutual(10.0, 12.0, f64::NAN, 60.0, 100.0).is_err());
    }
}
