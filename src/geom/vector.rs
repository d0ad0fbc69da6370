//! 2D vectors stored either as Cartesian or Polar coordinates
//!
//! Both forms answer the same questions (x, y, magnitude, angle); arithmetic
//! keeps the representation of the receiver. A Polar vector always has a
//! non-negative magnitude and an angle in [0, 2π).

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::GeometryError;
use crate::{cartesian_to_polar, normalize_angle, polar_to_cartesian};

/// Serialized and stored form of a [`Vector`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum Repr {
    Cartesian { x: f64, y: f64 },
    Polar { magnitude: f64, angle: f64 },
}

/// An immutable 2D displacement or position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Repr", into = "Repr")]
pub struct Vector {
    repr: Repr,
}

impl Vector {
    /// The Cartesian origin
    pub const ZERO: Vector = Vector {
        repr: Repr::Cartesian { x: 0.0, y: 0.0 },
    };

    /// Build a Cartesian vector, rejecting NaN and infinities
    pub fn cartesian(x: f64, y: f64) -> Result<Self, GeometryError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GeometryError::InvalidVector(x, y));
        }
        Ok(Self {
            repr: Repr::Cartesian { x, y },
        })
    }

    /// Build a Polar vector
    ///
    /// A negative magnitude is flipped to positive and the angle turned by π,
    /// so `polar(-2, 0)` points the same way as `polar(2, π)`.
    pub fn polar(magnitude: f64, angle: f64) -> Result<Self, GeometryError> {
        if !magnitude.is_finite() || !angle.is_finite() {
            return Err(GeometryError::InvalidVector(magnitude, angle));
        }
        let (magnitude, angle) = if magnitude < 0.0 {
            (-magnitude, angle + PI)
        } else {
            (magnitude, angle)
        };
        Ok(Self {
            repr: Repr::Polar {
                magnitude,
                angle: normalize_angle(angle),
            },
        })
    }

    /// Build a Cartesian vector from a glam vector
    pub fn from_dvec2(v: DVec2) -> Result<Self, GeometryError> {
        Self::cartesian(v.x, v.y)
    }

    pub fn is_polar(&self) -> bool {
        matches!(self.repr, Repr::Polar { .. })
    }

    pub fn x(&self) -> f64 {
        match self.repr {
            Repr::Cartesian { x, .. } => x,
            Repr::Polar { magnitude, angle } => magnitude * angle.cos(),
        }
    }

    pub fn y(&self) -> f64 {
        match self.repr {
            Repr::Cartesian { y, .. } => y,
            Repr::Polar { magnitude, angle } => magnitude * angle.sin(),
        }
    }

    pub fn magnitude(&self) -> f64 {
        match self.repr {
            Repr::Cartesian { x, y } => x.hypot(y),
            Repr::Polar { magnitude, .. } => magnitude,
        }
    }

    /// Direction in [0, 2π); the zero vector reports 0
    pub fn angle(&self) -> f64 {
        match self.repr {
            Repr::Cartesian { x, y } => normalize_angle(y.atan2(x)),
            Repr::Polar { angle, .. } => angle,
        }
    }

    /// Cartesian components as a glam vector
    #[inline]
    pub fn to_dvec2(&self) -> DVec2 {
        match self.repr {
            Repr::Cartesian { x, y } => DVec2::new(x, y),
            Repr::Polar { magnitude, angle } => polar_to_cartesian(magnitude, angle),
        }
    }

    /// Same vector in Polar form
    ///
    /// Fails only when the magnitude of a huge Cartesian vector overflows.
    pub fn to_polar(&self) -> Result<Self, GeometryError> {
        match self.repr {
            Repr::Polar { .. } => Ok(*self),
            Repr::Cartesian { x, y } => {
                let (magnitude, angle) = cartesian_to_polar(DVec2::new(x, y));
                Self::polar(magnitude, angle)
            }
        }
    }

    /// Same vector in Cartesian form
    pub fn to_cartesian(&self) -> Result<Self, GeometryError> {
        match self.repr {
            Repr::Cartesian { .. } => Ok(*self),
            Repr::Polar { .. } => Self::cartesian(self.x(), self.y()),
        }
    }

    /// Opposite direction, same length
    pub fn invert(&self) -> Self {
        let repr = match self.repr {
            Repr::Cartesian { x, y } => Repr::Cartesian { x: -x, y: -y },
            Repr::Polar { magnitude, angle } => Repr::Polar {
                magnitude,
                angle: normalize_angle(angle + PI),
            },
        };
        Self { repr }
    }

    /// Cap the magnitude at 1, keeping direction
    ///
    /// Vectors shorter than 1 come back unchanged; this is a speed clamp, not
    /// unit scaling.
    pub fn normalize(&self) -> Self {
        let magnitude = self.magnitude();
        if magnitude < 1.0 {
            return *self;
        }
        let repr = match self.repr {
            Repr::Cartesian { x, y } if magnitude.is_finite() => Repr::Cartesian {
                x: x / magnitude,
                y: y / magnitude,
            },
            Repr::Cartesian { .. } => {
                let angle = self.angle();
                Repr::Cartesian {
                    x: angle.cos(),
                    y: angle.sin(),
                }
            }
            Repr::Polar { angle, .. } => Repr::Polar {
                magnitude: 1.0,
                angle,
            },
        };
        Self { repr }
    }

    /// Component-wise sum, in the receiver's representation
    pub fn add(&self, other: &Vector) -> Result<Self, GeometryError> {
        self.with_cartesian(self.to_dvec2() + other.to_dvec2())
    }

    /// Component-wise difference, in the receiver's representation
    pub fn subtract(&self, other: &Vector) -> Result<Self, GeometryError> {
        self.with_cartesian(self.to_dvec2() - other.to_dvec2())
    }

    fn with_cartesian(&self, v: DVec2) -> Result<Self, GeometryError> {
        let result = Self::from_dvec2(v)?;
        if self.is_polar() {
            result.to_polar()
        } else {
            Ok(result)
        }
    }
}

impl Default for Vector {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<Repr> for Vector {
    type Error = GeometryError;

    fn try_from(repr: Repr) -> Result<Self, Self::Error> {
        match repr {
            Repr::Cartesian { x, y } => Self::cartesian(x, y),
            Repr::Polar { magnitude, angle } => Self::polar(magnitude, angle),
        }
    }
}

impl From<Vector> for Repr {
    fn from(v: Vector) -> Self {
        v.repr
    }
}
