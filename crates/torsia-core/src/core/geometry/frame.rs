use super::Point3;
use nalgebra::{Unit, Vector3};
use thiserror::Error;

/// Default tolerance below which reference points are considered coincident or colinear.
pub const DEFAULT_DEGENERACY_TOLERANCE: f64 = 1e-6;

/// Reasons a set of three reference points cannot span a local frame.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum FrameError {
    #[error("reference points {first} and {second} coincide (separation {separation:.3e})")]
    Coincident {
        first: usize,
        second: usize,
        separation: f64,
    },
    #[error("reference points are colinear (sine of the bend {sine:.3e})")]
    Colinear { sine: f64 },
}

/// A right-handed orthonormal basis anchored at the third reference point.
///
/// For references `(p0, p1, p2)` the first axis runs along the `p1 -> p2` bond, the third
/// axis is normal to the `p0, p1, p2` plane and the second axis completes the basis so
/// that it points back towards `p0`. A dihedral of zero therefore places the new point
/// cis to `p0`, and `pi` places it trans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    origin: Point3,
    bond_axis: Unit<Vector3<f64>>,
    bend_axis: Unit<Vector3<f64>>,
    normal_axis: Unit<Vector3<f64>>,
}

impl LocalFrame {
    /// Builds the frame from three ordered reference points.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Coincident`] if two consecutive points are closer than
    /// `tolerance`, and [`FrameError::Colinear`] if the three points lie on one line
    /// within `tolerance`.
    pub fn new(p0: &Point3, p1: &Point3, p2: &Point3, tolerance: f64) -> Result<Self, FrameError> {
        let back = p1 - p0;
        let bond = p2 - p1;

        let back_norm = back.norm();
        if back_norm < tolerance {
            return Err(FrameError::Coincident {
                first: 0,
                second: 1,
                separation: back_norm,
            });
        }
        let bond_norm = bond.norm();
        if bond_norm < tolerance {
            return Err(FrameError::Coincident {
                first: 1,
                second: 2,
                separation: bond_norm,
            });
        }

        let bond_axis = Unit::new_unchecked(bond / bond_norm);
        let normal = (back / back_norm).cross(&bond_axis);
        let sine = normal.norm();
        if sine < tolerance {
            return Err(FrameError::Colinear { sine });
        }

        let normal_axis = Unit::new_unchecked(normal / sine);
        let bend_axis = Unit::new_normalize(normal_axis.cross(&bond_axis));

        Ok(Self {
            origin: *p2,
            bond_axis,
            bend_axis,
            normal_axis,
        })
    }

    /// The anchor of the frame (the third reference point).
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Places a point relative to this frame.
    ///
    /// `offset_cos` is the displacement along the bond axis and `offset_sin` the radial
    /// displacement, which is rotated about the bond axis by `dihedral` (radians).
    #[inline]
    pub fn place(&self, dihedral: f64, offset_cos: f64, offset_sin: f64) -> Point3 {
        let (sin_phi, cos_phi) = dihedral.sin_cos();
        self.origin
            + self.bond_axis.into_inner() * offset_cos
            + self.bend_axis.into_inner() * (offset_sin * cos_phi)
            + self.normal_axis.into_inner() * (offset_sin * sin_phi)
    }
}
