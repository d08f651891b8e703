//! # Geometry Module
//!
//! Point arithmetic is delegated to `nalgebra`; this module adds the internal-coordinate
//! specific pieces on top of it.
//!
//! - [`frame`] - The [`frame::LocalFrame`] used to place a fourth point from three references
//! - [`measure`] - Distance, valence angle and dihedral measurement (the reverse direction)

pub mod frame;
pub mod measure;

/// Immutable three-component coordinate value used throughout the crate.
pub type Point3 = nalgebra::Point3<f64>;
