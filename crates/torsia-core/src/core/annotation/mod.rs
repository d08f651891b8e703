//! Residue-level bookkeeping that reads, but never places, coordinates.
//!
//! - [`elements`] - Secondary-structure elements with caller-owned index assignment
//! - [`base_pairs`] - Base-pair hydrogen-bond table loaded from CSV

pub mod base_pairs;
pub mod elements;
