//! # Core Module
//!
//! Fundamental building blocks for internal-coordinate structure reconstruction.
//!
//! ## Architecture
//!
//! - **Geometry** ([`geometry`]) - Points, local coordinate frames and measurement helpers
//! - **Molecular Representation** ([`models`]) - Atoms, per-conformer coordinate slots and molecules
//! - **Placement Order** ([`topology`]) - The placement tree and TOML molecule definitions
//! - **Structure Annotation** ([`annotation`]) - Secondary-structure elements and base-pair tables
//! - **Analysis** ([`analysis`]) - Numeric routines that consume placed coordinates
//!
//! Everything in this module is free of generation state: the engine layer owns the
//! traversal that mutates conformer slots.

pub mod analysis;
pub mod annotation;
pub mod geometry;
pub mod models;
pub mod topology;
