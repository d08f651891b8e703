//! # Core Models Module
//!
//! Data structures describing a molecule for internal-coordinate reconstruction.
//!
//! ## Key Components
//!
//! - [`atom`] - Intrinsic internal coordinates and the derived placement offsets of one atom
//! - [`conformer`] - One coordinate slot (point plus validity flag) per atom for one conformer
//! - [`molecule`] - Atoms with stable indices and the set of conformers built from them
//! - [`builder`] - Incremental construction of a [`molecule::Molecule`]
//!
//! Coordinates are stored conformer-major: every conformer owns its own table of slots, so
//! validity is tracked per (atom, conformer) pair and conformers can be generated
//! independently of each other.
//!
//! ```ignore
//! use torsia::core::models::builder::MoleculeBuilder;
//!
//! let mut builder = MoleculeBuilder::new("chain");
//! builder
//!     .add_atom("A", 1.0, 1.911, PI)
//!     .add_atom("B", 1.0, 1.911, PI);
//! let molecule = builder.build()?;
//! ```

pub mod atom;
pub mod builder;
pub mod conformer;
pub mod molecule;
