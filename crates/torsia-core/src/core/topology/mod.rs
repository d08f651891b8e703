//! # Topology Module
//!
//! Describes the order in which atoms are placed.
//!
//! ## Key Components
//!
//! - [`tree`] - The index-based [`tree::PlacementTree`] and its construction from the
//!   source form (branches of optional atom references)
//! - [`definition`] - TOML molecule definitions naming atoms, their internal coordinates
//!   and the branches that place them
//!
//! ```ignore
//! use torsia::core::topology::definition::MoleculeDefinition;
//!
//! let definition = MoleculeDefinition::load(Path::new("hairpin.toml"))?;
//! let (molecule, tree) = definition.build()?;
//! ```

pub mod definition;
pub mod tree;
