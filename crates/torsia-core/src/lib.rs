//! # Torsia Core Library
//!
//! A deterministic engine for reconstructing Cartesian atomic coordinates from an
//! internal-coordinate description (bond length, valence angle, dihedral angle) and a
//! topological placement order.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Atom`, `Molecule`, `Conformer`),
//!   pure geometry (`LocalFrame`, measurement helpers), the `PlacementTree`, and the
//!   collaborators that read placed coordinates (structure annotation, order-tensor fitting).
//!
//! - **[`engine`]: The Logic Core.** Offset preparation and the coordinate generator that
//!   walks the placement tree, builds local frames and places atoms into the coordinate
//!   slots of one conformer.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures, such as generating a whole
//!   ensemble of conformers (optionally in parallel) from a single topology.

pub mod core;
pub mod engine;
pub mod workflows;
