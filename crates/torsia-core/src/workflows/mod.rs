//! # Workflows Module
//!
//! High-level procedures that drive the engine end to end.
//!
//! - **Ensemble Workflow** ([`ensemble`]) - Prepares offsets once, then generates every
//!   requested conformer of a molecule from its placement tree, optionally in parallel and
//!   with per-conformer dihedral overrides.

pub mod ensemble;
