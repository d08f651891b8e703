//! # Engine Module
//!
//! The stateful layer that turns internal coordinates into Cartesian coordinates.
//!
//! ## Architecture
//!
//! - **Offset Preparation** ([`offsets`]) - One-time derivation of per-atom placement offsets
//! - **Coordinate Generation** ([`generator`]) - Tree-driven traversal that builds local
//!   frames and fills the coordinate slots of one conformer
//! - **Reverse Direction** ([`inverse`]) - Internal coordinates measured back from a conformer
//! - **Configuration** ([`config`]) - Generation parameters and their builder
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-level error aggregation
//!
//! Offsets must be prepared (an exclusive pass over the atoms) before any generation call
//! reads them; after that, atoms and the placement tree are only read, and each call
//! writes to exactly one conformer.

pub mod config;
pub mod error;
pub mod generator;
pub mod inverse;
pub mod offsets;
pub mod progress;
