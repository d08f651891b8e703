//! Numeric routines that consume placed coordinates.
//!
//! - [`order_tensor`] - Least-squares fit of a traceless order tensor to couplings
//!   measured along bond vectors

pub mod order_tensor;
