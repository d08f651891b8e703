use crate::core::models::atom::Atom;
use tracing::{debug, instrument};

/// Computes placement offsets for every atom that does not have them yet.
///
/// Atoms that are already prepared are skipped, so repeated calls leave existing offsets
/// unchanged. Returns the number of atoms prepared by this call.
#[instrument(skip_all, fields(atoms = atoms.len()))]
pub fn prepare_offsets(atoms: &mut [Atom]) -> usize {
    let prepared = atoms
        .iter_mut()
        .map(Atom::prepare_offsets)
        .filter(|&newly_prepared| newly_prepared)
        .count();
    debug!(prepared, "Placement offsets prepared.");
    prepared
}
