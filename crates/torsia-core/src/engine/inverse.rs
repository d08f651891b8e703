use super::generator::virtual_anchor_position;
use crate::core::geometry::Point3;
use crate::core::geometry::measure::InternalCoordinates;
use crate::core::models::conformer::Conformer;
use crate::core::topology::tree::{BranchEntry, PlacementTree};
use std::f64::consts::{PI, TAU};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeriveError {
    #[error("Branch {branch} needs atom {atom}, which is not placed in this conformer")]
    Unplaced { branch: usize, atom: usize },
}

/// Internal coordinates of one target, measured against its branch frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedCoordinates {
    pub atom: usize,
    pub bond_length: f64,
    pub valence_angle: f64,
    /// This target's own contribution to the branch's running dihedral sum, in `(-pi, pi]`.
    pub dihedral_angle: f64,
}

fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Measures, for every target position of `tree`, the internal coordinates that would
/// regenerate `conformer`.
///
/// Dihedral values are per-target contributions, so feeding them back as overrides
/// reproduces the conformer. Targets that appear in several branches are reported once
/// per position.
pub fn derive_internal_coordinates(
    tree: &PlacementTree,
    conformer: &Conformer,
) -> Result<Vec<DerivedCoordinates>, DeriveError> {
    let mut derived = Vec::with_capacity(tree.dihedral_target_count());
    let seed = tree.seed();

    for (branch_idx, branch) in tree.branches().iter().enumerate() {
        let point = |atom: usize| -> Result<Point3, DeriveError> {
            match conformer.position(atom) {
                Some(p) => Ok(p),
                None if seed == Some(atom) => Ok(Point3::origin()),
                None => Err(DeriveError::Unplaced {
                    branch: branch_idx,
                    atom,
                }),
            }
        };
        let resolve = |entry: BranchEntry| match entry {
            BranchEntry::Virtual(anchor) => Ok(virtual_anchor_position(anchor)),
            BranchEntry::Atom(atom) => point(atom),
        };

        let frame = branch.frame();
        let (p0, p1, p2) = (resolve(frame[0])?, resolve(frame[1])?, resolve(frame[2])?);

        let mut previous_sum = 0.0;
        for &target in branch.targets() {
            let ic = InternalCoordinates::measure(&p0, &p1, &p2, &point(target)?);
            derived.push(DerivedCoordinates {
                atom: target,
                bond_length: ic.bond_length,
                valence_angle: ic.valence_angle,
                dihedral_angle: wrap_angle(ic.dihedral_angle - previous_sum),
            });
            previous_sum = ic.dihedral_angle;
        }
    }

    Ok(derived)
}
