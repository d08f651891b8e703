use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Number of leading entries in a branch that define its local frame.
pub const FRAME_SIZE: usize = 3;

/// Source form of one branch: atom indices, with `None` where no real atom exists.
pub type SourceBranch = Vec<Option<usize>>;

/// One of the two synthetic points used to seed the very first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualAnchor {
    First,
    Second,
}

impl VirtualAnchor {
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

/// A frame-defining entry of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchEntry {
    Atom(usize),
    Virtual(VirtualAnchor),
}

impl BranchEntry {
    pub fn atom(self) -> Option<usize> {
        match self {
            Self::Atom(index) => Some(index),
            Self::Virtual(_) => None,
        }
    }
}

impl fmt::Display for BranchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(index) => write!(f, "atom {}", index),
            Self::Virtual(anchor) => write!(f, "virtual anchor {}", anchor.index()),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Branch {branch} has {found} entries, but at least 3 are needed to define a frame")]
    TooFewEntries { branch: usize, found: usize },

    #[error("Branch {branch} has no atom at position {position}; only the first two entries may be empty")]
    MissingAtom { branch: usize, position: usize },

    #[error("Branch {branch} references atom {atom} at position {position}, but the molecule has {atom_count} atoms")]
    UnknownAtom {
        branch: usize,
        position: usize,
        atom: usize,
        atom_count: usize,
    },

    #[error("Branch {branch} seeds the structure at atom {atom}, but atom {existing} already seeds it")]
    ConflictingSeed {
        branch: usize,
        atom: usize,
        existing: usize,
    },
}

/// A frame (three entries) followed by the atoms placed relative to that single frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    frame: [BranchEntry; FRAME_SIZE],
    targets: Vec<usize>,
}

impl Branch {
    pub fn frame(&self) -> &[BranchEntry; FRAME_SIZE] {
        &self.frame
    }

    /// Dihedral-chain targets in placement order.
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// A bootstrap branch is framed by both virtual anchors and the seed atom.
    pub fn is_bootstrap(&self) -> bool {
        matches!(
            self.frame,
            [BranchEntry::Virtual(_), BranchEntry::Virtual(_), _]
        )
    }
}

/// Ordered, index-based description of how every atom is placed.
///
/// Branches are processed in order. The frame atoms of a branch must have been placed by
/// an earlier branch (or be the seed), which the generator checks per conformer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlacementTree {
    branches: Vec<Branch>,
    seed: Option<usize>,
    atom_count: usize,
}

impl PlacementTree {
    /// Converts the source form into a placement tree for a molecule of `atom_count` atoms.
    ///
    /// If the second entry of a branch is empty, the first two entries become the two
    /// virtual anchors and the third entry becomes the seed atom. If only the first entry
    /// is empty, it becomes the second virtual anchor.
    pub fn build(source: &[SourceBranch], atom_count: usize) -> Result<Self, TreeError> {
        let mut branches = Vec::with_capacity(source.len());
        let mut seed: Option<usize> = None;

        for (branch_idx, entries) in source.iter().enumerate() {
            if entries.len() < FRAME_SIZE {
                return Err(TreeError::TooFewEntries {
                    branch: branch_idx,
                    found: entries.len(),
                });
            }

            let resolve = |position: usize| -> Result<usize, TreeError> {
                let atom = entries[position].ok_or(TreeError::MissingAtom {
                    branch: branch_idx,
                    position,
                })?;
                if atom >= atom_count {
                    return Err(TreeError::UnknownAtom {
                        branch: branch_idx,
                        position,
                        atom,
                        atom_count,
                    });
                }
                Ok(atom)
            };

            let third = resolve(2)?;
            let (first, second) = match (entries[0], entries[1]) {
                (_, None) => (
                    BranchEntry::Virtual(VirtualAnchor::First),
                    BranchEntry::Virtual(VirtualAnchor::Second),
                ),
                (None, Some(_)) => (
                    BranchEntry::Virtual(VirtualAnchor::Second),
                    BranchEntry::Atom(resolve(1)?),
                ),
                (Some(_), Some(_)) => (
                    BranchEntry::Atom(resolve(0)?),
                    BranchEntry::Atom(resolve(1)?),
                ),
            };

            let branch = Branch {
                frame: [first, second, BranchEntry::Atom(third)],
                targets: (FRAME_SIZE..entries.len())
                    .map(&resolve)
                    .collect::<Result<_, _>>()?,
            };

            if branch.is_bootstrap() {
                match seed {
                    Some(existing) if existing != third => {
                        return Err(TreeError::ConflictingSeed {
                            branch: branch_idx,
                            atom: third,
                            existing,
                        });
                    }
                    _ => seed = Some(third),
                }
            }

            branches.push(branch);
        }

        let tree = Self {
            branches,
            seed,
            atom_count,
        };
        debug!(
            branches = tree.branches.len(),
            targets = tree.dihedral_target_count(),
            seed = ?tree.seed,
            "Placement tree built."
        );
        Ok(tree)
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// The atom placed at the origin to establish the structure, if any branch bootstraps.
    pub fn seed(&self) -> Option<usize> {
        self.seed
    }

    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    /// Number of dihedral-chain target positions across all branches.
    ///
    /// This is the number of override values a generation call consumes.
    pub fn dihedral_target_count(&self) -> usize {
        self.branches.iter().map(|b| b.targets.len()).sum()
    }

    /// Atoms that are neither the seed nor the target of any branch.
    pub fn unreachable_atoms(&self) -> Vec<usize> {
        let mut reached = vec![false; self.atom_count];
        if let Some(seed) = self.seed {
            reached[seed] = true;
        }
        for &atom in self.branches.iter().flat_map(|b| b.targets.iter()) {
            reached[atom] = true;
        }
        reached
            .iter()
            .enumerate()
            .filter_map(|(atom, &hit)| (!hit).then_some(atom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_source() -> Vec<SourceBranch> {
        vec![
            vec![None, None, Some(0), Some(1)],
            vec![None, Some(0), Some(1), Some(2)],
            vec![Some(0), Some(1), Some(2), Some(3)],
        ]
    }

    #[test]
    fn bootstrap_branch_gets_both_virtual_anchors() {
        let tree = PlacementTree::build(&chain_source(), 4).unwrap();

        let first = &tree.branches()[0];
        assert_eq!(
            first.frame(),
            &[
                BranchEntry::Virtual(VirtualAnchor::First),
                BranchEntry::Virtual(VirtualAnchor::Second),
                BranchEntry::Atom(0),
            ]
        );
        assert!(first.is_bootstrap());
        assert_eq!(first.targets(), &[1]);
        assert_eq!(tree.seed(), Some(0));
    }

    #[test]
    fn leading_empty_entry_becomes_second_anchor() {
        let tree = PlacementTree::build(&chain_source(), 4).unwrap();

        let second = &tree.branches()[1];
        assert_eq!(
            second.frame(),
            &[
                BranchEntry::Virtual(VirtualAnchor::Second),
                BranchEntry::Atom(0),
                BranchEntry::Atom(1),
            ]
        );
        assert!(!second.is_bootstrap());
    }

    #[test]
    fn second_entry_empty_overrides_real_first_entry() {
        let source = vec![vec![Some(3), None, Some(0), Some(1)]];
        let tree = PlacementTree::build(&source, 4).unwrap();
        assert!(tree.branches()[0].is_bootstrap());
    }

    #[test]
    fn target_count_sums_positions_beyond_the_frame() {
        let source = vec![
            vec![None, None, Some(0), Some(1), Some(2), Some(3)],
            vec![Some(2), Some(0), Some(1), Some(4)],
            vec![Some(0), Some(1), Some(4)],
        ];
        let tree = PlacementTree::build(&source, 5).unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.dihedral_target_count(), 4);
        assert!(tree.branches()[2].targets().is_empty());
    }

    #[test]
    fn branch_with_fewer_than_three_entries_is_rejected() {
        let source = vec![vec![None, None, Some(0), Some(1)], vec![Some(0), Some(1)]];

        let result = PlacementTree::build(&source, 2);

        assert_eq!(
            result.unwrap_err(),
            TreeError::TooFewEntries {
                branch: 1,
                found: 2
            }
        );
    }

    #[test]
    fn empty_entry_after_the_anchors_is_rejected() {
        let source = vec![vec![None, None, Some(0), None]];
        assert_eq!(
            PlacementTree::build(&source, 1).unwrap_err(),
            TreeError::MissingAtom {
                branch: 0,
                position: 3
            }
        );

        let source = vec![vec![None, None, None, Some(0)]];
        assert_eq!(
            PlacementTree::build(&source, 1).unwrap_err(),
            TreeError::MissingAtom {
                branch: 0,
                position: 2
            }
        );
    }

    #[test]
    fn out_of_range_atom_is_rejected() {
        let source = vec![vec![None, None, Some(0), Some(7)]];
        assert_eq!(
            PlacementTree::build(&source, 2).unwrap_err(),
            TreeError::UnknownAtom {
                branch: 0,
                position: 3,
                atom: 7,
                atom_count: 2
            }
        );
    }

    #[test]
    fn two_different_seeds_are_rejected() {
        let source = vec![
            vec![None, None, Some(0), Some(1)],
            vec![None, None, Some(2), Some(3)],
        ];
        assert_eq!(
            PlacementTree::build(&source, 4).unwrap_err(),
            TreeError::ConflictingSeed {
                branch: 1,
                atom: 2,
                existing: 0
            }
        );
    }

    #[test]
    fn repeated_bootstrap_of_same_seed_is_allowed() {
        let source = vec![
            vec![None, None, Some(0), Some(1)],
            vec![None, None, Some(0), Some(2)],
        ];
        let tree = PlacementTree::build(&source, 3).unwrap();
        assert_eq!(tree.seed(), Some(0));
    }

    #[test]
    fn unreachable_atoms_lists_atoms_never_placed() {
        let source = vec![vec![None, None, Some(0), Some(2)]];
        let tree = PlacementTree::build(&source, 4).unwrap();
        assert_eq!(tree.unreachable_atoms(), vec![1, 3]);
    }

    #[test]
    fn empty_source_builds_empty_tree() {
        let tree = PlacementTree::build(&[], 0).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.seed(), None);
        assert_eq!(tree.dihedral_target_count(), 0);
    }

    #[test]
    fn branch_entry_display_names_atoms_and_anchors() {
        assert_eq!(BranchEntry::Atom(4).to_string(), "atom 4");
        assert_eq!(
            BranchEntry::Virtual(VirtualAnchor::Second).to_string(),
            "virtual anchor 1"
        );
        assert_eq!(BranchEntry::Atom(4).atom(), Some(4));
        assert_eq!(BranchEntry::Virtual(VirtualAnchor::First).atom(), None);
    }
}
