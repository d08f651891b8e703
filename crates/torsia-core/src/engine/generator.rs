use crate::core::geometry::Point3;
use crate::core::geometry::frame::{DEFAULT_DEGENERACY_TOLERANCE, FrameError, LocalFrame};
use crate::core::models::atom::Atom;
use crate::core::models::conformer::Conformer;
use crate::core::models::molecule::Molecule;
use crate::core::topology::tree::{BranchEntry, FRAME_SIZE, PlacementTree, VirtualAnchor};
use thiserror::Error;
use tracing::{debug, instrument, trace};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Conformer {conformer}: branch {branch} has a degenerate frame {frame:?}: {source}")]
    DegenerateFrame {
        branch: usize,
        conformer: usize,
        frame: [BranchEntry; FRAME_SIZE],
        source: FrameError,
    },

    #[error("Conformer {conformer}: branch {branch} uses atom {atom} as a frame point before it is placed")]
    UnplacedFrameAtom {
        branch: usize,
        atom: usize,
        conformer: usize,
    },

    #[error("Dihedral overrides exhausted at branch {branch}, atom {atom}: only {supplied} values supplied")]
    OverridesExhausted {
        branch: usize,
        atom: usize,
        supplied: usize,
    },

    #[error("Placement offsets of atom {atom} have not been prepared")]
    OffsetsNotPrepared { atom: usize },

    #[error("Size mismatch: {atoms} atoms, {slots} conformer slots, placement tree built for {tree_atoms} atoms")]
    SizeMismatch {
        atoms: usize,
        slots: usize,
        tree_atoms: usize,
    },

    #[error("Conformer index {conformer} leaves no room for its slot")]
    ConformerIndexOverflow { conformer: usize },
}

/// Where the seed atom of a bootstrap branch is placed.
pub fn seed_position() -> Point3 {
    Point3::origin()
}

/// Fixed points standing in for the two virtual anchors.
///
/// Together with the seed at the origin they make the first bond axis `+x` and the bend
/// axis `+y`, so the first placed atom lies in the `xy` plane.
pub fn virtual_anchor_position(anchor: VirtualAnchor) -> Point3 {
    match anchor {
        VirtualAnchor::First => Point3::new(-1.0, 1.0, 0.0),
        VirtualAnchor::Second => Point3::new(-1.0, 0.0, 0.0),
    }
}

/// Hands out the dihedral contribution of each target in traversal order.
///
/// The cursor advances once per target position, including targets that are skipped
/// because they are already placed, so override `i` always belongs to target position `i`.
struct DihedralCursor<'o> {
    overrides: Option<&'o [f64]>,
    consumed: usize,
}

impl<'o> DihedralCursor<'o> {
    fn new(overrides: Option<&'o [f64]>) -> Self {
        Self {
            overrides,
            consumed: 0,
        }
    }

    fn next(&mut self, intrinsic: f64) -> Option<f64> {
        let value = match self.overrides {
            Some(values) => *values.get(self.consumed)?,
            None => intrinsic,
        };
        self.consumed += 1;
        Some(value)
    }

    fn supplied(&self) -> usize {
        self.overrides.map_or(0, <[f64]>::len)
    }
}

/// Walks a [`PlacementTree`] and fills the coordinate slots of one conformer.
///
/// The generator only reads atoms and tree; every call writes to the single conformer it
/// is given, which makes distinct conformers safe to generate concurrently.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateGenerator<'a> {
    tree: &'a PlacementTree,
    atoms: &'a [Atom],
    tolerance: f64,
}

impl<'a> CoordinateGenerator<'a> {
    pub fn new(tree: &'a PlacementTree, atoms: &'a [Atom]) -> Self {
        Self {
            tree,
            atoms,
            tolerance: DEFAULT_DEGENERACY_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Places every atom reachable from the tree into `conformer`.
    ///
    /// Slots that are already valid are never overwritten. When `overrides` is given, its
    /// values replace the intrinsic dihedral angles in branch-traversal order. Returns the
    /// number of dihedral values consumed, which equals the number of target positions.
    ///
    /// # Errors
    ///
    /// Any error aborts the call; slots written before the failure must be discarded by
    /// the caller.
    #[instrument(skip_all, name = "generate_conformer", fields(conformer = conformer_index))]
    pub fn generate(
        &self,
        conformer: &mut Conformer,
        conformer_index: usize,
        overrides: Option<&[f64]>,
    ) -> Result<usize, GenerationError> {
        if conformer.len() != self.atoms.len() || self.tree.atom_count() != self.atoms.len() {
            return Err(GenerationError::SizeMismatch {
                atoms: self.atoms.len(),
                slots: conformer.len(),
                tree_atoms: self.tree.atom_count(),
            });
        }

        if let Some(seed) = self.tree.seed() {
            if !conformer.is_valid(seed) {
                trace!(atom = seed, "Placing seed atom at the origin.");
                conformer.set_position(seed, seed_position());
            }
        }

        let mut cursor = DihedralCursor::new(overrides);
        let mut placed = 0usize;
        let mut skipped = 0usize;

        for (branch_idx, branch) in self.tree.branches().iter().enumerate() {
            let frame =
                self.build_frame(branch.frame(), conformer, branch_idx, conformer_index)?;

            let mut dihedral_sum = 0.0;
            for &target in branch.targets() {
                let atom = &self.atoms[target];
                dihedral_sum += cursor.next(atom.dihedral_angle()).ok_or_else(|| {
                    GenerationError::OverridesExhausted {
                        branch: branch_idx,
                        atom: target,
                        supplied: cursor.supplied(),
                    }
                })?;

                if conformer.is_valid(target) {
                    trace!(branch = branch_idx, atom = target, "Atom already placed.");
                    skipped += 1;
                    continue;
                }

                let offsets = atom
                    .offsets()
                    .ok_or(GenerationError::OffsetsNotPrepared { atom: target })?;
                let position = frame.place(dihedral_sum, offsets.cos, offsets.sin);
                conformer.set_position(target, position);
                placed += 1;
            }
        }

        debug!(
            placed,
            skipped,
            consumed = cursor.consumed,
            "Conformer generation complete."
        );
        Ok(cursor.consumed)
    }

    fn build_frame(
        &self,
        entries: &[BranchEntry; FRAME_SIZE],
        conformer: &Conformer,
        branch: usize,
        conformer_index: usize,
    ) -> Result<LocalFrame, GenerationError> {
        let resolve = |entry: BranchEntry| -> Result<Point3, GenerationError> {
            match entry {
                BranchEntry::Virtual(anchor) => Ok(virtual_anchor_position(anchor)),
                BranchEntry::Atom(atom) => {
                    conformer
                        .position(atom)
                        .ok_or(GenerationError::UnplacedFrameAtom {
                            branch,
                            atom,
                            conformer: conformer_index,
                        })
                }
            }
        };

        let p0 = resolve(entries[0])?;
        let p1 = resolve(entries[1])?;
        let p2 = resolve(entries[2])?;

        LocalFrame::new(&p0, &p1, &p2, self.tolerance).map_err(|source| {
            GenerationError::DegenerateFrame {
                branch,
                conformer: conformer_index,
                frame: *entries,
                source,
            }
        })
    }
}

/// Generates conformer `conformer_index` of `molecule`, creating its slots if needed.
///
/// Slots for every conformer up to `conformer_index` are allocated, so the index should stay
/// close to the current conformer count. Offsets must already be prepared
/// (see [`crate::engine::offsets::prepare_offsets`]).
pub fn generate(
    molecule: &mut Molecule,
    tree: &PlacementTree,
    conformer_index: usize,
    overrides: Option<&[f64]>,
    tolerance: f64,
) -> Result<usize, GenerationError> {
    let count = conformer_index
        .checked_add(1)
        .ok_or(GenerationError::ConformerIndexOverflow {
            conformer: conformer_index,
        })?;
    molecule.ensure_conformers(count);
    let (atoms, conformers) = molecule.split_mut();
    CoordinateGenerator::new(tree, atoms)
        .with_tolerance(tolerance)
        .generate(&mut conformers[conformer_index], conformer_index, overrides)
}
