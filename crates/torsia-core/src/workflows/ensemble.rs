use crate::core::models::conformer::Conformer;
use crate::core::models::molecule::Molecule;
use crate::core::topology::tree::PlacementTree;
use crate::engine::config::GenerationConfig;
use crate::engine::error::EngineError;
use crate::engine::generator::{CoordinateGenerator, GenerationError};
use crate::engine::offsets::prepare_offsets;
use crate::engine::progress::{Progress, ProgressReporter};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Dihedral override sequences (radians) keyed by conformer index.
pub type DihedralOverrides = HashMap<usize, Vec<f64>>;

#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleReport {
    /// Conformers `0..conformers` were generated.
    pub conformers: usize,
    /// Dihedral values consumed per conformer, i.e. the length a full override sequence needs.
    pub free_dihedrals: usize,
    /// Atoms whose offsets were derived during this run.
    pub prepared_atoms: usize,
    /// Atoms no branch places; their slots remain invalid.
    pub unreachable_atoms: Vec<usize>,
}

#[instrument(skip_all, name = "ensemble_workflow", fields(molecule = %molecule.name))]
pub fn run(
    molecule: &mut Molecule,
    tree: &PlacementTree,
    config: &GenerationConfig,
    overrides: &DihedralOverrides,
    reporter: &ProgressReporter,
) -> Result<EnsembleReport, EngineError> {
    if tree.atom_count() != molecule.atom_count() {
        return Err(GenerationError::SizeMismatch {
            atoms: molecule.atom_count(),
            slots: molecule.atom_count(),
            tree_atoms: tree.atom_count(),
        }
        .into());
    }
    if let Some(&index) = overrides
        .keys()
        .filter(|&&k| k >= config.conformer_count)
        .min()
    {
        return Err(EngineError::OverrideOutOfRange {
            index,
            conformers: config.conformer_count,
        });
    }

    // === Phase 1: Offset preparation ===
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let prepared_atoms = prepare_offsets(molecule.atoms_mut());
    let unreachable_atoms = tree.unreachable_atoms();
    if !unreachable_atoms.is_empty() {
        warn!(
            count = unreachable_atoms.len(),
            "Some atoms are not placed by any branch and will stay invalid."
        );
        reporter.report(Progress::Message(format!(
            "{} atom(s) are not reachable from the placement tree",
            unreachable_atoms.len()
        )));
    }
    molecule.ensure_conformers(config.conformer_count);
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Coordinate generation ===
    reporter.report(Progress::PhaseStart {
        name: "Generation",
    });
    info!(
        conformers = config.conformer_count,
        branches = tree.len(),
        "Generating conformer ensemble."
    );

    let (atoms, conformers) = molecule.split_mut();
    let generator =
        CoordinateGenerator::new(tree, atoms).with_tolerance(config.degeneracy_tolerance);
    let targets = &mut conformers[..config.conformer_count];

    reporter.report(Progress::TaskStart {
        total_steps: targets.len() as u64,
    });

    #[cfg(feature = "parallel")]
    let iterator = targets.par_iter_mut().enumerate();
    #[cfg(not(feature = "parallel"))]
    let iterator = targets.iter_mut().enumerate();

    let results: Vec<Result<usize, GenerationError>> = iterator
        .map(|(index, conformer)| {
            let valid_before: Vec<bool> = conformer.slots().iter().map(|s| s.valid).collect();
            let result = generator.generate(
                conformer,
                index,
                overrides.get(&index).map(Vec::as_slice),
            );
            if result.is_err() {
                discard_new_slots(conformer, &valid_before);
            }
            reporter.report(Progress::ConformerFinished { index });
            result
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let consumed = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    let free_dihedrals = tree.dihedral_target_count();
    if let Some(&count) = consumed.iter().find(|&&c| c != free_dihedrals) {
        return Err(EngineError::Internal(format!(
            "generator consumed {count} dihedrals, tree has {free_dihedrals} target positions"
        )));
    }

    reporter.report(Progress::PhaseFinish);
    info!(free_dihedrals, "Ensemble generation complete.");

    Ok(EnsembleReport {
        conformers: config.conformer_count,
        free_dihedrals,
        prepared_atoms,
        unreachable_atoms,
    })
}

/// Invalidates the slots a failed call wrote, keeping those valid before it.
fn discard_new_slots(conformer: &mut Conformer, valid_before: &[bool]) {
    for (atom, &was_valid) in valid_before.iter().enumerate() {
        if !was_valid {
            conformer.invalidate(atom);
        }
    }
}
