use crate::cli::BuildArgs;
use crate::config::PartialRunConfig;
use crate::error::Result;
use crate::output::write_xyz;
use crate::overrides::load_overrides;
use crate::utils::progress::CliProgressHandler;
use std::fs::File;
use std::io::{BufWriter, Write};
use torsia::{
    core::topology::definition::MoleculeDefinition,
    engine::{error::EngineError, progress::ProgressReporter},
    workflows::{self, ensemble::DihedralOverrides},
};
use tracing::{info, warn};

pub fn run(args: BuildArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = PartialRunConfig::for_args(&args)?.merge_with_cli(&args)?;

    info!("Loading molecule definition from {:?}", &args.input);
    let definition = MoleculeDefinition::load(&args.input).map_err(EngineError::from)?;
    let (mut molecule, tree) = definition.build().map_err(EngineError::from)?;

    let overrides = match &args.overrides {
        Some(path) => load_overrides(path)?,
        None => DihedralOverrides::new(),
    };

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Generating {} conformer(s) of '{}'...",
        config.conformer_count, molecule.name
    );
    let report =
        workflows::ensemble::run(&mut molecule, &tree, &config, &overrides, &reporter)?;

    if !report.unreachable_atoms.is_empty() {
        warn!(
            "{} atom(s) are not placed by any branch and are left out of the output.",
            report.unreachable_atoms.len()
        );
    }

    info!("Writing {} conformer(s) to {:?}", report.conformers, &args.output);
    let mut writer = BufWriter::new(File::create(&args.output)?);
    write_xyz(&molecule, report.conformers, &mut writer)?;
    writer.flush()?;

    println!(
        "✓ {} conformer(s) with {} free dihedral(s) written to: {}",
        report.conformers,
        report.free_dihedrals,
        args.output.display()
    );
    Ok(())
}
