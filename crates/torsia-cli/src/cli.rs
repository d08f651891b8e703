use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Torsia Developers",
    version,
    about = "Torsia CLI - Rebuild Cartesian conformers from internal coordinates and a placement tree.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel conformer generation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate conformers from a molecule definition and write them as multi-frame XYZ.
    Build(BuildArgs),
    /// Print the number of free dihedrals a molecule definition exposes.
    Count(CountArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the molecule definition in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output XYZ file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to an optional run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the number of conformers to generate.
    #[arg(short = 'n', long, value_name = "INT")]
    pub conformers: Option<usize>,

    /// Override the degenerate-frame tolerance.
    #[arg(long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// TOML file with per-conformer dihedral overrides in degrees.
    #[arg(long = "overrides", value_name = "PATH")]
    pub overrides: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S generation.conformers=5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `count` subcommand.
#[derive(Args, Debug)]
pub struct CountArgs {
    /// Path to the molecule definition in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_arguments_parse() {
        let cli = Cli::parse_from([
            "torsia", "-vv", "build", "-i", "mol.toml", "-o", "out.xyz", "-n", "4", "-S",
            "generation.degeneracy-tolerance=1e-8",
        ]);

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.input, PathBuf::from("mol.toml"));
                assert_eq!(args.conformers, Some(4));
                assert_eq!(args.config, None);
                assert_eq!(args.set_values.len(), 1);
            }
            other => panic!("Expected 'build' subcommand, got {other:?}"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["torsia", "-q", "-v", "count", "-i", "mol.toml"]);

        assert!(result.is_err());
    }
}
