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
    author = "Francisco Fernandez",
    version,
    about = "AELM CLI - Accelerated exploration of local minima: relax every frame of a biased trajectory with LAMMPS or GEMS.",
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
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Minimize every frame of a trajectory with an external program.
    Minimize(MinimizeArgs),
}

/// Arguments for the `minimize` subcommand.
#[derive(Args, Debug, Clone)]
pub struct MinimizeArgs {
    // --- Core Arguments ---
    /// Biased-sampling trajectory in XYZ format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Where to write the relaxed trajectory (LAMMPS dump or XYZ, by backend).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to the run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the energy table to a CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub energies: Option<PathBuf>,

    // --- Backend Overrides ---
    /// Minimization program: 'LAMMPS' or 'GEMS'.
    #[arg(short, long, value_name = "NAME")]
    pub backend: Option<String>,

    /// Command line that runs the minimizer (e.g., "./lmp -in in.minimization").
    #[arg(long = "exec", value_name = "COMMAND")]
    pub command: Option<String>,

    /// Directory the minimizer runs in; scratch files are created there.
    #[arg(short, long, value_name = "PATH")]
    pub work_dir: Option<PathBuf>,

    /// Extra command-line option for the minimizer, passed as '-KEY VALUE'.
    /// Can be used multiple times. Example: --flag sf=omp
    #[arg(long = "flag", value_name = "KEY=VALUE")]
    pub flags: Vec<String>,

    // --- Output Overrides ---
    /// Also collect the next-to-last energy (LAMMPS only).
    #[arg(long)]
    pub next_to_last: bool,

    /// Keep the minimizer's scratch files after each frame.
    #[arg(long)]
    pub keep_tmp: bool,

    /// Print the energies of every frame as it finishes.
    #[arg(short = 'p', long)]
    pub print_energies: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S cell.type.Si=1
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
