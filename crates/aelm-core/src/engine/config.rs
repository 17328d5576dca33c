use crate::core::models::cell::CellInfo;
use crate::engine::process::Invocation;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Flag that only controls console echo of the external program; it is never passed on.
pub const SCREEN_FLAG: &str = "screen";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Unknown minimization backend '{0}'. Expected 'LAMMPS' or 'GEMS'.")]
    UnknownBackend(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("The command line to run the minimizer is empty")]
    EmptyCommand,

    #[error("The {backend} backend does not report a next-to-last energy")]
    UnsupportedLayout { backend: BackendKind },
}

/// The external minimization programs that can be driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// LAMMPS: energies on standard output, relaxed frames in a dump file.
    Lammps,
    /// GEMS: energies in an L-BFGS log file, relaxed frames in an XYZ trajectory.
    Gems,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Lammps => f.write_str("LAMMPS"),
            BackendKind::Gems => f.write_str("GEMS"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lammps" => Ok(BackendKind::Lammps),
            "gems" => Ok(BackendKind::Gems),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

/// Which energy columns are collected for every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergyLayout {
    /// `initial` and `final`.
    #[default]
    InitialFinal,
    /// `initial`, `next_to_last` and `final`.
    WithNextToLast,
}

impl EnergyLayout {
    pub fn column_names(&self) -> &'static [&'static str] {
        match self {
            EnergyLayout::InitialFinal => &["initial", "final"],
            EnergyLayout::WithNextToLast => &["initial", "next_to_last", "final"],
        }
    }
}

/// Immutable settings for one minimization run.
///
/// Relative file paths are resolved against `work_dir`, which is also the directory the
/// external program runs in.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizationConfig {
    pub backend: BackendKind,
    /// Program followed by its fixed arguments.
    pub command: Vec<String>,
    /// Extra `-key value` command-line options.
    pub flags: BTreeMap<String, String>,
    pub work_dir: PathBuf,
    /// File the prepared frame is written to before each run.
    pub input_path: PathBuf,
    /// Log file written by the minimizer.
    pub log_path: PathBuf,
    /// Trajectory file the minimizer writes the minimization path to.
    pub trajectory_path: PathBuf,
    /// Where the relaxed trajectory is written once every frame is done.
    pub output_path: Option<PathBuf>,
    pub cell: CellInfo,
    pub energy_layout: EnergyLayout,
    pub verbose: bool,
    pub remove_temporary_files: bool,
}

impl MinimizationConfig {
    /// Resolves a configured path against the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        }
    }

    pub fn input_file(&self) -> PathBuf {
        self.resolve(&self.input_path)
    }

    pub fn log_file(&self) -> PathBuf {
        self.resolve(&self.log_path)
    }

    pub fn trajectory_file(&self) -> PathBuf {
        self.resolve(&self.trajectory_path)
    }

    /// Builds the command line for one minimization.
    ///
    /// Every extra flag is appended as `-key value`, except the console-echo flag
    /// ([`SCREEN_FLAG`]).
    pub fn invocation(&self) -> Invocation {
        let mut args: Vec<String> = self.command.iter().skip(1).cloned().collect();
        for (key, value) in &self.flags {
            if key == SCREEN_FLAG {
                continue;
            }
            args.push(format!("-{}", key));
            args.push(value.clone());
        }
        Invocation {
            program: self.command.first().cloned().unwrap_or_default(),
            args,
            work_dir: self.work_dir.clone(),
        }
    }
}

/// A backend chosen either directly or by a name that is parsed on build.
#[derive(Debug, Clone)]
enum BackendChoice {
    Kind(BackendKind),
    Name(String),
}

impl BackendChoice {
    fn resolve(self) -> Result<BackendKind, ConfigError> {
        match self {
            BackendChoice::Kind(kind) => Ok(kind),
            BackendChoice::Name(name) => name.parse(),
        }
    }
}

#[derive(Default)]
pub struct MinimizationConfigBuilder {
    backend: Option<BackendChoice>,
    command: Option<Vec<String>>,
    flags: BTreeMap<String, String>,
    work_dir: Option<PathBuf>,
    input_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    trajectory_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    cell: Option<CellInfo>,
    energy_layout: Option<EnergyLayout>,
    verbose: Option<bool>,
    remove_temporary_files: Option<bool>,
}

impl MinimizationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.backend = Some(BackendChoice::Kind(backend));
        self
    }
    /// Selects the backend by name; an unknown name is reported by [`Self::build`].
    pub fn backend_name(mut self, name: &str) -> Self {
        self.backend = Some(BackendChoice::Name(name.to_string()));
        self
    }
    /// Sets the command line, split on whitespace.
    pub fn command(mut self, command_line: &str) -> Self {
        self.command = Some(command_line.split_whitespace().map(str::to_string).collect());
        self
    }
    pub fn command_args(mut self, args: Vec<String>) -> Self {
        self.command = Some(args);
        self
    }
    pub fn flag(mut self, key: &str, value: &str) -> Self {
        self.flags.insert(key.to_string(), value.to_string());
        self
    }
    pub fn flags(mut self, flags: BTreeMap<String, String>) -> Self {
        self.flags.extend(flags);
        self
    }
    pub fn work_dir(mut self, path: PathBuf) -> Self {
        self.work_dir = Some(path);
        self
    }
    pub fn input_path(mut self, path: PathBuf) -> Self {
        self.input_path = Some(path);
        self
    }
    pub fn log_path(mut self, path: PathBuf) -> Self {
        self.log_path = Some(path);
        self
    }
    pub fn trajectory_path(mut self, path: PathBuf) -> Self {
        self.trajectory_path = Some(path);
        self
    }
    pub fn output_path(mut self, path: Option<PathBuf>) -> Self {
        self.output_path = path;
        self
    }
    pub fn cell(mut self, cell: CellInfo) -> Self {
        self.cell = Some(cell);
        self
    }
    pub fn energy_layout(mut self, layout: EnergyLayout) -> Self {
        self.energy_layout = Some(layout);
        self
    }
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }
    pub fn remove_temporary_files(mut self, remove: bool) -> Self {
        self.remove_temporary_files = Some(remove);
        self
    }

    pub fn build(self) -> Result<MinimizationConfig, ConfigError> {
        let backend = self
            .backend
            .ok_or(ConfigError::MissingParameter("backend"))?
            .resolve()?;

        let command = self.command.ok_or(ConfigError::MissingParameter("command"))?;
        if command.is_empty() {
            return Err(ConfigError::EmptyCommand);
        }

        let cell = self.cell.ok_or(ConfigError::MissingParameter("cell"))?;
        if backend == BackendKind::Lammps && cell.types.is_empty() {
            return Err(ConfigError::MissingParameter("cell.type"));
        }

        let energy_layout = self.energy_layout.unwrap_or_default();
        if backend == BackendKind::Gems && energy_layout == EnergyLayout::WithNextToLast {
            return Err(ConfigError::UnsupportedLayout { backend });
        }

        Ok(MinimizationConfig {
            backend,
            command,
            flags: self.flags,
            work_dir: self.work_dir.unwrap_or_else(|| PathBuf::from(".")),
            input_path: self
                .input_path
                .ok_or(ConfigError::MissingParameter("input_path"))?,
            log_path: self.log_path.ok_or(ConfigError::MissingParameter("log_path"))?,
            trajectory_path: self
                .trajectory_path
                .ok_or(ConfigError::MissingParameter("trajectory_path"))?,
            output_path: self.output_path,
            cell,
            energy_layout,
            verbose: self.verbose.unwrap_or(false),
            remove_temporary_files: self.remove_temporary_files.unwrap_or(true),
        })
    }
}
