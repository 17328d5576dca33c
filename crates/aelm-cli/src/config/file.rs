use crate::error::{CliError, Result};
use aelm::core::models::cell::CellInfo;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Run configuration as written in the TOML file. Every key is optional; missing values
/// fall back to command-line arguments and then to backend defaults.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub backend: Option<String>,
    pub command: Option<String>,
    pub work_dir: Option<PathBuf>,
    pub input_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub trajectory_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub energies: Option<PathBuf>,
    pub next_to_last: Option<bool>,
    pub verbose: Option<bool>,
    pub remove_temporary_files: Option<bool>,
    #[serde(default)]
    pub flags: BTreeMap<String, String>,
    pub cell: Option<CellInfo>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
