use aelm::engine::config::MinimizationConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub input_path: PathBuf,
    pub energies_path: Option<PathBuf>,
    pub core_config: MinimizationConfig,
}
