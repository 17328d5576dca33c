use super::MinimizerBackend;
use crate::core::io::lammps_data::LammpsDataFile;
use crate::core::io::lammpstrj::LammpstrjFile;
use crate::core::io::sorting;
use crate::core::io::traits::TrajectoryFile;
use crate::core::models::cell::CellInfo;
use crate::core::models::frame::Frame;
use crate::engine::config::{BackendKind, MinimizationConfig};
use crate::engine::energy::{EnergyRecord, parse_lammps_energies};
use crate::engine::error::EngineError;
use crate::engine::preparer::Preparation;
use crate::engine::process::ProcessOutput;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Citation reminder LAMMPS drops into its working directory.
const CITATION_FILE: &str = "log.cite";

/// LAMMPS: reads a data file, prints its energies to standard output and writes the
/// minimization path as a dump whose last frame is the relaxed configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct LammpsBackend;

impl MinimizerBackend for LammpsBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Lammps
    }

    fn preparation(&self, _cell: &CellInfo) -> Preparation {
        Preparation {
            remap_types: true,
            zero_charges: true,
        }
    }

    fn write_input(&self, frame: &Frame, config: &MinimizationConfig) -> Result<(), EngineError> {
        let path = config.input_file();
        LammpsDataFile::write_to_path(frame, &path)
            .map_err(|source| EngineError::trajectory(path, source))
    }

    fn extract_energies(
        &self,
        frame: usize,
        output: &ProcessOutput,
        _config: &MinimizationConfig,
    ) -> Result<EnergyRecord, EngineError> {
        parse_lammps_energies(&output.stdout)
            .map_err(|source| EngineError::Extraction { frame, source })
    }

    fn retrieve_relaxed_frame(&self, config: &MinimizationConfig) -> Result<Frame, EngineError> {
        let path = config.trajectory_file();
        let frame = LammpstrjFile::read_last_from_path(&path)
            .map_err(|source| EngineError::trajectory(&path, source))?;
        if !sorting::is_canonical(&frame) {
            debug!("Relaxed frame is out of order; sorting by atom index.");
        }
        sorting::canonicalize(frame).map_err(|source| EngineError::trajectory(&path, source))
    }

    fn write_trajectory(&self, frames: &[Frame], path: &Path) -> Result<(), EngineError> {
        LammpstrjFile::write_all_to_path(frames, path)
            .map_err(|source| EngineError::trajectory(path, source))
    }

    fn temporary_files(&self, config: &MinimizationConfig) -> Vec<PathBuf> {
        vec![
            config.input_file(),
            config.trajectory_file(),
            config.log_file(),
            config.resolve(Path::new(CITATION_FILE)),
        ]
    }
}
