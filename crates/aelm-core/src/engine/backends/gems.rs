use super::MinimizerBackend;
use crate::core::io::traits::TrajectoryFile;
use crate::core::io::xyz::XyzFile;
use crate::core::models::cell::CellInfo;
use crate::core::models::frame::Frame;
use crate::engine::config::{BackendKind, MinimizationConfig};
use crate::engine::energy::{EnergyRecord, parse_gems_energies};
use crate::engine::error::EngineError;
use crate::engine::preparer::Preparation;
use crate::engine::process::ProcessOutput;
use std::fs;
use std::path::{Path, PathBuf};

/// GEMS: reads an XYZ file, writes its L-BFGS progress to a log file and the
/// minimization path to an XYZ trajectory.
#[derive(Debug, Clone, Copy, Default)]
pub struct GemsBackend;

impl MinimizerBackend for GemsBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Gems
    }

    /// Element labels are valid GEMS input, so they are only remapped when the cell
    /// carries a type mapping.
    fn preparation(&self, cell: &CellInfo) -> Preparation {
        Preparation {
            remap_types: !cell.types.is_empty(),
            zero_charges: false,
        }
    }

    fn write_input(&self, frame: &Frame, config: &MinimizationConfig) -> Result<(), EngineError> {
        let path = config.input_file();
        XyzFile::write_all_to_path(std::slice::from_ref(frame), &path)
            .map_err(|source| EngineError::trajectory(path, source))
    }

    fn extract_energies(
        &self,
        frame: usize,
        _output: &ProcessOutput,
        config: &MinimizationConfig,
    ) -> Result<EnergyRecord, EngineError> {
        let path = config.log_file();
        let log = fs::read_to_string(&path).map_err(|source| EngineError::io(&path, source))?;
        parse_gems_energies(&log).map_err(|source| EngineError::Extraction { frame, source })
    }

    fn retrieve_relaxed_frame(&self, config: &MinimizationConfig) -> Result<Frame, EngineError> {
        let path = config.trajectory_file();
        let mut frame = XyzFile::read_last_from_path(&path)
            .map_err(|source| EngineError::trajectory(&path, source))?;
        frame.set_box(config.cell.box_lengths);
        Ok(frame)
    }

    fn write_trajectory(&self, frames: &[Frame], path: &Path) -> Result<(), EngineError> {
        XyzFile::write_all_to_path(frames, path)
            .map_err(|source| EngineError::trajectory(path, source))
    }

    fn temporary_files(&self, config: &MinimizationConfig) -> Vec<PathBuf> {
        vec![
            config.input_file(),
            config.trajectory_file(),
            config.log_file(),
        ]
    }
}
