//! Minimizer backends.
//!
//! A backend knows how one external program wants its input, where it leaves its energies
//! and its relaxed configuration, and which scratch files it produces. The driver runs
//! every frame through the same sequence of [`MinimizerBackend`] calls and never branches
//! on the program itself.

mod gems;
mod lammps;

pub use gems::GemsBackend;
pub use lammps::LammpsBackend;

use super::config::{BackendKind, MinimizationConfig};
use super::energy::EnergyRecord;
use super::error::EngineError;
use super::preparer::Preparation;
use super::process::{ProcessOutput, ProcessRunner};
use crate::core::models::cell::CellInfo;
use crate::core::models::frame::Frame;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub trait MinimizerBackend {
    fn kind(&self) -> BackendKind;

    /// Preparation steps applied to every frame before it is written.
    fn preparation(&self, cell: &CellInfo) -> Preparation;

    /// Serializes the prepared frame to the configured input file.
    fn write_input(&self, frame: &Frame, config: &MinimizationConfig) -> Result<(), EngineError>;

    /// Runs the minimizer once and waits for it.
    ///
    /// A non-zero exit status is logged and otherwise ignored; whether the minimization
    /// succeeded is decided by energy extraction.
    fn invoke(
        &self,
        runner: &dyn ProcessRunner,
        config: &MinimizationConfig,
    ) -> Result<ProcessOutput, EngineError> {
        let invocation = config.invocation();
        debug!(command = %invocation.command_line(), "Invoking {}.", self.kind());
        let output = runner
            .run(&invocation)
            .map_err(|source| EngineError::Spawn {
                command: invocation.command_line(),
                source,
            })?;
        if !output.success {
            warn!(
                exit_code = ?output.exit_code,
                "{} exited with a non-zero status.",
                self.kind()
            );
        }
        Ok(output)
    }

    /// Reads the energies of the minimization of frame `frame`.
    fn extract_energies(
        &self,
        frame: usize,
        output: &ProcessOutput,
        config: &MinimizationConfig,
    ) -> Result<EnergyRecord, EngineError>;

    /// Reads the final configuration the minimizer wrote.
    fn retrieve_relaxed_frame(&self, config: &MinimizationConfig) -> Result<Frame, EngineError>;

    /// Writes the collected relaxed frames in the backend's trajectory format.
    fn write_trajectory(&self, frames: &[Frame], path: &Path) -> Result<(), EngineError>;

    /// Files the minimizer writes and the backend reads back. Copies left by an earlier
    /// frame or run are deleted before every invocation.
    fn output_files(&self, config: &MinimizationConfig) -> Vec<PathBuf> {
        vec![config.log_file(), config.trajectory_file()]
    }

    /// Scratch files left behind by one minimization.
    fn temporary_files(&self, config: &MinimizationConfig) -> Vec<PathBuf>;
}

/// Returns the backend strategy for a program.
pub fn for_kind(kind: BackendKind) -> Box<dyn MinimizerBackend> {
    match kind {
        BackendKind::Lammps => Box::new(LammpsBackend),
        BackendKind::Gems => Box::new(GemsBackend),
    }
}
