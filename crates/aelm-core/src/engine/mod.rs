//! # Engine Module
//!
//! This module holds everything needed to run a single external minimization and to
//! collect its results: the run configuration, the backend strategies for LAMMPS and
//! GEMS, the energy-log parsers, the result table and the process seam.
//!
//! ## Overview
//!
//! The minimizers are opaque programs. The engine only controls what goes into their
//! working directory and reads back what they leave there: standard output or a log file
//! for the energies, and a trajectory file for the relaxed configuration. Each program is
//! described by a [`backends::MinimizerBackend`] implementation so the driver in
//! [`crate::workflows`] stays independent of the program being run.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Backend selection, command line, flags, file paths
//!   and the cell applied to every frame
//! - **Backends** ([`backends`]) - Per-program input, invocation, energy and trajectory
//!   handling
//! - **Preparation** ([`preparer`]) - Box, indices, type codes and charges of each frame
//! - **Energies** ([`energy`], [`table`]) - Log parsing and the per-frame energy table
//! - **Processes** ([`process`]) - The [`process::ProcessRunner`] seam over child processes
//! - **Progress Monitoring** ([`progress`]) - Progress events for front ends
//! - **Error Handling** ([`error`]) - The engine error taxonomy

pub mod backends;
pub mod config;
pub mod energy;
pub mod error;
pub mod preparer;
pub mod process;
pub mod progress;
pub mod table;
