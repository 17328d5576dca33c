//! # AELM Core Library
//!
//! Accelerated exploration of local minima: a biased-sampling trajectory is walked frame
//! by frame, every frame is relaxed by an external minimizer (LAMMPS or GEMS), and the
//! relaxed configurations are collected together with their energies.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Frame`, `CellInfo`) and the
//!   trajectory formats exchanged with the external programs (XYZ, LAMMPS dump, LAMMPS data).
//!
//! - **[`engine`]: The Logic Core.** Run configuration, the error taxonomy, the energy-log
//!   parsers, the result table, the process seam and the two backend strategies that know
//!   how to prepare, invoke and read back a single minimization.
//!
//! - **[`workflows`]: The Public API.** The minimization driver that ties everything
//!   together: `workflows::minimize::run` turns a sequence of frames into an energy table
//!   and a relaxed trajectory.

pub mod core;
pub mod engine;
pub mod workflows;
