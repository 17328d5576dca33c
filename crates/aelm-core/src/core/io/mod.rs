//! Provides input/output functionality for trajectory file formats.
//!
//! The biased trajectory arrives as XYZ, LAMMPS reads its starting configuration from a
//! data file and writes its minimization path as a dump (`.lammpstrj`), and GEMS reads and
//! writes XYZ. Every trajectory format implements the [`traits::TrajectoryFile`] trait.
//! The [`sorting`] module restores the canonical atom order of frames written by programs
//! that shuffle atoms between processors.

pub mod error;
pub mod lammps_data;
pub mod lammpstrj;
pub mod sorting;
pub mod traits;
pub mod xyz;

pub use error::{ParseErrorKind, TrajectoryError};
