//! # Core Module
//!
//! Data structures and file formats shared by every layer of the crate.
//!
//! - **Atomic configurations** ([`models`]) - frames, species and the cell/type information
//!   that the preparer applies to every frame.
//! - **File I/O** ([`io`]) - readers and writers for the trajectory formats consumed and
//!   produced by the external minimizers, plus the canonical atom ordering used on relaxed
//!   frames.

pub mod io;
pub mod models;
