//! # Workflows Module
//!
//! High-level entry points that run complete AELM pipelines.
//!
//! - **Minimization Workflow** ([`minimize`]) - Relaxes every frame of a biased
//!   trajectory with the configured minimizer and gathers the energies and relaxed
//!   frames.

pub mod minimize;
