//! Data models for atomic configurations.
//!
//! A [`frame::Frame`] is a single snapshot of the system: positions, per-atom species,
//! optional per-atom indices and charges, and the simulation box. The [`cell::CellInfo`]
//! carries the box and the element to type-code mapping supplied once per run.

pub mod cell;
pub mod frame;
