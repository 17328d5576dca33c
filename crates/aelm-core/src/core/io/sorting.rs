//! Canonical atom ordering of relaxed frames.
//!
//! LAMMPS writes dump lines in whatever order the atoms are stored on each processor, so
//! a relaxed frame may come back shuffled. The preparer numbers atoms `1..=N` before the
//! minimization; sorting by that index restores the input order.

use super::error::TrajectoryError;
use crate::core::models::frame::Frame;

/// Returns `true` if the atom indices never decrease along the frame.
///
/// Frames without indices have no order to restore and count as canonical.
pub fn is_canonical(frame: &Frame) -> bool {
    match &frame.indices {
        Some(indices) => indices.windows(2).all(|pair| pair[0] <= pair[1]),
        None => true,
    }
}

/// Reorders every per-atom vector of the frame by ascending atom index.
///
/// The sort is stable and a canonical frame is returned untouched, so applying this twice
/// gives the same frame as applying it once.
///
/// # Errors
///
/// Returns [`TrajectoryError::Inconsistency`] if the per-atom vectors differ in length;
/// sorting only some of them would detach atoms from their data.
pub fn canonicalize(frame: Frame) -> Result<Frame, TrajectoryError> {
    let Some(indices) = frame.indices.as_ref() else {
        return Ok(frame);
    };
    let natoms = indices.len();
    let charges = frame.charges.as_ref().map_or(natoms, Vec::len);
    if frame.positions.len() != natoms || frame.species.len() != natoms || charges != natoms {
        return Err(TrajectoryError::Inconsistency(format!(
            "frame has {} indices, {} positions, {} species and {} charges",
            natoms,
            frame.positions.len(),
            frame.species.len(),
            charges
        )));
    }
    if is_canonical(&frame) {
        return Ok(frame);
    }

    let mut order: Vec<usize> = (0..natoms).collect();
    order.sort_by_key(|&i| indices[i]);

    let mut sorted = frame.clone();
    sorted.indices = Some(permute(indices, &order));
    sorted.positions = permute(&frame.positions, &order);
    sorted.species = permute(&frame.species, &order);
    sorted.charges = frame.charges.as_ref().map(|q| permute(q, &order));
    Ok(sorted)
}

fn permute<T: Clone>(values: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| values[i].clone()).collect()
}
