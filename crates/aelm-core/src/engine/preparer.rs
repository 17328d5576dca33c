//! Per-frame preparation before a minimization.
//!
//! Every frame gets the run's box lengths and sequential indices `1..=N`. Depending on the
//! backend, element labels are replaced by integer type codes and zero charges attached.

use crate::core::models::cell::CellInfo;
use crate::core::models::frame::{Frame, Species};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("element '{element}' is missing from the type mapping")]
pub struct LookupError {
    pub element: String,
}

/// Which optional preparation steps a backend needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preparation {
    /// Replace element labels by the type codes of the cell mapping.
    pub remap_types: bool,
    /// Attach a zero charge to every atom.
    pub zero_charges: bool,
}

/// Prepares a frame in place.
///
/// The species are only replaced once every label has a code, so a failed lookup leaves
/// them untouched. Species that already are codes are kept as they are.
///
/// # Errors
///
/// Returns [`LookupError`] naming the first label with no code in `cell.types`.
pub fn prepare_frame(
    frame: &mut Frame,
    cell: &CellInfo,
    steps: Preparation,
) -> Result<(), LookupError> {
    if steps.remap_types {
        let remapped = frame
            .species
            .iter()
            .map(|species| match species {
                Species::Code(code) => Ok(Species::Code(*code)),
                Species::Label(label) => cell
                    .type_code(label)
                    .map(Species::Code)
                    .ok_or_else(|| LookupError {
                        element: label.clone(),
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        frame.species = remapped;
    }

    frame.set_box(cell.box_lengths);
    frame.assign_sequential_indices();
    if steps.zero_charges {
        frame.zero_charges();
    }
    Ok(())
}
