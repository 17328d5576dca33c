//! Extraction of minimization energies from minimizer output.
//!
//! Neither program offers a structured report, so energies are located through fixed
//! marker lines. Extraction either yields every value the backend provides or fails with
//! an [`ExtractionError`]; partially filled records are never produced.

use thiserror::Error;

/// Prefix of the LAMMPS minimization summary line. The following line holds the initial,
/// next-to-last and final energies.
pub const LAMMPS_ENERGY_MARKER: &str = "Energy initial";

/// Prefix of the per-iteration lines in a GEMS L-BFGS log.
pub const GEMS_LBFGS_MARKER: &str = "# LBFGS";

/// The GEMS line holding the initial energy (1-based position among marker lines).
const GEMS_INITIAL_LINE: usize = 3;

/// Position of the energy among the whitespace-separated tokens of a GEMS marker line.
const GEMS_ENERGY_TOKEN: usize = 4;

/// Energies obtained from one minimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyRecord {
    pub initial: f64,
    /// Energy of the iteration before the last one; only LAMMPS reports it.
    pub next_to_last: Option<f64>,
    pub final_energy: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ExtractionError {
    #[error("marker line '{marker}' not found")]
    MarkerNotFound { marker: &'static str },

    #[error("found {found} '{marker}' line(s), at least {required} are required")]
    TooFewMarkerLines {
        marker: &'static str,
        found: usize,
        required: usize,
    },

    #[error("could not read energies from line '{line}'")]
    MalformedValues { line: String },
}

/// Reads the energies from the standard output of a LAMMPS minimization.
///
/// The line after each `Energy initial` marker must hold exactly three numbers. If the
/// marker appears several times the last occurrence wins.
///
/// # Errors
///
/// Returns [`ExtractionError::MarkerNotFound`] if no marker is present and
/// [`ExtractionError::MalformedValues`] if a marker is not followed by three numbers.
pub fn parse_lammps_energies(log: &str) -> Result<EnergyRecord, ExtractionError> {
    let mut record = None;
    let mut lines = log.lines().peekable();
    while let Some(line) = lines.next() {
        if !line.trim().starts_with(LAMMPS_ENERGY_MARKER) {
            continue;
        }
        let values_line = lines.peek().copied().unwrap_or("");
        let values = parse_numbers(values_line)
            .filter(|values| values.len() == 3)
            .ok_or_else(|| ExtractionError::MalformedValues {
                line: values_line.trim().to_string(),
            })?;
        record = Some(EnergyRecord {
            initial: values[0],
            next_to_last: Some(values[1]),
            final_energy: values[2],
        });
    }
    record.ok_or(ExtractionError::MarkerNotFound {
        marker: LAMMPS_ENERGY_MARKER,
    })
}

/// Reads the energies from a GEMS L-BFGS log.
///
/// The initial energy is the fifth token of the third `# LBFGS` line and the final energy
/// the fifth token of the last one.
///
/// # Errors
///
/// Returns [`ExtractionError::TooFewMarkerLines`] with fewer than three marker lines and
/// [`ExtractionError::MalformedValues`] if the energy token is missing or not a number.
pub fn parse_gems_energies(log: &str) -> Result<EnergyRecord, ExtractionError> {
    let lbfgs: Vec<&str> = log
        .lines()
        .filter(|line| line.trim().starts_with(GEMS_LBFGS_MARKER))
        .collect();
    if lbfgs.len() < GEMS_INITIAL_LINE {
        return Err(ExtractionError::TooFewMarkerLines {
            marker: GEMS_LBFGS_MARKER,
            found: lbfgs.len(),
            required: GEMS_INITIAL_LINE,
        });
    }

    let energy_of = |line: &str| -> Result<f64, ExtractionError> {
        line.split_whitespace()
            .nth(GEMS_ENERGY_TOKEN)
            .and_then(|token| token.parse().ok())
            .ok_or_else(|| ExtractionError::MalformedValues {
                line: line.trim().to_string(),
            })
    };

    Ok(EnergyRecord {
        initial: energy_of(lbfgs[GEMS_INITIAL_LINE - 1])?,
        next_to_last: None,
        final_energy: energy_of(lbfgs[lbfgs.len() - 1])?,
    })
}

fn parse_numbers(line: &str) -> Option<Vec<f64>> {
    line.split_whitespace()
        .map(|token| token.parse::<f64>().ok())
        .collect()
}
