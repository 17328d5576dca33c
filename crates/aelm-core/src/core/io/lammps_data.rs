use super::error::TrajectoryError;
use crate::core::models::frame::Frame;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const HEADER_COMMENT: &str = "# LAMMPS data file written by aelm";

/// Writer for LAMMPS data files, the format read by the `read_data` command.
///
/// Frames with charges are written in the `charge` atom style
/// (`id type q x y z`), frames without in the `atomic` style (`id type x y z`).
/// Species must already be integer type codes.
pub struct LammpsDataFile;

impl LammpsDataFile {
    pub fn write_to(frame: &Frame, writer: &mut impl Write) -> Result<(), TrajectoryError> {
        let box_lengths = frame.box_lengths.ok_or_else(|| {
            TrajectoryError::Inconsistency("a LAMMPS data file requires box lengths".into())
        })?;
        if frame.species.len() != frame.natoms() {
            return Err(TrajectoryError::Inconsistency(format!(
                "frame has {} positions but {} species",
                frame.natoms(),
                frame.species.len()
            )));
        }
        let codes = frame
            .species
            .iter()
            .map(|species| {
                species.code().ok_or_else(|| {
                    TrajectoryError::Inconsistency(format!(
                        "species '{}' has not been mapped to a LAMMPS type code",
                        species
                    ))
                })
            })
            .collect::<Result<Vec<u32>, _>>()?;
        let n_types = codes.iter().copied().max().unwrap_or(0);

        writeln!(writer, "{}", HEADER_COMMENT)?;
        writeln!(writer)?;
        writeln!(writer, "{} atoms", frame.natoms())?;
        writeln!(writer, "{} atom types", n_types)?;
        writeln!(writer)?;
        writeln!(writer, "0.0 {} xlo xhi", box_lengths.x)?;
        writeln!(writer, "0.0 {} ylo yhi", box_lengths.y)?;
        writeln!(writer, "0.0 {} zlo zhi", box_lengths.z)?;
        writeln!(writer)?;

        match frame.charges.as_deref() {
            Some(charges) => {
                writeln!(writer, "Atoms # charge")?;
                writeln!(writer)?;
                for (i, (code, position)) in codes.iter().zip(&frame.positions).enumerate() {
                    writeln!(
                        writer,
                        "{} {} {} {} {} {}",
                        frame.index_of(i),
                        code,
                        charges.get(i).copied().unwrap_or(0.0),
                        position.x,
                        position.y,
                        position.z
                    )?;
                }
            }
            None => {
                writeln!(writer, "Atoms # atomic")?;
                writeln!(writer)?;
                for (i, (code, position)) in codes.iter().zip(&frame.positions).enumerate() {
                    writeln!(
                        writer,
                        "{} {} {} {} {}",
                        frame.index_of(i),
                        code,
                        position.x,
                        position.y,
                        position.z
                    )?;
                }
            }
        }
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(frame: &Frame, path: P) -> Result<(), TrajectoryError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(frame, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
