use super::error::{ParseErrorKind, TrajectoryError};
use super::traits::{LineCursor, TrajectoryFile, parse_float, parse_int};
use crate::core::models::frame::{Frame, Species};
use nalgebra::Point3;
use std::io::{BufRead, Write};

/// Plain XYZ trajectories: an atom count line, a comment line, then one
/// `label x y z` line per atom. Extra columns after `z` are ignored on read.
pub struct XyzFile;

impl TrajectoryFile for XyzFile {
    fn read_frame<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<Option<Frame>, TrajectoryError> {
        let natoms: usize = match cursor.next_non_blank_line()? {
            None => return Ok(None),
            Some(line) => {
                let token = line.split_whitespace().next().unwrap_or("");
                parse_int(token, "atom count", cursor.line_number())?
            }
        };
        let comment = cursor.expect_line("XYZ comment line")?;

        let mut species = Vec::with_capacity(natoms);
        let mut positions = Vec::with_capacity(natoms);
        for _ in 0..natoms {
            let line = cursor.expect_line("XYZ atom lines")?;
            let line_num = cursor.line_number();
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return Err(TrajectoryError::parse(
                    line_num,
                    ParseErrorKind::MissingField {
                        field: "label x y z",
                    },
                ));
            }
            let label = fields[0]
                .parse::<Species>()
                .map_err(|_| TrajectoryError::parse(line_num, ParseErrorKind::MissingField { field: "label" }))?;
            let x = parse_float(fields[1], "x", line_num)?;
            let y = parse_float(fields[2], "y", line_num)?;
            let z = parse_float(fields[3], "z", line_num)?;
            species.push(label);
            positions.push(Point3::new(x, y, z));
        }

        let mut frame = Frame::new(species, positions);
        frame.comment = comment;
        Ok(Some(frame))
    }

    fn write_frame(frame: &Frame, writer: &mut impl Write) -> Result<(), TrajectoryError> {
        if frame.species.len() != frame.natoms() {
            return Err(TrajectoryError::Inconsistency(format!(
                "frame has {} positions but {} species",
                frame.natoms(),
                frame.species.len()
            )));
        }
        writeln!(writer, "{}", frame.natoms())?;
        writeln!(writer, "{}", frame.comment)?;
        for (label, position) in frame.species.iter().zip(&frame.positions) {
            writeln!(
                writer,
                "{:<2} {:>16.8} {:>16.8} {:>16.8}",
                label, position.x, position.y, position.z
            )?;
        }
        Ok(())
    }
}
