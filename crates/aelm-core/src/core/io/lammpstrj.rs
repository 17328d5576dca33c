use super::error::{ParseErrorKind, TrajectoryError};
use super::traits::{LineCursor, TrajectoryFile, parse_float, parse_int};
use crate::core::models::frame::{Frame, Species};
use nalgebra::{Point3, Vector3};
use std::io::{BufRead, Write};

const TIMESTEP_HEADER: &str = "ITEM: TIMESTEP";
const NATOMS_HEADER: &str = "ITEM: NUMBER OF ATOMS";
const BOX_HEADER: &str = "ITEM: BOX BOUNDS";
const ATOMS_HEADER: &str = "ITEM: ATOMS";

/// Per-atom columns understood by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Type,
    Element,
    Charge,
    Cartesian(usize),
    Scaled(usize),
    Ignored,
}

impl Column {
    fn from_name(name: &str) -> Self {
        match name {
            "id" => Column::Id,
            "type" => Column::Type,
            "element" => Column::Element,
            "q" => Column::Charge,
            "x" | "xu" => Column::Cartesian(0),
            "y" | "yu" => Column::Cartesian(1),
            "z" | "zu" => Column::Cartesian(2),
            "xs" | "xsu" => Column::Scaled(0),
            "ys" | "ysu" => Column::Scaled(1),
            "zs" | "zsu" => Column::Scaled(2),
            _ => Column::Ignored,
        }
    }
}

/// LAMMPS text dump trajectories (`dump ... atom` / `dump ... custom`).
///
/// Frames are written with the `id type [q] x y z` columns and an orthogonal periodic box
/// spanning `origin..origin + length` on each axis.
pub struct LammpstrjFile;

impl LammpstrjFile {
    fn expect_header<R: BufRead>(
        cursor: &mut LineCursor<R>,
        expected: &'static str,
    ) -> Result<String, TrajectoryError> {
        let line = cursor.expect_line(expected)?;
        if !line.trim().starts_with(expected) {
            return Err(TrajectoryError::parse(
                cursor.line_number(),
                ParseErrorKind::UnexpectedHeader {
                    expected,
                    found: line,
                },
            ));
        }
        Ok(line)
    }

    fn read_bounds<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<([f64; 3], [f64; 3]), TrajectoryError> {
        let mut lo = [0.0; 3];
        let mut len = [0.0; 3];
        for axis in 0..3 {
            let line = cursor.expect_line("box bounds")?;
            let line_num = cursor.line_number();
            let mut tokens = line.split_whitespace();
            let (Some(lo_tok), Some(hi_tok)) = (tokens.next(), tokens.next()) else {
                return Err(TrajectoryError::parse(
                    line_num,
                    ParseErrorKind::MissingField { field: "box bounds" },
                ));
            };
            let lo_val = parse_float(lo_tok, "box lower bound", line_num)?;
            let hi_val = parse_float(hi_tok, "box upper bound", line_num)?;
            lo[axis] = lo_val;
            len[axis] = hi_val - lo_val;
        }
        Ok((lo, len))
    }
}

impl TrajectoryFile for LammpstrjFile {
    fn read_frame<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<Option<Frame>, TrajectoryError> {
        let first = match cursor.next_non_blank_line()? {
            None => return Ok(None),
            Some(line) => line,
        };
        if !first.trim().starts_with(TIMESTEP_HEADER) {
            return Err(TrajectoryError::parse(
                cursor.line_number(),
                ParseErrorKind::UnexpectedHeader {
                    expected: TIMESTEP_HEADER,
                    found: first,
                },
            ));
        }
        let timestep_line = cursor.expect_line("timestep")?;
        let timestep: u64 = parse_int(&timestep_line, "timestep", cursor.line_number())?;

        Self::expect_header(cursor, NATOMS_HEADER)?;
        let natoms_line = cursor.expect_line("atom count")?;
        let natoms: usize = parse_int(&natoms_line, "atom count", cursor.line_number())?;

        Self::expect_header(cursor, BOX_HEADER)?;
        let (lo, len) = Self::read_bounds(cursor)?;

        let atoms_header = Self::expect_header(cursor, ATOMS_HEADER)?;
        let columns: Vec<Column> = atoms_header
            .trim()
            .trim_start_matches(ATOMS_HEADER)
            .split_whitespace()
            .map(Column::from_name)
            .collect();

        let has_id = columns.contains(&Column::Id);
        let has_type = columns.contains(&Column::Type);
        let has_element = columns.contains(&Column::Element);
        let has_charge = columns.contains(&Column::Charge);
        if !has_type && !has_element {
            return Err(TrajectoryError::MissingRecord(
                "a 'type' or 'element' column in the ATOMS header".into(),
            ));
        }
        for axis in 0..3 {
            if !columns.contains(&Column::Cartesian(axis)) && !columns.contains(&Column::Scaled(axis)) {
                return Err(TrajectoryError::MissingRecord(format!(
                    "a coordinate column for axis {} in the ATOMS header",
                    ["x", "y", "z"][axis]
                )));
            }
        }

        let mut indices = Vec::with_capacity(natoms);
        let mut species = Vec::with_capacity(natoms);
        let mut charges = Vec::with_capacity(natoms);
        let mut positions = Vec::with_capacity(natoms);
        for _ in 0..natoms {
            let line = cursor.expect_line("ATOMS section")?;
            let line_num = cursor.line_number();
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < columns.len() {
                return Err(TrajectoryError::parse(
                    line_num,
                    ParseErrorKind::MissingField {
                        field: "per-atom column",
                    },
                ));
            }

            let mut coords = [0.0; 3];
            let mut type_species = None;
            let mut element_species = None;
            for (column, token) in columns.iter().zip(&tokens) {
                match *column {
                    Column::Id => indices.push(parse_int(token, "id", line_num)?),
                    Column::Type => {
                        type_species = Some(match token.parse::<u32>() {
                            Ok(code) => Species::Code(code),
                            Err(_) => Species::Label(token.to_string()),
                        })
                    }
                    Column::Element => element_species = Some(Species::Label(token.to_string())),
                    Column::Charge => charges.push(parse_float(token, "q", line_num)?),
                    Column::Cartesian(axis) => coords[axis] = parse_float(token, "coordinate", line_num)?,
                    Column::Scaled(axis) => {
                        let fraction = parse_float(token, "scaled coordinate", line_num)?;
                        coords[axis] = lo[axis] + fraction * len[axis];
                    }
                    Column::Ignored => {}
                }
            }
            if let Some(label) = type_species.or(element_species) {
                species.push(label);
            }
            positions.push(Point3::from(coords));
        }

        let mut frame = Frame::new(species, positions);
        frame.timestep = timestep;
        frame.box_lengths = Some(Vector3::from(len));
        frame.box_origin = lo;
        frame.indices = has_id.then_some(indices);
        frame.charges = has_charge.then_some(charges);
        Ok(Some(frame))
    }

    fn write_frame(frame: &Frame, writer: &mut impl Write) -> Result<(), TrajectoryError> {
        let box_lengths = frame.box_lengths.ok_or_else(|| {
            TrajectoryError::Inconsistency("a LAMMPS dump frame requires box lengths".into())
        })?;
        if frame.species.len() != frame.natoms() {
            return Err(TrajectoryError::Inconsistency(format!(
                "frame has {} positions but {} species",
                frame.natoms(),
                frame.species.len()
            )));
        }
        let charges = frame.charges.as_deref();

        writeln!(writer, "{}", TIMESTEP_HEADER)?;
        writeln!(writer, "{}", frame.timestep)?;
        writeln!(writer, "{}", NATOMS_HEADER)?;
        writeln!(writer, "{}", frame.natoms())?;
        writeln!(writer, "{} pp pp pp", BOX_HEADER)?;
        for (lo, length) in frame.box_origin.iter().zip(box_lengths.iter()) {
            writeln!(writer, "{} {}", lo, lo + length)?;
        }
        if charges.is_some() {
            writeln!(writer, "{} id type q x y z", ATOMS_HEADER)?;
        } else {
            writeln!(writer, "{} id type x y z", ATOMS_HEADER)?;
        }

        for (i, (label, position)) in frame.species.iter().zip(&frame.positions).enumerate() {
            let id = frame.index_of(i);
            match charges {
                Some(q) => writeln!(
                    writer,
                    "{} {} {} {} {} {}",
                    id,
                    label,
                    q.get(i).copied().unwrap_or(0.0),
                    position.x,
                    position.y,
                    position.z
                )?,
                None => writeln!(
                    writer,
                    "{} {} {} {} {}",
                    id, label, position.x, position.y, position.z
                )?,
            }
        }
        Ok(())
    }
}
