use super::error::{ParseErrorKind, TrajectoryError};
use crate::core::models::frame::Frame;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Line-oriented reader that remembers how many lines it has consumed.
///
/// Trajectory formats are parsed frame by frame from the same cursor, so the line number
/// reported in parse errors stays meaningful across frames.
pub struct LineCursor<R> {
    reader: R,
    line_number: usize,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
        }
    }

    /// Number of the line most recently returned, 1-based.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns the next line without its line terminator, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<String>, TrajectoryError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Returns the next line that is not blank, or `None` at end of input.
    pub fn next_non_blank_line(&mut self) -> Result<Option<String>, TrajectoryError> {
        while let Some(line) = self.next_line()? {
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    /// Returns the next line, treating end of input as an error while reading `what`.
    pub fn expect_line(&mut self, what: &'static str) -> Result<String, TrajectoryError> {
        self.next_line()?.ok_or(TrajectoryError::UnexpectedEof(what))
    }
}

pub(crate) fn parse_int<T: FromStr>(
    token: &str,
    field: &'static str,
    line: usize,
) -> Result<T, TrajectoryError> {
    token.trim().parse().map_err(|_| {
        TrajectoryError::parse(
            line,
            ParseErrorKind::InvalidInt {
                field,
                value: token.to_string(),
            },
        )
    })
}

pub(crate) fn parse_float(
    token: &str,
    field: &'static str,
    line: usize,
) -> Result<f64, TrajectoryError> {
    token.trim().parse().map_err(|_| {
        TrajectoryError::parse(
            line,
            ParseErrorKind::InvalidFloat {
                field,
                value: token.to_string(),
            },
        )
    })
}

/// Defines the interface for reading and writing multi-frame trajectory formats.
///
/// Implementors provide single-frame parsing and serialization; whole-trajectory and
/// path-based helpers are derived from those two operations.
pub trait TrajectoryFile {
    /// Reads the next frame from the cursor.
    ///
    /// # Return
    ///
    /// Returns `Ok(None)` when the input is exhausted before a new frame starts.
    ///
    /// # Errors
    ///
    /// Returns an error if a frame is truncated or malformed, or on I/O failure.
    fn read_frame<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<Option<Frame>, TrajectoryError>;

    /// Writes one frame in the format's textual layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame lacks data the format requires, or on I/O failure.
    fn write_frame(frame: &Frame, writer: &mut impl Write) -> Result<(), TrajectoryError>;

    /// Reads every frame of a trajectory in document order.
    fn read_all<R: BufRead>(reader: R) -> Result<Vec<Frame>, TrajectoryError> {
        let mut cursor = LineCursor::new(reader);
        let mut frames = Vec::new();
        while let Some(frame) = Self::read_frame(&mut cursor)? {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Reads a trajectory and keeps only its last frame.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::MissingRecord`] if the trajectory holds no frame at all.
    fn read_last<R: BufRead>(reader: R) -> Result<Frame, TrajectoryError> {
        let mut cursor = LineCursor::new(reader);
        let mut last = None;
        while let Some(frame) = Self::read_frame(&mut cursor)? {
            last = Some(frame);
        }
        last.ok_or_else(|| TrajectoryError::MissingRecord("at least one frame".into()))
    }

    /// Writes every frame in order.
    fn write_all(frames: &[Frame], writer: &mut impl Write) -> Result<(), TrajectoryError> {
        for frame in frames {
            Self::write_frame(frame, writer)?;
        }
        Ok(())
    }

    fn read_all_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Frame>, TrajectoryError> {
        let file = File::open(path)?;
        Self::read_all(BufReader::new(file))
    }

    fn read_last_from_path<P: AsRef<Path>>(path: P) -> Result<Frame, TrajectoryError> {
        let file = File::open(path)?;
        Self::read_last(BufReader::new(file))
    }

    fn write_all_to_path<P: AsRef<Path>>(frames: &[Frame], path: P) -> Result<(), TrajectoryError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_all(frames, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
