use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrajectoryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },
    #[error("Unexpected end of file while reading {0}")]
    UnexpectedEof(&'static str),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseErrorKind {
    #[error("Invalid integer '{value}' for {field}")]
    InvalidInt { field: &'static str, value: String },
    #[error("Invalid float '{value}' for {field}")]
    InvalidFloat { field: &'static str, value: String },
    #[error("Missing field {field}")]
    MissingField { field: &'static str },
    #[error("Expected '{expected}', found '{found}'")]
    UnexpectedHeader { expected: &'static str, found: String },
}

impl TrajectoryError {
    pub(crate) fn parse(line: usize, kind: ParseErrorKind) -> Self {
        Self::Parse { line, kind }
    }
}
