//! Error types for tbrollup-parser

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid JSON at line {line}, column {column}: {message}")]
    InvalidJson {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unexpected feed shape: {found}")]
    UnexpectedShape { found: String },

    #[error("IO error")]
    IoError(#[from] io::Error),
}
