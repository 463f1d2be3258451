//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid FASTA file")]
    InvalidFastaFile,

    #[error("Illegal FASTA line: {0}")]
    IllegalFastaLine(String),

    #[error("The format of the color code is invalid")]
    InvalidHexColor,

    #[error("{} is a directory", .0.display())]
    IsADirectory(std::path::PathBuf),

    #[error("pigz exited with {0}")]
    PigzFailed(std::process::ExitStatus),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
