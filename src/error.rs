use std::io;

use crate::seq::SeqType;

pub type SeqoutResult<T> = Result<T, SeqoutError>;

#[derive(thiserror::Error, Debug)]
pub enum SeqoutError {
    /// Format name not found in the registry
    #[error("Unknown output format: '{0}'")]
    UnknownFormat(String),

    /// The sequence type cannot be written in the selected format
    #[error(
        "Sequence '{name}' of type {seqtype} cannot be written in the '{format}' format, \
        which only accepts {accepts} sequences."
    )]
    TypeMismatch {
        format: &'static str,
        name: String,
        seqtype: SeqType,
        accepts: &'static str,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Attempt to write to an output that was already closed")]
    Closed,

    #[error("No output file available for writing '{0}'")]
    NoDestination(String),

    #[error("{0}")]
    Other(String),
}

impl From<String> for SeqoutError {
    fn from(err: String) -> SeqoutError {
        SeqoutError::Other(err)
    }
}

impl<'a> From<&'a str> for SeqoutError {
    fn from(err: &'a str) -> SeqoutError {
        SeqoutError::Other(err.to_owned())
    }
}
