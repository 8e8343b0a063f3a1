use crate::scan::MalformedTag;
use crate::select::StructureMismatch;
use std::io;

/// A fatal problem while processing input. Lines produced before it are still valid.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    MalformedTag(#[from] MalformedTag),
    #[error(transparent)]
    StructureMismatch(#[from] StructureMismatch),
    #[error("couldn't read input: {0}")]
    Io(#[from] io::Error),
}
