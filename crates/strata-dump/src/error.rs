use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a dump. Partial output files carry no validity
/// guarantee; the whole export must be re-run.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("unable to open output file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("loss of data: a count does not fit the 32 bit range of the dump format")]
    IntegerOverflow,

    #[error("deflate compression failed")]
    Compression(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
