//! Error types for the bspfile crate
//!
//! Header, comment-area, and catalog-chain errors mean the file cannot be
//! interpreted at all and abort the open. Segment-level errors are scoped
//! as described on each variant.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::header::Endian;

/// Main error type for kernel decoding
#[derive(Error, Debug)]
pub enum BspError {
    /// Error when a file cannot be opened or sized
    #[error("File I/O error on {path:?}: {source}")]
    File {
        /// The path of the file that caused the error
        path: PathBuf,
        /// The underlying I/O error
        source: io::Error,
    },

    /// Error when a positioned read fails mid-decode
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error when the file's ID word is not DAF/SPK
    #[error("expected a DAF/SPK file, found id word {found:?}")]
    BadMagic {
        /// The first eight header bytes, decoded lossily
        found: String,
    },

    /// Error when the header's format tag is neither LTL-IEEE nor BIG-IEEE
    #[error("unrecognized binary format tag {0:?}")]
    UnknownFormatTag(String),

    /// Error when the file's declared byte order disagrees with the caller's
    #[error("file is {file}-endian but {expected}-endian decoding was requested")]
    EndianMismatch {
        /// Byte order declared by the file's format tag
        file: Endian,
        /// Byte order the caller asked to decode with
        expected: Endian,
    },

    /// Error when the summary chain revisits a record (cyclic next pointer)
    #[error("summary chain revisits record {record}")]
    SummaryChainCycle {
        /// The record number seen twice during traversal
        record: u64,
    },

    /// Error when a segment trailer's record size fails the 3n+2 identity
    #[error("record size {record_size} does not equal components times three plus two")]
    RecordSizeMismatch {
        /// The record size declared in the segment trailer
        record_size: i64,
    },

    /// Error when decoded data is requested from an unsupported segment type
    #[error("unsupported segment type {0}")]
    UnsupportedSegmentType(i32),

    /// Error for any other structural inconsistency in the file
    #[error("invalid file structure: {0}")]
    Structure(String),
}

/// Extension of the Result type for decoding operations
pub type Result<T> = std::result::Result<T, BspError>;

/// Helper function to wrap a std::io::Error with the file path
pub fn io_err(path: impl Into<PathBuf>, err: io::Error) -> BspError {
    BspError::File {
        path: path.into(),
        source: err,
    }
}
