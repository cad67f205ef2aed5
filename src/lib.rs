//! bspfile: reader for binary SPK ephemeris kernels in the DAF container format
//!
//! A kernel is a sequence of 1024-byte records: a typed header, a free-text
//! comment area, a linked chain of summary blocks describing the catalog, a
//! parallel chain of fixed-width name labels, and one variable-length
//! numeric body per catalog entry holding piecewise Chebyshev polynomial
//! data. This crate decodes the container fully into memory; it does not
//! evaluate the polynomials into positions and it does not write kernels.
//!
//! The format is described in:
//! http://naif.jpl.nasa.gov/pub/naif/toolkit_docs/C/req/daf.html
//!
//! # Main Components
//!
//! - `reader`: the [`Bsp`] decoding session (open, comments, segments)
//! - `header`: the fixed 1024-byte file header
//! - `comments`: comment-area reassembly
//! - `summary`: summary-chain and name-chain traversal
//! - `segment`: segment classification and Chebyshev body decoding
//! - `names`: fixed NAIF body and frame identifier tables
//! - Error types for proper error handling
//!
//! # Example
//!
//! ```no_run
//! use bspfile::{Bsp, Endian};
//!
//! let kernel = Bsp::open("de430.bsp", Endian::Little)?;
//! println!("{}", kernel.comments());
//! for segment in kernel.segments() {
//!     println!("{}", segment);
//! }
//! # Ok::<(), bspfile::BspError>(())
//! ```

pub mod comments;
pub mod errors;
pub mod header;
pub mod names;
pub mod reader;
pub mod segment;
pub mod summary;

#[cfg(test)]
mod tests;

// Re-export primary types for convenience
pub use self::errors::{BspError, Result};
pub use self::header::{Endian, FileHeader};
pub use self::names::{Body, Frame};
pub use self::reader::Bsp;
pub use self::segment::{ChebyshevRecord, Segment, SegmentData, SegmentType};
pub use self::summary::SummaryEntry;
