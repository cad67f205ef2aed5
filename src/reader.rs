//! The decoding session
//!
//! A [`Bsp`] owns everything decoded from one kernel. The decode is strictly
//! linear over one exclusively-owned source: header, then comment area, then
//! the summary chain, then the name chain, then each segment body. All
//! structures are fully materialized before `open` returns and nothing is
//! mutated afterwards, so decoding the same bytes twice yields equal results.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use log::debug;

use crate::comments::read_comments;
use crate::errors::{io_err, Result};
use crate::header::{Endian, FileHeader};
use crate::segment::Segment;
use crate::summary::{read_name_chain, read_summary_chain};

/// A fully decoded kernel
#[derive(Clone, Debug, PartialEq)]
pub struct Bsp {
    header: FileHeader,
    comments: String,
    segments: Vec<Segment>,
}

impl Bsp {
    /// Open and fully decode the kernel at `path`.
    ///
    /// `endian` is the byte order the caller expects the body data in; the
    /// header's format tag is cross-checked against it before anything else
    /// is read.
    pub fn open<P: AsRef<Path>>(path: P, endian: Endian) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| io_err(path, e))?;
        Self::from_reader(&mut file, endian)
    }

    /// Decode a kernel from any seekable byte source.
    pub fn from_reader<R: Read + Seek>(reader: &mut R, endian: Endian) -> Result<Self> {
        let header = FileHeader::parse(reader, endian)?;
        let comments = read_comments(reader, &header)?;
        let entries = read_summary_chain(reader, &header)?;
        let names = read_name_chain(reader, &header, entries.len())?;

        let mut segments = Vec::with_capacity(entries.len());
        for (name, entry) in names.into_iter().zip(entries.iter()) {
            segments.push(Segment::decode(name, entry, reader, header.endian)?);
        }
        debug!(
            "decoded {} segments from {:?}",
            segments.len(),
            header.internal_name
        );

        Ok(Bsp {
            header,
            comments,
            segments,
        })
    }

    /// The decoded file header
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// The reassembled comment text
    pub fn comments(&self) -> &str {
        &self.comments
    }

    /// The decoded segments, in catalog order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}
