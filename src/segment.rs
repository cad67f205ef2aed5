//! Segment classification and body decoding
//!
//! Each catalog entry describes one segment: a time interval, target and
//! center bodies, a reference frame, an encoding type, and a word-addressed
//! byte range holding the numeric body. Twenty-one encoding types are
//! recognized; only Chebyshev position (type 2) is decoded. Type-2 bodies
//! are read trailer-first: a four-double directory at the end of the byte
//! range declares the interval length, record size, and record count, and
//! the record data sits before it starting at the front of the range.

use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use log::debug;

use crate::errors::{BspError, Result};
use crate::header::Endian;
use crate::names::{Body, Frame};
use crate::summary::SummaryEntry;

/// Bytes in the four-double trailer at the end of a type-2 body
const TRAILER_BYTES: u64 = 32;

/// The twenty-one documented segment encoding types
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentType {
    ModifiedDifferenceArrays = 1,
    ChebyshevPosition = 2,
    ChebyshevPositionVelocity = 3,
    Type4 = 4,
    DiscreteStates = 5,
    Type6 = 6,
    Type7 = 7,
    LagrangeEqual = 8,
    LagrangeUnequal = 9,
    SpaceCommandTwoLine = 10,
    Type11 = 11,
    HermiteEqual = 12,
    HermiteUnequal = 13,
    ChebyshevUnequal = 14,
    PrecessingConic = 15,
    Type16 = 16,
    Equinoctial = 17,
    HermiteLagrange = 18,
    Piecewise = 19,
    ChebyshevVelocity = 20,
    ExtendedModifiedDifferenceArrays = 21,
}

impl SegmentType {
    /// Map a raw type code onto the known set
    pub fn from_code(code: i32) -> Option<SegmentType> {
        use SegmentType::*;
        Some(match code {
            1 => ModifiedDifferenceArrays,
            2 => ChebyshevPosition,
            3 => ChebyshevPositionVelocity,
            4 => Type4,
            5 => DiscreteStates,
            6 => Type6,
            7 => Type7,
            8 => LagrangeEqual,
            9 => LagrangeUnequal,
            10 => SpaceCommandTwoLine,
            11 => Type11,
            12 => HermiteEqual,
            13 => HermiteUnequal,
            14 => ChebyshevUnequal,
            15 => PrecessingConic,
            16 => Type16,
            17 => Equinoctial,
            18 => HermiteLagrange,
            19 => Piecewise,
            20 => ChebyshevVelocity,
            21 => ExtendedModifiedDifferenceArrays,
            _ => return None,
        })
    }

    /// The raw type code
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One interval of Chebyshev polynomial coefficients
#[derive(Clone, Debug, PartialEq)]
pub struct ChebyshevRecord {
    /// Midpoint of the covered sub-interval (ephemeris seconds)
    pub midpoint: f64,
    /// Half-width of the covered sub-interval (seconds)
    pub radius: f64,
    /// X-axis coefficients
    pub x: Vec<f64>,
    /// Y-axis coefficients
    pub y: Vec<f64>,
    /// Z-axis coefficients
    pub z: Vec<f64>,
}

/// Decoded segment body
#[derive(Clone, Debug, PartialEq)]
pub enum SegmentData {
    /// Type 2: position as piecewise Chebyshev polynomials
    ChebyshevPosition {
        /// Length of the interval covered by each record, in seconds
        interval_length: f64,
        /// Records in file order
        records: Vec<ChebyshevRecord>,
    },
    /// Any other encoding: recognized but not decoded
    Unsupported {
        /// The raw type code from the catalog entry
        type_code: i32,
    },
}

/// The decoded representation of one catalog entry
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Label from the name chain, trimmed
    pub name: String,
    /// Interval start (ephemeris seconds)
    pub start_et: f64,
    /// Interval end (ephemeris seconds)
    pub end_et: f64,
    /// Target body
    pub target: Body,
    /// Center body
    pub center: Body,
    /// Reference frame
    pub frame: Frame,
    /// Raw type code from the catalog entry
    pub type_code: i32,
    /// The recognized encoding, if the code is one of the documented 21
    pub kind: Option<SegmentType>,
    /// Byte offset of the first body element: `first_word * 8 - 8`
    pub initial_offset: u64,
    /// Byte offset one past the last body element: `last_word * 8`
    pub final_offset: u64,
    /// The decoded body, or an unsupported marker
    pub data: SegmentData,
}

impl Segment {
    /// Decode one (summary entry, name) pair.
    ///
    /// Unsupported encodings produce a segment with
    /// [`SegmentData::Unsupported`]; only structural problems (a malformed
    /// entry, a record size failing the `3n+2` identity) are errors.
    pub(crate) fn decode<R: Read + Seek>(
        name: String,
        entry: &SummaryEntry,
        reader: &mut R,
        endian: Endian,
    ) -> Result<Segment> {
        if entry.doubles.len() < 2 || entry.ints.len() < 6 {
            return Err(BspError::Structure(format!(
                "summary entry {:?} has {} doubles and {} integers, need 2 and 6",
                name,
                entry.doubles.len(),
                entry.ints.len()
            )));
        }
        let start_et = entry.doubles[0];
        let end_et = entry.doubles[1];
        let target = Body::resolve(entry.ints[0]);
        let center = Body::resolve(entry.ints[1]);
        let frame = Frame::resolve(entry.ints[2]);
        let type_code = entry.ints[3];
        let first_word = entry.ints[4];
        let last_word = entry.ints[5];

        if first_word < 1 || last_word < first_word {
            return Err(BspError::Structure(format!(
                "segment {:?} has word range {}..{}",
                name, first_word, last_word
            )));
        }
        let initial_offset = first_word as u64 * 8 - 8;
        let final_offset = last_word as u64 * 8;

        let kind = SegmentType::from_code(type_code);
        let data = match kind {
            Some(SegmentType::ChebyshevPosition) => {
                decode_chebyshev_position(reader, endian, initial_offset, final_offset, start_et)?
            }
            _ => {
                debug!("segment {:?}: leaving type {} undecoded", name, type_code);
                SegmentData::Unsupported { type_code }
            }
        };

        Ok(Segment {
            name,
            start_et,
            end_et,
            target,
            center,
            frame,
            type_code,
            kind,
            initial_offset,
            final_offset,
            data,
        })
    }

    /// The decoded Chebyshev records, or [`BspError::UnsupportedSegmentType`]
    /// for any other encoding.
    pub fn chebyshev_records(&self) -> Result<&[ChebyshevRecord]> {
        match &self.data {
            SegmentData::ChebyshevPosition { records, .. } => Ok(records),
            SegmentData::Unsupported { type_code } => {
                Err(BspError::UnsupportedSegmentType(*type_code))
            }
        }
    }

    /// One-line human-readable description
    pub fn describe(&self, verbose: bool) -> String {
        let mut text = format!(
            "{:.3}..{:.3}  Type {}  {} ({}) -> {} ({})",
            self.start_et,
            self.end_et,
            self.type_code,
            self.center,
            self.center.id(),
            self.target,
            self.target.id()
        );
        if verbose {
            text.push_str(&format!("\n  frame={} name={}", self.frame, self.name));
        }
        text
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe(false))
    }
}

/// Decode a type-2 body between `initial` and `final` byte offsets.
///
/// Two passes over the range: the trailer at `final - 32` first, then the
/// records from `initial` forward.
fn decode_chebyshev_position<R: Read + Seek>(
    reader: &mut R,
    endian: Endian,
    initial: u64,
    final_offset: u64,
    start_et: f64,
) -> Result<SegmentData> {
    if final_offset < initial + TRAILER_BYTES {
        return Err(BspError::Structure(format!(
            "segment byte range {}..{} is too small for its trailer",
            initial, final_offset
        )));
    }

    reader.seek(SeekFrom::Start(final_offset - TRAILER_BYTES))?;
    // Trailer order: INIT, INTLEN, RSIZE, N. INIT is the initial epoch of
    // the first record; it duplicates the summary entry's interval start
    // and is discarded after a debug note.
    let initial_epoch = endian.read_f64(reader)?;
    let interval_length = endian.read_f64(reader)?;
    let record_size = endian.read_f64(reader)?.trunc() as i64;
    let record_count = endian.read_f64(reader)?.trunc() as i64;
    if initial_epoch != start_et {
        debug!(
            "trailer initial epoch {} differs from interval start {}",
            initial_epoch, start_et
        );
    }

    let num_components = (record_size - 2) / 3;
    if num_components < 0 || num_components * 3 + 2 != record_size {
        return Err(BspError::RecordSizeMismatch { record_size });
    }
    if record_count < 0 {
        return Err(BspError::Structure(format!(
            "segment declares {} records",
            record_count
        )));
    }

    let body_bytes = (record_count as u64)
        .checked_mul(record_size as u64)
        .and_then(|words| words.checked_mul(8))
        .ok_or_else(|| {
            BspError::Structure(format!(
                "segment body of {} records of size {} overflows",
                record_count, record_size
            ))
        })?;
    if body_bytes > final_offset - TRAILER_BYTES - initial {
        return Err(BspError::Structure(format!(
            "{} records of {} words overrun the segment byte range {}..{}",
            record_count, record_size, initial, final_offset
        )));
    }

    reader.seek(SeekFrom::Start(initial))?;
    let n = num_components as usize;
    let mut records = Vec::with_capacity(record_count as usize);
    for _ in 0..record_count {
        let midpoint = endian.read_f64(reader)?;
        let radius = endian.read_f64(reader)?;
        let x = read_f64_array(reader, endian, n)?;
        let y = read_f64_array(reader, endian, n)?;
        let z = read_f64_array(reader, endian, n)?;
        records.push(ChebyshevRecord {
            midpoint,
            radius,
            x,
            y,
            z,
        });
    }

    Ok(SegmentData::ChebyshevPosition {
        interval_length,
        records,
    })
}

fn read_f64_array<R: Read>(reader: &mut R, endian: Endian, n: usize) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(n);
    for _ in 0..n {
        values.push(endian.read_f64(reader)?);
    }
    Ok(values)
}
