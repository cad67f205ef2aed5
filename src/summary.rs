//! Summary and name catalog chains
//!
//! Catalog metadata is not a flat table: summary entries live in a linked
//! chain of 1024-byte blocks, each opening with three control doubles
//! (next-block pointer, previous-block pointer, entry count) followed by a
//! batch of fixed-layout entries. The parallel name labels are stored
//! contiguously starting one record past the last summary block.

use std::collections::HashSet;
use std::io::{Read, Seek, SeekFrom};

use log::trace;

use crate::errors::{BspError, Result};
use crate::header::{trim_label, FileHeader, RECORD_SIZE};

/// Bytes taken by the three control doubles at the head of a summary block
const CONTROL_BYTES: u64 = 24;

/// One raw catalog entry: ND doubles followed by NI integers
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryEntry {
    /// Double-precision components, in declared order
    pub doubles: Vec<f64>,
    /// Integer components, in declared order
    pub ints: Vec<i32>,
}

/// Walk the summary chain from the header's forward pointer, appending
/// entries in traversal order.
///
/// The chain is addressed by record number over a bounded record space; a
/// revisited record number means a cyclic next pointer and fails with
/// [`BspError::SummaryChainCycle`] instead of looping forever.
pub(crate) fn read_summary_chain<R: Read + Seek>(
    reader: &mut R,
    header: &FileHeader,
) -> Result<Vec<SummaryEntry>> {
    let endian = header.endian;
    let nd = header.nd as usize;
    let ni = header.ni as usize;
    let entry_bytes = 8 * nd as u64 + 4 * ni as u64 + if ni % 2 == 1 { 4 } else { 0 };
    if entry_bytes == 0 {
        return Err(BspError::Structure(
            "header declares zero-width summary entries".to_string(),
        ));
    }
    let max_entries = (RECORD_SIZE - CONTROL_BYTES) / entry_bytes;

    let mut entries = Vec::new();
    let mut visited = HashSet::new();
    let mut next = header.first_summary_block as i64;

    while next >= 0 {
        let record = next as u64;
        if record >= header.record_count {
            return Err(BspError::Structure(format!(
                "summary chain points at record {} beyond the file's {} records",
                record, header.record_count
            )));
        }
        if !visited.insert(record) {
            return Err(BspError::SummaryChainCycle { record });
        }

        reader.seek(SeekFrom::Start(record * RECORD_SIZE))?;
        let next_pointer = endian.read_f64(reader)?;
        let _prev_pointer = endian.read_f64(reader)?;
        let count = endian.read_f64(reader)?.trunc();

        // Back to 0-based numbering; a stored 0 becomes -1 and ends the chain.
        next = next_pointer.trunc() as i64 - 1;

        // A saturating cast keeps absurd counts on the rejecting side.
        if count < 0.0 || count as u64 > max_entries {
            return Err(BspError::Structure(format!(
                "summary block {} declares {} entries, which cannot fit in one record",
                record, count
            )));
        }
        trace!("summary block {}: {} entries, next {}", record, count, next);

        for _ in 0..count as u64 {
            let mut doubles = Vec::with_capacity(nd);
            for _ in 0..nd {
                doubles.push(endian.read_f64(reader)?);
            }
            let mut ints = Vec::with_capacity(ni);
            for _ in 0..ni {
                ints.push(endian.read_i32(reader)?);
            }
            // An odd integer count leaves the entry half a word short.
            if ni % 2 == 1 {
                reader.seek(SeekFrom::Current(4))?;
            }
            entries.push(SummaryEntry { doubles, ints });
        }
    }

    Ok(entries)
}

/// Read `count` fixed-width name labels from the record following the last
/// summary block. Labels are returned trimmed of trailing NULs and spaces.
pub(crate) fn read_name_chain<R: Read + Seek>(
    reader: &mut R,
    header: &FileHeader,
    count: usize,
) -> Result<Vec<String>> {
    let start_record = header.last_summary_block + 1;
    if start_record >= header.record_count {
        return Err(BspError::Structure(format!(
            "name area record {} is beyond the file's {} records",
            start_record, header.record_count
        )));
    }

    reader.seek(SeekFrom::Start(start_record * RECORD_SIZE))?;
    let width = header.name_width() as usize;
    let mut names = Vec::with_capacity(count);
    let mut label = vec![0u8; width];
    for _ in 0..count {
        reader.read_exact(&mut label)?;
        names.push(trim_label(&label));
    }
    Ok(names)
}
