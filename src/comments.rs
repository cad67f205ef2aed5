//! Comment-area reassembly
//!
//! The comment area occupies the records between the header and the first
//! summary block. Each record carries a 1000-byte text payload followed by
//! 24 bytes of padding. A payload of exactly 1000 bytes with no 0x04
//! sentinel means another chunk follows; a sentinel anywhere in the payload
//! marks the final chunk. Comment lines are separated by NUL bytes.

use std::io::{Read, Seek, SeekFrom};

use log::trace;

use crate::errors::Result;
use crate::header::{FileHeader, RECORD_SIZE};

/// Payload bytes per comment record
const CHUNK_LEN: usize = 1000;
/// Marks the final comment chunk
const SENTINEL: u8 = 0x04;

/// Reassemble the comment area into a single text blob.
pub(crate) fn read_comments<R: Read + Seek>(reader: &mut R, header: &FileHeader) -> Result<String> {
    let mut raw: Vec<u8> = Vec::new();

    for record in 1..header.first_summary_block {
        let chunk_start = record * RECORD_SIZE;
        reader.seek(SeekFrom::Start(chunk_start))?;

        let mut payload = [0u8; CHUNK_LEN];
        reader.read_exact(&mut payload)?;

        if let Some(end) = payload.iter().position(|&b| b == SENTINEL) {
            // Final chunk. The sentinel is stripped, and the cursor lands at
            // the end of the payload so subsequent reads are record-aligned.
            raw.extend_from_slice(&payload[..end]);
            reader.seek(SeekFrom::Start(chunk_start + CHUNK_LEN as u64))?;
            break;
        }
        raw.extend_from_slice(&payload);
    }

    trace!("comment area: {} raw bytes", raw.len());

    // NUL is the comment body's line separator; trailing empties are padding.
    let text = String::from_utf8_lossy(&raw);
    let mut lines: Vec<&str> = text.split('\0').collect();
    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }
    Ok(lines.join("\n"))
}
