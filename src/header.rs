//! Fixed file-record header for the DAF container
//!
//! The first 1024-byte record of a kernel describes the catalog that
//! follows: the summary-entry shape (ND doubles + NI integers), the record
//! numbers of the first and last summary blocks, and the byte order of the
//! numeric data. The header's own numeric fields are always little-endian
//! regardless of the format tag, a quirk of the self-describing layout.

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use log::debug;

use crate::errors::{BspError, Result};

/// Size of a file record (bytes)
pub const RECORD_SIZE: u64 = 1024;

/// Significant prefix of the header ID word
pub const MAGIC: &str = "DAF/SPK";

/// Byte order of the kernel's numeric data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    pub(crate) fn read_f64<R: Read>(self, r: &mut R) -> io::Result<f64> {
        match self {
            Endian::Big => r.read_f64::<BigEndian>(),
            Endian::Little => r.read_f64::<LittleEndian>(),
        }
    }

    pub(crate) fn read_i32<R: Read>(self, r: &mut R) -> io::Result<i32> {
        match self {
            Endian::Big => r.read_i32::<BigEndian>(),
            Endian::Little => r.read_i32::<LittleEndian>(),
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endian::Big => write!(f, "big"),
            Endian::Little => write!(f, "little"),
        }
    }
}

/// Decoded file header, built once at open time
#[derive(Clone, Debug, PartialEq)]
pub struct FileHeader {
    /// ID word, truncated to its seven significant characters
    pub magic: String,
    /// Number of double-precision components in each summary entry (ND)
    pub nd: u32,
    /// Number of integer components in each summary entry (NI)
    pub ni: u32,
    /// Internal name or description of the kernel
    pub internal_name: String,
    /// Record number of the first summary block (0-based)
    pub first_summary_block: u64,
    /// Record number of the last summary block (0-based)
    pub last_summary_block: u64,
    /// First free address in the file (0-based)
    pub first_free_address: u64,
    /// Byte order resolved from the format tag
    pub endian: Endian,
    /// Total number of 1024-byte records in the file
    pub record_count: u64,
}

impl FileHeader {
    /// Parse the first 1024-byte record of a kernel.
    ///
    /// `expected` is the byte order the caller intends to decode the body
    /// data with; if the file's format tag resolves to the other order the
    /// parse fails with [`BspError::EndianMismatch`] before anything past
    /// the header is read.
    pub fn parse<R: Read + Seek>(reader: &mut R, expected: Endian) -> Result<FileHeader> {
        let file_len = reader.seek(SeekFrom::End(0))?;
        let record_count = file_len / RECORD_SIZE;
        reader.seek(SeekFrom::Start(0))?;

        let mut record = [0u8; RECORD_SIZE as usize];
        reader.read_exact(&mut record).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                BspError::Structure("file is shorter than one 1024-byte record".to_string())
            } else {
                BspError::Io(e)
            }
        })?;

        let id_word = String::from_utf8_lossy(&record[0..8]).into_owned();
        if !id_word.starts_with(MAGIC) {
            return Err(BspError::BadMagic {
                found: id_word.trim_end_matches('\0').to_string(),
            });
        }
        // Truncate the trailing NUL in the ID word.
        let magic = id_word[..MAGIC.len()].to_string();

        // Header numerics are little-endian no matter what the format tag
        // says about the body data.
        let nd = LittleEndian::read_u32(&record[8..12]);
        let ni = LittleEndian::read_u32(&record[12..16]);
        let internal_name = trim_label(&record[16..76]);
        let fward = LittleEndian::read_u32(&record[76..80]) as u64;
        let bward = LittleEndian::read_u32(&record[80..84]) as u64;
        let free = LittleEndian::read_u32(&record[84..88]) as u64;
        let format_tag = trim_label(&record[88..96]);

        // TODO: check the FTP validation string at offset 699 to detect
        // ASCII-mode transfer corruption.

        let file_endian = match format_tag.as_str() {
            "LTL-IEEE" => Endian::Little,
            "BIG-IEEE" => Endian::Big,
            _ => return Err(BspError::UnknownFormatTag(format_tag)),
        };
        if file_endian != expected {
            return Err(BspError::EndianMismatch {
                file: file_endian,
                expected,
            });
        }

        // Switch from FORTRAN to C-based record numbering. Record 0 is the
        // header itself, so a summary block can never live there.
        for (field, value) in [("fward", fward), ("bward", bward), ("free", free)] {
            if value < 1 {
                return Err(BspError::Structure(format!(
                    "header pointer {} is {}, expected at least 1",
                    field, value
                )));
            }
        }
        let first_summary_block = fward - 1;
        let last_summary_block = bward - 1;
        let first_free_address = free - 1;

        for (field, value) in [
            ("first summary block", first_summary_block),
            ("last summary block", last_summary_block),
        ] {
            if value < 1 || value >= record_count {
                return Err(BspError::Structure(format!(
                    "{} record {} is outside the file's {} records",
                    field, value, record_count
                )));
            }
        }

        debug!(
            "header: nd={} ni={} fward={} bward={} free={} endian={} records={}",
            nd, ni, first_summary_block, last_summary_block, first_free_address, file_endian,
            record_count
        );

        Ok(FileHeader {
            magic,
            nd,
            ni,
            internal_name,
            first_summary_block,
            last_summary_block,
            first_free_address,
            endian: file_endian,
            record_count,
        })
    }

    /// Width of one name label in bytes: `8 * (ND + (NI+1)/2)`
    pub fn name_width(&self) -> u64 {
        8 * (self.nd as u64 + (self.ni as u64 + 1) / 2)
    }
}

/// Decode a fixed-width ASCII field, dropping trailing NULs and spaces
pub(crate) fn trim_label(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\0', ' '])
        .to_string()
}
