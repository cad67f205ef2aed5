//! Whole-file tests over synthetic kernel images
//!
//! These tests build byte-exact kernel images in memory and decode them,
//! so every offset, padding rule, and endianness choice in the format is
//! exercised without large binary fixtures.

use std::io::Cursor;

use approx::assert_relative_eq;
use rstest::rstest;

use crate::errors::BspError;
use crate::header::Endian;
use crate::names::{Body, Frame};
use crate::reader::Bsp;
use crate::segment::{SegmentData, SegmentType};

use fixtures::TestKernel;

pub(crate) mod fixtures {
    //! Builders for synthetic kernel byte images

    use byteorder::{BigEndian, ByteOrder, LittleEndian};

    use crate::header::{Endian, RECORD_SIZE};

    pub(crate) fn write_f64(buf: &mut [u8], endian: Endian, value: f64) {
        match endian {
            Endian::Big => BigEndian::write_f64(&mut buf[..8], value),
            Endian::Little => LittleEndian::write_f64(&mut buf[..8], value),
        }
    }

    pub(crate) fn write_i32(buf: &mut [u8], endian: Endian, value: i32) {
        match endian {
            Endian::Big => BigEndian::write_i32(&mut buf[..4], value),
            Endian::Little => LittleEndian::write_i32(&mut buf[..4], value),
        }
    }

    /// Build a header record. Numeric header fields are little-endian no
    /// matter which format tag is written, matching the format's quirk.
    pub(crate) fn header_record(
        nd: u32,
        ni: u32,
        fward: u32,
        bward: u32,
        free: u32,
        tag: &str,
    ) -> Vec<u8> {
        assert_eq!(tag.len(), 8);
        let mut record = vec![0u8; RECORD_SIZE as usize];
        record[0..8].copy_from_slice(b"DAF/SPK\0");
        LittleEndian::write_u32(&mut record[8..12], nd);
        LittleEndian::write_u32(&mut record[12..16], ni);
        let name = b"Synthetic kernel for tests";
        record[16..16 + name.len()].copy_from_slice(name);
        LittleEndian::write_u32(&mut record[76..80], fward);
        LittleEndian::write_u32(&mut record[80..84], bward);
        LittleEndian::write_u32(&mut record[84..88], free);
        record[88..96].copy_from_slice(tag.as_bytes());
        record
    }

    /// A five-record kernel with two catalog entries: one type-2 segment
    /// with two Chebyshev records of four coefficients per axis, and one
    /// type-3 segment left undecoded. Knobs exist for the corrupt variants
    /// the decoder must reject.
    pub(crate) struct TestKernel {
        pub endian: Endian,
        /// RSIZE written to the type-2 trailer; 14.0 satisfies 3n+2
        pub trailer_record_size: f64,
        /// Raw (1-based) next pointer written to the summary block
        pub next_pointer: f64,
    }

    impl TestKernel {
        pub(crate) fn new(endian: Endian) -> Self {
            TestKernel {
                endian,
                trailer_record_size: 14.0,
                next_pointer: 0.0,
            }
        }

        pub(crate) fn build(&self) -> Vec<u8> {
            let e = self.endian;
            let tag = match e {
                Endian::Big => "BIG-IEEE",
                Endian::Little => "LTL-IEEE",
            };
            let mut image = vec![0u8; 5 * RECORD_SIZE as usize];

            // Record 0: header. Summary block at record 2 (1-based 3),
            // names at record 3, type-2 body at record 4.
            image[..RECORD_SIZE as usize]
                .copy_from_slice(&header_record(2, 6, 3, 3, 545, tag));

            // Record 1: one terminated comment chunk.
            let comment = b"SYNTHETIC KERNEL\0PRODUCED FOR TESTS\0\x04";
            let base = RECORD_SIZE as usize;
            image[base..base + comment.len()].copy_from_slice(comment);

            // Record 2: summary block with two entries.
            let base = 2 * RECORD_SIZE as usize;
            write_f64(&mut image[base..], e, self.next_pointer);
            write_f64(&mut image[base + 8..], e, 0.0);
            write_f64(&mut image[base + 16..], e, 2.0);
            // Entry A: type 2, body words 513..544 (bytes 4096..4352).
            write_f64(&mut image[base + 24..], e, 0.0);
            write_f64(&mut image[base + 32..], e, 64.0);
            for (i, v) in [399, 3, 1, 2, 513, 544].iter().enumerate() {
                write_i32(&mut image[base + 40 + 4 * i..], e, *v);
            }
            // Entry B: type 3 with ids outside the fixed tables.
            write_f64(&mut image[base + 64..], e, 0.0);
            write_f64(&mut image[base + 72..], e, 64.0);
            for (i, v) in [842, 3, 99, 3, 545, 546].iter().enumerate() {
                write_i32(&mut image[base + 80 + 4 * i..], e, *v);
            }

            // Record 3: two 40-byte name labels.
            let base = 3 * RECORD_SIZE as usize;
            image[base..base + 18].copy_from_slice(b"EARTH TEST SEGMENT");
            image[base + 40..base + 59].copy_from_slice(b"UNSUPPORTED SEGMENT");

            // Record 4: type-2 body. Two records of 14 words each, then the
            // four-double trailer at the end of the word range.
            let mut pos = 4 * RECORD_SIZE as usize;
            for r in 0..2 {
                write_f64(&mut image[pos..], e, 16.0 + 32.0 * r as f64);
                write_f64(&mut image[pos + 8..], e, 16.0);
                pos += 16;
                for axis in 0..3 {
                    for i in 0..4 {
                        let value = (r * 100 + axis * 10 + i + 1) as f64;
                        write_f64(&mut image[pos..], e, value);
                        pos += 8;
                    }
                }
            }
            // Trailer: INIT, INTLEN, RSIZE, N.
            write_f64(&mut image[pos..], e, 0.0);
            write_f64(&mut image[pos + 8..], e, 32.0);
            write_f64(&mut image[pos + 16..], e, self.trailer_record_size);
            write_f64(&mut image[pos + 24..], e, 2.0);

            image
        }
    }
}

#[rstest]
#[case::little(Endian::Little)]
#[case::big(Endian::Big)]
fn decodes_a_synthetic_kernel(#[case] endian: Endian) {
    let image = TestKernel::new(endian).build();
    let kernel = Bsp::from_reader(&mut Cursor::new(image), endian).unwrap();

    assert_eq!(kernel.header().nd, 2);
    assert_eq!(kernel.header().ni, 6);
    assert_eq!(kernel.header().internal_name, "Synthetic kernel for tests");
    assert_eq!(kernel.comments(), "SYNTHETIC KERNEL\nPRODUCED FOR TESTS");
    assert_eq!(kernel.segments().len(), 2);

    let earth = &kernel.segments()[0];
    assert_eq!(earth.name, "EARTH TEST SEGMENT");
    assert_eq!(
        earth.target,
        Body::Known {
            id: 399,
            name: "EARTH"
        }
    );
    assert_eq!(
        earth.center,
        Body::Known {
            id: 3,
            name: "EARTH-MOON BARYCENTER"
        }
    );
    assert_eq!(earth.frame, Frame::Known { id: 1, name: "J2000" });
    assert_eq!(earth.kind, Some(SegmentType::ChebyshevPosition));
    assert_eq!(earth.initial_offset, 4096);
    assert_eq!(earth.final_offset, 4352);

    match &earth.data {
        SegmentData::ChebyshevPosition {
            interval_length,
            records,
        } => {
            assert_relative_eq!(*interval_length, 32.0);
            assert_eq!(records.len(), 2);
            for record in records {
                assert_eq!(record.x.len(), 4);
                assert_eq!(record.y.len(), 4);
                assert_eq!(record.z.len(), 4);
            }
            assert_relative_eq!(records[0].midpoint, 16.0);
            assert_relative_eq!(records[0].radius, 16.0);
            assert_eq!(records[0].x, vec![1.0, 2.0, 3.0, 4.0]);
            assert_eq!(records[0].y, vec![11.0, 12.0, 13.0, 14.0]);
            assert_eq!(records[0].z, vec![21.0, 22.0, 23.0, 24.0]);
            assert_relative_eq!(records[1].midpoint, 48.0);
            assert_eq!(records[1].x, vec![101.0, 102.0, 103.0, 104.0]);
        }
        other => panic!("expected a decoded type-2 body, got {:?}", other),
    }
    assert_eq!(earth.chebyshev_records().unwrap().len(), 2);
}

#[test]
fn unsupported_types_mark_the_segment_without_aborting_the_decode() {
    let image = TestKernel::new(Endian::Little).build();
    let kernel = Bsp::from_reader(&mut Cursor::new(image), Endian::Little).unwrap();

    let other = &kernel.segments()[1];
    assert_eq!(other.name, "UNSUPPORTED SEGMENT");
    assert_eq!(other.kind, Some(SegmentType::ChebyshevPositionVelocity));
    assert_eq!(other.data, SegmentData::Unsupported { type_code: 3 });
    // Identifiers outside the fixed tables pass through unresolved.
    assert_eq!(other.target, Body::Unresolved(842));
    assert_eq!(other.frame, Frame::Unresolved(99));

    let err = other.chebyshev_records().unwrap_err();
    assert!(matches!(err, BspError::UnsupportedSegmentType(3)));
}

#[test]
fn repeated_decodes_of_the_same_bytes_are_equal() {
    let image = TestKernel::new(Endian::Little).build();
    let first = Bsp::from_reader(&mut Cursor::new(image.clone()), Endian::Little).unwrap();
    let second = Bsp::from_reader(&mut Cursor::new(image), Endian::Little).unwrap();
    assert_eq!(first, second);
}

#[test]
fn segment_count_matches_the_catalog() {
    let image = TestKernel::new(Endian::Little).build();
    let kernel = Bsp::from_reader(&mut Cursor::new(image), Endian::Little).unwrap();
    // One segment per (summary entry, name) pair.
    assert_eq!(kernel.segments().len(), 2);
    let pointers = kernel.header();
    assert!(pointers.first_summary_block >= 1);
    assert!(pointers.last_summary_block < pointers.record_count);
}

#[test]
fn a_bad_record_size_fails_the_whole_decode() {
    let mut kernel = TestKernel::new(Endian::Little);
    kernel.trailer_record_size = 15.0; // 15 != 3n + 2 for any n
    let err = Bsp::from_reader(&mut Cursor::new(kernel.build()), Endian::Little).unwrap_err();
    assert!(matches!(err, BspError::RecordSizeMismatch { record_size: 15 }));
}

#[test]
fn a_cyclic_summary_chain_is_rejected() {
    let mut kernel = TestKernel::new(Endian::Little);
    kernel.next_pointer = 3.0; // 1-based pointer back at the same block
    let err = Bsp::from_reader(&mut Cursor::new(kernel.build()), Endian::Little).unwrap_err();
    assert!(matches!(err, BspError::SummaryChainCycle { record: 2 }));
}

#[test]
fn declaring_the_wrong_endianness_fails_before_the_body() {
    let image = TestKernel::new(Endian::Big).build();
    let err = Bsp::from_reader(&mut Cursor::new(image), Endian::Little).unwrap_err();
    assert!(matches!(
        err,
        BspError::EndianMismatch {
            file: Endian::Big,
            expected: Endian::Little,
        }
    ));
}

#[test]
fn opens_a_kernel_from_disk() {
    use std::io::Write;

    let image = TestKernel::new(Endian::Little).build();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&image).unwrap();
    file.flush().unwrap();

    let kernel = Bsp::open(file.path(), Endian::Little).unwrap();
    assert_eq!(kernel.segments().len(), 2);
    assert_eq!(kernel.comments(), "SYNTHETIC KERNEL\nPRODUCED FOR TESTS");
}

#[test]
fn a_missing_file_reports_its_path() {
    let err = Bsp::open("/nonexistent/kernel.bsp", Endian::Little).unwrap_err();
    assert!(matches!(err, BspError::File { .. }));
}
