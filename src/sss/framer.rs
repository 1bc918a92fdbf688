//! The SSS record framer: a length-prefixed, checksum-validated stream of
//! tagged records, terminated by an `end` record.
//!
//! A `construct`-style grammar (`start=Const, length=Int16ul,
//! checksum=Int16ul, ..., end=Const`), translated into a `match`-driven
//! reader in the same header-then-body style used elsewhere in this crate
//! for length-prefixed records.

use log::{trace, warn};

use crate::bytes::Reader;
use crate::error::{Error, Result};

use super::body::{MachineInfoRecord, TestRecord};

const RECORD_START: u8 = 0x54;
const RECORD_END: u8 = 0xFF;

const RECORD_TYPE_TEST: u8 = 0x01;
const RECORD_TYPE_MACHINE_INFO: u8 = 0x55;
const RECORD_TYPE_END: u8 = 0xAA;

/// One parsed SSS record.
#[derive(Debug, Clone, PartialEq)]
pub enum SssRecord {
    MachineInfo(MachineInfoRecord),
    Test(TestRecord),
    End,
}

/// Parses the full plaintext of a `TestResults.sss` member into its
/// sequence of records. Stops at (and requires) the first `end` record.
pub fn parse_sss(bytes: &[u8]) -> Result<Vec<SssRecord>> {
    let mut reader = Reader::new(bytes);
    let mut records = Vec::new();

    while !reader.is_empty() {
        let record = parse_record(&mut reader)?;
        let is_end = matches!(record, SssRecord::End);
        records.push(record);
        if is_end {
            break;
        }
    }

    match records.last() {
        Some(SssRecord::End) => Ok(records),
        _ => Err(Error::MissingTerminator {
            offset: reader.offset(),
        }),
    }
}

fn parse_record(reader: &mut Reader) -> Result<SssRecord> {
    let record_offset = reader.offset();
    reader.expect_u8(RECORD_START)?;
    let length = reader.u16_le()? as usize;
    let stored_checksum = reader.u16_le()?;
    reader.expect_bytes(&[0x00, 0x00])?;

    if length < 2 {
        return Err(Error::FramingError {
            offset: record_offset,
            message: format!(
                "record length {length} is too small to cover record_type and trailing 0xFF"
            ),
        });
    }

    let checksum_region_offset = reader.offset();
    let region = reader.take(length)?;

    let computed = checksum(region);
    if stored_checksum != computed && stored_checksum != computed.wrapping_sub(1) {
        return Err(Error::ChecksumMismatch {
            offset: checksum_region_offset,
            stored: stored_checksum,
            computed,
        });
    }
    if stored_checksum != computed {
        warn!(
            "SSS record at offset {record_offset}: checksum off by one (stored 0x{stored_checksum:04x}, computed 0x{computed:04x}); tolerating known firmware quirk"
        );
    }

    let trailing = region[length - 1];
    if trailing != RECORD_END {
        return Err(Error::FramingError {
            offset: checksum_region_offset + length - 1,
            message: format!("expected trailing 0x{RECORD_END:02x}, found 0x{trailing:02x}"),
        });
    }

    let record_type = region[0];
    let body = &region[1..length - 1];
    let mut body_reader = Reader::new(body);

    trace!("SSS record type 0x{record_type:02x} at offset {record_offset}, {} body bytes", body.len());

    let record = match record_type {
        RECORD_TYPE_TEST => SssRecord::Test(TestRecord::parse(&mut body_reader)?),
        RECORD_TYPE_MACHINE_INFO => {
            SssRecord::MachineInfo(MachineInfoRecord::parse(&mut body_reader)?)
        }
        RECORD_TYPE_END => SssRecord::End,
        other => {
            return Err(Error::UnknownVariant {
                offset: checksum_region_offset,
                tag: other,
            })
        }
    };

    Ok(record)
}

/// Unsigned 16-bit sum, mod 2^16, of `record_type..=trailing_0xFF`.
fn checksum(region: &[u8]) -> u16 {
    let sum: u32 = region.iter().map(|&b| b as u32).sum();
    (sum & 0xFFFF) as u16
}
