//! Fixed-layout bodies for the `machine_info` and `test` record types.

use crate::bytes::Reader;
use crate::error::Result;

use super::flags::ResultFlags;
use super::physical::PhysicalTestResult;
use super::visual::VisualTestResult;

/// `record_type = 0x55`: identifies the instrument that produced the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineInfoRecord {
    pub machine: String,
    pub serial: String,
}

impl MachineInfoRecord {
    pub(crate) fn parse(reader: &mut Reader) -> Result<Self> {
        let machine = reader.fixed_str(20)?;
        let serial = reader.fixed_str(20)?;
        Ok(MachineInfoRecord { machine, serial })
    }
}

/// `record_type = 0x01`: one appliance test, its metadata, and its results.
#[derive(Debug, Clone, PartialEq)]
pub struct TestRecord {
    pub result_flags: ResultFlags,
    pub id: String,
    pub venue: String,
    pub location: String,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
    pub user: String,
    pub comments: String,
    pub full_retest_period_months: u8,
    pub test_type: String,
    pub visual_retest_period_months: u8,
    /// 15 bytes observed almost always zero; meaning unknown, preserved
    /// verbatim (see open questions in DESIGN.md).
    pub unknown_padding: [u8; 15],
    /// Opaque device configuration blob; preserved verbatim.
    pub test_config: Vec<u8>,
    pub visual_test_results: Vec<VisualTestResult>,
    pub physical_test_results: Vec<PhysicalTestResult>,
}

const ZERO_PADDING_LEN: usize = 64;
const AFTER_RETEST_PADDING_LEN: usize = 15;

impl TestRecord {
    pub(crate) fn parse(reader: &mut Reader) -> Result<Self> {
        let result_flags = ResultFlags::from_byte(reader.u8()?);
        let id = reader.fixed_str(16)?;
        reader.take(ZERO_PADDING_LEN)?;
        let venue = reader.fixed_str(16)?;
        let location = reader.fixed_str(16)?;
        let hour = reader.u8()?;
        let minute = reader.u8()?;
        let second = reader.u8()?;
        let day = reader.u8()?;
        let month = reader.u8()?;
        let year = reader.u16_le()?;
        let user = reader.fixed_str(16)?;
        let comments = reader.fixed_str(128)?;
        reader.expect_u8(0x02)?;
        let full_retest_period_months = reader.u8()?;
        let test_type = reader.fixed_str(30)?;
        let visual_retest_period_months = reader.u8()?;

        let mut unknown_padding = [0u8; AFTER_RETEST_PADDING_LEN];
        unknown_padding.copy_from_slice(reader.take(AFTER_RETEST_PADDING_LEN)?);

        let test_config = reader.length_prefixed_bytes()?.to_vec();
        reader.expect_u8(0xFE)?;

        let mut visual_test_results = Vec::new();
        while reader.peek_u8().map(|b| b == super::visual::START).unwrap_or(false) {
            visual_test_results.push(VisualTestResult::parse(reader)?);
        }

        let mut physical_test_results = Vec::new();
        while !reader.is_empty() {
            physical_test_results.push(PhysicalTestResult::parse(reader)?);
        }

        Ok(TestRecord {
            result_flags,
            id,
            venue,
            location,
            hour,
            minute,
            second,
            day,
            month,
            year,
            user,
            comments,
            full_retest_period_months,
            test_type,
            visual_retest_period_months,
            unknown_padding,
            test_config,
            visual_test_results,
            physical_test_results,
        })
    }
}
