//! Visual (pass/fail inspection, no measurement) test results.

use crate::bytes::Reader;
use crate::error::Result;

/// `start=0xFD` inspection entry: a named pass/fail check with no
/// instrumented measurement.
pub const START: u8 = 0xFD;

#[derive(Debug, Clone, PartialEq)]
pub struct VisualTestResult {
    pub name: String,
    pub units: String,
    pub value: u16,
    pub flag: bool,
}

impl VisualTestResult {
    pub(crate) fn parse(reader: &mut Reader) -> Result<Self> {
        reader.expect_u8(START)?;
        let name = reader.fixed_str(16)?;
        let units = reader.fixed_str(16)?;
        let value = reader.u16_le()?;
        let flag = reader.u8()? != 0;
        Ok(VisualTestResult {
            name,
            units,
            value,
            flag,
        })
    }
}
