//! The physical-test tagged union: nine instrumented-measurement subtypes,
//! each with its own fixed layout over [`Float16`] fields and a trailing
//! [`ResultFlags`] byte.

use crate::bytes::Reader;
use crate::error::{Error, Result};

use super::flags::ResultFlags;
use super::float16::Float16;

#[derive(Debug, Clone, PartialEq)]
pub enum PhysicalTestResult {
    EarthResistance {
        resistance_ohm: f64,
        result: ResultFlags,
    },
    Iec {
        resistance_ohm: f64,
        result: ResultFlags,
    },
    Insulation {
        voltage_volt: f64,
        resistance_megaohm: f64,
        result: ResultFlags,
    },
    SubstituteLeakage {
        current_ma: f64,
        result: ResultFlags,
    },
    Polarity {
        result: ResultFlags,
    },
    MainsVoltage {
        voltage_volt: f64,
        result: ResultFlags,
    },
    TouchOrLeakageCurrent {
        load_current_ma: f64,
        unknown: [u8; 2],
        leakage_current_ma: f64,
        result: ResultFlags,
    },
    Rcd {
        test_current_ma: f64,
        cycle_angle_deg: f64,
        trip_time_ms: f64,
        result: ResultFlags,
    },
    StringResult {
        value: [u8; 34],
        result: ResultFlags,
    },
}

impl PhysicalTestResult {
    pub const TAG_EARTH_RESISTANCE: u8 = 0x11;
    pub const TAG_IEC: u8 = 0x16;
    pub const TAG_INSULATION: u8 = 0x20;
    pub const TAG_SUBSTITUTE_LEAKAGE: u8 = 0x83;
    pub const TAG_POLARITY: u8 = 0x91;
    pub const TAG_MAINS_VOLTAGE: u8 = 0x92;
    pub const TAG_TOUCH_OR_LEAKAGE_CURRENT: u8 = 0x96;
    pub const TAG_RCD: u8 = 0x9A;
    pub const TAG_STRING: u8 = 0xFD;

    /// A short name for presentation.
    pub fn type_name(&self) -> &'static str {
        match self {
            PhysicalTestResult::EarthResistance { .. } => "earth_resistance",
            PhysicalTestResult::Iec { .. } => "iec",
            PhysicalTestResult::Insulation { .. } => "insulation",
            PhysicalTestResult::SubstituteLeakage { .. } => "substitute_leakage",
            PhysicalTestResult::Polarity { .. } => "polarity",
            PhysicalTestResult::MainsVoltage { .. } => "mains_voltage",
            PhysicalTestResult::TouchOrLeakageCurrent { .. } => "touch_or_leakage_current",
            PhysicalTestResult::Rcd { .. } => "rcd",
            PhysicalTestResult::StringResult { .. } => "string",
        }
    }

    pub fn result(&self) -> ResultFlags {
        match *self {
            PhysicalTestResult::EarthResistance { result, .. }
            | PhysicalTestResult::Iec { result, .. }
            | PhysicalTestResult::Insulation { result, .. }
            | PhysicalTestResult::SubstituteLeakage { result, .. }
            | PhysicalTestResult::Polarity { result }
            | PhysicalTestResult::MainsVoltage { result, .. }
            | PhysicalTestResult::TouchOrLeakageCurrent { result, .. }
            | PhysicalTestResult::Rcd { result, .. }
            | PhysicalTestResult::StringResult { result, .. } => result,
        }
    }

    pub(crate) fn parse(reader: &mut Reader) -> Result<Self> {
        let offset = reader.offset();
        let tag = reader.u8()?;
        let parsed = match tag {
            Self::TAG_EARTH_RESISTANCE => PhysicalTestResult::EarthResistance {
                resistance_ohm: read_float16(reader)?,
                result: read_flags(reader)?,
            },
            Self::TAG_IEC => PhysicalTestResult::Iec {
                resistance_ohm: read_float16(reader)?,
                result: read_flags(reader)?,
            },
            Self::TAG_INSULATION => PhysicalTestResult::Insulation {
                voltage_volt: read_float16(reader)?,
                resistance_megaohm: read_float16(reader)?,
                result: read_flags(reader)?,
            },
            Self::TAG_SUBSTITUTE_LEAKAGE => PhysicalTestResult::SubstituteLeakage {
                current_ma: read_float16(reader)?,
                result: read_flags(reader)?,
            },
            Self::TAG_POLARITY => PhysicalTestResult::Polarity {
                result: read_flags(reader)?,
            },
            Self::TAG_MAINS_VOLTAGE => PhysicalTestResult::MainsVoltage {
                voltage_volt: read_float16(reader)?,
                result: read_flags(reader)?,
            },
            Self::TAG_TOUCH_OR_LEAKAGE_CURRENT => {
                let load_current_ma = read_float16(reader)?;
                let mut unknown = [0u8; 2];
                unknown.copy_from_slice(reader.take(2)?);
                let leakage_current_ma = read_float16(reader)?;
                PhysicalTestResult::TouchOrLeakageCurrent {
                    load_current_ma,
                    unknown,
                    leakage_current_ma,
                    result: read_flags(reader)?,
                }
            }
            Self::TAG_RCD => PhysicalTestResult::Rcd {
                test_current_ma: read_float16(reader)?,
                cycle_angle_deg: read_float16(reader)?,
                trip_time_ms: read_float16(reader)?,
                result: read_flags(reader)?,
            },
            Self::TAG_STRING => {
                let mut value = [0u8; 34];
                value.copy_from_slice(reader.take(34)?);
                PhysicalTestResult::StringResult {
                    value,
                    result: read_flags(reader)?,
                }
            }
            other => return Err(Error::UnknownVariant { offset, tag: other }),
        };
        Ok(parsed)
    }
}

fn read_float16(reader: &mut Reader) -> Result<f64> {
    Ok(Float16(reader.u16_le()?).value())
}

fn read_flags(reader: &mut Reader) -> Result<ResultFlags> {
    Ok(ResultFlags::from_byte(reader.u8()?))
}
