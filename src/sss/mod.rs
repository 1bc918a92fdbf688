//! The SSS record layer: parses the plaintext of a GAR member named
//! `TestResults.sss` into a sequence of tagged, checksummed records.

mod body;
mod flags;
mod float16;
mod framer;
mod physical;
mod visual;

pub use body::{MachineInfoRecord, TestRecord};
pub use flags::ResultFlags;
pub use float16::Float16;
pub use framer::{parse_sss, SssRecord};
pub use physical::PhysicalTestResult;
pub use visual::VisualTestResult;
