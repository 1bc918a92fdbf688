//! A reader for Seaward's "GAR" container format and the "SSS" PAT
//! (Portable Appliance Test) result file it typically carries.
//!
//! Two independent layers, composed by [`get_results`]:
//!
//! - [`gar`] walks the outer container and yields each member's decoded
//!   plaintext, keyed by filename.
//! - [`sss`] reads the plaintext of the `TestResults.sss` member as a
//!   checksummed stream of tagged records.
//!
//! [`assemble`] projects the parsed `test` records into [`assemble::TestResultView`],
//! the shape a caller actually wants to display. Everything else GAR members
//! typically carry (JPEG images of the tested appliances) is returned
//! untouched.
//!
//! This crate performs no I/O: every entry point is a pure function from an
//! in-memory byte slice to a parsed structure or an [`error::Error`]. Reading
//! a `.gar` file from disk, or rendering the result, is left to the
//! embedding binary.

pub mod assemble;
pub mod bytes;
pub mod error;
pub mod gar;
pub mod obfuscate;
pub mod prng;
pub mod sss;

use std::collections::HashMap;

pub use assemble::TestResultView;
pub use error::{Error, Result};
pub use gar::parse_gar;
pub use sss::{parse_sss, SssRecord};

/// The GAR member name conventionally holding the SSS record stream.
pub const SSS_MEMBER_NAME: &str = "TestResults.sss";

/// The result of fully decoding a GAR blob: assembled test results plus
/// whatever other members (typically JPEG photos) the archive carried.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedArchive {
    pub results: Vec<TestResultView>,
    pub images: HashMap<String, Vec<u8>>,
}

/// Decodes a GAR blob, extracts and decodes `TestResults.sss` if present,
/// and assembles its `test` records into [`TestResultView`]s. Every other
/// GAR member is returned verbatim in `images`.
pub fn get_results(bytes: &[u8]) -> Result<DecodedArchive> {
    let mut members = parse_gar(bytes)?;

    let results = match members.remove(SSS_MEMBER_NAME) {
        Some(sss_bytes) => {
            let records = parse_sss(&sss_bytes)?;
            records
                .iter()
                .filter_map(|record| match record {
                    SssRecord::Test(test) => Some(assemble::assemble(test)),
                    SssRecord::MachineInfo(_) | SssRecord::End => None,
                })
                .collect()
        }
        None => {
            log::warn!("GAR archive has no {SSS_MEMBER_NAME:?} member; returning no test results");
            Vec::new()
        }
    };

    Ok(DecodedArchive {
        results,
        images: members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_member(filename: &str, plaintext: &[u8], timestamp: u32) -> Vec<u8> {
        let mut zlib_stream = Vec::new();
        {
            let mut encoder = flate2::write::ZlibEncoder::new(
                &mut zlib_stream,
                flate2::Compression::default(),
            );
            encoder.write_all(plaintext).unwrap();
            encoder.finish().unwrap();
        }

        let original_length = plaintext.len() as u32;
        let mut tail = Vec::new();
        tail.extend_from_slice(&original_length.to_be_bytes());
        tail.extend_from_slice(&zlib_stream);

        let mut prng = prng::XorShift128::new(timestamp, original_length);
        let obfuscated_tail = obfuscate::obfuscate(&tail, &mut prng);

        let mut payload = Vec::new();
        payload.extend_from_slice(&12u16.to_be_bytes());
        payload.extend_from_slice(&1u16.to_be_bytes());
        payload.extend_from_slice(&timestamp.to_be_bytes());
        payload.extend_from_slice(&original_length.to_be_bytes());
        payload.extend_from_slice(&obfuscated_tail);

        let mut record = Vec::new();
        record.extend_from_slice(&(filename.len() as u32).to_be_bytes());
        record.extend_from_slice(filename.as_bytes());
        record.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        record.extend_from_slice(&payload);
        record
    }

    fn wrap_sss_record(record_type: u8, body: &[u8]) -> Vec<u8> {
        let mut region = vec![record_type];
        region.extend_from_slice(body);
        region.push(0xFF);
        let checksum: u32 = region.iter().map(|&b| b as u32).sum();
        let checksum = (checksum & 0xFFFF) as u16;

        let mut record = vec![0x54u8];
        record.extend_from_slice(&(region.len() as u16).to_le_bytes());
        record.extend_from_slice(&checksum.to_le_bytes());
        record.extend_from_slice(&[0x00, 0x00]);
        record.extend_from_slice(&region);
        record
    }

    fn minimal_sss() -> Vec<u8> {
        wrap_sss_record(0xAA, &[])
    }

    #[test]
    fn get_results_with_no_sss_member_returns_empty_results() {
        let mut blob = vec![0xCA, 0xBC, 0xAB, 0x01];
        blob.extend_from_slice(&build_member("photo.jpg", b"\xff\xd8\xff", 1));

        let decoded = get_results(&blob).unwrap();
        assert!(decoded.results.is_empty());
        assert_eq!(decoded.images.len(), 1);
        assert!(decoded.images.contains_key("photo.jpg"));
    }

    #[test]
    fn get_results_separates_sss_from_images() {
        let sss_plaintext = minimal_sss();
        let mut blob = vec![0xCA, 0xBC, 0xAB, 0x01];
        blob.extend_from_slice(&build_member(SSS_MEMBER_NAME, &sss_plaintext, 7));
        blob.extend_from_slice(&build_member("photo.jpg", b"\xff\xd8\xff", 8));

        let decoded = get_results(&blob).unwrap();
        assert!(decoded.results.is_empty()); // only an `end` record, no tests
        assert_eq!(decoded.images.len(), 1);
        assert!(!decoded.images.contains_key(SSS_MEMBER_NAME));
        assert!(decoded.images.contains_key("photo.jpg"));
    }
}
