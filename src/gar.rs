//! The GAR container layer: a magic-prefixed stream of named, obfuscated,
//! zlib-compressed members.
//!
//! Each member is `{filename_len, filename, payload_len, payload}`, and each
//! payload is a 12-byte cleartext header followed by an obfuscated,
//! qCompress-prefixed zlib stream.

use std::collections::HashMap;
use std::io::Read;

use log::{debug, trace, warn};

use crate::bytes::Reader;
use crate::error::{Error, Result};
use crate::obfuscate::deobfuscate;
use crate::prng::XorShift128;

/// `0xCABCAB`, the three magic bytes every GAR blob starts with.
pub const MAGIC: u32 = 0x00CA_BCAB;
/// The only known GAR version byte.
pub const VERSION: u8 = 0x01;

const SUBFILE_HEADER_LEN: usize = 12;
const EXPECTED_HEADER_LENGTH: u16 = 12;
const EXPECTED_MANGLING_METHOD: u16 = 1;

/// The cleartext 12 bytes at the start of every subfile payload. Never
/// obfuscated; everything after it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubfileHeader {
    pub header_length: u16,
    pub mangling_method: u16,
    pub truncated_timestamp: u32,
    pub original_length: u32,
}

impl SubfileHeader {
    fn parse(reader: &mut Reader) -> Result<Self> {
        let offset = reader.offset();
        let header_length = reader.u16_be()?;
        let mangling_method = reader.u16_be()?;
        let truncated_timestamp = reader.u32_be()?;
        let original_length = reader.u32_be()?;

        if header_length != EXPECTED_HEADER_LENGTH {
            return Err(Error::HeaderInvariantViolation {
                offset,
                message: format!("header_length must be 12, found {header_length}"),
            });
        }
        if mangling_method != EXPECTED_MANGLING_METHOD {
            return Err(Error::HeaderInvariantViolation {
                offset,
                message: format!("mangling_method must be 1, found {mangling_method}"),
            });
        }

        Ok(SubfileHeader {
            header_length,
            mangling_method,
            truncated_timestamp,
            original_length,
        })
    }
}

/// Parses a complete GAR blob, returning each member's decoded plaintext
/// keyed by filename. Duplicate filenames: last write wins.
pub fn parse_gar(bytes: &[u8]) -> Result<HashMap<String, Vec<u8>>> {
    let mut reader = Reader::new(bytes);

    let magic_offset = reader.offset();
    let header_word = reader.u32_be()?;
    let magic = header_word >> 8;
    let version = (header_word & 0xff) as u8;
    if magic != MAGIC || version != VERSION {
        return Err(Error::MagicMismatch {
            offset: magic_offset,
            found: header_word,
        });
    }

    let mut members = HashMap::new();
    loop {
        if reader.remaining() < 4 {
            break;
        }

        let filename_offset = reader.offset();
        let filename_len = reader.u32_be()? as usize;
        let filename_bytes = reader.take(filename_len)?;
        let filename = std::str::from_utf8(filename_bytes)
            .map_err(|source| Error::EncodingError {
                offset: filename_offset,
                source,
            })?
            .to_string();

        let payload_len = reader.u32_be()? as usize;
        let payload = reader.take(payload_len)?;

        debug!("GAR member {filename:?}: {payload_len} byte payload at offset {filename_offset}");
        let plaintext = decode_subfile(payload)?;
        trace!("GAR member {filename:?} decoded to {} bytes", plaintext.len());

        if members.insert(filename.clone(), plaintext).is_some() {
            warn!("GAR member {filename:?} appeared more than once; keeping the later copy");
        }
    }

    Ok(members)
}

fn decode_subfile(payload: &[u8]) -> Result<Vec<u8>> {
    let mut reader = Reader::new(payload);
    let header = SubfileHeader::parse(&mut reader)?;

    let mut prng = XorShift128::new(header.truncated_timestamp, header.original_length);
    let obfuscated_tail = reader.take(reader.remaining())?;
    let tail = deobfuscate(obfuscated_tail, &mut prng);

    let mut tail_reader = Reader::new(&tail);
    let qcompress_offset = SUBFILE_HEADER_LEN;
    let expected_length = tail_reader.u32_be()?;
    if expected_length != header.original_length {
        return Err(Error::LengthMismatch {
            offset: qcompress_offset,
            expected: header.original_length,
            actual: expected_length,
        });
    }

    let zlib_stream = tail_reader.take(tail_reader.remaining())?;
    let plaintext = inflate(zlib_stream)?;
    if plaintext.len() as u32 != header.original_length {
        return Err(Error::LengthMismatch {
            offset: qcompress_offset + 4,
            expected: header.original_length,
            actual: plaintext.len() as u32,
        });
    }

    Ok(plaintext)
}

fn inflate(zlib_stream: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = flate2::read::ZlibDecoder::new(zlib_stream);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|err| Error::CompressionError {
            offset: 0,
            message: err.to_string(),
        })?;
    Ok(out)
}
