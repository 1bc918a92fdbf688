//! The crate's single error type.
//!
//! Every fallible function in this crate returns [`Result`]. There is no
//! recovery path: a GAR or SSS file either decodes in full or the caller
//! gets one [`Error`] describing the first problem found, with the byte
//! offset at which it was detected.

use std::str::Utf8Error;

use thiserror::Error as ThisError;

/// The offset, in bytes from the start of the blob handed to the decoder,
/// at which the nearest enclosing call started reading.
pub type Offset = usize;

#[derive(Debug, ThisError)]
pub enum Error {
    /// The GAR magic number or version byte did not match.
    #[error("bad magic/version at offset {offset}: found 0x{found:08x}")]
    MagicMismatch { offset: Offset, found: u32 },

    /// A length-prefixed field declared more bytes than remain in the input.
    #[error("truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: Offset,
        needed: usize,
        available: usize,
    },

    /// `header_length != 12` or `mangling_method != 1` in a subfile header.
    #[error("subfile header invariant violated at offset {offset}: {message}")]
    HeaderInvariantViolation { offset: Offset, message: String },

    /// The qCompress prefix or the inflated length disagreed with the
    /// subfile header's declared `original_length`.
    #[error("length mismatch at offset {offset}: expected {expected}, got {actual}")]
    LengthMismatch {
        offset: Offset,
        expected: u32,
        actual: u32,
    },

    /// The zlib/deflate stream failed to inflate.
    #[error("zlib decompression failed at offset {offset}: {message}")]
    CompressionError { offset: Offset, message: String },

    /// A fixed-width string field was not valid UTF-8 after null-trimming.
    #[error("invalid UTF-8 at offset {offset}: {source}")]
    EncodingError {
        offset: Offset,
        #[source]
        source: Utf8Error,
    },

    /// A required sentinel byte (record start, trailing `0xFF`, zero
    /// padding) was missing or wrong.
    #[error("record framing error at offset {offset}: {message}")]
    FramingError { offset: Offset, message: String },

    /// An SSS record's stored checksum was neither the computed sum nor
    /// the computed sum minus one.
    #[error("checksum mismatch at offset {offset}: stored 0x{stored:04x}, computed 0x{computed:04x}")]
    ChecksumMismatch {
        offset: Offset,
        stored: u16,
        computed: u16,
    },

    /// An unrecognized `record_type` or `physical_test_type` tag.
    #[error("unknown variant tag 0x{tag:02x} at offset {offset}")]
    UnknownVariant { offset: Offset, tag: u8 },

    /// The SSS record stream did not end with an `end` (`0xAA`) record.
    #[error("SSS record stream at offset {offset} did not end with an `end` record")]
    MissingTerminator { offset: Offset },

    /// Low-level I/O failure (only reachable if a caller feeds this crate
    /// a `Read` rather than an in-memory slice).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A `scroll` primitive read failed in a way not already covered above.
    #[error("binary read error: {0}")]
    Scroll(#[from] scroll::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
