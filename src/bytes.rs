//! Offset-tracked byte primitives shared by the GAR and SSS decoders.
//!
//! Every fixed-width read goes through [`Reader`] so that truncation is
//! always reported with the offset at which it was detected (per
//! [`crate::error::Error::Truncated`]), the same discipline `scroll`-based
//! readers apply via `gread_with`.

use scroll::{Pread, BE, LE};

use crate::error::{Error, Result};

/// A forward-only cursor over a borrowed byte slice.
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn require(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            Err(Error::Truncated {
                offset: self.offset,
                needed: n,
                available: self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    /// Consumes and returns the next `n` bytes verbatim.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.require(n)?;
        let slice = &self.bytes[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    /// Looks at the next byte without consuming it. Errs if at EOF.
    pub fn peek_u8(&self) -> Result<u8> {
        self.require(1)?;
        Ok(self.bytes[self.offset])
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn u16_be(&mut self) -> Result<u16> {
        self.require(2)?;
        let v = self
            .bytes
            .gread_with::<u16>(&mut self.offset, BE)
            .map_err(Error::from)?;
        Ok(v)
    }

    pub fn u16_le(&mut self) -> Result<u16> {
        self.require(2)?;
        let v = self
            .bytes
            .gread_with::<u16>(&mut self.offset, LE)
            .map_err(Error::from)?;
        Ok(v)
    }

    pub fn u32_be(&mut self) -> Result<u32> {
        self.require(4)?;
        let v = self
            .bytes
            .gread_with::<u32>(&mut self.offset, BE)
            .map_err(Error::from)?;
        Ok(v)
    }

    /// Asserts the next byte equals `want`, consuming it.
    pub fn expect_u8(&mut self, want: u8) -> Result<()> {
        let offset = self.offset;
        let got = self.u8()?;
        if got != want {
            return Err(Error::FramingError {
                offset,
                message: format!("expected byte 0x{want:02x}, found 0x{got:02x}"),
            });
        }
        Ok(())
    }

    /// Asserts the next `want.len()` bytes equal `want`, consuming them.
    pub fn expect_bytes(&mut self, want: &[u8]) -> Result<()> {
        let offset = self.offset;
        let got = self.take(want.len())?;
        if got != want {
            return Err(Error::FramingError {
                offset,
                message: format!("expected bytes {want:02x?}, found {got:02x?}"),
            });
        }
        Ok(())
    }

    /// Reads a fixed-width, null-padded UTF-8 string: consumes exactly
    /// `len` bytes, trims trailing `0x00`, decodes the rest.
    pub fn fixed_str(&mut self, len: usize) -> Result<String> {
        let offset = self.offset;
        let raw = self.take(len)?;
        let trimmed = trim_trailing_nulls(raw);
        std::str::from_utf8(trimmed)
            .map(str::to_owned)
            .map_err(|source| Error::EncodingError { offset, source })
    }

    /// Reads a `u8`-length-prefixed opaque byte blob (used by `test_config`).
    pub fn length_prefixed_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.u8()? as usize;
        self.take(len)
    }
}

fn trim_trailing_nulls(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map(|i| i + 1)
        .unwrap_or(0);
    &bytes[..end]
}
