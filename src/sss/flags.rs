//! The 8-bit `ResultFlags` bitfield shared by visual and physical test
//! results.

/// Per-measurement pass/fail/comparator bitfield. Bit layout, MSB to LSB:
/// `unknown1, unknown2, greater_than, less_than, unknown3, unknown4, fail,
/// pass`. `pass` and `fail` may both be set; see [`crate::assemble`] for how
/// that ambiguity is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultFlags {
    pub unknown1: bool,
    pub unknown2: bool,
    pub greater_than: bool,
    pub less_than: bool,
    pub unknown3: bool,
    pub unknown4: bool,
    pub fail: bool,
    pub pass: bool,
    /// The byte as read off the wire, preserved verbatim.
    pub raw: u8,
}

impl ResultFlags {
    pub(crate) fn from_byte(raw: u8) -> Self {
        ResultFlags {
            unknown1: raw & 0b1000_0000 != 0,
            unknown2: raw & 0b0100_0000 != 0,
            greater_than: raw & 0b0010_0000 != 0,
            less_than: raw & 0b0001_0000 != 0,
            unknown3: raw & 0b0000_1000 != 0,
            unknown4: raw & 0b0000_0100 != 0,
            fail: raw & 0b0000_0010 != 0,
            pass: raw & 0b0000_0001 != 0,
            raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_pass_bit() {
        let flags = ResultFlags::from_byte(0b0000_0001);
        assert!(flags.pass);
        assert!(!flags.fail);
    }

    #[test]
    fn pass_and_fail_can_both_be_set() {
        let flags = ResultFlags::from_byte(0b0000_0011);
        assert!(flags.pass);
        assert!(flags.fail);
    }

    #[test]
    fn unknown_bits_are_preserved_uninterpreted() {
        let flags = ResultFlags::from_byte(0b1100_0000);
        assert!(flags.unknown1);
        assert!(flags.unknown2);
        assert_eq!(flags.raw, 0b1100_0000);
    }
}
