//! Additive/subtractive byte obfuscation keyed by [`XorShift128`].
//!
//! GAR perturbs each subfile's qCompress-prefixed zlib stream with the low
//! byte of a per-member PRNG stream: `deobfuscate` subtracts it back out,
//! `obfuscate` (the dual, used only by tests and by a hypothetical encoder)
//! adds it in. Both walk the PRNG exactly once per input byte, left to
//! right, so the same generator threads across the qCompress prefix and the
//! zlib stream that follows it as one continuous sequence.

use crate::prng::XorShift128;

/// Subtracts the PRNG's low byte from each input byte, wrapping mod 256.
pub fn deobfuscate(input: &[u8], prng: &mut XorShift128) -> Vec<u8> {
    input
        .iter()
        .map(|&byte| byte.wrapping_sub(prng.next_byte()))
        .collect()
}

/// Adds the PRNG's low byte to each input byte, wrapping mod 256. The dual
/// of [`deobfuscate`]: `obfuscate(deobfuscate(x, seed), seed) == x` for any
/// `seed`, since addition and subtraction mod 256 with the same operand
/// cancel regardless of order.
pub fn obfuscate(input: &[u8], prng: &mut XorShift128) -> Vec<u8> {
    input
        .iter()
        .map(|&byte| byte.wrapping_add(prng.next_byte()))
        .collect()
}
