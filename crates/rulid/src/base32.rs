//! Bit-exact Crockford Base32 codec for 128-bit identifiers.
//!
//! 26 symbols of 5 bits carry 130 bits, so the first symbol only ever uses
//! its low 3 bits. Both directions are unrolled bit-slices over the 16 input
//! bytes.

use crate::{Error, Result};

/// The Crockford Base32 alphabet (no `I`, `L`, `O` or `U`).
pub const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Length of a text-encoded identifier.
pub const ENCODED_LEN: usize = 26;

/// Length of a binary identifier.
pub const BINARY_LEN: usize = 16;

/// Sentinel marking bytes outside the alphabet in [`LOOKUP`].
const NO_VALUE: u8 = 0xFF;

/// Byte-to-symbol table. Lower-case letters map like their upper-case
/// counterparts; everything else is [`NO_VALUE`].
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    while i < 32 {
        let c = ALPHABET[i as usize];
        lut[c as usize] = i;
        if c.is_ascii_uppercase() {
            lut[c.to_ascii_lowercase() as usize] = i;
        }
        i += 1;
    }
    lut
};

#[inline(always)]
#[allow(clippy::inline_always)]
const fn sym(v: u8) -> u8 {
    ALPHABET[(v & 0x1F) as usize]
}

/// Encodes 16 bytes into 26 upper-case Base32 symbols.
///
/// The first two symbols carry the top byte (3 + 5 bits); from there each
/// group of 5 bytes maps onto 8 symbols.
#[must_use]
pub const fn encode(id: &[u8; BINARY_LEN]) -> [u8; ENCODED_LEN] {
    [
        // 48-bit timestamp
        sym(id[0] >> 5),
        sym(id[0]),
        sym(id[1] >> 3),
        sym((id[1] << 2) | (id[2] >> 6)),
        sym(id[2] >> 1),
        sym((id[2] << 4) | (id[3] >> 4)),
        sym((id[3] << 1) | (id[4] >> 7)),
        sym(id[4] >> 2),
        sym((id[4] << 3) | (id[5] >> 5)),
        sym(id[5]),
        // 80-bit entropy
        sym(id[6] >> 3),
        sym((id[6] << 2) | (id[7] >> 6)),
        sym(id[7] >> 1),
        sym((id[7] << 4) | (id[8] >> 4)),
        sym((id[8] << 1) | (id[9] >> 7)),
        sym(id[9] >> 2),
        sym((id[9] << 3) | (id[10] >> 5)),
        sym(id[10]),
        sym(id[11] >> 3),
        sym((id[11] << 2) | (id[12] >> 6)),
        sym(id[12] >> 1),
        sym((id[12] << 4) | (id[13] >> 4)),
        sym((id[13] << 1) | (id[14] >> 7)),
        sym(id[14] >> 2),
        sym((id[14] << 3) | (id[15] >> 5)),
        sym(id[15]),
    ]
}

/// Decodes 26 Base32 symbols into 16 bytes.
///
/// # Errors
///
/// - [`Error::DataSize`] if `text` is not exactly 26 bytes long.
/// - [`Error::InvalidCharacters`] in `strict` mode when a byte is not part
///   of the alphabet (case-insensitive).
/// - [`Error::Overflow`] if the first symbol is larger than 7, in either
///   mode.
///
/// Without `strict`, bytes outside the alphabet are not rejected: their
/// sentinel value flows through the bit-slice and corrupts neighbouring
/// bits, yielding an undefined (but still 128-bit) identifier.
pub fn decode(text: &[u8], strict: bool) -> Result<[u8; BINARY_LEN]> {
    let v: &[u8; ENCODED_LEN] = text.try_into().map_err(|_| Error::DataSize {
        expected: ENCODED_LEN,
        actual: text.len(),
    })?;

    if strict {
        if let Some(index) = v.iter().position(|&b| LOOKUP[b as usize] == NO_VALUE) {
            return Err(Error::InvalidCharacters {
                byte: v[index],
                index,
            });
        }
    }

    let d: [u8; ENCODED_LEN] = core::array::from_fn(|i| LOOKUP[v[i] as usize]);

    // 130 encoded bits vs 128 payload bits: the top two bits of the first
    // symbol must be clear.
    if d[0] > 7 {
        return Err(Error::Overflow);
    }

    Ok([
        // 6 bytes timestamp
        (d[0] << 5) | d[1],
        (d[2] << 3) | (d[3] >> 2),
        (d[3] << 6) | (d[4] << 1) | (d[5] >> 4),
        (d[5] << 4) | (d[6] >> 1),
        (d[6] << 7) | (d[7] << 2) | (d[8] >> 3),
        (d[8] << 5) | d[9],
        // 10 bytes entropy
        (d[10] << 3) | (d[11] >> 2),
        (d[11] << 6) | (d[12] << 1) | (d[13] >> 4),
        (d[13] << 4) | (d[14] >> 1),
        (d[14] << 7) | (d[15] << 2) | (d[16] >> 3),
        (d[16] << 5) | d[17],
        (d[18] << 3) | (d[19] >> 2),
        (d[19] << 6) | (d[20] << 1) | (d[21] >> 4),
        (d[21] << 4) | (d[22] >> 1),
        (d[22] << 7) | (d[23] << 2) | (d[24] >> 3),
        (d[24] << 5) | d[25],
    ])
}
