//! Bit and two-bit symbol access over byte buffers.
//!
//! Every packed buffer in the crate goes through these helpers; no other module
//! computes byte offsets or masks by hand.

#[inline]
const fn calculate_bit_position(bit_index: usize) -> (usize, u8) {
    (bit_index >> 3, 1 << (bit_index & 0x07))
}

/// Number of bytes needed to hold `bits` bits.
#[inline]
#[must_use]
pub const fn bytes_for_bits(bits: usize) -> usize {
    bits.div_ceil(8)
}

/// Test if a bit is set at the given index
#[inline]
#[must_use]
pub fn test_bit(bitmap: &[u8], bit_index: usize) -> bool {
    let (byte_index, bit_mask) = calculate_bit_position(bit_index);
    (bitmap[byte_index] & bit_mask) != 0
}

/// Set a bit to 1 at the given index
#[inline]
pub fn set_bit(bitmap: &mut [u8], bit_index: usize) {
    let (byte_index, bit_mask) = calculate_bit_position(bit_index);
    bitmap[byte_index] |= bit_mask;
}

/// Clear a bit (set it to 0) at the given index
#[inline]
pub fn clear_bit(bitmap: &mut [u8], bit_index: usize) {
    let (byte_index, bit_mask) = calculate_bit_position(bit_index);
    bitmap[byte_index] &= !bit_mask;
}

/// Read the two-bit symbol stored for position `index`.
///
/// The first stored bit (at `2 * index`) is the high bit of the returned code,
/// so A=0, C=1, G=2, T=3 under the nucleotide encoding.
#[inline]
#[must_use]
pub fn read_symbol(bitmap: &[u8], index: usize) -> u8 {
    let bit_index = index * 2;
    (u8::from(test_bit(bitmap, bit_index)) << 1) | u8::from(test_bit(bitmap, bit_index + 1))
}

/// Write a two-bit symbol at position `index`, replacing whatever was there.
#[inline]
pub fn write_symbol(bitmap: &mut [u8], index: usize, code: u8) {
    let bit_index = index * 2;
    if code & 0b10 != 0 {
        set_bit(bitmap, bit_index);
    } else {
        clear_bit(bitmap, bit_index);
    }
    if code & 0b01 != 0 {
        set_bit(bitmap, bit_index + 1);
    } else {
        clear_bit(bitmap, bit_index + 1);
    }
}

/// True when the two stored bits of symbol `index` differ (C or G).
#[inline]
#[must_use]
pub fn symbol_bits_differ(bitmap: &[u8], index: usize) -> bool {
    let bit_index = index * 2;
    test_bit(bitmap, bit_index) != test_bit(bitmap, bit_index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_bit_position() {
        assert_eq!(calculate_bit_position(0), (0, 1));
        assert_eq!(calculate_bit_position(7), (0, 128));
        assert_eq!(calculate_bit_position(8), (1, 1));
        assert_eq!(calculate_bit_position(16), (2, 1));
    }

    #[test]
    fn test_bytes_for_bits() {
        assert_eq!(bytes_for_bits(0), 0);
        assert_eq!(bytes_for_bits(1), 1);
        assert_eq!(bytes_for_bits(8), 1);
        assert_eq!(bytes_for_bits(9), 2);
    }

    #[test]
    fn test_set_and_clear_bit() {
        let mut bitmap = [0u8; 2];

        set_bit(&mut bitmap, 0);
        set_bit(&mut bitmap, 3);
        set_bit(&mut bitmap, 8);
        assert_eq!(bitmap, [0b0000_1001, 0b0000_0001]);

        clear_bit(&mut bitmap, 3);
        assert_eq!(bitmap[0], 0b0000_0001);
        assert!(test_bit(&bitmap, 8));
        assert!(!test_bit(&bitmap, 9));
    }

    #[test]
    fn test_symbol_round_trip_every_code() {
        let mut bitmap = [0u8; 2];
        for index in 0..8 {
            for code in 0..4 {
                write_symbol(&mut bitmap, index, code);
                assert_eq!(read_symbol(&bitmap, index), code);
            }
        }
    }

    #[test]
    fn test_write_symbol_leaves_neighbours_alone() {
        let mut bitmap = [0xFFu8; 1];
        write_symbol(&mut bitmap, 1, 0);
        assert_eq!(read_symbol(&bitmap, 0), 3);
        assert_eq!(read_symbol(&bitmap, 1), 0);
        assert_eq!(read_symbol(&bitmap, 2), 3);
        assert_eq!(bitmap[0], 0b1111_0011);
    }

    #[test]
    fn test_symbol_bits_differ() {
        let mut bitmap = [0u8; 1];
        for (index, code) in [0u8, 1, 2, 3].into_iter().enumerate() {
            write_symbol(&mut bitmap, index, code);
        }
        assert!(!symbol_bits_differ(&bitmap, 0));
        assert!(symbol_bits_differ(&bitmap, 1));
        assert!(symbol_bits_differ(&bitmap, 2));
        assert!(!symbol_bits_differ(&bitmap, 3));
    }
}
