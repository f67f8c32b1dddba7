//! Sequence encoding and positional predicates.
//!
//! DNA is stored two bits per base plus a one-bit ambiguity map:
//! - A (adenine): 00
//! - C (cytosine): 01
//! - G (guanine): 10
//! - T/U (thymine/uracil): 11
//!
//! Anything else is stored as T and flagged in the ambiguity map, so counting
//! code downstream treats it exactly like a T. G and C are the only codes whose
//! two bits differ, which makes [`PackedSequence::is_gc`] a single comparison.
//!
//! ## Modules
//!
//! - [`encoded`]: forward strand plus its reverse complement
//! - [`processing`]: GC frame plot and background word frequencies
//!
//! ## Examples
//!
//! ```rust
//! use prokseq_core::sequence::PackedSequence;
//!
//! let packed = PackedSequence::from_ascii(b"ATGC")?;
//!
//! assert!(packed.is_a(0));
//! assert!(packed.is_gc(3));
//! assert_eq!(packed.reverse_complement().to_ascii(), b"GCAT");
//! # Ok::<(), prokseq_core::types::SequenceError>(())
//! ```

use log::{debug, warn};
use wide::CmpEq;
use wide::u8x32;

use crate::bitmap::{self, read_symbol, set_bit, symbol_bits_differ, test_bit, write_symbol};
use crate::constants::{CHUNK_SIZE, CODON_LENGTH, MAX_SEQUENCE_LENGTH, NUCLEOTIDE_LETTERS};
use crate::types::{Nucleotide, SequenceError};

pub mod encoded;
pub mod processing;

pub use processing::*;

const AMBIGUOUS_CODE: u8 = Nucleotide::T as u8;

/// Converts nucleotide character to 2-bit encoding.
///
/// # Returns
///
/// A value 0-3 for valid nucleotides, 4 for anything else.
///
/// # Examples
///
/// ```rust
/// use prokseq_core::sequence::char_to_nuc;
///
/// assert_eq!(char_to_nuc(b'a'), 0);
/// assert_eq!(char_to_nuc(b'C'), 1);
/// assert_eq!(char_to_nuc(b'G'), 2);
/// assert_eq!(char_to_nuc(b'u'), 3);
/// assert_eq!(char_to_nuc(b'N'), 4);
/// ```
#[must_use]
pub const fn char_to_nuc(c: u8) -> u8 {
    match c.to_ascii_uppercase() {
        b'A' => 0,
        b'C' => 1,
        b'G' => 2,
        b'T' | b'U' => 3,
        _ => 4,
    }
}

/// Encode one input symbol as `(bit0, bit1, ambiguous)`.
///
/// Non-ACGT/U symbols resolve to the T encoding with the ambiguity flag set.
///
/// ```rust
/// use prokseq_core::sequence::encode_base;
///
/// assert_eq!(encode_base(b'G'), (true, false, false));
/// assert_eq!(encode_base(b'n'), (true, true, true));
/// ```
#[must_use]
pub const fn encode_base(base: u8) -> (bool, bool, bool) {
    let (code, ambiguous) = match char_to_nuc(base) {
        4 => (AMBIGUOUS_CODE, true),
        code => (code, false),
    };
    (code & 0b10 != 0, code & 0b01 != 0, ambiguous)
}

/// Mutable construction stage of a [`PackedSequence`].
///
/// Bases are appended here and the result is frozen with
/// [`PackedSequenceBuilder::finish`]; a finished sequence cannot be modified.
///
/// # Examples
///
/// ```rust
/// use prokseq_core::sequence::PackedSequenceBuilder;
///
/// let mut builder = PackedSequenceBuilder::new(1_000);
/// builder.extend_from_ascii(b"ATGAAA")?;
/// builder.push_gap(8)?;
/// builder.extend_from_ascii(b"TAG")?;
///
/// let packed = builder.finish();
/// assert_eq!(packed.len(), 17);
/// assert!(packed.is_ambiguous(6));
/// # Ok::<(), prokseq_core::types::SequenceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PackedSequenceBuilder {
    bits: Vec<u8>,
    ambiguity: Vec<u8>,
    len: usize,
    gc_count: usize,
    ambiguous_count: usize,
    maximum: usize,
}

impl PackedSequenceBuilder {
    /// Start an empty sequence that may grow up to `maximum` bases.
    #[must_use]
    pub const fn new(maximum: usize) -> Self {
        Self {
            bits: Vec::new(),
            ambiguity: Vec::new(),
            len: 0,
            gc_count: 0,
            ambiguous_count: 0,
            maximum,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn grow(&mut self, additional: usize) -> Result<usize, SequenceError> {
        let new_len = self.len.saturating_add(additional);
        if new_len > self.maximum {
            return Err(SequenceError::CapacityExceeded {
                length: new_len,
                maximum: self.maximum,
            });
        }
        self.bits.resize(bitmap::bytes_for_bits(new_len * 2), 0);
        self.ambiguity.resize(bitmap::bytes_for_bits(new_len), 0);
        let start = self.len;
        self.len = new_len;
        Ok(start)
    }

    fn store(&mut self, position: usize, code: u8, ambiguous: bool) {
        write_symbol(&mut self.bits, position, code);
        if ambiguous {
            set_bit(&mut self.ambiguity, position);
            self.ambiguous_count += 1;
        }
    }

    /// Append one input symbol.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::CapacityExceeded`] if the sequence is full.
    pub fn push(&mut self, base: u8) -> Result<(), SequenceError> {
        let position = self.grow(1)?;
        match char_to_nuc(base) {
            4 => self.store(position, AMBIGUOUS_CODE, true),
            code => {
                if Nucleotide::from_code(code).is_gc() {
                    self.gc_count += 1;
                }
                self.store(position, code, false);
            }
        }
        Ok(())
    }

    /// Append a run of ambiguity-flagged placeholder bases.
    ///
    /// Used between concatenated records so that no codon spans two of them.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::CapacityExceeded`] if the run does not fit.
    pub fn push_gap(&mut self, width: usize) -> Result<(), SequenceError> {
        let start = self.grow(width)?;
        for position in start..start + width {
            self.store(position, AMBIGUOUS_CODE, true);
        }
        Ok(())
    }

    /// Append raw sequence bytes, 32 at a time through `wide`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::CapacityExceeded`] before writing anything if
    /// the bytes do not fit.
    pub fn extend_from_ascii(&mut self, sequence: &[u8]) -> Result<(), SequenceError> {
        let start = self.grow(sequence.len())?;
        let chunks = sequence.len() / CHUNK_SIZE;

        for chunk_idx in 0..chunks {
            let chunk_start = chunk_idx * CHUNK_SIZE;
            let mut input_array = [0u8; CHUNK_SIZE];
            input_array.copy_from_slice(&sequence[chunk_start..chunk_start + CHUNK_SIZE]);
            let input = u8x32::from(input_array);

            let is_a = input.cmp_eq(u8x32::splat(b'A')) | input.cmp_eq(u8x32::splat(b'a'));
            let is_c = input.cmp_eq(u8x32::splat(b'C')) | input.cmp_eq(u8x32::splat(b'c'));
            let is_g = input.cmp_eq(u8x32::splat(b'G')) | input.cmp_eq(u8x32::splat(b'g'));
            let is_t = input.cmp_eq(u8x32::splat(b'T'))
                | input.cmp_eq(u8x32::splat(b't'))
                | input.cmp_eq(u8x32::splat(b'U'))
                | input.cmp_eq(u8x32::splat(b'u'));

            let gc_mask = is_g | is_c;
            let valid_mask = is_a | gc_mask | is_t;
            self.gc_count += gc_mask.move_mask().count_ones() as usize;

            let is_c_mask: i32 = is_c.move_mask();
            let is_g_mask: i32 = is_g.move_mask();
            let is_t_mask: i32 = is_t.move_mask();
            let unknown_mask: i32 = !valid_mask.move_mask();

            for i in 0..CHUNK_SIZE {
                let bit_flag = 1i32 << i;
                let position = start + chunk_start + i;
                if (unknown_mask & bit_flag) != 0 {
                    self.store(position, AMBIGUOUS_CODE, true);
                } else if (is_c_mask & bit_flag) != 0 {
                    self.store(position, Nucleotide::C.code(), false);
                } else if (is_g_mask & bit_flag) != 0 {
                    self.store(position, Nucleotide::G.code(), false);
                } else if (is_t_mask & bit_flag) != 0 {
                    self.store(position, Nucleotide::T.code(), false);
                }
                // A = 00, nothing to write into a zeroed buffer
            }
        }

        for (offset, &byte) in sequence.iter().enumerate().skip(chunks * CHUNK_SIZE) {
            let position = start + offset;
            match char_to_nuc(byte) {
                4 => self.store(position, AMBIGUOUS_CODE, true),
                code => {
                    if Nucleotide::from_code(code).is_gc() {
                        self.gc_count += 1;
                    }
                    self.store(position, code, false);
                }
            }
        }

        Ok(())
    }

    /// Freeze the sequence.
    #[must_use]
    pub fn finish(self) -> PackedSequence {
        if self.len > 0 && self.ambiguous_count == self.len {
            warn!("Sequence of {} bp contains only ambiguous bases", self.len);
        }
        debug!(
            "Packed {} bp ({} GC, {} ambiguous)",
            self.len, self.gc_count, self.ambiguous_count
        );

        PackedSequence {
            bits: self.bits.into_boxed_slice(),
            ambiguity: self.ambiguity.into_boxed_slice(),
            len: self.len,
            gc_count: self.gc_count,
        }
    }
}

/// Immutable two-bit-per-base DNA sequence with an ambiguity map.
///
/// Base, codon and ambiguity predicates are total and answer `false` (or
/// `None`) when the position does not fit. Only [`base`](Self::base) and
/// [`kmer_index`](Self::kmer_index) index like slices and panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedSequence {
    bits: Box<[u8]>,
    ambiguity: Box<[u8]>,
    len: usize,
    gc_count: usize,
}

impl PackedSequence {
    /// Encode raw bytes under the default length limit.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::CapacityExceeded`] beyond
    /// [`MAX_SEQUENCE_LENGTH`].
    pub fn from_ascii(sequence: &[u8]) -> Result<Self, SequenceError> {
        Self::from_ascii_with_limit(sequence, MAX_SEQUENCE_LENGTH)
    }

    /// Encode raw bytes, refusing anything longer than `maximum`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::CapacityExceeded`] if `sequence` is too long.
    pub fn from_ascii_with_limit(sequence: &[u8], maximum: usize) -> Result<Self, SequenceError> {
        let mut builder = PackedSequenceBuilder::new(maximum);
        builder.extend_from_ascii(sequence)?;
        Ok(builder.finish())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw two-bit buffer (symbol i at bits 2i and 2i+1).
    #[must_use]
    pub fn as_bits(&self) -> &[u8] {
        &self.bits
    }

    /// Raw ambiguity bitmap (one bit per base).
    #[must_use]
    pub fn ambiguity_bits(&self) -> &[u8] {
        &self.ambiguity
    }

    /// Fraction of G/C bases; ambiguous bases count in the denominator only.
    #[must_use]
    pub fn gc_fraction(&self) -> f64 {
        if self.len == 0 {
            0.0
        } else {
            self.gc_count as f64 / self.len as f64
        }
    }

    /// Stored base at `pos`; ambiguous positions read as their T placeholder.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not less than [`len`](Self::len).
    #[inline]
    #[must_use]
    pub fn base(&self, pos: usize) -> Nucleotide {
        assert!(pos < self.len, "position {pos} out of range for {} bp", self.len);
        Nucleotide::from_code(read_symbol(&self.bits, pos))
    }

    #[inline]
    fn code(&self, pos: usize) -> Option<u8> {
        (pos < self.len).then(|| read_symbol(&self.bits, pos))
    }

    /// Test if nucleotide at given position is adenine (A)
    #[inline]
    #[must_use]
    pub fn is_a(&self, pos: usize) -> bool {
        self.code(pos) == Some(Nucleotide::A.code())
    }

    /// Test if nucleotide at given position is cytosine (C)
    #[inline]
    #[must_use]
    pub fn is_c(&self, pos: usize) -> bool {
        self.code(pos) == Some(Nucleotide::C.code())
    }

    /// Test if nucleotide at given position is guanine (G)
    #[inline]
    #[must_use]
    pub fn is_g(&self, pos: usize) -> bool {
        self.code(pos) == Some(Nucleotide::G.code())
    }

    /// Test if nucleotide at given position is thymine (T)
    #[inline]
    #[must_use]
    pub fn is_t(&self, pos: usize) -> bool {
        self.code(pos) == Some(Nucleotide::T.code())
    }

    /// Test if nucleotide at given position is G or C
    #[inline]
    #[must_use]
    pub fn is_gc(&self, pos: usize) -> bool {
        pos < self.len && symbol_bits_differ(&self.bits, pos)
    }

    /// Test if position holds an ambiguous (non-ACGT) input symbol
    #[inline]
    #[must_use]
    pub fn is_ambiguous(&self, pos: usize) -> bool {
        pos < self.len && test_bit(&self.ambiguity, pos)
    }

    /// All three bases starting at `pos` are ambiguous
    #[must_use]
    pub fn is_nnn(&self, pos: usize) -> bool {
        (pos..pos + CODON_LENGTH).all(|i| self.is_ambiguous(i))
    }

    /// At least one base of the codon starting at `pos` is ambiguous
    #[must_use]
    pub fn codon_has_ambiguity(&self, pos: usize) -> bool {
        (pos..pos + CODON_LENGTH).any(|i| self.is_ambiguous(i))
    }

    /// An ambiguous stretch sits directly upstream of the codon at `pos`.
    ///
    /// Either two ambiguous codons, or one ambiguous base followed by two
    /// ambiguous codons further out (an 8-base gap marker out of phase).
    #[must_use]
    pub fn gap_to_left(&self, pos: usize) -> bool {
        let nnn_at = |offset: usize| pos.checked_sub(offset).is_some_and(|p| self.is_nnn(p));
        let n_at = |offset: usize| pos.checked_sub(offset).is_some_and(|p| self.is_ambiguous(p));

        (nnn_at(3) && nnn_at(6)) || (n_at(3) && nnn_at(6) && nnn_at(9))
    }

    /// An ambiguous stretch sits directly downstream of the codon at `pos`.
    #[must_use]
    pub fn gap_to_right(&self, pos: usize) -> bool {
        (self.is_nnn(pos + 3) && self.is_nnn(pos + 6))
            || (self.is_ambiguous(pos + 5) && self.is_nnn(pos + 6) && self.is_nnn(pos + 9))
    }

    /// Index 0..64 of the codon starting at `pos` (first base most significant).
    ///
    /// `None` when the codon runs past the end of the sequence.
    #[inline]
    #[must_use]
    pub fn codon_index(&self, pos: usize) -> Option<usize> {
        if pos.checked_add(CODON_LENGTH)? > self.len {
            return None;
        }
        let first = usize::from(read_symbol(&self.bits, pos));
        let second = usize::from(read_symbol(&self.bits, pos + 1));
        let third = usize::from(read_symbol(&self.bits, pos + 2));
        Some((first << 4) | (second << 2) | third)
    }

    fn codon_is(&self, pos: usize, codon: [Nucleotide; 3]) -> bool {
        let [first, second, third] = codon.map(|base| usize::from(base.code()));
        self.codon_index(pos) == Some((first << 4) | (second << 2) | third)
    }

    /// Test if codon at position is ATG
    #[must_use]
    pub fn is_atg(&self, pos: usize) -> bool {
        self.codon_is(pos, [Nucleotide::A, Nucleotide::T, Nucleotide::G])
    }

    /// Test if codon at position is GTG
    #[must_use]
    pub fn is_gtg(&self, pos: usize) -> bool {
        self.codon_is(pos, [Nucleotide::G, Nucleotide::T, Nucleotide::G])
    }

    /// Test if codon at position is TTG
    #[must_use]
    pub fn is_ttg(&self, pos: usize) -> bool {
        self.codon_is(pos, [Nucleotide::T, Nucleotide::T, Nucleotide::G])
    }

    /// Test if codon at position is TAA
    #[must_use]
    pub fn is_taa(&self, pos: usize) -> bool {
        self.codon_is(pos, [Nucleotide::T, Nucleotide::A, Nucleotide::A])
    }

    /// Test if codon at position is TAG
    #[must_use]
    pub fn is_tag(&self, pos: usize) -> bool {
        self.codon_is(pos, [Nucleotide::T, Nucleotide::A, Nucleotide::G])
    }

    /// Test if codon at position is TGA
    #[must_use]
    pub fn is_tga(&self, pos: usize) -> bool {
        self.codon_is(pos, [Nucleotide::T, Nucleotide::G, Nucleotide::A])
    }

    /// Word of length `k` at `pos` packed as an integer, in stored bit order.
    ///
    /// Bit `i` of the result is stored bit `2 * pos + i`, so the first base
    /// occupies the two lowest bits.
    ///
    /// # Panics
    ///
    /// Panics if the word runs past the end of the sequence.
    #[must_use]
    pub fn kmer_index(&self, k: usize, pos: usize) -> usize {
        assert!(pos + k <= self.len, "word at {pos} of length {k} out of range");
        (0..2 * k).fold(0, |index, i| {
            index | (usize::from(test_bit(&self.bits, pos * 2 + i)) << i)
        })
    }

    /// Calculate the GC content of an inclusive region.
    ///
    /// `end` is clamped to the last base. Returns 0.0 for an empty sequence or
    /// a range that is inverted after clamping.
    #[must_use]
    pub fn gc_content(&self, begin: usize, end: usize) -> f64 {
        let Some(last) = self.len.checked_sub(1) else {
            return 0.0;
        };
        let end = end.min(last);
        if begin > end {
            return 0.0;
        }
        let gc_count = (begin..=end).filter(|&i| self.is_gc(i)).count();
        gc_count as f64 / (end - begin + 1) as f64
    }

    /// Build the reverse complement as a new sequence.
    ///
    /// Base i is complemented and written to `len - 1 - i`; ambiguity flags are
    /// mirrored without change.
    #[must_use]
    pub fn reverse_complement(&self) -> Self {
        let mut bits = vec![0u8; self.bits.len()];
        let mut ambiguity = vec![0u8; self.ambiguity.len()];

        for i in 0..self.len {
            let mirrored = self.len - 1 - i;
            write_symbol(&mut bits, mirrored, 3 - read_symbol(&self.bits, i));
            if test_bit(&self.ambiguity, i) {
                set_bit(&mut ambiguity, mirrored);
            }
        }

        Self {
            bits: bits.into_boxed_slice(),
            ambiguity: ambiguity.into_boxed_slice(),
            len: self.len,
            gc_count: self.gc_count,
        }
    }

    /// Decode back to text, writing `N` for ambiguous positions.
    #[must_use]
    pub fn to_ascii(&self) -> Vec<u8> {
        (0..self.len)
            .map(|i| {
                if self.is_ambiguous(i) {
                    b'N'
                } else {
                    self.base(i).to_ascii()
                }
            })
            .collect()
    }
}

/// Convert a forward strand reading frame to the matching reverse strand frame
///
/// Frames are counted from the start of each strand, so the mapping depends on
/// the sequence length modulo 3.
#[must_use]
pub const fn reverse_strand_reading_frame(forward_frame: usize, sequence_length: usize) -> usize {
    let frame_modulus = if sequence_length % 3 == 0 {
        3
    } else {
        sequence_length % 3
    };
    (frame_modulus + 2 - forward_frame) % 3
}

/// Convert a background bin index back to bases for display.
#[must_use]
pub fn mer_text(len: usize, index: usize) -> String {
    if len == 0 {
        return "None".to_string();
    }

    (0..len)
        .map(|i| NUCLEOTIDE_LETTERS[(index >> (2 * i)) & 0b11])
        .collect()
}
