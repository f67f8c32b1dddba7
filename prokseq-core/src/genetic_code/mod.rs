//! Start, stop and amino acid rules for the NCBI translation tables.
//!
//! Each table is expanded once per process into a 64-entry residue array and
//! two codon bitmasks, so every query on a [`GeneticCode`] is a single lookup.
//! Codons are indexed with the first base most significant:
//! `index = code(b0) << 4 | code(b1) << 2 | code(b2)` with A=0, C=1, G=2, T=3.
//!
//! # Examples
//!
//! ```rust
//! use prokseq_core::genetic_code::GeneticCode;
//! use prokseq_core::sequence::PackedSequence;
//!
//! let code = GeneticCode::new(11)?;
//! let seq = PackedSequence::from_ascii(b"ATGAAATAG")?;
//!
//! assert!(code.is_start_codon(&seq, 0));
//! assert_eq!(code.translate(&seq, 0, true), b'M');
//! assert_eq!(code.translate(&seq, 3, false), b'K');
//! assert_eq!(code.translate(&seq, 6, false), b'*');
//! # Ok::<(), prokseq_core::types::SequenceError>(())
//! ```

use std::sync::LazyLock;

use crate::constants::{
    AMINO_LETTERS, MAX_TRANSLATION_TABLE, NUM_CODONS, STOP_SYMBOL, UNKNOWN_RESIDUE,
};
use crate::sequence::{PackedSequence, char_to_nuc};
use crate::types::{SequenceError, StartCodon};

const fn codon(first: u8, second: u8, third: u8) -> usize {
    ((first as usize) << 4) | ((second as usize) << 2) | third as usize
}

const A: u8 = 0;
const C: u8 = 1;
const G: u8 = 2;
const T: u8 = 3;

pub const ATG: usize = codon(A, T, G);
pub const GTG: usize = codon(G, T, G);
pub const TTG: usize = codon(T, T, G);
pub const TAA: usize = codon(T, A, A);
pub const TAG: usize = codon(T, A, G);
pub const TGA: usize = codon(T, G, A);
const AGA: usize = codon(A, G, A);
const AGG: usize = codon(A, G, G);
const ATA: usize = codon(A, T, A);
const AAA: usize = codon(A, A, A);
const TCA: usize = codon(T, C, A);
const TTA: usize = codon(T, T, A);
const CTG: usize = codon(C, T, G);

/// Standard code residues in codon index order (AAA, AAC, AAG, AAT, ACA, ...).
const STANDARD_RESIDUES: &[u8; NUM_CODONS] =
    b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF";

#[derive(Debug, PartialEq, Eq)]
struct CodeTable {
    residues: [u8; NUM_CODONS],
    starts: u64,
    stops: u64,
}

const fn mask(index: usize) -> u64 {
    1u64 << index
}

impl CodeTable {
    fn build(id: i32) -> Self {
        let mut residues = *STANDARD_RESIDUES;
        let mut stops = mask(TAA) | mask(TAG) | mask(TGA);

        if matches!(id, 6 | 15 | 16 | 22) {
            stops &= !mask(TAG);
        }
        if matches!(id, 2..=5 | 9 | 10 | 13 | 14 | 21 | 24 | 25) {
            stops &= !mask(TGA);
        }
        if matches!(id, 6 | 14) {
            stops &= !mask(TAA);
        }
        match id {
            2 => stops |= mask(AGA) | mask(AGG),
            22 => stops |= mask(TCA),
            23 => stops |= mask(TTA),
            _ => {}
        }

        match id {
            6 => residues[TAA] = b'Q',
            14 => residues[TAA] = b'Y',
            _ => {}
        }
        match id {
            6 | 15 => residues[TAG] = b'Q',
            16 | 22 => residues[TAG] = b'L',
            _ => {}
        }
        match id {
            10 => residues[TGA] = b'C',
            25 => residues[TGA] = b'G',
            _ => {}
        }
        if id == 3 {
            for third in [A, C, G, T] {
                residues[codon(C, T, third)] = b'T';
            }
        }
        if id == 12 {
            residues[CTG] = b'S';
        }
        if matches!(id, 2 | 3 | 5 | 13 | 21) {
            residues[ATA] = b'M';
        }
        if matches!(id, 9 | 14 | 21) {
            residues[AAA] = b'N';
        }
        match id {
            13 => residues[AGA] = b'G',
            5 | 9 | 14 | 21 | 24 => residues[AGA] = b'S',
            _ => {}
        }
        match id {
            13 => residues[AGG] = b'G',
            5 | 9 | 14 | 21 => residues[AGG] = b'S',
            24 => residues[AGG] = b'K',
            _ => {}
        }

        for (index, residue) in residues.iter_mut().enumerate() {
            if stops & mask(index) != 0 {
                *residue = STOP_SYMBOL;
            }
        }

        let mut starts = mask(ATG);
        if matches!(id, 2 | 4 | 5 | 9 | 11 | 13 | 21 | 23 | 24 | 25) {
            starts |= mask(GTG);
        }
        if matches!(id, 4 | 5 | 11 | 13 | 24 | 25) {
            starts |= mask(TTG);
        }

        Self {
            residues,
            starts,
            stops,
        }
    }
}

static TABLES: LazyLock<Vec<CodeTable>> =
    LazyLock::new(|| (1..=MAX_TRANSLATION_TABLE).map(CodeTable::build).collect());

/// A validated translation table.
///
/// Tables 7, 8 and 17-20 are retired NCBI numbers and behave as the standard
/// code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneticCode {
    id: i32,
    table: &'static CodeTable,
}

impl GeneticCode {
    /// Look up translation table `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidTableId`] outside 1..=25.
    pub fn new(id: i32) -> Result<Self, SequenceError> {
        let table = id
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| TABLES.get(index))
            .ok_or(SequenceError::InvalidTableId(id))?;
        Ok(Self { id, table })
    }

    #[must_use]
    pub const fn id(&self) -> i32 {
        self.id
    }

    /// Start membership of a codon index.
    #[must_use]
    pub const fn is_start_index(&self, codon: usize) -> bool {
        codon < NUM_CODONS && self.table.starts & mask(codon) != 0
    }

    /// Stop membership of a codon index.
    #[must_use]
    pub const fn is_stop_index(&self, codon: usize) -> bool {
        codon < NUM_CODONS && self.table.stops & mask(codon) != 0
    }

    /// Residue for a codon index, `*` for stops and `X` for an invalid index.
    #[must_use]
    pub fn residue_index(&self, codon: usize, is_initiator: bool) -> u8 {
        if is_initiator && self.is_start_index(codon) {
            return b'M';
        }
        self.table
            .residues
            .get(codon)
            .copied()
            .unwrap_or(UNKNOWN_RESIDUE)
    }

    /// Test if the codon at `pos` can initiate translation under this table.
    ///
    /// Always `false` when the codon runs past the end of the sequence.
    #[must_use]
    pub fn is_start_codon(&self, seq: &PackedSequence, pos: usize) -> bool {
        seq.codon_index(pos)
            .is_some_and(|codon| self.is_start_index(codon))
    }

    /// Test if the codon at `pos` terminates translation under this table.
    #[must_use]
    pub fn is_stop_codon(&self, seq: &PackedSequence, pos: usize) -> bool {
        seq.codon_index(pos)
            .is_some_and(|codon| self.is_stop_index(codon))
    }

    /// Which start codon sits at `pos`, if it is a start under this table.
    #[must_use]
    pub fn start_codon_type(&self, seq: &PackedSequence, pos: usize) -> Option<StartCodon> {
        match seq.codon_index(pos)? {
            ATG => Some(StartCodon::Atg),
            GTG if self.is_start_index(GTG) => Some(StartCodon::Gtg),
            TTG if self.is_start_index(TTG) => Some(StartCodon::Ttg),
            _ => None,
        }
    }

    /// Translate the codon at `pos`.
    ///
    /// Stops give `*`. A start codon at an initiator position gives `M`
    /// whatever its ordinary meaning. A codon that does not fit gives `X`.
    #[must_use]
    pub fn translate(&self, seq: &PackedSequence, pos: usize, is_initiator: bool) -> u8 {
        seq.codon_index(pos)
            .map_or(UNKNOWN_RESIDUE, |codon| self.residue_index(codon, is_initiator))
    }

    /// Translate a raw three-letter codon such as `b"GTG"`.
    ///
    /// Returns `X` if any letter is not A, C, G, T or U.
    #[must_use]
    pub fn translate_bases(&self, bases: &[u8; 3], is_initiator: bool) -> u8 {
        let [first, second, third] = bases.map(char_to_nuc);
        if first > T || second > T || third > T {
            return UNKNOWN_RESIDUE;
        }
        self.residue_index(codon(first, second, third), is_initiator)
    }

    /// Probability that a random codon is a stop, given the GC fraction.
    ///
    /// Each G or C base has probability `gc / 2`, each A or T `(1 - gc) / 2`.
    #[must_use]
    pub fn prob_stop(&self, gc: f64) -> f64 {
        let base_probability = |code: usize| {
            if code == usize::from(C) || code == usize::from(G) {
                gc / 2.0
            } else {
                (1.0 - gc) / 2.0
            }
        };

        (0..NUM_CODONS)
            .filter(|&index| self.is_stop_index(index))
            .map(|index| {
                base_probability(index >> 4)
                    * base_probability((index >> 2) & 0b11)
                    * base_probability(index & 0b11)
            })
            .sum()
    }
}

/// Position of an amino acid letter in `ACDEFGHIKLMNPQRSTVWY`.
///
/// Case-insensitive; `None` for anything else, including `*` and `X`.
#[must_use]
pub fn amino_index(residue: u8) -> Option<usize> {
    let upper = residue.to_ascii_uppercase();
    AMINO_LETTERS.iter().position(|&letter| letter == upper)
}

/// Amino acid letter for an index from [`amino_index`], `X` when out of range.
#[must_use]
pub fn amino_letter(index: usize) -> u8 {
    AMINO_LETTERS.get(index).copied().unwrap_or(UNKNOWN_RESIDUE)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn all_tables() -> impl Iterator<Item = GeneticCode> {
        (1..=MAX_TRANSLATION_TABLE).map(|id| GeneticCode::new(id).unwrap())
    }

    fn packed(sequence: &[u8]) -> PackedSequence {
        PackedSequence::from_ascii(sequence).unwrap()
    }

    #[test]
    fn test_table_ids() {
        assert!(GeneticCode::new(0).is_err());
        assert!(GeneticCode::new(26).is_err());
        assert_eq!(
            GeneticCode::new(i32::MIN),
            Err(SequenceError::InvalidTableId(i32::MIN))
        );
        assert_eq!(all_tables().count(), 25);
        assert_eq!(GeneticCode::new(7).unwrap().table, GeneticCode::new(1).unwrap().table);
    }

    #[test]
    fn test_codon_constants() {
        let seq = packed(b"ATGGTGTTGTAATAGTGA");
        let indices: Vec<_> = (0..6).filter_map(|i| seq.codon_index(i * 3)).collect();
        assert_eq!(indices, vec![ATG, GTG, TTG, TAA, TAG, TGA]);
    }

    #[test]
    fn test_end_to_end_translation() {
        let code = GeneticCode::new(11).unwrap();
        let seq = packed(b"ATGAAATAG");

        assert!(code.is_start_codon(&seq, 0));
        assert_eq!(code.translate(&seq, 0, true), b'M');
        assert_eq!(code.translate(&seq, 3, false), b'K');
        assert!(code.is_stop_codon(&seq, 6));
        assert_eq!(code.translate(&seq, 6, false), b'*');
        assert_eq!(code.translate(&seq, 7, false), b'X');
        assert!(!code.is_stop_codon(&seq, 7));
        assert!(!code.is_start_codon(&seq, 8));
    }

    #[test]
    fn test_start_and_stop_exclusive() {
        for code in all_tables() {
            for index in 0..NUM_CODONS {
                assert!(
                    !(code.is_start_index(index) && code.is_stop_index(index)),
                    "table {} codon {index}",
                    code.id()
                );
            }
        }
    }

    #[test]
    fn test_start_codons_per_table() {
        for code in all_tables() {
            assert!(code.is_start_index(ATG));
            assert_eq!(
                code.is_start_index(GTG),
                matches!(code.id(), 2 | 4 | 5 | 9 | 11 | 13 | 21 | 23 | 24 | 25)
            );
            assert_eq!(
                code.is_start_index(TTG),
                matches!(code.id(), 4 | 5 | 11 | 13 | 24 | 25)
            );
            assert_eq!(code.table.starts.count_ones() as usize, {
                1 + usize::from(code.is_start_index(GTG)) + usize::from(code.is_start_index(TTG))
            });
        }
    }

    #[test]
    fn test_stop_exceptions() {
        let standard = GeneticCode::new(1).unwrap();
        assert!(standard.is_stop_index(TAA));
        assert!(standard.is_stop_index(TAG));
        assert!(standard.is_stop_index(TGA));

        let ciliate = GeneticCode::new(6).unwrap();
        assert!(!ciliate.is_stop_index(TAA));
        assert!(!ciliate.is_stop_index(TAG));
        assert!(ciliate.is_stop_index(TGA));
        assert_eq!(ciliate.residue_index(TAA, false), b'Q');

        let pterobranchia = GeneticCode::new(24).unwrap();
        assert!(!pterobranchia.is_stop_index(TGA));
        assert_eq!(pterobranchia.residue_index(TGA, false), b'W');
        assert_eq!(pterobranchia.residue_index(AGG, false), b'K');
    }

    #[test]
    fn test_extra_stops() {
        let vertebrate_mito = GeneticCode::new(2).unwrap();
        assert!(vertebrate_mito.is_stop_index(AGA));
        assert!(vertebrate_mito.is_stop_index(AGG));
        assert_eq!(vertebrate_mito.translate_bases(b"AGA", false), b'*');

        assert!(GeneticCode::new(22).unwrap().is_stop_index(TCA));
        assert!(GeneticCode::new(23).unwrap().is_stop_index(TTA));
        assert!(!GeneticCode::new(11).unwrap().is_stop_index(TCA));
    }

    #[test]
    fn test_reassignments() {
        let code = |id| GeneticCode::new(id).unwrap();

        assert_eq!(code(3).translate_bases(b"CTT", false), b'T');
        assert_eq!(code(3).translate_bases(b"ATA", false), b'M');
        assert_eq!(code(12).translate_bases(b"CTG", false), b'S');
        assert_eq!(code(11).translate_bases(b"CTG", false), b'L');
        assert_eq!(code(10).translate_bases(b"TGA", false), b'C');
        assert_eq!(code(25).translate_bases(b"TGA", false), b'G');
        assert_eq!(code(4).translate_bases(b"TGA", false), b'W');
        assert_eq!(code(14).translate_bases(b"TAA", false), b'Y');
        assert_eq!(code(16).translate_bases(b"TAG", false), b'L');
        assert_eq!(code(9).translate_bases(b"AAA", false), b'N');
        assert_eq!(code(13).translate_bases(b"AGA", false), b'G');
        assert_eq!(code(5).translate_bases(b"AGG", false), b'S');
        assert_eq!(code(1).translate_bases(b"AGG", false), b'R');
    }

    #[test]
    fn test_initiator_overrides_ordinary_meaning() {
        let code = GeneticCode::new(11).unwrap();
        assert_eq!(code.translate_bases(b"GTG", false), b'V');
        assert_eq!(code.translate_bases(b"GTG", true), b'M');
        assert_eq!(code.translate_bases(b"TTG", true), b'M');
        assert_eq!(code.translate_bases(b"CTG", true), b'L');

        let standard = GeneticCode::new(1).unwrap();
        assert_eq!(standard.translate_bases(b"GTG", true), b'V');
    }

    #[test]
    fn test_translate_bases_rejects_unknown_symbols() {
        let code = GeneticCode::new(11).unwrap();
        assert_eq!(code.translate_bases(b"ANG", false), b'X');
        assert_eq!(code.translate_bases(b"aug", true), b'M');
    }

    #[test]
    fn test_start_codon_type() {
        let seq = packed(b"ATGGTGTTGCTG");
        let bacterial = GeneticCode::new(11).unwrap();
        assert_eq!(bacterial.start_codon_type(&seq, 0), Some(StartCodon::Atg));
        assert_eq!(bacterial.start_codon_type(&seq, 3), Some(StartCodon::Gtg));
        assert_eq!(bacterial.start_codon_type(&seq, 6), Some(StartCodon::Ttg));
        assert_eq!(bacterial.start_codon_type(&seq, 9), None);

        let standard = GeneticCode::new(1).unwrap();
        assert_eq!(standard.start_codon_type(&seq, 3), None);
    }

    #[test]
    fn test_prob_stop() {
        let bacterial = GeneticCode::new(11).unwrap();
        assert_relative_eq!(bacterial.prob_stop(0.5), 3.0 / 64.0);

        let vertebrate_mito = GeneticCode::new(2).unwrap();
        assert_relative_eq!(vertebrate_mito.prob_stop(0.5), 4.0 / 64.0);

        // TAA is all AT, TAG and TGA carry one G each
        let expected = 0.125f64.powi(3) + 2.0 * 0.125f64.powi(2) * 0.375;
        assert_relative_eq!(bacterial.prob_stop(0.75), expected);

        for code in all_tables() {
            for gc in [0.0, 0.3, 0.5, 1.0] {
                let p = code.prob_stop(gc);
                assert!((0.0..=1.0).contains(&p));
            }
        }
    }

    #[test]
    fn test_amino_index_round_trip() {
        for (index, &letter) in AMINO_LETTERS.iter().enumerate() {
            assert_eq!(amino_index(letter), Some(index));
            assert_eq!(amino_letter(index), letter);
        }
        assert_eq!(amino_index(b'k'), Some(8));
        assert_eq!(amino_index(b'*'), None);
        assert_eq!(amino_index(b'X'), None);
        assert_eq!(amino_letter(20), b'X');
    }
}
