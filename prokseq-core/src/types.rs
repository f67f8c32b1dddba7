use std::fmt;

use thiserror::Error;

use crate::constants::NUM_RBS_WEIGHTS;

/// Weights for ribosome binding site scoring (28 possible motif classes).
///
/// Indexed by the class returned from the RBS scorer. Classes 0-27 come from
/// the exact-match variant, 0-19 from the single-mismatch variant.
pub type RbsWeights = [f64; NUM_RBS_WEIGHTS];

/// A definite nucleotide as resolved from the two stored bits.
///
/// The discriminant is the two-bit code: A=00, C=01, G=10, T=11.
///
/// # Examples
///
/// ```rust
/// use prokseq_core::types::Nucleotide;
///
/// assert_eq!(Nucleotide::from_code(2), Nucleotide::G);
/// assert_eq!(Nucleotide::C.complement(), Nucleotide::G);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Nucleotide {
    A = 0,
    C = 1,
    G = 2,
    T = 3,
}

impl Nucleotide {
    /// Decode a two-bit code; only the low two bits are looked at.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code & 0b11 {
            0 => Self::A,
            1 => Self::C,
            2 => Self::G,
            _ => Self::T,
        }
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Watson-Crick partner. With this encoding the complement is `3 - code`.
    #[must_use]
    pub const fn complement(self) -> Self {
        Self::from_code(3 - self.code())
    }

    #[must_use]
    pub const fn is_gc(self) -> bool {
        matches!(self, Self::C | Self::G)
    }

    #[must_use]
    pub const fn to_ascii(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
        }
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.to_ascii()))
    }
}

/// One of the three codon phases of a strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ReadingFrame {
    Zero = 0,
    One = 1,
    Two = 2,
}

impl ReadingFrame {
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Zero),
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    #[must_use]
    pub const fn to_index(self) -> usize {
        self as usize
    }
}

/// Types of start codons recognized by the genetic code tables.
///
/// Only ATG, GTG and TTG are ever treated as initiators.
///
/// # Examples
///
/// ```rust
/// use prokseq_core::types::StartCodon;
///
/// assert_eq!(StartCodon::Gtg.to_index(), 1);
/// assert_eq!(StartCodon::Ttg.to_string(), "TTG");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartCodon {
    /// ATG start codon
    Atg,
    /// GTG start codon
    Gtg,
    /// TTG start codon
    Ttg,
}

impl StartCodon {
    /// Index into start-type weight arrays ([ATG, GTG, TTG]).
    #[must_use]
    pub const fn to_index(self) -> usize {
        match self {
            Self::Atg => 0,
            Self::Gtg => 1,
            Self::Ttg => 2,
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Atg),
            1 => Some(Self::Gtg),
            2 => Some(Self::Ttg),
            _ => None,
        }
    }

    /// Codon text for reports.
    #[must_use]
    pub const fn start_text(self) -> &'static str {
        match self {
            Self::Atg => "ATG",
            Self::Gtg => "GTG",
            Self::Ttg => "TTG",
        }
    }
}

impl fmt::Display for StartCodon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.start_text())
    }
}

/// Region made of a long run of `N` characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    /// First masked position (0-based)
    pub begin: usize,
    /// Last masked position (0-based, inclusive)
    pub end: usize,
}

/// Error types raised while building sequences or configuring analyses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// Requested length is beyond the configured maximum
    #[error("Sequence of {length} bp exceeds the maximum of {maximum} bp")]
    CapacityExceeded { length: usize, maximum: usize },
    /// Translation table id outside the recognized set
    #[error("Invalid translation table: {0}")]
    InvalidTableId(i32),
    /// Word length that cannot be packed into a background index
    #[error("Invalid k-mer length: {0}")]
    InvalidKmerLength(usize),
    /// GC frame window too small to be centered on a position
    #[error("Invalid GC frame window: {0}")]
    InvalidWindow(usize),
    /// Worker pool could not be created
    #[error("Failed to configure thread pool: {0}")]
    ThreadPool(String),
}
