// =============================================================================
// Sequence store
// =============================================================================

/// Maximum allowed sequence length in base pairs
pub const MAX_SEQUENCE_LENGTH: usize = 32_000_000;

/// Minimum run of `N` characters recorded as a mask
pub const MASK_SIZE: usize = 50;

/// Width of the ambiguity-flagged placeholder inserted between records
pub const GAP_MARKER_WIDTH: usize = 8;

/// Number of reading frames on one strand
pub const READING_FRAMES: usize = 3;

/// Length of a codon in base pairs
pub const CODON_LENGTH: usize = 3;

/// Number of distinct codons (4^3)
pub const NUM_CODONS: usize = 64;

/// SIMD processing chunk size for sequence encoding
pub const CHUNK_SIZE: usize = 32;

// =============================================================================
// GC frame plot and background model
// =============================================================================

/// Sliding window size for the GC frame plot
pub const SLIDING_WINDOW_SIZE: usize = 120;

/// Default word length for background frequencies (dicodons)
pub const DICODON_SIZE: usize = 6;

/// Longest word whose background still fits a reasonable table (4^12 bins)
pub const MAX_KMER_LENGTH: usize = 12;

// =============================================================================
// Genetic codes
// =============================================================================

/// Highest translation table id accepted
pub const MAX_TRANSLATION_TABLE: i32 = 25;

/// Bacterial, archaeal and plant plastid code
pub const DEFAULT_TRANSLATION_TABLE: i32 = 11;

/// Symbol returned for stop codons
pub const STOP_SYMBOL: u8 = b'*';

/// Symbol returned for codons that cannot be decoded
pub const UNKNOWN_RESIDUE: u8 = b'X';

/// Amino acid letters in index order
pub const AMINO_LETTERS: [u8; 20] = *b"ACDEFGHIKLMNPQRSTVWY";

// =============================================================================
// Shine-Dalgarno scoring
// =============================================================================

/// Minimum motif length for exact matching
pub const MIN_MOTIF_LENGTH: usize = 3;

/// Minimum motif length for single-mismatch matching
pub const MIN_MISMATCH_MOTIF_LENGTH: usize = 5;

/// Maximum motif length (AGGAGG)
pub const MAX_MOTIF_LENGTH: usize = 6;

/// Bases kept free between the scanned region and the start codon
pub const MIN_DISTANCE_FROM_START: usize = 4;

/// Maximum spacer between motif end and start codon
pub const MAX_RIBOSOME_DISTANCE: usize = 15;

/// Upstream distance where RBS window starts are scanned from
pub const RBS_UPSTREAM_DISTANCE: usize = 20;

/// Upstream distance where RBS window starts are scanned to
pub const RBS_DOWNSTREAM_DISTANCE: usize = 6;

/// Minimum motif score, after the -2 baseline, for a candidate to count
pub const MIN_CUMULATIVE_SCORE: f64 = 6.0;

/// Score baseline every candidate sub-window starts from
pub const MOTIF_SCORE_BASELINE: f64 = -2.0;

/// Score given to a position that cannot match
pub const HARD_MISMATCH_SCORE: f64 = -10.0;

/// Number of RBS weight classes
pub const NUM_RBS_WEIGHTS: usize = 28;

/// Number of classes the single-mismatch variant can produce
pub const NUM_MISMATCH_RBS_CLASSES: usize = 20;

// =============================================================================
// Display
// =============================================================================

/// Letters for two-bit values in stored bit order (low bit first)
pub const NUCLEOTIDE_LETTERS: [char; 4] = ['A', 'G', 'C', 'T'];

/// Shine-Dalgarno motif descriptions, indexed by class
pub const RBS_DESCRIPTIONS: [(&str, &str); 28] = [
    ("None", "None"),
    ("GGA/GAG/AGG", "3-4bp"),
    ("3Base/5BMM", "13-15bp"),
    ("4Base/6BMM", "13-15bp"),
    ("AGxAG", "11-12bp"),
    ("AGxAG", "3-4bp"),
    ("GGA/GAG/AGG", "11-12bp"),
    ("GGxGG", "11-12bp"),
    ("GGxGG", "3-4bp"),
    ("AGxAG", "5-10bp"),
    ("AGGAG(G)/GGAGG", "13-15bp"),
    ("AGGA/GGAG/GAGG", "3-4bp"),
    ("AGGA/GGAG/GAGG", "11-12bp"),
    ("GGA/GAG/AGG", "5-10bp"),
    ("GGxGG", "5-10bp"),
    ("AGGA", "5-10bp"),
    ("GGAG/GAGG", "5-10bp"),
    ("AGxAGG/AGGxGG", "11-12bp"),
    ("AGxAGG/AGGxGG", "3-4bp"),
    ("AGxAGG/AGGxGG", "5-10bp"),
    ("AGGAG/GGAGG", "11-12bp"),
    ("AGGAG", "3-4bp"),
    ("AGGAG", "5-10bp"),
    ("GGAGG", "3-4bp"),
    ("GGAGG", "5-10bp"),
    ("AGGAGG", "11-12bp"),
    ("AGGAGG", "3-4bp"),
    ("AGGAGG", "5-10bp"),
];
