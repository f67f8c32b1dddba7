use crate::constants::{
    DEFAULT_TRANSLATION_TABLE, DICODON_SIZE, MAX_KMER_LENGTH, MAX_SEQUENCE_LENGTH,
    READING_FRAMES, SLIDING_WINDOW_SIZE,
};
use crate::genetic_code::GeneticCode;
use crate::types::SequenceError;

/// Configuration settings for sequence analysis.
///
/// Every field is checked once by [`SequenceConfig::validate`] before any
/// per-base work starts, so hot paths never see an invalid table id or window.
///
/// # Examples
///
/// ## Default configuration
///
/// ```rust
/// use prokseq_core::config::SequenceConfig;
///
/// let config = SequenceConfig::default();
/// assert_eq!(config.translation_table, 11);
/// assert!(config.validate().is_ok());
/// ```
///
/// ## Mycoplasma code with N-run masking
///
/// ```rust
/// use prokseq_core::config::SequenceConfig;
///
/// let config = SequenceConfig {
///     translation_table: 4,
///     mask_n_runs: true,
///     ..Default::default()
/// };
/// let code = config.genetic_code()?;
/// assert_eq!(code.id(), 4);
/// # Ok::<(), prokseq_core::types::SequenceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SequenceConfig {
    /// Longest sequence accepted by the store.
    ///
    /// Construction fails with [`SequenceError::CapacityExceeded`] beyond this;
    /// truncation is left to the ingestion layer.
    ///
    /// **Default**: 32,000,000 bp
    pub max_sequence_length: usize,

    /// Genetic code translation table number (1-25).
    ///
    /// - `11`: Bacterial/Archaeal (default)
    /// - `4`: Mycoplasma/Spiroplasma
    /// - Others: See NCBI genetic code tables
    ///
    /// **Default**: `11`
    pub translation_table: i32,

    /// Window width of the GC frame plot, centered on each position.
    ///
    /// **Default**: `120`
    pub gc_frame_window: usize,

    /// Record runs of N characters as masks while encoding.
    ///
    /// **Default**: `false`
    pub mask_n_runs: bool,

    /// Word length of the background model.
    ///
    /// **Default**: `6` (dicodons)
    pub background_kmer_length: usize,

    /// Number of threads for batch analysis and background counting.
    ///
    /// `None` uses the global Rayon pool as is.
    ///
    /// **Default**: `None`
    pub num_threads: Option<usize>,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            max_sequence_length: MAX_SEQUENCE_LENGTH,
            translation_table: DEFAULT_TRANSLATION_TABLE,
            gc_frame_window: SLIDING_WINDOW_SIZE,
            mask_n_runs: false,
            background_kmer_length: DICODON_SIZE,
            num_threads: None,
        }
    }
}

impl SequenceConfig {
    /// Check every setting.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::InvalidTableId`] for an unrecognized table
    /// - [`SequenceError::InvalidWindow`] for a window narrower than a codon
    /// - [`SequenceError::InvalidKmerLength`] for a word length outside 1..=12
    pub fn validate(&self) -> Result<(), SequenceError> {
        GeneticCode::new(self.translation_table)?;

        if self.gc_frame_window < READING_FRAMES {
            return Err(SequenceError::InvalidWindow(self.gc_frame_window));
        }

        if !(1..=MAX_KMER_LENGTH).contains(&self.background_kmer_length) {
            return Err(SequenceError::InvalidKmerLength(
                self.background_kmer_length,
            ));
        }

        Ok(())
    }

    /// The genetic code selected by `translation_table`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidTableId`] for an unrecognized table.
    pub fn genetic_code(&self) -> Result<GeneticCode, SequenceError> {
        GeneticCode::new(self.translation_table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SequenceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gc_frame_window, 120);
        assert_eq!(config.background_kmer_length, 6);
    }

    #[test]
    fn test_invalid_table_rejected() {
        for table in [0, 26, -1] {
            let config = SequenceConfig {
                translation_table: table,
                ..Default::default()
            };
            assert_eq!(
                config.validate(),
                Err(SequenceError::InvalidTableId(table))
            );
        }
    }

    #[test]
    fn test_invalid_window_rejected() {
        let config = SequenceConfig {
            gc_frame_window: 2,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(SequenceError::InvalidWindow(2)));
    }

    #[test]
    fn test_invalid_kmer_length_rejected() {
        for k in [0, 13] {
            let config = SequenceConfig {
                background_kmer_length: k,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(SequenceError::InvalidKmerLength(k)));
        }
    }
}
