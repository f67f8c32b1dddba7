use bio::bio_types::strand::Strand;
use log::{debug, info};
use rayon::prelude::*;

use crate::config::SequenceConfig;
use crate::genetic_code::GeneticCode;
use crate::rbs::{RbsCall, scan_upstream};
use crate::sequence::encoded::EncodedSequence;
use crate::sequence::{GcFrameProfile, KmerBackground, calc_most_gc_frame};
use crate::types::{RbsWeights, SequenceError};

/// Everything the gene-model layer reads about one sequence.
///
/// All parts are immutable and can be shared across threads.
#[derive(Debug, Clone)]
pub struct SequenceAnalysis {
    /// Both strands and the masks found while encoding
    pub encoded: EncodedSequence,
    /// GC frame plot of the forward strand
    pub gc_frames: GcFrameProfile,
    /// Word background over both strands
    pub background: KmerBackground,
    /// Translation table the analysis was configured with
    pub genetic_code: GeneticCode,
}

impl SequenceAnalysis {
    /// Best Shine-Dalgarno classes upstream of a start codon.
    ///
    /// See [`scan_upstream`] for the coordinate convention.
    #[must_use]
    pub fn rbs_call(&self, start: usize, strand: Strand, weights: &RbsWeights) -> Option<RbsCall> {
        scan_upstream(&self.encoded, start, strand, weights)
    }

    /// Probability that a random codon is a stop at this sequence's GC content.
    #[must_use]
    pub fn prob_stop(&self) -> f64 {
        self.genetic_code.prob_stop(self.encoded.gc_content())
    }
}

/// Encodes sequences and builds their per-sequence statistics.
///
/// # Examples
///
/// ```rust
/// use prokseq_core::SequenceAnalyzer;
/// use prokseq_core::config::SequenceConfig;
///
/// let analyzer = SequenceAnalyzer::new(SequenceConfig::default())?;
/// let analysis = analyzer.analyze(b"ATGAAACGCATTAGCACCACCATTACCACCACCATCACCATTACCACAGGTAACGGTGCGGGCTGA")?;
///
/// assert_eq!(analysis.gc_frames.len(), analysis.encoded.len());
/// assert_eq!(analysis.background.kmer_length(), 6);
/// # Ok::<(), prokseq_core::types::SequenceError>(())
/// ```
#[derive(Debug)]
pub struct SequenceAnalyzer {
    config: SequenceConfig,
    genetic_code: GeneticCode,
    pool: Option<rayon::ThreadPool>,
}

impl SequenceAnalyzer {
    /// Validate `config` and set up the worker pool it asks for.
    ///
    /// # Errors
    ///
    /// Returns the validation error of [`SequenceConfig::validate`], or
    /// [`SequenceError::ThreadPool`] if the pool cannot be built.
    pub fn new(config: SequenceConfig) -> Result<Self, SequenceError> {
        config.validate()?;
        let genetic_code = config.genetic_code()?;

        let pool = config
            .num_threads
            .map(|num_threads| {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build()
                    .map_err(|e| SequenceError::ThreadPool(e.to_string()))
            })
            .transpose()?;

        debug!(
            "Analyzer ready: table {}, window {}, k {}",
            genetic_code.id(),
            config.gc_frame_window,
            config.background_kmer_length
        );

        Ok(Self {
            config,
            genetic_code,
            pool,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &SequenceConfig {
        &self.config
    }

    #[must_use]
    pub const fn genetic_code(&self) -> GeneticCode {
        self.genetic_code
    }

    fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Encode one sequence and compute its GC frames and background.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::CapacityExceeded`] if the sequence is longer
    /// than the configured maximum.
    pub fn analyze(&self, sequence: &[u8]) -> Result<SequenceAnalysis, SequenceError> {
        self.install(|| self.analyze_one(sequence))
    }

    /// Analyze several sequences in parallel, failing on the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error any sequence produced.
    pub fn analyze_batch<S>(&self, sequences: &[S]) -> Result<Vec<SequenceAnalysis>, SequenceError>
    where
        S: AsRef<[u8]> + Sync,
    {
        info!("Analyzing {} sequences", sequences.len());
        self.install(|| {
            sequences
                .par_iter()
                .map(|sequence| self.analyze_one(sequence.as_ref()))
                .collect()
        })
    }

    fn analyze_one(&self, sequence: &[u8]) -> Result<SequenceAnalysis, SequenceError> {
        let encoded = EncodedSequence::from_config(sequence, &self.config)?;
        let gc_frames = calc_most_gc_frame(encoded.forward(), self.config.gc_frame_window)?;
        let background = KmerBackground::build(&encoded, self.config.background_kmer_length)?;

        debug!(
            "Analyzed {} bp (GC {:.3}, {} masks)",
            encoded.len(),
            encoded.gc_content(),
            encoded.masks().len()
        );

        Ok(SequenceAnalysis {
            encoded,
            gc_frames,
            background,
            genetic_code: self.genetic_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_rejects_invalid_config() {
        let config = SequenceConfig {
            translation_table: 30,
            ..Default::default()
        };
        assert_eq!(
            SequenceAnalyzer::new(config).unwrap_err(),
            SequenceError::InvalidTableId(30)
        );
    }

    #[test]
    fn test_analyze_single_sequence() {
        let analyzer = SequenceAnalyzer::new(SequenceConfig::default()).unwrap();
        let analysis = analyzer.analyze(b"ATGAAACCCGGGTTTTAG").unwrap();

        assert_eq!(analysis.encoded.len(), 18);
        assert_eq!(analysis.gc_frames.len(), 18);
        assert_eq!(analysis.background.total_count(), 2 * 13);
        assert_eq!(analysis.genetic_code.id(), 11);
        assert_relative_eq!(analysis.encoded.gc_content(), 8.0 / 18.0);
        assert_relative_eq!(
            analysis.prob_stop(),
            analyzer.genetic_code().prob_stop(8.0 / 18.0)
        );
    }

    #[test]
    fn test_capacity_error_propagates() {
        let config = SequenceConfig {
            max_sequence_length: 10,
            ..Default::default()
        };
        let analyzer = SequenceAnalyzer::new(config).unwrap();
        assert!(matches!(
            analyzer.analyze(b"ACGTACGTACGT"),
            Err(SequenceError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_analyze_batch_with_own_pool() {
        let config = SequenceConfig {
            num_threads: Some(2),
            background_kmer_length: 3,
            ..Default::default()
        };
        let analyzer = SequenceAnalyzer::new(config).unwrap();
        let sequences = vec![b"ATGAAATAG".to_vec(), b"GGGCCC".to_vec(), Vec::new()];

        let analyses = analyzer.analyze_batch(&sequences).unwrap();
        assert_eq!(analyses.len(), 3);
        assert_eq!(analyses[0].encoded.len(), 9);
        assert_relative_eq!(analyses[1].encoded.gc_content(), 1.0);
        assert_eq!(analyses[2].background.total_count(), 0);
    }

    #[test]
    fn test_analyze_batch_reports_error() {
        let config = SequenceConfig {
            max_sequence_length: 5,
            ..Default::default()
        };
        let analyzer = SequenceAnalyzer::new(config).unwrap();
        let result = analyzer.analyze_batch(&[&b"ACG"[..], &b"ACGTACGT"[..]]);
        assert!(result.is_err());
    }
}
