//! # prokseq-core
//!
//! Sequence representation and genetic-code scoring for prokaryotic gene
//! prediction.
//!
//! ## Overview
//!
//! This crate owns everything a gene model needs to know about the raw DNA:
//! a compact two-bit encoding of both strands, start/stop classification and
//! translation under the NCBI translation tables, the GC frame plot, word
//! background frequencies, and Shine-Dalgarno motif classes upstream of
//! candidate start codons. It does not build gene models itself; callers pull
//! per-position answers from the structures built here.
//!
//! ## Features
//!
//! - **Two-bit storage**: A, C, G and T in two bits each, with a separate
//!   ambiguity map for everything else
//! - **25 translation tables**: expanded once into lookup arrays
//! - **GC frame plot**: the most GC-rich codon phase at every position in O(N)
//! - **Background model**: word counts over both strands, counted with Rayon
//! - **RBS scoring**: exact and single-mismatch AGGAGG matching into 28 classes
//!
//! ## Quick Start
//!
//! ```rust
//! use prokseq_core::{SequenceAnalyzer, config::SequenceConfig};
//!
//! let analyzer = SequenceAnalyzer::new(SequenceConfig::default())?;
//! let analysis = analyzer.analyze(b"ATGAAATAG")?;
//!
//! let forward = analysis.encoded.forward();
//! let code = analysis.genetic_code;
//! assert!(code.is_start_codon(forward, 0));
//! assert_eq!(code.translate(forward, 3, false), b'K');
//! assert!(code.is_stop_codon(forward, 6));
//! # Ok::<(), prokseq_core::types::SequenceError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Analysis settings and their validation
//! - [`engine`]: Builds every per-sequence structure in one call
//! - [`sequence`]: Two-bit encoding, strands, GC frames and background
//! - [`genetic_code`]: Start, stop and translation rules per table
//! - [`rbs`]: Shine-Dalgarno motif classes
//! - [`types`]: Shared value types and errors
//! - [`bitmap`]: Bit and symbol access over byte buffers
//! - [`constants`]: Fixed values used throughout
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T, SequenceError>`](types::SequenceError):
//!
//! - Sequences longer than the configured maximum
//! - Unknown translation table ids
//! - Word lengths and GC windows that cannot be used

pub mod bitmap;
pub mod config;
pub mod constants;
pub mod engine;
pub mod genetic_code;
pub mod rbs;
pub mod sequence;
pub mod types;

pub use engine::{SequenceAnalysis, SequenceAnalyzer};
