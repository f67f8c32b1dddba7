//! Shine-Dalgarno motif scoring.
//!
//! A window of up to six bases upstream of a start codon is compared against
//! the AGGAGG consensus, either exactly or with one mismatch. Every qualifying
//! sub-window is mapped to one of 28 motif classes from its score and its
//! distance to the start codon, and the class with the highest trained weight
//! wins.
//!
//! # Examples
//!
//! ```rust
//! use prokseq_core::rbs::{RbsVariant, score};
//! use prokseq_core::sequence::PackedSequence;
//!
//! let mut weights = [0.0; 28];
//! weights[10] = 5.0;
//!
//! let mut text = b"AGGAGG".to_vec();
//! text.extend(b"TTTTTTTTTTTTT");
//! text.extend(b"ATG");
//! let seq = PackedSequence::from_ascii(&text)?;
//!
//! assert_eq!(score(&seq, 0, 19, &weights, RbsVariant::Exact), 10);
//! # Ok::<(), prokseq_core::types::SequenceError>(())
//! ```

use bio::bio_types::strand::Strand;

use crate::constants::{
    HARD_MISMATCH_SCORE, MAX_MOTIF_LENGTH, MAX_RIBOSOME_DISTANCE, MIN_CUMULATIVE_SCORE,
    MIN_DISTANCE_FROM_START, MIN_MISMATCH_MOTIF_LENGTH, MIN_MOTIF_LENGTH, MOTIF_SCORE_BASELINE,
    RBS_DESCRIPTIONS, RBS_DOWNSTREAM_DISTANCE, RBS_UPSTREAM_DISTANCE,
};
use crate::sequence::PackedSequence;
use crate::sequence::encoded::EncodedSequence;
use crate::types::RbsWeights;

/// Which consensus comparison to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RbsVariant {
    /// Every base of the sub-window must match AGGAGG
    Exact,
    /// Exactly one base of a 5-6 base sub-window differs
    SingleMismatch,
}

/// Score the region starting at `window_start` against a start codon at
/// `start_codon_position`, returning the winning motif class (0 for none).
#[must_use]
pub fn score(
    sequence: &PackedSequence,
    window_start: usize,
    start_codon_position: usize,
    weights: &RbsWeights,
    variant: RbsVariant,
) -> usize {
    match variant {
        RbsVariant::Exact => {
            shine_dalgarno_exact(sequence, window_start, start_codon_position, weights)
        }
        RbsVariant::SingleMismatch => {
            shine_dalgarno_mm(sequence, window_start, start_codon_position, weights)
        }
    }
}

/// Bases available before the spacer, capped at the motif length.
fn search_limit(search_position: usize, start_codon_position: usize) -> Option<usize> {
    let spacer_start = search_position.checked_add(MIN_DISTANCE_FROM_START)?;
    if start_codon_position <= spacer_start {
        return None;
    }
    Some(MAX_MOTIF_LENGTH.min(start_codon_position - spacer_start))
}

/// Find exact Shine-Dalgarno motifs
#[must_use]
pub fn shine_dalgarno_exact(
    sequence: &PackedSequence,
    search_position: usize,
    start_codon_position: usize,
    ribosome_weights: &RbsWeights,
) -> usize {
    let Some(search_limit) = search_limit(search_position, start_codon_position) else {
        return 0;
    };
    let base_scores = calculate_exact_base_scores(sequence, search_position, search_limit);

    let mut best_motif_index = 0;
    for motif_length in (MIN_MOTIF_LENGTH..=search_limit).rev() {
        for motif_start_offset in 0..=(search_limit - motif_length) {
            if let Some(motif_index) = evaluate_exact_motif(
                &base_scores[motif_start_offset..motif_start_offset + motif_length],
                start_codon_position - (search_position + motif_start_offset + motif_length),
            ) && is_better_motif(motif_index, best_motif_index, ribosome_weights)
            {
                best_motif_index = motif_index;
            }
        }
    }

    best_motif_index
}

fn calculate_exact_base_scores(
    sequence: &PackedSequence,
    search_position: usize,
    search_limit: usize,
) -> Vec<f64> {
    (0..search_limit)
        .map(|pattern_index| {
            let sequence_position = search_position + pattern_index;
            if sequence_position >= sequence.len() {
                return HARD_MISMATCH_SCORE;
            }
            match pattern_index % 3 {
                0 if sequence.is_a(sequence_position) => 2.0,
                1 | 2 if sequence.is_g(sequence_position) => 3.0,
                _ => HARD_MISMATCH_SCORE,
            }
        })
        .collect()
}

fn evaluate_exact_motif(window: &[f64], ribosome_distance: usize) -> Option<usize> {
    if window.iter().any(|&score| score < 0.0) {
        return None;
    }

    let cumulative_score = MOTIF_SCORE_BASELINE + window.iter().sum::<f64>();
    if ribosome_distance > MAX_RIBOSOME_DISTANCE || cumulative_score < MIN_CUMULATIVE_SCORE {
        return None;
    }

    let distance_category = categorize_distance(ribosome_distance, window.len());
    Some(map_score_to_motif_index(
        cumulative_score as i32,
        distance_category,
    ))
}

/// Find Shine-Dalgarno motifs with single mismatch
#[must_use]
pub fn shine_dalgarno_mm(
    sequence: &PackedSequence,
    search_position: usize,
    start_codon_position: usize,
    ribosome_weights: &RbsWeights,
) -> usize {
    let Some(search_limit) = search_limit(search_position, start_codon_position) else {
        return 0;
    };
    let base_scores = calculate_mismatch_base_scores(sequence, search_position, search_limit);

    let mut best_motif_index = 0;
    for motif_length in (MIN_MISMATCH_MOTIF_LENGTH..=search_limit).rev() {
        for motif_start_offset in 0..=(search_limit - motif_length) {
            if let Some(motif_index) = evaluate_mismatch_motif(
                &base_scores[motif_start_offset..motif_start_offset + motif_length],
                start_codon_position - (search_position + motif_start_offset + motif_length),
            ) && is_better_motif(motif_index, best_motif_index, ribosome_weights)
            {
                best_motif_index = motif_index;
            }
        }
    }

    best_motif_index
}

fn calculate_mismatch_base_scores(
    sequence: &PackedSequence,
    search_position: usize,
    search_limit: usize,
) -> Vec<f64> {
    (0..search_limit)
        .map(|pattern_index| {
            let sequence_position = search_position + pattern_index;
            if sequence_position >= sequence.len() {
                return HARD_MISMATCH_SCORE;
            }
            match pattern_index % 3 {
                0 if sequence.is_a(sequence_position) => 2.0,
                0 => -3.0,
                _ if sequence.is_g(sequence_position) => 3.0,
                _ => -2.0,
            }
        })
        .collect()
}

fn evaluate_mismatch_motif(window: &[f64], ribosome_distance: usize) -> Option<usize> {
    let motif_length = window.len();
    let mut cumulative_score = MOTIF_SCORE_BASELINE;
    let mut mismatch_count = 0;

    for (pos_in_motif, &score) in window.iter().enumerate() {
        cumulative_score += score;
        if score < 0.0 {
            mismatch_count += 1;
            // mismatches on the two outermost bases at either end
            if pos_in_motif <= 1 || pos_in_motif >= motif_length - 2 {
                cumulative_score += HARD_MISMATCH_SCORE;
            }
        }
    }

    if mismatch_count != 1 {
        return None;
    }

    if ribosome_distance > MAX_RIBOSOME_DISTANCE || cumulative_score < MIN_CUMULATIVE_SCORE {
        return None;
    }

    Some(map_mismatch_score_to_motif_index(
        cumulative_score as i32,
        categorize_mismatch_distance(ribosome_distance),
    ))
}

const fn categorize_distance(ribosome_distance: usize, motif_length: usize) -> usize {
    match ribosome_distance {
        0..=4 if motif_length < 5 => 2,
        0..=4 => 1,
        5..=10 => 0,
        11..=12 if motif_length < 5 => 1,
        11..=12 => 2,
        _ => 3,
    }
}

const fn categorize_mismatch_distance(ribosome_distance: usize) -> usize {
    match ribosome_distance {
        0..=4 => 1,
        5..=10 => 0,
        11..=12 => 2,
        _ => 3,
    }
}

const fn map_score_to_motif_index(score: i32, distance_category: usize) -> usize {
    match (score, distance_category) {
        (6, 2) => 1,
        (6, 3) => 2,
        (8 | 9, 3) => 3,
        (6, 1) => 6,
        (11 | 12 | 14, 3) => 10,
        (8 | 9, 2) => 11,
        (8 | 9, 1) => 12,
        (6, 0) => 13,
        (8, 0) => 15,
        (9, 0) => 16,
        (11 | 12, 2) => 20,
        (11, 1) => 21,
        (11, 0) => 22,
        (12, 1) => 23,
        (12, 0) => 24,
        (14, 2) => 25,
        (14, 1) => 26,
        (14, 0) => 27,
        _ => 0,
    }
}

const fn map_mismatch_score_to_motif_index(score: i32, distance_category: usize) -> usize {
    match (score, distance_category) {
        (6 | 7, 3) => 2,
        (9, 3) => 3,
        (6, 2) => 4,
        (6, 1) => 5,
        (6, 0) => 9,
        (7, 2) => 7,
        (7, 1) => 8,
        (7, 0) => 14,
        (9, 2) => 17,
        (9, 1) => 18,
        (9, 0) => 19,
        _ => 0,
    }
}

/// Higher weight wins; equal weights go to the lower class.
fn is_better_motif(current_index: usize, best_index: usize, ribosome_weights: &RbsWeights) -> bool {
    ribosome_weights[current_index] > ribosome_weights[best_index]
        || (ribosome_weights[current_index] == ribosome_weights[best_index]
            && current_index < best_index)
}

/// Motif text and spacer range for a class, e.g. `("AGGAGG", "5-10bp")`.
#[must_use]
pub fn motif_description(class: usize) -> Option<(&'static str, &'static str)> {
    RBS_DESCRIPTIONS.get(class).copied()
}

/// Best exact and single-mismatch classes upstream of one start codon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RbsCall {
    pub exact: usize,
    pub mismatch: usize,
}

impl RbsCall {
    /// Weight of the stronger of the two calls.
    #[must_use]
    pub fn weight(&self, weights: &RbsWeights) -> f64 {
        weights[self.exact].max(weights[self.mismatch])
    }
}

/// Scan every window start from 20 to 6 bases upstream of a start codon.
///
/// `start` is the forward-strand index of the first base of the start codon as
/// read on `strand`; reverse-strand starts are converted to reverse-complement
/// coordinates before scanning. Returns `None` for [`Strand::Unknown`] or a
/// start outside the sequence.
#[must_use]
pub fn scan_upstream(
    encoded: &EncodedSequence,
    start: usize,
    strand: Strand,
    weights: &RbsWeights,
) -> Option<RbsCall> {
    let sequence_length = encoded.len();
    if start >= sequence_length {
        return None;
    }

    let target_pos = match strand {
        Strand::Forward => start,
        Strand::Reverse => sequence_length - 1 - start,
        Strand::Unknown => return None,
    };
    let sequence = encoded.strand(strand)?;

    let search_start = target_pos.saturating_sub(RBS_UPSTREAM_DISTANCE);
    let search_end = target_pos.saturating_sub(RBS_DOWNSTREAM_DISTANCE);

    let mut call = RbsCall::default();
    for window_start in search_start..=search_end {
        let exact = shine_dalgarno_exact(sequence, window_start, target_pos, weights);
        if is_better_motif(exact, call.exact, weights) {
            call.exact = exact;
        }
        let mismatch = shine_dalgarno_mm(sequence, window_start, target_pos, weights);
        if is_better_motif(mismatch, call.mismatch, weights) {
            call.mismatch = mismatch;
        }
    }

    Some(call)
}
