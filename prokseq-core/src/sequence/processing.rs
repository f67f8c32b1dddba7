use log::debug;
use rayon::prelude::*;

use super::PackedSequence;
use super::encoded::EncodedSequence;
use crate::constants::{MAX_KMER_LENGTH, READING_FRAMES};
use crate::types::{ReadingFrame, SequenceError};

/// Per-position reading frame with the most GC in its third codon position.
///
/// Positions past the last complete triplet are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcFrameProfile {
    frames: Vec<Option<ReadingFrame>>,
}

impl GcFrameProfile {
    #[must_use]
    pub fn get(&self, position: usize) -> Option<ReadingFrame> {
        self.frames.get(position).copied().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Option<ReadingFrame>] {
        &self.frames
    }
}

/// Calculate most GC-rich frame for each position
///
/// For every position the GC count of same-phase bases in a window of
/// `window` bases centered on it is computed from cumulative counts in both
/// directions. Each codon triplet then takes the frame whose total is highest.
///
/// # Errors
///
/// Returns [`SequenceError::InvalidWindow`] for a window narrower than a codon.
pub fn calc_most_gc_frame(
    sequence: &PackedSequence,
    window: usize,
) -> Result<GcFrameProfile, SequenceError> {
    if window < READING_FRAMES {
        return Err(SequenceError::InvalidWindow(window));
    }

    let sequence_length = sequence.len();
    if sequence_length < READING_FRAMES {
        return Ok(GcFrameProfile {
            frames: vec![None; sequence_length],
        });
    }

    let forward_gc_counts = calculate_forward_gc_counts(sequence);
    let backward_gc_counts = calculate_backward_gc_counts(sequence);
    let total_gc_counts =
        calculate_total_gc_counts(&forward_gc_counts, &backward_gc_counts, sequence, window);

    Ok(GcFrameProfile {
        frames: assign_gc_rich_frames(&total_gc_counts),
    })
}

fn calculate_forward_gc_counts(sequence: &PackedSequence) -> Vec<i32> {
    let sequence_length = sequence.len();
    let mut counts = vec![0; sequence_length];

    for position in 0..sequence_length {
        let gc = i32::from(sequence.is_gc(position));
        counts[position] = if position < READING_FRAMES {
            gc
        } else {
            counts[position - READING_FRAMES] + gc
        };
    }

    counts
}

fn calculate_backward_gc_counts(sequence: &PackedSequence) -> Vec<i32> {
    let sequence_length = sequence.len();
    let mut counts = vec![0; sequence_length];

    for position in (0..sequence_length).rev() {
        let gc = i32::from(sequence.is_gc(position));
        counts[position] = if position + READING_FRAMES >= sequence_length {
            gc
        } else {
            counts[position + READING_FRAMES] + gc
        };
    }

    counts
}

fn calculate_total_gc_counts(
    forward_counts: &[i32],
    backward_counts: &[i32],
    sequence: &PackedSequence,
    window: usize,
) -> Vec<i32> {
    let half_window = window / 2;
    let sequence_length = sequence.len();

    (0..sequence_length)
        .map(|position| {
            let mut total = forward_counts[position] + backward_counts[position]
                - i32::from(sequence.is_gc(position));

            if position >= half_window {
                total -= forward_counts[position - half_window];
            }

            if position + half_window < sequence_length {
                total -= backward_counts[position + half_window];
            }

            total
        })
        .collect()
}

fn assign_gc_rich_frames(total_gc_counts: &[i32]) -> Vec<Option<ReadingFrame>> {
    let sequence_length = total_gc_counts.len();
    let mut gc_rich_frames = vec![None; sequence_length];

    for triplet_start in (0..sequence_length.saturating_sub(2)).step_by(READING_FRAMES) {
        let best = find_max_reading_frame(
            total_gc_counts[triplet_start],
            total_gc_counts[triplet_start + 1],
            total_gc_counts[triplet_start + 2],
        );
        gc_rich_frames[triplet_start..triplet_start + READING_FRAMES].fill(Some(best));
    }

    gc_rich_frames
}

/// Pick the frame with the highest value; ties go to the lower frame.
#[must_use]
pub const fn find_max_reading_frame(
    frame_0_value: i32,
    frame_1_value: i32,
    frame_2_value: i32,
) -> ReadingFrame {
    if frame_0_value >= frame_1_value {
        if frame_0_value >= frame_2_value {
            ReadingFrame::Zero
        } else {
            ReadingFrame::Two
        }
    } else if frame_1_value >= frame_2_value {
        ReadingFrame::One
    } else {
        ReadingFrame::Two
    }
}

/// Word frequencies over both strands of a sequence.
///
/// Bin `b` holds the words whose `2k` stored bits, read low bit first, spell
/// `b`; see [`mer_text`](super::mer_text) for turning a bin back into bases.
#[derive(Debug, Clone, PartialEq)]
pub struct KmerBackground {
    kmer_length: usize,
    counts: Vec<u64>,
    total: u64,
}

impl KmerBackground {
    /// Count every word of length `kmer_length` on both strands.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidKmerLength`] outside 1..=12.
    pub fn build(encoded: &EncodedSequence, kmer_length: usize) -> Result<Self, SequenceError> {
        if !(1..=MAX_KMER_LENGTH).contains(&kmer_length) {
            return Err(SequenceError::InvalidKmerLength(kmer_length));
        }

        let size = 1usize << (2 * kmer_length);
        let sequence_length = encoded.len();
        if sequence_length < kmer_length {
            return Ok(Self {
                kmer_length,
                counts: vec![0; size],
                total: 0,
            });
        }

        let windows = sequence_length - kmer_length + 1;
        let forward = encoded.forward();
        let reverse = encoded.reverse_complement();

        let chunk_size = std::cmp::max(1000, windows / rayon::current_num_threads());
        let counts: Vec<u64> = (0..windows)
            .into_par_iter()
            .chunks(chunk_size)
            .map(|chunk| {
                let mut local_counts = vec![0u64; size];

                for i in chunk {
                    local_counts[forward.kmer_index(kmer_length, i)] += 1;
                    local_counts[reverse.kmer_index(kmer_length, i)] += 1;
                }

                local_counts
            })
            .reduce(
                || vec![0u64; size],
                |mut acc, local_counts| {
                    for (total, count) in acc.iter_mut().zip(local_counts) {
                        *total += count;
                    }
                    acc
                },
            );

        let total = 2 * windows as u64;
        debug!("Counted {total} words of length {kmer_length} over {size} bins");

        Ok(Self {
            kmer_length,
            counts,
            total,
        })
    }

    #[must_use]
    pub const fn kmer_length(&self) -> usize {
        self.kmer_length
    }

    /// Number of bins (`4^k`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Words counted over both strands.
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn raw_count(&self, index: usize) -> u64 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    /// Share of all counted words falling in bin `index`.
    #[must_use]
    pub fn frequency(&self, index: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.raw_count(index) as f64 / self.total as f64
        }
    }

    #[must_use]
    pub fn frequencies(&self) -> Vec<f64> {
        (0..self.counts.len()).map(|i| self.frequency(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::constants::SLIDING_WINDOW_SIZE;
    use crate::sequence::mer_text;

    fn packed(sequence: &[u8]) -> PackedSequence {
        PackedSequence::from_ascii(sequence).unwrap()
    }

    #[test]
    fn test_calc_most_gc_frame_basic() {
        let sequence = packed(b"ATCGGCGCGCTAATCGGCGC");
        let result = calc_most_gc_frame(&sequence, SLIDING_WINDOW_SIZE).unwrap();
        assert_eq!(result.len(), sequence.len());
        assert!(result.as_slice()[..18].iter().all(Option::is_some));
        assert_eq!(result.get(18), None);
        assert_eq!(result.get(19), None);
    }

    #[test]
    fn test_calc_most_gc_frame_short_sequences() {
        assert!(calc_most_gc_frame(&packed(b""), 120).unwrap().is_empty());

        let short = calc_most_gc_frame(&packed(b"GC"), 120).unwrap();
        assert_eq!(short.as_slice(), &[None, None]);
    }

    #[test]
    fn test_calc_most_gc_frame_rejects_narrow_window() {
        assert_eq!(
            calc_most_gc_frame(&packed(b"ACGT"), 2),
            Err(SequenceError::InvalidWindow(2))
        );
    }

    #[test]
    fn test_uniform_sequence_resolves_to_frame_zero() {
        let sequence = packed(&[b'G'; 300]);
        let profile = calc_most_gc_frame(&sequence, 120).unwrap();
        assert!(
            profile
                .as_slice()
                .iter()
                .all(|frame| *frame == Some(ReadingFrame::Zero))
        );
    }

    #[test]
    fn test_gc_rich_third_position_wins() {
        // Only the third base of each codon is G
        let sequence = packed(&b"AAG".repeat(40));
        let profile = calc_most_gc_frame(&sequence, 120).unwrap();
        assert_eq!(profile.get(0), Some(ReadingFrame::Two));
        assert_eq!(profile.get(60), Some(ReadingFrame::Two));
        assert_eq!(profile.get(119), Some(ReadingFrame::Two));
    }

    #[test]
    fn test_find_max_reading_frame_ties() {
        assert_eq!(find_max_reading_frame(1, 1, 1), ReadingFrame::Zero);
        assert_eq!(find_max_reading_frame(1, 2, 2), ReadingFrame::One);
        assert_eq!(find_max_reading_frame(2, 1, 2), ReadingFrame::Zero);
        assert_eq!(find_max_reading_frame(0, 1, 2), ReadingFrame::Two);
        assert_eq!(find_max_reading_frame(3, 1, 2), ReadingFrame::Zero);
    }

    #[test]
    fn test_assign_gc_rich_frames_basic() {
        let result = assign_gc_rich_frames(&[5, 3, 8, 2, 7, 1, 9, 4]);
        assert_eq!(result.len(), 8);
        assert_eq!(result[0], Some(ReadingFrame::Two));
        assert_eq!(result[3], Some(ReadingFrame::One));
        assert_eq!(result[6], None);
        assert_eq!(result[7], None);
    }

    #[test]
    fn test_background_frequencies_sum_to_one() {
        let encoded = EncodedSequence::without_masking(b"ATGCGTAACCGGTTAAGC").unwrap();
        let background = KmerBackground::build(&encoded, 1).unwrap();

        assert_eq!(background.len(), 4);
        assert_eq!(background.total_count(), 36);
        assert_relative_eq!(background.frequencies().iter().sum::<f64>(), 1.0);
        for bin in 0..4 {
            assert_relative_eq!(
                background.frequency(bin) * background.total_count() as f64,
                background.raw_count(bin) as f64,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_background_counts_both_strands() {
        let encoded = EncodedSequence::without_masking(b"AAAA").unwrap();
        let background = KmerBackground::build(&encoded, 2).unwrap();

        let aa = (0..16).find(|&i| mer_text(2, i) == "AA").unwrap();
        let tt = (0..16).find(|&i| mer_text(2, i) == "TT").unwrap();
        assert_eq!(background.raw_count(aa), 3);
        assert_eq!(background.raw_count(tt), 3);
        assert_relative_eq!(background.frequency(aa), 0.5);
        assert_eq!(background.raw_count(16), 0);
    }

    #[test]
    fn test_background_shorter_than_word() {
        let encoded = EncodedSequence::without_masking(b"ACG").unwrap();
        let background = KmerBackground::build(&encoded, 6).unwrap();

        assert_eq!(background.len(), 4096);
        assert_eq!(background.total_count(), 0);
        assert!(background.frequencies().iter().all(|&f| f == 0.0));
    }

    #[test]
    fn test_background_rejects_bad_length() {
        let encoded = EncodedSequence::without_masking(b"ACGT").unwrap();
        assert_eq!(
            KmerBackground::build(&encoded, 0),
            Err(SequenceError::InvalidKmerLength(0))
        );
        assert_eq!(
            KmerBackground::build(&encoded, 13),
            Err(SequenceError::InvalidKmerLength(13))
        );
    }
}
