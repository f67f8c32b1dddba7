use bio::bio_types::strand::Strand;

use crate::{
    config::SequenceConfig,
    constants::{MASK_SIZE, MAX_SEQUENCE_LENGTH},
    sequence::PackedSequence,
    types::{Mask, SequenceError},
};

/// A sequence together with its reverse complement.
///
/// Both strands are frozen once built; downstream stages read them
/// concurrently without locking. The reverse complement is always derived
/// from the forward strand, so the fields are only reachable through
/// accessors.
///
/// ```compile_fail
/// use prokseq_core::sequence::PackedSequence;
/// use prokseq_core::sequence::encoded::EncodedSequence;
///
/// let mut encoded = EncodedSequence::without_masking(b"ACGTACGT").unwrap();
/// encoded.reverse_complement_sequence = PackedSequence::from_ascii(b"AC").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct EncodedSequence {
    forward_sequence: PackedSequence,
    reverse_complement_sequence: PackedSequence,
    masks: Vec<Mask>,
    gc_content: f64,
    sequence_length: usize,
}

impl EncodedSequence {
    /// Encode and record runs of `N` as masks.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::CapacityExceeded`] beyond the default maximum.
    pub fn with_masking(sequence: &[u8]) -> Result<Self, SequenceError> {
        Self::encode(sequence, MAX_SEQUENCE_LENGTH, true)
    }

    /// Encode without looking for masks.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::CapacityExceeded`] beyond the default maximum.
    pub fn without_masking(sequence: &[u8]) -> Result<Self, SequenceError> {
        Self::encode(sequence, MAX_SEQUENCE_LENGTH, false)
    }

    /// Encode with the length limit and masking choice of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::CapacityExceeded`] beyond
    /// `config.max_sequence_length`.
    pub fn from_config(sequence: &[u8], config: &SequenceConfig) -> Result<Self, SequenceError> {
        Self::encode(sequence, config.max_sequence_length, config.mask_n_runs)
    }

    fn encode(sequence: &[u8], maximum: usize, do_mask: bool) -> Result<Self, SequenceError> {
        let forward_sequence = PackedSequence::from_ascii_with_limit(sequence, maximum)?;
        let masks = if do_mask {
            find_n_runs(sequence)
        } else {
            Vec::new()
        };
        Ok(Self::from_packed(forward_sequence, masks))
    }

    /// Pair an already built forward strand with its reverse complement.
    #[must_use]
    pub fn from_packed(forward_sequence: PackedSequence, masks: Vec<Mask>) -> Self {
        let reverse_complement_sequence = forward_sequence.reverse_complement();
        let gc_content = forward_sequence.gc_fraction();
        let sequence_length = forward_sequence.len();

        Self {
            forward_sequence,
            reverse_complement_sequence,
            masks,
            gc_content,
            sequence_length,
        }
    }

    #[must_use]
    pub const fn forward(&self) -> &PackedSequence {
        &self.forward_sequence
    }

    #[must_use]
    pub const fn reverse_complement(&self) -> &PackedSequence {
        &self.reverse_complement_sequence
    }

    /// Runs of `N` found while encoding, as inclusive ranges.
    #[must_use]
    pub fn masks(&self) -> &[Mask] {
        &self.masks
    }

    /// GC fraction of the forward strand.
    #[must_use]
    pub const fn gc_content(&self) -> f64 {
        self.gc_content
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.sequence_length
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sequence_length == 0
    }

    /// The strand read in the given direction; `None` for [`Strand::Unknown`].
    #[must_use]
    pub const fn strand(&self, strand: Strand) -> Option<&PackedSequence> {
        match strand {
            Strand::Forward => Some(&self.forward_sequence),
            Strand::Reverse => Some(&self.reverse_complement_sequence),
            Strand::Unknown => None,
        }
    }
}

/// Runs of at least [`MASK_SIZE`] `N`/`n` characters, as inclusive ranges.
#[must_use]
pub fn find_n_runs(sequence: &[u8]) -> Vec<Mask> {
    let mut masks = Vec::new();
    let mut mask_start: Option<usize> = None;

    for (i, &byte) in sequence.iter().enumerate() {
        let is_n = byte == b'N' || byte == b'n';
        match mask_start {
            Some(start) if !is_n => {
                if i - start >= MASK_SIZE {
                    masks.push(Mask {
                        begin: start,
                        end: i - 1,
                    });
                }
                mask_start = None;
            }
            None if is_n => mask_start = Some(i),
            _ => {}
        }
    }

    if let Some(start) = mask_start
        && sequence.len() - start >= MASK_SIZE
    {
        masks.push(Mask {
            begin: start,
            end: sequence.len() - 1,
        });
    }

    masks
}
