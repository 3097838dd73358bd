//! Longest open reading frame detection on the forward strand.
//!
//! An ORF starts at an `ATG` and runs up to, but not including, the first
//! in-frame stop codon. When no stop follows, it runs to the last complete
//! codon of the sequence. The stop codon never counts toward the peptide or
//! the reported coordinates, so `end - start == 3 * peptide.len()` holds.
//!
//! Frames 0, 1 and 2 are scanned in that order and the leftmost start in a
//! frame is seen first; the first ORF with the maximal peptide length wins.

use crate::codon::CodonTable;
use crate::error::Error;

/// Outcome of an ORF search over one nucleotide sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrfResult {
    pub peptide: Vec<u8>,
    pub source_len: usize,
    pub frame: Option<usize>,
    /// 0-based start of the start codon.
    pub start: Option<usize>,
    /// 0-based exclusive end of the last coding codon.
    pub end: Option<usize>,
}

impl OrfResult {
    fn none(source_len: usize) -> Self {
        Self {
            peptide: Vec::new(),
            source_len,
            frame: None,
            start: None,
            end: None,
        }
    }

    #[must_use]
    pub fn has_orf(&self) -> bool {
        self.start.is_some()
    }

    #[must_use]
    pub fn peptide_len(&self) -> usize {
        self.peptide.len()
    }

    #[must_use]
    pub fn peptide_str(&self) -> &str {
        std::str::from_utf8(&self.peptide).unwrap_or_default()
    }
}

/// Finds the longest forward ORF using a codon table.
pub struct OrfFinder {
    table: CodonTable,
    min_peptide_len: usize,
}

impl Default for OrfFinder {
    fn default() -> Self {
        Self::new(0)
    }
}

impl OrfFinder {
    /// ORFs with fewer than `min_peptide_len` residues are reported as absent.
    #[must_use]
    pub fn new(min_peptide_len: usize) -> Self {
        Self {
            table: CodonTable::standard(),
            min_peptide_len,
        }
    }

    /// Lenient search: lowercase bases are accepted, and codons containing any
    /// other symbol translate to `X` and never act as a start or stop.
    #[must_use]
    pub fn find(&self, seq: &[u8]) -> OrfResult {
        let upper = seq.to_ascii_uppercase();
        self.find_longest(&upper)
    }

    /// Strict search: any symbol outside {A,C,G,T} (case-insensitive) is an error.
    pub fn find_strict(&self, seq: &[u8]) -> Result<OrfResult, Error> {
        validate_nucleotides(seq)?;
        Ok(self.find(seq))
    }

    fn find_longest(&self, seq: &[u8]) -> OrfResult {
        let mut best: Option<(usize, usize, usize)> = None; // (frame, start, codon count)

        for frame in 0..3 {
            let mut pos = frame;
            while pos + 3 <= seq.len() {
                if !self.table.is_start(&seq[pos..pos + 3]) {
                    pos += 3;
                    continue;
                }
                let codons = self.coding_codons(seq, pos);
                if best.is_none_or(|(_, _, n)| codons > n) {
                    best = Some((frame, pos, codons));
                }
                // Later starts inside this ORF can only be shorter.
                pos += (codons + 1) * 3;
            }
        }

        match best {
            Some((frame, start, codons)) if codons >= self.min_peptide_len.max(1) => {
                let end = start + codons * 3;
                OrfResult {
                    peptide: self.translate(&seq[start..end]),
                    source_len: seq.len(),
                    frame: Some(frame),
                    start: Some(start),
                    end: Some(end),
                }
            }
            _ => OrfResult::none(seq.len()),
        }
    }

    /// Number of codons from `start` up to the first in-frame stop or the last complete codon.
    fn coding_codons(&self, seq: &[u8], start: usize) -> usize {
        seq[start..]
            .chunks_exact(3)
            .take_while(|codon| !self.table.is_stop(codon))
            .count()
    }

    fn translate(&self, cds: &[u8]) -> Vec<u8> {
        cds.chunks_exact(3)
            .map(|codon| self.table.translate_codon(codon))
            .collect()
    }
}

/// Check that a sequence only contains A, C, G or T (either case).
pub fn validate_nucleotides(seq: &[u8]) -> Result<(), Error> {
    match seq
        .iter()
        .position(|b| !matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T'))
    {
        Some(position) => Err(Error::SequenceAlphabet {
            position,
            symbol: char::from(seq[position]),
        }),
        None => Ok(()),
    }
}

/// Number of symbols outside {A,C,G,T} (either case).
#[must_use]
pub fn count_ambiguous(seq: &[u8]) -> usize {
    seq.iter()
        .filter(|b| !matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T'))
        .count()
}
