//! Staged construction of [`Transcript`] values.
//!
//! Header, sequence and ORF are fixed when the builder is created; motif hits
//! are collected afterwards and the builder is consumed into an immutable
//! transcript before it reaches gene assembly.

use crate::error::Error;
use crate::header::{TranscriptHeader, parse_header};
use crate::orf::{OrfFinder, OrfResult};
use crate::prosite::{MotifCatalog, MotifMatches, scan};

use super::Transcript;

#[derive(Debug)]
pub struct TranscriptBuilder {
    header: TranscriptHeader,
    cdna: Vec<u8>,
    orf: OrfResult,
    motifs: MotifMatches,
}

impl TranscriptBuilder {
    #[must_use]
    pub fn new(header: TranscriptHeader, cdna: Vec<u8>, orf: OrfResult) -> Self {
        Self {
            header,
            cdna,
            orf,
            motifs: MotifMatches::new(),
        }
    }

    /// Parse the header and run the lenient ORF search on `cdna`.
    pub fn from_record(header: &str, cdna: Vec<u8>, finder: &OrfFinder) -> Result<Self, Error> {
        let header = parse_header(header)?;
        let orf = finder.find(&cdna);
        Ok(Self::new(header, cdna, orf))
    }

    #[must_use]
    pub fn header(&self) -> &TranscriptHeader {
        &self.header
    }

    #[must_use]
    pub fn peptide(&self) -> &[u8] {
        &self.orf.peptide
    }

    /// Record hits for one motif. Empty position lists are ignored.
    pub fn add_motif(&mut self, id: impl Into<String>, positions: Vec<usize>) -> &mut Self {
        self.motifs.insert(id, positions);
        self
    }

    /// Scan the ORF peptide against `catalog` and record every hit.
    pub fn scan_motifs(&mut self, catalog: &MotifCatalog) -> &mut Self {
        let found = scan(&self.orf.peptide, catalog);
        for (id, positions) in found.iter() {
            self.motifs.insert(id, positions.to_vec());
        }
        self
    }

    #[must_use]
    pub fn build(self) -> Transcript {
        Transcript {
            header: self.header,
            cdna: self.cdna,
            orf: self.orf,
            motifs: self.motifs,
        }
    }
}
