//! Per-transcript structural record: parsed header, longest ORF and motif hits.

pub mod builder;

pub use builder::TranscriptBuilder;

use crate::header::TranscriptHeader;
use crate::orf::OrfResult;
use crate::prosite::MotifMatches;

/// Default separator between motif entries in display strings.
pub const DEFAULT_MOTIF_SEPARATOR: &str = "<br/>";

/// A fully analyzed transcript. Immutable once built by [`TranscriptBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    header: TranscriptHeader,
    cdna: Vec<u8>,
    orf: OrfResult,
    motifs: MotifMatches,
}

impl Transcript {
    /// Version-stripped transcript id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.header.transcript_id()
    }

    #[must_use]
    pub fn gene_id(&self) -> &str {
        self.header.gene_id()
    }

    #[must_use]
    pub fn gene_symbol(&self) -> &str {
        &self.header.gene_symbol
    }

    #[must_use]
    pub fn header(&self) -> &TranscriptHeader {
        &self.header
    }

    #[must_use]
    pub fn cdna(&self) -> &[u8] {
        &self.cdna
    }

    #[must_use]
    pub fn orf(&self) -> &OrfResult {
        &self.orf
    }

    #[must_use]
    pub fn motifs(&self) -> &MotifMatches {
        &self.motifs
    }

    #[must_use]
    pub fn has_orf(&self) -> bool {
        self.orf.has_orf()
    }

    #[must_use]
    pub fn cdna_len(&self) -> usize {
        self.cdna.len()
    }

    /// Peptide length in residues, stop codon excluded; 0 without an ORF.
    #[must_use]
    pub fn peptide_len(&self) -> usize {
        self.orf.peptide_len()
    }

    /// `PS00001: pos:12;40` entries joined by `separator`; empty without motifs.
    #[must_use]
    pub fn motif_display(&self, separator: &str) -> String {
        self.motifs
            .iter()
            .map(|(id, positions)| {
                let positions: Vec<String> = positions.iter().map(ToString::to_string).collect();
                format!("{id}: pos:{}", positions.join(";"))
            })
            .collect::<Vec<_>>()
            .join(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orf::OrfFinder;

    const HEADER: &str = "ENST00000000001.2 cdna chromosome:GRCh38:1:100:400:1 gene:ENSG00000000001.5 \
        gene_biotype:protein_coding transcript_biotype:protein_coding gene_symbol:GENE1";

    fn builder(seq: &[u8]) -> TranscriptBuilder {
        TranscriptBuilder::from_record(HEADER, seq.to_vec(), &OrfFinder::default()).unwrap()
    }

    #[test]
    fn lengths() {
        let t = builder(b"CCATGGCATGCTAAGG").build();
        assert_eq!(t.cdna_len(), 16);
        assert_eq!(t.peptide_len(), 3);
        assert!(t.has_orf());
        assert_eq!(t.id(), "ENST00000000001");
        assert_eq!(t.gene_id(), "ENSG00000000001");
        assert_eq!(t.gene_symbol(), "GENE1");
    }

    #[test]
    fn no_orf_has_zero_peptide_length() {
        let t = builder(b"CCCCCCCCC").build();
        assert!(!t.has_orf());
        assert_eq!(t.peptide_len(), 0);
        assert_eq!(t.cdna_len(), 9);
    }

    #[test]
    fn motif_display_string() {
        let mut b = builder(b"ATG");
        b.add_motif("PS00001", vec![12]);
        b.add_motif("PS00004", vec![3, 17]);
        let t = b.build();
        assert_eq!(t.motif_display("<br/>"), "PS00001: pos:12<br/>PS00004: pos:3;17");
        assert_eq!(t.motif_display("\n"), "PS00001: pos:12\nPS00004: pos:3;17");
    }

    #[test]
    fn motif_display_empty() {
        let t = builder(b"ATG").build();
        assert_eq!(t.motif_display(DEFAULT_MOTIF_SEPARATOR), "");
    }
}
