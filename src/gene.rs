//! Grouping transcripts by gene and isoform-specific motif differences.
//!
//! Transcripts live in one flat arena; each gene keeps the indices of its
//! transcripts in first-seen order.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::Error;
use crate::transcript::Transcript;

#[derive(Debug, Clone)]
struct GeneEntry {
    id: String,
    symbol: String,
    members: Vec<usize>,
}

/// All analyzed transcripts, grouped by gene id.
#[derive(Debug, Clone, Default)]
pub struct GeneSet {
    transcripts: Vec<Transcript>,
    genes: Vec<GeneEntry>,
    gene_index: HashMap<String, usize>,
    symbol_index: HashMap<String, usize>,
    transcript_ids: HashSet<String>,
}

impl GeneSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble transcripts in input order.
    pub fn from_transcripts<I>(transcripts: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Transcript>,
    {
        let mut set = Self::new();
        for transcript in transcripts {
            set.add(transcript)?;
        }
        Ok(set)
    }

    /// Add a transcript to its gene, creating the gene on first sight.
    pub fn add(&mut self, transcript: Transcript) -> Result<(), Error> {
        if !self.transcript_ids.insert(transcript.id().to_string()) {
            return Err(Error::Validation(format!(
                "duplicate transcript id: {}",
                transcript.id()
            )));
        }

        let gene_idx = match self.gene_index.get(transcript.gene_id()) {
            Some(&idx) => idx,
            None => {
                let idx = self.genes.len();
                self.genes.push(GeneEntry {
                    id: transcript.gene_id().to_string(),
                    symbol: transcript.gene_symbol().to_string(),
                    members: Vec::new(),
                });
                self.gene_index.insert(transcript.gene_id().to_string(), idx);
                self.symbol_index
                    .entry(transcript.gene_symbol().to_string())
                    .or_insert(idx);
                idx
            }
        };

        self.genes[gene_idx].members.push(self.transcripts.len());
        self.transcripts.push(transcript);
        Ok(())
    }

    /// Genes in first-seen order.
    pub fn genes(&self) -> impl Iterator<Item = Gene<'_>> {
        self.genes.iter().map(|entry| Gene { set: self, entry })
    }

    #[must_use]
    pub fn gene(&self, gene_id: &str) -> Option<Gene<'_>> {
        self.gene_index.get(gene_id).map(|&idx| Gene {
            set: self,
            entry: &self.genes[idx],
        })
    }

    /// First gene seen with this symbol.
    #[must_use]
    pub fn gene_by_symbol(&self, symbol: &str) -> Option<Gene<'_>> {
        self.symbol_index.get(symbol).map(|&idx| Gene {
            set: self,
            entry: &self.genes[idx],
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    #[must_use]
    pub fn transcript_count(&self) -> usize {
        self.transcripts.len()
    }
}

/// Borrowed view of one gene and its transcripts.
#[derive(Debug, Clone, Copy)]
pub struct Gene<'a> {
    set: &'a GeneSet,
    entry: &'a GeneEntry,
}

impl<'a> Gene<'a> {
    #[must_use]
    pub fn id(&self) -> &'a str {
        &self.entry.id
    }

    #[must_use]
    pub fn symbol(&self) -> &'a str {
        &self.entry.symbol
    }

    /// Transcripts in first-seen order.
    pub fn transcripts(self) -> impl Iterator<Item = &'a Transcript> {
        let set = self.set;
        self.entry.members.iter().map(move |&i| &set.transcripts[i])
    }

    #[must_use]
    pub fn transcript_count(&self) -> usize {
        self.entry.members.len()
    }

    #[must_use]
    pub fn transcript(&self, transcript_id: &str) -> Option<&'a Transcript> {
        self.transcripts().find(|t| t.id() == transcript_id)
    }

    /// Motif ids present in `transcript_id` and absent from every other
    /// transcript of this gene. Empty for single-transcript genes and for
    /// ids that are not part of the gene.
    #[must_use]
    pub fn difference(&self, transcript_id: &str) -> BTreeSet<&'a str> {
        if self.transcript_count() < 2 {
            return BTreeSet::new();
        }
        let Some(target) = self.transcript(transcript_id) else {
            return BTreeSet::new();
        };
        let siblings: HashSet<&str> = self
            .transcripts()
            .filter(|t| t.id() != transcript_id)
            .flat_map(|t| t.motifs().ids())
            .collect();
        target
            .motifs()
            .ids()
            .filter(|id| !siblings.contains(id))
            .collect()
    }

    /// Every transcript paired with its difference set, in first-seen order.
    #[must_use]
    pub fn differences(&self) -> Vec<(&'a Transcript, BTreeSet<&'a str>)> {
        self.transcripts()
            .map(|t| (t, self.difference(t.id())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orf::OrfFinder;
    use crate::transcript::TranscriptBuilder;

    fn transcript(tx: &str, gene: &str, symbol: &str, motifs: &[(&str, usize)]) -> Transcript {
        let header = format!(
            "{tx}.1 cdna chromosome:GRCh38:1:1:100:1 gene:{gene}.1 gene_biotype:protein_coding \
             transcript_biotype:protein_coding gene_symbol:{symbol}"
        );
        let mut b =
            TranscriptBuilder::from_record(&header, b"ATGAAATAG".to_vec(), &OrfFinder::default())
                .unwrap();
        for (id, pos) in motifs {
            b.add_motif(*id, vec![*pos]);
        }
        b.build()
    }

    #[test]
    fn single_transcript_gene_has_no_difference() {
        let set = GeneSet::from_transcripts([transcript(
            "ENST01",
            "ENSG01",
            "A",
            &[("PS00001", 3)],
        )])
        .unwrap();
        let gene = set.gene("ENSG01").unwrap();
        assert!(gene.difference("ENST01").is_empty());
    }

    #[test]
    fn motif_unique_to_one_transcript() {
        let set = GeneSet::from_transcripts([
            transcript("ENST01", "ENSG01", "A", &[("PS00001", 12)]),
            transcript("ENST02", "ENSG01", "A", &[]),
        ])
        .unwrap();
        let gene = set.gene("ENSG01").unwrap();
        assert_eq!(gene.difference("ENST01").into_iter().collect::<Vec<_>>(), vec!["PS00001"]);
        assert!(gene.difference("ENST02").is_empty());
    }

    #[test]
    fn shared_motifs_are_not_differences() {
        let set = GeneSet::from_transcripts([
            transcript("ENST01", "ENSG01", "A", &[("M1", 1), ("M2", 2)]),
            transcript("ENST02", "ENSG01", "A", &[("M1", 5)]),
            transcript("ENST03", "ENSG01", "A", &[("M2", 9), ("M3", 1)]),
        ])
        .unwrap();
        let gene = set.gene("ENSG01").unwrap();
        assert!(gene.difference("ENST01").is_empty());
        assert!(gene.difference("ENST02").is_empty());
        assert_eq!(gene.difference("ENST03").into_iter().collect::<Vec<_>>(), vec!["M3"]);
    }

    #[test]
    fn difference_is_sorted() {
        let set = GeneSet::from_transcripts([
            transcript("ENST01", "ENSG01", "A", &[("PS9", 1), ("PS1", 2)]),
            transcript("ENST02", "ENSG01", "A", &[]),
        ])
        .unwrap();
        let diff = set.gene("ENSG01").unwrap().difference("ENST01");
        assert_eq!(diff.into_iter().collect::<Vec<_>>(), vec!["PS1", "PS9"]);
    }

    #[test]
    fn groups_preserve_first_seen_order() {
        let set = GeneSet::from_transcripts([
            transcript("ENST03", "ENSG02", "B", &[]),
            transcript("ENST01", "ENSG01", "A", &[]),
            transcript("ENST02", "ENSG02", "B", &[]),
        ])
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.transcript_count(), 3);
        let genes: Vec<&str> = set.genes().map(|g| g.id()).collect();
        assert_eq!(genes, vec!["ENSG02", "ENSG01"]);
        let b = set.gene_by_symbol("B").unwrap();
        let ids: Vec<&str> = b.transcripts().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["ENST03", "ENST02"]);
        assert!(b.transcripts().all(|t| t.gene_id() == b.id()));
    }

    #[test]
    fn duplicate_transcript_rejected() {
        let mut set = GeneSet::new();
        set.add(transcript("ENST01", "ENSG01", "A", &[])).unwrap();
        let err = set.add(transcript("ENST01", "ENSG01", "A", &[])).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn unknown_transcript_has_empty_difference() {
        let set = GeneSet::from_transcripts([transcript("ENST01", "ENSG01", "A", &[("M", 1)])])
            .unwrap();
        assert!(set.gene("ENSG01").unwrap().difference("ENST99").is_empty());
        assert!(set.gene("ENSG99").is_none());
    }

    #[test]
    fn differences_for_all_transcripts() {
        let set = GeneSet::from_transcripts([
            transcript("ENST01", "ENSG01", "A", &[("M1", 1)]),
            transcript("ENST02", "ENSG01", "A", &[("M2", 1)]),
        ])
        .unwrap();
        let diffs = set.gene("ENSG01").unwrap().differences();
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].0.id(), "ENST01");
        assert!(diffs[0].1.contains("M1"));
        assert!(diffs[1].1.contains("M2"));
    }
}
