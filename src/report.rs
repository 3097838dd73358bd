//! Render-ready per-gene report model.

use serde::Serialize;

use crate::gene::{Gene, GeneSet};
use crate::stats::{Statistic, StatisticsTable};

/// Display value for a transcript without isoform-specific motifs.
pub const NO_DIFFERENCE: &str = "none";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptReport {
    pub transcript_id: String,
    pub cdna_len: usize,
    pub peptide_len: usize,
    pub has_p_value: bool,
    pub fold_change: Option<f64>,
    pub p_value: Option<f64>,
    pub corrected_p_value: Option<f64>,
    pub motifs: String,
    pub difference: String,
    pub has_difference: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneReport {
    pub symbol: String,
    pub gene_id: String,
    pub fold_change: f64,
    pub p_value: f64,
    pub corrected_p_value: f64,
    pub transcript_count: usize,
    pub transcripts: Vec<TranscriptReport>,
}

impl GeneReport {
    /// Join one gene with its gene-level result. Transcript-level values come
    /// from `stats` when present and stay `None` otherwise.
    #[must_use]
    pub fn build(
        gene: Gene<'_>,
        gene_stat: &Statistic,
        stats: &StatisticsTable,
        motif_separator: &str,
    ) -> Self {
        let transcripts = gene
            .differences()
            .into_iter()
            .map(|(transcript, difference)| {
                let tx_stat = stats.transcript(transcript.id());
                let has_difference = !difference.is_empty();
                TranscriptReport {
                    transcript_id: transcript.id().to_string(),
                    cdna_len: transcript.cdna_len(),
                    peptide_len: transcript.peptide_len(),
                    has_p_value: tx_stat.is_some(),
                    fold_change: tx_stat.map(|s| s.fold_change),
                    p_value: tx_stat.map(|s| s.p_value),
                    corrected_p_value: tx_stat.map(|s| s.corrected_p_value),
                    motifs: transcript.motif_display(motif_separator),
                    difference: if has_difference {
                        difference.into_iter().collect::<Vec<_>>().join(";")
                    } else {
                        NO_DIFFERENCE.to_string()
                    },
                    has_difference,
                }
            })
            .collect();

        Self {
            symbol: gene.symbol().to_string(),
            gene_id: gene.id().to_string(),
            fold_change: gene_stat.fold_change,
            p_value: gene_stat.p_value,
            corrected_p_value: gene_stat.corrected_p_value,
            transcript_count: gene.transcript_count(),
            transcripts,
        }
    }
}

/// Reports for every gene with a gene-level result, in first-seen gene order.
/// Genes whose symbol has no result are left out.
#[must_use]
pub fn build_reports(
    genes: &GeneSet,
    stats: &StatisticsTable,
    motif_separator: &str,
) -> Vec<GeneReport> {
    genes
        .genes()
        .filter_map(|gene| {
            stats
                .gene(gene.symbol())
                .map(|stat| GeneReport::build(gene, stat, stats, motif_separator))
        })
        .collect()
}
