//! Differential expression/splicing results (HBA-DEALS style TSV).
//!
//! ```text
//! Gene    Isoform            Explevel  P       Corrected_P
//! TRBV5-5 Expression         1.42      0.0004  0.003
//! TRBV5-5 ENST00000390372.3  0.21      0.02    0.09
//! ```
//!
//! Rows whose isoform is `Expression` are gene-level results keyed by symbol;
//! all other rows are transcript-level results keyed by the version-stripped
//! isoform id. Columns are located by header name. Without a `Corrected_P`
//! column, Benjamini-Hochberg adjusted values are computed separately for the
//! gene-level and the transcript-level p-values.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use serde::Serialize;

use crate::error::Error;
use crate::input;

const GENE_LEVEL_ISOFORM: &str = "Expression";

/// One statistical result for a gene or a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistic {
    pub fold_change: f64,
    pub p_value: f64,
    pub corrected_p_value: f64,
}

/// Gene-level results by symbol and transcript-level results by transcript id.
#[derive(Debug, Clone, Default)]
pub struct StatisticsTable {
    genes: HashMap<String, Statistic>,
    transcripts: HashMap<String, Statistic>,
}

impl StatisticsTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_gene(&mut self, symbol: impl Into<String>, stat: Statistic) {
        self.genes.insert(symbol.into(), stat);
    }

    pub fn insert_transcript(&mut self, transcript_id: impl Into<String>, stat: Statistic) {
        self.transcripts.insert(transcript_id.into(), stat);
    }

    #[must_use]
    pub fn gene(&self, symbol: &str) -> Option<&Statistic> {
        self.genes.get(symbol)
    }

    #[must_use]
    pub fn transcript(&self, transcript_id: &str) -> Option<&Statistic> {
        self.transcripts.get(transcript_id)
    }

    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    #[must_use]
    pub fn transcript_count(&self) -> usize {
        self.transcripts.len()
    }

    /// Load a plain or gzip-compressed results file.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let reader = input::open_text(path)?;
        Self::from_tsv(reader)
    }

    /// Parse a tab-separated results table with a header row.
    pub fn from_tsv<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut lines = reader.lines().enumerate();

        let columns = loop {
            match lines.next() {
                Some((_, line)) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break Columns::from_header(&line)?;
                    }
                }
                None => return Ok(Self::new()),
            }
        };

        let mut gene_rows: Vec<(String, f64, f64, Option<f64>)> = Vec::new();
        let mut transcript_rows: Vec<(String, f64, f64, Option<f64>)> = Vec::new();

        for (line_num, line) in lines {
            let line_num = line_num + 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            let field = |idx: usize, name: &str| {
                fields.get(idx).copied().ok_or_else(|| {
                    Error::Parse(format!("missing column '{name}' (line {line_num})"))
                })
            };
            let number = |idx: usize, name: &str| -> Result<f64, Error> {
                let raw = field(idx, name)?;
                raw.parse::<f64>().map_err(|_| {
                    Error::Parse(format!("invalid {name} value '{raw}' (line {line_num})"))
                })
            };

            let gene = field(columns.gene, "Gene")?.to_string();
            let isoform = field(columns.isoform, "Isoform")?;
            let fold_change = number(columns.explevel, "Explevel")?;
            let p_value = probability(number(columns.p, "P")?, "P", line_num)?;
            let corrected = match columns.corrected {
                Some(idx) => Some(probability(number(idx, "Corrected_P")?, "Corrected_P", line_num)?),
                None => None,
            };

            if isoform == GENE_LEVEL_ISOFORM {
                gene_rows.push((gene, fold_change, p_value, corrected));
            } else {
                let id = isoform.split_once('.').map_or(isoform, |(id, _)| id);
                transcript_rows.push((id.to_string(), fold_change, p_value, corrected));
            }
        }

        let mut table = Self::new();
        for (key, stat) in finish(gene_rows) {
            table.insert_gene(key, stat);
        }
        for (key, stat) in finish(transcript_rows) {
            table.insert_transcript(key, stat);
        }
        Ok(table)
    }
}

struct Columns {
    gene: usize,
    isoform: usize,
    explevel: usize,
    p: usize,
    corrected: Option<usize>,
}

impl Columns {
    fn from_header(line: &str) -> Result<Self, Error> {
        let names: Vec<&str> = line.split('\t').map(str::trim).collect();
        let find = |name: &str| names.iter().position(|n| n.eq_ignore_ascii_case(name));
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                Error::Parse(format!("statistics header is missing column '{name}'"))
            })
        };
        Ok(Self {
            gene: require("Gene")?,
            isoform: require("Isoform")?,
            explevel: require("Explevel")?,
            p: require("P")?,
            corrected: find("Corrected_P"),
        })
    }
}

fn probability(value: f64, name: &str, line_num: usize) -> Result<f64, Error> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::Validation(format!(
            "{name} value {value} outside [0, 1] (line {line_num})"
        )))
    }
}

/// Fill in corrected p-values (BH over the group when any are missing).
fn finish(rows: Vec<(String, f64, f64, Option<f64>)>) -> Vec<(String, Statistic)> {
    let adjusted = if rows.iter().all(|r| r.3.is_some()) {
        None
    } else {
        let p_values: Vec<f64> = rows.iter().map(|r| r.2).collect();
        Some(benjamini_hochberg(&p_values))
    };

    rows.into_iter()
        .enumerate()
        .map(|(i, (key, fold_change, p_value, corrected))| {
            let corrected_p_value = match (&adjusted, corrected) {
                (Some(adjusted), _) => adjusted[i],
                (None, Some(c)) => c,
                (None, None) => p_value,
            };
            (
                key,
                Statistic {
                    fold_change,
                    p_value,
                    corrected_p_value,
                },
            )
        })
        .collect()
}

/// Benjamini-Hochberg adjusted p-values, returned in input order.
#[must_use]
pub fn benjamini_hochberg(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let mut adjusted = vec![0.0; m];
    let mut running_min = 1.0_f64;
    for (rank, &idx) in order.iter().enumerate().rev() {
        let value = p_values[idx] * m as f64 / (rank + 1) as f64;
        running_min = running_min.min(value);
        adjusted[idx] = running_min;
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const RESULTS: &str = "Gene\tIsoform\tExplevel\tP\tCorrected_P
TRBV5-5\tExpression\t1.42\t0.0004\t0.003
TRBV5-5\tENST00000390372.3\t0.21\t0.02\t0.09
GENE2\tExpression\t-0.5\t0.5\t0.8
";

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn gene_and_transcript_rows() {
        let table = StatisticsTable::from_tsv(Cursor::new(RESULTS)).unwrap();
        assert_eq!(table.gene_count(), 2);
        assert_eq!(table.transcript_count(), 1);

        let gene = table.gene("TRBV5-5").unwrap();
        assert!(approx(gene.fold_change, 1.42));
        assert!(approx(gene.p_value, 0.0004));
        assert!(approx(gene.corrected_p_value, 0.003));

        let tx = table.transcript("ENST00000390372").unwrap();
        assert!(approx(tx.p_value, 0.02));
        assert!(table.transcript("ENST00000390372.3").is_none());
    }

    #[test]
    fn columns_located_by_name() {
        let tsv = "P\tGene\tExplevel\tIsoform\n0.01\tA\t2.0\tExpression\n";
        let table = StatisticsTable::from_tsv(Cursor::new(tsv)).unwrap();
        let gene = table.gene("A").unwrap();
        assert!(approx(gene.fold_change, 2.0));
        assert!(approx(gene.p_value, 0.01));
    }

    #[test]
    fn corrected_values_computed_when_absent() {
        let tsv = "Gene\tIsoform\tExplevel\tP\nA\tExpression\t1\t0.01\nB\tExpression\t1\t0.04\n\
                   C\tExpression\t1\t0.03\n";
        let table = StatisticsTable::from_tsv(Cursor::new(tsv)).unwrap();
        // sorted: 0.01 (A), 0.03 (C), 0.04 (B); m = 3
        assert!(approx(table.gene("A").unwrap().corrected_p_value, 0.03));
        assert!(approx(table.gene("C").unwrap().corrected_p_value, 0.04));
        assert!(approx(table.gene("B").unwrap().corrected_p_value, 0.04));
    }

    #[test]
    fn benjamini_hochberg_monotone() {
        let adjusted = benjamini_hochberg(&[0.5, 0.001, 0.2, 0.04]);
        assert!(approx(adjusted[1], 0.004));
        assert!(approx(adjusted[3], 0.08));
        assert!(approx(adjusted[2], 0.266_666_666_666_666_65));
        assert!(approx(adjusted[0], 0.5));
        assert!(benjamini_hochberg(&[]).is_empty());
    }

    #[test]
    fn missing_required_column() {
        let err = StatisticsTable::from_tsv(Cursor::new("Gene\tIsoform\tP\n")).unwrap_err();
        assert!(err.to_string().contains("Explevel"));
    }

    #[test]
    fn invalid_number_reports_line() {
        let tsv = "Gene\tIsoform\tExplevel\tP\nA\tExpression\tabc\t0.1\n";
        let err = StatisticsTable::from_tsv(Cursor::new(tsv)).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn p_value_out_of_range() {
        let tsv = "Gene\tIsoform\tExplevel\tP\nA\tExpression\t1\t1.5\n";
        let err = StatisticsTable::from_tsv(Cursor::new(tsv)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn empty_input() {
        let table = StatisticsTable::from_tsv(Cursor::new("")).unwrap();
        assert_eq!(table.gene_count(), 0);
    }
}
