//! Batch analysis: FASTA records to assembled genes.
//!
//! Each record is parsed, searched for its longest ORF and scanned for motifs
//! independently. Records are split into contiguous chunks across scoped
//! worker threads; results carry their input index and are merged back in
//! input order before assembly, so gene and transcript order always follows
//! the input. A record that fails is skipped and reported, the batch goes on.

use std::fmt;
use std::thread;

use crate::config::AnalysisConfig;
use crate::error::Error;
use crate::fasta::FastaRecord;
use crate::gene::GeneSet;
use crate::orf::{self, OrfFinder};
use crate::prosite::MotifCatalog;
use crate::transcript::{Transcript, TranscriptBuilder};

/// A per-record problem collected during a batch run.
#[derive(Debug)]
pub enum Diagnostic {
    /// The record was left out of the results.
    Skipped {
        record: usize,
        label: String,
        error: Error,
    },
    /// Lenient mode translated codons with unsupported symbols to `X`.
    AmbiguousBases {
        record: usize,
        transcript_id: String,
        count: usize,
    },
}

impl Diagnostic {
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped {
                record,
                label,
                error,
            } => write!(f, "record {record} ({label}) skipped: {error}"),
            Self::AmbiguousBases {
                record,
                transcript_id,
                count,
            } => write!(
                f,
                "record {record} ({transcript_id}): {count} unsupported nucleotide symbol(s) read as unknown"
            ),
        }
    }
}

/// Assembled genes plus every diagnostic from the run.
#[derive(Debug, Default)]
pub struct AnalysisOutcome {
    pub genes: GeneSet,
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisOutcome {
    pub fn skipped(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_skipped())
    }
}

/// Per-record analysis against one motif catalog.
pub struct Pipeline<'a> {
    catalog: &'a MotifCatalog,
    finder: OrfFinder,
    strict_alphabet: bool,
    threads: usize,
}

type RecordOutcome = Result<(Transcript, usize), Error>;

impl<'a> Pipeline<'a> {
    #[must_use]
    pub fn new(catalog: &'a MotifCatalog, config: &AnalysisConfig) -> Self {
        Self {
            catalog,
            finder: OrfFinder::new(config.min_peptide_length),
            strict_alphabet: config.strict_alphabet,
            threads: config.threads.max(1),
        }
    }

    /// Analyze one header/sequence pair. Also returns the number of
    /// unsupported nucleotide symbols tolerated in lenient mode.
    pub fn analyze_record(&self, header: &str, sequence: Vec<u8>) -> RecordOutcome {
        if self.strict_alphabet {
            orf::validate_nucleotides(&sequence)?;
        }
        let ambiguous = orf::count_ambiguous(&sequence);
        let mut builder = TranscriptBuilder::from_record(header, sequence, &self.finder)?;
        builder.scan_motifs(self.catalog);
        Ok((builder.build(), ambiguous))
    }

    /// Analyze every record and assemble the survivors into genes.
    pub fn run(&self, records: Vec<FastaRecord>) -> Result<AnalysisOutcome, Error> {
        let labels: Vec<String> = records.iter().map(|r| record_label(&r.header)).collect();
        let analyzed = self.analyze_all(records)?;

        let mut outcome = AnalysisOutcome::default();
        for (index, result) in analyzed {
            let record = index + 1;
            let (transcript, ambiguous) = match result {
                Ok(ok) => ok,
                Err(error) => {
                    outcome.diagnostics.push(Diagnostic::Skipped {
                        record,
                        label: labels[index].clone(),
                        error,
                    });
                    continue;
                }
            };
            if ambiguous > 0 {
                outcome.diagnostics.push(Diagnostic::AmbiguousBases {
                    record,
                    transcript_id: transcript.id().to_string(),
                    count: ambiguous,
                });
            }
            if let Err(error) = outcome.genes.add(transcript) {
                outcome.diagnostics.push(Diagnostic::Skipped {
                    record,
                    label: labels[index].clone(),
                    error,
                });
            }
        }
        Ok(outcome)
    }

    fn analyze_all(&self, records: Vec<FastaRecord>) -> Result<Vec<(usize, RecordOutcome)>, Error> {
        let process = |chunk: Vec<(usize, FastaRecord)>| -> Vec<(usize, RecordOutcome)> {
            chunk
                .into_iter()
                .map(|(i, r)| (i, self.analyze_record(&r.header, r.sequence)))
                .collect()
        };

        let chunks = split_chunks(records, self.threads);
        if chunks.len() <= 1 {
            return Ok(chunks.into_iter().flat_map(process).collect());
        }

        let joined = thread::scope(|scope| {
            let handles: Vec<_> = chunks
                .into_iter()
                .map(|chunk| scope.spawn(move || process(chunk)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        });

        let mut results: Vec<(usize, RecordOutcome)> = Vec::new();
        for part in joined {
            match part {
                Ok(part) => results.extend(part),
                Err(payload) => {
                    let msg = payload
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    return Err(Error::Validation(format!("worker thread panicked: {msg}")));
                }
            }
        }

        results.sort_by_key(|(i, _)| *i);
        Ok(results)
    }
}

/// Split records into at most `parts` contiguous, index-tagged chunks.
fn split_chunks(records: Vec<FastaRecord>, parts: usize) -> Vec<Vec<(usize, FastaRecord)>> {
    if records.is_empty() {
        return Vec::new();
    }
    let chunk_size = records.len().div_ceil(parts.max(1));
    let mut chunks = Vec::with_capacity(parts);
    let mut iter = records.into_iter().enumerate().peekable();
    while iter.peek().is_some() {
        chunks.push(iter.by_ref().take(chunk_size).collect());
    }
    chunks
}

/// First header token, used to name records in diagnostics.
fn record_label(header: &str) -> String {
    header
        .split_whitespace()
        .next()
        .unwrap_or("<empty header>")
        .to_string()
}
