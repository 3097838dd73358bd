//! Parser for Ensembl cDNA FASTA header lines.
//!
//! Everything before the `description:` token is split on whitespace into
//! seven positional fields:
//!
//! ```text
//! ENST00000390372.3 cdna chromosome:GRCh38:7:142482548:142483019:1 gene:ENSG00000211725.3
//!     gene_biotype:TR_V_gene transcript_biotype:TR_V_gene gene_symbol:TRBV5-5
//!     description:T cell receptor beta variable 5-5 [Source:HGNC Symbol;Acc:HGNC:12222]
//! ```
//!
//! Parsing is strictly positional: no field is optional and no reordering is tolerated.

use std::fmt;

use crate::error::Error;

const TRANSCRIPT_PREFIX: &str = "ENST";
const CHROMOSOME_MARKER: &str = "chromosome:";
const SCAFFOLD_MARKER: &str = "scaffold:";
const GENE_MARKER: &str = "gene:";
const GENE_BIOTYPE_MARKER: &str = "gene_biotype:";
const TRANSCRIPT_BIOTYPE_MARKER: &str = "transcript_biotype:";
const GENE_SYMBOL_MARKER: &str = "gene_symbol:";
const DESCRIPTION_MARKER: &str = "description:";

/// Version sentinel for identifiers without a `.` separator.
pub const UNVERSIONED: i32 = -1;

/// Expected marker text for each positional field, used in error reports.
const FIELD_MARKERS: [&str; 7] = [
    TRANSCRIPT_PREFIX,
    "<sequence type>",
    "chromosome:|scaffold:",
    GENE_MARKER,
    GENE_BIOTYPE_MARKER,
    TRANSCRIPT_BIOTYPE_MARKER,
    GENE_SYMBOL_MARKER,
];

/// A stable identifier split into its base id and integer version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionedId {
    pub id: String,
    pub version: i32,
}

impl VersionedId {
    /// Split `ENSG00000211725.3` into (`ENSG00000211725`, 3).
    fn parse(s: &str, field: usize) -> Result<Self, Error> {
        match s.split_once('.') {
            Some((id, version)) => {
                let version = version.parse::<i32>().map_err(|_| Error::MalformedHeader {
                    field,
                    expected: "<id>.<integer version>",
                    found: s.to_string(),
                })?;
                Ok(Self {
                    id: id.to_string(),
                    version,
                })
            }
            None => Ok(Self {
                id: s.to_string(),
                version: UNVERSIONED,
            }),
        }
    }

    #[must_use]
    pub fn is_versioned(&self) -> bool {
        self.version != UNVERSIONED
    }
}

impl fmt::Display for VersionedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_versioned() {
            write!(f, "{}.{}", self.id, self.version)
        } else {
            write!(f, "{}", self.id)
        }
    }
}

/// Structured metadata from one Ensembl cDNA header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptHeader {
    pub transcript: VersionedId,
    pub seq_type: String,
    pub chromosomal_location: String,
    pub gene: VersionedId,
    pub gene_biotype: String,
    pub transcript_biotype: String,
    pub gene_symbol: String,
    pub description: String,
}

impl TranscriptHeader {
    /// Version-stripped transcript id.
    #[must_use]
    pub fn transcript_id(&self) -> &str {
        &self.transcript.id
    }

    /// Version-stripped gene id.
    #[must_use]
    pub fn gene_id(&self) -> &str {
        &self.gene.id
    }
}

impl std::str::FromStr for TranscriptHeader {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_header(s)
    }
}

/// Parse a header line. A leading `>` is tolerated.
pub fn parse_header(line: &str) -> Result<TranscriptHeader, Error> {
    let line = line.trim().trim_start_matches('>');

    let (positional, description) = match line.find(DESCRIPTION_MARKER) {
        Some(pos) => (
            &line[..pos],
            line[pos + DESCRIPTION_MARKER.len()..].trim().to_string(),
        ),
        None => (line, "n/a".to_string()),
    };

    let fields: Vec<&str> = positional.split_whitespace().collect();
    if fields.len() < FIELD_MARKERS.len() {
        let field = fields.len();
        return Err(Error::MalformedHeader {
            field,
            expected: FIELD_MARKERS[field],
            found: String::new(),
        });
    }

    let transcript_field = fields[0];
    if !transcript_field.starts_with(TRANSCRIPT_PREFIX) {
        return Err(malformed(0, transcript_field));
    }
    let transcript = VersionedId::parse(transcript_field, 0)?;

    let seq_type = fields[1].to_string();

    let chromosomal_location = fields[2]
        .strip_prefix(CHROMOSOME_MARKER)
        .or_else(|| fields[2].strip_prefix(SCAFFOLD_MARKER))
        .ok_or_else(|| malformed(2, fields[2]))?
        .to_string();

    let gene = VersionedId::parse(strip_marker(&fields, 3, GENE_MARKER)?, 3)?;
    let gene_biotype = strip_marker(&fields, 4, GENE_BIOTYPE_MARKER)?.to_string();
    let transcript_biotype = strip_marker(&fields, 5, TRANSCRIPT_BIOTYPE_MARKER)?.to_string();
    let gene_symbol = strip_marker(&fields, 6, GENE_SYMBOL_MARKER)?.to_string();

    Ok(TranscriptHeader {
        transcript,
        seq_type,
        chromosomal_location,
        gene,
        gene_biotype,
        transcript_biotype,
        gene_symbol,
        description,
    })
}

fn strip_marker<'a>(fields: &[&'a str], index: usize, marker: &str) -> Result<&'a str, Error> {
    fields[index]
        .strip_prefix(marker)
        .ok_or_else(|| malformed(index, fields[index]))
}

fn malformed(field: usize, found: &str) -> Error {
    Error::MalformedHeader {
        field,
        expected: FIELD_MARKERS[field],
        found: found.to_string(),
    }
}
