//! Parser for cDNA FASTA files.

use std::io::BufRead;
use std::path::Path;

use crate::error::Error;
use crate::input;

/// One FASTA entry: the header line without `>` and the concatenated sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub header: String,
    pub sequence: Vec<u8>,
}

/// Read a plain or gzip-compressed FASTA file.
pub fn read_fasta(path: &Path) -> Result<Vec<FastaRecord>, Error> {
    let reader = input::open_text(path)?;
    parse_fasta(reader)
}

/// Reads FASTA from a buffered reader. Sequence lines are concatenated and
/// uppercased; blank lines are ignored.
pub fn parse_fasta<R: BufRead>(reader: R) -> Result<Vec<FastaRecord>, Error> {
    let mut records: Vec<FastaRecord> = Vec::new();
    let mut current: Option<FastaRecord> = None;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                records.push(record);
            }
            current = Some(FastaRecord {
                header: header.trim().to_string(),
                sequence: Vec::new(),
            });
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match current.as_mut() {
            Some(record) => {
                let start = record.sequence.len();
                record.sequence.extend_from_slice(trimmed.as_bytes());
                record.sequence[start..].make_ascii_uppercase();
            }
            None => {
                return Err(Error::Parse(format!(
                    "sequence data before the first FASTA header (line {})",
                    line_num + 1
                )));
            }
        }
    }

    if let Some(record) = current {
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn parse_ensembl_records() {
        let fasta = b">ENST00000390372.3 cdna chromosome:GRCh38:7:142482548:142483019:1 gene:ENSG00000211725.3\n\
ATGGCC\nacgt\n>ENST00000000002.1 cdna\nTTTT\n";
        let records = parse_fasta(Cursor::new(fasta.to_vec())).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].header,
            "ENST00000390372.3 cdna chromosome:GRCh38:7:142482548:142483019:1 gene:ENSG00000211725.3"
        );
        assert_eq!(records[0].sequence, b"ATGGCCACGT");
        assert_eq!(records[1].sequence, b"TTTT");
    }

    #[test]
    fn blank_lines_and_empty_records() {
        let records = parse_fasta(Cursor::new(b">a\n\n>b\nAC\n\nGT\n".to_vec())).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].sequence.is_empty());
        assert_eq!(records[1].sequence, b"ACGT");
    }

    #[test]
    fn sequence_before_header() {
        let err = parse_fasta(Cursor::new(b"ACGT\n>a\nAC\n".to_vec())).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn read_gzip_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&input::gzip(b">x\nACGT\n>y\nGG\n")).unwrap();
        let records = read_fasta(f.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].header, "y");
    }
}
