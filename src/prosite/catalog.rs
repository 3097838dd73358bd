//! Motif catalog loading from `prosite.dat`.
//!
//! Only `PATTERN` entries are kept; `MATRIX` and `RULE` entries carry no `PA`
//! line usable by the scanner. Every pattern is compiled here, so a malformed
//! entry fails the load before anything is scanned.

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use crate::error::Error;
use crate::input;

use super::pattern::Pattern;

/// One compiled catalog entry.
#[derive(Debug, Clone)]
pub struct Motif {
    /// Accession, e.g. `PS00001`.
    pub id: String,
    /// Entry name, e.g. `ASN_GLYCOSYLATION`.
    pub name: String,
    pub description: String,
    pub pattern: Pattern,
    /// PROSITE `/SKIP-FLAG=TRUE`: the pattern has a high probability of occurrence.
    pub frequent: bool,
}

/// Ordered collection of compiled motifs. Scan order is catalog order.
#[derive(Debug, Clone, Default)]
pub struct MotifCatalog {
    motifs: Vec<Motif>,
}

impl MotifCatalog {
    /// Build from (id, pattern) pairs.
    pub fn from_patterns<I, S, P>(entries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: AsRef<str>,
    {
        let mut catalog = Self::default();
        for (id, pattern) in entries {
            let id = id.into();
            let pattern = compile(&id, pattern.as_ref())?;
            catalog.push(Motif {
                name: id.clone(),
                id,
                description: String::new(),
                pattern,
                frequent: false,
            })?;
        }
        Ok(catalog)
    }

    /// Load a plain or gzip-compressed `prosite.dat`.
    pub fn from_path(path: &Path, skip_frequent: bool) -> Result<Self, Error> {
        let reader = input::open_text(path)?;
        Self::from_prosite_dat(reader, skip_frequent)
    }

    /// Parse `prosite.dat` records. With `skip_frequent`, entries carrying
    /// `/SKIP-FLAG=TRUE` are left out.
    pub fn from_prosite_dat<R: BufRead>(reader: R, skip_frequent: bool) -> Result<Self, Error> {
        let mut catalog = Self::default();
        let mut record = DatRecord::default();

        for (line_num, line) in reader.lines().enumerate() {
            let line_num = line_num + 1;
            let line = line?;
            if line.starts_with("//") {
                let finished = std::mem::take(&mut record);
                if let Some(motif) = finished.into_motif(line_num)? {
                    if !(skip_frequent && motif.frequent) {
                        catalog.push(motif)?;
                    }
                }
                continue;
            }
            record.add_line(&line);
        }

        // A trailing record without '//' is still accepted.
        if let Some(motif) = record.into_motif(0)? {
            if !(skip_frequent && motif.frequent) {
                catalog.push(motif)?;
            }
        }

        Ok(catalog)
    }

    fn push(&mut self, motif: Motif) -> Result<(), Error> {
        if self.get(&motif.id).is_some() {
            return Err(Error::Validation(format!(
                "duplicate motif id in catalog: {}",
                motif.id
            )));
        }
        self.motifs.push(motif);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Motif> {
        self.motifs.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Motif> {
        self.motifs.iter()
    }

    /// Ids of entries flagged as frequent.
    #[must_use]
    pub fn frequent_ids(&self) -> HashSet<&str> {
        self.motifs
            .iter()
            .filter(|m| m.frequent)
            .map(|m| m.id.as_str())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.motifs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.motifs.is_empty()
    }
}

fn compile(id: &str, pattern: &str) -> Result<Pattern, Error> {
    Pattern::compile(pattern).map_err(|e| Error::InvalidMotifPattern {
        id: id.to_string(),
        pattern: pattern.to_string(),
        reason: e.0,
    })
}

/// Accumulates the lines of one `prosite.dat` entry up to `//`.
#[derive(Debug, Default)]
struct DatRecord {
    name: Option<String>,
    kind: Option<String>,
    accession: Option<String>,
    description: String,
    pattern: String,
    frequent: bool,
}

impl DatRecord {
    fn add_line(&mut self, line: &str) {
        let (code, value) = match (line.get(..2), line.get(5..)) {
            (Some(code), Some(value)) => (code, value.trim()),
            _ => return,
        };
        match code {
            "ID" => {
                // ID   ASN_GLYCOSYLATION; PATTERN.
                let mut parts = value.splitn(2, ';');
                self.name = parts.next().map(|s| s.trim().to_string());
                self.kind = parts
                    .next()
                    .map(|s| s.trim().trim_end_matches('.').to_string());
            }
            "AC" => self.accession = Some(value.trim_end_matches(';').trim().to_string()),
            "DE" => {
                if !self.description.is_empty() {
                    self.description.push(' ');
                }
                self.description.push_str(value);
            }
            "PA" => self.pattern.push_str(value),
            "CC" if value.contains("/SKIP-FLAG=TRUE") => self.frequent = true,
            _ => {}
        }
    }

    fn into_motif(self, line_num: usize) -> Result<Option<Motif>, Error> {
        if self.kind.as_deref() != Some("PATTERN") || self.pattern.is_empty() {
            return Ok(None);
        }
        let Some(id) = self.accession else {
            return Err(Error::Parse(format!(
                "PROSITE pattern entry without AC line (record ending at line {line_num})"
            )));
        };
        let pattern = compile(&id, &self.pattern)?;
        Ok(Some(Motif {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            description: self.description,
            pattern,
            frequent: self.frequent,
        }))
    }
}
