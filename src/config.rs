use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::transcript::DEFAULT_MOTIF_SEPARATOR;

/// Analysis settings, read from a camelCase JSON file. Every field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Worker threads for per-transcript analysis.
    pub threads: usize,
    /// Skip transcripts whose cDNA contains symbols outside {A,C,G,T}.
    pub strict_alphabet: bool,
    /// Leave out PROSITE entries flagged `/SKIP-FLAG=TRUE`.
    pub skip_frequent_motifs: bool,
    /// Separator between motif entries in report display strings.
    pub motif_separator: String,
    /// ORFs shorter than this many residues are reported as absent.
    pub min_peptide_length: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            strict_alphabet: false,
            skip_frequent_motifs: true,
            motif_separator: DEFAULT_MOTIF_SEPARATOR.to_string(),
            min_peptide_length: 0,
        }
    }
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            bail!("invalid thread count: expected at least 1, got 0");
        }
        if self.motif_separator.is_empty() {
            bail!("invalid motif separator: must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f
    }

    #[test]
    fn valid_config_all_fields() {
        let json = r#"{
            "threads": 8,
            "strictAlphabet": true,
            "skipFrequentMotifs": false,
            "motifSeparator": "\n",
            "minPeptideLength": 50
        }"#;
        let f = write_config(json);
        let config = AnalysisConfig::from_file(f.path()).unwrap();
        assert_eq!(config.threads, 8);
        assert!(config.strict_alphabet);
        assert!(!config.skip_frequent_motifs);
        assert_eq!(config.motif_separator, "\n");
        assert_eq!(config.min_peptide_length, 50);
    }

    #[test]
    fn omitted_fields_use_defaults() {
        let f = write_config(r#"{ "threads": 4 }"#);
        let config = AnalysisConfig::from_file(f.path()).unwrap();
        assert_eq!(config.threads, 4);
        assert!(!config.strict_alphabet);
        assert!(config.skip_frequent_motifs);
        assert_eq!(config.motif_separator, DEFAULT_MOTIF_SEPARATOR);
        assert_eq!(config.min_peptide_length, 0);
    }

    #[test]
    fn zero_threads() {
        let f = write_config(r#"{ "threads": 0 }"#);
        let err = AnalysisConfig::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("invalid thread count"));
    }

    #[test]
    fn empty_separator() {
        let f = write_config(r#"{ "motifSeparator": "" }"#);
        let err = AnalysisConfig::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("invalid motif separator"));
    }

    #[test]
    fn unknown_field() {
        let f = write_config(r#"{ "thread": 2 }"#);
        let err = AnalysisConfig::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn missing_file() {
        let err = AnalysisConfig::from_file(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
