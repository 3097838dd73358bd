//! Error types for the prositometry library.

use thiserror::Error;

/// Errors that can occur during prositometry operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A parse error occurred while reading input data.
    #[error("{0}")]
    Parse(String),

    /// A validation constraint was violated.
    #[error("{0}")]
    Validation(String),

    /// An Ensembl header did not follow the fixed positional field layout.
    #[error("malformed header field {field}: expected '{expected}', found '{found}'")]
    MalformedHeader {
        field: usize,
        expected: &'static str,
        found: String,
    },

    /// A catalog pattern could not be compiled.
    /// Raised at catalog load time, before any peptide is scanned.
    #[error("invalid motif pattern for {id} ('{pattern}'): {reason}")]
    InvalidMotifPattern {
        id: String,
        pattern: String,
        reason: String,
    },

    /// A nucleotide sequence contained a symbol outside {A,C,G,T}.
    #[error("unsupported nucleotide '{symbol}' at position {position}")]
    SequenceAlphabet { position: usize, symbol: char },
}
