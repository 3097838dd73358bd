//! Prositometry: isoform-level ORF and PROSITE motif annotation of Ensembl transcripts.

pub mod error;

pub mod cli;
pub mod codon;
pub mod config;
pub mod fasta;
pub mod gene;
pub mod header;
pub mod input;
pub mod orf;
pub mod pipeline;
pub mod prosite;
pub mod report;
pub mod stats;
pub mod transcript;
