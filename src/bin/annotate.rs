use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;

use prositometry::cli;
use prositometry::config::AnalysisConfig;
use prositometry::fasta::read_fasta;
use prositometry::pipeline::Pipeline;
use prositometry::prosite::MotifCatalog;
use prositometry::report::build_reports;
use prositometry::stats::StatisticsTable;

/// Diagnostics printed individually before the rest are only counted.
const MAX_PRINTED_DIAGNOSTICS: usize = 20;

#[derive(Parser)]
#[command(
    name = "annotate",
    about = "Annotate Ensembl transcripts with ORFs and PROSITE motifs and build per-gene reports"
)]
struct Cli {
    /// Ensembl cDNA FASTA (plain or gzip)
    #[arg(short = 'f', long = "cdna")]
    cdna: PathBuf,

    /// PROSITE catalog (prosite.dat, plain or gzip)
    #[arg(short = 'p', long = "prosite")]
    prosite: PathBuf,

    /// Differential expression/splicing results (HBA-DEALS TSV)
    #[arg(short = 's', long = "stats")]
    stats: PathBuf,

    /// Output JSON report
    #[arg(short = 'o', long = "out")]
    out: PathBuf,

    /// Optional JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Worker threads (overrides the configuration)
    #[arg(short = 't', long = "threads")]
    threads: Option<usize>,

    /// Skip transcripts containing symbols outside {A,C,G,T}
    #[arg(long = "strict")]
    strict: bool,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner("Annotate");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let mut config = match &cli_args.config {
        Some(path) => {
            cli::kv("Config", &path.display().to_string());
            AnalysisConfig::from_file(path)?
        }
        None => AnalysisConfig::default(),
    };
    if let Some(threads) = cli_args.threads {
        config.threads = threads;
    }
    if cli_args.strict {
        config.strict_alphabet = true;
    }
    config.validate()?;

    cli::kv("Threads", &config.threads.to_string());
    cli::kv(
        "Alphabet",
        if config.strict_alphabet {
            "strict"
        } else {
            "lenient"
        },
    );
    cli::kv("Min peptide length", &config.min_peptide_length.to_string());
    cli::kv("Output", &cli_args.out.display().to_string());

    eprintln!();

    // ── Parsing ──────────────────────────────────────────
    cli::section("Parsing");

    let catalog = MotifCatalog::from_path(&cli_args.prosite, config.skip_frequent_motifs)
        .with_context(|| format!("failed to load motif catalog: {}", cli_args.prosite.display()))?;
    if catalog.is_empty() {
        bail!("no PROSITE patterns found in {}", cli_args.prosite.display());
    }
    cli::kv(
        "PROSITE",
        &format!(
            "{} ({} patterns{})",
            cli_args.prosite.display(),
            catalog.len(),
            if config.skip_frequent_motifs {
                ", frequent skipped"
            } else {
                ""
            }
        ),
    );

    let records = read_fasta(&cli_args.cdna)
        .with_context(|| format!("failed to read cDNA FASTA: {}", cli_args.cdna.display()))?;
    cli::kv(
        "cDNA",
        &format!("{} ({} records)", cli_args.cdna.display(), records.len()),
    );

    let stats = StatisticsTable::from_path(&cli_args.stats)
        .with_context(|| format!("failed to read statistics: {}", cli_args.stats.display()))?;
    cli::kv(
        "Statistics",
        &format!(
            "{} ({} genes, {} transcripts)",
            cli_args.stats.display(),
            stats.gene_count(),
            stats.transcript_count()
        ),
    );

    eprintln!();

    // ── Analysis ─────────────────────────────────────────
    cli::section("Analysis");

    let outcome = Pipeline::new(&catalog, &config).run(records)?;
    let with_motifs = outcome
        .genes
        .genes()
        .flat_map(|g| g.transcripts())
        .filter(|t| !t.motifs().is_empty())
        .count();
    cli::kv("Genes", &outcome.genes.len().to_string());
    cli::kv("Transcripts", &outcome.genes.transcript_count().to_string());
    cli::kv("With motifs", &with_motifs.to_string());

    let skipped = outcome.skipped().count();
    if skipped > 0 {
        cli::kv("Skipped", &skipped.to_string().yellow().to_string());
    }
    for diagnostic in outcome.diagnostics.iter().take(MAX_PRINTED_DIAGNOSTICS) {
        cli::warning(&diagnostic.to_string());
    }
    if outcome.diagnostics.len() > MAX_PRINTED_DIAGNOSTICS {
        cli::warning(&format!(
            "... {} more diagnostics",
            outcome.diagnostics.len() - MAX_PRINTED_DIAGNOSTICS
        ));
    }

    eprintln!();

    // ── Report ───────────────────────────────────────────
    cli::section("Report");

    let reports = build_reports(&outcome.genes, &stats, &config.motif_separator);
    let unmatched = outcome.genes.len() - reports.len();
    if unmatched > 0 {
        cli::warning(&format!("{unmatched} genes without a gene-level result"));
    }

    let file = File::create(&cli_args.out)
        .with_context(|| format!("failed to create {}", cli_args.out.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &reports)
        .with_context(|| format!("failed to write {}", cli_args.out.display()))?;
    writer.flush()?;

    cli::success(&format!(
        "{} gene reports written to {}",
        reports.len(),
        cli_args.out.display()
    ));

    cli::print_summary(start);
    Ok(())
}
