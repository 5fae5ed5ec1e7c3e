use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indelscan::genomics::io::{load_reads, parse_reference_lines, parse_wild_type_line};
use indelscan::probe::{build_catalogue, write_catalogue};
use indelscan::{
    report_fingerprint, write_frequency_report, AnalysisConfig, ClassificationWorkload,
    ClassifierMethod, WildTypeProbe,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "indelscan", about = "Indel screening and probe variant catalogues")]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify reads per source and write nucleotide frequency reports.
    Classify {
        /// Reference file (`SOURCE:BARCODE:REFERENCE` per line).
        references: PathBuf,
        /// Directory holding one `<SOURCE>.txt` or `<SOURCE>.fastq` read file per source.
        reads_dir: PathBuf,
        /// Classification method.
        #[arg(long, value_enum, default_value_t = Method::Alignment)]
        method: Method,
        /// Bases preceding the barcode in reads (edit-script methods only).
        #[arg(long, default_value = "")]
        anchor_prefix: String,
        /// Edit window start, counted back from the reference end.
        #[arg(long, default_value_t = 11)]
        distance_from_end: usize,
        /// Reads per evaluation block.
        #[arg(long, default_value_t = 1024)]
        block_size: usize,
        /// Disable parallel block processing.
        #[arg(long)]
        sequential: bool,
        /// Directory for `<SOURCE>.tsv` reports (default: stdout).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Enumerate mismatch and bulge variants of wild-type probes.
    Variants {
        /// Wild-type file (`SOURCE:WILD` per line).
        wild_types: PathBuf,
        /// Directory for `<SOURCE>.txt` catalogues (default: stdout).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Method {
    /// Local alignment with gap walks.
    Alignment,
    /// Edit scripts, two or more edits in the window.
    EditCount,
    /// Edit scripts, gap inside the window.
    GapPosition,
}

impl From<Method> for ClassifierMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Alignment => ClassifierMethod::Alignment,
            Method::EditCount => ClassifierMethod::EditCount,
            Method::GapPosition => ClassifierMethod::GapPosition,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Classify {
            references,
            reads_dir,
            method,
            anchor_prefix,
            distance_from_end,
            block_size,
            sequential,
            output,
        } => {
            let config = AnalysisConfig {
                window_distance_from_end: distance_from_end,
                method: method.into(),
                anchor_prefix: anchor_prefix.trim().to_ascii_uppercase().into_bytes(),
                block_size,
                parallel: !sequential,
                ..AnalysisConfig::default()
            };
            run_classify(&config, &references, &reads_dir, output.as_deref())?
        }
        Commands::Variants { wild_types, output } => {
            run_variants(&AnalysisConfig::default(), &wild_types, output.as_deref())?
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_classify(
    config: &AnalysisConfig,
    references_path: &Path,
    reads_dir: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let analyzer = config.analyzer().context("invalid analysis configuration")?;
    let text = fs::read_to_string(references_path).with_context(|| {
        format!("failed to read reference file {}", references_path.display())
    })?;
    let records = parse_reference_lines(text.lines(), config.window_spec());
    if records.is_empty() {
        bail!("no usable reference lines in {}", references_path.display());
    }
    if let Some(dir) = output {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }

    for record in records {
        let Some(reads_path) = find_reads_file(reads_dir, record.source_id()) else {
            warn!(source = %record.source_id(), dir = %reads_dir.display(), "no read file for source");
            continue;
        };
        let reads = load_reads(&reads_path)?;
        let source = record.source_id().to_string();
        let report = analyzer
            .analyze(&ClassificationWorkload::new(record, reads))
            .with_context(|| format!("classification failed for source {source}"))?;

        let fingerprint = report_fingerprint(&report)?;
        info!(source = %source, fingerprint = %fingerprint.to_hex(), "report ready");

        let mut writer = open_output(output, &source, "tsv")?;
        write_frequency_report(&mut writer, &report)
            .with_context(|| format!("failed to write report for source {source}"))?;
    }

    Ok(())
}

fn run_variants(config: &AnalysisConfig, wild_path: &Path, output: Option<&Path>) -> Result<()> {
    config.validate().context("invalid analysis configuration")?;
    let text = fs::read_to_string(wild_path)
        .with_context(|| format!("failed to read wild-type file {}", wild_path.display()))?;
    if let Some(dir) = output {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }

    let layout = config.probe_layout;
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (source, wild) = match parse_wild_type_line(line, idx + 1, layout.total_len()) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "skipping wild-type line");
                continue;
            }
        };
        let probe = WildTypeProbe::new(source.as_str(), &wild, layout)?;
        let mut writer = open_output(output, &source, "txt")?;
        let rows = write_catalogue(&mut writer, build_catalogue(&probe)?)
            .with_context(|| format!("failed to write catalogue for source {source}"))?;
        info!(source = %source, rows, "catalogue written");
    }

    Ok(())
}

fn find_reads_file(dir: &Path, source: &str) -> Option<PathBuf> {
    ["txt", "fastq", "fq"]
        .iter()
        .map(|ext| dir.join(format!("{source}.{ext}")))
        .find(|path| path.is_file())
}

fn open_output(dir: Option<&Path>, source: &str, extension: &str) -> Result<Box<dyn Write>> {
    match dir {
        Some(dir) => {
            let path = dir.join(format!("{source}.{extension}"));
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
