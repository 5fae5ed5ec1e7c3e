//! Parsing of reference, wild-type and read files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use bio::io::fastq;
use thiserror::Error;
use tracing::{debug, warn};

use super::{is_nucleotide_sequence, RecordError, ReferenceRecord, WindowSpec};

/// Errors raised while parsing reference and wild-type lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Line does not have the `SOURCE:BARCODE:REFERENCE` shape.
    #[error("line {line_no}: expected SOURCE:BARCODE:REFERENCE, found {line:?}")]
    MalformedReferenceLine {
        /// 1-based line number.
        line_no: usize,
        /// Offending line.
        line: String,
    },

    /// Line does not have the `SOURCE:WILD` shape.
    #[error("line {line_no}: expected SOURCE:WILD, found {line:?}")]
    MalformedProbeLine {
        /// 1-based line number.
        line_no: usize,
        /// Offending line.
        line: String,
    },

    /// Sequence field contains symbols outside A/C/G/T.
    #[error("line {line_no}: {field} contains non-nucleotide symbols")]
    InvalidBase {
        /// 1-based line number.
        line_no: usize,
        /// Field name.
        field: &'static str,
    },

    /// Wild-type sequence has the wrong length.
    #[error("line {line_no}: wild-type sequence has {actual} bases, expected {expected}")]
    WrongProbeLength {
        /// 1-based line number.
        line_no: usize,
        /// Required length.
        expected: usize,
        /// Length found.
        actual: usize,
    },

    /// Fields parsed but the record is inconsistent.
    #[error("line {line_no}: {source}")]
    Record {
        /// 1-based line number.
        line_no: usize,
        /// Underlying record error.
        #[source]
        source: RecordError,
    },
}

/// Leading run of nucleotide symbols, in either case.
pub fn leading_nucleotides(text: &str) -> &str {
    let end = text
        .bytes()
        .position(|b| !matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T'))
        .unwrap_or(text.len());
    &text[..end]
}

/// True when the line (trailing whitespace ignored) is a non-empty run of
/// nucleotides.
pub fn is_valid_read(line: &str) -> bool {
    let trimmed = line.trim_end();
    !trimmed.is_empty() && is_nucleotide_sequence(trimmed.as_bytes())
}

fn sequence_field(field: &str, line_no: usize, name: &'static str) -> Result<Vec<u8>, ParseError> {
    let field = field.trim();
    if field.is_empty() || !is_nucleotide_sequence(field.as_bytes()) {
        return Err(ParseError::InvalidBase {
            line_no,
            field: name,
        });
    }
    Ok(field.as_bytes().to_ascii_uppercase())
}

/// Parse one `SOURCE:BARCODE:REFERENCE` line.
pub fn parse_reference_line(
    line: &str,
    line_no: usize,
    window: WindowSpec,
) -> Result<ReferenceRecord, ParseError> {
    let malformed = || ParseError::MalformedReferenceLine {
        line_no,
        line: line.to_string(),
    };
    let mut fields = line.trim().split(':');
    let (source, barcode, reference) = match (fields.next(), fields.next(), fields.next()) {
        (Some(source), Some(barcode), Some(reference)) if fields.next().is_none() => {
            (source.trim(), barcode, reference)
        }
        _ => return Err(malformed()),
    };
    if source.is_empty() {
        return Err(malformed());
    }

    let barcode = sequence_field(barcode, line_no, "barcode")?;
    let reference = sequence_field(reference, line_no, "reference")?;
    ReferenceRecord::new(source, barcode, reference, window)
        .map_err(|source| ParseError::Record { line_no, source })
}

/// Parse every reference line, warning about and skipping malformed ones.
/// Blank lines and `#` comments are ignored.
pub fn parse_reference_lines<'a, I>(lines: I, window: WindowSpec) -> Vec<ReferenceRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut records = Vec::new();
    for (idx, line) in lines.into_iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_reference_line(trimmed, idx + 1, window) {
            Ok(record) => records.push(record),
            Err(err) => warn!(error = %err, "skipping reference line"),
        }
    }
    records
}

/// Parse one `SOURCE:WILD` line. Only the leading nucleotide run of the
/// sequence field is kept; it is uppercased and must be `expected_len` long.
pub fn parse_wild_type_line(
    line: &str,
    line_no: usize,
    expected_len: usize,
) -> Result<(String, Vec<u8>), ParseError> {
    let (source, wild) = line
        .trim_end()
        .split_once(':')
        .filter(|(source, wild)| !source.trim().is_empty() && !wild.contains(':'))
        .ok_or_else(|| ParseError::MalformedProbeLine {
            line_no,
            line: line.to_string(),
        })?;

    let wild = leading_nucleotides(wild.trim_start());
    if wild.len() != expected_len {
        return Err(ParseError::WrongProbeLength {
            line_no,
            expected: expected_len,
            actual: wild.len(),
        });
    }
    Ok((source.trim().to_string(), wild.as_bytes().to_ascii_uppercase()))
}

/// Load every valid read of a plain (one read per line) or FASTQ file.
/// Invalid lines are skipped; reads are uppercased.
pub fn load_reads(path: &Path) -> Result<Vec<Vec<u8>>> {
    let is_fastq = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("fastq") || ext.eq_ignore_ascii_case("fq"));
    let file =
        File::open(path).with_context(|| format!("failed to open reads file {}", path.display()))?;

    let mut reads = Vec::new();
    let mut skipped = 0usize;
    if is_fastq {
        for record in fastq::Reader::new(file).records() {
            let record = record
                .with_context(|| format!("malformed FASTQ record in {}", path.display()))?;
            if is_nucleotide_sequence(record.seq()) && !record.seq().is_empty() {
                reads.push(record.seq().to_ascii_uppercase());
            } else {
                skipped += 1;
            }
        }
    } else {
        for line in BufReader::new(file).lines() {
            let line = line.with_context(|| format!("failed to read {}", path.display()))?;
            if is_valid_read(&line) {
                reads.push(line.trim_end().as_bytes().to_ascii_uppercase());
            } else {
                skipped += 1;
            }
        }
    }

    debug!(path = %path.display(), kept = reads.len(), skipped, "reads loaded");
    Ok(reads)
}
