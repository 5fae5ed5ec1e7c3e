use anyhow::{anyhow, Result};
use std::io::Write;

use super::RecordReport;

/// Write a record report as tab-separated rows.
///
/// Layout: a `position` header, the `reference` row, one count row per base
/// (A, C, G, T), `#`-prefixed bucket totals, then one `indel` line per
/// Indel-bucket read.
pub fn write_frequency_report<W: Write>(writer: &mut W, report: &RecordReport) -> Result<()> {
    let table = &report.table;

    write!(writer, "position")?;
    for node in &table.positions {
        write!(writer, "\t{}", node.position)?;
    }
    writeln!(writer)?;

    write!(writer, "reference")?;
    for base in table.reference_row() {
        write!(writer, "\t{}", base as char)?;
    }
    writeln!(writer)?;

    for (base, counts) in table.rows() {
        write!(writer, "{}", base as char)?;
        for count in counts {
            write!(writer, "\t{count}")?;
        }
        writeln!(writer)?;
    }

    let counts = &report.counts;
    writeln!(writer, "#source\t{}", report.source_id)?;
    writeln!(writer, "#total\t{}", counts.total)?;
    writeln!(writer, "#normal\t{}", counts.normal)?;
    writeln!(writer, "#indel\t{}", counts.indel)?;
    writeln!(writer, "#removed\t{}", counts.removed)?;
    writeln!(writer, "#rejected\t{}", counts.rejected)?;

    for read in &report.indel_reads {
        writeln!(writer, "indel\t{}", String::from_utf8_lossy(read))?;
    }

    writer.flush()?;
    Ok(())
}

/// Render a record report into a string (useful for tests and snapshots).
pub fn render_frequency_report(report: &RecordReport) -> Result<String> {
    let mut buffer = Vec::new();
    write_frequency_report(&mut buffer, report)?;
    String::from_utf8(buffer).map_err(|_| anyhow!("rendered report is not valid UTF-8"))
}

/// Advisory fingerprint of the rendered report.
pub fn report_fingerprint(report: &RecordReport) -> Result<blake3::Hash> {
    let rendered = render_frequency_report(report)?;
    Ok(blake3::hash(rendered.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{accumulate, Bucket, ReferenceRecord, WindowSpec};

    #[test]
    fn rows_are_ordered_reference_then_bases() {
        let record = ReferenceRecord::new(
            "s1",
            b"GGCC".to_vec(),
            b"GGCCACGTACGT".to_vec(),
            WindowSpec::new(4),
        )
        .unwrap();
        let report = accumulate(&record, vec![(Bucket::Normal, b"GGCCACGT".as_slice())]);
        let rendered = render_frequency_report(&report).unwrap();
        let labels: Vec<&str> = rendered
            .lines()
            .map(|line| line.split('\t').next().unwrap_or_default())
            .take(6)
            .collect();
        assert_eq!(labels, ["position", "reference", "A", "C", "G", "T"]);
        assert!(rendered.contains("#normal\t1\n"));
    }
}
