use std::fmt;
use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use super::generator::{all_variants, check_duplicate, GeneratorError};
use super::WildTypeProbe;

/// One mutated probe: `SOURCE:LABEL:SEQUENCE`, suffixed with `:wild` when the
/// mutated target segment, followed by the first 3' flank, also occurs in the
/// wild type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct CatalogueRow {
    /// Source of the wild-type probe.
    pub source_id: Arc<str>,
    /// Variant label.
    pub label: String,
    /// Full mutated probe.
    pub sequence: Vec<u8>,
    /// Mutated probe is indistinguishable from the wild type.
    pub ambiguous: bool,
}

impl fmt::Display for CatalogueRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.source_id,
            self.label,
            String::from_utf8_lossy(&self.sequence)
        )?;
        if self.ambiguous {
            write!(f, ":wild")?;
        }
        Ok(())
    }
}

/// Every variant of the probe's target segment as a catalogue row.
pub fn build_catalogue(
    probe: &WildTypeProbe,
) -> Result<impl Iterator<Item = CatalogueRow> + '_, GeneratorError> {
    let variants = all_variants(probe.target())?;
    Ok(variants.map(move |variant| CatalogueRow {
        source_id: Arc::clone(probe.source_id()),
        label: variant.label(),
        sequence: probe.with_target(&variant.sequence),
        ambiguous: check_duplicate(probe.sequence(), &variant.sequence, probe.flank3a()),
    }))
}

/// Write one row per line, returning the number of rows written.
pub fn write_catalogue<W, I>(writer: &mut W, rows: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = CatalogueRow>,
{
    let mut written = 0usize;
    for row in rows {
        writeln!(writer, "{row}")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Render a probe's catalogue into a string.
pub fn render_catalogue(probe: &WildTypeProbe) -> Result<String> {
    let mut buffer = Vec::new();
    write_catalogue(&mut buffer, build_catalogue(probe)?)?;
    String::from_utf8(buffer).map_err(|_| anyhow!("rendered catalogue is not valid UTF-8"))
}
