use std::sync::Arc;

use crate::genomics::{base_index, Bucket, ReferenceRecord, NUCLEOTIDES};

/// Observed nucleotide counts at one position of the counted region.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct PositionCounts {
    /// 0-based offset from the barcode's first base.
    pub position: u32,
    /// Reference base at this position (`N` past the reference end).
    pub reference: u8,
    /// Per-base counts `[A, C, G, T]`.
    pub base_counts: [u32; 4],
    /// Number of reads covering this position, including non-ACGT symbols.
    pub depth: u32,
}

impl PositionCounts {
    pub(crate) fn new(position: u32, reference: u8) -> Self {
        Self {
            position,
            reference,
            base_counts: [0; 4],
            depth: 0,
        }
    }

    pub(crate) fn observe(&mut self, base: u8) {
        if let Some(idx) = base_index(base) {
            self.base_counts[idx] += 1;
        }
        self.depth += 1;
    }

    pub(crate) fn absorb(&mut self, other: &Self) {
        debug_assert_eq!(self.position, other.position);
        for (count, extra) in self.base_counts.iter_mut().zip(other.base_counts) {
            *count += extra;
        }
        self.depth += other.depth;
    }

    /// Count observed for `base`, or 0 for non-ACGT symbols.
    pub fn count(&self, base: u8) -> u32 {
        base_index(base).map_or(0, |idx| self.base_counts[idx])
    }
}

/// Position → base → count table built from Normal reads.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct FrequencyTable {
    /// Contiguous positions `0..len`.
    pub positions: Vec<PositionCounts>,
}

impl FrequencyTable {
    /// Empty table with one column per counted position of `record`.
    pub fn for_record(record: &ReferenceRecord) -> Self {
        let reference = record.counted_reference();
        let positions = (0..record.counted_len())
            .map(|offset| {
                let base = reference.get(offset).copied().unwrap_or(b'N');
                PositionCounts::new(offset as u32, base)
            })
            .collect();
        Self { positions }
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the table has no positions.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Count every symbol of `counted` at its offset.
    pub fn observe(&mut self, counted: &[u8]) {
        for (node, &base) in self.positions.iter_mut().zip(counted) {
            node.observe(base);
        }
    }

    /// Add another table's counts position by position.
    pub fn absorb(&mut self, other: &Self) {
        debug_assert_eq!(self.len(), other.len());
        for (node, extra) in self.positions.iter_mut().zip(&other.positions) {
            node.absorb(extra);
        }
    }

    /// Reference row, one byte per position.
    pub fn reference_row(&self) -> Vec<u8> {
        self.positions.iter().map(|node| node.reference).collect()
    }

    /// Count row for `base`, one value per position.
    pub fn row(&self, base: u8) -> Vec<u32> {
        self.positions.iter().map(|node| node.count(base)).collect()
    }

    /// Rows in output order: A, C, G, T.
    pub fn rows(&self) -> impl Iterator<Item = (u8, Vec<u32>)> + '_ {
        NUCLEOTIDES.iter().map(move |&base| (base, self.row(base)))
    }
}

/// Bucket totals for one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct BucketCounts {
    /// Classified reads (`normal + indel + removed`).
    pub total: u64,
    /// Reads with no indel evidence.
    pub normal: u64,
    /// Reads with a gap inside the edit window.
    pub indel: u64,
    /// Reads with indel evidence outside the edit window.
    pub removed: u64,
    /// Reads rejected before classification (anchor absent).
    pub rejected: u64,
}

impl BucketCounts {
    /// Record one classified read.
    pub fn record(&mut self, bucket: Bucket) {
        self.total += 1;
        match bucket {
            Bucket::Normal => self.normal += 1,
            Bucket::Indel => self.indel += 1,
            Bucket::Removed => self.removed += 1,
        }
    }

    /// Add another set of totals.
    pub fn absorb(&mut self, other: &Self) {
        self.total += other.total;
        self.normal += other.normal;
        self.indel += other.indel;
        self.removed += other.removed;
        self.rejected += other.rejected;
    }
}

/// Final per-record output of the accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct RecordReport {
    /// Source identifier of the record.
    pub source_id: Arc<str>,
    /// Frequency table over Normal reads.
    pub table: FrequencyTable,
    /// Bucket totals.
    pub counts: BucketCounts,
    /// Literal sequences of the Indel-bucket reads, in input order.
    pub indel_reads: Vec<Vec<u8>>,
}

/// Mergeable partial state: frequency counts, bucket totals and Indel reads.
///
/// Merging is associative; the table and totals are also commutative, while
/// the Indel read list keeps left-then-right order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyAccumulator {
    record: ReferenceRecord,
    table: FrequencyTable,
    counts: BucketCounts,
    indel_reads: Vec<Vec<u8>>,
}

impl FrequencyAccumulator {
    /// Empty accumulator for `record`.
    pub fn new(record: &ReferenceRecord) -> Self {
        Self {
            table: FrequencyTable::for_record(record),
            record: record.clone(),
            counts: BucketCounts::default(),
            indel_reads: Vec::new(),
        }
    }

    /// Record a classified read.
    pub fn record(&mut self, bucket: Bucket, read: &[u8]) {
        self.counts.record(bucket);
        match bucket {
            Bucket::Normal => {
                if let Some(counted) = self.record.counted_slice(read) {
                    self.table.observe(counted);
                }
            }
            Bucket::Indel => self.indel_reads.push(read.to_vec()),
            Bucket::Removed => {}
        }
    }

    /// Record a read that could not be classified.
    pub fn reject(&mut self) {
        self.counts.rejected += 1;
    }

    /// Combine two partial accumulators for the same record.
    pub fn merge(mut self, other: Self) -> Self {
        self.table.absorb(&other.table);
        self.counts.absorb(&other.counts);
        self.indel_reads.extend(other.indel_reads);
        self
    }

    /// Current bucket totals.
    pub fn counts(&self) -> &BucketCounts {
        &self.counts
    }

    /// Current frequency table.
    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    /// Finalize into a report.
    pub fn finish(self) -> RecordReport {
        RecordReport {
            source_id: self.record.source_id().clone(),
            table: self.table,
            counts: self.counts,
            indel_reads: self.indel_reads,
        }
    }
}

/// Accumulate a stream of classified reads into a report for `record`.
pub fn accumulate<'a, I>(record: &ReferenceRecord, stream: I) -> RecordReport
where
    I: IntoIterator<Item = (Bucket, &'a [u8])>,
{
    let mut accumulator = FrequencyAccumulator::new(record);
    for (bucket, read) in stream {
        accumulator.record(bucket, read);
    }
    accumulator.finish()
}
