#[path = "common/mod.rs"]
mod common;
use common::{amplicon_record, read_with_target, BARCODE, TARGET};
use indelscan::genomics::classifier::classify_window_v1;
use indelscan::{
    AnalysisConfig, Bucket, ClassificationWorkload, ClassifierMethod, ReadClassifier,
    RecordAnalyzer,
};
use test_case::test_case;

fn without(target: &[u8], idx: usize) -> Vec<u8> {
    [&target[..idx], &target[idx + 1..]].concat()
}

fn with_insertion(target: &[u8], idx: usize, base: u8) -> Vec<u8> {
    let mut edited = target.to_vec();
    edited.insert(idx, base);
    edited
}

fn alignment_classifier() -> Box<dyn ReadClassifier> {
    ClassifierMethod::Alignment.build(Default::default(), b"")
}

#[test]
fn intact_read_is_normal() {
    let record = amplicon_record();
    let bucket = alignment_classifier()
        .classify(&record, &read_with_target(TARGET))
        .expect("barcode present");
    assert_eq!(bucket, Bucket::Normal);
}

#[test_case(without(TARGET, 20), Bucket::Indel; "deletion inside window")]
#[test_case(without(TARGET, 13), Bucket::Removed; "deletion upstream of window")]
#[test_case(with_insertion(TARGET, 14, b'T'), Bucket::Removed; "insertion upstream of window")]
#[test_case(without(&without(TARGET, 20), 13), Bucket::Removed; "gaps inside and outside window")]
fn alignment_buckets(target: Vec<u8>, expected: Bucket) {
    let record = amplicon_record();
    let bucket = alignment_classifier()
        .classify(&record, &read_with_target(&target))
        .expect("barcode present");
    assert_eq!(bucket, expected);
}

#[test]
fn every_method_fails_fast_without_barcode() {
    let record = amplicon_record();
    for method in [
        ClassifierMethod::Alignment,
        ClassifierMethod::EditCount,
        ClassifierMethod::GapPosition,
    ] {
        let classifier = method.build(Default::default(), b"");
        assert!(
            classifier.classify(&record, TARGET).is_err(),
            "{} accepted a read without barcode",
            classifier.name()
        );
    }
}

#[test_case(&[], false; "no edits")]
#[test_case(&[(20, b'G')], false; "one substitution")]
#[test_case(&[(19, b'G'), (20, b'A')], true; "two substitutions")]
fn edit_count_window_at_distance_eleven(edits: &[(usize, u8)], expected: bool) {
    let mut target = TARGET.to_vec();
    for &(idx, base) in edits {
        target[idx] = base;
    }
    let read = read_with_target(&target);
    let reference = [BARCODE, TARGET].concat();
    let flagged = classify_window_v1(&read, &reference, BARCODE, 11, 4).expect("anchor present");
    assert_eq!(flagged, expected);
}

#[test]
fn analyzer_counts_every_bucket() {
    let reads = vec![
        read_with_target(TARGET),
        read_with_target(TARGET),
        read_with_target(&without(TARGET, 20)),
        read_with_target(&without(TARGET, 13)),
        TARGET.to_vec(),
    ];
    let workload = ClassificationWorkload::new(amplicon_record(), reads);
    let analyzer = AnalysisConfig {
        block_size: 2,
        ..AnalysisConfig::default()
    }
    .analyzer()
    .expect("default config is valid");

    let report = analyzer.analyze(&workload).expect("analysis succeeds");
    assert_eq!(report.counts.total, 4);
    assert_eq!(report.counts.normal, 2);
    assert_eq!(report.counts.indel, 1);
    assert_eq!(report.counts.removed, 1);
    assert_eq!(report.counts.rejected, 1);
    assert_eq!(report.indel_reads, vec![read_with_target(&without(TARGET, 20))]);

    // Counted substring spans the reference minus the barcode length.
    assert_eq!(report.table.len(), TARGET.len());
    assert_eq!(report.table.reference_row(), [BARCODE, TARGET].concat()[..30].to_vec());
    assert!(report
        .table
        .positions
        .iter()
        .all(|node| node.count(node.reference) == 2));
}

#[test_case(ClassifierMethod::EditCount; "edit count")]
#[test_case(ClassifierMethod::GapPosition; "gap position")]
fn edit_script_methods_split_window_and_flank_indels(method: ClassifierMethod) {
    let reads = vec![
        read_with_target(TARGET),
        read_with_target(&without(TARGET, 20)),
        read_with_target(&without(TARGET, 13)),
        read_with_target(&with_insertion(TARGET, 14, b'T')),
    ];
    let workload = ClassificationWorkload::new(amplicon_record(), reads);
    let analyzer = RecordAnalyzer::new(method.build(Default::default(), b""), 16);
    let report = analyzer.analyze(&workload).expect("analysis succeeds");
    assert_eq!(report.counts.normal, 1);
    assert_eq!(report.counts.indel, 1);
    assert_eq!(report.counts.removed, 2);
    assert_eq!(report.indel_reads, vec![read_with_target(&without(TARGET, 20))]);
}
