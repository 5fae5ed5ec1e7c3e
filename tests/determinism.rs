#[path = "common/mod.rs"]
mod common;
use std::collections::HashSet;

use common::{amplicon_record, read_with_target, TARGET};
use indelscan::{report_fingerprint, AnalysisConfig, ClassificationWorkload, ClassifierMethod};

fn workload() -> ClassificationWorkload {
    let reads = (0..200)
        .map(|i| {
            let mut target = TARGET.to_vec();
            match i % 5 {
                0 => {
                    target.remove(20);
                }
                1 => target[i % TARGET.len()] = b'A',
                2 => {
                    target.remove(13);
                }
                3 => return TARGET.to_vec(),
                _ => {}
            }
            read_with_target(&target)
        })
        .collect();
    ClassificationWorkload::new(amplicon_record(), reads)
}

#[test]
fn reports_are_identical_across_runs_and_block_sizes() {
    let workload = workload();
    for method in [
        ClassifierMethod::Alignment,
        ClassifierMethod::EditCount,
        ClassifierMethod::GapPosition,
    ] {
        let mut fingerprints = HashSet::new();
        for (block_size, parallel) in [(1, true), (7, true), (64, false), (1024, true)] {
            let analyzer = AnalysisConfig {
                method,
                block_size,
                parallel,
                ..AnalysisConfig::default()
            }
            .analyzer()
            .expect("config is valid");
            let report = analyzer.analyze(&workload).expect("analysis succeeds");
            assert_eq!(report.counts.rejected, 40);
            fingerprints.insert(report_fingerprint(&report).expect("rendering succeeds"));
        }
        assert_eq!(fingerprints.len(), 1, "{method:?} outputs diverged");
    }
}
