//! Classification and catalogue benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use indelscan::probe::build_catalogue;
use indelscan::{
    AnalysisConfig, ClassificationWorkload, ClassifierMethod, ProbeLayout, ReferenceRecord,
    WildTypeProbe, WindowSpec,
};

const BARCODE: &[u8] = b"GTGCACACACATATA";
const TARGET: &[u8] = b"ACTGGAACACAAAGCATAGACTGCGGGGCG";

fn workload(reads: usize) -> ClassificationWorkload {
    let record = ReferenceRecord::new(
        "bench",
        BARCODE.to_vec(),
        [BARCODE, TARGET].concat(),
        WindowSpec::new(11),
    )
    .expect("bench record is valid");
    let reads = (0..reads)
        .map(|i| {
            let mut target = TARGET.to_vec();
            if i % 4 == 0 {
                target.remove(20);
            }
            [b"CTTGA".as_slice(), BARCODE, target.as_slice()].concat()
        })
        .collect();
    ClassificationWorkload::new(record, reads)
}

fn benchmark_classification(c: &mut Criterion) {
    let workload = workload(2_000);
    let mut group = c.benchmark_group("classify_2000_reads");
    for method in [
        ClassifierMethod::Alignment,
        ClassifierMethod::EditCount,
        ClassifierMethod::GapPosition,
    ] {
        let analyzer = AnalysisConfig {
            method,
            ..AnalysisConfig::default()
        }
        .analyzer()
        .expect("default config is valid");
        group.bench_with_input(
            BenchmarkId::from_parameter(analyzer.classifier().name()),
            &workload,
            |b, workload| b.iter(|| black_box(analyzer.analyze(workload).expect("analysis"))),
        );
    }
    group.finish();
}

fn benchmark_catalogue(c: &mut Criterion) {
    let probe = WildTypeProbe::new(
        "bench",
        b"AAAACGTACGTACGTACGTACGTACCCGGG",
        ProbeLayout::default(),
    )
    .expect("bench probe is valid");

    c.bench_function("catalogue_30nt_probe", |b| {
        b.iter(|| black_box(build_catalogue(&probe).expect("catalogue").count()));
    });
}

criterion_group!(benches, benchmark_classification, benchmark_catalogue);
criterion_main!(benches);
