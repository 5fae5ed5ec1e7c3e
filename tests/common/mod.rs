#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use indelscan::{ReferenceRecord, WindowSpec};

pub const BARCODE: &[u8] = b"GTGCACACACATATA";
pub const TARGET: &[u8] = b"ACTGGAACACAAAGCATAGACTGCGGGGCG";
pub const WILD: &[u8] = b"AAAACGTACGTACGTACGTACGTACCCGGG";

/// Record whose reference is `BARCODE + TARGET`, window at distance 11.
pub fn amplicon_record() -> ReferenceRecord {
    ReferenceRecord::new(
        "amplicon",
        BARCODE.to_vec(),
        [BARCODE, TARGET].concat(),
        WindowSpec::new(11),
    )
    .expect("fixture record is valid")
}

/// Read carrying `target` after a short leader and the barcode.
pub fn read_with_target(target: &[u8]) -> Vec<u8> {
    [b"CTTGA".as_slice(), BARCODE, target].concat()
}

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("INDELSCAN_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set INDELSCAN_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path, expected, actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n")
}
