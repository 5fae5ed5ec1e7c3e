//! Mismatch and bulge variant catalogues for guide probes.
//!
//! A wild-type probe is split into fixed segments ([`ProbeLayout`]); only
//! the target segment is mutated. Each variant is written back between the
//! untouched flanks and emitted as a catalogue row.

mod catalogue;
pub mod generator;
mod wild_type;

pub use catalogue::{build_catalogue, render_catalogue, write_catalogue, CatalogueRow};
pub use generator::{
    add_one_bulge, all_variants, check_duplicate, one_mismatch, remove_one_bulge, two_mismatch,
    GeneratorError, Variant, VariantKind,
};
pub use wild_type::{ProbeError, ProbeLayout, WildTypeProbe};
