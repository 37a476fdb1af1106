#![warn(clippy::large_types_passed_by_value)]

pub mod align;
pub mod errors;
pub mod gene;
pub mod labels;
pub mod parameters;
pub mod reference;
pub mod shuffler;
pub mod table;

pub use crate::align::{assign_d, match_j_suffix, match_v_prefix, DMatch};
pub use crate::errors::{ErrorCollector, RecordError, RecordFailure};
pub use crate::gene::{with_default_allele, Chain, Gene, SegmentType};
pub use crate::labels::{LabeledCdr3, RegionLabel};
pub use crate::parameters::ShuffleParameters;
pub use crate::reference::GermlineReference;
pub use crate::shuffler::{
    analyze_pool, analyze_record, shuffle, CutRecord, InputRecord, ShuffleOutput, ShuffledRecord,
};
pub use crate::table::{output_table, records_from_table, Table};
