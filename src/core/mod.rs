pub mod analyze_pipeline;
pub mod decode_pipeline;
pub mod engine;
pub mod heuristics;
pub mod shape;
pub mod structure_pipeline;
pub mod wrapper;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{
    Analysis, Artifact, CompressedField, IndexSnapshot, ProbeOutput, Report, Section, ShardFile,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, ReportFormat, Storage};
pub use crate::utils::error::Result;
