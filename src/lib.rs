pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, ProbeSettings};
pub use crate::core::{
    analyze_pipeline::AnalyzePipeline, decode_pipeline::DecodePipeline, engine::ProbeEngine,
    structure_pipeline::StructurePipeline,
};
pub use utils::error::{ProbeError, Result};
