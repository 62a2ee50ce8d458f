pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{
    analysis::{analyze, search_breeds, select_breed, AnalysisOptions, MalformedRangePolicy},
    etl::{ReportEngine, RunSummary},
    pipeline::BreedPipeline,
};
pub use domain::model::{BreedId, BreedRecord, BreedTables, NormalizedBreed};
pub use utils::error::{Result, StatsError};
