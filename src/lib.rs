pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, settings::Settings};
pub use core::{
    etl::{EtlEngine, RunReport},
    pipeline::BulkPipeline,
};
pub use domain::services::{build_bulk_sheet, Expansion};
pub use utils::error::{EtlError, Result};
