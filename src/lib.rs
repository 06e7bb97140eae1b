pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    etl::TableGenEngine,
    normalize::DoubleFactorial,
    pipeline::{generate_table, CoeffPipeline},
    render::TableRenderer,
};
pub use domain::model::Model;
pub use utils::error::{Result, TableGenError};
