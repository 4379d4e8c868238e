pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpForecastClient, LocalStorage, ScriptedSource};
pub use config::TomlConfig;
pub use core::{engine::ForecastEngine, report::Report};
pub use utils::error::{ForecastError, Result};
