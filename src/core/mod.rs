pub mod engine;
pub mod location;
pub mod report;
pub mod steps;
pub mod wizard;

pub use crate::domain::ports::{AnswerSource, ConfigProvider, ForecastApi, Storage};
pub use crate::utils::error::Result;
pub use engine::ForecastEngine;
pub use report::Report;
pub use wizard::{Step, Wizard};
