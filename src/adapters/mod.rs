// 外部系統的具體實作：HTTP 服務、終端機提示、本機檔案

pub mod http;
pub mod prompt;
pub mod storage;

pub use http::HttpForecastClient;
pub use prompt::{InteractiveSource, ScriptedSource};
pub use storage::LocalStorage;

#[cfg(feature = "cli")]
pub use prompt::DialoguerPrompter;
