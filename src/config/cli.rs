use super::toml_config::TomlConfig;
use crate::utils::error::{ForecastError, Result};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "energy-forecast")]
#[command(about = "Estimate a home's yearly energy use and cost")]
pub struct CliConfig {
    #[arg(long, short, help = "TOML settings or answers file")]
    pub config: Option<String>,

    #[arg(long, help = "Forecast API base URL")]
    pub api_url: Option<String>,

    #[arg(long, help = "ZIP code or address to search for", conflicts_with_all = ["lat", "lng"])]
    pub search: Option<String>,

    #[arg(long, allow_hyphen_values = true, requires = "lng")]
    pub lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lng: Option<f64>,

    #[arg(long, help = "Directory for exported reports")]
    pub output: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Export formats: text, json, csv")]
    pub format: Vec<String>,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Only check that the forecast API is reachable")]
    pub check: bool,

    #[arg(long, help = "Collect answers and print the request without predicting")]
    pub dry_run: bool,
}

impl CliConfig {
    /// 載入設定檔（若有），再以命令列參數覆蓋
    pub fn load_settings(&self) -> Result<TomlConfig> {
        let mut settings = match &self.config {
            Some(path) => TomlConfig::from_file(path).map_err(|e| match e {
                ForecastError::IoError(io) => ForecastError::InvalidConfigValueError {
                    field: "--config".to_string(),
                    value: path.clone(),
                    reason: io.to_string(),
                },
                other => other,
            })?,
            None => TomlConfig::default(),
        };

        if let Some(url) = &self.api_url {
            settings.api.base_url = url.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.api.timeout_seconds = timeout;
        }
        if let Some(search) = &self.search {
            settings.location.search = Some(search.clone());
            settings.location.lat = None;
            settings.location.lng = None;
        }
        if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            settings.location.search = None;
            settings.location.lat = Some(lat);
            settings.location.lng = Some(lng);
        }
        if let Some(output) = &self.output {
            settings.output.path = output.clone();
            if settings.output.formats.is_empty() && self.format.is_empty() {
                settings.output.formats = vec!["text".to_string()];
            }
        }
        if !self.format.is_empty() {
            settings.output.formats = self.format.clone();
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ConfigProvider, LocationQuery};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"[api]\nbase_url = \"http://file:5000/api\"\ntimeout_seconds = 10\n\n[location]\nsearch = \"Boston\"\n",
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();

        let cli = CliConfig::parse_from([
            "energy-forecast",
            "--config",
            path.as_str(),
            "--api-url",
            "http://cli:5000/api",
            "--lat",
            "42.36",
            "--lng",
            "-71.06",
            "--format",
            "json,csv",
        ]);
        let settings = cli.load_settings().unwrap();

        assert_eq!(settings.api_base_url(), "http://cli:5000/api");
        assert_eq!(settings.timeout_seconds(), 10);
        assert!(matches!(
            settings.location_query().unwrap(),
            Some(LocationQuery::Device(_))
        ));
        assert_eq!(settings.output_formats(), &["json", "csv"]);
    }

    #[test]
    fn test_output_dir_implies_text_report() {
        let cli = CliConfig::parse_from(["energy-forecast", "--output", "/tmp/reports"]);
        let settings = cli.load_settings().unwrap();
        assert_eq!(settings.output_path(), Some("/tmp/reports"));
        assert_eq!(settings.output_formats(), &["text"]);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = CliConfig::parse_from(["energy-forecast", "--config", "/nonexistent/answers.toml"]);
        let err = cli.load_settings().unwrap_err();
        assert!(err.to_string().contains("--config"));
    }

    #[test]
    fn test_search_conflicts_with_coordinates() {
        let result = CliConfig::try_parse_from([
            "energy-forecast",
            "--search",
            "Boston",
            "--lat",
            "42.0",
            "--lng",
            "-71.0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_only_against_given_api() {
        let cli = CliConfig::parse_from([
            "energy-forecast",
            "--check",
            "--api-url",
            "http://forecast.local:5000/api",
        ]);
        let settings = cli.load_settings().unwrap();

        assert!(cli.check);
        assert_eq!(settings.api_base_url(), "http://forecast.local:5000/api");
        assert_eq!(settings.output_path(), None);
    }
}
