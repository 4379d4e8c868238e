use crate::adapters::prompt::ScriptedSource;
use crate::core::steps::{ApplianceForm, HomeForm, HouseholdForm, HvacForm};
use crate::domain::model::Coordinates;
use crate::domain::ports::{ConfigProvider, LocationQuery};
use crate::utils::error::{ForecastError, Result};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_FILE_NAME: &str = "forecast_{timestamp}";
pub const VALID_FORMATS: &[&str] = &["text", "txt", "json", "csv"];
const ANSWER_SECTIONS: usize = 4;

/// 設定檔兼答案檔；每個區段都可以省略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub location: LocationConfig,
    pub home: Option<HomeForm>,
    pub appliances: Option<ApplianceForm>,
    pub hvac: Option<HvacForm>,
    pub household: Option<HouseholdForm>,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub search: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// 搜尋結果有多筆時使用第幾筆
    pub choice: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub file_name: String,
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            formats: Vec::new(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        tracing::debug!("📄 Loaded config from {}", path.as_ref().display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| ForecastError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 設定檔中的位置；沒有設定時回傳 None
    pub fn location_query(&self) -> Result<Option<LocationQuery>> {
        let loc = &self.location;
        match (&loc.search, loc.lat, loc.lng) {
            (Some(search), None, None) => Ok(Some(LocationQuery::Search(search.clone()))),
            (None, Some(lat), Some(lng)) => Ok(Some(LocationQuery::Device(Coordinates::new(lat, lng)))),
            (None, None, None) => Ok(None),
            (Some(_), _, _) => Err(ForecastError::ConfigValidationError {
                field: "location".to_string(),
                message: "use either search or lat/lng, not both".to_string(),
            }),
            (None, Some(_), None) => Err(ForecastError::MissingConfigError {
                field: "location.lng".to_string(),
            }),
            (None, None, Some(_)) => Err(ForecastError::MissingConfigError {
                field: "location.lat".to_string(),
            }),
        }
    }

    /// 四個表單區段都有時，整份設定可以當作答案檔直接執行
    pub fn has_answers(&self) -> bool {
        let missing = self.missing_answer_sections();
        if !missing.is_empty() && missing.len() < ANSWER_SECTIONS {
            tracing::warn!(
                "🔶 Answers file is missing [{}]; all sections will be asked interactively",
                missing.join("], [")
            );
        }
        missing.is_empty()
    }

    pub fn missing_answer_sections(&self) -> Vec<&'static str> {
        [
            ("home", self.home.is_some()),
            ("appliances", self.appliances.is_some()),
            ("hvac", self.hvac.is_some()),
            ("household", self.household.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name)
        .collect()
    }

    pub fn scripted_source(&self) -> Result<ScriptedSource> {
        Ok(ScriptedSource {
            location: self.location_query()?,
            choice: self.location.choice,
            home: self.home.clone().unwrap_or_default(),
            appliances: self.appliances.clone().unwrap_or_default(),
            hvac: self.hvac.clone().unwrap_or_default(),
            household: self.household.clone().unwrap_or_default(),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.output.file_name
    }
}

/// 替換環境變數 (例如 ${API_HOST})；未定義的變數保持原樣
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ForecastError::ConfigValidationError {
        field: "env_substitution".to_string(),
        message: e.to_string(),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.into_owned())
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds
    }

    fn output_path(&self) -> Option<&str> {
        if self.output.formats.is_empty() {
            None
        } else {
            Some(&self.output.path)
        }
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 300)?;

        if let Some(LocationQuery::Device(coords)) = self.location_query()? {
            validate_range("location.lat", coords.lat, -90.0, 90.0)?;
            validate_range("location.lng", coords.lng, -180.0, 180.0)?;
        }

        if !self.output.formats.is_empty() {
            validate_path("output.path", &self.output.path)?;
            validate_path("output.file_name", &self.output.file_name)?;
        }
        for format in &self.output.formats {
            if !VALID_FORMATS.contains(&format.as_str()) {
                return Err(ForecastError::InvalidConfigValueError {
                    field: "output.formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        VALID_FORMATS.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::codes::{HomeType, WaterHeaterSize};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ANSWERS: &str = r#"
[api]
base_url = "http://localhost:5000/api"

[location]
search = "80202"

[home]
home_type = "single_family_detached"
year_made = 6
square_feet = 1800
bedrooms = 3
full_baths = 2
half_baths = 0
basement = "finished"
wall_type = "brick"
glass_type = "double_pane"
insulation = "well_insulated"

[appliances]
fridge_count = 1
fridge_type = "two_door_freezer_top"

[hvac]
heats_home = true
heating_equipment = "central_furnace"
heating_fuel = "natural_gas"
water_heater_size = "medium"
water_heater_fuel = "natural_gas"

[household]
household_members = 2
thermostat_type = "programmable"
heating_control = "programmable"
cooling_control = "no_control"

[output]
path = "./reports"
formats = ["text", "json"]
"#;

    #[test]
    fn test_defaults_when_sections_are_missing() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.api_base_url(), DEFAULT_API_URL);
        assert_eq!(config.timeout_seconds(), DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.output_path(), None);
        assert!(!config.has_answers());
        assert!(config.location_query().unwrap().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_answers_file() {
        let config = TomlConfig::from_toml_str(ANSWERS).unwrap();
        assert!(config.has_answers());
        assert!(config.validate().is_ok());
        assert_eq!(config.output_path(), Some("./reports"));

        let source = config.scripted_source().unwrap();
        assert_eq!(source.location, Some(LocationQuery::Search("80202".to_string())));
        assert_eq!(source.home.home_type, Some(HomeType::SingleFamilyDetached));
        assert_eq!(source.hvac.water_heater_size, Some(WaterHeaterSize::Medium));
    }

    #[test]
    fn test_partial_answers_list_missing_sections() {
        let config = TomlConfig::from_toml_str("[home]\nbedrooms = 3\n\n[hvac]\n").unwrap();
        assert!(!config.has_answers());
        assert_eq!(config.missing_answer_sections(), vec!["appliances", "household"]);

        let config = TomlConfig::from_toml_str(ANSWERS).unwrap();
        assert!(config.missing_answer_sections().is_empty());
    }

    #[test]
    fn test_unknown_answer_field_is_rejected() {
        let err = TomlConfig::from_toml_str("[home]\nbedroomz = 3\n").unwrap_err();
        assert!(err.to_string().contains("toml_parsing"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ENERGY_FORECAST_TEST_HOST", "forecast.internal:8080");

        let config = TomlConfig::from_toml_str(
            "[api]\nbase_url = \"http://${ENERGY_FORECAST_TEST_HOST}/api\"\n",
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://forecast.internal:8080/api");

        std::env::remove_var("ENERGY_FORECAST_TEST_HOST");
    }

    #[test]
    fn test_location_must_be_search_or_coordinates() {
        let config = TomlConfig::from_toml_str("[location]\nlat = 39.7\n").unwrap();
        assert!(matches!(
            config.location_query(),
            Err(ForecastError::MissingConfigError { .. })
        ));

        let config =
            TomlConfig::from_toml_str("[location]\nsearch = \"Denver\"\nlat = 39.7\nlng = -105.0\n")
                .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[location]\nlat = 139.7\nlng = -105.0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_settings() {
        let config = TomlConfig::from_toml_str("[api]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[output]\nformats = [\"xlsx\"]\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("xlsx"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(ANSWERS.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.location.choice, 0);
        assert_eq!(config.household.unwrap().household_members, Some(2));
    }
}
