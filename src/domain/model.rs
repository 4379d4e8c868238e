use serde::{Deserialize, Serialize};
use std::fmt;

/// 單一欄位的驗證錯誤
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// 氣候查詢使用三位小數（約 100 公尺），同一區域可以共用快取
    pub fn rounded(self) -> Self {
        Self {
            lat: (self.lat * 1000.0).round() / 1000.0,
            lng: (self.lng * 1000.0).round() / 1000.0,
        }
    }

    pub fn is_valid(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeItem {
    pub id: String,
    pub formatted: String,
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeItem {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTemp {
    pub day: String,
    pub temp: f64,
}

/// 65°F 基準的年度採暖 / 製冷度日
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateNormals {
    #[serde(rename = "HDD65")]
    pub hdd65: f64,
    #[serde(rename = "CDD65")]
    pub cdd65: f64,
    #[serde(default)]
    pub stats: Vec<DailyTemp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// 預測結果，單位為每年千 BTU
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct PredictResponse {
    pub btuel: f64,
    pub btung: f64,
    pub btulp: f64,
    pub btufo: f64,
    pub btuwd: f64,
}
