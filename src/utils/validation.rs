use crate::domain::model::FieldError;
use crate::utils::error::{ForecastError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ForecastError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 表單欄位檢查的累積器：收集所有錯誤後一次回報，而不是遇到第一個就停止
#[derive(Debug, Default)]
pub struct FieldChecks {
    errors: Vec<FieldError>,
}

impl FieldChecks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 必填的選項欄位
    pub fn required<T>(&mut self, field: &str, value: &Option<T>, message: &str) -> &mut Self {
        if value.is_none() {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    /// 必填的整數欄位，並檢查下限
    pub fn required_min(&mut self, field: &str, value: Option<i64>, min: i64) -> &mut Self {
        match value {
            None => self.errors.push(FieldError::new(field, "Required")),
            Some(_) => {
                self.min(field, value, min);
            }
        }
        self
    }

    pub fn min(&mut self, field: &str, value: Option<i64>, min: i64) -> &mut Self {
        if let Some(v) = value {
            if v < min {
                self.errors.push(FieldError::new(
                    field,
                    format!("Number must be greater than or equal to {}", min),
                ));
            }
        }
        self
    }

    pub fn between(&mut self, field: &str, value: Option<i64>, min: i64, max: i64) -> &mut Self {
        if let Some(v) = value {
            if v < min || v > max {
                self.errors.push(FieldError::new(
                    field,
                    format!("Number must be between {} and {}", min, max),
                ));
            }
        }
        self
    }

    pub fn finish(&mut self) -> Vec<FieldError> {
        std::mem::take(&mut self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api.base_url", "https://example.com/api").is_ok());
        assert!(validate_url("api.base_url", "http://127.0.0.1:5000/api").is_ok());
        assert!(validate_url("api.base_url", "").is_err());
        assert!(validate_url("api.base_url", "invalid-url").is_err());
        assert!(validate_url("api.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("location.lat", 45.0, -90.0, 90.0).is_ok());
        assert!(validate_range("location.lat", 91.0, -90.0, 90.0).is_err());
    }

    #[test]
    fn test_field_checks_collects_all_errors() {
        let missing: Option<u8> = None;
        let errors = FieldChecks::new()
            .required("TYPEHUQ", &missing, "Please select a home type.")
            .required_min("SQFTEST", Some(100), 250)
            .min("NCOMBATH", Some(0), 0)
            .between("TEMPHOME", Some(95), 50, 90)
            .finish();

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["TYPEHUQ", "SQFTEST", "TEMPHOME"]);
        assert_eq!(errors[0].message, "Please select a home type.");
    }
}
