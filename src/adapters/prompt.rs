//! 答案來源：終端機互動提示，或從答案檔讀入的固定答案

use crate::core::steps::{
    ApplianceForm, HomeForm, HouseholdForm, HvacForm, Prompter, StepForm,
};
use crate::domain::model::{Coordinates, FieldError, GeocodeItem};
use crate::domain::ports::{AnswerSource, LocationQuery};
use crate::utils::error::{ForecastError, Result};

#[cfg(feature = "cli")]
pub use terminal::DialoguerPrompter;

#[cfg(feature = "cli")]
mod terminal {
    use super::Prompter;
    use crate::utils::error::{ForecastError, Result};
    use dialoguer::theme::ColorfulTheme;
    use dialoguer::{Confirm, Input, Select};

    fn prompt_error(e: dialoguer::Error) -> ForecastError {
        ForecastError::PromptError {
            message: e.to_string(),
        }
    }

    /// 以 dialoguer 在終端機上詢問
    #[derive(Default)]
    pub struct DialoguerPrompter {
        theme: ColorfulTheme,
    }

    impl DialoguerPrompter {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Prompter for DialoguerPrompter {
        fn select(&mut self, prompt: &str, options: &[String], default: Option<usize>) -> Result<usize> {
            Select::with_theme(&self.theme)
                .with_prompt(prompt)
                .items(options)
                .default(default.unwrap_or(0))
                .interact()
                .map_err(prompt_error)
        }

        fn number(&mut self, prompt: &str, min: Option<i64>, max: Option<i64>) -> Result<Option<i64>> {
            let answer: String = Input::with_theme(&self.theme)
                .with_prompt(prompt)
                .allow_empty(true)
                .validate_with(|input: &String| -> std::result::Result<(), String> {
                    if input.trim().is_empty() {
                        return Ok(());
                    }
                    let value: i64 = input
                        .trim()
                        .parse()
                        .map_err(|_| "Enter a whole number".to_string())?;
                    match (min, max) {
                        (Some(lo), Some(hi)) if value < lo || value > hi => {
                            Err(format!("Number must be between {} and {}", lo, hi))
                        }
                        (Some(lo), _) if value < lo => {
                            Err(format!("Number must be greater than or equal to {}", lo))
                        }
                        (_, Some(hi)) if value > hi => {
                            Err(format!("Number must be less than or equal to {}", hi))
                        }
                        _ => Ok(()),
                    }
                })
                .interact_text()
                .map_err(prompt_error)?;

            let trimmed = answer.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse()
                .map(Some)
                .map_err(|_| ForecastError::PromptError {
                    message: format!("'{}' is not a number", trimmed),
                })
        }

        fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
            Confirm::with_theme(&self.theme)
                .with_prompt(prompt)
                .default(default)
                .interact()
                .map_err(prompt_error)
        }

        fn text(&mut self, prompt: &str) -> Result<String> {
            Input::<String>::with_theme(&self.theme)
                .with_prompt(prompt)
                .interact_text()
                .map_err(prompt_error)
        }
    }
}

/// 逐步詢問使用者
pub struct InteractiveSource<P: Prompter> {
    prompter: P,
}

impl<P: Prompter> InteractiveSource<P> {
    pub fn new(prompter: P) -> Self {
        Self { prompter }
    }

    fn coordinate(&mut self, prompt: &str) -> Result<f64> {
        let answer = self.prompter.text(prompt)?;
        answer
            .trim()
            .parse()
            .map_err(|_| ForecastError::LocationError {
                message: format!("'{}' is not a valid coordinate", answer.trim()),
            })
    }
}

impl<P: Prompter + Send> AnswerSource for InteractiveSource<P> {
    fn location_query(&mut self) -> Result<LocationQuery> {
        let options = vec![
            "Search by ZIP code or address".to_string(),
            "Enter coordinates".to_string(),
        ];
        match self.prompter.select("Location", &options, Some(0))? {
            0 => Ok(LocationQuery::Search(self.prompter.text("Search")?)),
            _ => {
                let lat = self.coordinate("Latitude")?;
                let lng = self.coordinate("Longitude")?;
                Ok(LocationQuery::Device(Coordinates::new(lat, lng)))
            }
        }
    }

    fn choose_location(&mut self, candidates: &[GeocodeItem]) -> Result<usize> {
        let labels: Vec<String> = candidates.iter().map(|c| c.formatted.clone()).collect();
        self.prompter.select("Choose your location", &labels, Some(0))
    }

    fn retry_location(&mut self, error: &ForecastError) -> Result<bool> {
        eprintln!("❌ {}", error.user_friendly_message());
        Ok(true)
    }

    fn home(&mut self) -> Result<HomeForm> {
        HomeForm::collect(&mut self.prompter)
    }

    fn appliances(&mut self) -> Result<ApplianceForm> {
        ApplianceForm::collect(&mut self.prompter)
    }

    fn hvac(&mut self) -> Result<HvacForm> {
        HvacForm::collect(&mut self.prompter)
    }

    fn household(&mut self) -> Result<HouseholdForm> {
        HouseholdForm::collect(&mut self.prompter)
    }

    fn retry_after_errors(&mut self, step: &str, errors: &[FieldError]) -> Result<bool> {
        eprintln!("❌ Some {} answers need attention:", step);
        for error in errors {
            eprintln!("   • {}", error);
        }
        self.prompter.confirm("Answer this section again?", true)
    }
}

/// 答案檔提供的固定答案；驗證失敗不會重試
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    pub location: Option<LocationQuery>,
    pub choice: usize,
    pub home: HomeForm,
    pub appliances: ApplianceForm,
    pub hvac: HvacForm,
    pub household: HouseholdForm,
}

impl AnswerSource for ScriptedSource {
    fn location_query(&mut self) -> Result<LocationQuery> {
        self.location
            .clone()
            .ok_or_else(|| ForecastError::MissingConfigError {
                field: "location.search or location.lat/lng".to_string(),
            })
    }

    fn choose_location(&mut self, candidates: &[GeocodeItem]) -> Result<usize> {
        if self.choice >= candidates.len() {
            return Err(ForecastError::InvalidConfigValueError {
                field: "location.choice".to_string(),
                value: self.choice.to_string(),
                reason: format!("only {} location(s) matched", candidates.len()),
            });
        }
        Ok(self.choice)
    }

    fn retry_location(&mut self, _error: &ForecastError) -> Result<bool> {
        Ok(false)
    }

    fn home(&mut self) -> Result<HomeForm> {
        Ok(self.home.clone())
    }

    fn appliances(&mut self) -> Result<ApplianceForm> {
        Ok(self.appliances.clone())
    }

    fn hvac(&mut self) -> Result<HvacForm> {
        Ok(self.hvac.clone())
    }

    fn household(&mut self) -> Result<HouseholdForm> {
        Ok(self.household.clone())
    }

    fn retry_after_errors(&mut self, step: &str, errors: &[FieldError]) -> Result<bool> {
        for error in errors {
            tracing::warn!("🔶 [{}] {}", step, error);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::steps::testing::ScriptedPrompter;

    fn candidates() -> Vec<GeocodeItem> {
        ["Springfield, IL, USA", "Springfield, MO, USA"]
            .iter()
            .enumerate()
            .map(|(i, name)| GeocodeItem {
                id: i.to_string(),
                formatted: name.to_string(),
                lat: 39.8,
                lng: -89.6,
            })
            .collect()
    }

    #[test]
    fn test_interactive_search_query() {
        let mut source = InteractiveSource::new(ScriptedPrompter::new(&[
            "Search by ZIP code or address",
            "Springfield",
            "Springfield, MO, USA",
        ]));

        let query = source.location_query().unwrap();
        assert_eq!(query, LocationQuery::Search("Springfield".to_string()));
        assert_eq!(source.choose_location(&candidates()).unwrap(), 1);
    }

    #[test]
    fn test_interactive_coordinates() {
        let mut source = InteractiveSource::new(ScriptedPrompter::new(&[
            "Enter coordinates",
            " 39.78 ",
            "-89.65",
        ]));
        assert_eq!(
            source.location_query().unwrap(),
            LocationQuery::Device(Coordinates::new(39.78, -89.65))
        );

        let mut source = InteractiveSource::new(ScriptedPrompter::new(&["Enter coordinates", "north"]));
        assert!(matches!(
            source.location_query(),
            Err(ForecastError::LocationError { .. })
        ));
    }

    #[test]
    fn test_interactive_retry_asks() {
        let mut source = InteractiveSource::new(ScriptedPrompter::new(&["y"]));
        let errors = vec![FieldError::new("SQFTEST", "Number must be greater than or equal to 250")];
        assert!(source.retry_after_errors("home", &errors).unwrap());
    }

    #[test]
    fn test_scripted_source_never_retries() {
        let mut source = ScriptedSource::default();
        assert!(!source.retry_after_errors("home", &[]).unwrap());
        let err = ForecastError::LocationError {
            message: "Search must be at least 3 characters".to_string(),
        };
        assert!(!source.retry_location(&err).unwrap());
        assert!(matches!(
            source.location_query(),
            Err(ForecastError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_scripted_choice_out_of_range() {
        let mut source = ScriptedSource {
            choice: 5,
            ..Default::default()
        };
        let err = source.choose_location(&candidates()).unwrap_err();
        assert!(err.to_string().contains("location.choice"));
    }
}
