//! 精靈的步驟狀態機，以及逐步累積的預測請求

use crate::domain::model::{ClimateNormals, GeocodeItem};
use crate::domain::request::PredictRequest;
use crate::utils::error::{ForecastError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Step {
    #[default]
    Location,
    Home,
    Appliances,
    Hvac,
    Household,
    Predict,
}

impl Step {
    pub fn next(self) -> Step {
        match self {
            Step::Location => Step::Home,
            Step::Home => Step::Appliances,
            Step::Appliances => Step::Hvac,
            Step::Hvac => Step::Household,
            Step::Household | Step::Predict => Step::Predict,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::Location => "location",
            Step::Home => "home",
            Step::Appliances => "appliances",
            Step::Hvac => "hvac",
            Step::Household => "household",
            Step::Predict => "predict",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: Step,
    location: Option<GeocodeItem>,
    climate: Option<ClimateNormals>,
    record: PredictRequest,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn location(&self) -> Option<&GeocodeItem> {
        self.location.as_ref()
    }

    pub fn climate(&self) -> Option<&ClimateNormals> {
        self.climate.as_ref()
    }

    pub fn record(&self) -> &PredictRequest {
        &self.record
    }

    /// 記錄位置與氣候常年值，並把度日併入請求
    pub fn set_location(&mut self, item: GeocodeItem, climate: ClimateNormals) -> Result<()> {
        self.expect_step(Step::Location)?;

        tracing::info!(
            "📍 Location set to {} (HDD65 {:.0}, CDD65 {:.0})",
            item.formatted,
            climate.hdd65,
            climate.cdd65
        );
        self.record = std::mem::take(&mut self.record).with_climate(&climate);
        self.location = Some(item);
        self.climate = Some(climate);
        self.step = Step::Home;
        Ok(())
    }

    /// 合併目前步驟的部分結果並前進
    pub fn submit(&mut self, step: Step, partial: PredictRequest) -> Result<Step> {
        if matches!(step, Step::Location | Step::Predict) {
            return Err(ForecastError::WizardStateError {
                message: format!("the {} step does not accept answers", step),
            });
        }
        self.expect_step(step)?;

        let added = partial.field_count();
        self.record.merge(partial);
        let next = step.next();
        self.step = next;

        tracing::debug!(
            "➡️ {} submitted {} fields, record now has {} ({} → {})",
            step,
            added,
            self.record.field_count(),
            step,
            next
        );
        Ok(next)
    }

    /// 回傳完整的請求；必填欄位缺少時列出它們
    pub fn finish(&self) -> Result<PredictRequest> {
        self.expect_step(Step::Predict)?;

        let missing = self.record.missing_required();
        if !missing.is_empty() {
            return Err(ForecastError::WizardStateError {
                message: format!("missing required fields: {}", missing.join(", ")),
            });
        }
        Ok(self.record.clone())
    }

    pub fn reset(&mut self) {
        tracing::info!("🔄 Starting over");
        *self = Self::default();
    }

    fn expect_step(&self, step: Step) -> Result<()> {
        if self.step() != step {
            return Err(ForecastError::WizardStateError {
                message: format!("expected the {} step but the wizard is at {}", step, self.step()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::steps::{ApplianceForm, HomeForm, HouseholdForm, HvacForm, StepForm};
    use crate::domain::codes::*;

    fn denver() -> (GeocodeItem, ClimateNormals) {
        (
            GeocodeItem {
                id: "80202".to_string(),
                formatted: "Denver, CO 80202, USA".to_string(),
                lat: 39.7527,
                lng: -104.9992,
            },
            ClimateNormals {
                hdd65: 5961.4,
                cdd65: 787.0,
                stats: vec![],
            },
        )
    }

    fn home() -> HomeForm {
        HomeForm {
            home_type: Some(HomeType::SingleFamilyDetached),
            year_made: Some(YearMadeRange::From1990To1999),
            square_feet: Some(2000),
            bedrooms: Some(3),
            full_baths: Some(2),
            half_baths: Some(1),
            wall_type: Some(WallType::Siding),
            glass_type: Some(GlassType::DoublePane),
            insulation: Some(Insulation::AdequatelyInsulated),
            ..Default::default()
        }
    }

    fn hvac() -> HvacForm {
        HvacForm {
            water_heater_size: Some(WaterHeaterSize::Large),
            water_heater_fuel: Some(WaterHeaterFuel::NaturalGas),
            ..Default::default()
        }
    }

    fn household() -> HouseholdForm {
        HouseholdForm {
            household_members: Some(2),
            thermostat_type: Some(ThermostatType::Manual),
            heating_control: Some(ThermostatControl::ManuallyAdjust),
            cooling_control: Some(ThermostatControl::NoControl),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_walk_produces_complete_request() {
        let mut wizard = Wizard::new();
        assert_eq!(wizard.step(), Step::Location);

        let (item, climate) = denver();
        wizard.set_location(item, climate).unwrap();
        assert_eq!(wizard.record().hdd65, Some(5961));

        wizard.submit(Step::Home, home().submit().unwrap()).unwrap();
        wizard
            .submit(Step::Appliances, ApplianceForm::default().submit().unwrap())
            .unwrap();
        wizard.submit(Step::Hvac, hvac().submit().unwrap()).unwrap();
        let next = wizard
            .submit(Step::Household, household().submit().unwrap())
            .unwrap();
        assert_eq!(next, Step::Predict);

        let request = wizard.finish().unwrap();
        assert!(request.missing_required().is_empty());
        assert_eq!(request.cdd65, Some(787));
        assert_eq!(request.bedrooms, Some(3));
    }

    #[test]
    fn test_home_requires_location_first() {
        let mut wizard = Wizard::new();
        let err = wizard
            .submit(Step::Home, home().submit().unwrap())
            .unwrap_err();
        assert!(matches!(err, ForecastError::WizardStateError { .. }));
        assert!(wizard.record().is_empty());
    }

    #[test]
    fn test_out_of_order_submit_is_rejected() {
        let mut wizard = Wizard::new();
        let (item, climate) = denver();
        wizard.set_location(item, climate).unwrap();

        let err = wizard.submit(Step::Hvac, hvac().submit().unwrap()).unwrap_err();
        assert!(err.to_string().contains("expected the home step"));
        assert_eq!(wizard.step(), Step::Home);
    }

    #[test]
    fn test_finish_lists_missing_fields() {
        let mut wizard = Wizard::new();
        let (item, climate) = denver();
        wizard.set_location(item, climate).unwrap();
        wizard.submit(Step::Home, PredictRequest::new()).unwrap();
        wizard.submit(Step::Appliances, PredictRequest::new()).unwrap();
        wizard.submit(Step::Hvac, PredictRequest::new()).unwrap();
        wizard.submit(Step::Household, PredictRequest::new()).unwrap();

        let err = wizard.finish().unwrap_err();
        assert!(err.to_string().contains("TYPEHUQ"));
        assert!(err.to_string().contains("MORETHAN1H2O"));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut wizard = Wizard::new();
        let (item, climate) = denver();
        wizard.set_location(item, climate).unwrap();
        wizard.submit(Step::Home, home().submit().unwrap()).unwrap();

        wizard.reset();
        assert_eq!(wizard.step(), Step::Location);
        assert!(wizard.location().is_none());
        assert!(wizard.record().is_empty());
        assert!(wizard.finish().is_err());
    }
}
