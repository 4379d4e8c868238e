use super::{choose, count_or_zero, to_count, Prompter, StepForm};
use crate::domain::codes::{ThermostatControl, ThermostatType};
use crate::domain::model::FieldError;
use crate::domain::request::PredictRequest;
use crate::utils::error::Result;
use crate::utils::validation::FieldChecks;
use serde::{Deserialize, Serialize};

/// 溫度設定點的合理範圍（°F）
pub const SETPOINT_RANGE: (i64, i64) = (50, 90);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HouseholdForm {
    pub household_members: Option<i64>,
    pub thermostat_type: Option<ThermostatType>,
    pub heating_control: Option<ThermostatControl>,
    pub heating_setpoint: Option<i64>,
    pub cooling_control: Option<ThermostatControl>,
    pub cooling_setpoint: Option<i64>,
    pub tv_count: Option<i64>,
    pub console_count: Option<i64>,
    pub desktop_count: Option<i64>,
    pub laptop_count: Option<i64>,
    pub tablet_count: Option<i64>,
    pub smartphone_count: Option<i64>,
    pub ev_charging: Option<bool>,
}

impl StepForm for HouseholdForm {
    const NAME: &'static str = "household";

    fn apply_visibility(&mut self) -> Vec<&'static str> {
        Vec::new()
    }

    fn validate(&self) -> Vec<FieldError> {
        let (low, high) = SETPOINT_RANGE;
        FieldChecks::new()
            .required_min("NHSLDMEM", self.household_members, 1)
            .required("TYPETHERM", &self.thermostat_type, "Please select a type.")
            .required("HEATCNTL", &self.heating_control, "Please select a type.")
            .between("TEMPHOME", self.heating_setpoint, low, high)
            .required("COOLCNTL", &self.cooling_control, "Please select a type.")
            .between("TEMPHOMEAC", self.cooling_setpoint, low, high)
            .min("TVCOLOR", self.tv_count, 0)
            .min("PLAYSTA", self.console_count, 0)
            .min("DESKTOP", self.desktop_count, 0)
            .min("NUMLAPTOP", self.laptop_count, 0)
            .min("NUMTABLET", self.tablet_count, 0)
            .min("NUMSMPHONE", self.smartphone_count, 0)
            .finish()
    }

    fn collect(prompter: &mut dyn Prompter) -> Result<Self> {
        let (low, high) = SETPOINT_RANGE;
        Ok(HouseholdForm {
            household_members: prompter.number("People in household", Some(1), None)?,
            thermostat_type: Some(choose(prompter, "Thermostat type", ThermostatType::ALL)?),
            heating_control: Some(choose(prompter, "Heating control", ThermostatControl::ALL)?),
            heating_setpoint: prompter.number("Heating setpoint (°F)", Some(low), Some(high))?,
            cooling_control: Some(choose(prompter, "Cooling control", ThermostatControl::ALL)?),
            cooling_setpoint: prompter.number("Cooling setpoint (°F)", Some(low), Some(high))?,
            tv_count: prompter.number("TVs", Some(0), None)?,
            console_count: prompter.number("Game consoles", Some(0), None)?,
            desktop_count: prompter.number("Desktop computers", Some(0), None)?,
            laptop_count: prompter.number("Laptops", Some(0), None)?,
            tablet_count: prompter.number("Tablets", Some(0), None)?,
            smartphone_count: prompter.number("Smartphones", Some(0), None)?,
            ev_charging: Some(prompter.confirm("Electric vehicle charged at home?", false)?),
        })
    }

    fn into_partial(self) -> PredictRequest {
        PredictRequest {
            household_members: self.household_members.map(to_count),
            thermostat_type: self.thermostat_type,
            heating_control: self.heating_control,
            heating_setpoint: self.heating_setpoint.map(to_count),
            cooling_control: self.cooling_control,
            cooling_setpoint: self.cooling_setpoint.map(to_count),
            tv_count: count_or_zero(true, self.tv_count),
            console_count: count_or_zero(true, self.console_count),
            desktop_count: count_or_zero(true, self.desktop_count),
            laptop_count: count_or_zero(true, self.laptop_count),
            tablet_count: count_or_zero(true, self.tablet_count),
            smartphone_count: count_or_zero(true, self.smartphone_count),
            ev_charging: Some(self.ev_charging.unwrap_or(false)),
            ..Default::default()
        }
    }
}
