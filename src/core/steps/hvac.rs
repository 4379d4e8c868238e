use super::{checkbox, choose, count_or_zero, hide, to_count, Prompter, StepForm};
use crate::domain::codes::*;
use crate::domain::model::FieldError;
use crate::domain::request::PredictRequest;
use crate::utils::error::Result;
use crate::utils::validation::FieldChecks;
use serde::{Deserialize, Serialize};

/// 暖氣、冷氣與熱水器
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HvacForm {
    pub heats_home: Option<bool>,
    pub heating_shared: Option<bool>,
    pub heating_equipment: Option<HeatingEquipment>,
    pub heating_fuel: Option<HeatingFuel>,
    pub aux_heating: Option<bool>,
    pub aux_heating_equipment: Option<AuxHeatingEquipment>,
    pub aux_heating_fuel: Option<HeatingFuel>,
    pub portable_heater_count: Option<i64>,
    pub fireplace_count: Option<i64>,
    pub has_humidifier: bool,
    pub humidifier_count: Option<i64>,
    pub air_conditioning: Option<bool>,
    pub cooling_shared: Option<bool>,
    pub cooling_equipment: Option<CoolingEquipment>,
    pub has_secondary_cooling: bool,
    pub aux_cooling_equipment: Option<AuxCoolingEquipment>,
    pub window_ac_count: Option<i64>,
    pub portable_ac_count: Option<i64>,
    pub ceiling_fan_count: Option<i64>,
    pub floor_fan_count: Option<i64>,
    pub has_dehumidifier: bool,
    pub dehumidifier_count: Option<i64>,
    pub water_heating_shared: Option<bool>,
    pub water_heater_size: Option<WaterHeaterSize>,
    pub water_heater_fuel: Option<WaterHeaterFuel>,
    pub multiple_water_heaters: Option<bool>,
    pub second_water_heater_fuel: Option<WaterHeaterFuel>,
}

impl HvacForm {
    pub fn shows_heating(&self) -> bool {
        self.heats_home == Some(true)
    }

    pub fn shows_aux_heating(&self) -> bool {
        self.shows_heating() && self.aux_heating == Some(true)
    }

    pub fn shows_portable_heaters(&self) -> bool {
        self.heating_equipment == Some(HeatingEquipment::PortableElectricHeaters)
            || self.aux_heating_equipment == Some(AuxHeatingEquipment::PortableElectricHeaters)
    }

    pub fn shows_fireplaces(&self) -> bool {
        self.aux_heating_equipment == Some(AuxHeatingEquipment::Fireplace)
    }

    pub fn shows_cooling(&self) -> bool {
        self.air_conditioning == Some(true)
    }

    pub fn shows_secondary_cooling(&self) -> bool {
        self.shows_cooling() && self.has_secondary_cooling
    }

    pub fn shows_window_ac(&self) -> bool {
        self.cooling_equipment == Some(CoolingEquipment::RoomAirConditioner)
            || self.aux_cooling_equipment == Some(AuxCoolingEquipment::RoomAirConditioner)
    }

    pub fn shows_portable_ac(&self) -> bool {
        self.cooling_equipment == Some(CoolingEquipment::PortableAirConditioner)
            || self.aux_cooling_equipment == Some(AuxCoolingEquipment::PortableAirConditioner)
    }

    pub fn shows_second_water_heater(&self) -> bool {
        self.multiple_water_heaters == Some(true)
    }
}

impl StepForm for HvacForm {
    const NAME: &'static str = "hvac";

    // 順序很重要：上層的開關先清除，下層依賴它的欄位才會跟著隱藏
    fn apply_visibility(&mut self) -> Vec<&'static str> {
        let mut dropped = Vec::new();
        let d = &mut dropped;

        if !self.shows_heating() {
            hide(&mut self.heating_shared, "HEATAPT", d);
            hide(&mut self.heating_equipment, "EQUIPM", d);
            hide(&mut self.heating_fuel, "FUELHEAT", d);
            hide(&mut self.aux_heating, "EQUIPAUX", d);
        }
        if !self.shows_aux_heating() {
            hide(&mut self.aux_heating_equipment, "EQUIPAUXTYPE", d);
            hide(&mut self.aux_heating_fuel, "FUELAUX", d);
        }
        if !self.shows_portable_heaters() {
            hide(&mut self.portable_heater_count, "NUMPORTEL", d);
        }
        if !self.shows_fireplaces() {
            hide(&mut self.fireplace_count, "NUMFIREPLC", d);
        }
        if !self.has_humidifier {
            hide(&mut self.humidifier_count, "NUMPORTHUM", d);
        }

        if !self.shows_cooling() {
            hide(&mut self.cooling_shared, "COOLAPT", d);
            hide(&mut self.cooling_equipment, "ACEQUIPM_PUB", d);
        }
        if !self.shows_secondary_cooling() {
            hide(&mut self.aux_cooling_equipment, "ACEQUIPAUXTYPE_PUB", d);
        }
        if !self.shows_window_ac() {
            hide(&mut self.window_ac_count, "NUMWWAC", d);
        }
        if !self.shows_portable_ac() {
            hide(&mut self.portable_ac_count, "NUMPORTAC", d);
        }
        if !self.has_dehumidifier {
            hide(&mut self.dehumidifier_count, "NUMPORTDEHUM", d);
        }

        if !self.shows_second_water_heater() {
            hide(&mut self.second_water_heater_fuel, "FUELH2O2", d);
        }

        dropped
    }

    fn validate(&self) -> Vec<FieldError> {
        FieldChecks::new()
            .min("NUMPORTEL", self.portable_heater_count, 0)
            .min("NUMFIREPLC", self.fireplace_count, 0)
            .min("NUMPORTHUM", self.humidifier_count, 0)
            .min("NUMWWAC", self.window_ac_count, 0)
            .min("NUMPORTAC", self.portable_ac_count, 0)
            .min("NUMCFAN", self.ceiling_fan_count, 0)
            .min("NUMFLOORFAN", self.floor_fan_count, 0)
            .min("NUMPORTDEHUM", self.dehumidifier_count, 0)
            .required("WHEATSIZ", &self.water_heater_size, "Please select a size.")
            .required("FUELH2O", &self.water_heater_fuel, "Please select a fuel type.")
            .finish()
    }

    fn collect(prompter: &mut dyn Prompter) -> Result<Self> {
        let mut form = HvacForm {
            heats_home: Some(prompter.confirm("Heating?", false)?),
            ..Default::default()
        };

        if form.shows_heating() {
            form.heating_shared = Some(prompter.confirm("Heating shared?", false)?);
            form.heating_equipment = Some(choose(prompter, "Heating equipment", HeatingEquipment::ALL)?);
            form.heating_fuel = Some(choose(prompter, "Heating fuel", HeatingFuel::ALL)?);
            form.aux_heating = Some(prompter.confirm("Secondary heating?", false)?);
        }
        if form.shows_aux_heating() {
            // 「無」只用於衍生，不提供選擇
            form.aux_heating_equipment = Some(choose(
                prompter,
                "Secondary heating equipment",
                &AuxHeatingEquipment::ALL[1..],
            )?);
            form.aux_heating_fuel = Some(choose(prompter, "Secondary heating fuel", HeatingFuel::ALL)?);
        }
        if form.shows_portable_heaters() {
            form.portable_heater_count = prompter.number("Electric heaters", Some(0), None)?;
        }
        if form.shows_fireplaces() {
            form.fireplace_count = prompter.number("Fireplaces", Some(0), None)?;
        }

        form.has_humidifier = prompter.confirm("Humidifier?", false)?;
        if form.has_humidifier {
            form.humidifier_count = prompter.number("Portable humidifiers", Some(0), None)?;
        }

        form.air_conditioning = Some(prompter.confirm("Air conditioning?", false)?);
        if form.shows_cooling() {
            form.cooling_shared = Some(prompter.confirm("AC shared?", false)?);
            form.cooling_equipment = Some(choose(prompter, "Cooling equipment", CoolingEquipment::ALL)?);
            form.has_secondary_cooling = prompter.confirm("Secondary cooling?", false)?;
        }
        if form.shows_secondary_cooling() {
            form.aux_cooling_equipment = Some(choose(
                prompter,
                "Secondary cooling equipment",
                &AuxCoolingEquipment::ALL[1..],
            )?);
        }
        if form.shows_window_ac() {
            form.window_ac_count = prompter.number("Window ACs", Some(0), None)?;
        }
        if form.shows_portable_ac() {
            form.portable_ac_count = prompter.number("Portable ACs", Some(0), None)?;
        }

        form.ceiling_fan_count = prompter.number("Ceiling fans", Some(0), None)?;
        form.floor_fan_count = prompter.number("Floor fans", Some(0), None)?;

        form.has_dehumidifier = prompter.confirm("Dehumidifier?", false)?;
        if form.has_dehumidifier {
            form.dehumidifier_count = prompter.number("Portable dehumidifiers", Some(0), None)?;
        }

        form.water_heating_shared = Some(prompter.confirm("Shared water heating?", false)?);
        form.water_heater_size = Some(choose(prompter, "Water heater size", WaterHeaterSize::ALL)?);
        form.water_heater_fuel = Some(choose(prompter, "Water heater fuel", WaterHeaterFuel::ALL)?);
        form.multiple_water_heaters = Some(prompter.confirm("More than one water heater?", false)?);
        if form.shows_second_water_heater() {
            form.second_water_heater_fuel =
                Some(choose(prompter, "Second water heater fuel", WaterHeaterFuel::ALL)?);
        }

        Ok(form)
    }

    fn into_partial(self) -> PredictRequest {
        let heating = self.shows_heating();
        let aux_heating = self.shows_aux_heating();
        let cooling = self.shows_cooling();

        let humidifier_type = if self.has_humidifier {
            HumidifierType::PortableHumidifier
        } else {
            HumidifierType::None
        };
        let dehumidifier_type = if self.dehumidifier_count.unwrap_or(0) > 0 {
            DehumidifierType::PortableDehumidifier
        } else {
            DehumidifierType::None
        };
        let aux_heating_equipment = if aux_heating {
            self.aux_heating_equipment
        } else {
            Some(AuxHeatingEquipment::None)
        };

        PredictRequest {
            heats_home: Some(heating),
            heating_shared: checkbox(heating, self.heating_shared),
            heating_equipment: self.heating_equipment,
            heating_fuel: self.heating_fuel,
            aux_heating: checkbox(heating, self.aux_heating),
            aux_heating_equipment,
            aux_heating_fuel: self.aux_heating_fuel,
            portable_heater_count: self.portable_heater_count.map(to_count),
            fireplace_count: self.fireplace_count.map(to_count),
            humidifier_type: Some(humidifier_type),
            humidifier_count: self.humidifier_count.map(to_count),
            air_conditioning: Some(cooling),
            cooling_shared: checkbox(cooling, self.cooling_shared),
            cooling_equipment: self.cooling_equipment,
            aux_cooling_equipment: Some(
                self.aux_cooling_equipment.unwrap_or(AuxCoolingEquipment::None),
            ),
            window_ac_count: self.window_ac_count.map(to_count),
            portable_ac_count: self.portable_ac_count.map(to_count),
            ceiling_fan_count: count_or_zero(true, self.ceiling_fan_count),
            floor_fan_count: count_or_zero(true, self.floor_fan_count),
            dehumidifier_type: Some(dehumidifier_type),
            dehumidifier_count: self.dehumidifier_count.map(to_count),
            water_heating_shared: Some(self.water_heating_shared.unwrap_or(false)),
            water_heater_size: self.water_heater_size,
            water_heater_fuel: self.water_heater_fuel,
            multiple_water_heaters: Some(self.multiple_water_heaters.unwrap_or(false)),
            second_water_heater_fuel: self.second_water_heater_fuel,
            ..Default::default()
        }
    }
}
