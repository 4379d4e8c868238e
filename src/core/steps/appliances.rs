use super::{checkbox, choose, count_or_zero, hide, to_count, Prompter, StepForm};
use crate::domain::codes::*;
use crate::domain::model::FieldError;
use crate::domain::request::PredictRequest;
use crate::utils::error::Result;
use crate::utils::validation::FieldChecks;
use serde::{Deserialize, Serialize};

/// 家電。`has_*` 開關只存在於精靈中，用來決定是否詢問細節
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApplianceForm {
    pub fridge_count: Option<i64>,
    pub fridge_type: Option<FridgeType>,
    pub ice_maker: Option<bool>,
    pub second_fridge_type: Option<FridgeType>,
    pub second_fridge_location: Option<FridgeLocation>,
    pub wine_chiller: Option<bool>,
    pub freezer_count: Option<i64>,
    pub freezer_type: Option<FreezerType>,
    pub has_range: bool,
    pub range_fuel: Option<RangeFuel>,
    pub range_cooktop_uses: Option<i64>,
    pub range_oven_uses: Option<i64>,
    pub has_cooktop: bool,
    pub cooktop_fuel: Option<ApplianceFuel>,
    pub cooktop_uses: Option<i64>,
    pub has_oven: bool,
    pub oven_fuel: Option<ApplianceFuel>,
    pub oven_uses: Option<i64>,
    pub microwave_count: Option<i64>,
    pub microwave_uses: Option<i64>,
    pub has_grill: bool,
    pub grill_fuel: Option<GrillFuel>,
    pub dishwasher: Option<bool>,
    pub dishwasher_uses: Option<i64>,
    pub dishwasher_cycle: Option<DishwasherCycle>,
    pub clothes_washer: Option<bool>,
    pub washer_loading: Option<WasherLoading>,
    pub washer_loads: Option<i64>,
    pub wash_temp: Option<WashTemp>,
    pub dryer: Option<bool>,
    pub dryer_fuel: Option<ApplianceFuel>,
    pub dryer_uses: Option<i64>,
}

impl ApplianceForm {
    pub fn shows_primary_fridge(&self) -> bool {
        self.fridge_count.unwrap_or(0) > 0
    }

    pub fn shows_secondary_fridge(&self) -> bool {
        self.fridge_count.unwrap_or(0) > 1
    }

    pub fn shows_freezer(&self) -> bool {
        self.freezer_count.unwrap_or(0) > 0
    }

    pub fn shows_microwave_usage(&self) -> bool {
        self.microwave_count.unwrap_or(0) > 0
    }

    pub fn shows_dishwasher(&self) -> bool {
        self.dishwasher == Some(true)
    }

    pub fn shows_washer(&self) -> bool {
        self.clothes_washer == Some(true)
    }

    pub fn shows_dryer(&self) -> bool {
        self.dryer == Some(true)
    }
}

impl StepForm for ApplianceForm {
    const NAME: &'static str = "appliances";

    fn apply_visibility(&mut self) -> Vec<&'static str> {
        let mut dropped = Vec::new();
        let d = &mut dropped;

        if !self.shows_primary_fridge() {
            hide(&mut self.fridge_type, "TYPERFR1", d);
            hide(&mut self.ice_maker, "ICE", d);
        }
        if !self.shows_secondary_fridge() {
            hide(&mut self.second_fridge_type, "TYPERFR2", d);
            hide(&mut self.second_fridge_location, "LOCRFRI2", d);
        }
        if !self.shows_freezer() {
            hide(&mut self.freezer_type, "UPRTFRZR", d);
        }
        if !self.has_range {
            hide(&mut self.range_fuel, "RANGEFUEL", d);
            hide(&mut self.range_cooktop_uses, "RCOOKUSE", d);
            hide(&mut self.range_oven_uses, "ROVENUSE", d);
        }
        if !self.has_cooktop {
            hide(&mut self.cooktop_fuel, "COOKTOPFUEL", d);
            hide(&mut self.cooktop_uses, "COOKTOPUSE", d);
        }
        if !self.has_oven {
            hide(&mut self.oven_fuel, "OVENFUEL", d);
            hide(&mut self.oven_uses, "OVENUSE", d);
        }
        if !self.shows_microwave_usage() {
            hide(&mut self.microwave_uses, "AMTMICRO", d);
        }
        if !self.has_grill {
            hide(&mut self.grill_fuel, "OUTGRILLFUEL", d);
        }
        if !self.shows_dishwasher() {
            hide(&mut self.dishwasher_uses, "DWASHUSE", d);
            hide(&mut self.dishwasher_cycle, "DWCYCLE", d);
        }
        if !self.shows_washer() {
            hide(&mut self.washer_loading, "TOPFRONT", d);
            hide(&mut self.washer_loads, "WASHLOAD", d);
            hide(&mut self.wash_temp, "WASHTEMP", d);
        }
        if !self.shows_dryer() {
            hide(&mut self.dryer_fuel, "DRYRFUEL", d);
            hide(&mut self.dryer_uses, "DRYRUSE", d);
        }

        dropped
    }

    fn validate(&self) -> Vec<FieldError> {
        FieldChecks::new()
            .min("NUMFRIG", self.fridge_count, 0)
            .min("NUMFREEZ", self.freezer_count, 0)
            .min("RCOOKUSE", self.range_cooktop_uses, 0)
            .min("ROVENUSE", self.range_oven_uses, 0)
            .min("COOKTOPUSE", self.cooktop_uses, 0)
            .min("OVENUSE", self.oven_uses, 0)
            .min("MICRO", self.microwave_count, 0)
            .min("AMTMICRO", self.microwave_uses, 0)
            .min("DWASHUSE", self.dishwasher_uses, 0)
            .min("WASHLOAD", self.washer_loads, 0)
            .min("DRYRUSE", self.dryer_uses, 0)
            .finish()
    }

    fn collect(prompter: &mut dyn Prompter) -> Result<Self> {
        let mut form = ApplianceForm {
            fridge_count: prompter.number("Refrigerators", Some(0), None)?,
            ..Default::default()
        };

        if form.shows_primary_fridge() {
            form.fridge_type = Some(choose(prompter, "Primary fridge door arrangement", FridgeType::ALL)?);
            form.ice_maker = Some(prompter.confirm("Ice maker?", false)?);
        }
        if form.shows_secondary_fridge() {
            form.second_fridge_type = Some(choose(prompter, "Secondary fridge door arrangement", FridgeType::ALL)?);
            form.second_fridge_location = Some(choose(prompter, "Secondary fridge location", FridgeLocation::ALL)?);
        }
        form.wine_chiller = Some(prompter.confirm("Wine chiller?", false)?);

        form.freezer_count = prompter.number("Standalone freezers", Some(0), None)?;
        if form.shows_freezer() {
            form.freezer_type = Some(choose(prompter, "Freezer type", FreezerType::ALL)?);
        }

        form.has_range = prompter.confirm("Range?", false)?;
        if form.has_range {
            form.range_fuel = Some(choose(prompter, "Range fuel", RangeFuel::ALL)?);
            form.range_cooktop_uses = prompter.number("Range cooktop uses per week", Some(0), None)?;
            form.range_oven_uses = prompter.number("Range oven uses per week", Some(0), None)?;
        }

        form.has_cooktop = prompter.confirm("Standalone cooktops?", false)?;
        if form.has_cooktop {
            form.cooktop_fuel = Some(choose(prompter, "Cooktop fuel", ApplianceFuel::ALL)?);
            form.cooktop_uses = prompter.number("Cooktop uses per week", Some(0), None)?;
        }

        form.has_oven = prompter.confirm("Standalone ovens?", false)?;
        if form.has_oven {
            form.oven_fuel = Some(choose(prompter, "Oven fuel", ApplianceFuel::ALL)?);
            form.oven_uses = prompter.number("Oven uses per week", Some(0), None)?;
        }

        form.microwave_count = prompter.number("Microwaves", Some(0), None)?;
        if form.shows_microwave_usage() {
            form.microwave_uses = prompter.number("Microwave uses per week", Some(0), None)?;
        }

        form.has_grill = prompter.confirm("Outdoor grill?", false)?;
        if form.has_grill {
            form.grill_fuel = Some(choose(prompter, "Grill fuel", GrillFuel::ALL)?);
        }

        form.dishwasher = Some(prompter.confirm("Dish washer?", false)?);
        if form.shows_dishwasher() {
            form.dishwasher_uses = prompter.number("Dish washer uses per week", Some(0), None)?;
            form.dishwasher_cycle = Some(choose(prompter, "Dish washer cycle", DishwasherCycle::ALL)?);
        }

        form.clothes_washer = Some(prompter.confirm("Clothes washer?", false)?);
        if form.shows_washer() {
            form.washer_loads = prompter.number("Washer loads per week", Some(0), None)?;
            form.washer_loading = Some(choose(prompter, "Washer type", WasherLoading::ALL)?);
            form.wash_temp = Some(choose(prompter, "Wash temperature", WashTemp::ALL)?);
        }

        form.dryer = Some(prompter.confirm("Clothes dryer?", false)?);
        if form.shows_dryer() {
            form.dryer_fuel = Some(choose(prompter, "Dryer fuel", ApplianceFuel::ALL)?);
            form.dryer_uses = prompter.number("Dryer uses per week", Some(0), None)?;
        }

        Ok(form)
    }

    fn into_partial(self) -> PredictRequest {
        let primary_fridge = self.shows_primary_fridge();
        let dishwasher = self.shows_dishwasher();
        let washer = self.shows_washer();
        let dryer = self.shows_dryer();

        PredictRequest {
            fridge_count: Some(to_count(self.fridge_count.unwrap_or(0))),
            fridge_type: self.fridge_type,
            ice_maker: checkbox(primary_fridge, self.ice_maker),
            second_fridge_type: self.second_fridge_type,
            second_fridge_location: self.second_fridge_location,
            wine_chiller: Some(self.wine_chiller.unwrap_or(false)),
            freezer_count: Some(to_count(self.freezer_count.unwrap_or(0))),
            freezer_type: self.freezer_type,
            range_fuel: self.range_fuel,
            range_cooktop_uses: count_or_zero(self.has_range, self.range_cooktop_uses),
            range_oven_uses: count_or_zero(self.has_range, self.range_oven_uses),
            cooktop_fuel: self.cooktop_fuel,
            cooktop_uses: count_or_zero(self.has_cooktop, self.cooktop_uses),
            oven_fuel: self.oven_fuel,
            oven_uses: count_or_zero(self.has_oven, self.oven_uses),
            microwave_count: Some(to_count(self.microwave_count.unwrap_or(0))),
            microwave_uses: count_or_zero(self.microwave_count.unwrap_or(0) > 0, self.microwave_uses),
            grill_fuel: self.grill_fuel,
            dishwasher: Some(dishwasher),
            dishwasher_uses: count_or_zero(dishwasher, self.dishwasher_uses),
            dishwasher_cycle: self.dishwasher_cycle,
            clothes_washer: Some(washer),
            washer_loading: self.washer_loading,
            washer_loads: count_or_zero(washer, self.washer_loads),
            wash_temp: self.wash_temp,
            dryer: Some(dryer),
            dryer_fuel: self.dryer_fuel,
            dryer_uses: count_or_zero(dryer, self.dryer_uses),
            ..Default::default()
        }
    }
}
