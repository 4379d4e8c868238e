//! 預測請求：精靈每一步產生一部分，合併成最終的送出內容

use crate::domain::codes::*;
use crate::domain::model::ClimateNormals;
use serde::{Deserialize, Serialize};

macro_rules! predict_request {
    ($($field:ident : $ty:ty => $wire:literal),+ $(,)?) => {
        /// 平坦的欄位記錄；未設定的欄位不會出現在 JSON 中
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct PredictRequest {
            $(
                #[serde(rename = $wire, default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )+
        }

        impl PredictRequest {
            /// 將某一步的部分結果合併進來；部分結果中有值的欄位會覆蓋原值
            pub fn merge(&mut self, partial: PredictRequest) {
                $(
                    if partial.$field.is_some() {
                        self.$field = partial.$field;
                    }
                )+
            }

            /// 目前已有值的欄位（以傳輸名稱表示）
            pub fn present_fields(&self) -> Vec<&'static str> {
                let mut fields = Vec::new();
                $(
                    if self.$field.is_some() {
                        fields.push($wire);
                    }
                )+
                fields
            }
        }
    };
}

predict_request! {
    hdd65: u32 => "HDD65",
    cdd65: u32 => "CDD65",
    home_type: HomeType => "TYPEHUQ",
    cellar: bool => "CELLAR",
    basement_finished: bool => "BASEFIN",
    attic: bool => "ATTIC",
    attic_finished: bool => "ATTICFIN",
    stories: Stories => "STORIES",
    garage_size: GarageSize => "SIZEOFGARAGE",
    year_made: YearMadeRange => "YEARMADERANGE",
    bedrooms: u32 => "BEDROOMS",
    full_baths: u32 => "NCOMBATH",
    half_baths: u32 => "NHAFBATH",
    wall_type: WallType => "WALLTYPE",
    roof_type: RoofType => "ROOFTYPE",
    high_ceilings: bool => "HIGHCEIL",
    glass_type: GlassType => "TYPEGLASS",
    tree_shade: bool => "TREESHAD",
    insulation: Insulation => "ADQINSUL",
    pool_fuel: PoolFuel => "FUELPOOL",
    tub_fuel: TubFuel => "FUELTUB",
    fridge_count: u32 => "NUMFRIG",
    fridge_type: FridgeType => "TYPERFR1",
    ice_maker: bool => "ICE",
    second_fridge_type: FridgeType => "TYPERFR2",
    second_fridge_location: FridgeLocation => "LOCRFRI2",
    wine_chiller: bool => "WINECHILL",
    freezer_count: u32 => "NUMFREEZ",
    freezer_type: FreezerType => "UPRTFRZR",
    range_fuel: RangeFuel => "RANGEFUEL",
    range_cooktop_uses: u32 => "RCOOKUSE",
    range_oven_uses: u32 => "ROVENUSE",
    cooktop_fuel: ApplianceFuel => "COOKTOPFUEL",
    cooktop_uses: u32 => "COOKTOPUSE",
    oven_fuel: ApplianceFuel => "OVENFUEL",
    oven_uses: u32 => "OVENUSE",
    microwave_count: u32 => "MICRO",
    microwave_uses: u32 => "AMTMICRO",
    grill_fuel: GrillFuel => "OUTGRILLFUEL",
    dishwasher: bool => "DISHWASH",
    dishwasher_uses: u32 => "DWASHUSE",
    dishwasher_cycle: DishwasherCycle => "DWCYCLE",
    clothes_washer: bool => "CWASHER",
    washer_loading: WasherLoading => "TOPFRONT",
    washer_loads: u32 => "WASHLOAD",
    wash_temp: WashTemp => "WASHTEMP",
    dryer: bool => "DRYER",
    dryer_fuel: ApplianceFuel => "DRYRFUEL",
    dryer_uses: u32 => "DRYRUSE",
    tv_count: u32 => "TVCOLOR",
    console_count: u32 => "PLAYSTA",
    desktop_count: u32 => "DESKTOP",
    laptop_count: u32 => "NUMLAPTOP",
    tablet_count: u32 => "NUMTABLET",
    smartphone_count: u32 => "NUMSMPHONE",
    heats_home: bool => "HEATHOME",
    heating_shared: bool => "HEATAPT",
    heating_equipment: HeatingEquipment => "EQUIPM",
    heating_fuel: HeatingFuel => "FUELHEAT",
    aux_heating_equipment: AuxHeatingEquipment => "EQUIPAUXTYPE",
    aux_heating: bool => "EQUIPAUX",
    aux_heating_fuel: HeatingFuel => "FUELAUX",
    portable_heater_count: u32 => "NUMPORTEL",
    fireplace_count: u32 => "NUMFIREPLC",
    basement_heated: bool => "BASEHEAT",
    attic_heated: bool => "ATTCHEAT",
    garage_heated: bool => "GARGHEAT",
    humidifier_type: HumidifierType => "HUMIDTYPE",
    humidifier_count: u32 => "NUMPORTHUM",
    air_conditioning: bool => "AIRCOND",
    cooling_shared: bool => "COOLAPT",
    cooling_equipment: CoolingEquipment => "ACEQUIPM_PUB",
    aux_cooling_equipment: AuxCoolingEquipment => "ACEQUIPAUXTYPE_PUB",
    window_ac_count: u32 => "NUMWWAC",
    portable_ac_count: u32 => "NUMPORTAC",
    ceiling_fan_count: u32 => "NUMCFAN",
    floor_fan_count: u32 => "NUMFLOORFAN",
    dehumidifier_type: DehumidifierType => "DEHUMTYPE",
    dehumidifier_count: u32 => "NUMPORTDEHUM",
    thermostat_type: ThermostatType => "TYPETHERM",
    heating_control: ThermostatControl => "HEATCNTL",
    heating_setpoint: u32 => "TEMPHOME",
    cooling_control: ThermostatControl => "COOLCNTL",
    cooling_setpoint: u32 => "TEMPHOMEAC",
    water_heating_shared: bool => "H2OAPT",
    water_heater_size: WaterHeaterSize => "WHEATSIZ",
    water_heater_fuel: WaterHeaterFuel => "FUELH2O",
    multiple_water_heaters: bool => "MORETHAN1H2O",
    second_water_heater_fuel: WaterHeaterFuel => "FUELH2O2",
    ev_charging: bool => "EVCHRGHOME",
    household_members: u32 => "NHSLDMEM",
    square_feet: u32 => "SQFTEST",
}

/// 預測服務要求一定要有的欄位
pub const REQUIRED_FIELDS: &[&str] = &[
    "TYPEHUQ",
    "YEARMADERANGE",
    "BEDROOMS",
    "NCOMBATH",
    "NHAFBATH",
    "WALLTYPE",
    "TYPEGLASS",
    "TREESHAD",
    "ADQINSUL",
    "NUMFRIG",
    "WINECHILL",
    "NUMFREEZ",
    "MICRO",
    "DISHWASH",
    "CWASHER",
    "DRYER",
    "TVCOLOR",
    "DESKTOP",
    "NUMLAPTOP",
    "NUMTABLET",
    "NUMSMPHONE",
    "HEATHOME",
    "HUMIDTYPE",
    "AIRCOND",
    "NUMCFAN",
    "NUMFLOORFAN",
    "DEHUMTYPE",
    "WHEATSIZ",
    "FUELH2O",
    "MORETHAN1H2O",
];

impl PredictRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_climate(mut self, normals: &ClimateNormals) -> Self {
        self.hdd65 = Some(normals.hdd65.max(0.0).round() as u32);
        self.cdd65 = Some(normals.cdd65.max(0.0).round() as u32);
        self
    }

    pub fn missing_required(&self) -> Vec<&'static str> {
        let present = self.present_fields();
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !present.contains(field))
            .collect()
    }

    pub fn field_count(&self) -> usize {
        self.present_fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }
}
