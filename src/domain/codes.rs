//! 問卷欄位的固定值域
//!
//! 每個列舉在傳輸時是一個字串代碼（例如 `TYPEHUQ = "2"`），
//! 互動提示則使用 `label()`。反序列化同時接受代碼、整數與 snake_case 名稱，
//! 讓 TOML 答案檔可以寫 `home_type = "single_family_detached"` 或 `home_type = 2`。

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! survey_code {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($code:literal, $alias:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn alias(self) -> &'static str {
                match self {
                    $($name::$variant => $alias),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_code(code: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.code() == code)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::from_code(s)
                    .or_else(|| {
                        Self::ALL
                            .iter()
                            .copied()
                            .find(|v| v.alias().eq_ignore_ascii_case(s))
                    })
                    .ok_or_else(|| {
                        let expected: Vec<String> = Self::ALL
                            .iter()
                            .map(|v| format!("{} ({})", v.code(), v.alias()))
                            .collect();
                        format!(
                            "invalid {} '{}', expected one of: {}",
                            stringify!($name),
                            s,
                            expected.join(", ")
                        )
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(CodeVisitor::<$name>::new(stringify!($name)))
            }
        }
    };
}

struct CodeVisitor<T> {
    name: &'static str,
    _marker: std::marker::PhantomData<T>,
}

impl<T> CodeVisitor<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<'de, T> Visitor<'de> for CodeVisitor<T>
where
    T: FromStr<Err = String>,
{
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} code or name", self.name)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
        v.to_string().parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
        v.to_string().parse().map_err(E::custom)
    }
}

survey_code! {
    /// TYPEHUQ
    HomeType {
        MobileHome => ("1", "mobile_home", "Mobile home"),
        SingleFamilyDetached => ("2", "single_family_detached", "Single-family detached"),
        SingleFamilyAttached => ("3", "single_family_attached", "Single-family attached"),
        ApartmentSmall => ("4", "apartment_small", "Small apartment (2-4 units)"),
        ApartmentLarge => ("5", "apartment_large", "Large apartment (5+ units)"),
    }
}

impl HomeType {
    pub fn is_single_family(self) -> bool {
        matches!(self, HomeType::SingleFamilyDetached | HomeType::SingleFamilyAttached)
    }
}

survey_code! {
    Stories {
        One => ("1", "one", "One story"),
        Two => ("2", "two", "Two stories"),
        Three => ("3", "three", "Three stories"),
        FourOrMore => ("4", "four_or_more", "Four or more stories"),
        Split => ("5", "split", "Split-level"),
    }
}

survey_code! {
    /// SIZEOFGARAGE
    GarageSize {
        OneCar => ("1", "one_car", "1 car"),
        TwoCar => ("2", "two_car", "2 cars"),
        ThreeOrMoreCar => ("3", "three_or_more_car", "3 or more cars"),
    }
}

survey_code! {
    YearMadeRange {
        Before1950 => ("1", "before_1950", "Before 1950"),
        From1950To1959 => ("2", "from_1950_to_1959", "1950 to 1959"),
        From1960To1969 => ("3", "from_1960_to_1969", "1960 to 1969"),
        From1970To1979 => ("4", "from_1970_to_1979", "1970 to 1979"),
        From1980To1989 => ("5", "from_1980_to_1989", "1980 to 1989"),
        From1990To1999 => ("6", "from_1990_to_1999", "1990 to 1999"),
        From2000To2009 => ("7", "from_2000_to_2009", "2000 to 2009"),
        From2010To2015 => ("8", "from_2010_to_2015", "2010 to 2015"),
        From2016ToPresent => ("9", "from_2016_to_present", "After 2015"),
    }
}

survey_code! {
    WallType {
        Brick => ("1", "brick", "Brick"),
        Wood => ("2", "wood", "Wood"),
        Siding => ("3", "siding", "Siding"),
        Stucco => ("4", "stucco", "Stucco"),
        Shingle => ("5", "shingle", "Shingle"),
        Stone => ("6", "stone", "Stone"),
        Concrete => ("7", "concrete", "Concrete"),
        Other => ("99", "other", "Other"),
    }
}

survey_code! {
    RoofType {
        CeramicOrClayTile => ("1", "ceramic_or_clay_tile", "Ceramic or clay tile"),
        WoodShingles => ("2", "wood_shingles", "Wood shingles"),
        Metal => ("3", "metal", "Metal"),
        SlateOrSyntheticSlate => ("4", "slate_or_synthetic_slate", "Slate or synthetic slate"),
        AsphaltShingles => ("5", "asphalt_shingles", "Asphalt shingles"),
        ConcreteTile => ("6", "concrete_tile", "Concrete tile"),
        Other => ("99", "other", "Other"),
    }
}

survey_code! {
    /// TYPEGLASS
    GlassType {
        SinglePane => ("1", "single_pane", "Single-pane"),
        DoublePane => ("2", "double_pane", "Double-pane"),
        TriplePane => ("3", "triple_pane", "Triple-pane"),
    }
}

survey_code! {
    /// ADQINSUL
    Insulation {
        WellInsulated => ("1", "well_insulated", "Well insulated"),
        AdequatelyInsulated => ("2", "adequately_insulated", "Adequately insulated"),
        PoorlyInsulated => ("3", "poorly_insulated", "Poorly insulated"),
        NotInsulated => ("4", "not_insulated", "Not insulated"),
    }
}

survey_code! {
    PoolFuel {
        None => ("0", "none", "None"),
        NaturalGas => ("1", "natural_gas", "Natural gas"),
        Propane => ("2", "propane", "Propane"),
        FuelOil => ("3", "fuel_oil", "Fuel oil"),
        Electricity => ("5", "electricity", "Electricity"),
        Other => ("99", "other", "Other"),
    }
}

survey_code! {
    TubFuel {
        NaturalGas => ("1", "natural_gas", "Natural gas"),
        Propane => ("2", "propane", "Propane"),
        FuelOil => ("3", "fuel_oil", "Fuel oil"),
        Electricity => ("5", "electricity", "Electricity"),
        Other => ("99", "other", "Other"),
    }
}

survey_code! {
    /// TYPERFR1 / TYPERFR2
    FridgeType {
        OneDoor => ("1", "one_door", "One door"),
        TwoDoorFreezerSide => ("2", "two_door_freezer_side", "Two door (freezer side)"),
        TwoDoorFreezerTop => ("3", "two_door_freezer_top", "Two door (freezer top)"),
        TwoDoorFreezerBottom => ("4", "two_door_freezer_bottom", "Two door (freezer bottom)"),
        ThreeOrMoreDoors => ("5", "three_or_more_doors", "Three or more doors"),
    }
}

survey_code! {
    /// LOCRFRI2
    FridgeLocation {
        Basement => ("1", "basement", "Basement"),
        Garage => ("2", "garage", "Garage"),
        Outside => ("3", "outside", "Outside"),
        MainLivingArea => ("4", "main_living_area", "Main living area"),
        Other => ("99", "other", "Other"),
    }
}

survey_code! {
    /// UPRTFRZR
    FreezerType {
        Upright => ("1", "upright", "Upright"),
        Chest => ("2", "chest", "Chest"),
    }
}

survey_code! {
    RangeFuel {
        NaturalGas => ("1", "natural_gas", "Natural gas"),
        Propane => ("2", "propane", "Propane"),
        Electricity => ("5", "electricity", "Electricity"),
        DualFuel => ("13", "dual_fuel", "Dual fuel (gas/electric)"),
    }
}

survey_code! {
    /// COOKTOPFUEL, OVENFUEL, DRYRFUEL
    ApplianceFuel {
        NaturalGas => ("1", "natural_gas", "Natural gas"),
        Propane => ("2", "propane", "Propane"),
        Electricity => ("5", "electricity", "Electricity"),
    }
}

survey_code! {
    /// OUTGRILLFUEL
    GrillFuel {
        NaturalGas => ("1", "natural_gas", "Natural gas"),
        Propane => ("2", "propane", "Propane"),
        Charcoal => ("23", "charcoal", "Charcoal"),
    }
}

survey_code! {
    /// DWCYCLE
    DishwasherCycle {
        NormalWithoutHeatDry => ("1", "normal_without_heat_dry", "Normal (no heat dry)"),
        NormalWithHeatDry => ("2", "normal_with_heat_dry", "Normal (heat dry)"),
        HeavyPotsAndPans => ("3", "heavy_pots_and_pans", "Heavy / pots and pans"),
        LightDelicate => ("4", "light_delicate", "Light / delicate"),
        EnergySaver => ("5", "energy_saver", "Energy saver"),
        Quick => ("6", "quick", "Quick"),
    }
}

survey_code! {
    /// TOPFRONT
    WasherLoading {
        TopLoading => ("1", "top_loading", "Top loading"),
        FrontLoading => ("2", "front_loading", "Front loading"),
    }
}

survey_code! {
    WashTemp {
        Hot => ("1", "hot", "Hot"),
        Warm => ("2", "warm", "Warm"),
        Cold => ("3", "cold", "Cold"),
    }
}

survey_code! {
    /// EQUIPM
    HeatingEquipment {
        Steam => ("2", "steam", "Steam pump"),
        CentralFurnace => ("3", "central_furnace", "Central furnace"),
        CentralPump => ("4", "central_pump", "Central pump"),
        BuiltInElectricUnits => ("5", "built_in_electric_units", "Built-in electric units"),
        BuiltInGasOrOilUnits => ("7", "built_in_gas_or_oil_units", "Built-in gas or oil units"),
        WoodStove => ("8", "wood_stove", "Wood stove"),
        PortableElectricHeaters => ("10", "portable_electric_heaters", "Portable electric heaters"),
        DuctlessHeatPump => ("13", "ductless_heat_pump", "Ductless heat pump"),
        Other => ("99", "other", "Other"),
    }
}

survey_code! {
    /// FUELHEAT / FUELAUX
    HeatingFuel {
        NaturalGas => ("1", "natural_gas", "Natural gas"),
        Propane => ("2", "propane", "Propane"),
        FuelOil => ("3", "fuel_oil", "Fuel oil"),
        Electricity => ("5", "electricity", "Electricity"),
        Wood => ("7", "wood", "Wood"),
        Other => ("99", "other", "Other"),
    }
}

survey_code! {
    /// EQUIPAUXTYPE
    AuxHeatingEquipment {
        None => ("0", "none", "None"),
        BuiltInElectricUnits => ("5", "built_in_electric_units", "Built-in electric units"),
        WoodStove => ("8", "wood_stove", "Wood stove"),
        Fireplace => ("9", "fireplace", "Fireplace"),
        PortableElectricHeaters => ("10", "portable_electric_heaters", "Portable electric heaters"),
        DuctlessMiniSplit => ("13", "ductless_mini_split", "Ductless mini-split"),
        Other => ("99", "other", "Other"),
    }
}

survey_code! {
    /// HUMIDTYPE
    HumidifierType {
        None => ("0", "none", "None"),
        PortableHumidifier => ("1", "portable_humidifier", "Portable humidifier"),
        WholeHouseHumidifier => ("2", "whole_house_humidifier", "Whole-house humidifier"),
    }
}

survey_code! {
    /// ACEQUIPM_PUB
    CoolingEquipment {
        CentralAirConditioner => ("1", "central_air_conditioner", "Central air conditioner"),
        DuctlessMiniSplit => ("3", "ductless_mini_split", "Ductless mini-split"),
        RoomAirConditioner => ("4", "room_air_conditioner", "Window/wall air conditioner"),
        PortableAirConditioner => ("5", "portable_air_conditioner", "Portable air conditioner"),
        EvaporativeCooler => ("6", "evaporative_cooler", "Evaporative cooler"),
    }
}

survey_code! {
    /// ACEQUIPAUXTYPE_PUB
    AuxCoolingEquipment {
        None => ("0", "none", "None"),
        CentralAirConditioner => ("1", "central_air_conditioner", "Central air conditioner"),
        DuctlessMiniSplit => ("3", "ductless_mini_split", "Ductless mini-split"),
        RoomAirConditioner => ("4", "room_air_conditioner", "Window/wall air conditioner"),
        PortableAirConditioner => ("5", "portable_air_conditioner", "Portable air conditioner"),
        EvaporativeCooler => ("6", "evaporative_cooler", "Evaporative cooler"),
    }
}

survey_code! {
    /// DEHUMTYPE
    DehumidifierType {
        None => ("0", "none", "None"),
        PortableDehumidifier => ("1", "portable_dehumidifier", "Portable dehumidifier"),
        WholeHouseDehumidifier => ("2", "whole_house_dehumidifier", "Whole-house dehumidifier"),
    }
}

survey_code! {
    /// TYPETHERM
    ThermostatType {
        None => ("0", "none", "None"),
        Manual => ("1", "manual", "Manual"),
        Programmable => ("2", "programmable", "Programmable"),
        Smart => ("3", "smart", "Smart"),
    }
}

survey_code! {
    /// HEATCNTL / COOLCNTL
    ThermostatControl {
        SetAndLeaveIt => ("1", "set_and_leave_it", "Set one temperature and leave it"),
        ManuallyAdjust => ("2", "manually_adjust", "Manually adjust"),
        Programmable => ("3", "programmable", "Programmable or smart thermostat"),
        TurnOnAndOffAsNeeded => ("4", "turn_on_and_off_as_needed", "Turn on or off as needed"),
        NoControl => ("5", "no_control", "No control"),
        Other => ("99", "other", "Other"),
    }
}

survey_code! {
    /// WHEATSIZ
    WaterHeaterSize {
        Small => ("1", "small", "Small (30 gallons or less)"),
        Medium => ("2", "medium", "Medium (31 to 49 gallons)"),
        Large => ("3", "large", "Large (50 gallons or more)"),
        Tankless => ("4", "tankless", "Tankless"),
    }
}

survey_code! {
    /// FUELH2O / FUELH2O2
    WaterHeaterFuel {
        NaturalGas => ("1", "natural_gas", "Natural gas"),
        Propane => ("2", "propane", "Propane"),
        FuelOil => ("3", "fuel_oil", "Fuel oil"),
        Electricity => ("5", "electricity", "Electricity"),
        Wood => ("7", "wood", "Wood"),
        Solar => ("8", "solar", "Solar"),
        Other => ("99", "other", "Other"),
    }
}

survey_code! {
    /// 地下室 / 閣樓的三態答案，送出前拆成兩個布林欄位
    Finish {
        None => ("0", "none", "None"),
        Unfinished => ("1", "unfinished", "Unfinished"),
        Finished => ("2", "finished", "Finished"),
    }
}

survey_code! {
    GarageChoice {
        None => ("0", "none", "None"),
        OneCar => ("1", "one_car", "1 car"),
        TwoCar => ("2", "two_car", "2 cars"),
        ThreeOrMoreCar => ("3", "three_or_more_car", "3 or more cars"),
    }
}

impl GarageChoice {
    pub fn size(self) -> Option<GarageSize> {
        match self {
            GarageChoice::None => None,
            GarageChoice::OneCar => Some(GarageSize::OneCar),
            GarageChoice::TwoCar => Some(GarageSize::TwoCar),
            GarageChoice::ThreeOrMoreCar => Some(GarageSize::ThreeOrMoreCar),
        }
    }
}

survey_code! {
    TubChoice {
        None => ("0", "none", "None"),
        NaturalGas => ("1", "natural_gas", "Natural gas"),
        Propane => ("2", "propane", "Propane"),
        FuelOil => ("3", "fuel_oil", "Fuel oil"),
        Electricity => ("5", "electricity", "Electricity"),
        Other => ("99", "other", "Other"),
    }
}

impl TubChoice {
    pub fn fuel(self) -> Option<TubFuel> {
        match self {
            TubChoice::None => None,
            TubChoice::NaturalGas => Some(TubFuel::NaturalGas),
            TubChoice::Propane => Some(TubFuel::Propane),
            TubChoice::FuelOil => Some(TubFuel::FuelOil),
            TubChoice::Electricity => Some(TubFuel::Electricity),
            TubChoice::Other => Some(TubFuel::Other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_code_or_alias() {
        assert_eq!("2".parse::<HomeType>().unwrap(), HomeType::SingleFamilyDetached);
        assert_eq!(
            "Single_Family_Attached".parse::<HomeType>().unwrap(),
            HomeType::SingleFamilyAttached
        );
        assert_eq!("13".parse::<RangeFuel>().unwrap(), RangeFuel::DualFuel);

        let err = "7".parse::<HomeType>().unwrap_err();
        assert!(err.contains("invalid HomeType '7'"));
    }

    #[test]
    fn test_wire_format_is_code_string() {
        let json = serde_json::to_string(&AuxHeatingEquipment::Fireplace).unwrap();
        assert_eq!(json, "\"9\"");

        let fuel: GrillFuel = serde_json::from_str("23").unwrap();
        assert_eq!(fuel, GrillFuel::Charcoal);
        let fuel: GrillFuel = serde_json::from_str("\"charcoal\"").unwrap();
        assert_eq!(fuel, GrillFuel::Charcoal);
    }

    #[test]
    fn test_composite_choices() {
        assert_eq!(GarageChoice::None.size(), None);
        assert_eq!(GarageChoice::TwoCar.size(), Some(GarageSize::TwoCar));
        assert_eq!(TubChoice::None.fuel(), None);
        assert_eq!(TubChoice::Other.fuel().map(|f| f.code()), Some("99"));
    }

    #[test]
    fn test_single_family_types() {
        let single: Vec<HomeType> = HomeType::ALL
            .iter()
            .copied()
            .filter(|t| t.is_single_family())
            .collect();
        assert_eq!(
            single,
            vec![HomeType::SingleFamilyDetached, HomeType::SingleFamilyAttached]
        );
    }
}
