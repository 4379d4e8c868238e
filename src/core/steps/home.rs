use super::{choose, choose_optional, hide, to_count, Prompter, StepForm};
use crate::domain::codes::*;
use crate::domain::model::FieldError;
use crate::domain::request::PredictRequest;
use crate::utils::error::Result;
use crate::utils::validation::FieldChecks;
use serde::{Deserialize, Serialize};

const MAX_BEDROOMS: i64 = 6;
const MAX_FULL_BATHS: i64 = 4;
const MAX_HALF_BATHS: i64 = 2;
const MIN_SQUARE_FEET: i64 = 250;
const MAX_SQUARE_FEET: i64 = 15_000;

/// 住宅結構
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeForm {
    pub home_type: Option<HomeType>,
    pub year_made: Option<YearMadeRange>,
    pub stories: Option<Stories>,
    pub square_feet: Option<i64>,
    pub bedrooms: Option<i64>,
    pub full_baths: Option<i64>,
    pub half_baths: Option<i64>,
    pub basement: Option<Finish>,
    pub attic: Option<Finish>,
    pub garage: Option<GarageChoice>,
    pub high_ceilings: Option<bool>,
    pub tree_shade: Option<bool>,
    pub roof_type: Option<RoofType>,
    pub wall_type: Option<WallType>,
    pub glass_type: Option<GlassType>,
    pub insulation: Option<Insulation>,
    pub pool_fuel: Option<PoolFuel>,
    pub hot_tub: Option<TubChoice>,
}

impl HomeForm {
    /// 行動住宅與大型公寓不問樓層數
    pub fn shows_stories(&self) -> bool {
        !matches!(
            self.home_type,
            Some(HomeType::MobileHome) | Some(HomeType::ApartmentLarge)
        )
    }

    /// 地下室、閣樓、車庫只對獨棟住宅有意義
    pub fn shows_outbuildings(&self) -> bool {
        self.home_type.is_some_and(HomeType::is_single_family)
    }

    pub fn shows_roof(&self) -> bool {
        matches!(
            self.home_type,
            Some(HomeType::SingleFamilyDetached)
                | Some(HomeType::SingleFamilyAttached)
                | Some(HomeType::ApartmentSmall)
        )
    }
}

impl StepForm for HomeForm {
    const NAME: &'static str = "home";

    fn apply_visibility(&mut self) -> Vec<&'static str> {
        let mut dropped = Vec::new();
        if !self.shows_stories() {
            hide(&mut self.stories, "STORIES", &mut dropped);
        }
        if !self.shows_outbuildings() {
            hide(&mut self.basement, "BASEMENT", &mut dropped);
            hide(&mut self.attic, "ATTIC", &mut dropped);
            hide(&mut self.garage, "GARAGE", &mut dropped);
        }
        if !self.shows_roof() {
            hide(&mut self.roof_type, "ROOFTYPE", &mut dropped);
        }
        dropped
    }

    fn validate(&self) -> Vec<FieldError> {
        // 空白的數字欄位視為 0，再套用下限
        FieldChecks::new()
            .required("TYPEHUQ", &self.home_type, "Please select a home type.")
            .required("YEARMADERANGE", &self.year_made, "Please select a home age.")
            .min("SQFTEST", Some(self.square_feet.unwrap_or(0)), MIN_SQUARE_FEET)
            .min("BEDROOMS", Some(self.bedrooms.unwrap_or(0)), 1)
            .min("NCOMBATH", self.full_baths, 0)
            .min("NHAFBATH", self.half_baths, 0)
            .required("WALLTYPE", &self.wall_type, "Please select a wall material.")
            .required("TYPEGLASS", &self.glass_type, "Please select a window type.")
            .required("ADQINSUL", &self.insulation, "Please select an insulation level.")
            .finish()
    }

    fn collect(prompter: &mut dyn Prompter) -> Result<Self> {
        let mut form = HomeForm {
            home_type: Some(choose(prompter, "Type", HomeType::ALL)?),
            year_made: Some(choose(prompter, "Age", YearMadeRange::ALL)?),
            ..Default::default()
        };

        if form.shows_stories() {
            form.stories = Some(choose(prompter, "Stories", Stories::ALL)?);
        }

        form.square_feet = prompter.number("Square footage", Some(0), None)?;
        form.bedrooms = prompter.number("Bedrooms", Some(0), None)?;
        form.full_baths = prompter.number("Full bathrooms", Some(0), None)?;
        form.half_baths = prompter.number("Half bathrooms", Some(0), None)?;

        if form.shows_outbuildings() {
            form.basement = Some(choose(prompter, "Basement", Finish::ALL)?);
            form.attic = Some(choose(prompter, "Attic", Finish::ALL)?);
            form.garage = Some(choose(prompter, "Garage", GarageChoice::ALL)?);
        }

        form.high_ceilings = Some(prompter.confirm("High ceilings?", false)?);
        form.tree_shade = Some(prompter.confirm("Tree shade?", false)?);

        if form.shows_roof() {
            form.roof_type = choose_optional(prompter, "Roof material", RoofType::ALL)?;
        }

        form.wall_type = Some(choose(prompter, "Wall material", WallType::ALL)?);
        form.glass_type = Some(choose(prompter, "Window type", GlassType::ALL)?);
        form.insulation = Some(choose(prompter, "Insulation level", Insulation::ALL)?);
        form.pool_fuel = Some(choose(prompter, "Heated pool fuel", PoolFuel::ALL)?);
        form.hot_tub = Some(choose(prompter, "Hot tub fuel", TubChoice::ALL)?);

        Ok(form)
    }

    fn into_partial(self) -> PredictRequest {
        let basement = self.basement.unwrap_or(Finish::None);
        let attic = self.attic.unwrap_or(Finish::None);

        PredictRequest {
            home_type: self.home_type,
            cellar: Some(basement == Finish::Unfinished),
            basement_finished: Some(basement == Finish::Finished),
            attic: Some(attic == Finish::Unfinished),
            attic_finished: Some(attic == Finish::Finished),
            stories: self.stories,
            garage_size: self.garage.and_then(GarageChoice::size),
            year_made: self.year_made,
            bedrooms: Some(to_count(self.bedrooms.unwrap_or(0).min(MAX_BEDROOMS))),
            full_baths: Some(to_count(self.full_baths.unwrap_or(0).min(MAX_FULL_BATHS))),
            half_baths: Some(to_count(self.half_baths.unwrap_or(0).min(MAX_HALF_BATHS))),
            wall_type: self.wall_type,
            roof_type: self.roof_type,
            high_ceilings: Some(self.high_ceilings.unwrap_or(false)),
            glass_type: self.glass_type,
            tree_shade: Some(self.tree_shade.unwrap_or(false)),
            insulation: self.insulation,
            pool_fuel: Some(self.pool_fuel.unwrap_or(PoolFuel::None)),
            tub_fuel: self.hot_tub.and_then(TubChoice::fuel),
            square_feet: Some(to_count(self.square_feet.unwrap_or(0).min(MAX_SQUARE_FEET))),
            // 完工的地下室 / 閣樓視為有暖氣
            basement_heated: Some(basement == Finish::Finished),
            attic_heated: Some(attic == Finish::Finished),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::steps::testing::ScriptedPrompter;
    use crate::utils::error::ForecastError;

    fn detached_home() -> HomeForm {
        HomeForm {
            home_type: Some(HomeType::SingleFamilyDetached),
            year_made: Some(YearMadeRange::From1990To1999),
            stories: Some(Stories::Two),
            square_feet: Some(2200),
            bedrooms: Some(3),
            full_baths: Some(2),
            half_baths: Some(1),
            basement: Some(Finish::Finished),
            attic: Some(Finish::Unfinished),
            garage: Some(GarageChoice::TwoCar),
            roof_type: Some(RoofType::AsphaltShingles),
            wall_type: Some(WallType::Siding),
            glass_type: Some(GlassType::DoublePane),
            insulation: Some(Insulation::AdequatelyInsulated),
            ..Default::default()
        }
    }

    #[test]
    fn test_tri_state_answers_become_boolean_pairs() {
        let partial = detached_home().submit().unwrap();

        assert_eq!(partial.cellar, Some(false));
        assert_eq!(partial.basement_finished, Some(true));
        assert_eq!(partial.basement_heated, Some(true));
        assert_eq!(partial.attic, Some(true));
        assert_eq!(partial.attic_finished, Some(false));
        assert_eq!(partial.attic_heated, Some(false));
        assert_eq!(partial.garage_size, Some(GarageSize::TwoCar));
    }

    #[test]
    fn test_counts_are_capped() {
        let form = HomeForm {
            bedrooms: Some(9),
            full_baths: Some(5),
            half_baths: Some(3),
            square_feet: Some(40_000),
            ..detached_home()
        };
        let partial = form.submit().unwrap();

        assert_eq!(partial.bedrooms, Some(6));
        assert_eq!(partial.full_baths, Some(4));
        assert_eq!(partial.half_baths, Some(2));
        assert_eq!(partial.square_feet, Some(15_000));
    }

    #[test]
    fn test_apartment_hides_outbuildings_and_roof() {
        let mut form = HomeForm {
            home_type: Some(HomeType::ApartmentLarge),
            ..detached_home()
        };
        let dropped = form.apply_visibility();
        assert_eq!(dropped, vec!["STORIES", "BASEMENT", "ATTIC", "GARAGE", "ROOFTYPE"]);

        let partial = form.into_partial();
        assert_eq!(partial.stories, None);
        assert_eq!(partial.garage_size, None);
        assert_eq!(partial.roof_type, None);
        assert_eq!(partial.cellar, Some(false));
        assert_eq!(partial.basement_finished, Some(false));
    }

    #[test]
    fn test_small_apartment_keeps_roof() {
        let mut form = HomeForm {
            home_type: Some(HomeType::ApartmentSmall),
            ..detached_home()
        };
        form.apply_visibility();
        assert_eq!(form.roof_type, Some(RoofType::AsphaltShingles));
        assert_eq!(form.stories, Some(Stories::Two));
        assert_eq!(form.basement, None);
    }

    #[test]
    fn test_none_composites_are_omitted_but_pool_defaults_to_none_code() {
        let form = HomeForm {
            garage: Some(GarageChoice::None),
            hot_tub: Some(TubChoice::None),
            ..detached_home()
        };
        let partial = form.submit().unwrap();
        assert_eq!(partial.garage_size, None);
        assert_eq!(partial.tub_fuel, None);
        assert_eq!(partial.pool_fuel, Some(PoolFuel::None));

        let json = serde_json::to_value(&partial).unwrap();
        assert_eq!(json["FUELPOOL"], "0");
        assert!(json.get("FUELTUB").is_none());
        assert!(json.get("SIZEOFGARAGE").is_none());
    }

    #[test]
    fn test_validation_messages() {
        let err = HomeForm {
            square_feet: Some(100),
            ..Default::default()
        }
        .submit()
        .unwrap_err();

        let ForecastError::ValidationError { step, errors } = err else {
            panic!("expected validation error");
        };
        assert_eq!(step, "home");
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["TYPEHUQ", "YEARMADERANGE", "SQFTEST", "BEDROOMS", "WALLTYPE", "TYPEGLASS", "ADQINSUL"]
        );
        assert_eq!(errors[0].message, "Please select a home type.");
    }

    #[test]
    fn test_collect_skips_hidden_questions_for_mobile_home() {
        let mut prompter = ScriptedPrompter::new(&[
            "Mobile home",
            "1970 to 1979",
            "900",
            "2",
            "1",
            "",
            "n",
            "y",
            "Wood",
            "Single-pane",
            "Poorly insulated",
            "None",
            "None",
        ]);

        let form = HomeForm::collect(&mut prompter).unwrap();
        assert_eq!(prompter.remaining(), 0);
        assert!(!prompter.asked.iter().any(|q| q == "Stories"));
        assert!(!prompter.asked.iter().any(|q| q == "Basement"));
        assert!(!prompter.asked.iter().any(|q| q == "Roof material"));

        let partial = form.submit().unwrap();
        assert_eq!(partial.home_type, Some(HomeType::MobileHome));
        assert_eq!(partial.half_baths, Some(0));
        assert_eq!(partial.tree_shade, Some(true));
    }

    #[test]
    fn test_deserialize_from_toml_section() {
        let form: HomeForm = toml::from_str(
            r#"
home_type = "single_family_attached"
year_made = 7
square_feet = 1600
bedrooms = 3
full_baths = 2
basement = "unfinished"
wall_type = "brick"
glass_type = "double_pane"
insulation = "well_insulated"
"#,
        )
        .unwrap();

        assert_eq!(form.home_type, Some(HomeType::SingleFamilyAttached));
        assert_eq!(form.year_made, Some(YearMadeRange::From2000To2009));
        let partial = form.submit().unwrap();
        assert_eq!(partial.cellar, Some(true));
        assert_eq!(partial.basement_heated, Some(false));
    }
}
