//! 把預測的 BTU 轉換成各燃料的年用量與費用，並輸出為文字、JSON 或 CSV

use crate::domain::model::{GeocodeItem, PredictResponse};
use crate::domain::ports::Storage;
use crate::utils::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

// 預測值的單位是千 BTU
const KBTU: f64 = 1_000.0;

const BTU_PER_KWH: f64 = 3_412.0;
const CENTS_PER_KWH: f64 = 15.93;
const BTU_PER_THERM: f64 = 100_000.0;
const BTU_PER_CUBIC_FOOT_GAS: f64 = 1_036.0;
const DOLLARS_PER_CUBIC_FOOT_GAS: f64 = 0.02185;
const BTU_PER_GALLON_PROPANE: f64 = 91_452.0;
const DOLLARS_PER_GALLON_PROPANE: f64 = 2.396;
const BTU_PER_GALLON_FUEL_OIL: f64 = 138_500.0;
const DOLLARS_PER_GALLON_FUEL_OIL: f64 = 4.288;
const BTU_PER_CORD: f64 = 20_000_000.0;
const DOLLARS_PER_CORD: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fuel {
    Electricity,
    NaturalGas,
    Propane,
    FuelOil,
    Wood,
}

impl Fuel {
    pub fn label(self) -> &'static str {
        match self {
            Fuel::Electricity => "Electricity",
            Fuel::NaturalGas => "Natural Gas",
            Fuel::Propane => "Propane",
            Fuel::FuelOil => "Fuel Oil",
            Fuel::Wood => "Wood",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Fuel::Electricity => "kWh",
            Fuel::NaturalGas => "therms",
            Fuel::Propane | Fuel::FuelOil => "gallons",
            Fuel::Wood => "cords",
        }
    }

    /// 千 BTU → (用量, 美元)
    fn convert(self, kbtu: f64) -> (f64, f64) {
        let btu = kbtu * KBTU;
        match self {
            Fuel::Electricity => {
                let kwh = btu / BTU_PER_KWH;
                (kwh, kwh * CENTS_PER_KWH / 100.0)
            }
            Fuel::NaturalGas => (
                btu / BTU_PER_THERM,
                btu / BTU_PER_CUBIC_FOOT_GAS * DOLLARS_PER_CUBIC_FOOT_GAS,
            ),
            Fuel::Propane => {
                let gallons = btu / BTU_PER_GALLON_PROPANE;
                (gallons, gallons * DOLLARS_PER_GALLON_PROPANE)
            }
            Fuel::FuelOil => {
                let gallons = btu / BTU_PER_GALLON_FUEL_OIL;
                (gallons, gallons * DOLLARS_PER_GALLON_FUEL_OIL)
            }
            Fuel::Wood => {
                let cords = btu / BTU_PER_CORD;
                (cords, cords * DOLLARS_PER_CORD)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelEstimate {
    pub fuel: Fuel,
    pub unit: &'static str,
    pub quantity: f64,
    pub cost: f64,
}

impl FuelEstimate {
    /// 非正值（模型偶爾會預測出負數）一律視為 0
    pub fn new(fuel: Fuel, kbtu: f64) -> Self {
        let (quantity, cost) = if kbtu > 0.0 {
            fuel.convert(kbtu)
        } else {
            (0.0, 0.0)
        };
        Self {
            fuel,
            unit: fuel.unit(),
            quantity,
            cost,
        }
    }
}

impl fmt::Display for FuelEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} {:>10} {:<7} yearly (~${})",
            self.fuel.label(),
            format_quantity(self.quantity),
            self.unit,
            format_cost(self.cost)
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub location: Option<String>,
    pub estimates: Vec<FuelEstimate>,
    pub total_cost: f64,
}

impl Report {
    pub fn from_prediction(prediction: &PredictResponse, location: Option<&GeocodeItem>) -> Self {
        let estimates = vec![
            FuelEstimate::new(Fuel::Electricity, prediction.btuel),
            FuelEstimate::new(Fuel::NaturalGas, prediction.btung),
            FuelEstimate::new(Fuel::Propane, prediction.btulp),
            FuelEstimate::new(Fuel::FuelOil, prediction.btufo),
            FuelEstimate::new(Fuel::Wood, prediction.btuwd),
        ];
        let total_cost = estimates.iter().map(|e| e.cost).sum();

        Self {
            generated_at: Utc::now(),
            location: location.map(|item| item.formatted.clone()),
            estimates,
            total_cost,
        }
    }

    pub fn estimate(&self, fuel: Fuel) -> Option<&FuelEstimate> {
        self.estimates.iter().find(|e| e.fuel == fuel)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::from("Estimated yearly energy use\n");
        if let Some(location) = &self.location {
            out.push_str(&format!("Location: {}\n", location));
        }
        out.push('\n');
        for estimate in &self.estimates {
            out.push_str(&estimate.to_string());
            out.push('\n');
        }
        out.push_str(&format!("\nTotal: ~${}\n", format_cost(self.total_cost)));
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["fuel", "unit", "quantity", "cost_usd"])?;
        for e in &self.estimates {
            wtr.write_record(&[
                e.fuel.label().to_string(),
                e.unit.to_string(),
                format!("{:.0}", e.quantity),
                format!("{:.2}", e.cost),
            ])?;
        }
        wtr.flush()?;
        wtr.into_inner()
            .map_err(|e| ForecastError::IoError(e.into_error()))
    }

    /// 依格式寫出檔案，回傳寫入的檔名；檔名中的 `{timestamp}` 會被替換
    pub async fn export<S: Storage>(
        &self,
        storage: &S,
        file_stem: &str,
        formats: &[String],
    ) -> Result<Vec<String>> {
        let stem = file_stem.replace(
            "{timestamp}",
            &self.generated_at.format("%Y%m%d_%H%M%S").to_string(),
        );

        let mut written = Vec::new();
        for format in formats {
            let (ext, data) = match format.as_str() {
                "text" | "txt" => ("txt", self.render_text().into_bytes()),
                "json" => ("json", self.to_json()?.into_bytes()),
                "csv" => ("csv", self.to_csv()?),
                other => {
                    tracing::warn!("🔶 Unsupported output format: {}", other);
                    continue;
                }
            };
            let filename = format!("{}.{}", stem, ext);
            storage.write_file(&filename, &data).await?;
            tracing::info!("💾 Report saved: {}", filename);
            written.push(filename);
        }
        Ok(written)
    }
}

/// 整數並加上千分位：`12,345`
pub fn format_quantity(value: f64) -> String {
    group_thousands(&format!("{:.0}", value.max(0.0)))
}

/// 兩位小數並加上千分位：`1,234.50`
pub fn format_cost(value: f64) -> String {
    let fixed = format!("{:.2}", value.max(0.0));
    match fixed.split_once('.') {
        Some((whole, cents)) => format!("{}.{}", group_thousands(whole), cents),
        None => group_thousands(&fixed),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
