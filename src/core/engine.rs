use crate::core::location::{self, LocationResolver};
use crate::core::report::Report;
use crate::core::steps::StepForm;
use crate::core::wizard::{Step, Wizard};
use crate::domain::model::{ClimateNormals, GeocodeItem, HealthStatus};
use crate::domain::ports::{AnswerSource, ForecastApi, LocationQuery};
use crate::utils::error::{ForecastError, Result};

/// 串起位置解析、四個表單步驟與預測
pub struct ForecastEngine<A: ForecastApi> {
    api: A,
}

impl<A: ForecastApi> ForecastEngine<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn check(&self) -> Result<HealthStatus> {
        let status = self.api.healthcheck().await?;
        tracing::info!("💓 Forecast API status: {}", status.status);
        Ok(status)
    }

    pub async fn run<S: AnswerSource + ?Sized>(
        &self,
        source: &mut S,
        preset: Option<LocationQuery>,
    ) -> Result<Report> {
        let wizard = self.collect(source, preset).await?;
        self.predict(&wizard).await
    }

    /// 走完精靈，回傳停在 `Predict` 的狀態
    pub async fn collect<S: AnswerSource + ?Sized>(
        &self,
        source: &mut S,
        preset: Option<LocationQuery>,
    ) -> Result<Wizard> {
        tracing::info!("🚀 Starting energy forecast");
        let mut wizard = Wizard::new();

        let (item, climate) = self.resolve_location(source, preset).await?;
        wizard.set_location(item, climate)?;

        complete_step(&mut wizard, Step::Home, source, |s| s.home())?;
        complete_step(&mut wizard, Step::Appliances, source, |s| s.appliances())?;
        complete_step(&mut wizard, Step::Hvac, source, |s| s.hvac())?;
        complete_step(&mut wizard, Step::Household, source, |s| s.household())?;

        tracing::info!(
            "📝 Collected {} fields",
            wizard.record().field_count()
        );
        Ok(wizard)
    }

    /// 解析位置並取得氣候常年值；互動輸入的位置失敗時可重新詢問
    pub async fn resolve_location<S: AnswerSource + ?Sized>(
        &self,
        source: &mut S,
        preset: Option<LocationQuery>,
    ) -> Result<(GeocodeItem, ClimateNormals)> {
        let resolver = LocationResolver::new(&self.api);
        let mut preset = preset;

        let item = loop {
            // 命令列或設定檔給的位置失敗就直接結束
            let (query, asked) = match preset.take() {
                Some(query) => (query, false),
                None => (source.location_query()?, true),
            };

            match self.locate(&resolver, &mut *source, query).await {
                Ok(item) => break item,
                Err(e @ ForecastError::LocationError { .. }) if asked => {
                    if !source.retry_location(&e)? {
                        return Err(e);
                    }
                    tracing::debug!("🔁 Asking for the location again: {}", e);
                }
                Err(e) => return Err(e),
            }
        };

        tracing::info!("📍 {}", location::display(&item));
        let climate = resolver.climate_for(&item).await?;
        Ok((item, climate))
    }

    async fn locate<S: AnswerSource + ?Sized>(
        &self,
        resolver: &LocationResolver<'_, A>,
        source: &mut S,
        query: LocationQuery,
    ) -> Result<GeocodeItem> {
        match query {
            LocationQuery::Search(text) => {
                let candidates = resolver.search(&text).await?;
                let index = match candidates.len() {
                    0 => {
                        return Err(ForecastError::LocationError {
                            message: format!("No results for '{}'", text.trim()),
                        })
                    }
                    1 => 0,
                    _ => source.choose_location(&candidates)?,
                };
                candidates
                    .into_iter()
                    .nth(index)
                    .ok_or_else(|| ForecastError::LocationError {
                        message: "Selected location is unavailable".to_string(),
                    })
            }
            LocationQuery::Device(coords) => resolver.from_coordinates(coords).await,
        }
    }

    pub async fn predict(&self, wizard: &Wizard) -> Result<Report> {
        let request = wizard.finish()?;
        let prediction = self.api.predict(&request).await?;
        tracing::info!(
            "✅ Prediction received (BTUEL {:.0}, BTUNG {:.0})",
            prediction.btuel,
            prediction.btung
        );
        Ok(Report::from_prediction(&prediction, wizard.location()))
    }
}

/// 取得答案並送出；驗證失敗時詢問來源是否重答
fn complete_step<S, F, Ask>(
    wizard: &mut Wizard,
    step: Step,
    source: &mut S,
    mut ask: Ask,
) -> Result<()>
where
    S: AnswerSource + ?Sized,
    F: StepForm,
    Ask: FnMut(&mut S) -> Result<F>,
{
    loop {
        let form = ask(&mut *source)?;
        match form.submit() {
            Ok(partial) => {
                wizard.submit(step, partial)?;
                return Ok(());
            }
            Err(ForecastError::ValidationError { step: name, errors }) => {
                if !source.retry_after_errors(&name, &errors)? {
                    return Err(ForecastError::ValidationError { step: name, errors });
                }
                tracing::debug!("🔁 Retrying {} step", name);
            }
            Err(e) => return Err(e),
        }
    }
}
