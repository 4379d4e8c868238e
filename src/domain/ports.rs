use crate::core::steps::{ApplianceForm, HomeForm, HouseholdForm, HvacForm};
use crate::domain::model::{
    ClimateNormals, Coordinates, FieldError, GeocodeItem, HealthStatus, PredictResponse,
};
use crate::domain::request::PredictRequest;
use crate::utils::error::{ForecastError, Result};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn output_path(&self) -> Option<&str>;
    fn output_formats(&self) -> &[String];
}

/// 外部的預測服務（地理編碼、氣候、預測）
#[async_trait]
pub trait ForecastApi: Send + Sync {
    async fn healthcheck(&self) -> Result<HealthStatus>;
    async fn forward_geocode(&self, search: &str) -> Result<Vec<GeocodeItem>>;
    async fn reverse_geocode(&self, coords: Coordinates) -> Result<Vec<GeocodeItem>>;
    async fn climate(&self, coords: Coordinates) -> Result<ClimateNormals>;
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse>;
}

/// 使用者如何描述自己的位置
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Search(String),
    Device(Coordinates),
}

/// 精靈每一步的答案來源：互動提示或答案檔
pub trait AnswerSource: Send {
    fn location_query(&mut self) -> Result<LocationQuery>;
    fn choose_location(&mut self, candidates: &[GeocodeItem]) -> Result<usize>;

    /// 位置無法解析時呼叫；回傳 true 表示重新詢問位置
    fn retry_location(&mut self, error: &ForecastError) -> Result<bool>;
    fn home(&mut self) -> Result<HomeForm>;
    fn appliances(&mut self) -> Result<ApplianceForm>;
    fn hvac(&mut self) -> Result<HvacForm>;
    fn household(&mut self) -> Result<HouseholdForm>;

    /// 某一步驗證失敗時呼叫；回傳 true 表示重新作答，false 表示放棄
    fn retry_after_errors(&mut self, step: &str, errors: &[FieldError]) -> Result<bool>;
}
