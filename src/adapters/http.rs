use crate::domain::model::{
    ClimateNormals, Coordinates, GeocodeItem, HealthStatus, PredictResponse,
};
use crate::domain::ports::{ConfigProvider, ForecastApi};
use crate::domain::request::PredictRequest;
use crate::utils::error::{ForecastError, Result};
use async_trait::async_trait;
use moka::future::Cache;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const MAX_CACHE_CAPACITY: u64 = 256;

/// 預測服務的 HTTP 用戶端
///
/// 地理編碼、氣候與預測的回應會在用戶端的生命週期內快取；
/// 相同的請求不會再打一次服務。
pub struct HttpForecastClient {
    client: Client,
    base_url: String,
    geocode_cache: Cache<String, Vec<GeocodeItem>>,
    climate_cache: Cache<String, ClimateNormals>,
    predict_cache: Cache<String, PredictResponse>,
}

impl HttpForecastClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            geocode_cache: Cache::new(MAX_CACHE_CAPACITY),
            climate_cache: Cache::new(MAX_CACHE_CAPACITY),
            predict_cache: Cache::new(MAX_CACHE_CAPACITY),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.api_base_url(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        tracing::debug!("📡 API response status: {}", response.status());
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn fetch_geocode(&self, key: String, query: &[(&str, String)]) -> Result<Vec<GeocodeItem>> {
        if let Some(items) = self.geocode_cache.get(&key).await {
            tracing::debug!("📦 Geocode cache hit: {}", key);
            return Ok(items);
        }

        tracing::debug!("📡 GET {} {:?}", self.endpoint("geocode"), query);
        let response = self
            .client
            .get(self.endpoint("geocode"))
            .query(query)
            .send()
            .await?;
        let items: Vec<GeocodeItem> = self.read_json(response).await?;

        self.geocode_cache.insert(key, items.clone()).await;
        Ok(items)
    }
}

/// 非 2xx 回應：優先使用服務回傳 JSON 的 `description`
async fn status_error(response: Response) -> ForecastError {
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or("Unknown error").to_string();

    let description = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("description").cloned());

    let message = match description {
        Some(serde_json::Value::String(text)) => text,
        Some(serde_json::Value::Null) | None => reason,
        Some(other) => other.to_string(),
    };

    tracing::error!("❌ API returned {}: {}", status.as_u16(), message);
    ForecastError::ApiStatus {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl ForecastApi for HttpForecastClient {
    async fn healthcheck(&self) -> Result<HealthStatus> {
        let response = self.client.get(self.endpoint("healthcheck")).send().await?;
        self.read_json(response).await
    }

    async fn forward_geocode(&self, search: &str) -> Result<Vec<GeocodeItem>> {
        let key = format!("search:{}", search);
        self.fetch_geocode(key, &[("search", search.to_string())])
            .await
    }

    async fn reverse_geocode(&self, coords: Coordinates) -> Result<Vec<GeocodeItem>> {
        let key = format!("reverse:{},{}", coords.lat, coords.lng);
        self.fetch_geocode(
            key,
            &[("lat", coords.lat.to_string()), ("lng", coords.lng.to_string())],
        )
        .await
    }

    async fn climate(&self, coords: Coordinates) -> Result<ClimateNormals> {
        let key = format!("{},{}", coords.lat, coords.lng);
        if let Some(normals) = self.climate_cache.get(&key).await {
            tracing::debug!("📦 Climate cache hit: {}", key);
            return Ok(normals);
        }

        let response = self
            .client
            .get(self.endpoint("climate"))
            .query(&[("lat", coords.lat), ("lng", coords.lng)])
            .send()
            .await?;
        let normals: ClimateNormals = self.read_json(response).await?;

        self.climate_cache.insert(key, normals.clone()).await;
        Ok(normals)
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse> {
        // 欄位順序固定，序列化結果可以直接當快取鍵
        let key = serde_json::to_string(request)?;
        if let Some(prediction) = self.predict_cache.get(&key).await {
            tracing::debug!("📦 Prediction cache hit");
            return Ok(prediction);
        }

        tracing::info!(
            "📡 Requesting prediction with {} fields",
            request.field_count()
        );
        let response = self
            .client
            .put(self.endpoint("predict"))
            .json(request)
            .send()
            .await?;
        let prediction: PredictResponse = self.read_json(response).await?;

        self.predict_cache.insert(key, prediction).await;
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client =
            HttpForecastClient::new("http://localhost:5000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.endpoint("predict"), "http://localhost:5000/api/predict");
    }
}
