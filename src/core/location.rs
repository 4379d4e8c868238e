//! 位置解析：地址搜尋、裝置座標反查，以及該地點的氣候常年值

use crate::domain::model::{ClimateNormals, Coordinates, GeocodeItem};
use crate::domain::ports::ForecastApi;
use crate::utils::error::{ForecastError, Result};

pub const MIN_SEARCH_LEN: usize = 3;

pub struct LocationResolver<'a, A: ForecastApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: ForecastApi + ?Sized> LocationResolver<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// 正向地理編碼；空的結果不是錯誤，由呼叫端決定如何處理
    pub async fn search(&self, text: &str) -> Result<Vec<GeocodeItem>> {
        let text = text.trim();
        if text.chars().count() < MIN_SEARCH_LEN {
            return Err(ForecastError::LocationError {
                message: format!("Search must be at least {} characters", MIN_SEARCH_LEN),
            });
        }

        tracing::debug!("🔍 Searching for '{}'", text);
        let items = self.api.forward_geocode(text).await?;
        tracing::info!("🔍 '{}' matched {} location(s)", text, items.len());
        Ok(items)
    }

    /// 以裝置座標反查地點，取第一筆結果
    pub async fn from_coordinates(&self, coords: Coordinates) -> Result<GeocodeItem> {
        if !coords.is_valid() {
            return Err(ForecastError::LocationError {
                message: format!("Coordinates ({}, {}) are out of range", coords.lat, coords.lng),
            });
        }

        let items = match self.api.reverse_geocode(coords).await {
            Ok(items) => items,
            Err(ForecastError::ApiStatus { status: 400, .. }) => {
                return Err(ForecastError::LocationError {
                    message: "Device outside supported area".to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        items
            .into_iter()
            .next()
            .ok_or_else(|| ForecastError::LocationError {
                message: "Location information is unavailable".to_string(),
            })
    }

    pub async fn climate_for(&self, item: &GeocodeItem) -> Result<ClimateNormals> {
        let coords = item.coordinates().rounded();
        tracing::debug!("🌡️ Fetching climate normals for ({:.3}, {:.3})", coords.lat, coords.lng);
        self.api.climate(coords).await
    }
}

/// `Denver, CO 80202, USA (39.753, -104.999)`
pub fn display(item: &GeocodeItem) -> String {
    format!("{} ({:.3}, {:.3})", item.formatted, item.lat, item.lng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{HealthStatus, PredictResponse};
    use crate::domain::request::PredictRequest;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 只回應預先設定結果的假服務，並記錄收到的氣候查詢座標
    #[derive(Default)]
    struct FakeApi {
        reverse: Option<Result<Vec<GeocodeItem>>>,
        climate_calls: Mutex<Vec<Coordinates>>,
    }

    #[async_trait]
    impl ForecastApi for FakeApi {
        async fn healthcheck(&self) -> Result<HealthStatus> {
            Ok(HealthStatus {
                status: "healthy".to_string(),
            })
        }

        async fn forward_geocode(&self, search: &str) -> Result<Vec<GeocodeItem>> {
            Ok(vec![item(search)])
        }

        async fn reverse_geocode(&self, _coords: Coordinates) -> Result<Vec<GeocodeItem>> {
            match &self.reverse {
                Some(Ok(items)) => Ok(items.clone()),
                Some(Err(ForecastError::ApiStatus { status, message })) => {
                    Err(ForecastError::ApiStatus {
                        status: *status,
                        message: message.clone(),
                    })
                }
                _ => Ok(vec![]),
            }
        }

        async fn climate(&self, coords: Coordinates) -> Result<ClimateNormals> {
            self.climate_calls.lock().unwrap().push(coords);
            Ok(ClimateNormals {
                hdd65: 1000.0,
                cdd65: 2000.0,
                stats: vec![],
            })
        }

        async fn predict(&self, _request: &PredictRequest) -> Result<PredictResponse> {
            unimplemented!()
        }
    }

    fn item(formatted: &str) -> GeocodeItem {
        GeocodeItem {
            id: "1".to_string(),
            formatted: formatted.to_string(),
            lat: 29.951_065_8,
            lng: -90.071_532_6,
        }
    }

    #[tokio::test]
    async fn test_search_requires_three_characters() {
        let api = FakeApi::default();
        let resolver = LocationResolver::new(&api);

        let err = resolver.search("  no ").await.unwrap_err();
        assert!(matches!(err, ForecastError::LocationError { .. }));

        let items = resolver.search("  nola ").await.unwrap();
        assert_eq!(items[0].formatted, "nola");
    }

    #[tokio::test]
    async fn test_reverse_geocode_outside_area() {
        let api = FakeApi {
            reverse: Some(Err(ForecastError::ApiStatus {
                status: 400,
                message: "Bad Request".to_string(),
            })),
            ..Default::default()
        };
        let err = LocationResolver::new(&api)
            .from_coordinates(Coordinates::new(51.5, -0.12))
            .await
            .unwrap_err();
        assert_eq!(err.user_friendly_message(), "Device outside supported area");
    }

    #[tokio::test]
    async fn test_reverse_geocode_other_errors_pass_through() {
        let api = FakeApi {
            reverse: Some(Err(ForecastError::ApiStatus {
                status: 502,
                message: "Bad Gateway".to_string(),
            })),
            ..Default::default()
        };
        let err = LocationResolver::new(&api)
            .from_coordinates(Coordinates::new(40.0, -75.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::ApiStatus { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_reverse_geocode_picks_first_result() {
        let api = FakeApi {
            reverse: Some(Ok(vec![item("first"), item("second")])),
            ..Default::default()
        };
        let resolver = LocationResolver::new(&api);
        let chosen = resolver
            .from_coordinates(Coordinates::new(29.95, -90.07))
            .await
            .unwrap();
        assert_eq!(chosen.formatted, "first");

        let empty = FakeApi::default();
        let err = LocationResolver::new(&empty)
            .from_coordinates(Coordinates::new(29.95, -90.07))
            .await
            .unwrap_err();
        assert_eq!(err.user_friendly_message(), "Location information is unavailable");
    }

    #[tokio::test]
    async fn test_invalid_coordinates_never_reach_the_api() {
        let api = FakeApi::default();
        let err = LocationResolver::new(&api)
            .from_coordinates(Coordinates::new(95.0, 0.0))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[tokio::test]
    async fn test_climate_uses_rounded_coordinates() {
        let api = FakeApi::default();
        let normals = LocationResolver::new(&api)
            .climate_for(&item("New Orleans"))
            .await
            .unwrap();
        assert_eq!(normals.cdd65, 2000.0);
        assert_eq!(
            api.climate_calls.lock().unwrap().as_slice(),
            &[Coordinates::new(29.951, -90.072)]
        );
    }

    #[test]
    fn test_display_uses_three_decimals() {
        assert_eq!(
            display(&item("New Orleans, LA, USA")),
            "New Orleans, LA, USA (29.951, -90.072)"
        );
    }
}
