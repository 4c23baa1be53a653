use crate::config::GeocoderConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Address-to-coordinates provider. `Ok(None)` means the provider found no
/// match for the address; transport and provider failures are errors.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Returns (latitude, longitude) of the most relevant match, if any.
    async fn fetch_coordinates(&self, address: &str) -> AppResult<Option<(f64, f64)>>;
}

#[derive(Debug, Deserialize)]
struct GeocoderResponse {
    response: GeocoderBody,
}

#[derive(Debug, Deserialize)]
struct GeocoderBody {
    #[serde(rename = "GeoObjectCollection")]
    collection: GeoObjectCollection,
}

#[derive(Debug, Deserialize)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember", default)]
    members: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Debug, Deserialize)]
struct GeoObject {
    #[serde(rename = "Point")]
    point: Point,
}

#[derive(Debug, Deserialize)]
struct Point {
    /// `"<lon> <lat>"`, space-separated, longitude first.
    pos: String,
}

/// Yandex geocoding API client.
#[derive(Clone)]
pub struct YandexGeocoder {
    client: Client,
    config: GeocoderConfig,
}

impl YandexGeocoder {
    pub fn new(config: GeocoderConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Geocoder for YandexGeocoder {
    async fn fetch_coordinates(&self, address: &str) -> AppResult<Option<(f64, f64)>> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("geocode", address),
                ("apikey", self.config.apikey.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| AppError::GeocodingError(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::GeocodingError(format!(
                "geocoder returned status {}",
                response.status()
            )));
        }

        let body: GeocoderResponse = response
            .json()
            .await
            .map_err(|e| AppError::GeocodingError(format!("malformed response: {e}")))?;

        let Some(most_relevant) = body.response.collection.members.into_iter().next() else {
            return Ok(None);
        };

        parse_pos(&most_relevant.geo_object.point.pos).map(Some)
    }
}

/// Parse a `"<lon> <lat>"` position string into (latitude, longitude).
fn parse_pos(pos: &str) -> AppResult<(f64, f64)> {
    let mut parts = pos.split(' ');
    let lon = parts.next().and_then(|s| s.parse::<f64>().ok());
    let lat = parts.next().and_then(|s| s.parse::<f64>().ok());

    match (lat, lon) {
        (Some(lat), Some(lon)) if parts.next().is_none() => Ok((lat, lon)),
        _ => Err(AppError::GeocodingError(format!(
            "malformed pos string: {pos:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pos() {
        let (lat, lon) = parse_pos("37.6173 55.7558").unwrap();
        assert_eq!(lat, 55.7558);
        assert_eq!(lon, 37.6173);

        assert!(parse_pos("").is_err());
        assert!(parse_pos("37.6173").is_err());
        assert!(parse_pos("37.6173 55.7558 0").is_err());
        assert!(parse_pos("lon lat").is_err());
    }

    #[test]
    fn test_deserialize_response() {
        let body = serde_json::json!({
            "response": {
                "GeoObjectCollection": {
                    "featureMember": [
                        {"GeoObject": {"Point": {"pos": "30.3351 59.9343"}}},
                        {"GeoObject": {"Point": {"pos": "0 0"}}}
                    ]
                }
            }
        });

        let parsed: GeocoderResponse = serde_json::from_value(body).unwrap();
        let first = &parsed.response.collection.members[0];
        assert_eq!(first.geo_object.point.pos, "30.3351 59.9343");
    }

    #[test]
    fn test_deserialize_empty_collection() {
        let body = serde_json::json!({
            "response": {"GeoObjectCollection": {"featureMember": []}}
        });

        let parsed: GeocoderResponse = serde_json::from_value(body).unwrap();
        assert!(parsed.response.collection.members.is_empty());
    }
}
