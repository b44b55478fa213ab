use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::GeoPoint;

/// Errors that can occur when resolving an address
#[derive(Debug, Error)]
pub enum GeocoderError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Geocoding provider returned error: {0}")]
    ApiError(String),

    #[error("Address not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// A geocoded address as resolved by the map provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodedAddress {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "addressDetail")]
    pub address_detail: String,
}

impl GeocodedAddress {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Client for the map provider's geocoding API
///
/// Resolves free-text addresses to coordinates. The provider answers with
/// a `status` flag and a list of geocode candidates; the first candidate
/// wins. Coordinates come back as a single "lon,lat" string.
pub struct GeocoderClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl GeocoderClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            client,
        }
    }

    /// Resolve an address string to coordinates and a formatted address
    pub async fn geocode(&self, address: &str) -> Result<GeocodedAddress, GeocoderError> {
        let url = format!(
            "{}/v3/geocode/geo?key={}&address={}&output=JSON",
            self.base_url.trim_end_matches('/'),
            self.api_key,
            urlencoding::encode(address),
        );

        tracing::debug!("Geocoding address: {}", address);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(GeocoderError::ApiError(format!(
                "Geocoding request failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let status = json.get("status").and_then(|s| s.as_str()).unwrap_or("0");
        if status != "1" {
            let info = json
                .get("info")
                .and_then(|i| i.as_str())
                .unwrap_or("unknown provider error");
            return Err(GeocoderError::ApiError(info.to_string()));
        }

        let geocodes = json
            .get("geocodes")
            .and_then(|g| g.as_array())
            .ok_or_else(|| GeocoderError::InvalidResponse("Missing geocodes array".into()))?;

        let geocode = geocodes
            .first()
            .ok_or_else(|| GeocoderError::NotFound(address.to_string()))?;

        let location = geocode
            .get("location")
            .and_then(|l| l.as_str())
            .ok_or_else(|| GeocoderError::InvalidResponse("Missing location field".into()))?;

        let (longitude, latitude) = parse_location(location)?;

        let address_detail = geocode
            .get("formatted_address")
            .and_then(|a| a.as_str())
            .unwrap_or("")
            .to_string();

        tracing::debug!(
            "Resolved '{}' to ({}, {})",
            address,
            latitude,
            longitude
        );

        Ok(GeocodedAddress {
            name: address.to_string(),
            latitude,
            longitude,
            address_detail,
        })
    }
}

/// Parse the provider's "lon,lat" location string
fn parse_location(raw: &str) -> Result<(f64, f64), GeocoderError> {
    let mut parts = raw.split(',');
    let lon = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
    let lat = parts.next().and_then(|p| p.trim().parse::<f64>().ok());

    match (lon, lat) {
        (Some(lon), Some(lat)) => Ok((lon, lat)),
        _ => Err(GeocoderError::InvalidResponse(format!(
            "Malformed location string: {}",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        let (lon, lat) = parse_location("116.4074,39.9042").unwrap();
        assert!((lon - 116.4074).abs() < 1e-9);
        assert!((lat - 39.9042).abs() < 1e-9);
    }

    #[test]
    fn test_parse_location_malformed() {
        assert!(parse_location("116.4074").is_err());
        assert!(parse_location("not,numbers").is_err());
        assert!(parse_location("").is_err());
    }

    #[tokio::test]
    async fn test_geocode_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v3/geocode/geo")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":"1","info":"OK","geocodes":[{"formatted_address":"Dongcheng District, Beijing","location":"116.4074,39.9042"}]}"#,
            )
            .create_async()
            .await;

        let client = GeocoderClient::new(server.url(), "test_key".to_string());
        let resolved = client.geocode("Beijing").await.unwrap();

        assert_eq!(resolved.name, "Beijing");
        assert!((resolved.latitude - 39.9042).abs() < 1e-9);
        assert!((resolved.longitude - 116.4074).abs() < 1e-9);
        assert_eq!(resolved.address_detail, "Dongcheng District, Beijing");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_geocode_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/geocode/geo")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"1","info":"OK","geocodes":[]}"#)
            .create_async()
            .await;

        let client = GeocoderClient::new(server.url(), "test_key".to_string());
        let err = client.geocode("nowhere at all").await.unwrap_err();

        assert!(matches!(err, GeocoderError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_geocode_provider_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/geocode/geo")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"0","info":"INVALID_USER_KEY"}"#)
            .create_async()
            .await;

        let client = GeocoderClient::new(server.url(), "bad_key".to_string());
        let err = client.geocode("Beijing").await.unwrap_err();

        match err {
            GeocoderError::ApiError(info) => assert_eq!(info, "INVALID_USER_KEY"),
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }
}
