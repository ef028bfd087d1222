//! TriMet web services HTTP client.
//!
//! Provides async methods for the route configuration and vehicle position
//! endpoints. Authentication is an `appid` query parameter.

use serde::de::DeserializeOwned;

use crate::domain::VehicleRecord;
use crate::tracking::{TelemetryError, VehicleSource};

use super::convert::{convert_vehicles, result_set_error};
use super::error::TrimetError;
use super::types::{RouteConfigResponse, VehiclesResponse};

/// Default base URL for the TriMet web services.
const DEFAULT_BASE_URL: &str = "https://developer.trimet.org/ws";

/// Configuration for the TriMet client.
#[derive(Debug, Clone)]
pub struct TrimetConfig {
    /// Application id issued by TriMet
    pub app_id: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TrimetConfig {
    /// Create a new config with the given app id.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// TriMet web services client.
#[derive(Debug, Clone)]
pub struct TrimetClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
}

impl TrimetClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TrimetConfig) -> Result<Self, TrimetError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_id: config.app_id,
        })
    }

    /// Fetch the full route configuration, with stops and directions.
    pub async fn get_route_config(&self) -> Result<RouteConfigResponse, TrimetError> {
        let url = format!("{}/V1/routeConfig", self.base_url);
        let response: RouteConfigResponse = self
            .get_json(
                &url,
                &[
                    ("stops", "true"),
                    ("tp", "true"),
                    ("dir", "true"),
                    ("json", "true"),
                ],
            )
            .await?;

        if let Some(error) = response
            .result_set
            .as_ref()
            .and_then(|rs| rs.error.clone())
        {
            return Err(result_set_error(error));
        }

        Ok(response)
    }

    /// Fetch every vehicle currently reporting a position.
    pub async fn get_vehicles(&self) -> Result<Vec<VehicleRecord>, TrimetError> {
        let url = format!("{}/v2/vehicles", self.base_url);
        let response: VehiclesResponse = self.get_json(&url, &[]).await?;
        convert_vehicles(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, TrimetError> {
        let response = self
            .http
            .get(url)
            .query(&[("appid", self.app_id.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(TrimetError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrimetError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TrimetError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl VehicleSource for TrimetClient {
    async fn fetch_vehicles(&self) -> Result<Vec<VehicleRecord>, TelemetryError> {
        Ok(self.get_vehicles().await?)
    }
}
