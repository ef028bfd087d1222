//! Mock TriMet client for running without an app id.
//!
//! Serves `routeConfig.json` and `vehicles.json` from a directory. The
//! vehicles file is re-read on every fetch, so editing it while the server
//! runs moves the vehicles.

use std::path::{Path, PathBuf};

use crate::domain::VehicleRecord;
use crate::tracking::{TelemetryError, VehicleSource};

use super::convert::convert_vehicles;
use super::error::TrimetError;
use super::types::{RouteConfigResponse, VehiclesResponse};

const ROUTE_CONFIG_FILE: &str = "routeConfig.json";
const VEHICLES_FILE: &str = "vehicles.json";

/// Mock client that reads TriMet responses from JSON files.
#[derive(Debug, Clone)]
pub struct MockTrimetClient {
    data_dir: PathBuf,
}

impl MockTrimetClient {
    /// Create a mock client over `data_dir`.
    ///
    /// Both files must exist up front.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, TrimetError> {
        let data_dir = data_dir.as_ref().to_path_buf();

        for file in [ROUTE_CONFIG_FILE, VEHICLES_FILE] {
            let path = data_dir.join(file);
            if !path.is_file() {
                return Err(TrimetError::Api {
                    status: 0,
                    message: format!("Mock data file missing: {}", path.display()),
                });
            }
        }

        Ok(Self { data_dir })
    }

    pub async fn get_route_config(&self) -> Result<RouteConfigResponse, TrimetError> {
        self.read_json(ROUTE_CONFIG_FILE).await
    }

    pub async fn get_vehicles(&self) -> Result<Vec<VehicleRecord>, TrimetError> {
        let response: VehiclesResponse = self.read_json(VEHICLES_FILE).await?;
        convert_vehicles(response)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(&self, file: &str) -> Result<T, TrimetError> {
        let path = self.data_dir.join(file);
        let json = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| TrimetError::Api {
                status: 0,
                message: format!("Failed to read {:?}: {}", path, e),
            })?;

        serde_json::from_str(&json).map_err(|e| TrimetError::Json {
            message: format!("{}: {}", path.display(), e),
            body: None,
        })
    }
}

impl VehicleSource for MockTrimetClient {
    async fn fetch_vehicles(&self) -> Result<Vec<VehicleRecord>, TelemetryError> {
        Ok(self.get_vehicles().await?)
    }
}
