use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::ObsClient;
use crate::fs::ObsFilesystem;
use crate::types::ObsError;

/// Connection settings for one bucket.
///
/// Construction of the client and filesystem is a pure function of this
/// struct; nothing is read from the environment at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObsConfig {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl ObsConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: ObsConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ObsError> {
        for (name, value) in [
            ("access_key", &self.access_key),
            ("secret_key", &self.secret_key),
            ("bucket", &self.bucket),
        ] {
            if value.trim().is_empty() {
                return Err(ObsError::Configuration(format!(
                    "config key '{name}' must be a non-empty string"
                )));
            }
        }
        Ok(())
    }
}

/// Build a signed client from the configuration.
pub fn create_client(config: &ObsConfig) -> Result<ObsClient, ObsError> {
    config.validate()?;
    ObsClient::new(
        &config.access_key,
        &config.secret_key,
        config.region.clone(),
        config.endpoint.clone(),
    )
}

/// Build the virtual filesystem from the configuration. This is the single
/// entry point for wiring up the stack.
pub fn create_filesystem(config: &ObsConfig) -> Result<ObsFilesystem, ObsError> {
    let client = create_client(config)?;
    ObsFilesystem::new(Arc::new(client), config.bucket.clone(), &config.prefix)
}
