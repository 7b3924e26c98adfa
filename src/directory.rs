//! Read-only client for the activity-type directory

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::Config;
use crate::error::ApiError;
use crate::schedule::ActivityOption;

const ACTIVITY_TYPES_PATH: &str = "/activity-types";

/// The directory answers either with a bare array or with a `data` envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ActivityTypesResponse {
    List(Vec<ActivityOption>),
    Envelope { data: Vec<ActivityOption> },
}

#[derive(Clone)]
pub struct DirectoryClient {
    client: Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(DirectoryClient {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn activity_types_url(&self) -> String {
        format!("{}{}", self.base_url, ACTIVITY_TYPES_PATH)
    }

    pub async fn fetch_activity_types(&self) -> Result<Vec<ActivityOption>, ApiError> {
        let url = self.activity_types_url();
        tracing::debug!(%url, "Fetching activity types");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::RequestFailed { status, body });
        }

        let body = response.text().await?;
        let options = parse_activity_types(&body)?;
        tracing::info!(count = options.len(), "Activity types fetched");
        Ok(options)
    }
}

/// Decode a directory response body
pub fn parse_activity_types(body: &str) -> Result<Vec<ActivityOption>, ApiError> {
    let response: ActivityTypesResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("activity types: {}", e)))?;

    Ok(match response {
        ActivityTypesResponse::List(options) => options,
        ActivityTypesResponse::Envelope { data } => data,
    })
}
