//! HTTP client for the Sira tracking backend.
//!
//! One method per backend resource. Raw fetchers surface failures as
//! `ClientError`; the aggregation layer in `snapshot` decides which failures
//! degrade to fallback values.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use sira_common::{
    Alert, CombinedPayload, DashboardConfig, GeneralStats, InstrumentStats, ProcedureStats,
    RecentCount, InstrumentSet,
};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned {status} for {path}")]
    Status { status: StatusCode, path: String },

    #[error("no backend resource responded")]
    AllResourcesDown,
}

/// Client for the tracking backend's REST API.
pub struct SiraClient {
    http: reqwest::Client,
    base_url: String,
    list_limit: usize,
}

impl SiraClient {
    /// Build a client from the dashboard configuration.
    ///
    /// The builder-level timeout bounds every request this client makes; a
    /// hung backend degrades to the resource's fallback instead of stalling
    /// a refresh cycle forever.
    pub fn new(config: &DashboardConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            list_limit: config.list_limit,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                path: path.to_string(),
            });
        }

        Ok(response.json().await?)
    }

    /// Combined snapshot payload, the primary aggregation path.
    pub async fn combined(&self) -> Result<CombinedPayload, ClientError> {
        self.get_json("/api/dashboard/completo").await
    }

    pub async fn general_stats(&self) -> Result<GeneralStats, ClientError> {
        self.get_json("/api/dashboard/stats").await
    }

    pub async fn active_alerts(&self) -> Result<Vec<Alert>, ClientError> {
        self.get_json("/api/alertas/activas").await
    }

    pub async fn instrument_stats(&self) -> Result<InstrumentStats, ClientError> {
        self.get_json("/api/instrumentos/estadisticas").await
    }

    pub async fn procedure_stats(&self) -> Result<ProcedureStats, ClientError> {
        self.get_json("/api/procedimientos/estadisticas").await
    }

    pub async fn recent_counts(&self) -> Result<Vec<RecentCount>, ClientError> {
        self.get_json(&format!("/api/conteos/recientes?limit={}", self.list_limit))
            .await
    }

    pub async fn active_sets(&self) -> Result<Vec<InstrumentSet>, ClientError> {
        self.get_json(&format!("/api/sets/activos?limit={}", self.list_limit))
            .await
    }

    /// Mark one alert resolved. No fallback: the caller surfaces failures.
    pub async fn resolve_alert(&self, id: u64) -> Result<(), ClientError> {
        let path = format!("/api/alertas/{}/resolver", id);
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { status, path });
        }
        Ok(())
    }
}
