//! Process-level facts reported by the /health endpoint.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::api::latency::{LatencySummary, UpstreamLatency};
use crate::config::Config;

pub struct HealthState {
    started_at: Instant,
    port: u16,
    environment: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub port: u16,
    pub environment: String,
    pub message: &'static str,
    /// Seconds since startup.
    pub uptime: f64,
    pub upstream_latency: BTreeMap<String, LatencySummary>,
}

impl HealthState {
    pub fn new(cfg: &Config) -> Self {
        Self {
            started_at: Instant::now(),
            port: cfg.port,
            environment: cfg.environment.clone(),
        }
    }

    pub fn report(&self, latency: &UpstreamLatency, now: DateTime<Utc>) -> HealthResponse {
        HealthResponse {
            status: "OK",
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            port: self.port,
            environment: self.environment.clone(),
            message: "Server is running!",
            uptime: self.started_at.elapsed().as_secs_f64(),
            upstream_latency: latency.summary(),
        }
    }
}
