use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, warn};

use crate::api::latency::UpstreamLatency;
use crate::config::{query_defaults, Config};
use crate::error::{AppError, Result};
use crate::types::{RawNeoRecord, Upstream};

/// Filters accepted by EONET `/events`.
#[derive(Debug, Clone)]
pub struct EonetEventsParams {
    pub limit: u32,
    pub days: u32,
    pub status: String,
    pub category: Option<String>,
    pub source: Option<String>,
}

impl Default for EonetEventsParams {
    fn default() -> Self {
        Self {
            limit: query_defaults::EONET_LIMIT,
            days: query_defaults::EONET_DAYS,
            status: query_defaults::EONET_STATUS.to_string(),
            category: None,
            source: None,
        }
    }
}

/// Photo search for one rover. `earth_date` / `camera` are optional filters.
#[derive(Debug, Clone)]
pub struct MarsPhotoParams {
    pub earth_date: Option<String>,
    pub camera: Option<String>,
    pub page: u32,
}

/// Thin typed wrapper over the NASA REST APIs. One shared `reqwest::Client`,
/// every call timed into `UpstreamLatency`.
pub struct NasaClient {
    http: reqwest::Client,
    cfg: Config,
    latency: Arc<UpstreamLatency>,
}

impl NasaClient {
    pub fn new(cfg: &Config, latency: Arc<UpstreamLatency>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            cfg: cfg.clone(),
            latency,
        })
    }

    /// GET `url` with `query`, returning the JSON body. Non-2xx statuses become
    /// `AppError::UpstreamStatus` carrying the upstream's own error message.
    async fn get_json(&self, api: Upstream, url: &str, query: &[(&str, String)]) -> Result<Value> {
        let started = Instant::now();
        let resp = self.http.get(url).query(query).send().await;
        self.latency.record(api, started.elapsed());
        let resp = resp?;

        let status = resp.status();
        debug!(%api, url, status = status.as_u16(), "upstream response");

        if !status.is_success() {
            let body: Option<Value> = resp.json().await.ok();
            let message = body.as_ref().and_then(upstream_error_message);
            warn!(%api, url, status = status.as_u16(), ?message, "upstream error");
            return Err(AppError::UpstreamStatus {
                api,
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    fn api_key(&self) -> (&'static str, String) {
        ("api_key", self.cfg.nasa_api_key.clone())
    }

    // -----------------------------------------------------------------------
    // APOD
    // -----------------------------------------------------------------------

    /// Astronomy Picture of the Day, for `date` or today.
    pub async fn apod(&self, date: Option<&str>) -> Result<Value> {
        let url = format!("{}/planetary/apod", self.cfg.nasa_api_url);
        let mut query = vec![self.api_key()];
        if let Some(d) = date {
            query.push(("date", d.to_string()));
        }
        self.get_json(Upstream::Apod, &url, &query).await
    }

    // -----------------------------------------------------------------------
    // Mars Rover Photos
    // -----------------------------------------------------------------------

    pub async fn mars_rovers(&self) -> Result<Value> {
        let url = format!("{}/mars-photos/api/v1/rovers", self.cfg.nasa_api_url);
        self.get_json(Upstream::Mars, &url, &[self.api_key()]).await
    }

    /// The rover's `photo_manifest` object.
    pub async fn mars_manifest(&self, rover: &str) -> Result<Value> {
        let url = format!(
            "{}/mars-photos/api/v1/manifests/{rover}",
            self.cfg.nasa_api_url
        );
        let mut body = self.get_json(Upstream::Mars, &url, &[self.api_key()]).await?;
        body.get_mut("photo_manifest")
            .map(Value::take)
            .ok_or_else(|| AppError::Payload {
                api: Upstream::Mars,
                reason: format!("manifest for {rover} has no photo_manifest"),
            })
    }

    /// The `photos` array of a filtered photo search.
    pub async fn mars_photos(&self, rover: &str, params: &MarsPhotoParams) -> Result<Vec<Value>> {
        let url = format!(
            "{}/mars-photos/api/v1/rovers/{rover}/photos",
            self.cfg.nasa_api_url
        );
        let mut query = vec![self.api_key(), ("page", params.page.to_string())];
        if let Some(d) = &params.earth_date {
            query.push(("earth_date", d.clone()));
        }
        if let Some(c) = &params.camera {
            query.push(("camera", c.clone()));
        }

        let body = self.get_json(Upstream::Mars, &url, &query).await?;
        match body.get("photos") {
            Some(Value::Array(photos)) => Ok(photos.clone()),
            _ => Err(AppError::Payload {
                api: Upstream::Mars,
                reason: format!("photo search for {rover} has no photos array"),
            }),
        }
    }

    /// Full photo search response for one martian day.
    pub async fn mars_photos_by_sol(&self, rover: &str, sol: &str) -> Result<Value> {
        let url = format!(
            "{}/mars-photos/api/v1/rovers/{rover}/photos",
            self.cfg.nasa_api_url
        );
        let query = [self.api_key(), ("sol", sol.to_string())];
        self.get_json(Upstream::Mars, &url, &query).await
    }

    // -----------------------------------------------------------------------
    // EONET
    // -----------------------------------------------------------------------

    pub async fn eonet_events(&self, params: &EonetEventsParams) -> Result<Value> {
        let url = format!("{}/events", self.cfg.eonet_api_url);
        let mut query = vec![
            ("limit", params.limit.to_string()),
            ("days", params.days.to_string()),
            ("status", params.status.clone()),
        ];
        if let Some(c) = &params.category {
            query.push(("category", c.clone()));
        }
        if let Some(s) = &params.source {
            query.push(("source", s.clone()));
        }
        self.get_json(Upstream::Eonet, &url, &query).await
    }

    /// Events with EONET's own defaults, as used by the chatbot.
    pub async fn eonet_latest(&self) -> Result<Value> {
        let url = format!("{}/events", self.cfg.eonet_api_url);
        self.get_json(Upstream::Eonet, &url, &[]).await
    }

    pub async fn eonet_categories(&self) -> Result<Value> {
        let url = format!("{}/categories", self.cfg.eonet_api_url);
        self.get_json(Upstream::Eonet, &url, &[]).await
    }

    pub async fn eonet_sources(&self) -> Result<Value> {
        let url = format!("{}/sources", self.cfg.eonet_api_url);
        self.get_json(Upstream::Eonet, &url, &[]).await
    }

    // -----------------------------------------------------------------------
    // NeoWs
    // -----------------------------------------------------------------------

    /// Feed for `(start_date, end_date)`, or NeoWs' default week from today.
    pub async fn neo_feed(&self, range: Option<(&str, &str)>) -> Result<Value> {
        let url = format!("{}/neo/rest/v1/feed", self.cfg.nasa_api_url);
        let mut query = vec![self.api_key()];
        if let Some((start, end)) = range {
            query.push(("start_date", start.to_string()));
            query.push(("end_date", end.to_string()));
        }
        self.get_json(Upstream::Neo, &url, &query).await
    }

    pub async fn neo_browse(&self, page: u32, size: u32, sort: &str) -> Result<Value> {
        let url = format!("{}/neo/rest/v1/neo/browse", self.cfg.nasa_api_url);
        let query = [
            self.api_key(),
            ("page", page.to_string()),
            ("size", size.to_string()),
            ("sort", sort.to_string()),
        ];
        self.get_json(Upstream::Neo, &url, &query).await
    }

    /// Raw lookup, passed through untouched.
    pub async fn neo_by_id(&self, id: &str) -> Result<Value> {
        let url = format!("{}/neo/rest/v1/neo/{id}", self.cfg.nasa_api_url);
        self.get_json(Upstream::Neo, &url, &[self.api_key()]).await
    }

    /// Lookup deserialized into the shape the visualization transform reads.
    pub async fn neo_record(&self, id: &str) -> Result<RawNeoRecord> {
        let body = self.neo_by_id(id).await?;
        Ok(serde_json::from_value(body)?)
    }

    // -----------------------------------------------------------------------
    // NASA Image and Video Library
    // -----------------------------------------------------------------------

    pub async fn media_search(&self, q: &str) -> Result<Value> {
        let url = format!("{}/search", self.cfg.images_api_url);
        self.get_json(Upstream::Images, &url, &[("q", q.to_string())]).await
    }
}

/// NASA APIs report errors as `{"error": "..."}`, `{"error": {"message": ...}}`
/// or `{"msg": "..."}` depending on the service.
fn upstream_error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|e| e.as_str().or_else(|| e.get("message").and_then(|m| m.as_str())))
        .or_else(|| body.get("msg").and_then(|m| m.as_str()))
        .map(|s| s.to_string())
}
