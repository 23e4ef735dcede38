use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::api::health::{HealthResponse, HealthState};
use crate::api::latency::UpstreamLatency;
use crate::chat;
use crate::config::query_defaults;
use crate::error::{ApiError, AppError, ResultExt};
use crate::fetcher::{EonetEventsParams, MarsPhotoParams, NasaClient};
use crate::mars::{is_iso_date, validate_earth_date};
use crate::neo::process_for_visualization;
use crate::types::{ManifestSummary, ProcessedNeoData, RoverManifest};

#[derive(Clone)]
pub struct ApiState {
    pub client: Arc<NasaClient>,
    pub latency: Arc<UpstreamLatency>,
    pub health: Arc<HealthState>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/", get(get_apod))
        .route("/api/apod", get(get_apod))
        .route("/mars/rovers", get(get_rovers))
        .route("/mars/photos", get(get_mars_photos))
        .route("/eonet/events", get(get_eonet_events))
        .route("/eonet/categories", get(get_eonet_categories))
        .route("/eonet/sources", get(get_eonet_sources))
        .route("/neo/feed", get(get_neo_feed))
        .route("/neo/browse", get(get_neo_browse))
        .route("/neo/:id", get(get_neo_by_id))
        .route("/neo/:id/visualization", get(get_neo_visualization))
        .route("/api/chat", post(post_chat))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ApodQuery {
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct MarsPhotosQuery {
    pub rover: Option<String>,
    pub earth_date: Option<String>,
    pub camera: Option<String>,
    pub page: Option<String>,
}

#[derive(Deserialize)]
pub struct EonetEventsQuery {
    pub limit: Option<String>,
    pub days: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct NeoFeedQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
pub struct NeoBrowseQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Query values arrive as strings; empty means "not given".
fn present(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

fn parse_count(name: &str, v: Option<String>, default: u32) -> Result<u32, ApiError> {
    match present(v) {
        None => Ok(default),
        Some(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| ApiError::bad_request(format!("{name} must be a non-negative integer"))),
    }
}

// ---------------------------------------------------------------------------
// Health / fallback
// ---------------------------------------------------------------------------

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(state.health.report(&state.latency, Utc::now()))
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    info!(path = %uri, "404 Not Found");
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not Found", "path": uri.to_string() })),
    )
}

// ---------------------------------------------------------------------------
// APOD
// ---------------------------------------------------------------------------

async fn get_apod(
    State(state): State<ApiState>,
    Query(params): Query<ApodQuery>,
) -> Result<Json<Value>, ApiError> {
    let date = present(params.date);
    if let Some(d) = &date {
        if !is_iso_date(d) {
            return Err(ApiError::bad_request("Invalid date format. Use YYYY-MM-DD"));
        }
    }

    let apod = state
        .client
        .apod(date.as_deref())
        .await
        .context("Failed to fetch Astronomy Picture of the Day")?;
    Ok(Json(apod))
}

// ---------------------------------------------------------------------------
// Mars Rover Photos
// ---------------------------------------------------------------------------

async fn get_rovers(State(state): State<ApiState>) -> Result<Json<Value>, ApiError> {
    let rovers = state
        .client
        .mars_rovers()
        .await
        .context("Failed to fetch Mars rovers")?;
    Ok(Json(rovers))
}

/// Upstream 400/404 keep their status; anything else is a 500.
fn rover_error(e: AppError) -> ApiError {
    match &e {
        AppError::UpstreamStatus { status: 400, message, .. } => ApiError::new(
            StatusCode::BAD_REQUEST,
            "Invalid request parameters",
            Some(message.clone().unwrap_or_else(|| "Bad request to NASA API".to_string())),
        ),
        AppError::UpstreamStatus { status: 404, .. } => ApiError::new(
            StatusCode::NOT_FOUND,
            "Rover not found",
            Some("The specified rover does not exist or is not available.".to_string()),
        ),
        _ => ApiError::internal("Failed to fetch rover data", &e),
    }
}

/// Manifest only when no photo filter is given; otherwise a validated photo search.
async fn get_mars_photos(
    State(state): State<ApiState>,
    Query(params): Query<MarsPhotosQuery>,
) -> Result<Json<Value>, ApiError> {
    let Some(rover) = present(params.rover) else {
        return Err(ApiError::bad_request("Rover name is required"));
    };
    let earth_date = present(params.earth_date);
    let camera = present(params.camera);
    let page = present(params.page);

    let manifest_json = state.client.mars_manifest(&rover).await.map_err(rover_error)?;

    if earth_date.is_none() && camera.is_none() && page.is_none() {
        return Ok(Json(json!({ "photo_manifest": manifest_json })));
    }

    let manifest: RoverManifest = serde_json::from_value(manifest_json)
        .map_err(|e| rover_error(AppError::from(e)))?;

    if let Some(date) = &earth_date {
        if !is_iso_date(date) {
            return Err(ApiError::bad_request(
                "Invalid date format. Please use YYYY-MM-DD format (e.g., 2023-12-25).",
            ));
        }
        if let Err(msg) = validate_earth_date(date, &manifest, Utc::now().date_naive()) {
            return Err(ApiError::bad_request(msg).with_manifest(ManifestSummary::from(&manifest)));
        }
    }

    let search = MarsPhotoParams {
        earth_date,
        camera,
        page: parse_count("page", page, query_defaults::MARS_PHOTO_PAGE)?,
    };
    let photos = state
        .client
        .mars_photos(&rover, &search)
        .await
        .map_err(rover_error)?;

    if photos.is_empty() {
        let on_date = search
            .earth_date
            .as_deref()
            .map(|d| format!(" on {d}"))
            .unwrap_or_default();
        let with_camera = search
            .camera
            .as_deref()
            .map(|c| format!(" with camera {c}"))
            .unwrap_or_default();
        return Ok(Json(json!({
            "photos": [],
            "message": format!("No photos found for {rover}{on_date}{with_camera}."),
            "manifest": ManifestSummary::from(&manifest),
        })));
    }

    info!(rover = %rover, count = photos.len(), page = search.page, "mars photos");
    Ok(Json(json!({ "photos": photos })))
}

// ---------------------------------------------------------------------------
// EONET
// ---------------------------------------------------------------------------

async fn get_eonet_events(
    State(state): State<ApiState>,
    Query(params): Query<EonetEventsQuery>,
) -> Result<Json<Value>, ApiError> {
    let defaults = EonetEventsParams::default();
    let search = EonetEventsParams {
        limit: parse_count("limit", params.limit, defaults.limit)?,
        days: parse_count("days", params.days, defaults.days)?,
        status: present(params.status).unwrap_or(defaults.status),
        category: present(params.category),
        source: present(params.source),
    };

    let events = state
        .client
        .eonet_events(&search)
        .await
        .context("Failed to fetch Earth Observatory Natural Event Tracker events")?;
    Ok(Json(events))
}

async fn get_eonet_categories(State(state): State<ApiState>) -> Result<Json<Value>, ApiError> {
    let categories = state
        .client
        .eonet_categories()
        .await
        .context("Failed to fetch EONET categories")?;
    Ok(Json(categories))
}

async fn get_eonet_sources(State(state): State<ApiState>) -> Result<Json<Value>, ApiError> {
    let sources = state
        .client
        .eonet_sources()
        .await
        .context("Failed to fetch EONET sources")?;
    Ok(Json(sources))
}

// ---------------------------------------------------------------------------
// NeoWs
// ---------------------------------------------------------------------------

async fn get_neo_feed(
    State(state): State<ApiState>,
    Query(params): Query<NeoFeedQuery>,
) -> Result<Json<Value>, ApiError> {
    let (Some(start), Some(end)) = (present(params.start_date), present(params.end_date)) else {
        return Err(ApiError::bad_request(
            "Both start_date and end_date are required (YYYY-MM-DD format)",
        ));
    };
    if !is_iso_date(&start) || !is_iso_date(&end) {
        return Err(ApiError::bad_request("Invalid date format. Use YYYY-MM-DD"));
    }

    let feed = state
        .client
        .neo_feed(Some((&start, &end)))
        .await
        .context("Failed to fetch Near Earth Object feed")?;
    Ok(Json(feed))
}

async fn get_neo_browse(
    State(state): State<ApiState>,
    Query(params): Query<NeoBrowseQuery>,
) -> Result<Json<Value>, ApiError> {
    let page = parse_count("page", params.page, query_defaults::NEO_BROWSE_PAGE)?;
    let size = parse_count("size", params.size, query_defaults::NEO_BROWSE_SIZE)?;
    let sort = present(params.sort).unwrap_or_else(|| query_defaults::NEO_BROWSE_SORT.to_string());

    let browse = state
        .client
        .neo_browse(page, size, &sort)
        .await
        .context("Failed to fetch NEO browse data")?;
    Ok(Json(browse))
}

async fn get_neo_by_id(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::bad_request("NEO ID is required"));
    }

    let neo = state
        .client
        .neo_by_id(&id)
        .await
        .context("Failed to fetch NEO by ID")?;
    Ok(Json(neo))
}

async fn get_neo_visualization(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ProcessedNeoData>, ApiError> {
    const SUMMARY: &str = "Failed to fetch processed NEO data";

    let raw = state.client.neo_record(&id).await.context(SUMMARY)?;
    let processed = process_for_visualization(&raw, Utc::now())
        .map_err(AppError::from)
        .context(SUMMARY)?;

    info!(
        neo_id = %processed.id,
        approaches = processed.statistics.total_approaches,
        risk_score = processed.hazard_assessment.risk_score,
        risk_level = %processed.hazard_assessment.risk_level,
        "NEO visualization ready"
    );
    Ok(Json(processed))
}

// ---------------------------------------------------------------------------
// Chatbot
// ---------------------------------------------------------------------------

async fn post_chat(
    State(state): State<ApiState>,
    body: Option<Json<ChatRequest>>,
) -> (StatusCode, Json<ChatReply>) {
    let message = body.and_then(|Json(b)| present(b.message));
    let Some(message) = message else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ChatReply {
                reply: "Please provide a message.".to_string(),
            }),
        );
    };

    match chat::reply(&state.client, &message).await {
        Ok(reply) => (StatusCode::OK, Json(ChatReply { reply })),
        Err(e) => {
            error!("Chat reply failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatReply {
                    reply: "Sorry, there was an error processing your request.".to_string(),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    use crate::config::Config;

    // -----------------------------------------------------------------------
    // Stand-in for the NASA APIs
    // -----------------------------------------------------------------------

    fn close_approach(date: &str, km: &str, kph: &str) -> Value {
        json!({
            "close_approach_date": date,
            "miss_distance": { "kilometers": km },
            "relative_velocity": { "kilometers_per_hour": kph },
            "orbiting_body": "Earth",
        })
    }

    async fn fake_neo(Path(id): Path<String>) -> impl IntoResponse {
        match id.as_str() {
            "3542519" => (
                StatusCode::OK,
                Json(json!({
                    "id": "3542519",
                    "name": "(2010 PK9)",
                    "is_potentially_hazardous_asteroid": true,
                    "estimated_diameter": {
                        "kilometers": { "estimated_diameter_min": 0.12, "estimated_diameter_max": 0.27 }
                    },
                    "close_approach_data": [
                        close_approach("2200-07-01", "4000000", "50000"),
                        close_approach("1990-03-15", "800000", "40000"),
                    ],
                })),
            ),
            "2000433" => (
                StatusCode::OK,
                Json(json!({ "id": "2000433", "name": "433 Eros", "close_approach_data": [] })),
            ),
            _ => (
                StatusCode::NOT_FOUND,
                Json(json!({ "code": 404, "error": "Not Found" })),
            ),
        }
    }

    async fn fake_manifest(Path(rover): Path<String>) -> impl IntoResponse {
        if rover != "curiosity" {
            return (StatusCode::NOT_FOUND, Json(json!({ "errors": "Invalid Rover Name" })));
        }
        (
            StatusCode::OK,
            Json(json!({
                "photo_manifest": {
                    "name": "Curiosity",
                    "landing_date": "2012-08-06",
                    "max_date": "2023-12-31",
                    "total_photos": 1000,
                }
            })),
        )
    }

    async fn fake_photos(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        let photos = match (q.get("earth_date").map(String::as_str), q.get("sol")) {
            (Some("2015-05-01"), _) | (None, Some(_)) => {
                json!([{ "id": 1, "img_src": "http://mars.jpl.nasa.gov/1.jpg" }])
            }
            _ => json!([]),
        };
        Json(json!({ "photos": photos }))
    }

    async fn echo_query(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        Json(json!({ "element_count": 42, "events": [{}, {}], "query": q }))
    }

    async fn spawn_upstream() -> String {
        let app = Router::new()
            .route("/planetary/apod", get(echo_query))
            .route("/neo/rest/v1/feed", get(echo_query))
            .route("/neo/rest/v1/neo/browse", get(echo_query))
            .route("/neo/rest/v1/neo/:id", get(fake_neo))
            .route("/mars-photos/api/v1/manifests/:rover", get(fake_manifest))
            .route("/mars-photos/api/v1/rovers/:rover/photos", get(fake_photos))
            .route("/eonet/events", get(echo_query));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn app(upstream: &str) -> Router {
        let cfg = Config::for_upstream(upstream);
        let latency = Arc::new(UpstreamLatency::new());
        let client = NasaClient::new(&cfg, Arc::clone(&latency)).unwrap();
        router(ApiState {
            client: Arc::new(client),
            latency,
            health: Arc::new(HealthState::new(&cfg)),
        })
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let req = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => req
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, Method::GET, uri, None).await
    }

    // -----------------------------------------------------------------------
    // NEO
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn visualization_end_to_end() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_json(app(&upstream), "/neo/3542519/visualization").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "3542519");
        assert_eq!(body["isHazardous"], true);
        assert_eq!(body["diameter"]["min"], 0.12);
        assert_eq!(body["diameter"]["estimated"], 0.0);
        assert_eq!(body["missDistanceTrend"]["dates"], json!(["1990-03-15", "2200-07-01"]));
        assert_eq!(body["missDistanceTrend"]["distances"], json!([800000.0, 4000000.0]));
        assert_eq!(body["statistics"]["closestApproach"]["date"], "1990-03-15");
        assert_eq!(body["statistics"]["averageDistance"], 2_400_000.0);
        assert_eq!(body["statistics"]["futureApproaches"], 1);
        // 30 + 20 (800,000 km) + 25 (hazardous), default 0.1 km diameter
        assert_eq!(body["hazardAssessment"]["riskScore"], 75);
        assert_eq!(body["hazardAssessment"]["riskLevel"], "high");
        assert_eq!(body["hazardAssessment"]["nextCloseApproach"]["date"], "2200-07-01");
        assert!(body["hazardAssessment"]["nextCloseApproach"]["daysFromNow"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn visualization_without_approaches_is_500() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_json(app(&upstream), "/neo/2000433/visualization").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch processed NEO data");
        assert_eq!(body["details"], "NEO 2000433 has no close approach data");
    }

    #[tokio::test]
    async fn visualization_upstream_404_is_500() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_json(app(&upstream), "/neo/nope/visualization").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch processed NEO data");
        assert_eq!(body["details"], "neo API responded with status 404");
    }

    #[tokio::test]
    async fn neo_by_id_passes_raw_record_through() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_json(app(&upstream), "/neo/3542519").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "(2010 PK9)");
        assert_eq!(body["close_approach_data"][0]["orbiting_body"], "Earth");
    }

    #[tokio::test]
    async fn neo_feed_requires_both_dates() {
        let (status, body) = get_json(app("http://127.0.0.1:1"), "/neo/feed?start_date=2024-01-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "Both start_date and end_date are required (YYYY-MM-DD format)" })
        );
    }

    #[tokio::test]
    async fn neo_feed_rejects_bad_format() {
        let (status, body) = get_json(
            app("http://127.0.0.1:1"),
            "/neo/feed?start_date=2024-1-1&end_date=2024-01-07",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid date format. Use YYYY-MM-DD");
    }

    #[tokio::test]
    async fn neo_feed_forwards_dates_and_key() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_json(
            app(&upstream),
            "/neo/feed?start_date=2024-01-01&end_date=2024-01-07",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"]["start_date"], "2024-01-01");
        assert_eq!(body["query"]["end_date"], "2024-01-07");
        assert_eq!(body["query"]["api_key"], "DEMO_KEY");
    }

    #[tokio::test]
    async fn neo_browse_defaults() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_json(app(&upstream), "/neo/browse").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"]["page"], "0");
        assert_eq!(body["query"]["size"], "20");
        assert_eq!(body["query"]["sort"], "id");
    }

    #[tokio::test]
    async fn neo_browse_rejects_non_numeric_size() {
        let (status, body) = get_json(app("http://127.0.0.1:1"), "/neo/browse?size=lots").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "size must be a non-negative integer");
    }

    #[tokio::test]
    async fn unreachable_upstream_is_500() {
        let (status, body) = get_json(app("http://127.0.0.1:1"), "/neo/3542519").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch NEO by ID");
        assert!(body["details"].as_str().unwrap().starts_with("HTTP request error"));
    }

    // -----------------------------------------------------------------------
    // APOD / EONET / health / fallback
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn apod_forwards_date() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_json(app(&upstream), "/api/apod?date=2024-02-29").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"]["date"], "2024-02-29");
    }

    #[tokio::test]
    async fn apod_rejects_bad_date() {
        let (status, _) = get_json(app("http://127.0.0.1:1"), "/?date=yesterday").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn eonet_events_defaults_and_filters() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_json(app(&upstream), "/eonet/events?category=wildfires").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"]["limit"], "50");
        assert_eq!(body["query"]["days"], "30");
        assert_eq!(body["query"]["status"], "open");
        assert_eq!(body["query"]["category"], "wildfires");
        assert!(body["query"].get("source").is_none());
    }

    #[tokio::test]
    async fn health_reports_upstream_latency() {
        let upstream = spawn_upstream().await;
        let app = app(&upstream);
        let _ = get_json(app.clone(), "/neo/browse").await;
        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert_eq!(body["upstreamLatency"]["neo"]["samples"], 1);
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let (status, body) = get_json(app("http://127.0.0.1:1"), "/pluto").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not Found", "path": "/pluto" }));
    }

    // -----------------------------------------------------------------------
    // Mars
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn mars_requires_rover() {
        let (status, body) = get_json(app("http://127.0.0.1:1"), "/mars/photos").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Rover name is required");
    }

    #[tokio::test]
    async fn mars_without_filters_returns_manifest() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_json(app(&upstream), "/mars/photos?rover=curiosity").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["photo_manifest"]["max_date"], "2023-12-31");
    }

    #[tokio::test]
    async fn mars_date_out_of_range_includes_manifest() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_json(
            app(&upstream),
            "/mars/photos?rover=curiosity&earth_date=2010-01-01",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("before 2012-08-06"));
        assert_eq!(body["manifest"]["rover"], "Curiosity");
        assert_eq!(body["manifest"]["total_photos"], 1000);
    }

    #[tokio::test]
    async fn mars_bad_date_format() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_json(
            app(&upstream),
            "/mars/photos?rover=curiosity&earth_date=05/01/2015",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid date format"));
    }

    #[tokio::test]
    async fn mars_photos_found() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_json(
            app(&upstream),
            "/mars/photos?rover=curiosity&earth_date=2015-05-01",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["photos"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mars_no_photos_explains_why() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_json(
            app(&upstream),
            "/mars/photos?rover=curiosity&earth_date=2016-01-01&camera=NAVCAM",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["photos"], json!([]));
        assert_eq!(
            body["message"],
            "No photos found for curiosity on 2016-01-01 with camera NAVCAM."
        );
        assert_eq!(body["manifest"]["landing_date"], "2012-08-06");
    }

    #[tokio::test]
    async fn mars_unknown_rover_is_404() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_json(app(&upstream), "/mars/photos?rover=sojourner&page=2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Rover not found");
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn chat_requires_message() {
        let (status, body) = send(
            app("http://127.0.0.1:1"),
            Method::POST,
            "/api/chat",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["reply"], "Please provide a message.");
    }

    #[tokio::test]
    async fn chat_neo_intent() {
        let upstream = spawn_upstream().await;
        let (status, body) = send(
            app(&upstream),
            Method::POST,
            "/api/chat",
            Some(json!({ "message": "How many asteroids are close?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "There are 42 near-Earth objects in the current feed.");
    }

    #[tokio::test]
    async fn chat_mars_intent() {
        let upstream = spawn_upstream().await;
        let (status, body) = send(
            app(&upstream),
            Method::POST,
            "/api/chat",
            Some(json!({ "message": "curiosity rover on sol 12" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["reply"],
            "Found 1 photos from Curiosity on sol 12. Here is one: http://mars.jpl.nasa.gov/1.jpg"
        );
    }

    #[tokio::test]
    async fn chat_upstream_failure_is_500() {
        let (status, body) = send(
            app("http://127.0.0.1:1"),
            Method::POST,
            "/api/chat",
            Some(json!({ "message": "any wildfires?" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["reply"], "Sorry, there was an error processing your request.");
    }
}
