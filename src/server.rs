//! HTTP surface: upload decoding, city loading and the read-only query
//! routes over the loaded city.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, DefaultBodyLimit, Multipart, Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::decode;
use crate::directory::{self, Business, BuildingListing, Resident};
use crate::engine::{CitizenRow, CitySummary, LoadedCity};
use crate::error::{CitySearchError, Result};
use crate::index::OtherHasher;
use crate::profile::CitizenProfile;
use crate::query::ParsedQuery;
use crate::settings::Settings;
use crate::suggest::{self, Accepted, Suggestions};

const RATE_WINDOW: Duration = Duration::from_secs(60);
const TOO_MANY_UPLOADS: &str = "Too many decompression requests. Try again later.";

// ------------- Rate limiting -------------
/// Fixed one-minute windows per client address.
#[derive(Debug)]
pub struct UploadLimiter {
    per_minute: u32,
    windows: Mutex<HashMap<IpAddr, (Instant, u32), OtherHasher>>,
}

impl UploadLimiter {
    pub fn new(per_minute: u32) -> Self {
        Self {
            per_minute,
            windows: Mutex::new(HashMap::default()),
        }
    }
    /// Counts one upload from `client`, failing once the window is used up.
    pub fn check(&self, client: IpAddr) -> Result<()> {
        self.check_at(client, Instant::now())
    }
    /// Clients with an open window.
    pub fn tracked(&self) -> usize {
        self.windows.lock().map(|w| w.len()).unwrap_or(0)
    }
    fn check_at(&self, client: IpAddr, now: Instant) -> Result<()> {
        let mut windows = self
            .windows
            .lock()
            .map_err(|e| CitySearchError::Lock(e.to_string()))?;
        windows.retain(|_, (started, _)| now.duration_since(*started) < RATE_WINDOW);
        let (_, count) = windows.entry(client).or_insert((now, 0));
        if *count >= self.per_minute {
            warn!(%client, "upload rate limit hit");
            return Err(CitySearchError::RateLimited(TOO_MANY_UPLOADS.to_string()));
        }
        *count += 1;
        Ok(())
    }
}

// ------------- State -------------
pub struct AppState {
    settings: Settings,
    city: RwLock<Option<Arc<LoadedCity>>>,
    limiter: UploadLimiter,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let limiter = UploadLimiter::new(settings.uploads.per_minute);
        Self {
            settings,
            city: RwLock::new(None),
            limiter,
        }
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    pub fn limiter(&self) -> &UploadLimiter {
        &self.limiter
    }
    /// The loaded city, or [`CitySearchError::NoCityLoaded`].
    pub fn city(&self) -> Result<Arc<LoadedCity>> {
        self.city
            .read()
            .map_err(|e| CitySearchError::Lock(e.to_string()))?
            .clone()
            .ok_or(CitySearchError::NoCityLoaded)
    }
    /// Replaces the loaded city. Searches already running keep the old one.
    pub fn install(&self, city: LoadedCity) -> Result<Arc<LoadedCity>> {
        let city = Arc::new(city);
        *self
            .city
            .write()
            .map_err(|e| CitySearchError::Lock(e.to_string()))? = Some(Arc::clone(&city));
        city.log_loaded();
        Ok(city)
    }
    /// Decodes and indexes an uploaded city file, then makes it current.
    pub async fn load_upload(&self, file_name: String, bytes: Vec<u8>) -> Result<CitySummary> {
        let cap = self.settings.search.result_cap;
        let cache_capacity = self.settings.search.cache_capacity;
        // decoding and indexing are synchronous and can take a while
        let loaded = tokio::task::spawn_blocking(move || -> Result<LoadedCity> {
            let value = decode::decode_file(&bytes, &file_name)?;
            let fingerprint = decode::fingerprint(&bytes);
            Ok(LoadedCity::from_value(value, fingerprint).with_limits(cap, cache_capacity))
        })
        .await
        .map_err(|e| {
            warn!(error = %e, "Join error");
            CitySearchError::Io(e.to_string())
        })??;
        Ok(self.install(loaded)?.summary())
    }
}

// ------------- Errors -------------
#[derive(Debug)]
pub struct ApiError(CitySearchError);

impl From<CitySearchError> for ApiError {
    fn from(e: CitySearchError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            CitySearchError::Decode { .. } => StatusCode::BAD_REQUEST,
            CitySearchError::NotFound(_) | CitySearchError::NoCityLoaded => StatusCode::NOT_FOUND,
            CitySearchError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    pub fn error(&self) -> &CitySearchError {
        &self.0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.0.to_string();
        warn!(%msg, code = %status.as_u16(), "request failed");
        (status, Json(json!({ "status": "error", "error": msg }))).into_response()
    }
}

// ------------- Bodies -------------
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecompressResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DecompressResponse {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(flatten)]
    pub query: ParsedQuery,
    pub rows: Vec<CitizenRow>,
    pub matched: u64,
    pub limited: bool,
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct AcceptRequest {
    #[serde(default)]
    pub input: String,
    pub candidate: String,
}

#[derive(Debug, Serialize)]
pub struct BuildingResponse {
    pub name: String,
    pub residents: Vec<Resident>,
    pub businesses: Vec<Business>,
}

// ------------- Handlers -------------
/// Legacy upload contract: always 200, success flag in the body.
pub async fn decompress(
    State(state): State<Arc<AppState>>,
    ConnectInfo(client): ConnectInfo<SocketAddr>,
    multipart: Multipart,
) -> Response {
    if let Err(e) = state.limiter.check(client.ip()) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(DecompressResponse::failed(e.to_string())),
        )
            .into_response();
    }
    let Some((file_name, bytes)) = read_file(multipart).await else {
        return Json(DecompressResponse::failed("No file uploaded")).into_response();
    };
    Json(decompress_bytes(file_name, bytes).await).into_response()
}

pub async fn decompress_bytes(file_name: String, bytes: Vec<u8>) -> DecompressResponse {
    let decoded =
        tokio::task::spawn_blocking(move || decode::decode_file(&bytes, &file_name)).await;
    match decoded {
        Ok(Ok(data)) => DecompressResponse {
            success: true,
            data: Some(data),
            error: None,
        },
        Ok(Err(CitySearchError::Decode { reason })) => DecompressResponse::failed(reason),
        Ok(Err(e)) => DecompressResponse::failed(e.to_string()),
        Err(e) => {
            warn!(error = %e, "Join error");
            DecompressResponse::failed(e.to_string())
        }
    }
}

pub async fn load_city(
    State(state): State<Arc<AppState>>,
    ConnectInfo(client): ConnectInfo<SocketAddr>,
    multipart: Multipart,
) -> std::result::Result<Json<CitySummary>, ApiError> {
    state.limiter.check(client.ip())?;
    let (file_name, bytes) = read_file(multipart)
        .await
        .ok_or_else(|| CitySearchError::decode("No file uploaded"))?;
    Ok(Json(state.load_upload(file_name, bytes).await?))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> std::result::Result<Json<SearchResponse>, ApiError> {
    let started = Instant::now();
    let city = state.city()?;
    let searched = Arc::clone(&city);
    let results = tokio::task::spawn_blocking(move || searched.search(&req.query))
        .await
        .map_err(|e| {
            warn!(error = %e, "Join error");
            CitySearchError::Io(e.to_string())
        })??;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    info!(ms = elapsed_ms, rows = results.len(), limited = results.limited(), "search complete");
    Ok(Json(SearchResponse {
        query: results.query().clone(),
        rows: results.rows(city.index()),
        matched: results.matched(),
        limited: results.limited(),
    }))
}

pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SuggestRequest>,
) -> std::result::Result<Json<Suggestions>, ApiError> {
    let city = state.city()?;
    Ok(Json(suggest::suggest(&req.input, city.index().schema())))
}

pub async fn accept(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AcceptRequest>,
) -> std::result::Result<Json<Accepted>, ApiError> {
    let city = state.city()?;
    Ok(Json(suggest::accept(
        &req.input,
        &req.candidate,
        city.index().schema(),
    )))
}

pub async fn buildings(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Vec<BuildingListing>>, ApiError> {
    let city = state.city()?;
    Ok(Json(directory::buildings(city.index())))
}

pub async fn building(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> std::result::Result<Json<BuildingResponse>, ApiError> {
    let city = state.city()?;
    let residents = directory::residents(city.index(), &name);
    let businesses = directory::businesses(city.index(), &name);
    if residents.is_empty() && businesses.is_empty() {
        return Err(CitySearchError::NotFound(format!("building '{name}'")).into());
    }
    Ok(Json(BuildingResponse {
        name,
        residents,
        businesses,
    }))
}

pub async fn citizen(
    State(state): State<Arc<AppState>>,
    Path(human_id): Path<i64>,
) -> std::result::Result<Json<CitizenProfile>, ApiError> {
    let city = state.city()?;
    let index = city.index();
    let citizen = index
        .citizen_by_id(human_id)
        .ok_or_else(|| CitySearchError::NotFound(format!("citizen {human_id}")))?;
    Ok(Json(CitizenProfile::build(citizen, index)))
}

async fn read_file(mut multipart: Multipart) -> Option<(String, Vec<u8>)> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "unreadable multipart body");
                return None;
            }
        };
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        return match field.bytes().await {
            Ok(bytes) => Some((file_name, bytes.to_vec())),
            Err(e) => {
                warn!(error = %e, "upload interrupted");
                None
            }
        };
    }
}

// ------------- Router -------------
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);
    let max_bytes = state.settings.uploads.max_bytes;
    Router::new()
        .route("/decompress", post(decompress))
        .route("/v1/city", post(load_city))
        .route("/v1/search", post(search))
        .route("/v1/suggest", post(suggest))
        .route("/v1/suggest/accept", post(accept))
        .route("/v1/buildings", get(buildings))
        .route("/v1/buildings/:name", get(building))
        .route("/v1/citizens/:id", get(citizen))
        .layer(DefaultBodyLimit::max(max_bytes))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(settings: Settings) -> Result<()> {
    let address = settings.bind_address();
    let state = Arc::new(AppState::new(settings));
    let app = router(state);
    let listener = TcpListener::bind(&address).await?;
    info!(%address, "citysearch listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_opens_a_new_window_after_a_minute() {
        let limiter = UploadLimiter::new(2);
        let client: IpAddr = [127, 0, 0, 1].into();
        let start = Instant::now();
        assert!(limiter.check_at(client, start).is_ok());
        assert!(limiter.check_at(client, start).is_ok());
        assert!(matches!(
            limiter.check_at(client, start + Duration::from_secs(30)),
            Err(CitySearchError::RateLimited(_))
        ));
        assert!(limiter.check_at(client, start + RATE_WINDOW).is_ok());
    }

    #[test]
    fn limiter_counts_clients_separately() {
        let limiter = UploadLimiter::new(1);
        let start = Instant::now();
        assert!(limiter.check_at([10, 0, 0, 1].into(), start).is_ok());
        assert!(limiter.check_at([10, 0, 0, 2].into(), start).is_ok());
        assert!(limiter.check_at([10, 0, 0, 1].into(), start).is_err());
    }

    #[test]
    fn limiter_forgets_expired_clients() {
        let limiter = UploadLimiter::new(3);
        let start = Instant::now();
        for last in 1..=20u8 {
            assert!(limiter.check_at([10, 0, 0, last].into(), start).is_ok());
        }
        assert_eq!(limiter.tracked(), 20);
        let later = start + RATE_WINDOW;
        assert!(limiter.check_at([10, 0, 1, 1].into(), later).is_ok());
        assert_eq!(limiter.tracked(), 1, "windows older than a minute are dropped");
    }
}
