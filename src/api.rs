//! HTTP routes. `src/bin/server.rs` wraps `router` with CORS, static files
//! and a listener.

use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::GardenConfig;
use crate::error::{GardenError, Result};
use crate::garden::{Garden, Planted};
use crate::model::{Flower, FlowerDraft, JournalEntry};
use crate::placement::{Placement, Point2, Region, Sampler};
use crate::questionnaire::{QUESTIONS, Question};
use crate::rng::Rng;
use crate::scatter::{self, Coin, Decoration};
use crate::store::{MemStore, Repository, Store, WalletStore};
use crate::wallet::{Feature, Wallet};

pub struct AppState {
    pub garden: Garden<Box<dyn Store>>,
    pub wallet: Mutex<Wallet>,
}

impl AppState {
    /// State backed by process memory only.
    pub fn new(config: GardenConfig, rng: Rng) -> Self {
        let store: Box<dyn Store> = Box::new(MemStore::new());
        Self {
            garden: Garden::new(store, config, rng),
            wallet: Mutex::new(Wallet::new()),
        }
    }

    /// State backed by `store`, starting from the wallet it holds.
    pub fn with_store(
        store: impl Store + 'static,
        config: GardenConfig,
        rng: Rng,
    ) -> Result<Self> {
        let wallet = store.load_wallet()?;
        let store: Box<dyn Store> = Box::new(store);
        Ok(Self {
            garden: Garden::new(store, config, rng),
            wallet: Mutex::new(wallet),
        })
    }

    pub fn wallet(&self) -> Wallet {
        self.wallet.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Apply `f` to a copy of the wallet and keep the copy only if `f`
    /// succeeds and, when it changed anything, the store accepted it.
    pub fn update_wallet<T>(&self, f: impl FnOnce(&mut Wallet) -> Result<T>) -> Result<T> {
        let mut current = self.wallet.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = current.clone();
        let out = f(&mut next)?;
        if next != *current {
            self.garden.repo().save_wallet(&next)?;
            *current = next;
        }
        Ok(out)
    }
}

pub type SharedState = Arc<AppState>;

/// `{"message": ...}` with a status derived from the error kind.
pub struct ApiError(GardenError);

impl From<GardenError> for ApiError {
    fn from(err: GardenError) -> Self {
        ApiError(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            GardenError::NotFound { .. } => StatusCode::NOT_FOUND,
            GardenError::InsufficientCoins { .. } => StatusCode::PAYMENT_REQUIRED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        let body = ErrorBody {
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Run store access and sampling on the blocking pool so the async workers
/// stay free while the garden lock is held.
async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let out = tokio::task::spawn_blocking(f)
        .await
        .map_err(GardenError::from)?;
    Ok(out?)
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/questions", get(questions))
        .route(
            "/api/journal/entries",
            get(list_entries).post(create_entry),
        )
        .route("/api/journal/entries/{id}", get(get_entry))
        .route("/api/flowers", get(list_flowers).post(create_flower))
        .route("/api/flowers/plant", post(plant_flower))
        .route("/api/flowers/demo", post(seed_demo))
        .route("/api/flowers/{id}", get(get_flower))
        .route("/api/place", post(place))
        .route("/api/scatter", get(scatter_handler))
        .route("/api/wallet", get(wallet))
        .route("/api/wallet/collect", post(collect_coin))
        .route("/api/wallet/unlock", post(unlock))
        .route("/api/wallet/select", post(select))
        .route("/api/wallet/reset", post(reset_wallet))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn questions() -> Json<&'static [Question]> {
    Json(&QUESTIONS[..])
}

async fn list_entries(State(state): State<SharedState>) -> ApiResult<Json<Vec<JournalEntry>>> {
    let entries = blocking(move || state.garden.repo().journal_entries()).await?;
    Ok(Json(entries))
}

async fn create_entry(
    State(state): State<SharedState>,
    Json(entry): Json<JournalEntry>,
) -> ApiResult<(StatusCode, Json<JournalEntry>)> {
    let saved = blocking(move || state.garden.add_entry(entry)).await?;
    info!(id = %saved.id, "saved journal entry");
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn get_entry(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<JournalEntry>> {
    Ok(Json(blocking(move || state.garden.entry(&id)).await?))
}

async fn list_flowers(State(state): State<SharedState>) -> ApiResult<Json<Vec<Flower>>> {
    Ok(Json(blocking(move || state.garden.repo().flowers()).await?))
}

async fn create_flower(
    State(state): State<SharedState>,
    Json(flower): Json<Flower>,
) -> ApiResult<(StatusCode, Json<Flower>)> {
    let saved = blocking(move || state.garden.add_flower(flower)).await?;
    info!(id = %saved.id, "saved flower");
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn get_flower(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Flower>> {
    Ok(Json(blocking(move || state.garden.flower(&id)).await?))
}

async fn plant_flower(
    State(state): State<SharedState>,
    Json(draft): Json<FlowerDraft>,
) -> ApiResult<(StatusCode, Json<Planted>)> {
    let planted = blocking(move || state.garden.plant(draft)).await?;
    Ok((StatusCode::CREATED, Json(planted)))
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct DemoRequest {
    count: Option<usize>,
}

async fn seed_demo(
    State(state): State<SharedState>,
    Json(req): Json<DemoRequest>,
) -> ApiResult<(StatusCode, Json<Vec<Planted>>)> {
    let count = req.count.unwrap_or(50);
    let planted = blocking(move || state.garden.seed_demo(count)).await?;
    Ok((StatusCode::CREATED, Json(planted)))
}

/// Ad-hoc placement query. Unset fields take the garden's configuration;
/// `existing` defaults to the flowers currently stored.
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct PlaceRequest {
    garden_radius: Option<f64>,
    min_separation: Option<f64>,
    max_attempts: Option<usize>,
    fallback_inset: Option<f64>,
    /// When set, sample the ring `[inner_radius, garden_radius]` instead of
    /// the full disk.
    inner_radius: Option<f64>,
    existing: Option<Vec<Point2>>,
}

async fn place(
    State(state): State<SharedState>,
    Json(req): Json<PlaceRequest>,
) -> ApiResult<Json<Placement>> {
    let defaults = state.garden.config();
    let radius = req.garden_radius.unwrap_or(defaults.garden_radius);
    let region = match req.inner_radius {
        Some(inner) => Region::Annulus {
            inner,
            outer: radius,
        },
        None => Region::Disk { radius },
    };
    let sampler = Sampler {
        region,
        min_separation: Some(req.min_separation.unwrap_or(defaults.min_separation)),
        max_attempts: req.max_attempts.unwrap_or(defaults.max_attempts),
        fallback_inset: req.fallback_inset.unwrap_or(defaults.fallback_inset),
    };
    sampler.validate()?;

    let placement = blocking(move || match req.existing {
        Some(existing) => Ok(state.garden.with_rng(|rng| sampler.place(&existing, rng))),
        None => state.garden.propose(&sampler),
    })
    .await?;
    Ok(Json(placement))
}

#[derive(Deserialize)]
struct ScatterQuery {
    seed: Option<u64>,
}

#[derive(Serialize)]
struct ScatterResponse {
    coins: Vec<Coin>,
    decorations: Vec<Decoration>,
}

async fn scatter_handler(
    State(state): State<SharedState>,
    Query(q): Query<ScatterQuery>,
) -> Json<ScatterResponse> {
    let config = state.garden.config();
    let build = |rng: &mut Rng| ScatterResponse {
        coins: scatter::coins(config, rng),
        decorations: scatter::decorations(config, rng),
    };
    let response = match q.seed {
        Some(seed) => build(&mut Rng::new(seed)),
        None => state.garden.with_rng(build),
    };
    Json(response)
}

async fn wallet(State(state): State<SharedState>) -> Json<Wallet> {
    Json(state.wallet())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectRequest {
    coin_id: String,
}

#[derive(Serialize)]
struct WalletChange {
    changed: bool,
    wallet: Wallet,
}

async fn collect_coin(
    State(state): State<SharedState>,
    Json(req): Json<CollectRequest>,
) -> ApiResult<Json<WalletChange>> {
    let change = blocking(move || {
        state.update_wallet(|w| {
            Ok(WalletChange {
                changed: w.collect(&req.coin_id),
                wallet: w.clone(),
            })
        })
    })
    .await?;
    Ok(Json(change))
}

async fn unlock(
    State(state): State<SharedState>,
    Json(feature): Json<Feature>,
) -> ApiResult<Json<Wallet>> {
    let wallet =
        blocking(move || state.update_wallet(|w| w.unlock(feature).map(|()| w.clone()))).await?;
    info!(?feature, coins = wallet.coins, "unlocked feature");
    Ok(Json(wallet))
}

async fn select(
    State(state): State<SharedState>,
    Json(feature): Json<Feature>,
) -> ApiResult<Json<WalletChange>> {
    let change = blocking(move || {
        state.update_wallet(|w| {
            Ok(WalletChange {
                changed: w.select(feature),
                wallet: w.clone(),
            })
        })
    })
    .await?;
    Ok(Json(change))
}

async fn reset_wallet(State(state): State<SharedState>) -> ApiResult<Json<Wallet>> {
    let wallet = blocking(move || {
        state.update_wallet(|w| {
            w.reset();
            Ok(w.clone())
        })
    })
    .await?;
    info!("wallet reset");
    Ok(Json(wallet))
}
