use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::{
    error::{ModelError, StoreError},
    florist::{Flower, Invoice, JsonRepository, LoyaltyCard, Tier},
};

#[derive(Clone)]
struct AppState {
    repo: JsonRepository,
}

pub struct WebServerConfig {
    pub repo: JsonRepository,
    pub host: String,
    pub port: u16,
}

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_invalid_argument() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => {
                error!(%msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct NewFlower {
    species: String,
    cut_date: NaiveDate,
    quality: String,
    price: f64,
}

#[derive(Debug, Deserialize)]
struct NewInvoice {
    client: String,
    sale_date: NaiveDate,
    bouquet_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PriceRange {
    min_price: f64,
    max_price: f64,
}

#[derive(Debug, Deserialize)]
struct CutDate {
    #[serde(rename = "d")]
    date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct ClientFilter {
    client: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoyaltySummary {
    client: String,
    tier: Tier,
    total_spent: f64,
    invoice_count: usize,
}

pub fn router(repo: JsonRepository) -> Router {
    let state = Arc::new(AppState { repo });
    Router::new()
        .route("/health", get(health))
        .route("/flowers", get(list_flowers).post(create_flower))
        .route("/flowers/search/price", get(search_flowers_price))
        .route("/flowers/search/cut-date", get(search_flowers_cut_date))
        .route("/flowers/:id", get(get_flower).delete(delete_flower))
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/:id", get(get_invoice).delete(delete_invoice))
        .route("/clients/:client/loyalty", get(loyalty))
        .with_state(state)
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig { repo, host, port } = config;
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    info!(
        %addr,
        flowers = %repo.flowers_path().display(),
        invoices = %repo.invoices_path().display(),
        "florist API listening"
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(repo))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down florist API");
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_flowers(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Flower>>> {
    Ok(Json(state.repo.list_flowers()?))
}

async fn create_flower(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewFlower>,
) -> ApiResult<(StatusCode, Json<Flower>)> {
    let flower = Flower::new(
        payload.species,
        payload.cut_date,
        payload.quality,
        payload.price,
    )?;
    let stored = state.repo.add_flower(flower)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn get_flower(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Flower>> {
    state
        .repo
        .get_flower(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("flower {id} not found")))
}

async fn delete_flower(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.repo.delete_flower(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn search_flowers_price(
    State(state): State<Arc<AppState>>,
    Query(range): Query<PriceRange>,
) -> ApiResult<Json<Vec<Flower>>> {
    if !range.min_price.is_finite() || !range.max_price.is_finite() {
        return Err(ApiError::BadRequest(
            "min_price and max_price must be finite numbers".to_string(),
        ));
    }
    if range.min_price < 0.0 || range.max_price < 0.0 {
        return Err(ApiError::BadRequest(
            "min_price and max_price must be >= 0".to_string(),
        ));
    }
    Ok(Json(
        state
            .repo
            .search_flowers_price_between(range.min_price, range.max_price)?,
    ))
}

async fn search_flowers_cut_date(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CutDate>,
) -> ApiResult<Json<Vec<Flower>>> {
    Ok(Json(state.repo.search_flowers_by_cut_date(query.date)?))
}

async fn list_invoices(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ClientFilter>,
) -> ApiResult<Json<Vec<Invoice>>> {
    let invoices = match filter.client.as_deref().filter(|c| !c.is_empty()) {
        Some(client) => state.repo.invoices_by_client(client)?,
        None => state.repo.list_invoices()?,
    };
    Ok(Json(invoices))
}

async fn create_invoice(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewInvoice>,
) -> ApiResult<(StatusCode, Json<Invoice>)> {
    let mut bouquet = Vec::with_capacity(payload.bouquet_ids.len());
    for id in &payload.bouquet_ids {
        match state.repo.get_flower(id)? {
            Some(flower) => bouquet.push(flower),
            None => {
                warn!(flower = %id, "invoice references unknown flower");
                return Err(ApiError::BadRequest(format!(
                    "unknown flower id {id} in bouquet"
                )));
            }
        }
    }
    let invoice = Invoice::new(payload.client, payload.sale_date, bouquet)?;
    let stored = state.repo.add_invoice(invoice)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    state
        .repo
        .get_invoice(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("invoice {id} not found")))
}

async fn delete_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.repo.delete_invoice(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn loyalty(
    State(state): State<Arc<AppState>>,
    Path(client): Path<String>,
) -> ApiResult<Json<LoyaltySummary>> {
    let invoices = state.repo.invoices_by_client(&client)?;
    let card = LoyaltyCard::new(client, invoices)?;
    Ok(Json(LoyaltySummary {
        client: card.client().to_string(),
        tier: card.tier(),
        total_spent: card.total_spent(),
        invoice_count: card.invoices().len(),
    }))
}
