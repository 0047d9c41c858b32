//! `/addresses` routes: request/response schemas and handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use domain::service::AddressService;
use domain::{Address, AddressId, AddressPatch, CoreError, NewAddress};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::repo::AnyRepo;
use crate::AppState;

#[derive(Deserialize)]
struct CreateAddressReq {
    name: String,
    latitude: f64,
    longitude: f64,
}

impl From<CreateAddressReq> for NewAddress {
    fn from(req: CreateAddressReq) -> Self {
        NewAddress {
            name: req.name,
            latitude: req.latitude,
            longitude: req.longitude,
        }
    }
}

/// Every field is optional; absent and `null` both mean "leave unchanged".
#[derive(Deserialize)]
struct UpdateAddressReq {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

impl From<UpdateAddressReq> for AddressPatch {
    fn from(req: UpdateAddressReq) -> Self {
        AddressPatch {
            name: req.name,
            latitude: req.latitude,
            longitude: req.longitude,
        }
    }
}

#[derive(Serialize)]
struct AddressOut {
    id: i64,
    name: String,
    latitude: f64,
    longitude: f64,
}

impl From<Address> for AddressOut {
    fn from(a: Address) -> Self {
        AddressOut {
            id: a.id.get(),
            name: a.name,
            latitude: a.latitude,
            longitude: a.longitude,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addresses/", get(list_addresses).post(create_address))
        .route("/addresses", get(list_addresses).post(create_address))
        .route(
            "/addresses/:id",
            get(get_address).put(update_address).delete(delete_address),
        )
}

/// Run a store call on the blocking pool so SQLite waits never stall an async worker.
async fn run_blocking<T, F>(state: &AppState, f: F) -> Result<T, CoreError>
where
    T: Send + 'static,
    F: FnOnce(&AddressService<AnyRepo>) -> Result<T, CoreError> + Send + 'static,
{
    let addresses = state.addresses.clone();
    tokio::task::spawn_blocking(move || f(&addresses))
        .await
        .map_err(|e| CoreError::Repository(format!("store task failed: {e}")))?
}

// Warn on absence so lookups of stale ids show up in the log.
fn lookup_failed(id: AddressId, err: CoreError) -> ApiError {
    if matches!(err, CoreError::NotFound) {
        warn!(%id, "address not found");
    }
    err.into()
}

async fn create_address(
    State(state): State<AppState>,
    payload: Result<Json<CreateAddressReq>, JsonRejection>,
) -> Result<Json<AddressOut>, ApiError> {
    let Json(body) = payload?;
    info!(name = %body.name, "creating address");
    let input = NewAddress::from(body);
    let created = run_blocking(&state, move |svc| svc.create(input)).await?;
    info!(id = %created.id, "address created");
    Ok(Json(created.into()))
}

async fn list_addresses(State(state): State<AppState>) -> Result<Json<Vec<AddressOut>>, ApiError> {
    info!("fetching all addresses");
    let items = run_blocking(&state, |svc| svc.list()).await?;
    Ok(Json(items.into_iter().map(AddressOut::from).collect()))
}

async fn get_address(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<AddressOut>, ApiError> {
    let id = AddressId::parse(&raw_id)?;
    info!(%id, "fetching address");
    let address = run_blocking(&state, move |svc| svc.get(id))
        .await
        .map_err(|e| lookup_failed(id, e))?;
    Ok(Json(address.into()))
}

async fn update_address(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateAddressReq>, JsonRejection>,
) -> Result<Json<AddressOut>, ApiError> {
    let id = AddressId::parse(&raw_id)?;
    let Json(body) = payload?;
    info!(%id, "updating address");
    let patch = AddressPatch::from(body);
    let updated = run_blocking(&state, move |svc| svc.update(id, &patch))
        .await
        .map_err(|e| lookup_failed(id, e))?;
    info!(%id, "address updated");
    Ok(Json(updated.into()))
}

async fn delete_address(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = AddressId::parse(&raw_id)?;
    info!(%id, "deleting address");
    run_blocking(&state, move |svc| svc.delete(id))
        .await
        .map_err(|e| lookup_failed(id, e))?;
    info!(%id, "address deleted");
    Ok(Json(http_common::json_message(http_common::ADDRESS_DELETED)))
}
