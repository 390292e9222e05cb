//! CRUD endpoints shared by `/contacts` and `/cars`.
//!
//! Handlers are generic over the resource kind and only translate between
//! HTTP and the [`ResourceService`]; ownership rules live in the service.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    routing::get,
};
use std::sync::Arc;

use super::validation::JsonBody;
use super::{ApiError, AppState, Projection};
use crate::domain::{Identity, ResourceId};
use crate::models::{Car, Contact};
use crate::services::ResourceService;

/// A resource kind that is exposed over HTTP.
pub trait ResourceEndpoint: Projection {
    fn service(state: &AppState) -> &Arc<dyn ResourceService<Self>>;
}

impl ResourceEndpoint for Contact {
    fn service(state: &AppState) -> &Arc<dyn ResourceService<Self>> {
        &state.contacts
    }
}

impl ResourceEndpoint for Car {
    fn service(state: &AppState) -> &Arc<dyn ResourceService<Self>> {
        &state.cars
    }
}

/// Routes for one resource kind mounted at `base` (e.g. `/contacts`).
///
/// Updates answer to both `POST` and `PUT` on the item path.
pub fn routes<R: ResourceEndpoint>(base: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(base, get(list::<R>).post(create::<R>))
        .route(
            &format!("{base}/{{id}}"),
            get(get_one::<R>)
                .post(update::<R>)
                .put(update::<R>)
                .delete(remove::<R>),
        )
}

pub async fn create<R: ResourceEndpoint>(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    JsonBody(fields): JsonBody<R::Fields>,
) -> Result<Json<R::Dto>, ApiError> {
    let record = R::service(&state).create(fields, &identity).await?;
    Ok(Json(R::Dto::from(record)))
}

pub async fn list<R: ResourceEndpoint>(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<R::Dto>>, ApiError> {
    let records = R::service(&state).list_mine(&identity).await?;
    Ok(Json(records.into_iter().map(R::Dto::from).collect()))
}

pub async fn get_one<R: ResourceEndpoint>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<R::Dto>, ApiError> {
    let record = R::service(&state).get(&ResourceId::new(id)).await?;
    Ok(Json(R::Dto::from(record)))
}

pub async fn update<R: ResourceEndpoint>(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    JsonBody(fields): JsonBody<R::Fields>,
) -> Result<Json<R::Dto>, ApiError> {
    let record = R::service(&state)
        .update(&ResourceId::new(id), fields, &identity)
        .await?;
    Ok(Json(R::Dto::from(record)))
}

pub async fn remove<R: ResourceEndpoint>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<R::Dto>, ApiError> {
    let record = R::service(&state).delete(&ResourceId::new(id)).await?;
    Ok(Json(R::Dto::from(record)))
}
