//! Person endpoints under `/api/users`

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::extractors::ValidPerson;
use crate::http::server::AppState;
use crate::models::Person;

const RESOURCE: &str = "person";

fn not_found(id: String) -> ApiError {
    ApiError::NotFound {
        resource: RESOURCE,
        id,
    }
}

/// GET /api/users - list everyone
async fn list_persons(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Person>>, ApiError> {
    let people = state.store.list().await?;
    Ok(Json(people))
}

/// POST /api/users - create with a server-generated id
async fn create_person(
    State(state): State<Arc<AppState>>,
    ValidPerson(fields): ValidPerson,
) -> Result<Response, ApiError> {
    let person = state.store.create(fields).await?;
    let location = format!("/api/users/{}", person.id);
    tracing::info!(id = %person.id, "person created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(person),
    )
        .into_response())
}

/// GET /api/users/{id}
async fn get_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let person = state.store.get(&id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(person))
}

/// PUT /api/users/{id} - overwrite name and age, never insert
async fn update_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidPerson(fields): ValidPerson,
) -> Result<Json<Person>, ApiError> {
    let person = state
        .store
        .update(&id, fields)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id = %person.id, "person updated");
    Ok(Json(person))
}

/// DELETE /api/users/{id} - responds with the deleted row
async fn delete_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let person = state
        .store
        .delete(&id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id = %person.id, "person deleted");
    Ok(Json(person))
}

/// Person routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_persons).post(create_person))
        .route(
            "/api/users/{id}",
            get(get_person).put(update_person).delete(delete_person),
        )
}
