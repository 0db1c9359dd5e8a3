use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use customer::{Customer, CustomerPayload};
use std::sync::Arc;

// Extractors are taken as `Result` so rejections render through
// `ServerError` as `{"error": ...}` rather than axum's plain-text bodies.
type CustomerId = Result<Path<i64>, PathRejection>;
type Body = Result<Json<CustomerPayload>, JsonRejection>;

/// Location of a single customer resource.
pub fn customer_location(id: i64) -> String {
    format!("/customers/{id}")
}

/// `GET /customers`
pub async fn list_customers(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<Json<Vec<Customer>>> {
    Ok(Json(state.customers.list().await?))
}

/// `GET /customers/{id}`
pub async fn get_customer(
    State(state): State<Arc<ServerState>>,
    id: CustomerId,
) -> ServerResult<Json<Customer>> {
    let Path(id) = id?;
    Ok(Json(state.customers.get(id).await?))
}

/// `POST /customers`
///
/// Responds `201 Created` with the stored customer and a `Location` header.
pub async fn create_customer(
    State(state): State<Arc<ServerState>>,
    body: Body,
) -> ServerResult<impl IntoResponse> {
    let Json(payload) = body?;
    let created = state.customers.create(&payload).await?;
    let location = customer_location(created.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// `PUT /customers/{id}`
pub async fn replace_customer(
    State(state): State<Arc<ServerState>>,
    id: CustomerId,
    body: Body,
) -> ServerResult<Json<Customer>> {
    let Path(id) = id?;
    let Json(payload) = body?;
    Ok(Json(state.customers.update(id, &payload).await?))
}

/// `PATCH /customers/{id}`
///
/// Same contract as `PUT`: every field is required and replaced.
pub async fn patch_customer(
    State(state): State<Arc<ServerState>>,
    id: CustomerId,
    body: Body,
) -> ServerResult<Json<Customer>> {
    let Path(id) = id?;
    let Json(payload) = body?;
    Ok(Json(state.customers.partial_update(id, &payload).await?))
}

/// `DELETE /customers/{id}`
pub async fn delete_customer(
    State(state): State<Arc<ServerState>>,
    id: CustomerId,
) -> ServerResult<StatusCode> {
    let Path(id) = id?;
    state.customers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
