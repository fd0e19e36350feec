use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use service::pagination::parse_leading_int;
use service::{Collection, Record};

use crate::errors::ApiError;
use crate::state::ServerState;

/// First `limit` value in the query string, parsed leniently: `?limit=3abc`
/// is 3, `?limit=abc` is no limit, and `?limit=2&limit=3` is 2.
pub fn limit_from_query(pairs: &[(String, String)]) -> Option<i64> {
    pairs
        .iter()
        .find(|(key, _)| key == "limit")
        .and_then(|(_, value)| parse_leading_int(value))
}

/// List products, optionally only the first `limit`.
pub async fn list_products(
    State(state): State<ServerState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Collection>, ApiError> {
    let limit = limit_from_query(&pairs);
    let products = state.catalog.list(limit).await?;
    Ok(Json(products))
}

/// Fetch one product. Unknown and non-numeric ids are both a bodiless 404.
pub async fn get_product(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let Some(id) = parse_leading_int(&raw_id) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let found: Option<Record> = state.catalog.get_by_id(id).await?;
    Ok(match found {
        Some(product) => Json(product).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}
