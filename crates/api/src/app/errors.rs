use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use partstock_catalog::CatalogError;
use partstock_core::{DomainError, RepositoryError};
use partstock_inventory::InventoryError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn not_found(what: &str) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Unauthorized => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
    }
}

pub fn repository_error_to_response(err: RepositoryError) -> axum::response::Response {
    match err {
        RepositoryError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        RepositoryError::Duplicate(msg) => json_error(StatusCode::CONFLICT, "duplicate", msg),
        RepositoryError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        RepositoryError::Unavailable(msg) => {
            tracing::error!(error = %msg, "storage unavailable");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable", msg)
        }
    }
}

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match err {
        CatalogError::Domain(e) => domain_error_to_response(e),
        CatalogError::Repository(e) => repository_error_to_response(e),
    }
}

pub fn inventory_error_to_response(err: InventoryError) -> axum::response::Response {
    match err {
        e @ InventoryError::InsufficientInventory { .. } => {
            json_error(StatusCode::CONFLICT, "insufficient_inventory", e.to_string())
        }
        InventoryError::RecordNotFound => not_found("inventory record"),
        e @ (InventoryError::UnknownPart(_) | InventoryError::UnknownStore(_)) => {
            json_error(StatusCode::NOT_FOUND, "not_found", e.to_string())
        }
        InventoryError::Domain(e) => domain_error_to_response(e),
        InventoryError::Repository(e) => repository_error_to_response(e),
    }
}

/// Parse a path/query id, mapping failures to 400.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: core::str::FromStr<Err = DomainError>,
{
    raw.parse::<T>().map_err(domain_error_to_response)
}
