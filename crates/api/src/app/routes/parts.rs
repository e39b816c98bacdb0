use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use partstock_auth::Permission;
use partstock_catalog::{NewPart, PartCategory, PartUpdate};
use partstock_core::PartId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_parts).post(create_part))
        .route("/search", get(search_parts))
        .route("/sku/:sku", get(get_part_by_sku))
        .route("/category/:category", get(list_parts_by_category))
        .route("/:id", get(get_part).put(update_part).delete(delete_part))
}

pub async fn list_parts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::CATALOG_READ) {
        return res;
    }
    match services.parts.list() {
        Ok(parts) => Json(parts).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn get_part(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::CATALOG_READ) {
        return res;
    }
    let id = match errors::parse_id::<PartId>(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.parts.get(id) {
        Ok(Some(part)) if !part.deleted => Json(part).into_response(),
        Ok(_) => errors::not_found("part"),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn get_part_by_sku(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(sku): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::CATALOG_READ) {
        return res;
    }
    match services.parts.by_sku(&sku) {
        Ok(Some(part)) if !part.deleted => Json(part).into_response(),
        Ok(_) => errors::not_found("part"),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn list_parts_by_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(category): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::CATALOG_READ) {
        return res;
    }
    let category = match category.parse::<PartCategory>() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.parts.by_category(category) {
        Ok(parts) => Json(parts).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn search_parts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::NameSearchQuery>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::CATALOG_READ) {
        return res;
    }
    match services.parts.search_by_name(&query.name) {
        Ok(parts) => Json(parts).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_part(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<NewPart>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::CATALOG_WRITE) {
        return res;
    }
    match services.parts.create(body) {
        Ok(part) => (StatusCode::CREATED, Json(part)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn update_part(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<PartUpdate>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::CATALOG_WRITE) {
        return res;
    }
    let id = match errors::parse_id::<PartId>(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.parts.update(id, body) {
        Ok(part) => Json(part).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn delete_part(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::CATALOG_WRITE) {
        return res;
    }
    let id = match errors::parse_id::<PartId>(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.parts.delete(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
