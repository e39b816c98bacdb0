use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use partstock_auth::Permission;
use partstock_catalog::{NewStore, StoreUpdate};
use partstock_core::StoreId;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_stores).post(create_store))
        .route("/number/:number", get(get_store_by_number))
        .route("/:id", get(get_store).put(update_store).delete(delete_store))
}

pub async fn list_stores(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::CATALOG_READ) {
        return res;
    }
    match services.stores.list() {
        Ok(stores) => Json(stores).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn get_store(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::CATALOG_READ) {
        return res;
    }
    let id = match errors::parse_id::<StoreId>(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.stores.get(id) {
        Ok(Some(store)) if !store.deleted => Json(store).into_response(),
        Ok(_) => errors::not_found("store"),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn get_store_by_number(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(number): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::CATALOG_READ) {
        return res;
    }
    match services.stores.by_number(&number) {
        Ok(Some(store)) if !store.deleted => Json(store).into_response(),
        Ok(_) => errors::not_found("store"),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_store(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<NewStore>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::CATALOG_WRITE) {
        return res;
    }
    match services.stores.create(body) {
        Ok(store) => (StatusCode::CREATED, Json(store)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn update_store(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<StoreUpdate>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::CATALOG_WRITE) {
        return res;
    }
    let id = match errors::parse_id::<StoreId>(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.stores.update(id, body) {
        Ok(store) => Json(store).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn delete_store(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::CATALOG_WRITE) {
        return res;
    }
    let id = match errors::parse_id::<StoreId>(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.stores.delete(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
