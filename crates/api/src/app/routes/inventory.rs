use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{sse::Event as SseEvent, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use partstock_auth::Permission;
use partstock_core::{InventoryId, StoreId};
use partstock_inventory::NewInventory;

use crate::app::services::{self, AppServices};
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_inventory).post(upsert_inventory))
        .route("/store/:store_id", get(list_inventory_for_store))
        .route("/reorder", get(list_needing_reorder))
        .route("/reorder/store/:store_id", get(list_needing_reorder_for_store))
        .route("/low-stock", get(list_low_stock))
        .route("/calculate-reorder/:id", post(calculate_reorder_point))
        .route("/calculate-reorder-quantity/:id", post(calculate_reorder_quantity))
        .route("/update-all-reorder-points", post(update_all_reorder_points))
        .route("/alerts/stream", get(alerts_stream))
        .route("/:id", get(get_inventory).delete(delete_inventory))
}

pub async fn list_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::INVENTORY_READ) {
        return res;
    }
    match services.inventory.list_all() {
        Ok(records) => Json(records).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn get_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::INVENTORY_READ) {
        return res;
    }
    let id = match errors::parse_id::<InventoryId>(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.inventory.get(id) {
        Ok(record) => Json(record).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn list_inventory_for_store(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(store_id): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::INVENTORY_READ) {
        return res;
    }
    let store_id = match errors::parse_id::<StoreId>(&store_id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.inventory.by_store(store_id) {
        Ok(records) => Json(records).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn list_needing_reorder(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::INVENTORY_READ) {
        return res;
    }
    match services.inventory.needing_reorder() {
        Ok(records) => Json(records).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn list_needing_reorder_for_store(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(store_id): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::INVENTORY_READ) {
        return res;
    }
    let store_id = match errors::parse_id::<StoreId>(&store_id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.inventory.needing_reorder_for_store(store_id) {
        Ok(records) => Json(records).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn list_low_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::INVENTORY_READ) {
        return res;
    }
    match services.inventory.low_stock() {
        Ok(records) => Json(records).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn upsert_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<NewInventory>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::INVENTORY_WRITE) {
        return res;
    }
    match services.inventory.upsert(body) {
        Ok(record) => Json(record).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn delete_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::INVENTORY_WRITE) {
        return res;
    }
    let id = match errors::parse_id::<InventoryId>(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.inventory.delete(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn calculate_reorder_point(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::INVENTORY_READ) {
        return res;
    }
    let id = match errors::parse_id::<InventoryId>(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let result = services.inventory.get(id).and_then(|record| {
        let recommended = services.inventory.calculate_reorder_point(id, Utc::now())?;
        Ok(dto::ReorderPointResponse::new(&record, recommended))
    });
    match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn calculate_reorder_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::INVENTORY_READ) {
        return res;
    }
    let id = match errors::parse_id::<InventoryId>(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let result = services.inventory.get(id).and_then(|record| {
        let recommended = services.inventory.calculate_reorder_quantity(id, Utc::now())?;
        Ok(dto::ReorderQuantityResponse::new(&record, recommended))
    });
    match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn update_all_reorder_points(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::INVENTORY_REORDER) {
        return res;
    }
    tracing::info!(username = principal.username(), "reorder point refresh requested");
    match services.inventory.update_all_reorder_points(Utc::now()) {
        Ok(report) => Json(report).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn alerts_stream(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<
    axum::response::Sse<impl tokio_stream::Stream<Item = Result<SseEvent, std::convert::Infallible>>>,
    axum::response::Response,
> {
    authz::require(&principal, Permission::INVENTORY_READ)?;
    Ok(services::reorder_alert_sse_stream(services))
}
