use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use partstock_auth::Permission;
use partstock_core::{PartId, StoreId};
use partstock_inventory::SaleOutcome;
use partstock_sales::{top_selling, SaleLedger, DEFAULT_TOP_SELLING_LIMIT};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_sales).post(record_sale))
        .route("/store/:store_id", get(list_sales_for_store))
        .route("/part/:part_id", get(list_sales_for_part))
        .route("/top-selling", get(top_selling_parts))
}

pub async fn list_sales(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(range): Query<dto::SalesRangeQuery>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::SALES_READ) {
        return res;
    }
    let result = match (range.start, range.end) {
        (Some(start), Some(end)) => services.sales.between(start, end),
        (None, None) => services.sales.list(),
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "start and end must be given together",
            );
        }
    };
    match result {
        Ok(sales) => Json(sales).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn list_sales_for_store(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(store_id): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::SALES_READ) {
        return res;
    }
    let store_id = match errors::parse_id::<StoreId>(&store_id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.sales.by_store(store_id) {
        Ok(sales) => Json(sales).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn list_sales_for_part(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(part_id): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::SALES_READ) {
        return res;
    }
    let part_id = match errors::parse_id::<PartId>(&part_id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.sales.by_part(part_id) {
        Ok(sales) => Json(sales).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn top_selling_parts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::TopSellingQuery>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::SALES_READ) {
        return res;
    }
    let limit = query.limit.unwrap_or(DEFAULT_TOP_SELLING_LIMIT);
    let sales = match services.sales.list() {
        Ok(sales) => sales,
        Err(e) => return errors::repository_error_to_response(e),
    };

    let mut rows = Vec::new();
    for total in top_selling(&sales, limit) {
        let name = match services.parts.get(total.part_id) {
            Ok(part) => part.map(|p| p.name),
            Err(e) => return errors::catalog_error_to_response(e),
        };
        rows.push(dto::TopSellingRow::new(total, name));
    }
    Json(rows).into_response()
}

pub async fn record_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::RecordSaleRequest>,
) -> axum::response::Response {
    if let Err(res) = authz::require(&principal, Permission::SALES_RECORD) {
        return res;
    }
    let sold_by = body
        .sold_by
        .or_else(|| Some(principal.username().to_string()));

    match services.record_sale(body.part_id, body.store_id, body.quantity, sold_by, Utc::now()) {
        Ok(recorded) => {
            let (remaining_quantity, reorder_alert) = match recorded.outcome {
                SaleOutcome::Applied {
                    record,
                    reorder_alert,
                } => (Some(record.quantity), reorder_alert),
                SaleOutcome::Untracked => (None, None),
            };
            (
                StatusCode::CREATED,
                Json(dto::RecordSaleResponse {
                    sale: recorded.sale,
                    inventory_tracked: remaining_quantity.is_some(),
                    remaining_quantity,
                    reorder_alert,
                }),
            )
                .into_response()
        }
        Err(e) => errors::inventory_error_to_response(e),
    }
}
