use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use partstock_auth::{Authenticator, JwtIssuer, UserRepository};
use partstock_catalog::{PartCatalog, PartRepository, StoreDirectory, StoreRepository};
use partstock_core::{PartId, SaleId, StoreId};
use partstock_infra::{
    seed_demo_data, AppConfig, InMemoryInventoryRepository, InMemoryPartRepository,
    InMemorySaleLedger, InMemoryStoreRepository, InMemoryUserRepository, SeedError, SeedTargets,
    DEFAULT_SEED,
};
use partstock_inventory::{
    AlertSink, InventoryError, InventoryRepository, InventoryResult, InventoryService,
    ReorderAlert, SaleOutcome,
};
use partstock_sales::{NewSale, Sale, SaleLedger};

/// Buffered realtime messages per subscriber before the slowest one starts lagging.
const REALTIME_CHANNEL_CAPACITY: usize = 1024;

/// Realtime message broadcasted via SSE.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RealtimeMessage {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// Alert sink that broadcasts reorder alerts to SSE subscribers.
///
/// Lossy: with no subscribers, or a lagging one, alerts are dropped.
#[derive(Debug, Clone)]
pub struct BroadcastAlertSink {
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

impl BroadcastAlertSink {
    pub fn new(realtime_tx: broadcast::Sender<RealtimeMessage>) -> Self {
        Self { realtime_tx }
    }
}

impl AlertSink for BroadcastAlertSink {
    fn reorder_alert(&self, alert: &ReorderAlert) {
        let payload = match serde_json::to_value(alert) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize reorder alert");
                return;
            }
        };
        let _ = self.realtime_tx.send(RealtimeMessage {
            topic: "inventory.reorder_alert".to_string(),
            payload,
        });
    }
}

/// A sale written to the ledger, plus what it did to stock.
#[derive(Debug, Clone)]
pub struct RecordedSale {
    pub sale: Sale,
    pub outcome: SaleOutcome,
}

/// Everything the handlers need, shared behind one `Arc`.
pub struct AppServices {
    pub parts: PartCatalog<Arc<dyn PartRepository>>,
    pub stores: StoreDirectory<Arc<dyn StoreRepository>>,
    pub inventory: InventoryService,
    pub sales: Arc<dyn SaleLedger>,
    pub auth: Authenticator,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

impl AppServices {
    pub fn realtime_tx(&self) -> &broadcast::Sender<RealtimeMessage> {
        &self.realtime_tx
    }

    /// Record a sale: take stock off the shelf, then append it to the ledger
    /// at the part's current price.
    ///
    /// A sale that fails validation or finds too little stock changes
    /// nothing. A sale for an untracked (part, store) pair is still recorded.
    pub fn record_sale(
        &self,
        part_id: PartId,
        store_id: StoreId,
        quantity: u32,
        sold_by: Option<String>,
        now: DateTime<Utc>,
    ) -> InventoryResult<RecordedSale> {
        let part = self
            .parts
            .get(part_id)
            .map_err(catalog_to_inventory)?
            .filter(|p| !p.deleted)
            .ok_or(InventoryError::UnknownPart(part_id))?;
        let store = self
            .stores
            .get(store_id)
            .map_err(catalog_to_inventory)?
            .filter(|s| !s.deleted)
            .ok_or(InventoryError::UnknownStore(store_id))?;

        let sale = Sale::record(
            SaleId::new(),
            NewSale {
                part_id,
                store_id,
                quantity,
                unit_price: part.price,
                sale_date: now,
                sold_by,
            },
        )?;

        let outcome = self.inventory.apply_sale(&part, &store, quantity)?;

        if let Err(e) = self.sales.append(sale.clone()) {
            tracing::error!(
                sale_id = %sale.id,
                sku = %part.sku,
                error = %e,
                "stock was decremented but the sale could not be written to the ledger"
            );
            return Err(e.into());
        }
        tracing::info!(
            sale_id = %sale.id,
            sku = %part.sku,
            store_number = %store.store_number,
            quantity,
            total = %sale.total_price,
            inventory_tracked = outcome.is_tracked(),
            "sale recorded"
        );

        Ok(RecordedSale { sale, outcome })
    }
}

fn catalog_to_inventory(err: partstock_catalog::CatalogError) -> InventoryError {
    match err {
        partstock_catalog::CatalogError::Domain(e) => InventoryError::Domain(e),
        partstock_catalog::CatalogError::Repository(e) => InventoryError::Repository(e),
    }
}

/// Wire the in-memory repositories into the services and, when configured,
/// load the demo data.
pub fn build_services(config: &AppConfig) -> Result<AppServices, SeedError> {
    let (realtime_tx, _rx) = broadcast::channel::<RealtimeMessage>(REALTIME_CHANNEL_CAPACITY);

    let parts = Arc::new(InMemoryPartRepository::new());
    let stores = Arc::new(InMemoryStoreRepository::new());
    let inventory = Arc::new(InMemoryInventoryRepository::new());
    let ledger = Arc::new(InMemorySaleLedger::new());
    let users = Arc::new(InMemoryUserRepository::new());

    if config.seed_demo_data {
        seed_demo_data(
            &SeedTargets {
                stores: stores.as_ref(),
                parts: parts.as_ref(),
                inventory: inventory.as_ref(),
                sales: ledger.as_ref(),
                users: users.as_ref(),
            },
            Utc::now(),
            DEFAULT_SEED,
        )?;
    }

    let inventory_service = InventoryService::new(
        inventory as Arc<dyn InventoryRepository>,
        parts.clone() as Arc<dyn PartRepository>,
        stores.clone() as Arc<dyn StoreRepository>,
        ledger.clone(),
        Arc::new(BroadcastAlertSink::new(realtime_tx.clone())),
    );

    Ok(AppServices {
        parts: PartCatalog::new(parts as Arc<dyn PartRepository>),
        stores: StoreDirectory::new(stores as Arc<dyn StoreRepository>),
        inventory: inventory_service,
        sales: ledger,
        auth: Authenticator::new(
            users as Arc<dyn UserRepository>,
            JwtIssuer::new(config.jwt_secret.as_bytes(), config.jwt_ttl),
        ),
        realtime_tx,
    })
}

/// Reorder alerts as server-sent events, one `inventory.reorder_alert` event per alert.
pub fn reorder_alert_sse_stream(
    services: Arc<AppServices>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |msg| match msg {
        Ok(m) => {
            let data = serde_json::to_string(&m.payload).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(m.topic).data(data)))
        }
        Err(e) => {
            tracing::debug!(error = %e, "alert subscriber lagged; alerts dropped");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
