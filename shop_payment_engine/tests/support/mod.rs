use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shop_payment_engine::{
    db_types::{NewOrder, Order, RemoteOrderId},
    events::{EventHandlers, EventHooks},
    CorrelationMode, ReconciliationApi, SqliteDatabase,
};

pub async fn new_test_db() -> SqliteDatabase {
    let _ = env_logger::try_init();
    let db = SqliteDatabase::new_with_url("sqlite::memory:", 1).await.expect("Error connecting to sqlite");
    db.run_migrations().await.expect("Error running migrations");
    db
}

/// Counts how often the order-paid and order-failed hooks fire. Stands in for the cart-clear collaborator.
pub struct HookCounters {
    pub paid: Arc<AtomicU64>,
    pub failed: Arc<AtomicU64>,
}

impl HookCounters {
    pub fn paid_count(&self) -> u64 {
        self.paid.load(Ordering::SeqCst)
    }

    pub fn failed_count(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }
}

pub async fn new_api(db: SqliteDatabase, mode: CorrelationMode) -> (ReconciliationApi<SqliteDatabase>, HookCounters) {
    let paid = Arc::new(AtomicU64::new(0));
    let failed = Arc::new(AtomicU64::new(0));
    let mut hooks = EventHooks::default();
    let paid_clone = Arc::clone(&paid);
    hooks.on_order_paid(move |_ev| {
        let count = Arc::clone(&paid_clone);
        Box::pin(async move {
            count.fetch_add(1, Ordering::SeqCst);
        })
    });
    let failed_clone = Arc::clone(&failed);
    hooks.on_order_failed(move |_ev| {
        let count = Arc::clone(&failed_clone);
        Box::pin(async move {
            count.fetch_add(1, Ordering::SeqCst);
        })
    });
    let handlers = EventHandlers::new(10, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    (ReconciliationApi::new(db, mode, producers), HookCounters { paid, failed })
}

/// Creates a Pending order for 500.00 and correlates it with the reference `ORD_{id}`.
pub async fn seed_order(api: &ReconciliationApi<SqliteDatabase>) -> Order {
    let new_order = NewOrder::new("cust-1001", "500.00".parse().expect("valid price"));
    let order = api.create_order(new_order).await.expect("Error creating order");
    let remote_id = RemoteOrderId(format!("ORD_{}", order.id));
    api.attach_remote_id(order.id, &remote_id).await.expect("Error attaching remote id")
}

/// Event delivery is async; give the spawned handlers a moment to drain the channel.
pub async fn settle_events() {
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
}
