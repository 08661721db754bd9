use std::time::Duration;

use actix_web::{http::KeepAlive, middleware::Logger, web, App, HttpServer};
use cashfree_tools::CashfreeApi;
use log::*;
use shop_payment_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    ReconciliationApi,
    SqliteDatabase,
};

use crate::{
    cashfree_routes::CashfreeWebhookRoute,
    config::{ServerConfig, WebhookConfig},
    errors::ServerError,
    integrations::storefront::{create_cart_event_handlers, StorefrontApi},
    routes::{health, CheckoutRoute, CustomerOrdersRoute, OrderStatusRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = match &config.storefront.cart_clear_url {
        Some(url) => {
            let storefront = StorefrontApi::new(url.clone())
                .map_err(|e| ServerError::InitializeError(e.to_string()))?;
            create_cart_event_handlers(storefront)
        },
        None => {
            info!("💻️ No storefront cart-clear endpoint configured. Order events will not be forwarded.");
            EventHandlers::new(1, EventHooks::default())
        },
    };
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<actix_web::dev::Server, ServerError> {
    let cashfree_api = CashfreeApi::new(config.cashfree.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let webhook_config = WebhookConfig::from(&config);
    let correlation_mode = config.correlation_mode;
    let srv = HttpServer::new(move || {
        let api = ReconciliationApi::new(db.clone(), correlation_mode, producers.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("spg::access_log"))
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(cashfree_api.clone()))
            .app_data(web::Data::new(webhook_config.clone()));
        let api_scope = web::scope("/api")
            .service(CheckoutRoute::<SqliteDatabase>::new())
            .service(OrderStatusRoute::<SqliteDatabase>::new())
            .service(CustomerOrdersRoute::<SqliteDatabase>::new());
        app.service(health).service(CashfreeWebhookRoute::<SqliteDatabase>::new()).service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
