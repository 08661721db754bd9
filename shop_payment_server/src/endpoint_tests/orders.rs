use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use cashfree_tools::{CashfreeApi, CashfreeConfig};
use shop_payment_engine::{db_types::OrderStatusType, events::EventProducers, CorrelationMode, ReconciliationApi};

use crate::{
    data_objects::OrderStatusResponse,
    endpoint_tests::mocks::{order_fixture, MockGateway},
    routes::{CheckoutRoute, CustomerOrdersRoute, OrderStatusRoute},
};

fn configure_with(gateway: MockGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = ReconciliationApi::new(gateway, CorrelationMode::RemoteReference, EventProducers::default());
        let cashfree = CashfreeApi::new(CashfreeConfig::default()).expect("client construction is infallible here");
        cfg.service(
            web::scope("/api")
                .service(OrderStatusRoute::<MockGateway>::new())
                .service(CheckoutRoute::<MockGateway>::new())
                .service(CustomerOrdersRoute::<MockGateway>::new()),
        )
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(cashfree));
    }
}

#[actix_web::test]
async fn order_status_reports_the_current_state() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_fetch_order_by_id().returning(|_| Ok(Some(order_fixture(1, OrderStatusType::Paid))));

    let app = App::new().configure(configure_with(gateway));
    let service = test::init_service(app).await;
    let req = TestRequest::get().uri("/api/order-status/1").to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let response: OrderStatusResponse = test::read_body_json(res).await;
    assert_eq!(response.order_id, 1);
    assert_eq!(response.status, "Paid");
    assert_eq!(response.transaction_id.as_deref(), Some("pay_123"));
    assert_eq!(response.total_price, "500.00");
}

#[actix_web::test]
async fn order_status_for_a_missing_order_is_404() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_fetch_order_by_id().returning(|_| Ok(None));

    let app = App::new().configure(configure_with(gateway));
    let service = test::init_service(app).await;
    let req = TestRequest::get().uri("/api/order-status/999").to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn customer_orders_lists_all_orders() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway
        .expect_fetch_orders_for_customer()
        .withf(|customer_id| customer_id == "cust-1")
        .returning(|_| Ok(vec![order_fixture(1, OrderStatusType::Paid), order_fixture(2, OrderStatusType::Pending)]));

    let app = App::new().configure(configure_with(gateway));
    let service = test::init_service(app).await;
    let req = TestRequest::get().uri("/api/orders/cust-1").to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let response: Vec<OrderStatusResponse> = test::read_body_json(res).await;
    assert_eq!(response.len(), 2);
    assert_eq!(response[0].status, "Paid");
    assert_eq!(response[1].status, "Pending");
}

#[actix_web::test]
async fn checkout_gateway_failure_leaves_the_order_unreferenced() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_insert_order().returning(|_| {
        let mut order = order_fixture(1, OrderStatusType::Pending);
        order.remote_order_id = None;
        Ok(order)
    });
    // The test client carries no usable credentials, so the outbound call fails. The reference is only
    // persisted once the gateway has accepted the order, so the failed order stays retryable.
    gateway.expect_attach_remote_id().never();

    let app = App::new().configure(configure_with(gateway));
    let service = test::init_service(app).await;
    let req = TestRequest::post()
        .uri("/api/checkout")
        .set_json(serde_json::json!({ "customer_id": "cust-1", "total_price": "500.00" }))
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn checkout_rejects_an_unparseable_price() {
    let _ = env_logger::try_init().ok();
    // No expectations: the request must be rejected before any order is created.
    let app = App::new().configure(configure_with(MockGateway::new()));
    let service = test::init_service(app).await;
    let req = TestRequest::post()
        .uri("/api/checkout")
        .set_json(serde_json::json!({ "customer_id": "cust-1", "total_price": "five hundred" }))
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
