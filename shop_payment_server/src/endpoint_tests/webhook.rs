use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use shop_payment_engine::{
    db_types::OrderStatusType,
    events::EventProducers,
    helpers::{sign_webhook_payload, SignaturePolicy},
    CorrelationMode,
    ReconciliationApi,
};
use spg_common::Secret;

use crate::{
    cashfree_routes::{CashfreeWebhookRoute, SIGNATURE_HEADER, TIMESTAMP_HEADER},
    config::WebhookConfig,
    data_objects::JsonResponse,
    endpoint_tests::mocks::{order_fixture, MockGateway},
};

const SECRET: &str = "cf_webhook_secret_123";
const TIMESTAMP: &str = "1700000000000";

const PAID_BODY: &str = r#"{
    "type": "PAYMENT_SUCCESS_WEBHOOK",
    "data": {
        "order": { "order_id": "ORD_1" },
        "payment": { "cf_payment_id": "pay_123", "payment_status": "SUCCESS" }
    }
}"#;

fn webhook_config() -> WebhookConfig {
    WebhookConfig { policy: SignaturePolicy::Verbatim, secret: Secret::new(SECRET.to_string()) }
}

fn sign(body: &str) -> String {
    sign_webhook_payload(SignaturePolicy::Verbatim, body.as_bytes(), TIMESTAMP, &Secret::new(SECRET.to_string()))
        .expect("signing cannot fail with a non-empty secret")
}

async fn post_webhook(
    body: &str,
    headers: &[(&str, &str)],
    configure: impl FnOnce(&mut ServiceConfig),
) -> (StatusCode, String) {
    let _ = env_logger::try_init().ok();
    let mut req = TestRequest::post().uri("/webhook/cashfree").set_payload(body.to_string());
    for (name, value) in headers {
        req = req.insert_header((*name, *value));
    }
    let app = App::new().app_data(web::Data::new(webhook_config())).configure(configure);
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    (status, body)
}

fn configure_with(gateway: MockGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = ReconciliationApi::new(gateway, CorrelationMode::RemoteReference, EventProducers::default());
        cfg.service(CashfreeWebhookRoute::<MockGateway>::new()).app_data(web::Data::new(api));
    }
}

#[actix_web::test]
async fn missing_signature_headers_are_rejected_with_400() {
    let (status, body) = post_webhook(PAID_BODY, &[], configure_with(MockGateway::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Missing webhook signature headers"), "{body}");
}

#[actix_web::test]
async fn invalid_signature_is_acknowledged_without_touching_the_store() {
    // No expectations are set on the mock: any database call panics the test.
    let headers = [(TIMESTAMP_HEADER, TIMESTAMP), (SIGNATURE_HEADER, "Zm9yZ2VkIHNpZ25hdHVyZQ==")];
    let (status, body) = post_webhook(PAID_BODY, &headers, configure_with(MockGateway::new())).await;
    assert_eq!(status, StatusCode::OK);
    let response: JsonResponse = serde_json::from_str(&body).unwrap();
    assert!(!response.success);
}

#[actix_web::test]
async fn tampered_body_fails_verification() {
    let signature = sign(PAID_BODY);
    let tampered = PAID_BODY.replace("ORD_1", "ORD_2");
    let headers = [(TIMESTAMP_HEADER, TIMESTAMP), (SIGNATURE_HEADER, signature.as_str())];
    let (status, body) = post_webhook(&tampered, &headers, configure_with(MockGateway::new())).await;
    assert_eq!(status, StatusCode::OK);
    let response: JsonResponse = serde_json::from_str(&body).unwrap();
    assert!(!response.success);
}

#[actix_web::test]
async fn authentic_success_notification_settles_the_order() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_fetch_order_by_remote_id()
        .withf(|reference| reference == "ORD_1")
        .returning(|_| Ok(Some(order_fixture(1, OrderStatusType::Pending))));
    gateway
        .expect_settle_order_paid()
        .withf(|order_id, transaction_id| *order_id == 1 && transaction_id == "pay_123")
        .returning(|_, _| Ok(Some(order_fixture(1, OrderStatusType::Paid))));

    let signature = sign(PAID_BODY);
    let headers = [(TIMESTAMP_HEADER, TIMESTAMP), (SIGNATURE_HEADER, signature.as_str())];
    let (status, body) = post_webhook(PAID_BODY, &headers, configure_with(gateway)).await;
    assert_eq!(status, StatusCode::OK);
    let response: JsonResponse = serde_json::from_str(&body).unwrap();
    assert!(response.success, "{body}");
}

#[actix_web::test]
async fn duplicate_delivery_is_acknowledged() {
    let mut gateway = MockGateway::new();
    gateway.expect_fetch_order_by_remote_id().returning(|_| Ok(Some(order_fixture(1, OrderStatusType::Paid))));

    let signature = sign(PAID_BODY);
    let headers = [(TIMESTAMP_HEADER, TIMESTAMP), (SIGNATURE_HEADER, signature.as_str())];
    let (status, body) = post_webhook(PAID_BODY, &headers, configure_with(gateway)).await;
    assert_eq!(status, StatusCode::OK);
    let response: JsonResponse = serde_json::from_str(&body).unwrap();
    assert!(response.success, "{body}");
}

#[actix_web::test]
async fn unknown_reference_is_acknowledged_with_200() {
    let mut gateway = MockGateway::new();
    gateway.expect_fetch_order_by_remote_id().returning(|_| Ok(None));
    gateway.expect_fetch_order_by_id().returning(|_| Ok(None));

    let signature = sign(PAID_BODY);
    let headers = [(TIMESTAMP_HEADER, TIMESTAMP), (SIGNATURE_HEADER, signature.as_str())];
    let (status, body) = post_webhook(PAID_BODY, &headers, configure_with(gateway)).await;
    assert_eq!(status, StatusCode::OK);
    let response: JsonResponse = serde_json::from_str(&body).unwrap();
    assert!(!response.success);
}

#[actix_web::test]
async fn unparseable_body_with_a_valid_signature_is_acknowledged() {
    let body = "this is not json";
    let signature = sign(body);
    let headers = [(TIMESTAMP_HEADER, TIMESTAMP), (SIGNATURE_HEADER, signature.as_str())];
    let (status, response_body) = post_webhook(body, &headers, configure_with(MockGateway::new())).await;
    assert_eq!(status, StatusCode::OK);
    let response: JsonResponse = serde_json::from_str(&response_body).unwrap();
    assert!(!response.success);
}

#[actix_web::test]
async fn test_pings_are_acknowledged() {
    let body = r#"{"type": "WEBHOOK"}"#;
    let signature = sign(body);
    let headers = [(TIMESTAMP_HEADER, TIMESTAMP), (SIGNATURE_HEADER, signature.as_str())];
    let (status, response_body) = post_webhook(body, &headers, configure_with(MockGateway::new())).await;
    assert_eq!(status, StatusCode::OK);
    let response: JsonResponse = serde_json::from_str(&response_body).unwrap();
    assert!(response.success);
}
