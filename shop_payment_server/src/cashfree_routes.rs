//----------------------------------------------   Webhook  ----------------------------------------------------

use actix_web::{web, HttpRequest, HttpResponse};
use cashfree_tools::WebhookEnvelope;
use log::*;
use shop_payment_engine::{
    helpers::verify_webhook_signature,
    traits::PaymentGatewayDatabase,
    ReconciliationApi,
    SettlementResult,
};

use crate::{
    config::WebhookConfig,
    data_objects::JsonResponse,
    errors::ServerError,
    integrations::cashfree::{settlement_from_webhook, NotificationConversionError},
    route,
};

pub const TIMESTAMP_HEADER: &str = "x-webhook-timestamp";
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

route!(cashfree_webhook => Post "/webhook/cashfree" impl PaymentGatewayDatabase);
/// Route handler for Cashfree payment-status notifications.
///
/// The contract with the gateway is asymmetric and worth spelling out:
/// * A request without the signature headers is not a webhook at all and gets a 400.
/// * Everything carrying the headers is acknowledged with a 200, *including* notifications whose signature does
///   not verify, whose body does not parse, or whose reference matches no order. A non-2xx response makes the
///   gateway redeliver, and redelivering a notification we have already decided to reject accomplishes nothing.
/// * The response body says what happened, but the gateway only looks at the status code.
pub async fn cashfree_webhook<B: PaymentGatewayDatabase>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<ReconciliationApi<B>>,
    config: web::Data<WebhookConfig>,
) -> Result<HttpResponse, ServerError> {
    trace!("📬️ Received webhook request: {}", req.uri());
    let timestamp = extract_header(&req, TIMESTAMP_HEADER)?;
    let signature = extract_header(&req, SIGNATURE_HEADER)?;
    if !verify_webhook_signature(config.policy, &body, &timestamp, &signature, &config.secret) {
        warn!("📬️ Webhook signature verification failed. Acknowledging without processing.");
        return Ok(HttpResponse::Ok().json(JsonResponse::failure("Invalid signature.")));
    }
    let envelope = match serde_json::from_slice::<WebhookEnvelope>(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("📬️ Could not parse webhook body. {e}");
            return Ok(HttpResponse::Ok().json(JsonResponse::failure("Unparseable notification body.")));
        },
    };
    let result = handle_notification(envelope, &api).await;
    Ok(HttpResponse::Ok().json(result))
}

async fn handle_notification<B: PaymentGatewayDatabase>(
    envelope: WebhookEnvelope,
    api: &ReconciliationApi<B>,
) -> JsonResponse {
    let update = match settlement_from_webhook(&envelope) {
        Ok(update) => update,
        Err(NotificationConversionError::NoOrderReference) => {
            warn!("📬️ Actionable notification carries no order reference. Acknowledging without processing.");
            return JsonResponse::failure("No order reference in notification.");
        },
    };
    match api.process_settlement(update).await {
        Ok(SettlementResult::Applied(order)) => {
            info!("📬️ Order #{} settled as {}.", order.id, order.status);
            JsonResponse::success("Notification processed.")
        },
        Ok(SettlementResult::AlreadySettled(order)) => {
            info!("📬️ Order #{} was already {}. Duplicate acknowledged.", order.id, order.status);
            JsonResponse::success("Order already settled.")
        },
        Ok(SettlementResult::NotFound) => JsonResponse::failure("No matching order."),
        Ok(SettlementResult::Ignored) => JsonResponse::success("Notification acknowledged."),
        Err(e) => {
            // A backend failure must still be acknowledged; the gateway cannot fix our database by redelivering.
            error!("📬️ Could not apply settlement. {e}");
            JsonResponse::failure("Error processing notification.")
        },
    }
}

fn extract_header(req: &HttpRequest, name: &str) -> Result<String, ServerError> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or(ServerError::MissingWebhookHeaders)
}
