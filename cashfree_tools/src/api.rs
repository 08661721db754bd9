use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use spg_common::Rupees;

use crate::{
    config::CashfreeConfig,
    data_objects::{CreateOrderRequest, CreateOrderResponse, CustomerDetails, OrderMeta, OrderSession},
    CashfreeApiError,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct CashfreeApi {
    config: CashfreeConfig,
    client: Arc<Client>,
}

impl CashfreeApi {
    pub fn new(config: CashfreeConfig) -> Result<Self, CashfreeApiError> {
        let mut headers = HeaderMap::with_capacity(4);
        let app_id = HeaderValue::from_str(&config.app_id).map_err(|e| CashfreeApiError::Initialization(e.to_string()))?;
        headers.insert("x-client-id", app_id);
        let mut secret = HeaderValue::from_str(config.secret_key.reveal().as_str())
            .map_err(|e| CashfreeApiError::Initialization(e.to_string()))?;
        secret.set_sensitive(true);
        headers.insert("x-client-secret", secret);
        let version =
            HeaderValue::from_str(&config.api_version).map_err(|e| CashfreeApiError::Initialization(e.to_string()))?;
        headers.insert("x-api-version", version);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CashfreeApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, CashfreeApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| CashfreeApiError::ResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| CashfreeApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| CashfreeApiError::ResponseError(e.to_string()))?;
            Err(CashfreeApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_api_url())
    }

    /// Registers an order with the gateway and returns the payment session.
    ///
    /// No retries happen here. The remote reference carries a uniqueness suffix, so a retried call would open a
    /// second gateway order for the same purchase; the caller decides whether to try again with a fresh
    /// reference.
    pub async fn create_order(
        &self,
        remote_order_id: &str,
        amount: Rupees,
        customer: CustomerDetails,
        meta: Option<OrderMeta>,
    ) -> Result<OrderSession, CashfreeApiError> {
        let request = CreateOrderRequest {
            order_id: remote_order_id.to_string(),
            order_amount: amount.to_decimal(),
            order_currency: spg_common::INR_CURRENCY_CODE.to_string(),
            customer_details: customer,
            order_meta: meta,
        };
        debug!("Creating gateway order {remote_order_id} for {amount}");
        let response = self.rest_query::<CreateOrderResponse, _>(Method::POST, "/orders", Some(request)).await?;
        let session = session_from_response(&self.config, remote_order_id, response)?;
        info!("Created gateway order {remote_order_id}");
        Ok(session)
    }
}

/// Turns a create-order response into the session the storefront pays against.
///
/// An accepted order without a session handle cannot be paid, so a missing or empty `payment_session_id` is an
/// error rather than an empty link.
fn session_from_response(
    config: &CashfreeConfig,
    remote_order_id: &str,
    response: CreateOrderResponse,
) -> Result<OrderSession, CashfreeApiError> {
    let session_id = match response.payment_session_id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(CashfreeApiError::NoSessionHandle(remote_order_id.to_string())),
    };
    let payment_link = config.payment_link(&session_id);
    Ok(OrderSession { remote_order_id: response.order_id, payment_session_id: session_id, payment_link })
}
