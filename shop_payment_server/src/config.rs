use std::env;

use cashfree_tools::CashfreeConfig;
use log::*;
use shop_payment_engine::{helpers::SignaturePolicy, CorrelationMode};
use spg_common::Secret;

const DEFAULT_SPG_HOST: &str = "127.0.0.1";
const DEFAULT_SPG_PORT: u16 = 8380;
const DEFAULT_SPG_DATABASE_URL: &str = "sqlite://data/spg_store.db";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// How the raw webhook body is treated before its signature is checked.
    pub signature_policy: SignaturePolicy,
    /// How gateway order references are matched back to internal orders.
    pub correlation_mode: CorrelationMode,
    /// The shared secret the gateway signs webhook notifications with.
    pub webhook_secret: Secret<String>,
    /// Cashfree API client configuration
    pub cashfree: CashfreeConfig,
    /// Storefront integration configuration
    pub storefront: StorefrontConfig,
}

#[derive(Clone, Debug, Default)]
pub struct StorefrontConfig {
    /// The storefront endpoint to POST to when an order is paid, clearing the customer's cart. When `None`, the
    /// cart-clear hook is not installed.
    pub cart_clear_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SPG_HOST.to_string(),
            port: DEFAULT_SPG_PORT,
            database_url: DEFAULT_SPG_DATABASE_URL.to_string(),
            signature_policy: SignaturePolicy::default(),
            correlation_mode: CorrelationMode::default(),
            webhook_secret: Secret::default(),
            cashfree: CashfreeConfig::default(),
            storefront: StorefrontConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SPG_HOST").ok().unwrap_or_else(|| DEFAULT_SPG_HOST.into());
        let port = env::var("SPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SPG_PORT. {e} Using the default, {DEFAULT_SPG_PORT}, instead."
                    );
                    DEFAULT_SPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SPG_PORT);
        let database_url = env::var("SPG_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ SPG_DATABASE_URL is not set. Using the default, {DEFAULT_SPG_DATABASE_URL}, instead.");
            DEFAULT_SPG_DATABASE_URL.to_string()
        });
        let signature_policy = env::var("SPG_SIGNATURE_POLICY")
            .ok()
            .map(|s| {
                s.parse::<SignaturePolicy>().unwrap_or_else(|e| {
                    error!("🪛️ {e} Using the default policy instead.");
                    SignaturePolicy::default()
                })
            })
            .unwrap_or_default();
        let correlation_mode = env::var("SPG_CORRELATION_MODE")
            .ok()
            .map(|s| {
                s.parse::<CorrelationMode>().unwrap_or_else(|e| {
                    error!("🪛️ {e} Using the default mode instead.");
                    CorrelationMode::default()
                })
            })
            .unwrap_or_default();
        let webhook_secret = Secret::new(env::var("SPG_WEBHOOK_SECRET").unwrap_or_else(|_| {
            error!("🪛️ SPG_WEBHOOK_SECRET is not set. Webhook signature checks will fail until it is configured.");
            String::default()
        }));
        let cashfree = CashfreeConfig::new_from_env_or_default();
        let cart_clear_url = env::var("SPG_CART_CLEAR_URL").ok();
        if cart_clear_url.is_none() {
            info!("🪛️ SPG_CART_CLEAR_URL is not set. Carts will not be cleared when orders are paid.");
        }
        Self {
            host,
            port,
            database_url,
            signature_policy,
            correlation_mode,
            webhook_secret,
            cashfree,
            storefront: StorefrontConfig { cart_clear_url },
        }
    }
}

/// The slice of [`ServerConfig`] the webhook handler needs, registered as actix app data.
#[derive(Clone, Debug, Default)]
pub struct WebhookConfig {
    pub policy: SignaturePolicy,
    pub secret: Secret<String>,
}

impl From<&ServerConfig> for WebhookConfig {
    fn from(config: &ServerConfig) -> Self {
        Self { policy: config.signature_policy, secret: config.webhook_secret.clone() }
    }
}
