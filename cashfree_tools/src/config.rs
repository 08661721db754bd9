use log::*;
use spg_common::{helpers::parse_boolean_flag, Secret};

#[derive(Debug, Clone, Default)]
pub struct CashfreeConfig {
    pub app_id: String,
    pub secret_key: Secret<String>,
    pub api_version: String,
    /// Sandbox credentials only work against the sandbox host, so one flag switches both the API base url and
    /// the payment-link domain.
    pub sandbox: bool,
}

impl CashfreeConfig {
    pub fn new_from_env_or_default() -> Self {
        let app_id = std::env::var("SPG_CASHFREE_APP_ID").unwrap_or_else(|_| {
            warn!("SPG_CASHFREE_APP_ID not set, using (probably useless) default");
            "TEST0000000000000000".to_string()
        });
        let secret_key = Secret::new(std::env::var("SPG_CASHFREE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("SPG_CASHFREE_SECRET_KEY not set, using (probably useless) default");
            "cfsk_ma_test_00000000000000".to_string()
        }));
        let api_version = std::env::var("SPG_CASHFREE_API_VERSION").unwrap_or_else(|_| {
            warn!("SPG_CASHFREE_API_VERSION not set, using 2023-08-01 as default");
            "2023-08-01".to_string()
        });
        let sandbox = parse_boolean_flag(std::env::var("SPG_CASHFREE_SANDBOX").ok(), true);
        Self { app_id, secret_key, api_version, sandbox }
    }

    pub fn base_api_url(&self) -> &'static str {
        if self.sandbox {
            "https://sandbox.cashfree.com/pg"
        } else {
            "https://api.cashfree.com/pg"
        }
    }

    /// The customer-facing payment page for a session. The production and sandbox domains join the session id
    /// differently; both shapes are what the hosted checkout expects.
    pub fn payment_link(&self, session_id: &str) -> String {
        if self.sandbox {
            format!("https://sandbox.cashfree.com/pg/orders/pay/{session_id}")
        } else {
            format!("https://payments.cashfree.com/orders/pay_{session_id}")
        }
    }
}

#[cfg(test)]
mod test {
    use super::CashfreeConfig;

    #[test]
    fn sandbox_flag_selects_hosts() {
        let sandbox = CashfreeConfig { sandbox: true, ..Default::default() };
        assert_eq!(sandbox.base_api_url(), "https://sandbox.cashfree.com/pg");
        assert_eq!(sandbox.payment_link("sess1"), "https://sandbox.cashfree.com/pg/orders/pay/sess1");
        let live = CashfreeConfig { sandbox: false, ..Default::default() };
        assert_eq!(live.base_api_url(), "https://api.cashfree.com/pg");
        assert_eq!(live.payment_link("sess1"), "https://payments.cashfree.com/orders/pay_sess1");
    }
}
