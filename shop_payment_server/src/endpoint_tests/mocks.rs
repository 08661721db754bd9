use chrono::{TimeZone, Utc};
use mockall::mock;
use shop_payment_engine::{
    db_types::{NewOrder, Order, OrderStatusType, RemoteOrderId},
    traits::{OrderManagement, PaymentGatewayDatabase, PaymentGatewayError},
};

mock! {
    pub Gateway {}

    impl OrderManagement for Gateway {
        async fn fetch_order_by_id(&self, order_id: i64) -> Result<Option<Order>, PaymentGatewayError>;
        async fn fetch_order_by_remote_id(&self, remote_id: &str) -> Result<Option<Order>, PaymentGatewayError>;
        async fn fetch_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, PaymentGatewayError>;
    }

    impl PaymentGatewayDatabase for Gateway {
        fn url(&self) -> &str;
        async fn insert_order(&self, order: NewOrder) -> Result<Order, PaymentGatewayError>;
        async fn attach_remote_id(&self, order_id: i64, remote_id: &RemoteOrderId) -> Result<Order, PaymentGatewayError>;
        async fn settle_order_paid(&self, order_id: i64, transaction_id: &str) -> Result<Option<Order>, PaymentGatewayError>;
        async fn settle_order_failed(&self, order_id: i64, transaction_id: &str) -> Result<Option<Order>, PaymentGatewayError>;
        async fn close(&mut self) -> Result<(), PaymentGatewayError>;
    }

    impl Clone for Gateway {
        fn clone(&self) -> Self;
    }
}

pub fn order_fixture(id: i64, status: OrderStatusType) -> Order {
    Order {
        id,
        customer_id: "cust-1".to_string(),
        remote_order_id: Some(RemoteOrderId(format!("ORD_{id}"))),
        total_price: "500.00".parse().unwrap(),
        currency: "INR".to_string(),
        transaction_id: status.is_terminal().then(|| "pay_123".to_string()),
        status,
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
    }
}
