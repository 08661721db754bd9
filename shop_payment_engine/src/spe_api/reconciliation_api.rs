use std::{fmt::Debug, str::FromStr};

use log::*;
use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, PaymentOutcome, RemoteOrderId, SettlementUpdate},
    events::{EventProducers, OrderFailedEvent, OrderPaidEvent},
    helpers::{extract_internal_id, reference_candidates},
    traits::{PaymentGatewayDatabase, PaymentGatewayError},
};

/// How a gateway order reference is correlated back to an internal order record.
///
/// Historically, different versions of the storefront correlated by different keys. Rather than dead code paths,
/// the active strategy is explicit configuration:
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorrelationMode {
    /// Exact match against the stored remote reference, retrying with trailing uniqueness suffixes stripped, and
    /// finally falling back to the embedded internal id. This is the default.
    #[default]
    RemoteReference,
    /// Treat the reference purely as a carrier for the internal order id (first digit run past any prefix) and
    /// look up by primary key. For deployments that never stored remote references.
    InternalId,
}

#[derive(Debug, Clone, Error)]
#[error("Invalid correlation mode: {0}. Expected 'remote_reference' or 'internal_id'.")]
pub struct InvalidCorrelationMode(String);

impl FromStr for CorrelationMode {
    type Err = InvalidCorrelationMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote_reference" => Ok(Self::RemoteReference),
            "internal_id" => Ok(Self::InternalId),
            other => Err(InvalidCorrelationMode(other.to_string())),
        }
    }
}

/// The result of applying a settlement notification.
#[derive(Debug, Clone)]
pub enum SettlementResult {
    /// The order transitioned out of `Pending`. Side effects (events) have been published.
    Applied(Order),
    /// The order had already reached a terminal status. Duplicate and replayed deliveries land here; nothing was
    /// changed and no events were published.
    AlreadySettled(Order),
    /// No order matches the reference. The notification may belong to a different environment or tenant, so this
    /// is ignorable, not an error.
    NotFound,
    /// The notification classified as `Ignored` and was never correlated.
    Ignored,
}

/// `ReconciliationApi` is the primary API for handling order and settlement flows in response to storefront
/// checkouts and gateway webhook events.
pub struct ReconciliationApi<B> {
    db: B,
    mode: CorrelationMode,
    producers: EventProducers,
}

impl<B> Debug for ReconciliationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationApi")
    }
}

impl<B> ReconciliationApi<B> {
    pub fn new(db: B, mode: CorrelationMode, producers: EventProducers) -> Self {
        Self { db, mode, producers }
    }
}

impl<B> ReconciliationApi<B>
where B: PaymentGatewayDatabase
{
    /// Registers a brand-new order. The order starts out `Pending` with no remote reference; the caller is
    /// expected to follow up with [`Self::attach_remote_id`] once the gateway has accepted the order.
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, PaymentGatewayError> {
        let order = self.db.insert_order(order).await?;
        debug!("🔄️📦️ Order #{} created for customer {} ({})", order.id, order.customer_id, order.total_price);
        Ok(order)
    }

    /// Persists the correlation between an internal order and its gateway reference.
    ///
    /// This must complete before the payment handle is returned to the storefront: a webhook can arrive the
    /// moment the customer sees the payment page, and without the stored reference it cannot be resolved.
    pub async fn attach_remote_id(&self, order_id: i64, remote_id: &RemoteOrderId) -> Result<Order, PaymentGatewayError> {
        let order = self.db.attach_remote_id(order_id, remote_id).await?;
        debug!("🔄️📦️ Order #{order_id} is now correlated with gateway reference {remote_id}");
        Ok(order)
    }

    pub async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, PaymentGatewayError> {
        self.db.fetch_order_by_id(order_id).await
    }

    /// Resolves a gateway order reference to an internal order record, according to the configured
    /// [`CorrelationMode`]. A miss is `None`, never an error: callers must treat unmatched notifications as
    /// ignorable.
    pub async fn resolve_order(&self, reference: &str) -> Result<Option<Order>, PaymentGatewayError> {
        if self.mode == CorrelationMode::RemoteReference {
            for candidate in reference_candidates(reference) {
                if let Some(order) = self.db.fetch_order_by_remote_id(&candidate).await? {
                    trace!("🔄️🔗️ Reference '{reference}' resolved to order #{} via '{candidate}'", order.id);
                    return Ok(Some(order));
                }
            }
        }
        let Some(id) = extract_internal_id(reference) else {
            debug!("🔄️🔗️ Reference '{reference}' contains no usable order id");
            return Ok(None);
        };
        let order = self.db.fetch_order_by_id(id).await?;
        if let Some(order) = &order {
            trace!("🔄️🔗️ Reference '{reference}' resolved to order #{} via embedded id", order.id);
        }
        Ok(order)
    }

    /// Applies an authenticated settlement notification to its order.
    ///
    /// The transition table is deliberately tiny. `Pending` moves to `Paid` or `Failed` depending on the
    /// outcome, recording the gateway transaction id as part of the same atomic update. Both `Paid` and `Failed`
    /// are terminal: any further notification for the order, whatever its outcome, is a no-op. The update itself
    /// is a compare-and-set against the backend, so two concurrent deliveries cannot both observe `Pending`; the
    /// loser of the race comes back as [`SettlementResult::AlreadySettled`].
    ///
    /// Events are published only on an applied transition, which is what makes the downstream cart-clear hook
    /// fire exactly once per order.
    pub async fn process_settlement(&self, update: SettlementUpdate) -> Result<SettlementResult, PaymentGatewayError> {
        if update.outcome == PaymentOutcome::Ignored {
            trace!("🔄️💰️ Notification for '{}' classified as ignorable. Nothing to do.", update.remote_reference);
            return Ok(SettlementResult::Ignored);
        }
        let Some(order) = self.resolve_order(&update.remote_reference).await? else {
            info!(
                "🔄️💰️ No order matches gateway reference '{}'. Ignoring the notification; it may belong to another \
                 environment.",
                update.remote_reference
            );
            return Ok(SettlementResult::NotFound);
        };
        if order.status.is_terminal() {
            debug!(
                "🔄️💰️ Order #{} is already {}. Duplicate delivery of payment [{}] is a no-op.",
                order.id, order.status, update.payment_id
            );
            return Ok(SettlementResult::AlreadySettled(order));
        }
        let settled = match update.outcome {
            PaymentOutcome::Confirmed => self.db.settle_order_paid(order.id, &update.payment_id).await?,
            PaymentOutcome::Failed => self.db.settle_order_failed(order.id, &update.payment_id).await?,
            PaymentOutcome::Ignored => unreachable!("ignored outcomes return early"),
        };
        match settled {
            Some(order) => {
                info!(
                    "🔄️💰️ Order #{} settled as {} with transaction [{}] for {}",
                    order.id, order.status, update.payment_id, order.total_price
                );
                match update.outcome {
                    PaymentOutcome::Confirmed => self.call_order_paid_hook(&order).await,
                    PaymentOutcome::Failed => self.call_order_failed_hook(&order).await,
                    PaymentOutcome::Ignored => {},
                }
                Ok(SettlementResult::Applied(order))
            },
            None => {
                // Lost the race against a concurrent delivery. Re-fetch to report the terminal state.
                let order = self
                    .db
                    .fetch_order_by_id(order.id)
                    .await?
                    .ok_or(PaymentGatewayError::OrderIdNotFound(order.id))?;
                debug!("🔄️💰️ Order #{} was settled concurrently ({}). Treating as duplicate.", order.id, order.status);
                Ok(SettlementResult::AlreadySettled(order))
            },
        }
    }

    async fn call_order_paid_hook(&self, order: &Order) {
        for emitter in &self.producers.order_paid_producer {
            debug!("🔄️📦️ Notifying order-paid hook subscribers for order #{}", order.id);
            let event = OrderPaidEvent::new(order.clone());
            emitter.publish_event(event).await;
        }
    }

    async fn call_order_failed_hook(&self, order: &Order) {
        for emitter in &self.producers.order_failed_producer {
            debug!("🔄️📦️ Notifying order-failed hook subscribers for order #{}", order.id);
            let event = OrderFailedEvent::new(order.clone());
            emitter.publish_event(event).await;
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
