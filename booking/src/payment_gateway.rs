//! Simulated payment gateway.
//!
//! Payment processing is out of scope; the flow only needs something that
//! accepts a validated card and an amount and hands back a reference. The
//! trait is the seam where a real processor would plug in.

use crate::types::{CardDetails, Price};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Payment gateway result
pub type GatewayResult<T> = Result<T, PaymentGatewayError>;

/// Payment gateway error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentGatewayError {
    /// The card was declined
    #[error("Card declined: {reason}")]
    Declined {
        /// Decline reason
        reason: String,
    },
    /// The gateway could not be reached
    #[error("Payment gateway unavailable: {message}")]
    Unavailable {
        /// Failure description
        message: String,
    },
}

/// Receipt of a successful charge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    /// Gateway transaction reference
    pub reference: String,
    /// Amount charged
    pub amount: Price,
    /// Last four digits of the charged card
    pub card_last_four: String,
}

/// Charges a card
pub trait PaymentGateway: Send + Sync {
    /// Charges `amount` to `card`
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentGatewayError`] if the charge is not accepted.
    fn charge(&self, amount: Price, card: &CardDetails) -> BoxFuture<'static, GatewayResult<PaymentReceipt>>;
}

/// Gateway that accepts every charge after an optional delay
#[derive(Clone, Debug, Default)]
pub struct SimulatedPaymentGateway {
    latency: Duration,
}

impl SimulatedPaymentGateway {
    /// Creates a gateway that answers immediately
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }

    /// Delays every answer by `latency`
    #[must_use]
    pub const fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(self) -> Arc<dyn PaymentGateway> {
        Arc::new(self)
    }
}

impl PaymentGateway for SimulatedPaymentGateway {
    fn charge(&self, amount: Price, card: &CardDetails) -> BoxFuture<'static, GatewayResult<PaymentReceipt>> {
        let latency = self.latency;
        let card_last_four = card.last_four();

        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }

            let reference = format!("sim_txn_{}", uuid::Uuid::new_v4());
            tracing::info!(
                reference = %reference,
                amount = amount.amount,
                currency = %amount.currency,
                card = %card_last_four,
                "Simulated payment accepted"
            );

            Ok(PaymentReceipt {
                reference,
                amount,
                card_last_four,
            })
        }
        .boxed()
    }
}
