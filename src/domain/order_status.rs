use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle of a single order row.
///
/// `pending`/`pending_payment` → `confirmed` → `processing` → `shipped` →
/// `delivered`, with `cancelled` reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    PendingPayment,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Unknown order status '{0}'")]
    Unknown(String),

    #[error("Cannot move order from {current} to {requested}")]
    Illegal {
        current: OrderStatus,
        requested: OrderStatus,
    },
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::PendingPayment,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    // Position along the fulfilment path. Cancelled sits outside it.
    fn rank(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending | OrderStatus::PendingPayment => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::Processing => Some(2),
            OrderStatus::Shipped => Some(3),
            OrderStatus::Delivered => Some(4),
            OrderStatus::Cancelled => None,
        }
    }

    /// Forward moves may skip steps; re-applying the current status is a no-op.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        match (self.rank(), next.rank()) {
            (_, None) => true,
            (Some(current), Some(target)) => target > current,
            (None, Some(_)) => false,
        }
    }

    pub fn transition_to(&self, next: OrderStatus) -> Result<OrderStatus, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError::Illegal {
                current: *self,
                requested: next,
            })
        }
    }

    /// Status a freshly written order starts in.
    pub fn initial(payment_method: Option<&str>, payment_status: Option<&str>) -> OrderStatus {
        if payment_status.is_some_and(|s| s.eq_ignore_ascii_case("verified")) {
            return OrderStatus::Confirmed;
        }
        match payment_method {
            Some(method) if is_deferred_gateway(method) => OrderStatus::PendingPayment,
            _ => OrderStatus::Pending,
        }
    }
}

fn is_deferred_gateway(method: &str) -> bool {
    method.eq_ignore_ascii_case("paystack")
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TransitionError::Unknown(s.to_string()))
    }
}
