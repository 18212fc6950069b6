use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use emberpos_core::{DomainError, DomainResult, OrderId};

/// Order workflow status.
///
/// `Pending → Preparing → Ready → Completed`, with `Cancelled` reachable from
/// any non-terminal state (a reason is required).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// The single legal forward step, if any.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        if to == OrderStatus::Cancelled {
            return !self.is_terminal();
        }
        self.next() == Some(to)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(DomainError::validation(format!("unknown order status '{s}'"))),
        }
    }
}

/// A placed order.
///
/// Denormalized, matching the original orders table: one row with a free-text
/// instructions summary of the deal/flavor selection rather than structured
/// line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    order_number: u64,
    total_cents: u64,
    instructions: String,
    status: OrderStatus,
    cancel_reason: Option<String>,
    created_at: DateTime<Utc>,
}

impl Order {
    /// A freshly placed order starts `Pending`.
    pub fn new_pending(
        id: OrderId,
        order_number: u64,
        total_cents: u64,
        instructions: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            order_number,
            total_cents,
            instructions: instructions.into(),
            status: OrderStatus::Pending,
            cancel_reason: None,
            created_at,
        }
    }

    /// Rehydrate a stored order without re-running placement logic.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: OrderId,
        order_number: u64,
        total_cents: u64,
        instructions: String,
        status: OrderStatus,
        cancel_reason: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            order_number,
            total_cents,
            instructions,
            status,
            cancel_reason,
            created_at,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn order_number(&self) -> u64 {
        self.order_number
    }

    pub fn total_cents(&self) -> u64 {
        self.total_cents
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Move to the next workflow status.
    pub fn transition_to(&mut self, to: OrderStatus) -> DomainResult<()> {
        if to == OrderStatus::Cancelled {
            return Err(DomainError::validation(
                "cancellation requires a reason, use cancel()",
            ));
        }
        if !self.status.can_transition_to(to) {
            return Err(DomainError::invariant(format!(
                "cannot move order from {} to {}",
                self.status.as_str(),
                to.as_str()
            )));
        }
        self.status = to;
        Ok(())
    }

    /// Cancel from any non-terminal state, recording why.
    pub fn cancel(&mut self, reason: impl Into<String>) -> DomainResult<()> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(DomainError::validation("cancel reason cannot be empty"));
        }
        if self.status.is_terminal() {
            return Err(DomainError::invariant(format!(
                "cannot cancel a {} order",
                self.status.as_str()
            )));
        }
        self.status = OrderStatus::Cancelled;
        self.cancel_reason = Some(reason);
        Ok(())
    }
}
