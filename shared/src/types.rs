//! Common types used across the platform

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Import,
    Export,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Import => "import",
            MovementType::Export => "export",
        }
    }
}

/// Order lifecycle status
///
/// Orders advance one step at a time: pending -> confirmed -> shipping ->
/// delivered. Cancellation is allowed from any non-terminal status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipping,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipping => "shipping",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the status can never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// The single forward step from this status, if any
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Shipping),
            OrderStatus::Shipping => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Validate a requested transition
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        if target == OrderStatus::Cancelled {
            return !self.is_terminal();
        }
        self.next() == Some(target)
    }
}

/// User role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }
}

/// A free-text field used for best-effort matching against another entity's
/// display name or id. Not a database foreign key: matching is exact and
/// case-sensitive, and downstream reports depend on that behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SoftRef(pub String);

impl SoftRef {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Exact, case-sensitive match against a display name
    pub fn matches_label(&self, label: &str) -> bool {
        self.0 == label
    }

    /// Exact match against an entity id rendered as a string
    pub fn matches_id(&self, id: &Uuid) -> bool {
        self.0 == id.to_string()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SoftRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for SoftRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Date range for report queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

/// Sort direction for report views
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}
