//! Status and account-type enums.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Account type carried in the session and on backend user records.
///
/// Pages gate rendering on this value, but it is a display hint only; the
/// trust boundary is the backend's own authorization checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[default]
    Customer,
    Seller,
}

impl UserType {
    /// String form as the backend serializes it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Seller => "seller",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle status as reported by the backend.
///
/// Orders are immutable history to the frontend; unknown future statuses
/// must not break order rendering, hence the `Other` catch-all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Confirmed => f.write_str("confirmed"),
            Self::Shipped => f.write_str("shipped"),
            Self::Delivered => f.write_str("delivered"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// Payment status as reported by the backend on orders and receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed => f.write_str("failed"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_serde_snake_case() {
        let seller: UserType = serde_json::from_str("\"seller\"").unwrap();
        assert_eq!(seller, UserType::Seller);
        assert_eq!(serde_json::to_string(&seller).unwrap(), "\"seller\"");
    }

    #[test]
    fn test_order_status_tolerates_unknown_values() {
        let status: OrderStatus = serde_json::from_str("\"awaiting_pickup\"").unwrap();
        assert_eq!(status, OrderStatus::Other("awaiting_pickup".to_string()));
        assert_eq!(status.to_string(), "awaiting_pickup");
    }

    #[test]
    fn test_known_order_status_round_trip() {
        let status: OrderStatus = serde_json::from_str("\"confirmed\"").unwrap();
        assert_eq!(status, OrderStatus::Confirmed);
    }
}
