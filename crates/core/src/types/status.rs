//! Order status.
//!
//! The console does not enforce a transition graph: any status may be set
//! from any other. Whether a transition is valid is the backend's call.

use serde::{Deserialize, Serialize};

/// Error returned when a status name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid order status: {0} (expected Processing, Shipped, Delivered or Cancelled)")]
pub struct StatusParseError(pub String);

/// Order fulfilment status as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 4] = [
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Backend spelling of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusParseError;

    /// Case-insensitive; accepts the British and American spellings of
    /// "cancelled".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(StatusParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_status_parse_is_lenient() {
        assert_eq!("  shipped ".parse(), Ok(OrderStatus::Shipped));
        assert_eq!("Canceled".parse(), Ok(OrderStatus::Cancelled));
        assert!("Lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_backend_spelling() {
        let json = serde_json::to_string(&OrderStatus::Delivered).ok();
        assert_eq!(json.as_deref(), Some("\"Delivered\""));
    }
}
