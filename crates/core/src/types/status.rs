//! Status enums for catalog entities.

use serde::{Deserialize, Serialize};

/// Product availability status.
///
/// Maps to Wix Catalog V3 `inventory.availabilityStatus` values. Unknown
/// values deserialize as [`AvailabilityStatus::Unknown`] so new vendor
/// statuses never break product parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    InStock,
    OutOfStock,
    PartiallyOutOfStock,
    Preorder,
    #[default]
    #[serde(other)]
    Unknown,
}

impl AvailabilityStatus {
    /// Whether at least part of the product can be bought right now.
    #[must_use]
    pub const fn is_purchasable(self) -> bool {
        matches!(
            self,
            Self::InStock | Self::PartiallyOutOfStock | Self::Preorder
        )
    }

    /// Wire value used in search filters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "IN_STOCK",
            Self::OutOfStock => "OUT_OF_STOCK",
            Self::PartiallyOutOfStock => "PARTIALLY_OUT_OF_STOCK",
            Self::Preorder => "PREORDER",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_parses_vendor_values() {
        let status: AvailabilityStatus = serde_json::from_str("\"IN_STOCK\"").unwrap();
        assert_eq!(status, AvailabilityStatus::InStock);

        let status: AvailabilityStatus =
            serde_json::from_str("\"PARTIALLY_OUT_OF_STOCK\"").unwrap();
        assert!(status.is_purchasable());
    }

    #[test]
    fn test_unknown_availability() {
        let status: AvailabilityStatus = serde_json::from_str("\"BACKORDER\"").unwrap();
        assert_eq!(status, AvailabilityStatus::Unknown);
        assert!(!status.is_purchasable());
    }
}
