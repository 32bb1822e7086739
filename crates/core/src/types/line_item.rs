//! Basket line items.
//!
//! A line item is a copy of a product's title taken when the basket is
//! written, together with its own color, unit price and count. Line items
//! never reference the live product catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Title stored for a basket submitted without one.
pub const UNTITLED: &str = "Untitled";

/// Description stored for a basket submitted without one.
pub const NO_DESCRIPTION: &str = "No description";

/// One entry in a basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub title: String,
    pub color: String,
    /// Unit price.
    pub price: Decimal,
    pub count: u32,
}

impl LineItem {
    /// Build a line item from raw form input.
    ///
    /// Returns `None` unless all four fields are present: title and color
    /// non-blank, price a non-negative decimal, count a positive integer.
    /// A row whose subtotal does not fit in a `Decimal` is rejected too.
    #[must_use]
    pub fn from_parts(title: &str, color: &str, price: &str, count: &str) -> Option<Self> {
        let title = title.trim();
        let color = color.trim();
        if title.is_empty() || color.is_empty() {
            return None;
        }

        let price: Decimal = price.trim().parse().ok()?;
        let count: u32 = count.trim().parse().ok()?;
        if price.is_sign_negative() || count == 0 {
            return None;
        }

        let item = Self {
            title: title.to_owned(),
            color: color.to_owned(),
            price,
            count,
        };
        item.subtotal().map(|_| item)
    }

    /// Unit price multiplied by count, or `None` on overflow.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.count))
    }
}

/// Sum of `price × count` over all line items, or `None` if any step
/// overflows.
#[must_use]
pub fn total_price(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.subtotal()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: i64, count: u32) -> LineItem {
        LineItem {
            title: "Mug".to_string(),
            color: "Red".to_string(),
            price: Decimal::from(price),
            count,
        }
    }

    #[test]
    fn test_total_price_sums_subtotals() {
        let items = vec![item(1000, 2), item(500, 1)];
        assert_eq!(total_price(&items), Some(Decimal::from(2500)));
    }

    #[test]
    fn test_total_price_empty() {
        assert_eq!(total_price(&[]), Some(Decimal::ZERO));
    }

    #[test]
    fn test_subtotal_overflow_is_none() {
        let huge = LineItem {
            price: Decimal::MAX,
            ..item(0, 2)
        };
        assert_eq!(huge.subtotal(), None);
        assert_eq!(total_price(&[item(1000, 2), huge]), None);
    }

    #[test]
    fn test_total_price_sum_overflow_is_none() {
        let half = LineItem {
            price: "50000000000000000000000000000".parse().unwrap_or_default(),
            ..item(0, 1)
        };
        assert!(half.subtotal().is_some());
        assert_eq!(total_price(&[half.clone(), half]), None);
    }

    #[test]
    fn test_total_price_fractional() {
        let items = vec![LineItem {
            price: "2.50".parse().unwrap_or_default(),
            ..item(0, 3)
        }];
        assert_eq!(total_price(&items), "7.50".parse::<Decimal>().ok());
    }

    #[test]
    fn test_from_parts_accepts_complete_row() {
        let parsed = LineItem::from_parts(" Mug ", "Red", "1000", "2");
        assert_eq!(parsed, Some(item(1000, 2)));
    }

    #[test]
    fn test_from_parts_rejects_missing_fields() {
        assert_eq!(LineItem::from_parts("", "Red", "1000", "2"), None);
        assert_eq!(LineItem::from_parts("Mug", "  ", "1000", "2"), None);
        assert_eq!(LineItem::from_parts("Mug", "Red", "", "2"), None);
        assert_eq!(LineItem::from_parts("Mug", "Red", "1000", ""), None);
    }

    #[test]
    fn test_from_parts_accepts_free_item() {
        assert_eq!(LineItem::from_parts("Mug", "Red", "0", "2"), Some(item(0, 2)));
    }

    #[test]
    fn test_from_parts_rejects_overflowing_subtotal() {
        let parsed = LineItem::from_parts("Mug", "Red", "100000000000000000000", "4294967295");
        assert_eq!(parsed, None);
    }

    #[test]
    fn test_from_parts_rejects_zero_count_and_garbage() {
        assert_eq!(LineItem::from_parts("Mug", "Red", "1000", "0"), None);
        assert_eq!(LineItem::from_parts("Mug", "Red", "-5", "2"), None);
        assert_eq!(LineItem::from_parts("Mug", "Red", "abc", "2"), None);
        assert_eq!(LineItem::from_parts("Mug", "Red", "1000", "1.5"), None);
    }

    #[test]
    fn test_line_item_json_shape() {
        let json = serde_json::to_value(item(1000, 2)).unwrap_or_default();
        assert_eq!(json["title"], "Mug");
        assert_eq!(json["price"], "1000");
        assert_eq!(json["count"], 2);
    }
}
