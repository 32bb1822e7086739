//! Basket domain types.

use roya_core::{BasketId, LineItem, NO_DESCRIPTION, UNTITLED};
use rust_decimal::Decimal;

/// A basket with its embedded line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Basket {
    pub id: BasketId,
    pub title: String,
    pub description: String,
    /// Last write time in epoch milliseconds.
    pub time: i64,
    pub line_items: Vec<LineItem>,
}

impl Basket {
    /// Assemble a basket, substituting placeholders for a missing title or
    /// description and stamping it with the current time.
    #[must_use]
    pub fn stamped(
        id: BasketId,
        title: Option<String>,
        description: Option<String>,
        line_items: Vec<LineItem>,
    ) -> Self {
        Self {
            id,
            title: title.unwrap_or_else(|| UNTITLED.to_owned()),
            description: description.unwrap_or_else(|| NO_DESCRIPTION.to_owned()),
            time: chrono::Utc::now().timestamp_millis(),
            line_items,
        }
    }

    /// Sum of unit price × count over the line items, or `None` if it
    /// overflows. Never stored.
    #[must_use]
    pub fn total_price(&self) -> Option<Decimal> {
        roya_core::total_price(&self.line_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamped_applies_placeholders() {
        let basket = Basket::stamped(BasketId::generate(), None, None, vec![]);
        assert_eq!(basket.title, UNTITLED);
        assert_eq!(basket.description, NO_DESCRIPTION);
        assert!(basket.time > 0);
    }

    #[test]
    fn test_stamped_keeps_supplied_text() {
        let basket = Basket::stamped(
            BasketId::generate(),
            Some("Wedding".to_string()),
            Some("For the reception".to_string()),
            vec![],
        );
        assert_eq!(basket.title, "Wedding");
        assert_eq!(basket.description, "For the reception");
    }

    #[test]
    fn test_total_price() {
        let item = |price: i64, count: u32| LineItem {
            title: "Vase".to_string(),
            color: "Blue".to_string(),
            price: Decimal::from(price),
            count,
        };
        let basket = Basket::stamped(
            BasketId::generate(),
            None,
            None,
            vec![item(1000, 2), item(500, 1)],
        );
        assert_eq!(basket.total_price(), Some(Decimal::from(2500)));
    }
}
