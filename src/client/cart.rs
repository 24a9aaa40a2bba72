use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    client::storage::Storage,
    dto::payment::CartLine,
    models::{CategoryRef, Product},
};

pub const CART_KEY: &str = "cart";

/// A product as it was when it went into the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
}

impl From<&Product> for CartItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            price: product.price,
            category: Some(product.category.clone()),
        }
    }
}

/// Formats an amount as US dollars, e.g. `$1,234.50`.
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}${grouped}.{cents}")
}

/// The shopper's cart. Repeats are allowed; every entry is its own line.
///
/// Mutations only touch memory. [`CartStore::persist`] mirrors the list to
/// storage, and the convenience mutators call it themselves. Storage
/// failures are logged and swallowed so the in-memory cart stays usable.
pub struct CartStore {
    storage: Arc<dyn Storage>,
    items: Vec<CartItem>,
}

impl CartStore {
    /// Hydrates from storage; a missing or unreadable entry is an empty cart.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let items = match storage.get_item(CART_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "stored cart is unreadable, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored cart");
                Vec::new()
            }
        };
        Self { storage, items }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn set_cart(&mut self, items: Vec<CartItem>) {
        self.items = items;
    }

    pub fn persist(&self) {
        let raw = match serde_json::to_string(&self.items) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode cart");
                return;
            }
        };
        if let Err(err) = self.storage.set_item(CART_KEY, &raw) {
            tracing::warn!(error = %err, "failed to persist cart");
        }
    }

    pub fn add_item(&mut self, item: CartItem) {
        self.items.push(item);
        self.persist();
    }

    /// Removes the first line for `id`; later repeats stay in the cart.
    pub fn remove_item(&mut self, id: Uuid) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };
        self.items.remove(index);
        self.persist();
        true
    }

    /// Empties the cart and drops it from storage.
    pub fn clear(&mut self) {
        self.items.clear();
        if let Err(err) = self.storage.remove_item(CART_KEY) {
            tracing::warn!(error = %err, "failed to remove stored cart");
        }
    }

    /// Saturates at `Decimal::MAX` instead of overflowing.
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |total, item| total.saturating_add(item.price))
    }

    pub fn total_display(&self) -> String {
        format_usd(self.total())
    }

    pub fn payment_lines(&self) -> Vec<CartLine> {
        self.items
            .iter()
            .map(|item| CartLine {
                id: item.id,
                price: item.price,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_dollars_with_grouping() {
        assert_eq!(format_usd(Decimal::new(498, 0)), "$498.00");
        assert_eq!(format_usd(Decimal::new(123_456_75, 2)), "$123,456.75");
        assert_eq!(format_usd(Decimal::new(1_000, 0)), "$1,000.00");
        assert_eq!(format_usd(Decimal::ZERO), "$0.00");
        assert_eq!(format_usd(Decimal::new(-25, 1)), "-$2.50");
    }
}
