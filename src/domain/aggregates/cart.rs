//! Cart Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::value_objects::{ColorLabel, Money, Quantity};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cart {
    id: Uuid,
    items: Vec<CartItem>,
    subtotal: Money,
    currency: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// One product in one color. The label is fixed once the line exists;
/// a different color is a different line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub title: String,
    pub quantity: Quantity,
    pub color_name: ColorLabel,
    pub image: Option<String>,
    pub unit_price: Money,
}

impl CartItem {
    pub fn line_total(&self) -> Money { self.unit_price.multiply(self.quantity.value()) }

    fn same_line(&self, product_id: &str, color: &ColorLabel) -> bool {
        self.product_id == product_id && self.color_name.same_identity(color)
    }
}

impl Cart {
    pub fn new(currency: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(), items: vec![], subtotal: Money::zero(currency),
            currency: currency.to_string(), created_at: now, updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn subtotal(&self) -> &Money { &self.subtotal }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Adds the item, merging into an existing line of the same product and color.
    pub fn add_item(&mut self, item: CartItem) -> Result<(), CartError> {
        if item.unit_price.currency() != self.currency {
            return Err(CartError::CurrencyMismatch(item.unit_price.currency().to_string()));
        }
        match self.items.iter_mut().find(|i| i.same_line(&item.product_id, &item.color_name)) {
            Some(existing) => existing.quantity = existing.quantity.add(item.quantity),
            None => self.items.push(item),
        }
        self.recalculate();
        Ok(())
    }

    pub(crate) fn into_items(self) -> Vec<CartItem> { self.items }

    fn recalculate(&mut self) {
        self.subtotal = self.items.iter().fold(Money::zero(&self.currency), |acc, i| acc.add(&i.line_total()).unwrap_or(acc));
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Cart is priced in another currency than {0}")]
    CurrencyMismatch(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(color: ColorLabel, quantity: u32) -> CartItem {
        CartItem {
            product_id: "P1".into(), title: "Robe".into(), quantity: Quantity::new(quantity).unwrap(),
            color_name: color, image: None, unit_price: Money::dzd(Decimal::new(10, 0)),
        }
    }

    fn navy() -> ColorLabel { ColorLabel::new("Navy", "Bleu marine", "كحلي") }

    #[test]
    fn test_cart_operations() {
        let mut cart = Cart::new("DZD");
        cart.add_item(item(navy(), 2)).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.subtotal().amount(), Decimal::new(20, 0));
        cart.add_item(item(ColorLabel::new("navy", "", ""), 1)).unwrap();
        assert_eq!(cart.items()[0].quantity.value(), 3); // Merged
        assert_eq!(cart.items()[0].color_name, navy());
        cart.add_item(item(ColorLabel::uniform("Red"), 1)).unwrap();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.subtotal().amount(), Decimal::new(40, 0));
    }

    #[test]
    fn test_rejects_foreign_currency() {
        let mut cart = Cart::new("EUR");
        assert!(matches!(cart.add_item(item(navy(), 1)), Err(CartError::CurrencyMismatch(_))));
    }
}
