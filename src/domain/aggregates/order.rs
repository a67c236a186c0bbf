//! Order Aggregate

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::cart::{Cart, CartItem};
use super::fulfillment::FulfillmentProgress;
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::value_objects::{ColorLabel, Language, Money, ProgressPercent, Quantity, UnitKey};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: Uuid,
    order_number: String,
    email: String,
    lines: Vec<OrderLine>,
    is_paid: bool,
    is_delivered: bool,
    #[serde(rename = "productProgress", default)]
    progress: FulfillmentProgress,
    #[serde(default)]
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

/// A product in one color, ordered `quantity` times.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub title: String,
    pub quantity: Quantity,
    pub color_name: ColorLabel,
    pub image: Option<String>,
    pub unit_price: Money,
}

impl OrderLine {
    pub fn total(&self) -> Money { self.unit_price.multiply(self.quantity.value()) }

    /// Color text used inside unit keys.
    pub fn key_color(&self, lang: Language) -> &str {
        self.color_name.project(lang).unwrap_or_default()
    }
}

impl From<CartItem> for OrderLine {
    fn from(item: CartItem) -> Self {
        Self {
            product_id: item.product_id, title: item.title, quantity: item.quantity,
            color_name: item.color_name, image: item.image, unit_price: item.unit_price,
        }
    }
}

/// Partial update of the payment/delivery flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFlags {
    pub is_paid: Option<bool>,
    pub is_delivered: Option<bool>,
}

impl Order {
    /// Checkout: turns the cart's lines into a new order with no progress recorded.
    pub fn from_cart(email: impl Into<String>, cart: Cart) -> Result<Self, OrderError> {
        if cart.is_empty() { return Err(OrderError::NoItems); }
        let now = Utc::now();
        let mut order = Self {
            id: Uuid::now_v7(), order_number: format!("ORD-{:08}", rand::random::<u32>()), email: email.into(),
            lines: cart.into_items().into_iter().map(OrderLine::from).collect(),
            is_paid: false, is_delivered: false, progress: FulfillmentProgress::default(), version: 0,
            created_at: now, updated_at: now, events: vec![],
        };
        order.raise_event(DomainEvent::Order(OrderEvent::Created { order_id: order.id, email: order.email.clone(), units: order.unit_count() }));
        Ok(order)
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn order_number(&self) -> &str { &self.order_number }
    pub fn email(&self) -> &str { &self.email }
    pub fn lines(&self) -> &[OrderLine] { &self.lines }
    pub fn is_paid(&self) -> bool { self.is_paid }
    pub fn is_delivered(&self) -> bool { self.is_delivered }
    pub fn progress(&self) -> &FulfillmentProgress { &self.progress }
    pub fn version(&self) -> u64 { self.version }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
    pub fn unit_count(&self) -> u32 { self.lines.iter().map(|l| l.quantity.value()).sum() }

    pub fn total(&self) -> Money {
        let currency = self.lines.first().map_or("DZD", |l| l.unit_price.currency());
        self.lines.iter().fold(Money::zero(currency), |acc, l| acc.add(&l.total()).unwrap_or(acc))
    }

    /// One key per physical unit. Occurrences count from zero per
    /// (product, color) pair across the whole order.
    pub fn unit_keys(&self, lang: Language) -> Vec<UnitKey> {
        self.line_unit_keys(lang).into_iter().flatten().collect()
    }

    /// Unit keys grouped by line, in line order.
    fn line_unit_keys(&self, lang: Language) -> Vec<Vec<UnitKey>> {
        let mut seen: HashMap<(&str, &str), u32> = HashMap::new();
        let mut lines = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let color = line.key_color(lang);
            let next = seen.entry((line.product_id.as_str(), color)).or_insert(0);
            let mut keys = Vec::with_capacity(line.quantity.value() as usize);
            for _ in 0..line.quantity.value() {
                keys.push(UnitKey::new(line.product_id.as_str(), color, *next));
                *next += 1;
            }
            lines.push(keys);
        }
        lines
    }

    pub fn has_unit(&self, key: &UnitKey, lang: Language) -> bool {
        self.unit_keys(lang).contains(key)
    }

    pub fn progress_of(&self, key: &UnitKey) -> ProgressPercent { self.progress.get(key) }

    pub fn completion(&self, lang: Language) -> u8 { self.progress.completion(&self.unit_keys(lang)) }

    /// Records `value` for one unit and returns the previous value.
    pub fn set_progress(&mut self, key: &UnitKey, value: ProgressPercent, lang: Language) -> Result<ProgressPercent, OrderError> {
        if !self.has_unit(key, lang) {
            return Err(OrderError::UnknownUnit(key.to_string()));
        }
        let previous = self.progress.set(key, value);
        self.touch();
        self.raise_event(DomainEvent::Order(OrderEvent::ProgressUpdated { order_id: self.id, unit_key: key.to_string(), from: previous, to: value }));
        if value.triggers_notification() {
            self.raise_event(DomainEvent::Order(OrderEvent::ThresholdReached { order_id: self.id, product_key: key.notification_key(), progress: value }));
        }
        Ok(previous)
    }

    pub fn apply_flags(&mut self, flags: OrderFlags) {
        if let Some(paid) = flags.is_paid { self.is_paid = paid; }
        if let Some(delivered) = flags.is_delivered { self.is_delivered = delivered; }
        self.touch();
        self.raise_event(DomainEvent::Order(OrderEvent::FlagsUpdated { order_id: self.id, is_paid: self.is_paid, is_delivered: self.is_delivered }));
    }

    /// Partial cancellation of `count` units from one line.
    ///
    /// The line's last units go; a line that reaches zero is dropped.
    /// Removal can renumber units of later lines sharing the same key, so
    /// surviving units carry their progress to their new keys. Entries of
    /// removed units are dropped and returned. Removing every unit of the
    /// order is refused: that is a cancellation of the whole order.
    pub fn remove_quantity(&mut self, line: usize, count: u32, lang: Language) -> Result<Vec<String>, OrderError> {
        if count == 0 { return Err(OrderError::InvalidQuantity); }
        let target = self.lines.get(line).ok_or(OrderError::LineNotFound(line))?;
        if count >= self.unit_count() { return Err(OrderError::WouldBeEmpty); }
        let left = target.quantity.subtract(count).map_err(|_| OrderError::InvalidQuantity)?;

        let mut survivors = self.line_unit_keys(lang);
        match left {
            Some(quantity) => {
                if let Some(keys) = survivors.get_mut(line) { keys.truncate(quantity.value() as usize); }
                if let Some(l) = self.lines.get_mut(line) { l.quantity = quantity; }
            }
            None => {
                survivors.remove(line);
                self.lines.remove(line);
            }
        }
        let moves: Vec<(UnitKey, UnitKey)> = survivors.into_iter().flatten().zip(self.unit_keys(lang)).collect();
        let pruned = self.progress.carry_over(&moves);
        self.touch();
        self.raise_event(DomainEvent::Order(OrderEvent::UnitsRemoved { order_id: self.id, line, removed: count, pruned_keys: pruned.clone() }));
        Ok(pruned)
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    /// Copy without pending events, as persisted.
    pub(crate) fn snapshot(&self) -> Order { Order { events: vec![], ..self.clone() } }
    pub(crate) fn set_version(&mut self, version: u64) { self.version = version; }
    pub(crate) fn replace_progress(&mut self, progress: FulfillmentProgress) { self.progress = progress; self.touch(); }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("No items")]
    NoItems,
    #[error("Order has no line {0}")]
    LineNotFound(usize),
    #[error("Invalid quantity")]
    InvalidQuantity,
    #[error("Removing every unit cancels the order; delete it instead")]
    WouldBeEmpty,
    #[error("Order has no unit {0}")]
    UnknownUnit(String),
}
