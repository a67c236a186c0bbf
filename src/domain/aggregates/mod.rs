//! Aggregates module
pub mod order;
pub mod cart;
pub mod fulfillment;

pub use order::{Order, OrderError, OrderFlags, OrderLine};
pub use cart::{Cart, CartError, CartItem};
pub use fulfillment::FulfillmentProgress;
