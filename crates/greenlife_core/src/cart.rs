//! crates/greenlife_core/src/cart.rs
//!
//! The shopper's cart. Every mutation writes the whole cart through to the
//! injected `Persistence` under `CART_KEY`, so a restarted session picks up
//! where it left off.

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{CartLine, OrderItem, Product};
use crate::ports::Persistence;

/// Storage key holding the serialized cart (a JSON array of lines).
pub const CART_KEY: &str = "gl_cart";

/// Orders above this subtotal ship for free.
fn free_shipping_threshold() -> Decimal {
    Decimal::new(50, 0)
}

fn flat_shipping_rate() -> Decimal {
    Decimal::new(599, 2)
}

/// Display totals for the cart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

pub struct CartStore {
    lines: Vec<CartLine>,
    persistence: Arc<dyn Persistence>,
}

impl CartStore {
    /// Restores the cart saved under `CART_KEY`. A missing, unreadable or
    /// corrupt entry yields an empty cart.
    pub fn load(persistence: Arc<dyn Persistence>) -> Self {
        let lines = match persistence.load(CART_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => lines,
                Err(e) => {
                    warn!("Discarding unreadable saved cart: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read saved cart: {}", e);
                Vec::new()
            }
        };
        debug!("Cart loaded with {} line(s)", lines.len());
        Self { lines, persistence }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn cart_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Σ price × quantity, or `None` if the amount is out of range.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.line_total()?))
    }

    pub fn summary(&self) -> Option<CartSummary> {
        let subtotal = self.subtotal()?;
        let shipping = if subtotal > free_shipping_threshold() {
            Decimal::ZERO
        } else {
            flat_shipping_rate()
        };
        Some(CartSummary {
            subtotal,
            shipping,
            total: subtotal.checked_add(shipping)?,
        })
    }

    /// Copies the current lines into order items.
    pub fn snapshot(&self) -> Vec<OrderItem> {
        self.lines.iter().map(CartLine::to_order_item).collect()
    }

    /// Adds one unit of `product`, merging with an existing line for the same id.
    pub fn add_to_cart(&mut self, product: &Product) {
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::new(product)),
        }
        self.persist();
    }

    pub fn remove_from_cart(&mut self, product_id: Uuid) {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        if self.lines.len() != before {
            self.persist();
        }
    }

    /// Shifts a line's quantity by `delta`, never below one.
    pub fn update_quantity(&mut self, product_id: Uuid, delta: i64) {
        let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) else {
            return;
        };
        let next = i64::from(line.quantity)
            .saturating_add(delta)
            .clamp(1, i64::from(u32::MAX));
        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        self.persist();
    }

    pub fn clear_cart(&mut self) {
        self.lines.clear();
        self.persist();
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.lines)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.persistence
                    .save(CART_KEY, &json)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            warn!("Failed to persist cart: {}", e);
        }
    }
}
