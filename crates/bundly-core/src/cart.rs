//! # Cart Snapshot Model
//!
//! The read-only cart input the host hands to each evaluation call.
//!
//! ## Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Snapshot Inputs                               │
//! │                                                                         │
//! │  Host platform (per cart change)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Cart { lines, delivery_groups, currency_code }                         │
//! │       │                                                                 │
//! │       ├── CartLine { id, quantity, product, cost }                      │
//! │       │        └── ProductRef { id, bundle_document }                   │
//! │       │                              │                                  │
//! │       │                              └── opaque JSON, pre-resolved      │
//! │       │                                  by the host (no lookups here)  │
//! │       │                                                                 │
//! │       └── DeliveryGroup { id }   (shipping destinations)                │
//! │                                                                         │
//! │  The engine NEVER mutates the cart. All configuration arrives           │
//! │  pre-resolved; evaluation performs no I/O.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Cart
// =============================================================================

/// One cart snapshot: the complete input for one evaluation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Line items, in cart order. Order matters for bundle discovery
    /// (first document per bundle id wins).
    #[serde(default)]
    pub lines: Vec<CartLine>,

    /// Shipping destinations; relevant only to the shipping pass.
    #[serde(default)]
    pub delivery_groups: Vec<DeliveryGroup>,

    /// The cart's display currency (ISO 4217 code, e.g. "USD").
    pub currency_code: String,
}

impl Cart {
    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// A single line item on the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Host-assigned line identifier, unique within the cart.
    pub id: String,

    /// Units of the product on this line.
    pub quantity: i64,

    /// The referenced product.
    pub product: ProductRef,

    /// Line cost snapshot in the cart's display currency.
    pub cost: LineCost,
}

/// Reference to a product, with its bundle configuration pre-attached by
/// the host when the product carries one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    /// Host product identifier (opaque string).
    pub id: String,

    /// Opaque bundle document, if this product is a bundle's source of
    /// truth. Parsed tolerantly during discovery.
    #[serde(default)]
    pub bundle_document: Option<String>,
}

/// The line's subtotal cost at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineCost {
    /// Subtotal amount for the line (quantity × unit price).
    pub subtotal_amount: f64,

    /// Currency of `subtotal_amount`; matches the cart's display currency.
    pub currency_code: String,
}

// =============================================================================
// Delivery Group
// =============================================================================

/// A shipping destination on the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryGroup {
    /// Host delivery group identifier.
    pub id: String,
}

// =============================================================================
// Discount Class
// =============================================================================

/// Host-defined category gating which discount types may be produced in a
/// given evaluation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountClass {
    Order,
    Product,
    Shipping,
}

impl DiscountClass {
    /// Whether the requested class set permits order-subtotal operations.
    pub fn allows_line_discounts(classes: &[DiscountClass]) -> bool {
        classes
            .iter()
            .any(|class| matches!(class, DiscountClass::Order | DiscountClass::Product))
    }

    /// Whether the requested class set permits delivery operations.
    pub fn allows_shipping_discounts(classes: &[DiscountClass]) -> bool {
        classes.contains(&DiscountClass::Shipping)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
