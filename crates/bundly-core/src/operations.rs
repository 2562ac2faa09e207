//! # Discount Operations
//!
//! The output model handed back to the host, and the builders that turn a
//! satisfied bundle + selected rule into operations.
//!
//! ## Targeting
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Operation Targeting                                 │
//! │                                                                         │
//! │  Cart:  [l1: P1×2]  [l2: P1×1]  [l3: Unrelated×4]                      │
//! │                                                                         │
//! │  Bundle matched lines: {l1, l2}                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderSubtotal operation EXCLUDES every non-matching line (l3),        │
//! │  so the discount only touches the bundle's own items' subtotal,        │
//! │  never unrelated cart contents.                                        │
//! │                                                                         │
//! │  FreeShipping is a different operation category in the hosting          │
//! │  system: one Delivery operation per delivery group, built by the        │
//! │  shipping pass only — never by the line/order pathway.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host applies operations under its own combination policy; the engine
//! only declares magnitude and scope.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::cart::Cart;
use crate::currency::{self, CurrencyTable};
use crate::definition::{BundleDefinition, DiscountMethod, DiscountRule};
use crate::matching::BundleMatchResult;

// =============================================================================
// Operation Types
// =============================================================================

/// A request to add one discount candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum DiscountOperation {
    /// Discount the order subtotal, excluding the listed lines.
    OrderSubtotal(OrderSubtotalOperation),
    /// Discount one delivery group.
    Delivery(DeliveryOperation),
}

impl DiscountOperation {
    /// The shopper-facing message on this operation.
    pub fn message(&self) -> &str {
        match self {
            DiscountOperation::OrderSubtotal(op) => &op.message,
            DiscountOperation::Delivery(op) => &op.message,
        }
    }

    /// The declared discount magnitude.
    pub fn value(&self) -> &DiscountValue {
        match self {
            DiscountOperation::OrderSubtotal(op) => &op.value,
            DiscountOperation::Delivery(op) => &op.value,
        }
    }
}

/// An order-subtotal discount candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubtotalOperation {
    /// Human-readable reason, e.g. `"Snack Pack: $10 OFF"`.
    pub message: String,

    /// Discount magnitude.
    pub value: DiscountValue,

    /// Cart line ids the discount must NOT touch (everything outside the
    /// bundle's matched lines).
    pub excluded_cart_line_ids: Vec<String>,
}

/// A delivery-group discount candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOperation {
    /// Human-readable reason, e.g. `"Snack Pack: FREE SHIPPING"`.
    pub message: String,

    /// Discount magnitude (100% for free shipping).
    pub value: DiscountValue,

    /// The delivery group this operation targets.
    pub delivery_group_id: String,
}

/// Magnitude of a discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum DiscountValue {
    /// Fixed amount in the cart's display currency.
    FixedAmount { amount: f64, currency_code: String },
    /// Raw percentage, 0-100.
    Percentage { value: f64 },
}

// =============================================================================
// Builders
// =============================================================================

/// Builds the order-subtotal operation(s) for a satisfied bundle.
///
/// ## Contract
/// - `fixed_amount_off`: requires `rule.fixed_amount_off > 0`; the
///   reference-currency amount is converted to the cart currency first
/// - `percentage_off`: requires `rule.percentage_off > 0`; no conversion
/// - `free_shipping`: never emitted here — the shipping pass owns it
pub fn build_line_operations(
    bundle: &BundleDefinition,
    match_result: &BundleMatchResult,
    rule: &DiscountRule,
    cart: &Cart,
    table: &CurrencyTable,
) -> Vec<DiscountOperation> {
    let Some(pricing) = &bundle.pricing else {
        return Vec::new();
    };

    match pricing.discount_method {
        DiscountMethod::FixedAmountOff => {
            if rule.fixed_amount_off <= 0.0 {
                debug!(bundle = %bundle.id, "fixed amount tier has no positive amount");
                return Vec::new();
            }
            let amount = table.convert(rule.fixed_amount_off, &cart.currency_code);
            let message = format!(
                "{}: {}{} OFF",
                bundle.name,
                currency::symbol(&cart.currency_code),
                currency::format_amount(amount),
            );
            vec![DiscountOperation::OrderSubtotal(OrderSubtotalOperation {
                message,
                value: DiscountValue::FixedAmount {
                    amount,
                    currency_code: cart.currency_code.clone(),
                },
                excluded_cart_line_ids: excluded_line_ids(cart, &match_result.matching_line_ids),
            })]
        }
        DiscountMethod::PercentageOff => {
            if rule.percentage_off <= 0.0 {
                debug!(bundle = %bundle.id, "percentage tier has no positive percentage");
                return Vec::new();
            }
            let message = format!(
                "{}: {}% OFF",
                bundle.name,
                currency::format_amount(rule.percentage_off),
            );
            vec![DiscountOperation::OrderSubtotal(OrderSubtotalOperation {
                message,
                value: DiscountValue::Percentage {
                    value: rule.percentage_off,
                },
                excluded_cart_line_ids: excluded_line_ids(cart, &match_result.matching_line_ids),
            })]
        }
        DiscountMethod::FreeShipping => {
            // Shipping and line discounts are different operation categories
            // in the hosting system; this bundle is routed to the shipping pass.
            debug!(bundle = %bundle.id, "free shipping bundle skipped on the line pathway");
            Vec::new()
        }
    }
}

/// Builds one 100%-off delivery operation per delivery group on the cart.
pub fn build_shipping_operations(bundle: &BundleDefinition, cart: &Cart) -> Vec<DiscountOperation> {
    cart.delivery_groups
        .iter()
        .map(|group| {
            DiscountOperation::Delivery(DeliveryOperation {
                message: format!("{}: FREE SHIPPING", bundle.name),
                value: DiscountValue::Percentage { value: 100.0 },
                delivery_group_id: group.id.clone(),
            })
        })
        .collect()
}

/// Every cart line id outside the matched set; the fixed/percentage
/// discount is deducted only from the bundle's own items' subtotal.
fn excluded_line_ids(cart: &Cart, matching_line_ids: &[String]) -> Vec<String> {
    cart.lines
        .iter()
        .filter(|line| !matching_line_ids.iter().any(|id| id == &line.id))
        .map(|line| line.id.clone())
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::cart::{CartLine, DeliveryGroup, LineCost, ProductRef};
    use crate::definition::PricingPolicy;

    fn line(id: &str, product_id: &str, quantity: i64) -> CartLine {
        CartLine {
            id: id.to_string(),
            quantity,
            product: ProductRef {
                id: product_id.to_string(),
                bundle_document: None,
            },
            cost: LineCost {
                subtotal_amount: 5.0 * quantity as f64,
                currency_code: "USD".to_string(),
            },
        }
    }

    fn cart(lines: Vec<CartLine>, groups: Vec<&str>, currency: &str) -> Cart {
        Cart {
            lines,
            delivery_groups: groups
                .into_iter()
                .map(|id| DeliveryGroup { id: id.to_string() })
                .collect(),
            currency_code: currency.to_string(),
        }
    }

    fn bundle(name: &str, method: DiscountMethod) -> BundleDefinition {
        BundleDefinition {
            id: "b1".to_string(),
            name: name.to_string(),
            steps: BTreeMap::new(),
            pricing: Some(PricingPolicy {
                enable_discount: true,
                discount_method: method,
                rules: vec![],
            }),
        }
    }

    fn matched(ids: &[&str], total: i64) -> BundleMatchResult {
        BundleMatchResult {
            matching_line_ids: ids.iter().map(|id| id.to_string()).collect(),
            total_quantity: total,
            conditions_met: true,
        }
    }

    fn rule(fixed: f64, percentage: f64) -> DiscountRule {
        DiscountRule {
            minimum_quantity: 1,
            fixed_amount_off: fixed,
            percentage_off: percentage,
        }
    }

    #[test]
    fn test_fixed_amount_operation() {
        let cart = cart(
            vec![line("l1", "p1", 2), line("l2", "unrelated", 1)],
            vec![],
            "USD",
        );
        let bundle = bundle("Snack Pack", DiscountMethod::FixedAmountOff);
        let ops = build_line_operations(
            &bundle,
            &matched(&["l1"], 2),
            &rule(10.0, 0.0),
            &cart,
            &CurrencyTable::default(),
        );

        assert_eq!(ops.len(), 1);
        let DiscountOperation::OrderSubtotal(op) = &ops[0] else {
            panic!("expected an order-subtotal operation");
        };
        assert_eq!(op.message, "Snack Pack: $10 OFF");
        assert_eq!(
            op.value,
            DiscountValue::FixedAmount {
                amount: 10.0,
                currency_code: "USD".to_string()
            }
        );
        // Unrelated cart contents are shielded from the discount
        assert_eq!(op.excluded_cart_line_ids, vec!["l2"]);
    }

    #[test]
    fn test_fixed_amount_is_converted_to_cart_currency() {
        let cart = cart(vec![line("l1", "p1", 2)], vec![], "EUR");
        let bundle = bundle("Snack Pack", DiscountMethod::FixedAmountOff);
        let table =
            CurrencyTable::new([("EUR".to_string(), 0.92)].into_iter().collect());

        let ops =
            build_line_operations(&bundle, &matched(&["l1"], 2), &rule(10.0, 0.0), &cart, &table);
        let DiscountOperation::OrderSubtotal(op) = &ops[0] else {
            panic!("expected an order-subtotal operation");
        };
        assert_eq!(op.message, "Snack Pack: €9.20 OFF");
        assert_eq!(
            op.value,
            DiscountValue::FixedAmount {
                amount: 9.2,
                currency_code: "EUR".to_string()
            }
        );
    }

    #[test]
    fn test_fixed_amount_requires_positive_amount() {
        let cart = cart(vec![line("l1", "p1", 2)], vec![], "USD");
        let bundle = bundle("Snack Pack", DiscountMethod::FixedAmountOff);
        let ops = build_line_operations(
            &bundle,
            &matched(&["l1"], 2),
            &rule(0.0, 0.0),
            &cart,
            &CurrencyTable::default(),
        );
        assert!(ops.is_empty());
    }

    #[test]
    fn test_percentage_operation() {
        let cart = cart(vec![line("l1", "p1", 2)], vec![], "USD");
        let bundle = bundle("Snack Pack", DiscountMethod::PercentageOff);
        let ops = build_line_operations(
            &bundle,
            &matched(&["l1"], 2),
            &rule(0.0, 15.0),
            &cart,
            &CurrencyTable::default(),
        );

        let DiscountOperation::OrderSubtotal(op) = &ops[0] else {
            panic!("expected an order-subtotal operation");
        };
        assert_eq!(op.message, "Snack Pack: 15% OFF");
        assert_eq!(op.value, DiscountValue::Percentage { value: 15.0 });
        assert!(op.excluded_cart_line_ids.is_empty());
    }

    #[test]
    fn test_percentage_requires_positive_percentage() {
        let cart = cart(vec![line("l1", "p1", 2)], vec![], "USD");
        let bundle = bundle("Snack Pack", DiscountMethod::PercentageOff);
        let ops = build_line_operations(
            &bundle,
            &matched(&["l1"], 2),
            &rule(10.0, 0.0), // fixed amount set, but method is percentage
            &cart,
            &CurrencyTable::default(),
        );
        assert!(ops.is_empty());
    }

    #[test]
    fn test_free_shipping_never_built_on_line_pathway() {
        let cart = cart(vec![line("l1", "p1", 2)], vec!["dg1"], "USD");
        let bundle = bundle("Ship Free", DiscountMethod::FreeShipping);
        let ops = build_line_operations(
            &bundle,
            &matched(&["l1"], 2),
            &rule(0.0, 100.0),
            &cart,
            &CurrencyTable::default(),
        );
        assert!(ops.is_empty());
    }

    #[test]
    fn test_shipping_operations_one_per_delivery_group() {
        let cart = cart(vec![line("l1", "p1", 2)], vec!["dg1", "dg2"], "USD");
        let bundle = bundle("Ship Free", DiscountMethod::FreeShipping);

        let ops = build_shipping_operations(&bundle, &cart);
        assert_eq!(ops.len(), 2);
        for (op, expected_group) in ops.iter().zip(["dg1", "dg2"]) {
            let DiscountOperation::Delivery(op) = op else {
                panic!("expected a delivery operation");
            };
            assert_eq!(op.message, "Ship Free: FREE SHIPPING");
            assert_eq!(op.value, DiscountValue::Percentage { value: 100.0 });
            assert_eq!(op.delivery_group_id, expected_group);
        }
    }

    #[test]
    fn test_shipping_operations_empty_without_delivery_groups() {
        let cart = cart(vec![line("l1", "p1", 2)], vec![], "USD");
        let bundle = bundle("Ship Free", DiscountMethod::FreeShipping);
        assert!(build_shipping_operations(&bundle, &cart).is_empty());
    }

    #[test]
    fn test_operation_accessors() {
        let op = DiscountOperation::Delivery(DeliveryOperation {
            message: "m".to_string(),
            value: DiscountValue::Percentage { value: 100.0 },
            delivery_group_id: "dg1".to_string(),
        });
        assert_eq!(op.message(), "m");
        assert_eq!(op.value(), &DiscountValue::Percentage { value: 100.0 });
    }
}
