//! # Evaluation Orchestrator
//!
//! The two top-level entry points the host invokes per cart change.
//!
//! ## Two Passes, Shared Components
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Evaluation Passes                                    │
//! │                                                                         │
//! │  run_order_pass (order/product class)     run_shipping_pass (shipping) │
//! │       │                                        │                        │
//! │       ▼                                        ▼                        │
//! │  discover_bundles ──────────────────────► discover_bundles             │
//! │       │                                        │                        │
//! │       ▼ per bundle                             ▼ per free_shipping      │
//! │  Matcher → Validator → Selector → Builder      bundle, same chain       │
//! │       │                                        │                        │
//! │       ▼                                        ▼                        │
//! │  ALL qualifying bundles emit              FIRST satisfied bundle        │
//! │  (no early break; the host owns           wins, then stop               │
//! │   combination policy)                     (one shipping discount        │
//! │                                            per cart)                    │
//! │                                                                         │
//! │  Any per-bundle failure is absorbed; worst case is an empty list.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both passes are pure: no I/O, no retained state, safe to run
//! concurrently for different carts.

use tracing::debug;

use crate::cart::{Cart, DiscountClass};
use crate::currency::CurrencyTable;
use crate::definition::{BundleDefinition, DiscountMethod};
use crate::matching::evaluate_bundle;
use crate::operations::{build_line_operations, build_shipping_operations, DiscountOperation};
use crate::rules::select_rule;

// =============================================================================
// Bundle Discovery
// =============================================================================

/// Collects the distinct bundle definitions referenced by the cart.
///
/// Scans lines in cart order; the first parsed definition per bundle id
/// wins and later duplicates are discarded, not merged. A single product
/// is normally the canonical source of truth for a bundle's configuration,
/// so stale duplicate documents on other lines lose deliberately.
pub fn discover_bundles(cart: &Cart) -> Vec<BundleDefinition> {
    let mut bundles: Vec<BundleDefinition> = Vec::new();

    for line in &cart.lines {
        let Some(document) = &line.product.bundle_document else {
            continue;
        };
        // Malformed documents mean "no bundle", never an error
        let Some(definition) = BundleDefinition::parse(document) else {
            continue;
        };
        if bundles.iter().any(|known| known.id == definition.id) {
            debug!(
                bundle = %definition.id,
                line = %line.id,
                "duplicate bundle id on a later line; first document wins"
            );
            continue;
        }
        bundles.push(definition);
    }

    bundles
}

// =============================================================================
// Line/Order Pass
// =============================================================================

/// Evaluates fixed-amount and percentage bundles into order-subtotal
/// operations.
///
/// Requires the "order" or "product" discount class to be active. Every
/// qualifying bundle emits its operation(s) — multiple bundles can each
/// contribute a candidate; how they combine at checkout is host policy.
pub fn run_order_pass(
    cart: &Cart,
    classes: &[DiscountClass],
    table: &CurrencyTable,
) -> Vec<DiscountOperation> {
    if !DiscountClass::allows_line_discounts(classes) {
        return Vec::new();
    }

    let mut operations = Vec::new();

    for bundle in discover_bundles(cart) {
        let Some(pricing) = &bundle.pricing else {
            debug!(bundle = %bundle.id, "bundle has no pricing policy");
            continue;
        };
        if !pricing.enable_discount {
            debug!(bundle = %bundle.id, "discounting disabled");
            continue;
        }
        if pricing.discount_method == DiscountMethod::FreeShipping {
            // Different operation category; the shipping pass owns it
            continue;
        }

        let result = evaluate_bundle(cart, &bundle);
        if !result.conditions_met {
            continue;
        }

        let Some(rule) = select_rule(&pricing.rules, result.total_quantity) else {
            debug!(
                bundle = %bundle.id,
                total_quantity = result.total_quantity,
                "conditions met but no priced tier reached"
            );
            continue;
        };

        operations.extend(build_line_operations(&bundle, &result, rule, cart, table));
    }

    operations
}

// =============================================================================
// Shipping Pass
// =============================================================================

/// Evaluates free-shipping bundles into delivery operations.
///
/// Requires the "shipping" discount class and at least one delivery group.
/// First-match-wins: the first satisfied free-shipping bundle (in discovery
/// order) emits one operation per delivery group, and evaluation stops —
/// shipping is already fully discounted.
pub fn run_shipping_pass(cart: &Cart, classes: &[DiscountClass]) -> Vec<DiscountOperation> {
    if !DiscountClass::allows_shipping_discounts(classes) || cart.delivery_groups.is_empty() {
        return Vec::new();
    }

    for bundle in discover_bundles(cart) {
        let Some(pricing) = &bundle.pricing else {
            continue;
        };
        if !pricing.enable_discount || pricing.discount_method != DiscountMethod::FreeShipping {
            continue;
        }

        let result = evaluate_bundle(cart, &bundle);
        if !result.conditions_met {
            continue;
        }
        if select_rule(&pricing.rules, result.total_quantity).is_none() {
            debug!(bundle = %bundle.id, "free shipping conditions met but no tier reached");
            continue;
        }

        return build_shipping_operations(&bundle, cart);
    }

    Vec::new()
}

// =============================================================================
// Unit Tests
// =============================================================================
