//! # Matching Module
//!
//! Selects the cart lines that satisfy a bundle's steps and checks each
//! step's quantity policy.
//!
//! ## Per-Bundle Evaluation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Matcher → Validator per bundle                         │
//! │                                                                         │
//! │  for each ENABLED step (position order):                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  match_step()      line matches ⇔ product id ∈ step.products           │
//! │       │            (collection-only steps match NOTHING — the engine    │
//! │       │             cannot resolve dynamic collection membership)       │
//! │       ▼                                                                 │
//! │  validate_step()   conditionType present? → total <op> conditionValue  │
//! │       │            else → total ≥ min AND (max == 0 OR total ≤ max)    │
//! │       │                                                                 │
//! │       ├── fail → BUNDLE UNMET (short-circuit, no partial credit)       │
//! │       │                                                                 │
//! │       └── pass → accumulate matched lines (deduped by line id)         │
//! │                                                                         │
//! │  zero enabled steps → BUNDLE UNMET                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::cart::{Cart, CartLine};
use crate::definition::{BundleDefinition, BundleStep, StepMembership};

// =============================================================================
// Bundle Match Result
// =============================================================================

/// Per-bundle evaluation record. Derived, never persisted; exists only for
/// the duration of one evaluation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleMatchResult {
    /// Ids of the cart lines that matched any enabled step, in cart order,
    /// deduplicated.
    pub matching_line_ids: Vec<String>,

    /// Sum of `quantity` over the matched lines (each line counted once).
    pub total_quantity: i64,

    /// Whether every enabled step validated.
    pub conditions_met: bool,
}

impl BundleMatchResult {
    /// The "bundle does not apply" result.
    pub fn unmet() -> Self {
        BundleMatchResult {
            matching_line_ids: Vec::new(),
            total_quantity: 0,
            conditions_met: false,
        }
    }
}

// =============================================================================
// Cart Matcher
// =============================================================================

/// Selects the cart lines eligible for a step.
///
/// A line matches iff its product identifier is in the step's explicit
/// product list. Collection-based membership is accepted as configuration
/// but always evaluates as non-matching: resolving it would require host
/// data this pure engine does not have.
pub fn match_step<'a>(cart: &'a Cart, step: &BundleStep) -> Vec<&'a CartLine> {
    match step.membership() {
        StepMembership::Products(products) => cart
            .lines
            .iter()
            .filter(|line| products.iter().any(|product| *product == line.product.id))
            .collect(),
        StepMembership::Collections => {
            debug!(
                step = %step.id,
                "collection membership cannot be resolved; step matches no lines"
            );
            Vec::new()
        }
    }
}

// =============================================================================
// Condition Validator
// =============================================================================

/// Checks a step's aggregated matched quantity against its quantity policy.
///
/// When `condition_type` is set it is authoritative and replaces the
/// min/max check entirely.
pub fn validate_step(matched: &[&CartLine], step: &BundleStep) -> bool {
    let total: i64 = matched.iter().map(|line| line.quantity).sum();

    if let Some(condition) = step.condition_type {
        return condition.compare(total, step.condition_value);
    }

    total >= step.min_quantity && (step.max_quantity == 0 || total <= step.max_quantity)
}

// =============================================================================
// Per-Bundle Evaluation
// =============================================================================

/// Runs every enabled step of a bundle against the cart.
///
/// Short-circuits on the first failing step. A bundle with zero enabled
/// steps never satisfies. Lines matching multiple steps are counted once
/// toward the aggregate quantity.
pub fn evaluate_bundle(cart: &Cart, bundle: &BundleDefinition) -> BundleMatchResult {
    let mut matching_line_ids: Vec<String> = Vec::new();
    let mut total_quantity: i64 = 0;
    let mut any_enabled = false;

    for (position, step) in bundle.enabled_steps() {
        any_enabled = true;

        let matched = match_step(cart, step);
        if !validate_step(&matched, step) {
            debug!(bundle = %bundle.id, step = *position, "step condition unmet");
            return BundleMatchResult::unmet();
        }

        for line in matched {
            if !matching_line_ids.iter().any(|id| id == &line.id) {
                matching_line_ids.push(line.id.clone());
                total_quantity += line.quantity;
            }
        }
    }

    if !any_enabled {
        debug!(bundle = %bundle.id, "bundle has no enabled steps");
        return BundleMatchResult::unmet();
    }

    BundleMatchResult {
        matching_line_ids,
        total_quantity,
        conditions_met: true,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
