//! # Bundle Definition Schema
//!
//! The typed view of a merchant-configured bundle document, plus the
//! tolerant parser that produces it.
//!
//! ## Document Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Bundle Document Lifecycle                            │
//! │                                                                         │
//! │  Admin editor (external) ──► opaque JSON document ──► host storage     │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │            attached to a product on the cart snapshot                  │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │  BundleDefinition::parse() ← THIS MODULE (read-only, tolerant)         │
//! │                                                                         │
//! │  The engine NEVER writes these documents. Within one evaluation the    │
//! │  definition is immutable.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Parser Tolerance
//! - Malformed JSON or an incompatible shape → `None`, never a panic
//! - Unknown/extra fields are ignored (forward compatibility)
//! - Missing optional fields take documented defaults
//!   (`enabled = true`, `maxQuantity = 0`)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::error::{DefinitionError, DefinitionResult};

// =============================================================================
// Bundle Definition
// =============================================================================

/// A merchant-defined multi-step product-selection offer with a pricing
/// policy.
///
/// ## Dual Role of Step Order
/// Steps are keyed by position. Position order matters for the storefront
/// step UI, but discount correctness only depends on the set of enabled
/// steps, not their order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BundleDefinition {
    /// Bundle identifier assigned by the admin tool.
    pub id: String,

    /// Display name, used verbatim in discount messages.
    pub name: String,

    /// Selection steps keyed by position (1-based in practice).
    #[serde(default)]
    pub steps: BTreeMap<u32, BundleStep>,

    /// Pricing policy; a bundle without one never discounts.
    #[serde(default)]
    pub pricing: Option<PricingPolicy>,
}

impl BundleDefinition {
    /// Parses a bundle document, returning typed errors at the seam.
    ///
    /// Prefer [`BundleDefinition::parse`] anywhere a failure should mean
    /// "no bundle" rather than an error to handle.
    pub fn try_parse(document: &str) -> DefinitionResult<Self> {
        let definition: BundleDefinition = serde_json::from_str(document)?;
        if definition.id.trim().is_empty() {
            return Err(DefinitionError::EmptyId);
        }
        Ok(definition)
    }

    /// Parses a bundle document, failing softly.
    ///
    /// ## Contract
    /// Any malformed or schema-incompatible document yields `None`, never
    /// a propagated error. The reason is logged on the diagnostics side
    /// channel only.
    ///
    /// ## Example
    /// ```rust
    /// use bundly_core::BundleDefinition;
    ///
    /// assert!(BundleDefinition::parse("not json").is_none());
    ///
    /// let doc = r#"{"id":"b1","name":"Duo","steps":{},"pricing":null}"#;
    /// assert_eq!(BundleDefinition::parse(doc).unwrap().id, "b1");
    /// ```
    pub fn parse(document: &str) -> Option<Self> {
        match Self::try_parse(document) {
            Ok(definition) => Some(definition),
            Err(err) => {
                warn!(%err, "ignoring malformed bundle document");
                None
            }
        }
    }

    /// Iterates the enabled steps in position order.
    pub fn enabled_steps(&self) -> impl Iterator<Item = (&u32, &BundleStep)> {
        self.steps.iter().filter(|(_, step)| step.enabled)
    }
}

// =============================================================================
// Bundle Step
// =============================================================================

/// A single selection requirement within a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BundleStep {
    /// Step identifier.
    pub id: String,

    /// Display name for the step UI.
    #[serde(default)]
    pub name: String,

    /// Product identifiers eligible for this step.
    #[serde(default)]
    pub products: Vec<String>,

    /// Collection identifiers as an alternative membership source.
    ///
    /// Accepted in the schema, but membership cannot be resolved by this
    /// engine (see [`StepMembership::Collections`]).
    #[serde(default)]
    pub collections: Vec<String>,

    /// Minimum matched quantity for this step.
    #[serde(default)]
    pub min_quantity: i64,

    /// Maximum matched quantity; 0 means unbounded.
    ///
    /// `max_quantity >= min_quantity` (when bounded) is expected but not
    /// enforced here; the admin tool owns that invariant.
    #[serde(default)]
    pub max_quantity: i64,

    /// Optional comparison that replaces the min/max check when present.
    #[serde(default)]
    pub condition_type: Option<ConditionType>,

    /// Right-hand side of the comparison for `condition_type`.
    #[serde(default)]
    pub condition_value: i64,

    /// Disabled steps are skipped entirely during validation.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl BundleStep {
    /// Returns the step's membership source as a capability.
    ///
    /// ## Capability Gap
    /// Collection membership is dynamic data owned by the host platform;
    /// a pure engine cannot resolve it. A step relying solely on
    /// collections therefore never matches any line. This is a documented
    /// limitation, surfaced as a distinct variant rather than dead code.
    pub fn membership(&self) -> StepMembership<'_> {
        if self.products.is_empty() && !self.collections.is_empty() {
            StepMembership::Collections
        } else {
            StepMembership::Products(&self.products)
        }
    }
}

/// How a step decides which products belong to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMembership<'a> {
    /// Explicit product identifier list; the only resolvable source.
    Products(&'a [String]),
    /// Collection references; structurally accepted, never resolvable here.
    Collections,
}

// =============================================================================
// Condition Type
// =============================================================================

/// Comparison operator for a step's quantity condition.
///
/// When present on a step, the condition is authoritative: it replaces the
/// simple min/max quantity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    EqualTo,
    GreaterThan,
    LessThan,
    GreaterThanOrEqualTo,
    LessThanOrEqualTo,
}

impl ConditionType {
    /// Evaluates `total <op> value`.
    #[inline]
    pub const fn compare(self, total: i64, value: i64) -> bool {
        match self {
            ConditionType::EqualTo => total == value,
            ConditionType::GreaterThan => total > value,
            ConditionType::LessThan => total < value,
            ConditionType::GreaterThanOrEqualTo => total >= value,
            ConditionType::LessThanOrEqualTo => total <= value,
        }
    }
}

// =============================================================================
// Pricing Policy
// =============================================================================

/// What a satisfied bundle is worth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    /// Master switch; a policy with this off never produces an operation.
    #[serde(default)]
    pub enable_discount: bool,

    /// How the discount is applied.
    pub discount_method: DiscountMethod,

    /// Quantity tiers, ordered as authored by the admin tool.
    #[serde(default)]
    pub rules: Vec<DiscountRule>,
}

/// The kind of discount a pricing policy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMethod {
    /// Fixed reference-currency amount off the bundle items' subtotal.
    FixedAmountOff,
    /// Percentage off the bundle items' subtotal.
    PercentageOff,
    /// 100% off every delivery group on the cart.
    FreeShipping,
}

/// A quantity tier: once total matched quantity reaches `minimum_quantity`,
/// this magnitude applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRule {
    /// Threshold the total matched quantity must reach.
    #[serde(default)]
    pub minimum_quantity: i64,

    /// Reference-currency amount for `fixed_amount_off` policies.
    #[serde(default)]
    pub fixed_amount_off: f64,

    /// Percentage (0-100) for `percentage_off` policies.
    #[serde(default)]
    pub percentage_off: f64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complete_document() {
        let doc = r#"{
            "id": "bundle-1",
            "name": "Snack Pack",
            "steps": {
                "1": {
                    "id": "step-1",
                    "name": "Pick chips",
                    "products": ["p1", "p2"],
                    "minQuantity": 1,
                    "maxQuantity": 5
                }
            },
            "pricing": {
                "enableDiscount": true,
                "discountMethod": "fixed_amount_off",
                "rules": [{"minimumQuantity": 1, "fixedAmountOff": 10.0}]
            }
        }"#;

        let bundle = BundleDefinition::parse(doc).unwrap();
        assert_eq!(bundle.id, "bundle-1");
        assert_eq!(bundle.name, "Snack Pack");

        let step = &bundle.steps[&1];
        assert_eq!(step.products, vec!["p1", "p2"]);
        assert_eq!(step.min_quantity, 1);
        assert_eq!(step.max_quantity, 5);
        assert!(step.enabled); // default

        let pricing = bundle.pricing.unwrap();
        assert!(pricing.enable_discount);
        assert_eq!(pricing.discount_method, DiscountMethod::FixedAmountOff);
        assert_eq!(pricing.rules.len(), 1);
    }

    #[test]
    fn test_parse_fails_softly() {
        assert!(BundleDefinition::parse("").is_none());
        assert!(BundleDefinition::parse("not json at all").is_none());
        assert!(BundleDefinition::parse("[1,2,3]").is_none());
        assert!(BundleDefinition::parse(r#"{"name":"no id"}"#).is_none());
        assert!(BundleDefinition::parse(r#"{"id":"  ","name":"blank id"}"#).is_none());
    }

    #[test]
    fn test_try_parse_reports_reason() {
        assert!(matches!(
            BundleDefinition::try_parse("{"),
            Err(DefinitionError::Malformed(_))
        ));
        assert!(matches!(
            BundleDefinition::try_parse(r#"{"id":"","name":"x"}"#),
            Err(DefinitionError::EmptyId)
        ));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        // Forward compatibility: newer admin tools may add fields
        let doc = r#"{
            "id": "b1",
            "name": "Duo",
            "futureField": {"nested": true},
            "steps": {},
            "version": 7
        }"#;
        assert!(BundleDefinition::parse(doc).is_some());
    }

    #[test]
    fn test_step_defaults() {
        let doc = r#"{
            "id": "b1",
            "name": "Duo",
            "steps": {"1": {"id": "s1"}}
        }"#;
        let bundle = BundleDefinition::parse(doc).unwrap();
        let step = &bundle.steps[&1];

        assert!(step.enabled);
        assert_eq!(step.min_quantity, 0);
        assert_eq!(step.max_quantity, 0); // 0 = unbounded
        assert!(step.products.is_empty());
        assert!(step.condition_type.is_none());
        assert!(bundle.pricing.is_none());
    }

    #[test]
    fn test_steps_ordered_by_position() {
        let doc = r#"{
            "id": "b1",
            "name": "Trio",
            "steps": {
                "2": {"id": "s2"},
                "10": {"id": "s10"},
                "1": {"id": "s1"}
            }
        }"#;
        let bundle = BundleDefinition::parse(doc).unwrap();
        let ids: Vec<&str> = bundle.steps.values().map(|s| s.id.as_str()).collect();
        // Numeric order, not lexicographic ("10" after "2")
        assert_eq!(ids, vec!["s1", "s2", "s10"]);
    }

    #[test]
    fn test_membership_capability() {
        let mut step = BundleStep {
            id: "s1".to_string(),
            name: String::new(),
            products: vec!["p1".to_string()],
            collections: vec![],
            min_quantity: 0,
            max_quantity: 0,
            condition_type: None,
            condition_value: 0,
            enabled: true,
        };
        assert!(matches!(step.membership(), StepMembership::Products(_)));

        // Collection-only: structurally accepted, never resolvable
        step.products.clear();
        step.collections.push("summer-sale".to_string());
        assert_eq!(step.membership(), StepMembership::Collections);

        // Products win when both are present
        step.products.push("p1".to_string());
        assert!(matches!(step.membership(), StepMembership::Products(_)));
    }

    #[test]
    fn test_condition_type_compare() {
        assert!(ConditionType::EqualTo.compare(3, 3));
        assert!(!ConditionType::EqualTo.compare(4, 3));
        assert!(ConditionType::GreaterThan.compare(4, 3));
        assert!(!ConditionType::GreaterThan.compare(3, 3));
        assert!(ConditionType::LessThan.compare(2, 3));
        assert!(ConditionType::GreaterThanOrEqualTo.compare(3, 3));
        assert!(ConditionType::LessThanOrEqualTo.compare(3, 3));
        assert!(!ConditionType::LessThanOrEqualTo.compare(4, 3));
    }

    #[test]
    fn test_condition_type_wire_names() {
        let parsed: ConditionType =
            serde_json::from_str(r#""greater_than_or_equal_to""#).unwrap();
        assert_eq!(parsed, ConditionType::GreaterThanOrEqualTo);

        // Unrecognized operators make the whole document incompatible
        let doc = r#"{
            "id": "b1",
            "name": "x",
            "steps": {"1": {"id": "s1", "conditionType": "approximately"}}
        }"#;
        assert!(BundleDefinition::parse(doc).is_none());
    }

    #[test]
    fn test_enabled_steps_skips_disabled() {
        let doc = r#"{
            "id": "b1",
            "name": "x",
            "steps": {
                "1": {"id": "s1", "enabled": false},
                "2": {"id": "s2"}
            }
        }"#;
        let bundle = BundleDefinition::parse(doc).unwrap();
        let ids: Vec<&str> = bundle.enabled_steps().map(|(_, s)| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s2"]);
    }
}
