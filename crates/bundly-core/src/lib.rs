//! # bundly-core: Pure Bundle Discount Evaluation for Bundly
//!
//! This crate is the **heart** of Bundly. It computes promotional discounts
//! for a shopping cart from merchant-configured bundle rules, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bundly Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │         Admin Editor / Storefront Widget (external)             │   │
//! │  │   bundle authoring ──► opaque JSON documents ──► host storage   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ per cart change                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bundly-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │definition │  │ matching  │  │   rules   │  │operations │  │   │
//! │  │   │  parser   │  │ matcher + │  │   tier    │  │  builder  │  │   │
//! │  │   │  schema   │  │ validator │  │ selection │  │ + output  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │         ┌───────────┐        ┌───────────┐                     │   │
//! │  │         │ evaluate  │        │ currency  │                     │   │
//! │  │         │ two-pass  │        │ rate table│                     │   │
//! │  │         │orchestrator│       │ + rounding│                     │   │
//! │  │         └───────────┘        └───────────┘                     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ DiscountOperation list                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 Host commerce platform (external)               │   │
//! │  │        applies operations under its own combination policy      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`definition`] - Bundle document schema and tolerant parser
//! - [`cart`] - Read-only cart snapshot input model
//! - [`matching`] - Cart matcher and condition validator
//! - [`rules`] - Discount tier selection
//! - [`operations`] - Operation output model and builders
//! - [`currency`] - Static rate table, rounding, symbols
//! - [`evaluate`] - The two top-level evaluation passes
//! - [`error`] - Typed errors for the parsing seam
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every evaluation is deterministic - same input = same output
//! 2. **No I/O**: Storage, network, and live rate lookups are FORBIDDEN here
//! 3. **Never Throws**: The public contract absorbs every per-bundle failure;
//!    the worst-case output is an empty operation list
//! 4. **Injected Configuration**: The currency table is a value, not a global
//!
//! ## Example Usage
//!
//! ```rust
//! use bundly_core::{run_order_pass, Cart, CurrencyTable, DiscountClass};
//!
//! let cart: Cart = serde_json::from_str(r#"{
//!     "lines": [{
//!         "id": "line-1",
//!         "quantity": 2,
//!         "product": {
//!             "id": "p1",
//!             "bundleDocument": "{\"id\":\"b1\",\"name\":\"Snack Pack\",\"steps\":{\"1\":{\"id\":\"s1\",\"products\":[\"p1\"],\"minQuantity\":1}},\"pricing\":{\"enableDiscount\":true,\"discountMethod\":\"percentage_off\",\"rules\":[{\"minimumQuantity\":1,\"percentageOff\":15.0}]}}"
//!         },
//!         "cost": {"subtotalAmount": 19.98, "currencyCode": "USD"}
//!     }],
//!     "deliveryGroups": [],
//!     "currencyCode": "USD"
//! }"#).unwrap();
//!
//! let operations = run_order_pass(&cart, &[DiscountClass::Order], &CurrencyTable::default());
//! assert_eq!(operations.len(), 1);
//! assert_eq!(operations[0].message(), "Snack Pack: 15% OFF");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod currency;
pub mod definition;
pub mod error;
pub mod evaluate;
pub mod matching;
pub mod operations;
pub mod rules;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bundly_core::Cart` instead of
// `use bundly_core::cart::Cart`

pub use cart::{Cart, CartLine, DeliveryGroup, DiscountClass, LineCost, ProductRef};
pub use currency::{CurrencyTable, REFERENCE_CURRENCY};
pub use definition::{
    BundleDefinition, BundleStep, ConditionType, DiscountMethod, DiscountRule, PricingPolicy,
    StepMembership,
};
pub use error::{DefinitionError, DefinitionResult};
pub use evaluate::{discover_bundles, run_order_pass, run_shipping_pass};
pub use matching::{evaluate_bundle, match_step, validate_step, BundleMatchResult};
pub use operations::{
    build_line_operations, build_shipping_operations, DeliveryOperation, DiscountOperation,
    DiscountValue, OrderSubtotalOperation,
};
pub use rules::select_rule;
