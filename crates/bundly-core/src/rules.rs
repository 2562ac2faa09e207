//! # Rule Selector
//!
//! Picks the single discount tier a satisfied bundle qualifies for.
//!
//! Best-tier-met wins: among rules whose `minimum_quantity` is reached,
//! the largest threshold applies. `minimum_quantity` values are expected
//! to be unique per bundle, so ties can break arbitrarily.

use crate::definition::DiscountRule;

/// Selects the applicable tier for a total matched quantity.
///
/// Returns `None` when no tier's threshold is met — a bundle can satisfy
/// its structural step conditions yet have no priced tier, in which case
/// no discount is produced.
///
/// ## Example
/// ```rust
/// use bundly_core::definition::DiscountRule;
/// use bundly_core::rules::select_rule;
///
/// let rules = vec![
///     DiscountRule { minimum_quantity: 2, fixed_amount_off: 5.0, percentage_off: 0.0 },
///     DiscountRule { minimum_quantity: 5, fixed_amount_off: 15.0, percentage_off: 0.0 },
/// ];
///
/// assert_eq!(select_rule(&rules, 6).unwrap().minimum_quantity, 5);
/// assert_eq!(select_rule(&rules, 3).unwrap().minimum_quantity, 2);
/// assert!(select_rule(&rules, 1).is_none());
/// ```
pub fn select_rule(rules: &[DiscountRule], total_quantity: i64) -> Option<&DiscountRule> {
    rules
        .iter()
        .filter(|rule| rule.minimum_quantity <= total_quantity)
        .max_by_key(|rule| rule.minimum_quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(minimum_quantity: i64, fixed_amount_off: f64) -> DiscountRule {
        DiscountRule {
            minimum_quantity,
            fixed_amount_off,
            percentage_off: 0.0,
        }
    }

    #[test]
    fn test_best_met_tier_wins() {
        let rules = vec![rule(1, 5.0), rule(3, 10.0), rule(6, 20.0)];

        assert_eq!(select_rule(&rules, 1).unwrap().fixed_amount_off, 5.0);
        assert_eq!(select_rule(&rules, 4).unwrap().fixed_amount_off, 10.0);
        assert_eq!(select_rule(&rules, 6).unwrap().fixed_amount_off, 20.0);
        assert_eq!(select_rule(&rules, 100).unwrap().fixed_amount_off, 20.0);
    }

    #[test]
    fn test_rule_order_in_list_is_irrelevant() {
        let rules = vec![rule(6, 20.0), rule(1, 5.0), rule(3, 10.0)];
        assert_eq!(select_rule(&rules, 4).unwrap().minimum_quantity, 3);
    }

    #[test]
    fn test_no_tier_met() {
        let rules = vec![rule(5, 10.0)];
        assert!(select_rule(&rules, 4).is_none());
        assert!(select_rule(&[], 100).is_none());
    }

    #[test]
    fn test_selection_is_monotonic_in_quantity() {
        let rules = vec![rule(1, 5.0), rule(3, 10.0), rule(6, 20.0)];

        // Increasing quantity can only move to an equal-or-higher tier
        let mut previous = 0;
        for quantity in 1..=10 {
            let selected = select_rule(&rules, quantity).unwrap().minimum_quantity;
            assert!(selected >= previous);
            previous = selected;
        }
    }
}
