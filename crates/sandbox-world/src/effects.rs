//! Contact rules: which category pair triggers which world effect.
//!
//! The dispatch table is fixed at construction. Each rule fires only on the
//! beginning of a contact, and the world checks membership before acting,
//! so a body already removed by an earlier rule in the same step is left
//! alone.

use crate::body::{Category, CategoryPair};

/// Effect the world applies for a matching contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRule {
    /// Remove the particle (`first`).
    Destroy,
    /// Move the particle (`first`) to a different random portal.
    Teleport,
    /// Explode at the explosive (`first`), then remove it.
    Detonate,
}

/// Every category pair the world reacts to, with its rule.
pub const CONTACT_RULES: [(CategoryPair, ContactRule); 3] = [
    (
        CategoryPair::new(Category::Particle, Category::Destroyer),
        ContactRule::Destroy,
    ),
    (
        CategoryPair::new(Category::Particle, Category::Portal),
        ContactRule::Teleport,
    ),
    (
        CategoryPair::with_any(Category::Explosive),
        ContactRule::Detonate,
    ),
];

/// Rule registered for `pair`, if any.
pub fn rule_for(pair: CategoryPair) -> Option<ContactRule> {
    CONTACT_RULES
        .iter()
        .find(|(registered, _)| *registered == pair)
        .map(|(_, rule)| *rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_pair_has_a_rule() {
        for (pair, rule) in CONTACT_RULES {
            assert_eq!(rule_for(pair), Some(rule));
        }
    }

    #[test]
    fn unregistered_pairs_have_no_rule() {
        assert_eq!(
            rule_for(CategoryPair::new(Category::Particle, Category::Magnet)),
            None
        );
        assert_eq!(
            rule_for(CategoryPair::new(Category::Explosive, Category::Destroyer)),
            None
        );
    }

    #[test]
    fn explosives_are_not_destroyed_or_teleported() {
        for (pair, rule) in CONTACT_RULES {
            if pair.first == Category::Explosive {
                assert_eq!(rule, ContactRule::Detonate);
            }
        }
    }
}
