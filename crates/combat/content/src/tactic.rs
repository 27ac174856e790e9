//! Deterministic decision strategy for autonomous fighters.

use combat_core::{ActionCategory, Decision, DecisionProvider, TurnSnapshot};

/// Picks the first offered action able to produce a legal target, preferring
/// attacks, then spells; falls back to the first targetless action (guard,
/// pass, or the incapacitated stub). Actions order their own candidate
/// targets, so "first target" already means "most pressing".
pub struct SimpleTactic;

impl DecisionProvider for SimpleTactic {
    fn decide(&self, snapshot: &TurnSnapshot) -> Decision {
        for category in [ActionCategory::Attack, ActionCategory::Spell] {
            for action in &snapshot.offered {
                if action.category() != category {
                    continue;
                }
                if let Some(&target) = action.available_targets(snapshot).first() {
                    return Decision::act_on(action.clone(), target);
                }
            }
        }

        for action in &snapshot.offered {
            if action.category() == ActionCategory::None {
                return Decision::act(action.clone());
            }
        }
        Decision::undecided()
    }
}
