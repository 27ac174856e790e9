//! Action contract consumed by the validator and executor.
//!
//! Actions are content: the engine never constructs them (apart from the
//! incapacitated stub) and treats them as opaque capabilities identified by
//! a stable id. An action may name a parent: submitting it while the parent
//! is offered is legal, which carries two-step "pick a category, then pick
//! the concrete item or spell" selection flows.

use std::fmt;
use std::sync::Arc;

use crate::combatant::CombatantId;
use crate::encounter::TurnSnapshot;
use crate::executor::TurnContext;

/// Stable identifier for an action, unique within the content catalogue.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionId(String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier for a trainable skill an action may exercise.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillId(String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SkillId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Grouping tag on an action.
///
/// `None` marks targetless utility actions; the controller resolves them
/// without requiring a target in the decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActionCategory {
    Attack,
    Spell,
    Item,
    None,
}

/// What an action reports back after executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionOutcome {
    /// Turn consumed; initiative advances. `magnitude` is a headline number
    /// (damage dealt, amount healed) for reporting only.
    Consumed { magnitude: Option<i32> },

    /// Turn not consumed: the same combatant is asked again immediately.
    /// Used by actions that only open a sub-menu.
    NotConsumed,
}

impl ActionOutcome {
    /// Turn consumed with nothing to report.
    pub fn resolved() -> Self {
        Self::Consumed { magnitude: None }
    }

    /// Turn consumed with a headline magnitude.
    pub fn magnitude(value: i32) -> Self {
        Self::Consumed {
            magnitude: Some(value),
        }
    }

    pub fn is_consumed(&self) -> bool {
        matches!(self, Self::Consumed { .. })
    }
}

/// An offerable action.
///
/// `execute` is the only place content mutates the encounter, and the
/// [`TurnContext`] it receives is the only mutation surface: combatant
/// meters plus the effect ledger, scoped to the current turn.
pub trait Action: Send + Sync {
    fn id(&self) -> &ActionId;

    /// Menu action this one is picked through, if any.
    fn parent(&self) -> Option<&ActionId> {
        None
    }

    fn category(&self) -> ActionCategory;

    /// Trainable skill exercised when this action is chosen.
    fn skill(&self) -> Option<&SkillId> {
        None
    }

    /// Concrete follow-up actions picked through this one when it opens a
    /// menu. Lets a decision-maker enumerate the second step of a two-step
    /// selection straight from the offer instead of needing handles obtained
    /// out of band.
    fn children(&self) -> Vec<ActionHandle> {
        Vec::new()
    }

    /// Legal targets given the current turn view. Decision-makers consult
    /// this; the engine itself never filters targets beyond existence.
    fn available_targets(&self, _snapshot: &TurnSnapshot) -> Vec<CombatantId> {
        Vec::new()
    }

    /// Carries the action out against `target` inside the turn context.
    fn execute(&self, target: Option<CombatantId>, ctx: &mut TurnContext<'_>) -> ActionOutcome;
}

pub type ActionHandle = Arc<dyn Action>;

/// A combatant's choice for the current turn.
///
/// An empty or half-formed decision is not an error: the controller treats
/// it as "no decision made" and asks the same combatant again.
#[derive(Clone)]
pub struct Decision {
    pub action: Option<ActionHandle>,
    pub target: Option<CombatantId>,
}

impl Decision {
    /// Targetless action choice.
    pub fn act(action: ActionHandle) -> Self {
        Self {
            action: Some(action),
            target: None,
        }
    }

    /// Action aimed at a combatant.
    pub fn act_on(action: ActionHandle, target: CombatantId) -> Self {
        Self {
            action: Some(action),
            target: Some(target),
        }
    }

    /// No decision; the turn stays with the same combatant.
    pub fn undecided() -> Self {
        Self {
            action: None,
            target: None,
        }
    }
}

impl fmt::Debug for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decision")
            .field("action", &self.action.as_ref().map(|a| a.id()))
            .field("target", &self.target)
            .finish()
    }
}
