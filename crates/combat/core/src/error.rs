//! Encounter errors surfaced to drivers.
//!
//! Protocol violations (illegal actions, driving the state machine out of
//! order) are reported to the immediate caller. Recoverable input mistakes
//! (an empty or malformed decision) are not errors: the same combatant is
//! simply asked again.

use crate::action::ActionId;
use crate::combatant::CombatantId;

/// Errors that can occur while building or driving an encounter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncounterError {
    /// Submitted action is neither offered this turn nor a sub-action of an
    /// offered one.
    #[error("action '{action}' is not available to combatant {actor}")]
    ActionNotAvailable {
        actor: CombatantId,
        action: ActionId,
    },

    /// `start()` was called on an encounter that is already running.
    #[error("encounter has already started")]
    AlreadyStarted,

    /// `resume()` was called while no combatant is awaiting a decision.
    #[error("no combatant is awaiting a decision")]
    NotAwaitingDecision,

    /// The encounter already produced a result.
    #[error("encounter is already finished")]
    Finished,

    /// A party was supplied without members.
    #[error("a party must contain at least one combatant")]
    EmptyParty,

    /// A party exceeds the supported size.
    #[error("party of {size} exceeds the maximum of {max}")]
    PartyTooLarge { size: usize, max: usize },

    /// The same combatant id was seated twice.
    #[error("combatant {id} is seated more than once")]
    DuplicateCombatant { id: CombatantId },

    /// A fixed initiative order does not list every combatant exactly once.
    #[error("fixed initiative order must list every combatant exactly once")]
    InvalidInitiative,

    /// Lookup of a combatant that is not part of this encounter.
    #[error("combatant {id} is not part of this encounter")]
    UnknownCombatant { id: CombatantId },
}
