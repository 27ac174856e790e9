//! Turn-resolution engine for two-party, turn-based combat encounters.
//!
//! `combat-core` owns the rules: who acts next, which actions a turn may
//! legally submit, how status effects tick, stack, interrupt and expire, and
//! when the fight is over. Combatants, the action catalogue, and decision
//! strategies are external collaborators consumed through the traits defined
//! here; reference implementations live in `combat-content`.
//!
//! An encounter is driven pull-style: [`Encounter::start`] plays autonomous
//! turns until a combatant without a decision provider must act, then hands
//! a [`TurnSnapshot`] back; [`Encounter::resume`] feeds the decision in and
//! plays on until the next suspension or the final [`CombatResult`].
pub mod action;
pub mod combatant;
pub mod config;
pub mod effect;
pub mod encounter;
pub mod error;
pub mod executor;
pub mod initiative;
pub mod party;

#[cfg(test)]
pub(crate) mod testkit;

pub use action::{
    Action, ActionCategory, ActionHandle, ActionId, ActionOutcome, Decision, SkillId,
};
pub use combatant::{
    Combatant, CombatantId, DecisionProvider, Item, ItemHandle, ResourceMeter, Spell, SpellHandle,
};
pub use config::CombatConfig;
pub use effect::{
    ActiveEffect, EffectKind, EffectLedger, EffectSpec, ExpiryPayload, SpellComponents,
    TickCadence, TickPayload,
};
pub use encounter::{CombatResult, CombatantView, EffectView, Encounter, Step, TurnSnapshot};
pub use error::EncounterError;
pub use executor::{INCAPACITATED_ACTION, TurnContext, offered_actions};
pub use initiative::{InitiativeOrder, InitiativeQueue};
pub use party::{Party, PartyId, Roster};
