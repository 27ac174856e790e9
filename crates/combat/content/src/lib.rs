//! Reference content for the combat engine.
//!
//! This crate implements the contracts `combat-core` consumes: a concrete
//! [`Fighter`] combatant, a small catalogue of weapons, spells and
//! consumables expressed as engine actions, a deterministic tactic for
//! autonomous fighters, and RON loaders that assemble parties from data.
//! The engine never depends on any of it.

pub mod catalogue;
pub mod fighter;
pub mod tactic;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalogue::{
    Satchel, Weapon, channel_blast, ember, entangle, fire_bolt, hex_of_silence, poisoned_blade,
    regrowth, shortsword, stunning_mace,
};
pub use fighter::{Fighter, PracticeTally};
pub use tactic::SimpleTactic;

#[cfg(feature = "loaders")]
pub use loaders::{EncounterSpec, FighterSpec, LoadResult, build_party, demo_encounter};
