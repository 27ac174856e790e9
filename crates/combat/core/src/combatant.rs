//! Combatant contract and the handles it hands to the engine.
//!
//! The engine owns combatants only for the lifetime of one encounter and
//! touches them exclusively through this trait: meters for the win check,
//! action sources for the per-turn offer, and an optional decision provider
//! that marks the combatant as autonomous. Everything else (inventory
//! bookkeeping, progression, presentation) stays in the application.

use std::fmt;
use std::sync::Arc;

use crate::action::{ActionHandle, Decision, SkillId};
use crate::encounter::TurnSnapshot;

/// Unique identifier for a combatant within an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integer resource meter (hit points, mana) tracked per combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    /// Meter starting at its maximum.
    pub fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Removes up to `amount`, clamping at zero. Returns what was removed.
    pub fn deplete(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Restores up to `amount`, clamping at the maximum. Returns what was added.
    pub fn replenish(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.maximum.saturating_sub(self.current));
        self.current += added;
        added
    }
}

impl fmt::Display for ResourceMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.maximum)
    }
}

/// A participant in the encounter.
///
/// Implementations are owned by the surrounding application and boxed into a
/// [`Party`](crate::party::Party) for the encounter's lifetime. The engine
/// never inspects anything beyond this surface.
pub trait Combatant: Send {
    fn id(&self) -> CombatantId;
    fn name(&self) -> &str;

    fn hit_points(&self) -> ResourceMeter;
    fn mana(&self) -> ResourceMeter;

    /// Applies damage, clamping at zero. Returns the amount actually dealt.
    fn take_damage(&mut self, amount: u32) -> u32;

    /// Restores hit points, clamping at the maximum. Returns the amount healed.
    fn heal(&mut self, amount: u32) -> u32;

    /// Pays a mana cost. Returns false (and deducts nothing) when short.
    fn spend_mana(&mut self, amount: u32) -> bool;

    /// Restores mana, clamping at the maximum. Returns the amount restored.
    fn restore_mana(&mut self, amount: u32) -> u32;

    /// Actions innate to the combatant, independent of items and spells.
    fn intrinsic_actions(&self) -> Vec<ActionHandle> {
        Vec::new()
    }

    /// Equipped items; each may contribute actions to the turn offer.
    fn equipment(&self) -> &[ItemHandle] {
        &[]
    }

    /// Known spells; each converts into one offerable action.
    fn spellbook(&self) -> &[SpellHandle] {
        &[]
    }

    /// Decision source for autonomous combatants. `None` marks the combatant
    /// as externally driven: the encounter suspends on its turn and waits for
    /// `resume()` instead of deciding in place.
    fn decision_provider(&self) -> Option<&dyn DecisionProvider> {
        None
    }

    /// Skill-practice hook, invoked when an externally driven combatant picks
    /// an action tagged with a trainable skill.
    fn practice_skill(&mut self, _skill: &SkillId) {}

    /// Downed combatants lose their place in the turn order until healed.
    fn is_downed(&self) -> bool {
        self.hit_points().is_empty()
    }
}

/// An equipped item that may expose actions (a weapon's strike, a satchel's
/// "use item" menu).
pub trait Item: Send + Sync {
    fn name(&self) -> &str;

    /// Actions this item contributes to its owner's turn offer.
    fn actions(&self) -> Vec<ActionHandle>;
}

/// A known spell, convertible into a single offerable action.
pub trait Spell: Send + Sync {
    fn name(&self) -> &str;

    fn action(&self) -> ActionHandle;
}

pub type ItemHandle = Arc<dyn Item>;
pub type SpellHandle = Arc<dyn Spell>;

/// Synchronous decision source consulted for autonomous combatants.
///
/// Must return within the turn; the engine neither retries nor times out a
/// provider that keeps answering with illegible decisions.
pub trait DecisionProvider: Send {
    fn decide(&self, snapshot: &TurnSnapshot) -> Decision;
}
