//! Per-turn action offer, legality check, and the mutation context handed
//! to executing actions.

use std::sync::Arc;

use crate::action::{Action, ActionCategory, ActionHandle, ActionId, ActionOutcome};
use crate::combatant::{Combatant, CombatantId};
use crate::effect::{ActiveEffect, EffectKind, EffectLedger, EffectSpec, SpellComponents};
use crate::error::EncounterError;
use crate::party::Roster;

/// Mutable view of the encounter scoped to one action execution.
///
/// This is the only surface through which content mutates engine state:
/// combatant meters via the roster, conditions via the ledger. It lives for
/// a single `execute` call and cannot escape it.
pub struct TurnContext<'a> {
    actor: CombatantId,
    roster: &'a mut Roster,
    ledger: &'a mut EffectLedger,
}

impl<'a> TurnContext<'a> {
    pub fn new(actor: CombatantId, roster: &'a mut Roster, ledger: &'a mut EffectLedger) -> Self {
        Self {
            actor,
            roster,
            ledger,
        }
    }

    /// The combatant taking the turn.
    pub fn actor_id(&self) -> CombatantId {
        self.actor
    }

    pub fn actor(&self) -> Option<&dyn Combatant> {
        self.roster.combatant(self.actor)
    }

    pub fn actor_mut(&mut self) -> Option<&mut dyn Combatant> {
        self.roster.combatant_mut(self.actor)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&dyn Combatant> {
        self.roster.combatant(id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut dyn Combatant> {
        self.roster.combatant_mut(id)
    }

    pub fn allies(&self) -> Vec<CombatantId> {
        self.roster.allies_of(self.actor)
    }

    pub fn enemies(&self) -> Vec<CombatantId> {
        self.roster.enemies_of(self.actor)
    }

    /// Puts an effect in force on a target.
    pub fn apply_effect(&mut self, target: CombatantId, spec: EffectSpec) {
        self.ledger.apply(target, spec);
    }

    /// Lifts an effect from a target; idempotent.
    pub fn remove_effect(&mut self, target: CombatantId, kind: EffectKind) -> bool {
        self.ledger.remove(target, kind)
    }

    pub fn effects_on(&self, target: CombatantId) -> impl Iterator<Item = &ActiveEffect> {
        self.ledger.for_target(target)
    }

    pub fn has_effect(&self, target: CombatantId, kind: EffectKind) -> bool {
        self.ledger.has(target, kind)
    }

    /// Components currently denied to a combatant by live effects.
    pub fn blocked_components(&self, target: CombatantId) -> SpellComponents {
        self.ledger.blocked_components(target)
    }
}

/// The synthetic no-op offered as the only choice while an action-blocking
/// effect holds. Resolving it consumes the turn and nothing else.
struct IncapacitatedAction {
    id: ActionId,
}

impl Action for IncapacitatedAction {
    fn id(&self) -> &ActionId {
        &self.id
    }

    fn category(&self) -> ActionCategory {
        ActionCategory::None
    }

    fn execute(&self, _target: Option<CombatantId>, _ctx: &mut TurnContext<'_>) -> ActionOutcome {
        ActionOutcome::resolved()
    }
}

/// Id of the stub offered to action-blocked combatants.
pub const INCAPACITATED_ACTION: &str = "incapacitated";

pub(crate) fn incapacitated_stub() -> ActionHandle {
    Arc::new(IncapacitatedAction {
        id: ActionId::new(INCAPACITATED_ACTION),
    })
}

/// Assembles the actions offered to a combatant this turn.
///
/// An action-blocking effect collapses the offer to the incapacitated stub.
/// Otherwise the offer is the union of intrinsic actions, actions exposed by
/// equipped items, and actions derived from known spells.
pub fn offered_actions(combatant: &dyn Combatant, ledger: &EffectLedger) -> Vec<ActionHandle> {
    if ledger.blocks_action(combatant.id()) {
        return vec![incapacitated_stub()];
    }

    let mut offered = combatant.intrinsic_actions();
    for item in combatant.equipment() {
        offered.extend(item.actions());
    }
    for spell in combatant.spellbook() {
        offered.push(spell.action());
    }
    offered
}

/// Checks a submitted action against the current offer.
///
/// Legal when the action's id matches an offered action directly, or when
/// the action names an offered action as its parent (two-step selection).
/// Anything else is a protocol violation surfaced to the caller; nothing
/// has been mutated when this fails.
pub fn ensure_offered(
    actor: CombatantId,
    action: &dyn Action,
    offered: &[ActionHandle],
) -> Result<(), EncounterError> {
    let legal = offered
        .iter()
        .any(|candidate| candidate.id() == action.id() || action.parent() == Some(candidate.id()));
    if legal {
        Ok(())
    } else {
        Err(EncounterError::ActionNotAvailable {
            actor,
            action: action.id().clone(),
        })
    }
}
