//! Live status effect records and their countdown arithmetic.

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use crate::combatant::CombatantId;
use crate::config::CombatConfig;
use crate::effect::{EffectKind, EffectSpec, ExpiryPayload, SpellComponents, TickCadence, TickPayload};
use crate::party::Roster;

/// A recorded effect instance bound to one target.
///
/// `remaining_ticks` counts individual turn advances, not rounds: a record
/// starts at `duration_rounds × participant_count` and loses one tick per
/// advance, so a per-round payload fires exactly when the count crosses a
/// round boundary (`remaining_ticks % participant_count == 0`).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveEffect {
    pub target: CombatantId,
    pub spec: EffectSpec,
    pub remaining_ticks: u32,
}

/// The set of effects currently in force across the encounter.
///
/// At most one record of a given kind exists per target: a repeat
/// application merges into the live record instead of duplicating it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectLedger {
    records: ArrayVec<ActiveEffect, { CombatConfig::MAX_ACTIVE_EFFECTS }>,
    participant_count: u32,
}

impl EffectLedger {
    /// An empty ledger for an encounter of `participant_count` combatants.
    /// The count fixes the rounds-to-ticks conversion for the whole encounter.
    pub fn new(participant_count: u32) -> Self {
        Self {
            records: ArrayVec::new(),
            participant_count: participant_count.max(1),
        }
    }

    /// Applies an effect to a target.
    ///
    /// If a record of the same kind already targets `target`, the two merge:
    /// the incoming spec replaces the live magnitude, duration, and periodic
    /// payload only when its magnitude-over-duration rate is strictly
    /// greater, and the remaining ticks are always extended by the incoming
    /// duration (ticks accumulate, they are never replaced). Afterwards, any
    /// other effect on the target whose required components are denied by
    /// the incoming effect is interrupted and removed.
    pub fn apply(&mut self, target: CombatantId, spec: EffectSpec) {
        let added_ticks = spec.duration_rounds * self.participant_count;
        if added_ticks == 0 {
            // a zero-round effect would sit at zero ticks and still fire its
            // periodic payload on the next advance; it never becomes a record
            debug!(%target, kind = %spec.kind, "zero-duration effect discarded");
            return;
        }
        let blocks = spec.blocks;
        let kind = spec.kind;

        if let Some(existing) = self
            .records
            .iter_mut()
            .find(|r| r.target == target && r.spec.kind == kind)
        {
            if spec.rate_exceeds(&existing.spec) {
                existing.spec.magnitude = spec.magnitude;
                existing.spec.duration_rounds = spec.duration_rounds;
                existing.spec.on_tick = spec.on_tick;
                existing.spec.cadence = spec.cadence;
                debug!(%target, %kind, "stronger effect replaces live record");
            }
            existing.remaining_ticks += added_ticks;
            debug!(
                %target,
                %kind,
                ticks = existing.remaining_ticks,
                "effect merged, countdown extended"
            );
        } else if self.records.is_full() {
            warn!(%target, %kind, "effect ledger full, application dropped");
            return;
        } else {
            self.records.push(ActiveEffect {
                target,
                spec,
                remaining_ticks: added_ticks,
            });
            debug!(%target, %kind, ticks = added_ticks, "effect applied");
        }

        self.interrupt(target, kind, blocks);
    }

    /// Removes every other effect on `target` whose required components the
    /// incoming effect denies.
    fn interrupt(&mut self, target: CombatantId, incoming: EffectKind, blocks: SpellComponents) {
        if blocks.is_empty() {
            return;
        }
        self.records.retain(|r| {
            let interrupted =
                r.target == target && r.spec.kind != incoming && r.spec.requires.intersects(blocks);
            if interrupted {
                debug!(%target, kind = %r.spec.kind, by = %incoming, "casting interrupted");
            }
            !interrupted
        });
    }

    /// Deletes the matching record if present. Idempotent: removing an
    /// absent effect is a no-op, never an error.
    pub fn remove(&mut self, target: CombatantId, kind: EffectKind) -> bool {
        let before = self.records.len();
        self.records.retain(|r| !(r.target == target && r.spec.kind == kind));
        let removed = self.records.len() < before;
        if removed {
            debug!(%target, %kind, "effect removed");
        }
        removed
    }

    /// Advances every record by one tick.
    ///
    /// Per record, in order: fire the periodic payload when the cadence says
    /// so (round boundary, or every tick), decrement the countdown, fire the
    /// expiry payload if the countdown just hit zero, and finally drop every
    /// spent record.
    pub fn tick_all(&mut self, roster: &mut Roster) {
        let cycle = self.participant_count;
        for record in self.records.iter_mut() {
            if let Some(payload) = record.spec.on_tick {
                let fires = match record.spec.cadence {
                    TickCadence::EveryRound => record.remaining_ticks % cycle == 0,
                    TickCadence::EveryTick => true,
                };
                if fires {
                    deliver_tick(roster, record.target, record.spec.kind, payload);
                }
            }

            let before = record.remaining_ticks;
            record.remaining_ticks = record.remaining_ticks.saturating_sub(1);

            if before > 0 && record.remaining_ticks == 0 {
                if let Some(payload) = record.spec.on_expire {
                    deliver_expiry(roster, record.target, record.spec.kind, payload);
                }
                debug!(target = %record.target, kind = %record.spec.kind, "effect expired");
            }
        }
        self.records.retain(|r| r.remaining_ticks > 0);
    }

    /// All live effects on one target, for decision-makers and the
    /// action-blocking check.
    pub fn for_target(&self, target: CombatantId) -> impl Iterator<Item = &ActiveEffect> {
        self.records.iter().filter(move |r| r.target == target)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.records.iter()
    }

    pub fn has(&self, target: CombatantId, kind: EffectKind) -> bool {
        self.for_target(target).any(|r| r.spec.kind == kind)
    }

    /// True when any live effect forbids the target from acting.
    pub fn blocks_action(&self, target: CombatantId) -> bool {
        self.for_target(target).any(|r| r.spec.blocks_action)
    }

    /// Union of the components denied to a target by live effects.
    pub fn blocked_components(&self, target: CombatantId) -> SpellComponents {
        self.for_target(target)
            .fold(SpellComponents::empty(), |acc, r| acc | r.spec.blocks)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn deliver_tick(roster: &mut Roster, target: CombatantId, kind: EffectKind, payload: TickPayload) {
    match payload {
        TickPayload::Damage { amount } => {
            if let Some(combatant) = roster.combatant_mut(target) {
                let dealt = combatant.take_damage(amount);
                debug!(%target, %kind, dealt, "periodic damage");
            }
        }
        TickPayload::Heal { amount } => {
            if let Some(combatant) = roster.combatant_mut(target) {
                let healed = combatant.heal(amount);
                debug!(%target, %kind, healed, "periodic healing");
            }
        }
    }
}

fn deliver_expiry(
    roster: &mut Roster,
    target: CombatantId,
    kind: EffectKind,
    payload: ExpiryPayload,
) {
    match payload {
        ExpiryPayload::Damage { amount, victim } => {
            let struck = victim.unwrap_or(target);
            if let Some(combatant) = roster.combatant_mut(struck) {
                let dealt = combatant.take_damage(amount);
                debug!(target = %struck, %kind, dealt, "expiry damage");
            }
        }
        ExpiryPayload::Heal { amount } => {
            if let Some(combatant) = roster.combatant_mut(target) {
                let healed = combatant.heal(amount);
                debug!(%target, %kind, healed, "expiry healing");
            }
        }
    }
}
