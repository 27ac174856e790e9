//! Spells and the cast actions they convert into.
//!
//! A spell is uncastable while its delivery components are denied or the
//! caster lacks the mana: `available_targets` reports nothing, so tactics
//! skip it, and an execute forced through anyway fizzles without consuming
//! the turn.

use std::sync::Arc;

use combat_core::{
    Action, ActionCategory, ActionHandle, ActionId, ActionOutcome, CombatantId, EffectKind,
    EffectSpec, ExpiryPayload, Spell, SpellComponents, SpellHandle, TickCadence, TickPayload,
    TurnContext, TurnSnapshot,
};

/// Who a spell may be aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Aim {
    Enemy,
    Ally,
}

/// What happens when the spell lands.
#[derive(Clone, Debug)]
enum SpellPayload {
    /// Immediate damage to the target.
    Bolt { damage: u32 },
    /// Put an effect on the target.
    Afflict { spec: EffectSpec },
    /// Hold the spell: a Channeling effect sits on the caster and detonates
    /// on the target when it runs out, unless interrupted first.
    Channel { rounds: u32, damage: u32 },
}

struct SpellData {
    name: String,
    action_id: ActionId,
    mana_cost: u32,
    components: SpellComponents,
    aim: Aim,
    payload: SpellPayload,
}

/// A known spell, offered as one cast action.
pub struct Grimoire {
    data: Arc<SpellData>,
}

impl Grimoire {
    fn new(
        slug: &str,
        name: &str,
        mana_cost: u32,
        components: SpellComponents,
        aim: Aim,
        payload: SpellPayload,
    ) -> SpellHandle {
        Arc::new(Self {
            data: Arc::new(SpellData {
                name: name.to_owned(),
                action_id: ActionId::new(format!("cast:{slug}")),
                mana_cost,
                components,
                aim,
                payload,
            }),
        })
    }
}

impl Spell for Grimoire {
    fn name(&self) -> &str {
        &self.data.name
    }

    fn action(&self) -> ActionHandle {
        Arc::new(CastAction {
            data: self.data.clone(),
        })
    }
}

struct CastAction {
    data: Arc<SpellData>,
}

impl CastAction {
    /// Components free, mana in the pool.
    fn castable(&self, snapshot: &TurnSnapshot) -> bool {
        let blocked = snapshot.blocked_components(snapshot.active.id);
        !blocked.intersects(self.data.components)
            && snapshot.active.mana.current >= self.data.mana_cost
    }
}

impl Action for CastAction {
    fn id(&self) -> &ActionId {
        &self.data.action_id
    }

    fn category(&self) -> ActionCategory {
        ActionCategory::Spell
    }

    fn available_targets(&self, snapshot: &TurnSnapshot) -> Vec<CombatantId> {
        if !self.castable(snapshot) {
            return Vec::new();
        }
        let pool = match self.data.aim {
            Aim::Enemy => &snapshot.enemies,
            Aim::Ally => &snapshot.allies,
        };
        let mut candidates: Vec<_> = pool.iter().filter(|c| !c.downed).collect();
        candidates.sort_by_key(|c| c.hit_points.current);
        candidates.into_iter().map(|c| c.id).collect()
    }

    fn execute(&self, target: Option<CombatantId>, ctx: &mut TurnContext<'_>) -> ActionOutcome {
        let Some(target) = target else {
            return ActionOutcome::NotConsumed;
        };
        let caster = ctx.actor_id();

        // fizzle without consuming the turn when gagged, bound, or dry
        if ctx.blocked_components(caster).intersects(self.data.components) {
            return ActionOutcome::NotConsumed;
        }
        let paid = match ctx.actor_mut() {
            Some(actor) => actor.spend_mana(self.data.mana_cost),
            None => false,
        };
        if !paid {
            return ActionOutcome::NotConsumed;
        }

        match &self.data.payload {
            SpellPayload::Bolt { damage } => {
                let Some(victim) = ctx.combatant_mut(target) else {
                    return ActionOutcome::resolved();
                };
                let dealt = victim.take_damage(*damage);
                ActionOutcome::magnitude(dealt as i32)
            }
            SpellPayload::Afflict { spec } => {
                ctx.apply_effect(target, spec.clone());
                ActionOutcome::resolved()
            }
            SpellPayload::Channel { rounds, damage } => {
                ctx.apply_effect(
                    caster,
                    EffectSpec::new(EffectKind::Channeling, *rounds)
                        .requiring(self.data.components)
                        .with_expiry_payload(ExpiryPayload::Damage {
                            amount: *damage,
                            victim: Some(target),
                        }),
                );
                ActionOutcome::resolved()
            }
        }
    }
}

/// Quick jet of flame: 6 damage for 3 mana.
pub fn fire_bolt() -> SpellHandle {
    Grimoire::new(
        "fire_bolt",
        "Fire Bolt",
        3,
        SpellComponents::VERBAL | SpellComponents::SOMATIC,
        Aim::Enemy,
        SpellPayload::Bolt { damage: 6 },
    )
}

/// Steals the target's voice for two rounds, cutting any verbal casting.
pub fn hex_of_silence() -> SpellHandle {
    Grimoire::new(
        "hex_of_silence",
        "Hex of Silence",
        2,
        SpellComponents::VERBAL | SpellComponents::SOMATIC,
        Aim::Enemy,
        SpellPayload::Afflict {
            spec: EffectSpec::new(EffectKind::Silenced, 2).blocking(SpellComponents::VERBAL),
        },
    )
}

/// Held detonation: one round of channeling, then 12 damage to the target.
/// Denying the caster's voice or hands beforehand snuffs it out.
pub fn channel_blast() -> SpellHandle {
    Grimoire::new(
        "channel_blast",
        "Channelled Blast",
        4,
        SpellComponents::VERBAL | SpellComponents::SOMATIC,
        Aim::Enemy,
        SpellPayload::Channel {
            rounds: 1,
            damage: 12,
        },
    )
}

/// Clinging fire: one round of damage on every single turn advance.
pub fn ember() -> SpellHandle {
    Grimoire::new(
        "ember",
        "Ember",
        2,
        SpellComponents::VERBAL | SpellComponents::SOMATIC,
        Aim::Enemy,
        SpellPayload::Afflict {
            spec: EffectSpec::new(EffectKind::Burning, 1)
                .with_magnitude(2)
                .with_cadence(TickCadence::EveryTick)
                .with_tick_payload(TickPayload::Damage { amount: 2 }),
        },
    )
}

/// Grasping roots bind the target's hands for two rounds.
pub fn entangle() -> SpellHandle {
    Grimoire::new(
        "entangle",
        "Entangle",
        2,
        SpellComponents::SOMATIC,
        Aim::Enemy,
        SpellPayload::Afflict {
            spec: EffectSpec::new(EffectKind::Entangled, 2).blocking(SpellComponents::SOMATIC),
        },
    )
}

/// Two rounds of slow knitting with a final surge when it lapses.
pub fn regrowth() -> SpellHandle {
    Grimoire::new(
        "regrowth",
        "Regrowth",
        2,
        SpellComponents::VERBAL,
        Aim::Ally,
        SpellPayload::Afflict {
            spec: EffectSpec::new(EffectKind::Regenerating, 2)
                .with_magnitude(2)
                .with_tick_payload(TickPayload::Heal { amount: 2 })
                .with_expiry_payload(ExpiryPayload::Heal { amount: 3 }),
        },
    )
}
