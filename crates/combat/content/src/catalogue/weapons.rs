//! Weapons and the strike actions they contribute.

use std::sync::Arc;

use combat_core::{
    Action, ActionCategory, ActionHandle, ActionId, ActionOutcome, CombatantId, EffectKind,
    EffectSpec, Item, ItemHandle, SkillId, TickPayload, TurnContext, TurnSnapshot,
};

/// An equippable weapon exposing a single strike action.
pub struct Weapon {
    name: String,
    action_id: ActionId,
    damage: u32,
    skill: SkillId,
    /// Effect smeared onto whoever the weapon strikes.
    venom: Option<EffectSpec>,
}

impl Weapon {
    pub fn new(slug: &str, name: impl Into<String>, damage: u32, skill: &str) -> Self {
        Self {
            name: name.into(),
            action_id: ActionId::new(format!("strike:{slug}")),
            damage,
            skill: SkillId::new(skill),
            venom: None,
        }
    }

    pub fn with_venom(mut self, venom: EffectSpec) -> Self {
        self.venom = Some(venom);
        self
    }

    pub fn into_handle(self) -> ItemHandle {
        Arc::new(self)
    }
}

impl Item for Weapon {
    fn name(&self) -> &str {
        &self.name
    }

    fn actions(&self) -> Vec<ActionHandle> {
        vec![Arc::new(Strike {
            id: self.action_id.clone(),
            damage: self.damage,
            skill: self.skill.clone(),
            venom: self.venom.clone(),
        })]
    }
}

/// Swing the weapon at an enemy. A guarded target takes half damage.
struct Strike {
    id: ActionId,
    damage: u32,
    skill: SkillId,
    venom: Option<EffectSpec>,
}

impl Action for Strike {
    fn id(&self) -> &ActionId {
        &self.id
    }

    fn category(&self) -> ActionCategory {
        ActionCategory::Attack
    }

    fn skill(&self) -> Option<&SkillId> {
        Some(&self.skill)
    }

    /// Living enemies, weakest first.
    fn available_targets(&self, snapshot: &TurnSnapshot) -> Vec<CombatantId> {
        let mut enemies: Vec<_> = snapshot.enemies.iter().filter(|e| !e.downed).collect();
        enemies.sort_by_key(|e| e.hit_points.current);
        enemies.into_iter().map(|e| e.id).collect()
    }

    fn execute(&self, target: Option<CombatantId>, ctx: &mut TurnContext<'_>) -> ActionOutcome {
        let Some(victim) = target else {
            return ActionOutcome::NotConsumed;
        };

        let damage = if ctx.has_effect(victim, EffectKind::Guarded) {
            self.damage / 2
        } else {
            self.damage
        };

        let Some(combatant) = ctx.combatant_mut(victim) else {
            return ActionOutcome::NotConsumed;
        };
        let dealt = combatant.take_damage(damage);

        if let Some(venom) = &self.venom {
            ctx.apply_effect(victim, venom.clone());
        }
        ActionOutcome::magnitude(dealt as i32)
    }
}

/// A plain sidearm.
pub fn shortsword() -> ItemHandle {
    Weapon::new("shortsword", "Shortsword", 6, "swordplay").into_handle()
}

/// A light blade whose cuts fester for two rounds.
pub fn poisoned_blade() -> ItemHandle {
    Weapon::new("poisoned_blade", "Poisoned Blade", 4, "swordplay")
        .with_venom(
            EffectSpec::new(EffectKind::Poisoned, 2)
                .with_magnitude(2)
                .with_tick_payload(TickPayload::Damage { amount: 2 }),
        )
        .into_handle()
}

/// A blunt head that rings the target senseless for a round.
pub fn stunning_mace() -> ItemHandle {
    Weapon::new("stunning_mace", "Stunning Mace", 3, "bludgeoning")
        .with_venom(EffectSpec::new(EffectKind::Stunned, 1).blocking_action())
        .into_handle()
}
