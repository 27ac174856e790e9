//! Actions every fighter carries regardless of gear.

use std::sync::Arc;

use combat_core::{
    Action, ActionCategory, ActionHandle, ActionId, ActionOutcome, CombatantId, EffectKind,
    EffectSpec, TickCadence, TickPayload, TurnContext,
};

/// End the turn doing nothing.
struct Pass {
    id: ActionId,
}

impl Action for Pass {
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

pub fn pass() -> ActionHandle {
    Arc::new(Pass {
        id: ActionId::new("pass"),
    })
}

/// Raise the shield for one round: incoming strikes are weakened and the
/// fighter catches a breath of recovery on every tick.
struct Guard {
    id: ActionId,
}

impl Action for Guard {
    fn id(&self) -> &ActionId {
        &self.id
    }

    fn category(&self) -> ActionCategory {
        ActionCategory::None
    }

    fn execute(&self, _target: Option<CombatantId>, ctx: &mut TurnContext<'_>) -> ActionOutcome {
        let actor = ctx.actor_id();
        ctx.apply_effect(
            actor,
            EffectSpec::new(EffectKind::Guarded, 1)
                .with_cadence(TickCadence::EveryTick)
                .with_tick_payload(TickPayload::Heal { amount: 1 }),
        );
        ActionOutcome::resolved()
    }
}

pub fn guard() -> ActionHandle {
    Arc::new(Guard {
        id: ActionId::new("guard"),
    })
}
