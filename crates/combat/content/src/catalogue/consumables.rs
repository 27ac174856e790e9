//! Consumables carried in a satchel, reached through a two-step menu.
//!
//! The satchel contributes only the `use_item` opener to the turn offer;
//! opening it does not consume the turn. The concrete drink actions name
//! `use_item` as their parent, which makes them legal to submit while the
//! opener is offered.

use std::sync::{Arc, Mutex};

use combat_core::{
    Action, ActionCategory, ActionHandle, ActionId, ActionOutcome, CombatantId, Item, TurnContext,
    TurnSnapshot,
};

const POTION_HEAL: u32 = 8;

struct Stock {
    potions: Mutex<u32>,
}

/// The belt satchel holding healing potions.
pub struct Satchel {
    stock: Arc<Stock>,
}

impl Satchel {
    pub fn new(potions: u32) -> Self {
        Self {
            stock: Arc::new(Stock {
                potions: Mutex::new(potions),
            }),
        }
    }

    pub fn into_handle(self) -> Arc<Satchel> {
        Arc::new(self)
    }

    /// The concrete drink action; submitted while the opener is offered.
    pub fn drink_potion(&self) -> ActionHandle {
        drink_handle(self.stock.clone())
    }

    pub fn potions_left(&self) -> u32 {
        *self.stock.potions.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Item for Satchel {
    fn name(&self) -> &str {
        "Satchel"
    }

    fn actions(&self) -> Vec<ActionHandle> {
        vec![Arc::new(OpenSatchel {
            id: ActionId::new("use_item"),
            stock: self.stock.clone(),
        })]
    }
}

fn drink_handle(stock: Arc<Stock>) -> ActionHandle {
    Arc::new(DrinkPotion {
        id: ActionId::new("drink:healing_potion"),
        parent: ActionId::new("use_item"),
        stock,
    })
}

/// Rummage through the satchel. Never consumes the turn; the follow-up
/// drink actions it exposes as children do.
struct OpenSatchel {
    id: ActionId,
    stock: Arc<Stock>,
}

impl Action for OpenSatchel {
    fn id(&self) -> &ActionId {
        &self.id
    }

    fn category(&self) -> ActionCategory {
        ActionCategory::Item
    }

    fn children(&self) -> Vec<ActionHandle> {
        vec![drink_handle(self.stock.clone())]
    }

    fn available_targets(&self, snapshot: &TurnSnapshot) -> Vec<CombatantId> {
        vec![snapshot.active.id]
    }

    fn execute(&self, _target: Option<CombatantId>, _ctx: &mut TurnContext<'_>) -> ActionOutcome {
        ActionOutcome::NotConsumed
    }
}

/// Pour a potion down a throat, the drinker's own or an ally's.
struct DrinkPotion {
    id: ActionId,
    parent: ActionId,
    stock: Arc<Stock>,
}

impl Action for DrinkPotion {
    fn id(&self) -> &ActionId {
        &self.id
    }

    fn parent(&self) -> Option<&ActionId> {
        Some(&self.parent)
    }

    fn category(&self) -> ActionCategory {
        ActionCategory::Item
    }

    /// Allies, the drinker included, most wounded first.
    fn available_targets(&self, snapshot: &TurnSnapshot) -> Vec<CombatantId> {
        if self.stock.potions.lock().map(|p| *p).unwrap_or(0) == 0 {
            return Vec::new();
        }
        let mut allies: Vec<_> = snapshot.allies.iter().filter(|a| !a.downed).collect();
        allies.sort_by_key(|a| a.hit_points.current);
        allies.into_iter().map(|a| a.id).collect()
    }

    fn execute(&self, target: Option<CombatantId>, ctx: &mut TurnContext<'_>) -> ActionOutcome {
        let Some(target) = target else {
            return ActionOutcome::NotConsumed;
        };
        if ctx.combatant(target).is_none() {
            return ActionOutcome::NotConsumed;
        }

        {
            let mut potions = match self.stock.potions.lock() {
                Ok(potions) => potions,
                Err(poisoned) => poisoned.into_inner(),
            };
            if *potions == 0 {
                return ActionOutcome::NotConsumed;
            }
            *potions -= 1;
        }

        match ctx.combatant_mut(target) {
            Some(combatant) => ActionOutcome::magnitude(combatant.heal(POTION_HEAL) as i32),
            None => ActionOutcome::NotConsumed,
        }
    }
}
