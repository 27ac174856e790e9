//! Shared test fixtures: a minimal combatant and a handful of stub actions.

use std::sync::{Arc, Mutex};

use crate::action::{
    Action, ActionCategory, ActionHandle, ActionId, ActionOutcome, Decision, SkillId,
};
use crate::combatant::{Combatant, CombatantId, DecisionProvider, ResourceMeter};
use crate::encounter::TurnSnapshot;
use crate::executor::TurnContext;
use crate::party::{Party, Roster};

pub(crate) struct TestFighter {
    id: CombatantId,
    name: String,
    hit_points: ResourceMeter,
    mana: ResourceMeter,
    intrinsic: Vec<ActionHandle>,
    provider: Option<Box<dyn DecisionProvider>>,
    practice_log: Option<Arc<Mutex<Vec<SkillId>>>>,
}

impl TestFighter {
    pub(crate) fn new(id: u32, hit_points: u32) -> Self {
        Self {
            id: CombatantId(id),
            name: format!("fighter-{id}"),
            hit_points: ResourceMeter::full(hit_points),
            mana: ResourceMeter::full(10),
            intrinsic: Vec::new(),
            provider: None,
            practice_log: None,
        }
    }

    pub(crate) fn with_action(mut self, action: ActionHandle) -> Self {
        self.intrinsic.push(action);
        self
    }

    pub(crate) fn with_provider(mut self, provider: Box<dyn DecisionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub(crate) fn with_practice_log(mut self, log: Arc<Mutex<Vec<SkillId>>>) -> Self {
        self.practice_log = Some(log);
        self
    }

    /// Pre-encounter wound, for seeding downed fixtures.
    pub(crate) fn force_damage(&mut self, amount: u32) {
        self.hit_points.deplete(amount);
    }
}

impl Combatant for TestFighter {
    fn id(&self) -> CombatantId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn hit_points(&self) -> ResourceMeter {
        self.hit_points
    }

    fn mana(&self) -> ResourceMeter {
        self.mana
    }

    fn take_damage(&mut self, amount: u32) -> u32 {
        self.hit_points.deplete(amount)
    }

    fn heal(&mut self, amount: u32) -> u32 {
        self.hit_points.replenish(amount)
    }

    fn spend_mana(&mut self, amount: u32) -> bool {
        if self.mana.current < amount {
            return false;
        }
        self.mana.deplete(amount);
        true
    }

    fn restore_mana(&mut self, amount: u32) -> u32 {
        self.mana.replenish(amount)
    }

    fn intrinsic_actions(&self) -> Vec<ActionHandle> {
        self.intrinsic.clone()
    }

    fn decision_provider(&self) -> Option<&dyn DecisionProvider> {
        self.provider.as_deref()
    }

    fn practice_skill(&mut self, skill: &SkillId) {
        if let Some(log) = &self.practice_log {
            log.lock().unwrap().push(skill.clone());
        }
    }
}

struct FnProvider<F>(F);

impl<F> DecisionProvider for FnProvider<F>
where
    F: Fn(&TurnSnapshot) -> Decision + Send,
{
    fn decide(&self, snapshot: &TurnSnapshot) -> Decision {
        (self.0)(snapshot)
    }
}

pub(crate) fn provider_fn<F>(f: F) -> Box<dyn DecisionProvider>
where
    F: Fn(&TurnSnapshot) -> Decision + Send + 'static,
{
    Box::new(FnProvider(f))
}

/// Two single-fighter parties with ids 0 and 1, each carrying a strike.
pub(crate) fn duo_roster(first_hp: u32, second_hp: u32) -> Roster {
    let first = Party::new(vec![Box::new(
        TestFighter::new(0, first_hp).with_action(strike(3)),
    )])
    .unwrap();
    let second = Party::new(vec![Box::new(
        TestFighter::new(1, second_hp).with_action(strike(3)),
    )])
    .unwrap();
    Roster::new(first, second).unwrap()
}

/// Parties built from hit-point lists; ids run sequentially from 0.
pub(crate) fn roster_of(first_hp: &[u32], second_hp: &[u32]) -> Roster {
    let mut next = 0;
    let mut build = |hp_list: &[u32]| {
        let members = hp_list
            .iter()
            .map(|&hp| {
                let fighter = TestFighter::new(next, hp);
                next += 1;
                Box::new(fighter) as Box<dyn Combatant>
            })
            .collect();
        Party::new(members).unwrap()
    };
    let first = build(first_hp);
    let second = build(second_hp);
    Roster::new(first, second).unwrap()
}

enum StubBehavior {
    /// Deal flat damage to the target.
    Strike(u32),
    /// Open a sub-menu: the turn is not consumed.
    Menu,
    /// Consume the turn, touch nothing.
    Resolve,
}

struct StubAction {
    id: ActionId,
    parent: Option<ActionId>,
    category: ActionCategory,
    skill: Option<SkillId>,
    behavior: StubBehavior,
}

impl Action for StubAction {
    fn id(&self) -> &ActionId {
        &self.id
    }

    fn parent(&self) -> Option<&ActionId> {
        self.parent.as_ref()
    }

    fn category(&self) -> ActionCategory {
        self.category
    }

    fn skill(&self) -> Option<&SkillId> {
        self.skill.as_ref()
    }

    fn available_targets(&self, snapshot: &TurnSnapshot) -> Vec<CombatantId> {
        match self.behavior {
            StubBehavior::Strike(_) => snapshot
                .enemies
                .iter()
                .filter(|e| !e.downed)
                .map(|e| e.id)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn execute(&self, target: Option<CombatantId>, ctx: &mut TurnContext<'_>) -> ActionOutcome {
        match self.behavior {
            StubBehavior::Strike(damage) => {
                let Some(victim) = target.and_then(|id| ctx.combatant_mut(id)) else {
                    return ActionOutcome::NotConsumed;
                };
                let dealt = victim.take_damage(damage);
                ActionOutcome::magnitude(dealt as i32)
            }
            StubBehavior::Menu => ActionOutcome::NotConsumed,
            StubBehavior::Resolve => ActionOutcome::resolved(),
        }
    }
}

/// Flat-damage attack with id `strike`.
pub(crate) fn strike(damage: u32) -> ActionHandle {
    strike_action(damage, None)
}

pub(crate) fn strike_action(damage: u32, skill: Option<SkillId>) -> ActionHandle {
    Arc::new(StubAction {
        id: ActionId::new("strike"),
        parent: None,
        category: ActionCategory::Attack,
        skill,
        behavior: StubBehavior::Strike(damage),
    })
}

/// Menu opener: never consumes the turn.
pub(crate) fn menu_action(id: &str) -> ActionHandle {
    Arc::new(StubAction {
        id: ActionId::new(id),
        parent: None,
        category: ActionCategory::Item,
        skill: None,
        behavior: StubBehavior::Menu,
    })
}

/// Targetless sub-action of a menu; consumes the turn.
pub(crate) fn sub_action(id: &str, parent: &str) -> ActionHandle {
    Arc::new(StubAction {
        id: ActionId::new(id),
        parent: Some(ActionId::new(parent)),
        category: ActionCategory::None,
        skill: None,
        behavior: StubBehavior::Resolve,
    })
}

/// Targetless action that consumes the turn and does nothing.
pub(crate) fn noop(id: &str) -> ActionHandle {
    Arc::new(StubAction {
        id: ActionId::new(id),
        parent: None,
        category: ActionCategory::None,
        skill: None,
        behavior: StubBehavior::Resolve,
    })
}
