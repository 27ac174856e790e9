//! Reference combatant implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use combat_core::{
    ActionHandle, Combatant, CombatantId, DecisionProvider, ItemHandle, ResourceMeter, SkillId,
    SpellHandle,
};

use crate::catalogue::basics;

/// Per-skill practice tally, shared with the application so progress survives
/// the encounter releasing its fighters.
pub type PracticeTally = Arc<Mutex<HashMap<SkillId, u32>>>;

/// A flesh-and-blood participant: meters, gear, spellbook, and optionally a
/// tactic that makes it autonomous.
///
/// Every fighter starts with the basic guard and pass actions; weapons,
/// satchels and spells add the rest of the turn offer.
pub struct Fighter {
    id: CombatantId,
    name: String,
    hit_points: ResourceMeter,
    mana: ResourceMeter,
    intrinsic: Vec<ActionHandle>,
    equipment: Vec<ItemHandle>,
    spellbook: Vec<SpellHandle>,
    tactic: Option<Box<dyn DecisionProvider>>,
    practice: PracticeTally,
}

impl Fighter {
    pub fn new(id: u32, name: impl Into<String>, hit_points: u32, mana: u32) -> Self {
        Self {
            id: CombatantId(id),
            name: name.into(),
            hit_points: ResourceMeter::full(hit_points),
            mana: ResourceMeter::full(mana),
            intrinsic: vec![basics::guard(), basics::pass()],
            equipment: Vec::new(),
            spellbook: Vec::new(),
            tactic: None,
            practice: PracticeTally::default(),
        }
    }

    pub fn equip(mut self, item: ItemHandle) -> Self {
        self.equipment.push(item);
        self
    }

    pub fn learn(mut self, spell: SpellHandle) -> Self {
        self.spellbook.push(spell);
        self
    }

    /// Makes the fighter autonomous: the engine consults `tactic` instead of
    /// suspending on its turns.
    pub fn with_tactic(mut self, tactic: Box<dyn DecisionProvider>) -> Self {
        self.tactic = Some(tactic);
        self
    }

    /// Handle onto the skill-practice tally; clone it before boxing the
    /// fighter into a party.
    pub fn practice_tally(&self) -> PracticeTally {
        self.practice.clone()
    }
}

impl Combatant for Fighter {
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

    fn equipment(&self) -> &[ItemHandle] {
        &self.equipment
    }

    fn spellbook(&self) -> &[SpellHandle] {
        &self.spellbook
    }

    fn decision_provider(&self) -> Option<&dyn DecisionProvider> {
        self.tactic.as_deref()
    }

    fn practice_skill(&mut self, skill: &SkillId) {
        let mut tally = match self.practice.lock() {
            Ok(tally) => tally,
            Err(poisoned) => poisoned.into_inner(),
        };
        *tally.entry(skill.clone()).or_default() += 1;
    }
}
