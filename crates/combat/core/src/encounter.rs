//! The encounter controller: a pull-based suspend/resume state machine.
//!
//! Each step produces either a [`TurnSnapshot`] (an externally driven
//! combatant must decide) or the terminal [`CombatResult`]. Autonomous
//! combatants are resolved in place by consulting their decision provider,
//! so a fully autonomous encounter finishes inside a single `start()` call.
//! The controller owns every piece of mutable state; drivers only read
//! snapshots and feed decisions back through `resume()`.

use tracing::{debug, info, trace};

use crate::action::{ActionCategory, ActionHandle, Decision};
use crate::combatant::{Combatant, CombatantId, ResourceMeter};
use crate::config::CombatConfig;
use crate::effect::{ActiveEffect, EffectKind, EffectLedger, SpellComponents};
use crate::error::EncounterError;
use crate::executor::{TurnContext, ensure_offered, offered_actions};
use crate::initiative::InitiativeQueue;
use crate::party::{Party, PartyId, Roster};

/// Read-only view of a combatant, frozen for one turn.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantView {
    pub id: CombatantId,
    pub name: String,
    pub party: PartyId,
    pub hit_points: ResourceMeter,
    pub mana: ResourceMeter,
    pub downed: bool,
}

/// Read-only view of one live effect record.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectView {
    pub target: CombatantId,
    pub kind: EffectKind,
    pub remaining_ticks: u32,
    pub blocks_action: bool,
    /// Spell components the effect denies its target.
    pub blocks: SpellComponents,
}

impl From<&ActiveEffect> for EffectView {
    fn from(record: &ActiveEffect) -> Self {
        Self {
            target: record.target,
            kind: record.spec.kind,
            remaining_ticks: record.remaining_ticks,
            blocks_action: record.spec.blocks_action,
            blocks: record.spec.blocks,
        }
    }
}

/// Everything a decision-maker may consult for the current turn.
///
/// Built fresh each turn and never persisted. `allies` includes the active
/// combatant itself; both lists keep roster seating order.
#[derive(Clone)]
pub struct TurnSnapshot {
    /// Turns resolved so far, starting at zero.
    pub turn: u64,
    pub active: CombatantView,
    /// Actions the active combatant may legally submit this turn.
    pub offered: Vec<ActionHandle>,
    pub allies: Vec<CombatantView>,
    pub enemies: Vec<CombatantView>,
    /// Every live effect across the encounter, not just the active combatant's.
    pub effects: Vec<EffectView>,
}

impl TurnSnapshot {
    /// Looks an offered action up by its string id.
    pub fn offered_action(&self, id: &str) -> Option<&ActionHandle> {
        self.offered.iter().find(|a| a.id().as_str() == id)
    }

    pub fn effects_on(&self, target: CombatantId) -> impl Iterator<Item = &EffectView> {
        self.effects.iter().filter(move |e| e.target == target)
    }

    /// Union of the components currently denied to a combatant.
    pub fn blocked_components(&self, target: CombatantId) -> SpellComponents {
        self.effects_on(target)
            .fold(SpellComponents::empty(), |acc, e| acc | e.blocks)
    }
}

impl std::fmt::Debug for TurnSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnSnapshot")
            .field("turn", &self.turn)
            .field("active", &self.active.id)
            .field(
                "offered",
                &self.offered.iter().map(|a| a.id()).collect::<Vec<_>>(),
            )
            .field("effects", &self.effects)
            .finish()
    }
}

/// Terminal outcome of an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatResult {
    pub winner: PartyId,
}

/// What one step of the encounter hands back to the driver.
#[derive(Debug)]
pub enum Step {
    /// An externally driven combatant must decide; feed the choice back via
    /// [`Encounter::resume`].
    Turn(TurnSnapshot),
    /// The encounter is over. Further `resume()` calls are errors.
    Finished(CombatResult),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// `start()` has not been called.
    Idle,
    /// Suspended on an externally driven combatant's turn.
    AwaitingDecision,
    Finished(CombatResult),
}

/// A running two-party encounter.
///
/// Construction seats both parties and draws the initiative permutation;
/// `start()` then plays autonomous turns until the encounter either finishes
/// or suspends on an externally driven combatant. The suspension is a strict
/// request/response handshake: nothing happens between the returned snapshot
/// and the matching `resume()`.
pub struct Encounter {
    roster: Roster,
    queue: InitiativeQueue,
    ledger: EffectLedger,
    phase: Phase,
    turn: u64,
}

impl Encounter {
    /// Seats the two parties and draws initiative per `config`.
    pub fn new(
        first: Party,
        second: Party,
        config: CombatConfig,
    ) -> Result<Self, EncounterError> {
        let roster = Roster::new(first, second)?;
        let queue = InitiativeQueue::draw(&roster.ids(), &config.initiative)?;
        let ledger = EffectLedger::new(roster.len() as u32);
        info!(
            combatants = roster.len(),
            order = ?queue.order(),
            "encounter seated"
        );
        Ok(Self {
            roster,
            queue,
            ledger,
            phase: Phase::Idle,
            turn: 0,
        })
    }

    /// Begins the encounter.
    ///
    /// Returns the first snapshot an externally driven combatant must answer,
    /// or immediately the result if one side is already out (or every
    /// combatant is autonomous and the fight runs to its end).
    pub fn start(&mut self) -> Result<Step, EncounterError> {
        match self.phase {
            Phase::Idle => self.run(),
            Phase::Finished(_) => Err(EncounterError::Finished),
            Phase::AwaitingDecision => Err(EncounterError::AlreadyStarted),
        }
    }

    /// Feeds a decision to the suspended combatant and plays on.
    ///
    /// An empty or malformed decision resolves nothing: the same combatant's
    /// snapshot comes straight back. An action that is not offered fails with
    /// [`EncounterError::ActionNotAvailable`] and leaves the encounter
    /// suspended on the same turn, nothing mutated.
    pub fn resume(&mut self, decision: Decision) -> Result<Step, EncounterError> {
        match self.phase {
            Phase::Idle => Err(EncounterError::NotAwaitingDecision),
            Phase::Finished(_) => Err(EncounterError::Finished),
            Phase::AwaitingDecision => {
                self.record_practice(&decision);
                self.resolve(decision)?;
                self.run()
            }
        }
    }

    /// The terminal result, once one exists.
    pub fn result(&self) -> Option<CombatResult> {
        match self.phase {
            Phase::Finished(result) => Some(result),
            _ => None,
        }
    }

    /// The fixed initiative permutation drawn at construction.
    pub fn initiative(&self) -> &[CombatantId] {
        self.queue.order()
    }

    /// Read access to the seated combatants, for rendering.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Read access to the live effect records, for rendering.
    pub fn effects(&self) -> &EffectLedger {
        &self.ledger
    }

    /// Releases the combatants (first party, second party) once the fight is
    /// over or abandoned.
    pub fn into_parties(self) -> (Vec<Box<dyn Combatant>>, Vec<Box<dyn Combatant>>) {
        self.roster.into_members()
    }

    /// Plays turns until the encounter suspends or finishes.
    fn run(&mut self) -> Result<Step, EncounterError> {
        loop {
            if let Some(result) = self.winner() {
                info!(winner = %result.winner, "encounter decided");
                self.phase = Phase::Finished(result);
                return Ok(Step::Finished(result));
            }

            let snapshot = self.snapshot()?;
            let actor = snapshot.active.id;
            trace!(turn = snapshot.turn, %actor, "turn begun");

            let decision = {
                let combatant = self
                    .roster
                    .combatant(actor)
                    .ok_or(EncounterError::UnknownCombatant { id: actor })?;
                match combatant.decision_provider() {
                    Some(provider) => provider.decide(&snapshot),
                    None => {
                        self.phase = Phase::AwaitingDecision;
                        return Ok(Step::Turn(snapshot));
                    }
                }
            };
            self.resolve(decision)?;
        }
    }

    /// Resolves one submitted decision.
    ///
    /// Malformed decisions (no action; a targeted action without a target,
    /// or aimed at nobody in the roster) resolve nothing and are not errors.
    /// A legal action executes inside a turn-scoped context; any outcome
    /// other than `NotConsumed` advances initiative, which ticks the ledger.
    /// Termination is checked before the advance so no turn is produced past
    /// the decisive blow.
    fn resolve(&mut self, decision: Decision) -> Result<(), EncounterError> {
        let actor = self.queue.current();

        let Some(action) = decision.action else {
            trace!(%actor, "no decision made, combatant asked again");
            return Ok(());
        };

        let target = decision.target;
        if action.category() != ActionCategory::None {
            match target {
                None => {
                    debug!(%actor, action = %action.id(), "target required but missing");
                    return Ok(());
                }
                Some(id) if self.roster.combatant(id).is_none() => {
                    debug!(%actor, %id, "decision aimed at an unknown combatant");
                    return Ok(());
                }
                _ => {}
            }
        }

        let offered = {
            let combatant = self
                .roster
                .combatant(actor)
                .ok_or(EncounterError::UnknownCombatant { id: actor })?;
            offered_actions(combatant, &self.ledger)
        };
        ensure_offered(actor, action.as_ref(), &offered)?;

        let mut ctx = TurnContext::new(actor, &mut self.roster, &mut self.ledger);
        let outcome = action.execute(target, &mut ctx);
        debug!(%actor, action = %action.id(), ?outcome, "action resolved");

        if outcome.is_consumed() {
            self.turn += 1;
            if self.winner().is_none() {
                self.queue.advance(&mut self.ledger, &mut self.roster);
            }
        }
        Ok(())
    }

    /// Tells the suspended combatant's skill hook about a chosen action, if
    /// the action exercises a trainable skill.
    fn record_practice(&mut self, decision: &Decision) {
        let Some(action) = &decision.action else {
            return;
        };
        let Some(skill) = action.skill() else {
            return;
        };
        let skill = skill.clone();
        let actor = self.queue.current();
        if let Some(combatant) = self.roster.combatant_mut(actor) {
            trace!(%actor, %skill, "skill practiced");
            combatant.practice_skill(&skill);
        }
    }

    /// Recomputed from live meters on every call; the first party whose sum
    /// reaches zero loses.
    fn winner(&self) -> Option<CombatResult> {
        if self.roster.party_hit_points(PartyId::First) == 0 {
            Some(CombatResult {
                winner: PartyId::Second,
            })
        } else if self.roster.party_hit_points(PartyId::Second) == 0 {
            Some(CombatResult {
                winner: PartyId::First,
            })
        } else {
            None
        }
    }

    fn view_of(&self, combatant: &dyn Combatant) -> CombatantView {
        CombatantView {
            id: combatant.id(),
            name: combatant.name().to_owned(),
            party: self
                .roster
                .party_of(combatant.id())
                .unwrap_or(PartyId::First),
            hit_points: combatant.hit_points(),
            mana: combatant.mana(),
            downed: combatant.is_downed(),
        }
    }

    fn snapshot(&self) -> Result<TurnSnapshot, EncounterError> {
        let actor = self.queue.current();
        let combatant = self
            .roster
            .combatant(actor)
            .ok_or(EncounterError::UnknownCombatant { id: actor })?;
        let party = self
            .roster
            .party_of(actor)
            .ok_or(EncounterError::UnknownCombatant { id: actor })?;

        Ok(TurnSnapshot {
            turn: self.turn,
            active: self.view_of(combatant),
            offered: offered_actions(combatant, &self.ledger),
            allies: self
                .roster
                .members_of(party)
                .map(|c| self.view_of(c))
                .collect(),
            enemies: self
                .roster
                .members_of(party.opponent())
                .map(|c| self.view_of(c))
                .collect(),
            effects: self.ledger.iter().map(EffectView::from).collect(),
        })
    }
}
