//! Initiative order and the cyclic turn pointer.
//!
//! The queue is a permutation of every combatant from both parties, drawn
//! once when the encounter is built and fixed for its whole lifetime. Only
//! the current-turn pointer moves.

use arrayvec::ArrayVec;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::combatant::CombatantId;
use crate::config::CombatConfig;
use crate::effect::EffectLedger;
use crate::error::EncounterError;
use crate::party::Roster;

/// How the initiative permutation is drawn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitiativeOrder {
    /// Shuffle with operating-system entropy.
    #[default]
    Random,
    /// Shuffle with a fixed seed; reproducible across runs.
    Seeded(u64),
    /// Explicit permutation; must list every combatant exactly once.
    Fixed(Vec<CombatantId>),
}

/// The fixed turn-order permutation plus the moving turn pointer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitiativeQueue {
    order: ArrayVec<CombatantId, { CombatConfig::MAX_COMBATANTS }>,
    cursor: usize,
}

impl InitiativeQueue {
    /// Draws the turn order over `ids` (the roster in seating order).
    pub fn draw(ids: &[CombatantId], order: &InitiativeOrder) -> Result<Self, EncounterError> {
        let sequence: Vec<CombatantId> = match order {
            InitiativeOrder::Random => {
                let mut shuffled = ids.to_vec();
                shuffled.shuffle(&mut rand::rng());
                shuffled
            }
            InitiativeOrder::Seeded(seed) => {
                let mut shuffled = ids.to_vec();
                shuffled.shuffle(&mut StdRng::seed_from_u64(*seed));
                shuffled
            }
            InitiativeOrder::Fixed(permutation) => {
                if !is_permutation_of(permutation, ids) {
                    return Err(EncounterError::InvalidInitiative);
                }
                permutation.clone()
            }
        };

        if sequence.is_empty() {
            return Err(EncounterError::InvalidInitiative);
        }
        let mut drawn = ArrayVec::new();
        for id in sequence {
            if drawn.try_push(id).is_err() {
                return Err(EncounterError::InvalidInitiative);
            }
        }
        debug!(order = ?drawn, "initiative drawn");

        Ok(Self {
            order: drawn,
            cursor: 0,
        })
    }

    /// The combatant whose turn it currently is.
    pub fn current(&self) -> CombatantId {
        self.order[self.cursor]
    }

    /// The full permutation, fixed since the draw.
    pub fn order(&self) -> &[CombatantId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Moves the pointer to the next combatant able to act, cyclically,
    /// skipping the downed. The ledger ticks exactly once per combatant
    /// stepped past, downed ones included, so effects decay in real turn
    /// order even while their holder is incapacitated.
    ///
    /// Callers must check termination first: with every combatant downed
    /// there is no next turn to find.
    pub(crate) fn advance(&mut self, ledger: &mut EffectLedger, roster: &mut Roster) {
        loop {
            self.cursor = (self.cursor + 1) % self.order.len();
            ledger.tick_all(roster);
            if !roster.is_downed(self.current()) {
                return;
            }
            debug!(skipped = %self.current(), "downed combatant skipped");
        }
    }
}

fn is_permutation_of(candidate: &[CombatantId], roster_ids: &[CombatantId]) -> bool {
    if candidate.len() != roster_ids.len() {
        return false;
    }
    let mut lhs = candidate.to_vec();
    let mut rhs = roster_ids.to_vec();
    lhs.sort_unstable();
    rhs.sort_unstable();
    lhs == rhs
}
