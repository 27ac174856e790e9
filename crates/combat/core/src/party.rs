//! Parties and the combined encounter roster.
//!
//! Membership is fixed at construction: combatants never join or leave a
//! running encounter, only their meters and effects change.

use crate::combatant::{Combatant, CombatantId};
use crate::config::CombatConfig;
use crate::error::EncounterError;

/// Which side of the encounter a combatant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PartyId {
    First,
    Second,
}

impl PartyId {
    pub fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// Ordered collection of combatants assigned to one side.
pub struct Party {
    members: Vec<Box<dyn Combatant>>,
}

impl Party {
    /// Builds a party, rejecting empty or oversized rosters.
    pub fn new(members: Vec<Box<dyn Combatant>>) -> Result<Self, EncounterError> {
        if members.is_empty() {
            return Err(EncounterError::EmptyParty);
        }
        if members.len() > CombatConfig::MAX_PARTY_SIZE {
            return Err(EncounterError::PartyTooLarge {
                size: members.len(),
                max: CombatConfig::MAX_PARTY_SIZE,
            });
        }
        Ok(Self { members })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn into_members(self) -> Vec<Box<dyn Combatant>> {
        self.members
    }
}

impl std::fmt::Debug for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Party")
            .field("members", &self.members.iter().map(|m| m.id()).collect::<Vec<_>>())
            .finish()
    }
}

struct Seat {
    combatant: Box<dyn Combatant>,
    party: PartyId,
}

/// Every combatant in the encounter, tagged with the side they fight for.
///
/// Seating order is first party then second party; the initiative queue is a
/// permutation over this roster's ids.
pub struct Roster {
    seats: Vec<Seat>,
}

impl Roster {
    /// Merges two parties, rejecting duplicate combatant ids.
    pub fn new(first: Party, second: Party) -> Result<Self, EncounterError> {
        let mut seats = Vec::with_capacity(first.len() + second.len());
        for combatant in first.into_members() {
            seats.push(Seat {
                combatant,
                party: PartyId::First,
            });
        }
        for combatant in second.into_members() {
            seats.push(Seat {
                combatant,
                party: PartyId::Second,
            });
        }

        for (index, seat) in seats.iter().enumerate() {
            let id = seat.combatant.id();
            if seats[..index].iter().any(|s| s.combatant.id() == id) {
                return Err(EncounterError::DuplicateCombatant { id });
            }
        }

        Ok(Self { seats })
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Combatant ids in seating order.
    pub fn ids(&self) -> Vec<CombatantId> {
        self.seats.iter().map(|s| s.combatant.id()).collect()
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&dyn Combatant> {
        self.seats
            .iter()
            .find(|s| s.combatant.id() == id)
            .map(|s| s.combatant.as_ref())
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut dyn Combatant> {
        self.seats
            .iter_mut()
            .find(|s| s.combatant.id() == id)
            .map(|s| s.combatant.as_mut() as &mut dyn Combatant)
    }

    pub fn party_of(&self, id: CombatantId) -> Option<PartyId> {
        self.seats
            .iter()
            .find(|s| s.combatant.id() == id)
            .map(|s| s.party)
    }

    /// Members of one party, in seating order.
    pub fn members_of(&self, party: PartyId) -> impl Iterator<Item = &dyn Combatant> {
        self.seats
            .iter()
            .filter(move |s| s.party == party)
            .map(|s| s.combatant.as_ref())
    }

    /// Summed current hit points of one party. Recomputed on every call; the
    /// win check must observe damage the instant it lands.
    pub fn party_hit_points(&self, party: PartyId) -> u32 {
        self.members_of(party)
            .map(|c| c.hit_points().current)
            .sum()
    }

    /// Treats unknown ids as downed so scheduling never selects them.
    pub fn is_downed(&self, id: CombatantId) -> bool {
        self.combatant(id).map(|c| c.is_downed()).unwrap_or(true)
    }

    /// Ids sharing a party with `id`, the combatant itself included.
    pub fn allies_of(&self, id: CombatantId) -> Vec<CombatantId> {
        match self.party_of(id) {
            Some(party) => self.members_of(party).map(|c| c.id()).collect(),
            None => Vec::new(),
        }
    }

    /// Ids seated on the opposing party.
    pub fn enemies_of(&self, id: CombatantId) -> Vec<CombatantId> {
        match self.party_of(id) {
            Some(party) => self
                .members_of(party.opponent())
                .map(|c| c.id())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Releases the combatants, first party then second, once the encounter
    /// is over.
    pub fn into_members(self) -> (Vec<Box<dyn Combatant>>, Vec<Box<dyn Combatant>>) {
        let mut first = Vec::new();
        let mut second = Vec::new();
        for seat in self.seats {
            match seat.party {
                PartyId::First => first.push(seat.combatant),
                PartyId::Second => second.push(seat.combatant),
            }
        }
        (first, second)
    }
}
