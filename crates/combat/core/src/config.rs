use crate::initiative::InitiativeOrder;

/// Encounter configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatConfig {
    /// How the initiative permutation is drawn when the encounter is built.
    pub initiative: InitiativeOrder,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum combatants on one side.
    pub const MAX_PARTY_SIZE: usize = 8;
    /// Maximum combatants in the whole encounter (two full parties).
    pub const MAX_COMBATANTS: usize = Self::MAX_PARTY_SIZE * 2;
    /// Maximum live status effect records across all targets.
    pub const MAX_ACTIVE_EFFECTS: usize = 32;

    pub fn new() -> Self {
        Self {
            initiative: InitiativeOrder::Random,
        }
    }

    /// Reproducible initiative draw for replays and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            initiative: InitiativeOrder::Seeded(seed),
        }
    }

    pub fn with_initiative(initiative: InitiativeOrder) -> Self {
        Self { initiative }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
