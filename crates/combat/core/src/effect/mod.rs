//! Status effect model.
//!
//! Effects are described by an [`EffectSpec`] (what the effect is) and
//! recorded by the [`EffectLedger`] as live countdowns (what is currently in
//! force). Durations are authored in rounds; the ledger tracks them in
//! per-turn ticks so a per-round payload can fire exactly once per full
//! initiative cycle while expiry stays precise.

mod ledger;

pub use ledger::{ActiveEffect, EffectLedger};

use bitflags::bitflags;

use crate::combatant::CombatantId;

/// Closed set of status conditions the engine understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EffectKind {
    // ========================================================================
    // Crowd control
    // ========================================================================
    /// Cannot act at all; only the incapacitated stub is offered.
    Stunned,
    /// Somatic components are denied (bound limbs).
    Entangled,
    /// Verbal components are denied (gagged, muted).
    Silenced,

    // ========================================================================
    // Over-time conditions
    // ========================================================================
    /// Damage over time.
    Poisoned,
    /// Fire damage, burning on every single tick.
    Burning,
    /// Recovery over time.
    Regenerating,

    // ========================================================================
    // Stances and concentration
    // ========================================================================
    /// Defensive stance; strikes against the target are weakened.
    Guarded,
    /// Holding a spell: needs free components, detonates on expiry.
    Channeling,
}

bitflags! {
    /// Spell-delivery components an effect can deny or depend on.
    ///
    /// When an applied effect denies a component that a live effect on the
    /// same target requires, the live effect is interrupted and removed.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SpellComponents: u8 {
        /// Free gestures.
        const SOMATIC = 1 << 0;
        /// Audible incantation.
        const VERBAL = 1 << 1;
    }
}

// serde sees the raw bit pattern; unknown bits in stored data are dropped
// rather than rejected.
#[cfg(feature = "serde")]
impl serde::Serialize for SpellComponents {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SpellComponents {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = <u8 as serde::Deserialize>::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

/// How often a periodic payload fires while its effect is live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickCadence {
    /// Once per full pass of the initiative queue.
    #[default]
    EveryRound,
    /// On every individual turn advance.
    EveryTick,
}

/// Periodic payload applied to the effect's target while it is live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickPayload {
    Damage { amount: u32 },
    Heal { amount: u32 },
}

/// One-shot payload fired when the effect's countdown runs out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpiryPayload {
    /// Damage on expiry. `victim` overrides the effect's own target, which
    /// lets a channelled spell sit on its caster and still land elsewhere.
    Damage {
        amount: u32,
        victim: Option<CombatantId>,
    },
    /// Heal the effect's target on expiry.
    Heal { amount: u32 },
}

/// Immutable description of a status effect, authored by content.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    pub kind: EffectKind,

    /// Lifetime in rounds; converted to per-turn ticks when recorded.
    pub duration_rounds: u32,

    /// Strength used for the magnitude-over-duration comparison when a
    /// repeat application of the same kind merges into a live record.
    pub magnitude: Option<u32>,

    pub cadence: TickCadence,
    pub on_tick: Option<TickPayload>,
    pub on_expire: Option<ExpiryPayload>,

    /// Target cannot act at all while this is in force.
    pub blocks_action: bool,

    /// Components this effect denies its target.
    pub blocks: SpellComponents,

    /// Components this effect needs to stay alive (concentration).
    pub requires: SpellComponents,
}

impl EffectSpec {
    pub fn new(kind: EffectKind, duration_rounds: u32) -> Self {
        Self {
            kind,
            duration_rounds,
            magnitude: None,
            cadence: TickCadence::EveryRound,
            on_tick: None,
            on_expire: None,
            blocks_action: false,
            blocks: SpellComponents::empty(),
            requires: SpellComponents::empty(),
        }
    }

    pub fn with_magnitude(mut self, magnitude: u32) -> Self {
        self.magnitude = Some(magnitude);
        self
    }

    pub fn with_cadence(mut self, cadence: TickCadence) -> Self {
        self.cadence = cadence;
        self
    }

    pub fn with_tick_payload(mut self, payload: TickPayload) -> Self {
        self.on_tick = Some(payload);
        self
    }

    pub fn with_expiry_payload(mut self, payload: ExpiryPayload) -> Self {
        self.on_expire = Some(payload);
        self
    }

    pub fn blocking_action(mut self) -> Self {
        self.blocks_action = true;
        self
    }

    pub fn blocking(mut self, components: SpellComponents) -> Self {
        self.blocks = components;
        self
    }

    pub fn requiring(mut self, components: SpellComponents) -> Self {
        self.requires = components;
        self
    }

    /// Magnitude-per-round comparison, cross-multiplied to stay in integers.
    /// A missing magnitude counts as zero; a zero duration counts as one
    /// round so the rate stays finite.
    pub(crate) fn rate_exceeds(&self, other: &EffectSpec) -> bool {
        let lhs = u64::from(self.magnitude.unwrap_or(0)) * u64::from(other.duration_rounds.max(1));
        let rhs = u64::from(other.magnitude.unwrap_or(0)) * u64::from(self.duration_rounds.max(1));
        lhs > rhs
    }
}
