//! RON loaders resolving fighter specs against the catalogue.

use anyhow::{Context, bail};
use serde::Deserialize;

use combat_core::{CombatConfig, Party};

use crate::catalogue::{self, Satchel};
use crate::fighter::Fighter;
use crate::tactic::SimpleTactic;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// One fighter as written in a RON file.
#[derive(Debug, Clone, Deserialize)]
pub struct FighterSpec {
    pub id: u32,
    pub name: String,
    pub hit_points: u32,
    pub mana: u32,
    #[serde(default)]
    pub weapons: Vec<String>,
    #[serde(default)]
    pub spells: Vec<String>,
    #[serde(default)]
    pub potions: u32,
    /// Autonomous fighters are driven by [`SimpleTactic`]; the rest suspend
    /// the encounter and wait for an external decision.
    #[serde(default)]
    pub autonomous: bool,
}

/// A full two-party encounter as written in a RON file.
#[derive(Debug, Clone, Deserialize)]
pub struct EncounterSpec {
    pub first: Vec<FighterSpec>,
    pub second: Vec<FighterSpec>,
    /// Initiative seed; omit for operating-system entropy.
    pub seed: Option<u64>,
}

impl EncounterSpec {
    pub fn parse(source: &str) -> LoadResult<Self> {
        ron::from_str(source).context("failed to parse encounter RON")
    }

    /// Resolves the spec into seated parties plus the matching config.
    pub fn build(&self) -> LoadResult<(Party, Party, CombatConfig)> {
        let first = build_party(&self.first)?;
        let second = build_party(&self.second)?;
        let config = match self.seed {
            Some(seed) => CombatConfig::seeded(seed),
            None => CombatConfig::new(),
        };
        Ok((first, second, config))
    }
}

pub fn build_party(specs: &[FighterSpec]) -> LoadResult<Party> {
    let mut members = Vec::with_capacity(specs.len());
    for spec in specs {
        members.push(Box::new(build_fighter(spec)?) as _);
    }
    Party::new(members).map_err(|e| anyhow::anyhow!("invalid party: {e}"))
}

fn build_fighter(spec: &FighterSpec) -> LoadResult<Fighter> {
    let mut fighter = Fighter::new(spec.id, spec.name.clone(), spec.hit_points, spec.mana);

    for weapon in &spec.weapons {
        fighter = fighter.equip(match weapon.as_str() {
            "shortsword" => catalogue::shortsword(),
            "poisoned_blade" => catalogue::poisoned_blade(),
            "stunning_mace" => catalogue::stunning_mace(),
            unknown => bail!("unknown weapon '{unknown}' for fighter '{}'", spec.name),
        });
    }

    for spell in &spec.spells {
        fighter = fighter.learn(match spell.as_str() {
            "fire_bolt" => catalogue::fire_bolt(),
            "hex_of_silence" => catalogue::hex_of_silence(),
            "channel_blast" => catalogue::channel_blast(),
            "regrowth" => catalogue::regrowth(),
            "ember" => catalogue::ember(),
            "entangle" => catalogue::entangle(),
            unknown => bail!("unknown spell '{unknown}' for fighter '{}'", spec.name),
        });
    }

    if spec.potions > 0 {
        fighter = fighter.equip(Satchel::new(spec.potions).into_handle());
    }
    if spec.autonomous {
        fighter = fighter.with_tactic(Box::new(SimpleTactic));
    }
    Ok(fighter)
}

/// The bundled demonstration skirmish: one externally driven hero and an
/// autonomous opposition.
pub fn demo_encounter() -> LoadResult<(Party, Party, CombatConfig)> {
    EncounterSpec::parse(include_str!("data/demo.ron"))?.build()
}
