//! Reference catalogue of gear, spells, and the actions they expose.

pub mod basics;
pub mod consumables;
pub mod spells;
pub mod weapons;

pub use consumables::Satchel;
pub use spells::{channel_blast, ember, entangle, fire_bolt, hex_of_silence, regrowth};
pub use weapons::{Weapon, poisoned_blade, shortsword, stunning_mace};
