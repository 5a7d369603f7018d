//! Attack resolution.
//!
//! A single exchange: opposed dexterity draws decide hit or miss, then the
//! wielded weapon's dice (or bare-handed strength) decide damage. State
//! changes only happen on a hit.

use rand::Rng;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Item, ItemKind, Living};

/// Result of one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum AttackOutcome {
    /// The attacker's dexterity draw did not beat the defender's.
    Miss,
    Hit {
        damage: i32,
        /// Whether this blow reduced the defender to 0 or fewer hit points.
        slain: bool,
    },
}

impl AttackOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, AttackOutcome::Hit { .. })
    }
}

/// Resolve one attack from `attacker` against `defender`.
///
/// `weapon` is the item equipped in the attacker's weapon slot, already
/// fetched by the caller. Each side draws a uniform value in
/// `[0, dexterity]`; the attacker hits iff their draw is strictly greater.
/// On a hit the damage is applied to the defender immediately; a miss
/// changes nothing.
pub fn attack<R: Rng + ?Sized>(
    attacker: &Living,
    weapon: Option<&Item>,
    defender: &mut Living,
    rng: &mut R,
) -> AttackOutcome {
    let attack_draw = rng.gen_range(0..=attacker.attributes.dexterity.max(0));
    let defense_draw = rng.gen_range(0..=defender.attributes.dexterity.max(0));
    if attack_draw <= defense_draw {
        return AttackOutcome::Miss;
    }

    let damage = match weapon.map(|w| &w.kind) {
        Some(ItemKind::Weapon { damage }) => damage.roll(rng),
        // Bare hands, or something unsuited for swinging.
        _ => rng.gen_range(0..=attacker.attributes.strength.max(0)),
    };

    let slain = defender.apply_damage(damage);
    AttackOutcome::Hit { damage, slain }
}
