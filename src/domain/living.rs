//! The shared shape of every combat-capable actor.
//!
//! Characters (player-owned) and NPCs are tagged variants of one `Living`
//! struct rather than an inheritance hierarchy, matching the single
//! `livings` table with a kind discriminator.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    HEAL_INTERVAL_SECS, INEBRIATION_HIGH_THRESHOLD, SOBER_INTERVAL_SECS, STARTING_CREDITS,
    STARTING_HPS,
};
use crate::domain::{Attributes, Item, Slot};

/// Lifecycle state of a living.
///
/// `Idle` livings are out of combat, `Alive` ones are engaged with an
/// opponent, `Dead` ones no longer act (dead NPCs are additionally removed
/// from the world).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LifeState {
    Idle,
    Alive,
    Dead,
}

impl From<&str> for LifeState {
    fn from(s: &str) -> Self {
        match s {
            "alive" => LifeState::Alive,
            "dead" => LifeState::Dead,
            _ => LifeState::Idle,
        }
    }
}

impl std::fmt::Display for LifeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LifeState::Idle => "idle",
            LifeState::Alive => "alive",
            LifeState::Dead => "dead",
        };
        write!(f, "{}", s)
    }
}

/// Equipped-body mapping: slot -> equipped item id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body(BTreeMap<Slot, Uuid>);

impl Body {
    /// Put an item into a slot, returning the previous occupant if any.
    pub fn set(&mut self, slot: Slot, item_id: Uuid) -> Option<Uuid> {
        self.0.insert(slot, item_id)
    }

    /// Item currently occupying a slot.
    pub fn item_in(&self, slot: Slot) -> Option<Uuid> {
        self.0.get(&slot).copied()
    }

    /// Remove whatever occupies a slot.
    pub fn clear(&mut self, slot: Slot) -> Option<Uuid> {
        self.0.remove(&slot)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, Uuid)> + '_ {
        self.0.iter().map(|(slot, id)| (*slot, *id))
    }
}

/// Variant-specific data distinguishing a player character from an NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LivingKind {
    Character {
        /// Owning user; exactly one character per user.
        user_id: Uuid,
        title: Option<String>,
        /// Drinks taken recently; speeds up healing, decays over time.
        inebriation: i32,
    },
    Npc,
}

/// Any combat-capable actor: a player character or an NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Living {
    pub id: Uuid,
    pub name: String,
    pub race: String,
    pub attributes: Attributes,
    pub hps: i32,
    pub max_hps: i32,
    pub body: Body,
    pub credits: i64,
    pub state: LifeState,
    pub room_id: Uuid,
    /// Current combat opponent (another living), if engaged.
    pub opponent_id: Option<Uuid>,
    pub kind: LivingKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Living {
    /// Create a fresh player character in the given room.
    pub fn new_character(name: String, race: String, user_id: Uuid, room_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            race,
            attributes: Attributes::default(),
            hps: STARTING_HPS,
            max_hps: STARTING_HPS,
            body: Body::default(),
            credits: STARTING_CREDITS,
            state: LifeState::Idle,
            room_id,
            opponent_id: None,
            kind: LivingKind::Character {
                user_id,
                title: None,
                inebriation: 0,
            },
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an NPC placed in a room.
    pub fn new_npc(
        name: String,
        race: String,
        attributes: Attributes,
        hps: i32,
        room_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            race,
            attributes,
            hps,
            max_hps: hps,
            body: Body::default(),
            credits: 0,
            state: LifeState::Idle,
            room_id,
            opponent_id: None,
            kind: LivingKind::Npc,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_character(&self) -> bool {
        matches!(self.kind, LivingKind::Character { .. })
    }

    pub fn is_npc(&self) -> bool {
        matches!(self.kind, LivingKind::Npc)
    }

    pub fn is_dead(&self) -> bool {
        self.state == LifeState::Dead
    }

    /// Owning user for characters, `None` for NPCs.
    pub fn user_id(&self) -> Option<Uuid> {
        match &self.kind {
            LivingKind::Character { user_id, .. } => Some(*user_id),
            LivingKind::Npc => None,
        }
    }

    /// Current inebriation; NPCs never drink.
    pub fn inebriation(&self) -> i32 {
        match &self.kind {
            LivingKind::Character { inebriation, .. } => *inebriation,
            LivingKind::Npc => 0,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match &self.kind {
            LivingKind::Character { title, .. } => title.as_deref(),
            LivingKind::Npc => None,
        }
    }

    /// Heal up to `amount` hit points, capped at the maximum.
    pub fn heal(&mut self, amount: i32) {
        self.hps = (self.hps + amount.max(0)).min(self.max_hps);
    }

    /// Apply damage. Returns true when this blow was lethal; the living is
    /// then in the `Dead` state and the caller decides whether it stays in
    /// place (character) or leaves the world (NPC).
    pub fn apply_damage(&mut self, damage: i32) -> bool {
        self.hps -= damage.max(0);
        if self.hps <= 0 {
            self.state = LifeState::Dead;
            self.opponent_id = None;
            return true;
        }
        false
    }

    /// Equip an item into the body slot it declares.
    ///
    /// Returns false when no item is given. A previous occupant of the slot
    /// is overwritten.
    ///
    /// TODO: decide what should happen to the item previously equipped in
    /// the slot; right now it silently stays in the inventory.
    pub fn equip(&mut self, item: Option<&Item>) -> bool {
        match item {
            None => false,
            Some(item) => {
                self.body.set(item.slot, item.id);
                true
            }
        }
    }

    /// Item id equipped in the weapon slot, if any.
    pub fn wielded_weapon(&self) -> Option<Uuid> {
        self.body.item_in(Slot::Weapon)
    }

    /// Lazy time-based regeneration, driven by elapsed wall-clock time
    /// rather than a ticking process.
    ///
    /// Heals 1 hp per 30 elapsed seconds, +1 while inebriated and +1 more
    /// above heavy inebriation, capped at max hit points. Inebriation
    /// decays 1 unit per 60 elapsed seconds, floored at 0. The timestamp is
    /// advanced unconditionally.
    pub fn regenerate(&mut self, now: DateTime<Utc>) {
        let elapsed = (now - self.updated_at).num_seconds().max(0);

        // Rate is computed against pre-decay inebriation.
        let mut rate = 1;
        if self.inebriation() > 0 {
            rate += 1;
        }
        if self.inebriation() > INEBRIATION_HIGH_THRESHOLD {
            rate += 1;
        }

        let ticks = (elapsed / HEAL_INTERVAL_SECS) as i32;
        if !self.is_dead() && ticks > 0 {
            self.heal(rate * ticks);
        }

        let sobered = (elapsed / SOBER_INTERVAL_SECS) as i32;
        if let LivingKind::Character { inebriation, .. } = &mut self.kind {
            *inebriation = (*inebriation - sobered).max(0);
        }

        self.updated_at = now;
    }
}

/// Admin-facing representation of a living.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LivingView {
    pub id: Uuid,
    #[schema(example = "Maintenance Drone")]
    pub name: String,
    #[schema(example = "android")]
    pub race: String,
    #[schema(example = "npc")]
    pub kind: String,
    pub hps: i32,
    pub max_hps: i32,
    pub credits: i64,
    #[schema(example = "idle")]
    pub state: String,
    pub room_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub attributes: Attributes,
}

impl From<&Living> for LivingView {
    fn from(living: &Living) -> Self {
        Self {
            id: living.id,
            name: living.name.clone(),
            race: living.race.clone(),
            kind: if living.is_npc() { "npc" } else { "character" }.to_string(),
            hps: living.hps,
            max_hps: living.max_hps,
            credits: living.credits,
            state: living.state.to_string(),
            room_id: living.room_id,
            opponent_id: living.opponent_id,
            user_id: living.user_id(),
            attributes: living.attributes,
        }
    }
}
