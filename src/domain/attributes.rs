//! Attribute block shared by characters and NPCs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::STARTING_ATTRIBUTE;

/// Strength, dexterity and intelligence plus their maxima.
///
/// Current values may drop below the maximum (drained stats) but are never
/// raised above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Attributes {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub max_strength: i32,
    pub max_dexterity: i32,
    pub max_intelligence: i32,
}

impl Attributes {
    /// Attribute block with every stat at the same value.
    pub fn uniform(value: i32) -> Self {
        Self {
            strength: value,
            dexterity: value,
            intelligence: value,
            max_strength: value,
            max_dexterity: value,
            max_intelligence: value,
        }
    }

    /// Attribute block with distinct stats, maxima equal to current values.
    pub fn new(strength: i32, dexterity: i32, intelligence: i32) -> Self {
        Self {
            strength,
            dexterity,
            intelligence,
            max_strength: strength,
            max_dexterity: dexterity,
            max_intelligence: intelligence,
        }
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::uniform(STARTING_ATTRIBUTE)
    }
}
