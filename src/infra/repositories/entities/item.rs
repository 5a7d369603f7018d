//! Item database entity for SeaORM.
//!
//! Weapons and armor share one table; the `kind` column discriminates and
//! the subtype columns (`damage_dice`, `armor_class`) are nullable.

use sea_orm::entity::prelude::*;

use crate::domain::{Item, ItemKind, Slot};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub slot: String,
    pub value: i64,
    pub damage_dice: Option<String>,
    pub armor_class: Option<i32>,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// Rows with an unparsable subtype column degrade to trinkets with a
/// warning instead of failing the whole query.
impl From<Model> for Item {
    fn from(model: Model) -> Self {
        let kind = match model.kind.as_str() {
            "weapon" => match model.damage_dice.as_deref().map(str::parse) {
                Some(Ok(damage)) => ItemKind::Weapon { damage },
                _ => {
                    tracing::warn!("weapon {} has bad damage dice, treating as trinket", model.id);
                    ItemKind::Trinket
                }
            },
            "armor" => ItemKind::Armor {
                armor_class: model.armor_class.unwrap_or(0),
            },
            _ => ItemKind::Trinket,
        };

        let slot = model.slot.parse().unwrap_or_else(|_| {
            tracing::warn!("item {} has unknown slot {}", model.id, model.slot);
            Slot::Hands
        });

        Item {
            id: model.id,
            name: model.name,
            value: model.value,
            slot,
            kind,
            owner_id: model.owner_id,
        }
    }
}
