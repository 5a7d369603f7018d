//! Living database entity for SeaORM.
//!
//! Characters and NPCs share one table, discriminated by the `kind`
//! column; character-only columns (`user_id`, `title`, `inebriation`) are
//! nullable or zero for NPC rows. Attributes and the equipped-body map are
//! stored as JSON columns.

use sea_orm::entity::prelude::*;

use crate::domain::{Attributes, Body, LifeState, Living, LivingKind};

/// Discriminator value for character rows
pub const KIND_CHARACTER: &str = "character";

/// Discriminator value for NPC rows
pub const KIND_NPC: &str = "npc";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "livings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: String,
    pub name: String,
    pub race: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub attributes: Json,
    pub hps: i32,
    pub max_hps: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub body: Json,
    pub credits: i64,
    pub state: String,
    pub room_id: Uuid,
    pub opponent_id: Option<Uuid>,
    #[sea_orm(unique)]
    pub user_id: Option<Uuid>,
    pub title: Option<String>,
    pub inebriation: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// JSON columns that fail to parse fall back to defaults with a warning
/// rather than poisoning every query that touches the row.
impl From<Model> for Living {
    fn from(model: Model) -> Self {
        let attributes: Attributes =
            serde_json::from_value(model.attributes).unwrap_or_else(|e| {
                tracing::warn!("living {} has bad attributes column: {}", model.id, e);
                Attributes::default()
            });
        let body: Body = serde_json::from_value(model.body).unwrap_or_else(|e| {
            tracing::warn!("living {} has bad body column: {}", model.id, e);
            Body::default()
        });

        let kind = if model.kind == KIND_CHARACTER {
            LivingKind::Character {
                user_id: model.user_id.unwrap_or_else(Uuid::nil),
                title: model.title,
                inebriation: model.inebriation,
            }
        } else {
            LivingKind::Npc
        };

        Living {
            id: model.id,
            name: model.name,
            race: model.race,
            attributes,
            hps: model.hps,
            max_hps: model.max_hps,
            body,
            credits: model.credits,
            state: LifeState::from(model.state.as_str()),
            room_id: model.room_id,
            opponent_id: model.opponent_id,
            kind,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
