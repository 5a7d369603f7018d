//! Item repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use super::entities::item;
use crate::domain::{Item, ItemKind};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Data access for items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Item>>;

    /// Inventory of a living.
    async fn owned_by(&self, owner_id: Uuid) -> AppResult<Vec<Item>>;

    async fn create(&self, item: Item) -> AppResult<Item>;

    /// Persist name/value/owner changes of an existing item.
    async fn save(&self, item: &Item) -> AppResult<()>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Item>, u64)>;
}

/// SeaORM-backed implementation of [`ItemRepository`].
pub struct ItemStore {
    db: DatabaseConnection,
}

impl ItemStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Split the tagged kind back into discriminator + subtype columns.
fn kind_columns(kind: &ItemKind) -> (String, Option<String>, Option<i32>) {
    match kind {
        ItemKind::Weapon { damage } => ("weapon".to_string(), Some(damage.to_string()), None),
        ItemKind::Armor { armor_class } => ("armor".to_string(), None, Some(*armor_class)),
        ItemKind::Trinket => ("trinket".to_string(), None, None),
    }
}

#[async_trait]
impl ItemRepository for ItemStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Item>> {
        let model = item::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Item::from))
    }

    async fn owned_by(&self, owner_id: Uuid) -> AppResult<Vec<Item>> {
        let models = item::Entity::find()
            .filter(item::Column::OwnerId.eq(owner_id))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Item::from).collect())
    }

    async fn create(&self, item: Item) -> AppResult<Item> {
        let (kind, damage_dice, armor_class) = kind_columns(&item.kind);
        let now = Utc::now();
        let active = item::ActiveModel {
            id: Set(item.id),
            name: Set(item.name.clone()),
            kind: Set(kind),
            slot: Set(item.slot.to_string()),
            value: Set(item.value),
            damage_dice: Set(damage_dice),
            armor_class: Set(armor_class),
            owner_id: Set(item.owner_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = active.insert(&self.db).await?;
        Ok(Item::from(model))
    }

    async fn save(&self, item: &Item) -> AppResult<()> {
        let model = item::Entity::find_by_id(item.id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let (kind, damage_dice, armor_class) = kind_columns(&item.kind);
        let mut active: item::ActiveModel = model.into();
        active.name = Set(item.name.clone());
        active.kind = Set(kind);
        active.slot = Set(item.slot.to_string());
        active.value = Set(item.value);
        active.damage_dice = Set(damage_dice);
        active.armor_class = Set(armor_class);
        active.owner_id = Set(item.owner_id);
        active.updated_at = Set(Utc::now());

        active.update(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = item::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Item>, u64)> {
        let paginator = item::Entity::find().paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page.saturating_sub(1)).await?;
        Ok((models.into_iter().map(Item::from).collect(), total))
    }
}
