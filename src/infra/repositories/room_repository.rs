//! Room repository: the location graph.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use super::entities::{room, room_exit};
use crate::config::ROOM_KIND_START;
use crate::domain::Room;
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Data access for rooms and their exit relation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room with its exit set loaded.
    async fn find(&self, id: Uuid) -> AppResult<Option<Room>>;

    /// Where new characters spawn: the room marked `start`, or any room
    /// when none is marked.
    async fn starting_room(&self) -> AppResult<Option<Room>>;

    async fn count(&self) -> AppResult<u64>;

    async fn create(&self, room: Room) -> AppResult<Room>;

    /// Persist name/description/kind changes (exits change via
    /// `add_exit`/`remove_exit`).
    async fn save(&self, room: &Room) -> AppResult<()>;

    /// Delete a room together with every exit touching it.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn add_exit(&self, from: Uuid, to: Uuid) -> AppResult<()>;

    async fn remove_exit(&self, from: Uuid, to: Uuid) -> AppResult<()>;

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Room>, u64)>;
}

/// SeaORM-backed implementation of [`RoomRepository`].
pub struct RoomStore {
    db: DatabaseConnection,
}

impl RoomStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn exits_of(&self, room_id: Uuid) -> AppResult<Vec<Uuid>> {
        let exits = room_exit::Entity::find()
            .filter(room_exit::Column::FromRoomId.eq(room_id))
            .all(&self.db)
            .await?;
        Ok(exits.into_iter().map(|e| e.to_room_id).collect())
    }

    async fn assemble(&self, model: room::Model) -> AppResult<Room> {
        let exits = self.exits_of(model.id).await?;
        Ok(Room {
            id: model.id,
            name: model.name,
            description: model.description,
            kind: model.kind,
            exits,
        })
    }
}

#[async_trait]
impl RoomRepository for RoomStore {
    async fn find(&self, id: Uuid) -> AppResult<Option<Room>> {
        match room::Entity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(self.assemble(model).await?)),
            None => Ok(None),
        }
    }

    async fn starting_room(&self) -> AppResult<Option<Room>> {
        let model = room::Entity::find()
            .filter(room::Column::Kind.eq(ROOM_KIND_START))
            .one(&self.db)
            .await?;
        let model = match model {
            Some(m) => Some(m),
            None => room::Entity::find().one(&self.db).await?,
        };
        match model {
            Some(model) => Ok(Some(self.assemble(model).await?)),
            None => Ok(None),
        }
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(room::Entity::find().count(&self.db).await?)
    }

    async fn create(&self, new: Room) -> AppResult<Room> {
        let now = Utc::now();
        let active = room::ActiveModel {
            id: Set(new.id),
            name: Set(new.name.clone()),
            description: Set(new.description.clone()),
            kind: Set(new.kind.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = active.insert(&self.db).await?;
        self.assemble(model).await
    }

    async fn save(&self, updated: &Room) -> AppResult<()> {
        let model = room::Entity::find_by_id(updated.id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: room::ActiveModel = model.into();
        active.name = Set(updated.name.clone());
        active.description = Set(updated.description.clone());
        active.kind = Set(updated.kind.clone());
        active.updated_at = Set(Utc::now());

        active.update(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        room_exit::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(room_exit::Column::FromRoomId.eq(id))
                    .add(room_exit::Column::ToRoomId.eq(id)),
            )
            .exec(&self.db)
            .await?;

        let result = room::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn add_exit(&self, from: Uuid, to: Uuid) -> AppResult<()> {
        // Already-linked rooms are fine; the exit set is a set.
        let existing = room_exit::Entity::find_by_id((from, to)).one(&self.db).await?;
        if existing.is_some() {
            return Ok(());
        }

        let active = room_exit::ActiveModel {
            from_room_id: Set(from),
            to_room_id: Set(to),
        };
        active.insert(&self.db).await?;
        Ok(())
    }

    async fn remove_exit(&self, from: Uuid, to: Uuid) -> AppResult<()> {
        room_exit::Entity::delete_by_id((from, to)).exec(&self.db).await?;
        Ok(())
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Room>, u64)> {
        let paginator = room::Entity::find().paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page.saturating_sub(1)).await?;

        let mut rooms = Vec::with_capacity(models.len());
        for model in models {
            rooms.push(self.assemble(model).await?);
        }
        Ok((rooms, total))
    }
}
