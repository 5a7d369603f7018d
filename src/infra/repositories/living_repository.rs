//! Living repository: characters and NPCs.
//!
//! Game actions read a living, mutate it through the domain methods and
//! write it back with [`LivingRepository::save`]; each call commits on its
//! own, which is what serializes concurrent writes per request.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use super::entities::living::{self, KIND_CHARACTER, KIND_NPC};
use crate::domain::{LifeState, Living, LivingKind};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Data access for livings (characters and NPCs).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LivingRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Living>>;

    /// The character owned by a user, if one was created.
    async fn find_character_by_user(&self, user_id: Uuid) -> AppResult<Option<Living>>;

    /// Everyone currently standing in a room, characters and NPCs alike.
    async fn in_room(&self, room_id: Uuid) -> AppResult<Vec<Living>>;

    async fn create(&self, living: Living) -> AppResult<Living>;

    /// Persist every mutable field of an existing living.
    async fn save(&self, living: &Living) -> AppResult<()>;

    /// Remove a living from the world (dead NPCs).
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Disengage everyone who had the given living as their opponent.
    async fn clear_opponent(&self, opponent_id: Uuid) -> AppResult<()>;

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Living>, u64)>;
}

/// SeaORM-backed implementation of [`LivingRepository`].
pub struct LivingStore {
    db: DatabaseConnection,
}

impl LivingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Build a fully-Set active model from a domain living.
fn to_active(living: &Living) -> AppResult<living::ActiveModel> {
    let attributes = serde_json::to_value(living.attributes)
        .map_err(|e| AppError::internal(format!("serialize attributes: {}", e)))?;
    let body = serde_json::to_value(&living.body)
        .map_err(|e| AppError::internal(format!("serialize body: {}", e)))?;

    let (kind, user_id, title, inebriation) = match &living.kind {
        LivingKind::Character {
            user_id,
            title,
            inebriation,
        } => (KIND_CHARACTER, Some(*user_id), title.clone(), *inebriation),
        LivingKind::Npc => (KIND_NPC, None, None, 0),
    };

    Ok(living::ActiveModel {
        id: Set(living.id),
        kind: Set(kind.to_string()),
        name: Set(living.name.clone()),
        race: Set(living.race.clone()),
        attributes: Set(attributes),
        hps: Set(living.hps),
        max_hps: Set(living.max_hps),
        body: Set(body),
        credits: Set(living.credits),
        state: Set(living.state.to_string()),
        room_id: Set(living.room_id),
        opponent_id: Set(living.opponent_id),
        user_id: Set(user_id),
        title: Set(title),
        inebriation: Set(inebriation),
        created_at: Set(living.created_at),
        updated_at: Set(living.updated_at),
    })
}

#[async_trait]
impl LivingRepository for LivingStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Living>> {
        let model = living::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Living::from))
    }

    async fn find_character_by_user(&self, user_id: Uuid) -> AppResult<Option<Living>> {
        let model = living::Entity::find()
            .filter(living::Column::UserId.eq(user_id))
            .filter(living::Column::Kind.eq(KIND_CHARACTER))
            .one(&self.db)
            .await?;
        Ok(model.map(Living::from))
    }

    async fn in_room(&self, room_id: Uuid) -> AppResult<Vec<Living>> {
        let models = living::Entity::find()
            .filter(living::Column::RoomId.eq(room_id))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Living::from).collect())
    }

    async fn create(&self, living: Living) -> AppResult<Living> {
        let model = to_active(&living)?.insert(&self.db).await?;
        Ok(Living::from(model))
    }

    async fn save(&self, living: &Living) -> AppResult<()> {
        to_active(living)?.update(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = living::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn clear_opponent(&self, opponent_id: Uuid) -> AppResult<()> {
        living::Entity::update_many()
            .col_expr(living::Column::OpponentId, Expr::value(Option::<Uuid>::None))
            .col_expr(
                living::Column::State,
                Expr::value(LifeState::Idle.to_string()),
            )
            .filter(living::Column::OpponentId.eq(opponent_id))
            .filter(living::Column::State.ne(LifeState::Dead.to_string()))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Living>, u64)> {
        let paginator = living::Entity::find().paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page.saturating_sub(1)).await?;
        Ok((models.into_iter().map(Living::from).collect(), total))
    }
}
