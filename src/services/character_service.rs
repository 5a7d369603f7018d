//! Character service.
//!
//! Creation and upkeep of the one player character each user owns:
//! the character sheet, the inventory, equipping gear and the lazy
//! time-based regeneration tick.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::DEFAULT_RACE;
use crate::domain::{Attributes, ItemView, Living};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Everything a player sees about their own character.
#[derive(Debug, Serialize, ToSchema)]
pub struct CharacterSheet {
    #[schema(example = "Jax")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[schema(example = "human")]
    pub race: String,
    /// Name of the room the character stands in
    #[schema(example = "Docking Bay")]
    pub location: String,
    /// Name of the current combat opponent, if engaged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent: Option<String>,
    pub hps: i32,
    pub max_hps: i32,
    pub credits: i64,
    pub inebriation: i32,
    #[schema(example = "idle")]
    pub state: String,
    pub attributes: Attributes,
    /// Equipped items by body slot
    #[schema(value_type = Object)]
    pub body: BTreeMap<String, Uuid>,
    pub inventory: Vec<ItemView>,
}

/// Character service trait for dependency injection.
#[async_trait]
pub trait CharacterService: Send + Sync {
    /// Create the character for a user; each user owns exactly one.
    async fn create_character(
        &self,
        user_id: Uuid,
        name: String,
        race: Option<String>,
    ) -> AppResult<CharacterSheet>;

    /// Full character sheet for the user's character
    async fn sheet(&self, user_id: Uuid) -> AppResult<CharacterSheet>;

    /// Items the user's character carries
    async fn inventory(&self, user_id: Uuid) -> AppResult<Vec<ItemView>>;

    /// Equip a carried item into the body slot it declares
    async fn equip(&self, user_id: Uuid, item_id: Option<Uuid>) -> AppResult<CharacterSheet>;

    /// Apply lazy regeneration to the user's character, if one exists.
    ///
    /// Ran on every authenticated request; absence of a character is not
    /// an error here.
    async fn tick(&self, user_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CharacterService using Unit of Work.
pub struct CharacterManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CharacterManager<U> {
    /// Create new character service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// The user's character, or NotFound when none was created yet.
    async fn character_of(&self, user_id: Uuid) -> AppResult<Living> {
        self.uow
            .livings()
            .find_character_by_user(user_id)
            .await?
            .ok_or_not_found()
    }

    /// Assemble the sheet: room name, opponent name and inventory are
    /// resolved here so the domain struct stays persistence-shaped.
    async fn assemble_sheet(&self, character: Living) -> AppResult<CharacterSheet> {
        let location = self
            .uow
            .rooms()
            .find(character.room_id)
            .await?
            .map(|room| room.name)
            .unwrap_or_else(|| "nowhere".to_string());

        let opponent = match character.opponent_id {
            Some(id) => self
                .uow
                .livings()
                .find_by_id(id)
                .await?
                .map(|living| living.name),
            None => None,
        };

        let inventory = self
            .uow
            .items()
            .owned_by(character.id)
            .await?
            .into_iter()
            .map(ItemView::from)
            .collect();

        let body = character
            .body
            .iter()
            .map(|(slot, item_id)| (slot.to_string(), item_id))
            .collect();

        // Read through the accessors before the struct literal starts
        // moving fields out of `character`.
        let title = character.title().map(str::to_string);
        let inebriation = character.inebriation();
        let state = character.state.to_string();

        Ok(CharacterSheet {
            name: character.name,
            title,
            race: character.race,
            location,
            opponent,
            hps: character.hps,
            max_hps: character.max_hps,
            credits: character.credits,
            inebriation,
            state,
            attributes: character.attributes,
            body,
            inventory,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> CharacterService for CharacterManager<U> {
    async fn create_character(
        &self,
        user_id: Uuid,
        name: String,
        race: Option<String>,
    ) -> AppResult<CharacterSheet> {
        if self
            .uow
            .livings()
            .find_character_by_user(user_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Character"));
        }

        let spawn = self
            .uow
            .rooms()
            .starting_room()
            .await?
            .ok_or_else(|| AppError::validation("the world has no rooms yet"))?;

        let race = race.unwrap_or_else(|| DEFAULT_RACE.to_string());
        let character = Living::new_character(name, race, user_id, spawn.id);
        let character = self.uow.livings().create(character).await?;

        tracing::info!(character = %character.name, user_id = %user_id, "character created");

        self.assemble_sheet(character).await
    }

    async fn sheet(&self, user_id: Uuid) -> AppResult<CharacterSheet> {
        let character = self.character_of(user_id).await?;
        self.assemble_sheet(character).await
    }

    async fn inventory(&self, user_id: Uuid) -> AppResult<Vec<ItemView>> {
        let character = self.character_of(user_id).await?;
        let items = self.uow.items().owned_by(character.id).await?;
        Ok(items.into_iter().map(ItemView::from).collect())
    }

    async fn equip(&self, user_id: Uuid, item_id: Option<Uuid>) -> AppResult<CharacterSheet> {
        let mut character = self.character_of(user_id).await?;
        if character.is_dead() {
            return Err(AppError::validation("the dead cannot equip anything"));
        }

        let item = match item_id {
            Some(id) => self.uow.items().find_by_id(id).await?,
            None => None,
        };

        // Only carried items can be equipped.
        if let Some(item) = &item {
            if item.owner_id != Some(character.id) {
                return Err(AppError::validation("you do not carry that"));
            }
        }

        if !character.equip(item.as_ref()) {
            return Err(AppError::validation("there is nothing to equip"));
        }

        self.uow.livings().save(&character).await?;
        self.assemble_sheet(character).await
    }

    async fn tick(&self, user_id: Uuid) -> AppResult<()> {
        let Some(mut character) = self.uow.livings().find_character_by_user(user_id).await? else {
            return Ok(());
        };

        character.regenerate(Utc::now());
        self.uow.livings().save(&character).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiceExpr, Item, ItemKind, Room, Slot};
    use crate::infra::repositories::{
        MockItemRepository, MockLivingRepository, MockRoomRepository,
    };
    use crate::services::testing::MockUow;

    fn room(name: &str) -> Room {
        Room {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: "A room.".to_string(),
            kind: "start".to_string(),
            exits: vec![],
        }
    }

    fn character(user_id: Uuid, room_id: Uuid) -> Living {
        Living::new_character("Jax".to_string(), "human".to_string(), user_id, room_id)
    }

    fn carried_weapon(owner_id: Uuid) -> Item {
        Item {
            id: Uuid::new_v4(),
            name: "Rusty Blaster".to_string(),
            value: 25,
            slot: Slot::Weapon,
            kind: ItemKind::Weapon {
                damage: DiceExpr { count: 2, sides: 6 },
            },
            owner_id: Some(owner_id),
        }
    }

    /// Rooms/livings/items answer the sheet-assembly queries.
    fn stub_sheet_queries(uow: &mut MockUow, spawn: Room) {
        let mut rooms = MockRoomRepository::new();
        let spawn_clone = spawn.clone();
        rooms
            .expect_find()
            .returning(move |_| Ok(Some(spawn_clone.clone())));
        rooms
            .expect_starting_room()
            .returning(move || Ok(Some(spawn.clone())));
        uow.rooms = Arc::new(rooms);

        let mut items = MockItemRepository::new();
        items.expect_owned_by().returning(|_| Ok(vec![]));
        uow.items = Arc::new(items);
    }

    #[tokio::test]
    async fn test_create_character_spawns_in_starting_room() {
        let user_id = Uuid::new_v4();
        let spawn = room("Docking Bay");
        let spawn_id = spawn.id;

        let mut uow = MockUow::new();
        stub_sheet_queries(&mut uow, spawn);

        let mut livings = MockLivingRepository::new();
        livings
            .expect_find_character_by_user()
            .returning(|_| Ok(None));
        livings.expect_create().returning(move |living| {
            assert_eq!(living.room_id, spawn_id);
            assert!(living.is_character());
            Ok(living)
        });
        uow.livings = Arc::new(livings);

        let service = CharacterManager::new(Arc::new(uow));
        let sheet = service
            .create_character(user_id, "Jax".to_string(), None)
            .await
            .unwrap();

        assert_eq!(sheet.name, "Jax");
        assert_eq!(sheet.race, "human");
        assert_eq!(sheet.location, "Docking Bay");
        assert_eq!(sheet.state, "idle");
        assert_eq!(sheet.title, None);
        assert_eq!(sheet.inebriation, 0);
    }

    #[tokio::test]
    async fn test_create_second_character_is_refused() {
        let user_id = Uuid::new_v4();

        let mut uow = MockUow::new();
        let mut livings = MockLivingRepository::new();
        livings
            .expect_find_character_by_user()
            .returning(move |uid| Ok(Some(character(uid, Uuid::new_v4()))));
        uow.livings = Arc::new(livings);

        let service = CharacterManager::new(Arc::new(uow));
        let result = service
            .create_character(user_id, "Jax".to_string(), None)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_character_fails_in_empty_world() {
        let mut uow = MockUow::new();

        let mut livings = MockLivingRepository::new();
        livings
            .expect_find_character_by_user()
            .returning(|_| Ok(None));
        uow.livings = Arc::new(livings);

        let mut rooms = MockRoomRepository::new();
        rooms.expect_starting_room().returning(|| Ok(None));
        uow.rooms = Arc::new(rooms);

        let service = CharacterManager::new(Arc::new(uow));
        let result = service
            .create_character(Uuid::new_v4(), "Jax".to_string(), None)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sheet_without_character_is_not_found() {
        let mut uow = MockUow::new();
        let mut livings = MockLivingRepository::new();
        livings
            .expect_find_character_by_user()
            .returning(|_| Ok(None));
        uow.livings = Arc::new(livings);

        let service = CharacterManager::new(Arc::new(uow));
        let result = service.sheet(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_equip_carried_weapon_fills_weapon_slot() {
        let user_id = Uuid::new_v4();
        let spawn = room("Docking Bay");
        let jax = character(user_id, spawn.id);
        let weapon = carried_weapon(jax.id);
        let weapon_id = weapon.id;

        let mut uow = MockUow::new();
        let mut livings = MockLivingRepository::new();
        let jax_clone = jax.clone();
        livings
            .expect_find_character_by_user()
            .returning(move |_| Ok(Some(jax_clone.clone())));
        livings.expect_save().returning(move |saved| {
            assert_eq!(saved.wielded_weapon(), Some(weapon_id));
            Ok(())
        });
        livings.expect_find_by_id().returning(|_| Ok(None));
        uow.livings = Arc::new(livings);

        let mut rooms = MockRoomRepository::new();
        rooms.expect_find().returning(move |_| Ok(Some(spawn.clone())));
        uow.rooms = Arc::new(rooms);

        let mut items = MockItemRepository::new();
        let weapon_clone = weapon.clone();
        items
            .expect_find_by_id()
            .returning(move |_| Ok(Some(weapon_clone.clone())));
        items
            .expect_owned_by()
            .returning(move |_| Ok(vec![weapon.clone()]));
        uow.items = Arc::new(items);

        let service = CharacterManager::new(Arc::new(uow));
        let sheet = service.equip(user_id, Some(weapon_id)).await.unwrap();

        assert_eq!(sheet.body.get("weapon"), Some(&weapon_id));
    }

    #[tokio::test]
    async fn test_equip_someone_elses_item_is_refused() {
        let user_id = Uuid::new_v4();
        let jax = character(user_id, Uuid::new_v4());
        let stray = carried_weapon(Uuid::new_v4());
        let stray_id = stray.id;

        let mut uow = MockUow::new();
        let mut livings = MockLivingRepository::new();
        livings
            .expect_find_character_by_user()
            .returning(move |_| Ok(Some(jax.clone())));
        uow.livings = Arc::new(livings);

        let mut items = MockItemRepository::new();
        items
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stray.clone())));
        uow.items = Arc::new(items);

        let service = CharacterManager::new(Arc::new(uow));
        let result = service.equip(user_id, Some(stray_id)).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_equip_nothing_is_refused() {
        let user_id = Uuid::new_v4();
        let jax = character(user_id, Uuid::new_v4());

        let mut uow = MockUow::new();
        let mut livings = MockLivingRepository::new();
        livings
            .expect_find_character_by_user()
            .returning(move |_| Ok(Some(jax.clone())));
        uow.livings = Arc::new(livings);

        let service = CharacterManager::new(Arc::new(uow));
        let result = service.equip(user_id, None).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_tick_without_character_is_a_noop() {
        let mut uow = MockUow::new();
        let mut livings = MockLivingRepository::new();
        livings
            .expect_find_character_by_user()
            .returning(|_| Ok(None));
        // No save expectation; saving here would panic the mock.
        uow.livings = Arc::new(livings);

        let service = CharacterManager::new(Arc::new(uow));
        assert!(service.tick(Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_tick_saves_regenerated_character() {
        let user_id = Uuid::new_v4();
        let mut jax = character(user_id, Uuid::new_v4());
        jax.hps = 1;
        jax.updated_at = Utc::now() - chrono::Duration::seconds(120);

        let mut uow = MockUow::new();
        let mut livings = MockLivingRepository::new();
        let jax_clone = jax.clone();
        livings
            .expect_find_character_by_user()
            .returning(move |_| Ok(Some(jax_clone.clone())));
        livings.expect_save().returning(|saved| {
            assert!(saved.hps > 1);
            Ok(())
        });
        uow.livings = Arc::new(livings);

        let service = CharacterManager::new(Arc::new(uow));
        assert!(service.tick(user_id).await.is_ok());
    }
}
