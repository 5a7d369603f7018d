//! Game service.
//!
//! The verbs a player acts on the world with: looking around, moving
//! through the exit graph and attacking NPCs.

use async_trait::async_trait;
use rand::thread_rng;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{attack, AttackOutcome, LifeState, Living, Room};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// One exit as shown to the player.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExitView {
    pub id: Uuid,
    #[schema(example = "Promenade")]
    pub name: String,
}

/// An NPC standing in the room, attackable by id.
#[derive(Debug, Serialize, ToSchema)]
pub struct NpcPresence {
    pub id: Uuid,
    #[schema(example = "Maintenance Drone")]
    pub name: String,
}

/// What a player sees when looking at their surroundings.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomView {
    pub id: Uuid,
    #[schema(example = "Docking Bay")]
    pub name: String,
    pub description: String,
    pub exits: Vec<ExitView>,
    /// Names of other player characters present
    pub characters: Vec<String>,
    pub npcs: Vec<NpcPresence>,
}

/// Result of one attack round: the player's swing and, when the target
/// survives, its counterattack.
#[derive(Debug, Serialize, ToSchema)]
pub struct AttackReport {
    #[schema(example = "Maintenance Drone")]
    pub target: String,
    pub outcome: AttackOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retaliation: Option<AttackOutcome>,
    /// The player's hit points after the exchange
    pub hps: i32,
    pub max_hps: i32,
}

/// Game service trait for dependency injection.
#[async_trait]
pub trait GameService: Send + Sync {
    /// Describe the room the user's character stands in
    async fn look(&self, user_id: Uuid) -> AppResult<RoomView>;

    /// Move the user's character through an exit
    async fn move_to(&self, user_id: Uuid, room_id: Uuid) -> AppResult<RoomView>;

    /// Attack an NPC in the same room
    async fn attack(&self, user_id: Uuid, npc_id: Uuid) -> AppResult<AttackReport>;
}

/// Concrete implementation of GameService using Unit of Work.
pub struct GameManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> GameManager<U> {
    /// Create new game service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn character_of(&self, user_id: Uuid) -> AppResult<Living> {
        self.uow
            .livings()
            .find_character_by_user(user_id)
            .await?
            .ok_or_not_found()
    }

    /// Room description with exits and occupants resolved. The viewer is
    /// excluded from the occupant lists.
    async fn room_view(&self, room: Room, viewer_id: Uuid) -> AppResult<RoomView> {
        let mut exits = Vec::with_capacity(room.exits.len());
        for exit_id in &room.exits {
            // Exits are FK-backed; a missing destination is a stale read.
            if let Some(dest) = self.uow.rooms().find(*exit_id).await? {
                exits.push(ExitView {
                    id: dest.id,
                    name: dest.name,
                });
            }
        }

        let mut characters = Vec::new();
        let mut npcs = Vec::new();
        for living in self.uow.livings().in_room(room.id).await? {
            if living.id == viewer_id {
                continue;
            }
            if living.is_npc() {
                npcs.push(NpcPresence {
                    id: living.id,
                    name: living.name,
                });
            } else {
                characters.push(living.name);
            }
        }

        Ok(RoomView {
            id: room.id,
            name: room.name,
            description: room.description,
            exits,
            characters,
            npcs,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> GameService for GameManager<U> {
    async fn look(&self, user_id: Uuid) -> AppResult<RoomView> {
        let character = self.character_of(user_id).await?;
        let room = self
            .uow
            .rooms()
            .find(character.room_id)
            .await?
            .ok_or_not_found()?;
        self.room_view(room, character.id).await
    }

    async fn move_to(&self, user_id: Uuid, room_id: Uuid) -> AppResult<RoomView> {
        let mut character = self.character_of(user_id).await?;
        if character.is_dead() {
            return Err(AppError::validation("the dead do not walk"));
        }

        let here = self
            .uow
            .rooms()
            .find(character.room_id)
            .await?
            .ok_or_not_found()?;
        here.can_move_to(room_id)
            .map_err(|e| AppError::validation(e.to_string()))?;

        let destination = self.uow.rooms().find(room_id).await?.ok_or_not_found()?;

        // Walking away breaks off combat on both sides.
        if character.opponent_id.is_some() {
            character.opponent_id = None;
            character.state = LifeState::Idle;
            self.uow.livings().clear_opponent(character.id).await?;
        }

        character.room_id = destination.id;
        self.uow.livings().save(&character).await?;

        tracing::debug!(character = %character.name, room = %destination.name, "moved");

        self.room_view(destination, character.id).await
    }

    async fn attack(&self, user_id: Uuid, npc_id: Uuid) -> AppResult<AttackReport> {
        let mut character = self.character_of(user_id).await?;
        if character.is_dead() {
            return Err(AppError::validation("the dead do not fight"));
        }

        let mut npc = self.uow.livings().find_by_id(npc_id).await?.ok_or_not_found()?;
        if !npc.is_npc() || npc.room_id != character.room_id || npc.is_dead() {
            return Err(AppError::validation("there is no such target here"));
        }

        // Both sides are engaged from the first swing.
        character.state = LifeState::Alive;
        character.opponent_id = Some(npc.id);
        npc.state = LifeState::Alive;
        npc.opponent_id = Some(character.id);

        let weapon = match character.wielded_weapon() {
            Some(item_id) => self.uow.items().find_by_id(item_id).await?,
            None => None,
        };

        // Resolve the full exchange without awaiting; thread_rng is not Send.
        let (outcome, retaliation) = {
            let mut rng = thread_rng();
            let outcome = attack(&character, weapon.as_ref(), &mut npc, &mut rng);
            let retaliation = if npc.is_dead() {
                None
            } else {
                // NPCs fight bare-handed.
                Some(attack(&npc, None, &mut character, &mut rng))
            };
            (outcome, retaliation)
        };

        let target = npc.name.clone();

        if npc.is_dead() {
            // Slain NPCs leave the world; everyone fighting them disengages.
            character.opponent_id = None;
            character.state = LifeState::Idle;
            self.uow.livings().delete(npc.id).await?;
            self.uow.livings().clear_opponent(npc.id).await?;
            tracing::info!(character = %character.name, npc = %target, "npc slain");
        } else {
            self.uow.livings().save(&npc).await?;
        }

        if character.is_dead() {
            // Dead characters stay where they fell.
            self.uow.livings().clear_opponent(character.id).await?;
            tracing::info!(character = %character.name, npc = %target, "character slain");
        }
        self.uow.livings().save(&character).await?;

        Ok(AttackReport {
            target,
            outcome,
            retaliation,
            hps: character.hps,
            max_hps: character.max_hps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Attributes;
    use crate::infra::repositories::{MockLivingRepository, MockRoomRepository};
    use crate::services::testing::MockUow;

    fn room(name: &str, exits: Vec<Uuid>) -> Room {
        Room {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: "A room.".to_string(),
            kind: "generic".to_string(),
            exits,
        }
    }

    fn character(user_id: Uuid, room_id: Uuid) -> Living {
        Living::new_character("Jax".to_string(), "human".to_string(), user_id, room_id)
    }

    fn npc(room_id: Uuid) -> Living {
        Living::new_npc(
            "Maintenance Drone".to_string(),
            "android".to_string(),
            Attributes::uniform(8),
            10,
            room_id,
        )
    }

    #[tokio::test]
    async fn test_look_describes_room_without_the_viewer() {
        let user_id = Uuid::new_v4();
        let here = room("Docking Bay", vec![]);
        let jax = character(user_id, here.id);
        let drone = npc(here.id);
        let drone_id = drone.id;

        let mut uow = MockUow::new();
        let mut livings = MockLivingRepository::new();
        let jax_clone = jax.clone();
        livings
            .expect_find_character_by_user()
            .returning(move |_| Ok(Some(jax_clone.clone())));
        livings
            .expect_in_room()
            .returning(move |_| Ok(vec![jax.clone(), drone.clone()]));
        uow.livings = Arc::new(livings);

        let mut rooms = MockRoomRepository::new();
        rooms.expect_find().returning(move |_| Ok(Some(here.clone())));
        uow.rooms = Arc::new(rooms);

        let service = GameManager::new(Arc::new(uow));
        let view = service.look(user_id).await.unwrap();

        assert_eq!(view.name, "Docking Bay");
        assert!(view.characters.is_empty(), "viewer must not see themselves");
        assert_eq!(view.npcs.len(), 1);
        assert_eq!(view.npcs[0].id, drone_id);
    }

    #[tokio::test]
    async fn test_move_through_exit_relocates_character() {
        let user_id = Uuid::new_v4();
        let destination = room("Promenade", vec![]);
        let dest_id = destination.id;
        let here = room("Docking Bay", vec![dest_id]);
        let here_id = here.id;
        let jax = character(user_id, here_id);

        let mut uow = MockUow::new();
        let mut livings = MockLivingRepository::new();
        let jax_clone = jax.clone();
        livings
            .expect_find_character_by_user()
            .returning(move |_| Ok(Some(jax_clone.clone())));
        livings.expect_save().returning(move |saved| {
            assert_eq!(saved.room_id, dest_id);
            Ok(())
        });
        livings.expect_in_room().returning(|_| Ok(vec![]));
        uow.livings = Arc::new(livings);

        let mut rooms = MockRoomRepository::new();
        rooms.expect_find().returning(move |id| {
            if id == here_id {
                Ok(Some(here.clone()))
            } else if id == dest_id {
                Ok(Some(destination.clone()))
            } else {
                Ok(None)
            }
        });
        uow.rooms = Arc::new(rooms);

        let service = GameManager::new(Arc::new(uow));
        let view = service.move_to(user_id, dest_id).await.unwrap();

        assert_eq!(view.id, dest_id);
        assert_eq!(view.name, "Promenade");
    }

    #[tokio::test]
    async fn test_move_to_current_room_is_refused() {
        let user_id = Uuid::new_v4();
        let here = room("Docking Bay", vec![]);
        let here_id = here.id;
        let jax = character(user_id, here_id);

        let mut uow = MockUow::new();
        let mut livings = MockLivingRepository::new();
        livings
            .expect_find_character_by_user()
            .returning(move |_| Ok(Some(jax.clone())));
        uow.livings = Arc::new(livings);

        let mut rooms = MockRoomRepository::new();
        rooms.expect_find().returning(move |_| Ok(Some(here.clone())));
        uow.rooms = Arc::new(rooms);

        let service = GameManager::new(Arc::new(uow));
        let result = service.move_to(user_id, here_id).await;

        assert!(
            matches!(result, Err(AppError::Validation(msg)) if msg == "you are already there")
        );
    }

    #[tokio::test]
    async fn test_move_to_unconnected_room_is_refused() {
        let user_id = Uuid::new_v4();
        let here = room("Docking Bay", vec![]);
        let jax = character(user_id, here.id);

        let mut uow = MockUow::new();
        let mut livings = MockLivingRepository::new();
        livings
            .expect_find_character_by_user()
            .returning(move |_| Ok(Some(jax.clone())));
        uow.livings = Arc::new(livings);

        let mut rooms = MockRoomRepository::new();
        rooms.expect_find().returning(move |_| Ok(Some(here.clone())));
        uow.rooms = Arc::new(rooms);

        let service = GameManager::new(Arc::new(uow));
        let result = service.move_to(user_id, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == "that is too far away"));
    }

    #[tokio::test]
    async fn test_attack_target_in_another_room_is_refused() {
        let user_id = Uuid::new_v4();
        let jax = character(user_id, Uuid::new_v4());
        let drone = npc(Uuid::new_v4());
        let drone_id = drone.id;

        let mut uow = MockUow::new();
        let mut livings = MockLivingRepository::new();
        livings
            .expect_find_character_by_user()
            .returning(move |_| Ok(Some(jax.clone())));
        livings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(drone.clone())));
        uow.livings = Arc::new(livings);

        let service = GameManager::new(Arc::new(uow));
        let result = service.attack(user_id, drone_id).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_attack_between_clumsy_fighters_misses_and_engages() {
        // Both sides have zero dexterity: every draw ties, so both the
        // swing and the counterattack always miss.
        let user_id = Uuid::new_v4();
        let room_id = Uuid::new_v4();
        let mut jax = character(user_id, room_id);
        jax.attributes.dexterity = 0;
        let mut drone = npc(room_id);
        drone.attributes.dexterity = 0;
        let drone_id = drone.id;

        let mut uow = MockUow::new();
        let mut livings = MockLivingRepository::new();
        let jax_clone = jax.clone();
        livings
            .expect_find_character_by_user()
            .returning(move |_| Ok(Some(jax_clone.clone())));
        livings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(drone.clone())));
        livings.expect_save().returning(move |saved| {
            if saved.is_npc() {
                assert_eq!(saved.opponent_id, Some(jax.id));
            } else {
                assert_eq!(saved.opponent_id, Some(drone_id));
                assert_eq!(saved.state, LifeState::Alive);
            }
            Ok(())
        });
        uow.livings = Arc::new(livings);

        let service = GameManager::new(Arc::new(uow));
        let report = service.attack(user_id, drone_id).await.unwrap();

        assert_eq!(report.target, "Maintenance Drone");
        assert_eq!(report.outcome, AttackOutcome::Miss);
        assert_eq!(report.retaliation, Some(AttackOutcome::Miss));
        assert_eq!(report.hps, report.max_hps);
    }

    #[tokio::test]
    async fn test_attack_character_target_is_refused() {
        // Other player characters are not valid targets.
        let user_id = Uuid::new_v4();
        let room_id = Uuid::new_v4();
        let jax = character(user_id, room_id);
        let other = character(Uuid::new_v4(), room_id);
        let other_id = other.id;

        let mut uow = MockUow::new();
        let mut livings = MockLivingRepository::new();
        livings
            .expect_find_character_by_user()
            .returning(move |_| Ok(Some(jax.clone())));
        livings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(other.clone())));
        uow.livings = Arc::new(livings);

        let service = GameManager::new(Arc::new(uow));
        let result = service.attack(user_id, other_id).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
