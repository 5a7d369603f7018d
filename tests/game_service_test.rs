//! World-level service tests.
//!
//! The live services are wired through [`Services::new`] over in-memory
//! repositories, so whole player flows (register, create a character,
//! walk the exit graph, fight) run end to end without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use spacerpg::config::{Config, ROOM_KIND_START};
use spacerpg::domain::{
    AttackOutcome, Attributes, DiceExpr, Item, ItemKind, LifeState, Living, Room, Slot, User,
    UserRole,
};
use spacerpg::errors::{AppError, AppResult};
use spacerpg::infra::{
    ItemRepository, LivingRepository, RoomRepository, UnitOfWork, UserRepository,
};
use spacerpg::services::{
    AdminManager, AdminService, AuthService, Authenticator, CharacterManager, CharacterService,
    GameManager, GameService, ServiceContainer, Services,
};
use spacerpg::types::PaginationParams;

// =============================================================================
// In-Memory World
// =============================================================================

/// Everything the repositories persist, held in plain maps.
#[derive(Default)]
struct World {
    users: HashMap<Uuid, User>,
    livings: HashMap<Uuid, Living>,
    items: HashMap<Uuid, Item>,
    rooms: HashMap<Uuid, Room>,
}

type SharedWorld = Arc<Mutex<World>>;

struct MemoryUsers(SharedWorld);

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.0.lock().unwrap().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let world = self.0.lock().unwrap();
        Ok(world.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, email: String, password_hash: String) -> AppResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash,
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        };
        self.0.lock().unwrap().users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list(&self, _params: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let world = self.0.lock().unwrap();
        let users: Vec<User> = world.users.values().cloned().collect();
        let total = users.len() as u64;
        Ok((users, total))
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User> {
        let mut world = self.0.lock().unwrap();
        let user = world.users.get_mut(&id).ok_or(AppError::NotFound)?;
        user.role = role;
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.0
            .lock()
            .unwrap()
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }
}

struct MemoryLivings(SharedWorld);

#[async_trait]
impl LivingRepository for MemoryLivings {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Living>> {
        Ok(self.0.lock().unwrap().livings.get(&id).cloned())
    }

    async fn find_character_by_user(&self, user_id: Uuid) -> AppResult<Option<Living>> {
        let world = self.0.lock().unwrap();
        Ok(world
            .livings
            .values()
            .find(|l| l.user_id() == Some(user_id))
            .cloned())
    }

    async fn in_room(&self, room_id: Uuid) -> AppResult<Vec<Living>> {
        let world = self.0.lock().unwrap();
        Ok(world
            .livings
            .values()
            .filter(|l| l.room_id == room_id)
            .cloned()
            .collect())
    }

    async fn create(&self, living: Living) -> AppResult<Living> {
        self.0
            .lock()
            .unwrap()
            .livings
            .insert(living.id, living.clone());
        Ok(living)
    }

    async fn save(&self, living: &Living) -> AppResult<()> {
        self.0
            .lock()
            .unwrap()
            .livings
            .insert(living.id, living.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.0
            .lock()
            .unwrap()
            .livings
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn clear_opponent(&self, opponent_id: Uuid) -> AppResult<()> {
        let mut world = self.0.lock().unwrap();
        for living in world.livings.values_mut() {
            if living.opponent_id == Some(opponent_id) && !living.is_dead() {
                living.opponent_id = None;
                living.state = LifeState::Idle;
            }
        }
        Ok(())
    }

    async fn list(&self, _params: &PaginationParams) -> AppResult<(Vec<Living>, u64)> {
        let world = self.0.lock().unwrap();
        let livings: Vec<Living> = world.livings.values().cloned().collect();
        let total = livings.len() as u64;
        Ok((livings, total))
    }
}

struct MemoryItems(SharedWorld);

#[async_trait]
impl ItemRepository for MemoryItems {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Item>> {
        Ok(self.0.lock().unwrap().items.get(&id).cloned())
    }

    async fn owned_by(&self, owner_id: Uuid) -> AppResult<Vec<Item>> {
        let world = self.0.lock().unwrap();
        Ok(world
            .items
            .values()
            .filter(|i| i.owner_id == Some(owner_id))
            .cloned()
            .collect())
    }

    async fn create(&self, item: Item) -> AppResult<Item> {
        self.0.lock().unwrap().items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn save(&self, item: &Item) -> AppResult<()> {
        self.0.lock().unwrap().items.insert(item.id, item.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.0
            .lock()
            .unwrap()
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn list(&self, _params: &PaginationParams) -> AppResult<(Vec<Item>, u64)> {
        let world = self.0.lock().unwrap();
        let items: Vec<Item> = world.items.values().cloned().collect();
        let total = items.len() as u64;
        Ok((items, total))
    }
}

struct MemoryRooms(SharedWorld);

#[async_trait]
impl RoomRepository for MemoryRooms {
    async fn find(&self, id: Uuid) -> AppResult<Option<Room>> {
        Ok(self.0.lock().unwrap().rooms.get(&id).cloned())
    }

    async fn starting_room(&self) -> AppResult<Option<Room>> {
        let world = self.0.lock().unwrap();
        Ok(world
            .rooms
            .values()
            .find(|r| r.kind == ROOM_KIND_START)
            .cloned())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.0.lock().unwrap().rooms.len() as u64)
    }

    async fn create(&self, room: Room) -> AppResult<Room> {
        self.0.lock().unwrap().rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn save(&self, room: &Room) -> AppResult<()> {
        self.0.lock().unwrap().rooms.insert(room.id, room.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.0
            .lock()
            .unwrap()
            .rooms
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn add_exit(&self, from: Uuid, to: Uuid) -> AppResult<()> {
        let mut world = self.0.lock().unwrap();
        let room = world.rooms.get_mut(&from).ok_or(AppError::NotFound)?;
        if !room.exits.contains(&to) {
            room.exits.push(to);
        }
        Ok(())
    }

    async fn remove_exit(&self, from: Uuid, to: Uuid) -> AppResult<()> {
        let mut world = self.0.lock().unwrap();
        let room = world.rooms.get_mut(&from).ok_or(AppError::NotFound)?;
        room.exits.retain(|e| *e != to);
        Ok(())
    }

    async fn list(&self, _params: &PaginationParams) -> AppResult<(Vec<Room>, u64)> {
        let world = self.0.lock().unwrap();
        let rooms: Vec<Room> = world.rooms.values().cloned().collect();
        let total = rooms.len() as u64;
        Ok((rooms, total))
    }
}

/// UnitOfWork over one shared in-memory world.
struct WorldUow {
    world: SharedWorld,
}

impl WorldUow {
    fn new(world: SharedWorld) -> Self {
        Self { world }
    }
}

impl UnitOfWork for WorldUow {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(MemoryUsers(self.world.clone()))
    }

    fn livings(&self) -> Arc<dyn LivingRepository> {
        Arc::new(MemoryLivings(self.world.clone()))
    }

    fn items(&self) -> Arc<dyn ItemRepository> {
        Arc::new(MemoryItems(self.world.clone()))
    }

    fn rooms(&self) -> Arc<dyn RoomRepository> {
        Arc::new(MemoryRooms(self.world.clone()))
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Wire the real services over an in-memory world, exposed through the
/// same container trait the server uses.
fn world_services(world: SharedWorld) -> Services {
    let uow = Arc::new(WorldUow::new(world));
    let config = Config::for_tests("world-test-secret-longer-than-32-chars");
    Services::new(
        Arc::new(Authenticator::new(uow.clone(), config)),
        Arc::new(CharacterManager::new(uow.clone())),
        Arc::new(GameManager::new(uow.clone())),
        Arc::new(AdminManager::new(uow)),
    )
}

fn room(name: &str, kind: &str) -> Room {
    Room {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: format!("The {}.", name.to_lowercase()),
        kind: kind.to_string(),
        exits: vec![],
    }
}

/// Seed a two-room world: the spawn room and one adjacent room, linked
/// both ways. Returns (spawn, adjacent).
fn seed_two_rooms(world: &SharedWorld) -> (Room, Room) {
    let mut spawn = room("Docking Bay", ROOM_KIND_START);
    let mut promenade = room("Promenade", "generic");
    spawn.exits.push(promenade.id);
    promenade.exits.push(spawn.id);

    let mut guard = world.lock().unwrap();
    guard.rooms.insert(spawn.id, spawn.clone());
    guard.rooms.insert(promenade.id, promenade.clone());
    (spawn, promenade)
}

fn mutate_living<F: FnOnce(&mut Living)>(world: &SharedWorld, id: Uuid, f: F) {
    let mut guard = world.lock().unwrap();
    f(guard.livings.get_mut(&id).expect("living exists"));
}

// =============================================================================
// Flow Tests
// =============================================================================

#[tokio::test]
async fn test_register_login_and_create_character_flow() {
    let world = SharedWorld::default();
    seed_two_rooms(&world);
    let services = world_services(world);

    let user = services
        .auth()
        .register("jax@example.com".to_string(), "password123".to_string())
        .await
        .unwrap();

    let token = services
        .auth()
        .login("jax@example.com".to_string(), "password123".to_string())
        .await
        .unwrap();
    let claims = services.auth().verify_token(&token.access_token).unwrap();
    assert_eq!(claims.sub, user.id);

    let sheet = services
        .characters()
        .create_character(user.id, "Jax".to_string(), None)
        .await
        .unwrap();
    assert_eq!(sheet.name, "Jax");
    assert_eq!(sheet.location, "Docking Bay");

    // One character per user.
    let again = services
        .characters()
        .create_character(user.id, "Jax II".to_string(), None)
        .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_movement_follows_the_exit_graph() {
    let world = SharedWorld::default();
    let (_, promenade) = seed_two_rooms(&world);
    let services = world_services(world.clone());

    let user_id = Uuid::new_v4();
    services
        .characters()
        .create_character(user_id, "Jax".to_string(), None)
        .await
        .unwrap();

    let view = services.game().move_to(user_id, promenade.id).await.unwrap();
    assert_eq!(view.name, "Promenade");

    // The move persisted.
    let sheet = services.characters().sheet(user_id).await.unwrap();
    assert_eq!(sheet.location, "Promenade");

    // An unlinked room stays out of reach.
    let elsewhere = {
        let far = room("Reactor Core", "generic");
        world.lock().unwrap().rooms.insert(far.id, far.clone());
        far
    };
    let refused = services.game().move_to(user_id, elsewhere.id).await;
    assert!(matches!(refused, Err(AppError::Validation(msg)) if msg == "that is too far away"));
}

#[tokio::test]
async fn test_slaying_an_npc_removes_it_from_the_world() {
    let world = SharedWorld::default();
    let (spawn, _) = seed_two_rooms(&world);
    let services = world_services(world.clone());

    let user_id = Uuid::new_v4();
    services
        .characters()
        .create_character(user_id, "Jax".to_string(), None)
        .await
        .unwrap();
    let character_id = {
        let guard = world.lock().unwrap();
        guard
            .livings
            .values()
            .find(|l| l.user_id() == Some(user_id))
            .unwrap()
            .id
    };

    // A defenseless one-hit NPC: zero dexterity never wins a draw, so it
    // cannot retaliate successfully, and any hit slays it.
    let drone = Living::new_npc(
        "Maintenance Drone".to_string(),
        "android".to_string(),
        Attributes::new(5, 0, 2),
        1,
        spawn.id,
    );
    let drone_id = drone.id;
    world.lock().unwrap().livings.insert(drone_id, drone);

    // Wield a fixed-damage weapon so every landed hit is lethal.
    let blaster = Item {
        id: Uuid::new_v4(),
        name: "Calibrated Blaster".to_string(),
        value: 50,
        slot: Slot::Weapon,
        kind: ItemKind::Weapon {
            damage: DiceExpr { count: 2, sides: 1 },
        },
        owner_id: Some(character_id),
    };
    world.lock().unwrap().items.insert(blaster.id, blaster.clone());
    mutate_living(&world, character_id, |c| {
        c.equip(Some(&blaster));
    });

    let mut slain = false;
    for _ in 0..300 {
        let report = services.game().attack(user_id, drone_id).await.unwrap();
        assert_eq!(report.target, "Maintenance Drone");
        assert_eq!(report.hps, report.max_hps, "zero-dex npc never lands a hit");
        match report.outcome {
            AttackOutcome::Hit { damage, slain: s } => {
                assert_eq!(damage, 1);
                assert!(s, "a hit on a 1 hp target must slay");
                assert!(report.retaliation.is_none(), "the dead do not retaliate");
                slain = true;
                break;
            }
            AttackOutcome::Miss => {
                assert_eq!(report.retaliation, Some(AttackOutcome::Miss));
            }
        }
    }
    assert!(slain, "the drone should fall within 300 swings");

    // Slain NPCs leave the world and the victor disengages.
    let guard = world.lock().unwrap();
    assert!(!guard.livings.contains_key(&drone_id));
    let character = guard.livings.get(&character_id).unwrap();
    assert_eq!(character.opponent_id, None);
    assert_eq!(character.state, LifeState::Idle);
}

#[tokio::test]
async fn test_walking_away_breaks_off_combat_on_both_sides() {
    let world = SharedWorld::default();
    let (spawn, promenade) = seed_two_rooms(&world);
    let services = world_services(world.clone());

    let user_id = Uuid::new_v4();
    services
        .characters()
        .create_character(user_id, "Jax".to_string(), None)
        .await
        .unwrap();
    let character_id = {
        let guard = world.lock().unwrap();
        guard
            .livings
            .values()
            .find(|l| l.user_id() == Some(user_id))
            .unwrap()
            .id
    };
    // Zero dexterity on both sides: every exchange misses, but the pair
    // still ends up engaged.
    mutate_living(&world, character_id, |c| c.attributes.dexterity = 0);

    let bouncer = Living::new_npc(
        "Cantina Bouncer".to_string(),
        "human".to_string(),
        Attributes::new(14, 0, 5),
        25,
        spawn.id,
    );
    let bouncer_id = bouncer.id;
    world.lock().unwrap().livings.insert(bouncer_id, bouncer);

    let report = services.game().attack(user_id, bouncer_id).await.unwrap();
    assert_eq!(report.outcome, AttackOutcome::Miss);
    {
        let guard = world.lock().unwrap();
        assert_eq!(
            guard.livings.get(&character_id).unwrap().opponent_id,
            Some(bouncer_id)
        );
        assert_eq!(
            guard.livings.get(&bouncer_id).unwrap().opponent_id,
            Some(character_id)
        );
    }

    services.game().move_to(user_id, promenade.id).await.unwrap();

    let guard = world.lock().unwrap();
    let character = guard.livings.get(&character_id).unwrap();
    assert_eq!(character.room_id, promenade.id);
    assert_eq!(character.opponent_id, None);
    assert_eq!(character.state, LifeState::Idle);
    let bouncer = guard.livings.get(&bouncer_id).unwrap();
    assert_eq!(bouncer.opponent_id, None);
    assert_eq!(bouncer.state, LifeState::Idle);
}

#[tokio::test]
async fn test_admin_forged_item_can_be_equipped() {
    let world = SharedWorld::default();
    seed_two_rooms(&world);
    let services = world_services(world.clone());

    let user_id = Uuid::new_v4();
    services
        .characters()
        .create_character(user_id, "Jax".to_string(), None)
        .await
        .unwrap();
    let character_id = {
        let guard = world.lock().unwrap();
        guard
            .livings
            .values()
            .find(|l| l.user_id() == Some(user_id))
            .unwrap()
            .id
    };

    let forged = services
        .admin()
        .create_item(
            "Shock Baton".to_string(),
            30,
            "weapon".to_string(),
            "weapon".to_string(),
            Some("2d4".to_string()),
            None,
        )
        .await
        .unwrap();
    services
        .admin()
        .give_item(forged.id, Some(character_id))
        .await
        .unwrap();

    let sheet = services
        .characters()
        .equip(user_id, Some(forged.id))
        .await
        .unwrap();
    assert_eq!(sheet.body.get("weapon"), Some(&forged.id));
    assert_eq!(sheet.inventory.len(), 1);
}

#[tokio::test]
async fn test_admin_spawned_npc_shows_up_in_look() {
    let world = SharedWorld::default();
    let (spawn, _) = seed_two_rooms(&world);
    let services = world_services(world);

    let user_id = Uuid::new_v4();
    services
        .characters()
        .create_character(user_id, "Jax".to_string(), None)
        .await
        .unwrap();

    services
        .admin()
        .spawn_npc(
            "Scavenger".to_string(),
            "human".to_string(),
            Attributes::uniform(8),
            14,
            spawn.id,
        )
        .await
        .unwrap();

    let view = services.game().look(user_id).await.unwrap();
    assert_eq!(view.name, "Docking Bay");
    assert_eq!(view.npcs.len(), 1);
    assert_eq!(view.npcs[0].name, "Scavenger");
    assert!(view.characters.is_empty(), "the viewer is not listed");
    assert_eq!(view.exits.len(), 1);
}
