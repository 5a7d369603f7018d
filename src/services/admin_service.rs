//! Admin service.
//!
//! World building and account maintenance: rooms and their exit graph,
//! NPCs, items and user roles. Everything here sits behind the admin
//! role check in the API layer.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::is_valid_role;
use crate::domain::{
    Attributes, DiceExpr, Item, ItemKind, ItemView, Living, LivingView, Room, Slot, User, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Admin service trait for dependency injection.
#[async_trait]
pub trait AdminService: Send + Sync {
    // Users
    async fn list_users(&self, params: &PaginationParams) -> AppResult<(Vec<User>, u64)>;

    async fn update_user_role(&self, id: Uuid, role: String) -> AppResult<User>;

    /// Delete a user account together with their character
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    // Rooms
    async fn list_rooms(&self, params: &PaginationParams) -> AppResult<(Vec<Room>, u64)>;

    async fn create_room(
        &self,
        name: String,
        description: String,
        kind: String,
    ) -> AppResult<Room>;

    async fn update_room(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        kind: Option<String>,
    ) -> AppResult<Room>;

    /// Delete an empty room and every exit touching it
    async fn delete_room(&self, id: Uuid) -> AppResult<()>;

    /// Connect two rooms; `two_way` also adds the return exit
    async fn link_rooms(&self, from: Uuid, to: Uuid, two_way: bool) -> AppResult<()>;

    async fn unlink_rooms(&self, from: Uuid, to: Uuid, two_way: bool) -> AppResult<()>;

    // Livings
    async fn list_livings(&self, params: &PaginationParams) -> AppResult<(Vec<LivingView>, u64)>;

    async fn spawn_npc(
        &self,
        name: String,
        race: String,
        attributes: Attributes,
        hps: i32,
        room_id: Uuid,
    ) -> AppResult<LivingView>;

    async fn update_living(
        &self,
        id: Uuid,
        hps: Option<i32>,
        credits: Option<i64>,
        room_id: Option<Uuid>,
    ) -> AppResult<LivingView>;

    async fn delete_living(&self, id: Uuid) -> AppResult<()>;

    // Items
    async fn list_items(&self, params: &PaginationParams) -> AppResult<(Vec<ItemView>, u64)>;

    async fn create_item(
        &self,
        name: String,
        value: i64,
        slot: String,
        kind: String,
        damage_dice: Option<String>,
        armor_class: Option<i32>,
    ) -> AppResult<ItemView>;

    async fn update_item(
        &self,
        id: Uuid,
        name: Option<String>,
        value: Option<i64>,
    ) -> AppResult<ItemView>;

    async fn delete_item(&self, id: Uuid) -> AppResult<()>;

    /// Hand an item to a living, or take it out of circulation with `None`
    async fn give_item(&self, item_id: Uuid, owner_id: Option<Uuid>) -> AppResult<ItemView>;
}

/// Build the tagged item kind from its admin-facing parts.
fn parse_item_kind(
    kind: &str,
    damage_dice: Option<String>,
    armor_class: Option<i32>,
) -> AppResult<ItemKind> {
    match kind {
        "weapon" => {
            let dice: DiceExpr = damage_dice
                .ok_or_else(|| AppError::validation("weapons need damage_dice"))?
                .parse()?;
            Ok(ItemKind::Weapon { damage: dice })
        }
        "armor" => {
            let armor_class =
                armor_class.ok_or_else(|| AppError::validation("armor needs armor_class"))?;
            Ok(ItemKind::Armor { armor_class })
        }
        "trinket" => Ok(ItemKind::Trinket),
        other => Err(AppError::validation(format!("unknown item kind: {}", other))),
    }
}

/// Concrete implementation of AdminService using Unit of Work.
pub struct AdminManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AdminManager<U> {
    /// Create new admin service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Remove a living and break off any combat pointed at it.
    async fn remove_living(&self, living: &Living) -> AppResult<()> {
        self.uow.livings().clear_opponent(living.id).await?;
        self.uow.livings().delete(living.id).await
    }
}

#[async_trait]
impl<U: UnitOfWork> AdminService for AdminManager<U> {
    async fn list_users(&self, params: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        self.uow.users().list(params).await
    }

    async fn update_user_role(&self, id: Uuid, role: String) -> AppResult<User> {
        if !is_valid_role(&role) {
            return Err(AppError::validation(format!("unknown role: {}", role)));
        }
        self.uow.users().update_role(id, UserRole::from(role.as_str())).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        // The character goes first; it references the user.
        if let Some(character) = self.uow.livings().find_character_by_user(id).await? {
            self.remove_living(&character).await?;
        }
        self.uow.users().delete(id).await
    }

    async fn list_rooms(&self, params: &PaginationParams) -> AppResult<(Vec<Room>, u64)> {
        self.uow.rooms().list(params).await
    }

    async fn create_room(
        &self,
        name: String,
        description: String,
        kind: String,
    ) -> AppResult<Room> {
        let room = Room {
            id: Uuid::new_v4(),
            name,
            description,
            kind,
            exits: vec![],
        };
        self.uow.rooms().create(room).await
    }

    async fn update_room(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        kind: Option<String>,
    ) -> AppResult<Room> {
        let mut room = self.uow.rooms().find(id).await?.ok_or_not_found()?;
        if let Some(name) = name {
            room.name = name;
        }
        if let Some(description) = description {
            room.description = description;
        }
        if let Some(kind) = kind {
            room.kind = kind;
        }
        self.uow.rooms().save(&room).await?;
        Ok(room)
    }

    async fn delete_room(&self, id: Uuid) -> AppResult<()> {
        if !self.uow.livings().in_room(id).await?.is_empty() {
            return Err(AppError::validation("the room is occupied"));
        }
        self.uow.rooms().delete(id).await
    }

    async fn link_rooms(&self, from: Uuid, to: Uuid, two_way: bool) -> AppResult<()> {
        if from == to {
            return Err(AppError::validation("a room cannot exit into itself"));
        }
        self.uow.rooms().find(from).await?.ok_or_not_found()?;
        self.uow.rooms().find(to).await?.ok_or_not_found()?;

        self.uow.rooms().add_exit(from, to).await?;
        if two_way {
            self.uow.rooms().add_exit(to, from).await?;
        }
        Ok(())
    }

    async fn unlink_rooms(&self, from: Uuid, to: Uuid, two_way: bool) -> AppResult<()> {
        self.uow.rooms().remove_exit(from, to).await?;
        if two_way {
            self.uow.rooms().remove_exit(to, from).await?;
        }
        Ok(())
    }

    async fn list_livings(&self, params: &PaginationParams) -> AppResult<(Vec<LivingView>, u64)> {
        let (livings, total) = self.uow.livings().list(params).await?;
        Ok((livings.iter().map(LivingView::from).collect(), total))
    }

    async fn spawn_npc(
        &self,
        name: String,
        race: String,
        attributes: Attributes,
        hps: i32,
        room_id: Uuid,
    ) -> AppResult<LivingView> {
        if hps <= 0 {
            return Err(AppError::validation("hps must be positive"));
        }
        self.uow.rooms().find(room_id).await?.ok_or_not_found()?;

        let npc = Living::new_npc(name, race, attributes, hps, room_id);
        let npc = self.uow.livings().create(npc).await?;

        tracing::info!(npc = %npc.name, room_id = %room_id, "npc spawned");

        Ok(LivingView::from(&npc))
    }

    async fn update_living(
        &self,
        id: Uuid,
        hps: Option<i32>,
        credits: Option<i64>,
        room_id: Option<Uuid>,
    ) -> AppResult<LivingView> {
        let mut living = self.uow.livings().find_by_id(id).await?.ok_or_not_found()?;

        if let Some(hps) = hps {
            living.hps = hps.min(living.max_hps);
        }
        if let Some(credits) = credits {
            living.credits = credits;
        }
        if let Some(room_id) = room_id {
            self.uow.rooms().find(room_id).await?.ok_or_not_found()?;
            living.room_id = room_id;
        }

        self.uow.livings().save(&living).await?;
        Ok(LivingView::from(&living))
    }

    async fn delete_living(&self, id: Uuid) -> AppResult<()> {
        let living = self.uow.livings().find_by_id(id).await?.ok_or_not_found()?;
        self.remove_living(&living).await
    }

    async fn list_items(&self, params: &PaginationParams) -> AppResult<(Vec<ItemView>, u64)> {
        let (items, total) = self.uow.items().list(params).await?;
        Ok((items.into_iter().map(ItemView::from).collect(), total))
    }

    async fn create_item(
        &self,
        name: String,
        value: i64,
        slot: String,
        kind: String,
        damage_dice: Option<String>,
        armor_class: Option<i32>,
    ) -> AppResult<ItemView> {
        let slot: Slot = slot
            .parse()
            .map_err(|e: String| AppError::validation(e))?;
        let kind = parse_item_kind(&kind, damage_dice, armor_class)?;

        let item = Item {
            id: Uuid::new_v4(),
            name,
            value,
            slot,
            kind,
            owner_id: None,
        };
        let item = self.uow.items().create(item).await?;
        Ok(ItemView::from(item))
    }

    async fn update_item(
        &self,
        id: Uuid,
        name: Option<String>,
        value: Option<i64>,
    ) -> AppResult<ItemView> {
        let mut item = self.uow.items().find_by_id(id).await?.ok_or_not_found()?;
        if let Some(name) = name {
            item.name = name;
        }
        if let Some(value) = value {
            item.value = value;
        }
        self.uow.items().save(&item).await?;
        Ok(ItemView::from(item))
    }

    async fn delete_item(&self, id: Uuid) -> AppResult<()> {
        self.uow.items().delete(id).await
    }

    async fn give_item(&self, item_id: Uuid, owner_id: Option<Uuid>) -> AppResult<ItemView> {
        let mut item = self.uow.items().find_by_id(item_id).await?.ok_or_not_found()?;

        if let Some(owner_id) = owner_id {
            self.uow
                .livings()
                .find_by_id(owner_id)
                .await?
                .ok_or_not_found()?;
        }

        item.owner_id = owner_id;
        self.uow.items().save(&item).await?;
        Ok(ItemView::from(item))
    }
}
