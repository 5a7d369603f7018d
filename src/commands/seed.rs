//! Seed command - Populates an empty database with the starting world.

use uuid::Uuid;

use crate::config::{Config, ROOM_KIND_START};
use crate::domain::{Attributes, DiceExpr, Item, ItemKind, Living, Room, Slot};
use crate::errors::AppResult;
use crate::infra::{Database, Persistence, UnitOfWork};

/// Execute the seed command.
///
/// A non-empty world is left alone so reseeding an existing database is
/// safe to run by accident.
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let persistence = Persistence::new(db.get_connection());

    if persistence.rooms().count().await? > 0 {
        tracing::info!("World already seeded, nothing to do");
        return Ok(());
    }

    tracing::info!("Seeding the starting world...");

    let docking_bay = make_room(
        "Docking Bay",
        "Rows of battered shuttles under flickering lights. A painted arrow \
         points toward the promenade.",
        ROOM_KIND_START,
    );
    let promenade = make_room(
        "Promenade",
        "The station's main artery. Vendors shout over the hum of \
         recyclers; corridors branch off in every direction.",
        "generic",
    );
    let cantina = make_room(
        "Cantina",
        "Dim, smoky and loud. Something that might be music plays from a \
         dented speaker behind the bar.",
        "generic",
    );
    let maintenance_shaft = make_room(
        "Maintenance Shaft",
        "A cramped crawlspace behind the promenade, thick with the smell \
         of coolant. Things skitter in the dark.",
        "generic",
    );

    let rooms = persistence.rooms();
    for room in [&docking_bay, &promenade, &cantina, &maintenance_shaft] {
        rooms.create(room.clone()).await?;
    }

    // The promenade connects everything; all links are walkable both ways.
    for (a, b) in [
        (docking_bay.id, promenade.id),
        (promenade.id, cantina.id),
        (promenade.id, maintenance_shaft.id),
    ] {
        rooms.add_exit(a, b).await?;
        rooms.add_exit(b, a).await?;
    }

    let livings = persistence.livings();
    livings
        .create(Living::new_npc(
            "Maintenance Drone".to_string(),
            "android".to_string(),
            Attributes::new(6, 4, 2),
            8,
            maintenance_shaft.id,
        ))
        .await?;
    livings
        .create(Living::new_npc(
            "Scavenger".to_string(),
            "human".to_string(),
            Attributes::new(8, 9, 6),
            14,
            promenade.id,
        ))
        .await?;
    livings
        .create(Living::new_npc(
            "Cantina Bouncer".to_string(),
            "human".to_string(),
            Attributes::new(14, 7, 5),
            25,
            cantina.id,
        ))
        .await?;

    let items = persistence.items();
    items
        .create(Item {
            id: Uuid::new_v4(),
            name: "Rusty Blaster".to_string(),
            value: 25,
            slot: Slot::Weapon,
            kind: ItemKind::Weapon {
                damage: DiceExpr { count: 2, sides: 6 },
            },
            owner_id: None,
        })
        .await?;
    items
        .create(Item {
            id: Uuid::new_v4(),
            name: "Scrap Plate Vest".to_string(),
            value: 40,
            slot: Slot::Chest,
            kind: ItemKind::Armor { armor_class: 2 },
            owner_id: None,
        })
        .await?;
    items
        .create(Item {
            id: Uuid::new_v4(),
            name: "Lucky Bolt".to_string(),
            value: 1,
            slot: Slot::Hands,
            kind: ItemKind::Trinket,
            owner_id: None,
        })
        .await?;

    tracing::info!("World seeded: 4 rooms, 3 NPCs, 3 items");
    println!("Seeded the starting world.");

    Ok(())
}

fn make_room(name: &str, description: &str, kind: &str) -> Room {
    Room {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: description.to_string(),
        kind: kind.to_string(),
        exits: vec![],
    }
}
