//! Migration: Create the initial world schema.
//!
//! users, rooms, the room_exits adjacency junction, livings (characters
//! and NPCs in one table) and items.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .col(ColumnDef::new(Rooms::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rooms::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Rooms::Description).text().not_null())
                    .col(ColumnDef::new(Rooms::Kind).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Rooms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rooms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RoomExits::Table)
                    .col(ColumnDef::new(RoomExits::FromRoomId).uuid().not_null())
                    .col(ColumnDef::new(RoomExits::ToRoomId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(RoomExits::FromRoomId)
                            .col(RoomExits::ToRoomId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_room_exits_from")
                            .from(RoomExits::Table, RoomExits::FromRoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_room_exits_to")
                            .from(RoomExits::Table, RoomExits::ToRoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Livings::Table)
                    .col(ColumnDef::new(Livings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Livings::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Livings::Name).string_len(64).not_null())
                    .col(ColumnDef::new(Livings::Race).string_len(32).not_null())
                    .col(ColumnDef::new(Livings::Attributes).json_binary().not_null())
                    .col(ColumnDef::new(Livings::Hps).integer().not_null())
                    .col(ColumnDef::new(Livings::MaxHps).integer().not_null())
                    .col(ColumnDef::new(Livings::Body).json_binary().not_null())
                    .col(ColumnDef::new(Livings::Credits).big_integer().not_null())
                    .col(ColumnDef::new(Livings::State).string_len(16).not_null())
                    .col(ColumnDef::new(Livings::RoomId).uuid().not_null())
                    .col(ColumnDef::new(Livings::OpponentId).uuid().null())
                    .col(
                        ColumnDef::new(Livings::UserId)
                            .uuid()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Livings::Title).string_len(64).null())
                    .col(
                        ColumnDef::new(Livings::Inebriation)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Livings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Livings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_livings_room")
                            .from(Livings::Table, Livings::RoomId)
                            .to(Rooms::Table, Rooms::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_livings_user")
                            .from(Livings::Table, Livings::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_livings_room_id")
                    .table(Livings::Table)
                    .col(Livings::RoomId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .col(ColumnDef::new(Items::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Items::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Items::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Items::Slot).string_len(16).not_null())
                    .col(ColumnDef::new(Items::Value).big_integer().not_null())
                    .col(ColumnDef::new(Items::DamageDice).string_len(16).null())
                    .col(ColumnDef::new(Items::ArmorClass).integer().null())
                    .col(ColumnDef::new(Items::OwnerId).uuid().null())
                    .col(
                        ColumnDef::new(Items::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Items::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_items_owner")
                            .from(Items::Table, Items::OwnerId)
                            .to(Livings::Table, Livings::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_items_owner_id")
                    .table(Items::Table)
                    .col(Items::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Livings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoomExits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Rooms {
    Table,
    Id,
    Name,
    Description,
    Kind,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum RoomExits {
    Table,
    FromRoomId,
    ToRoomId,
}

#[derive(Iden)]
enum Livings {
    Table,
    Id,
    Kind,
    Name,
    Race,
    Attributes,
    Hps,
    MaxHps,
    Body,
    Credits,
    State,
    RoomId,
    OpponentId,
    UserId,
    Title,
    Inebriation,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Items {
    Table,
    Id,
    Name,
    Kind,
    Slot,
    Value,
    DamageDice,
    ArmorClass,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}
