//! Room exit junction entity (directed adjacency between two rooms).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "room_exits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub from_room_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub to_room_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
