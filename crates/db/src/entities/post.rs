//! Post entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(nullable)]
    pub url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,

    pub author_id: i32,

    pub parent_resub_id: i32,

    pub created: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub edited: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Author,

    #[sea_orm(
        belongs_to = "super::resub::Entity",
        from = "Column::ParentResubId",
        to = "super::resub::Column::Id",
        on_delete = "Cascade"
    )]
    Resub,

    #[sea_orm(has_many = "super::post_vote::Entity")]
    Votes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::resub::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resub.def()
    }
}

impl Related<super::post_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
