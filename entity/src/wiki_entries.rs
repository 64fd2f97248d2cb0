//! SeaORM Entity for the wiki_entries table.
//! A node in a campaign's knowledge base. Entries form a forest through the
//! nullable `parent_id` self reference; the title is the natural key the
//! merge engine joins on for automatically generated root entries.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::wiki_entries::Model)]
#[sea_orm(schema_name = "chronicler", table_name = "wiki_entries")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    #[schema(value_type = Uuid)]
    pub campaign_id: Id,

    /// Tree edge; NULL for root entries. Must point into the same campaign.
    #[schema(value_type = Option<Uuid>)]
    pub parent_id: Option<Id>,

    /// Session this entry was auto-created from, if any
    #[schema(value_type = Option<Uuid>)]
    pub session_id: Option<Id>,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,

    /// Short glyph shown next to the title
    pub icon: String,

    /// Sort position among siblings sharing the same parent
    pub sibling_order: i32,

    /// JSON array of related page titles, serialized as text
    #[sea_orm(column_type = "Text")]
    pub related_pages: String,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaigns::Entity",
        from = "Column::CampaignId",
        to = "super::campaigns::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Campaigns,

    #[sea_orm(
        belongs_to = "super::game_sessions::Entity",
        from = "Column::SessionId",
        to = "super::game_sessions::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    GameSessions,

    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Parent,
}

impl Related<super::campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaigns.def()
    }
}

impl Related<super::game_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
