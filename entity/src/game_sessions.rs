//! SeaORM Entity for the game_sessions table.
//! One recorded play session: recap and raw transcription are persisted
//! verbatim at the end of the ingestion pipeline and never edited afterwards.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::game_sessions::Model)]
#[sea_orm(schema_name = "chronicler", table_name = "game_sessions")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    #[schema(value_type = Uuid)]
    pub campaign_id: Id,

    pub title: String,

    /// Structured narrative recap, as approved by the user
    #[sea_orm(column_type = "Text")]
    pub recap_text: String,

    /// Raw transcription the recap was generated from
    #[sea_orm(column_type = "Text")]
    pub transcription_text: String,

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

    #[sea_orm(has_many = "super::wiki_entries::Entity")]
    WikiEntries,
}

impl Related<super::campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaigns.def()
    }
}

impl Related<super::wiki_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WikiEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
