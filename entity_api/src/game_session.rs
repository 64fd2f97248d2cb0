//! CRUD operations for the game_sessions table.
//! Sessions are created once at the end of ingestion and never updated.

use super::error::{EntityApiErrorKind, Error};
use entity::game_sessions::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, DatabaseConnection, QueryOrder, TryIntoModel};

/// Creates a new game session record
pub async fn create(db: &DatabaseConnection, session_model: Model) -> Result<Model, Error> {
    debug!(
        "Creating new game session for campaign: {}",
        session_model.campaign_id
    );

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        campaign_id: Set(session_model.campaign_id),
        title: Set(session_model.title),
        recap_text: Set(session_model.recap_text),
        transcription_text: Set(session_model.transcription_text),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.save(db).await?.try_into_model()?)
}

/// Finds a game session by ID
pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Finds all sessions of a campaign, newest first
pub async fn find_by_campaign_id(
    db: &DatabaseConnection,
    campaign_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::CampaignId.eq(campaign_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Deletes a game session by ID
pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let model = find_by_id(db, id).await?;
    Entity::delete_by_id(model.id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};

    #[tokio::test]
    async fn find_by_campaign_id_orders_newest_first() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<_>, _>(vec![vec![]])
            .into_connection();

        let campaign_id = Id::new_v4();
        let _ = find_by_campaign_id(&db, campaign_id).await?;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "game_sessions"."id", "game_sessions"."campaign_id", "game_sessions"."title", "game_sessions"."recap_text", "game_sessions"."transcription_text", "game_sessions"."created_at", "game_sessions"."updated_at" FROM "chronicler"."game_sessions" WHERE "game_sessions"."campaign_id" = $1 ORDER BY "game_sessions"."created_at" DESC"#,
                [campaign_id.into()]
            )]
        );

        Ok(())
    }
}
