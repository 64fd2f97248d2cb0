//! Game session reads and deletion, scoped through campaign ownership.
//! Creation happens inside ingestion, not here.

use crate::campaign;
use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use entity::game_sessions::Model;
use entity::Id;
use entity_api::game_session;
use sea_orm::DatabaseConnection;

pub async fn list(
    db: &DatabaseConnection,
    user_id: Id,
    campaign_id: Id,
) -> Result<Vec<Model>, Error> {
    campaign::find_owned_by(db, user_id, campaign_id).await?;
    Ok(game_session::find_by_campaign_id(db, campaign_id).await?)
}

/// Fetch one session of an owned campaign. A session id that exists but hangs
/// off a different campaign is treated as absent, not forbidden; the URL
/// simply does not name a real resource of that campaign.
pub async fn find(
    db: &DatabaseConnection,
    user_id: Id,
    campaign_id: Id,
    session_id: Id,
) -> Result<Model, Error> {
    campaign::find_owned_by(db, user_id, campaign_id).await?;
    let session = game_session::find_by_id(db, session_id).await?;

    if session.campaign_id != campaign_id {
        return Err(Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::NotFound,
            )),
        });
    }

    Ok(session)
}

/// Deletes a session. Its wiki entries survive with their session link nulled
/// out by the schema.
pub async fn delete(
    db: &DatabaseConnection,
    user_id: Id,
    campaign_id: Id,
    session_id: Id,
) -> Result<(), Error> {
    find(db, user_id, campaign_id, session_id).await?;
    Ok(game_session::delete_by_id(db, session_id).await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn find_treats_cross_campaign_session_as_absent() {
        let owner = Id::new_v4();
        let campaign_id = Id::new_v4();
        let now = chrono::Utc::now();

        let owned_campaign = entity::campaigns::Model {
            id: campaign_id,
            user_id: owner,
            title: "The Sunken Vale".to_string(),
            description: None,
            created_at: now.into(),
            updated_at: now.into(),
        };
        let foreign_session = Model {
            id: Id::new_v4(),
            campaign_id: Id::new_v4(),
            title: "Session 1".to_string(),
            recap_text: String::new(),
            transcription_text: String::new(),
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![owned_campaign]])
            .append_query_results([vec![foreign_session.clone()]])
            .into_connection();

        let err = find(&db, owner, campaign_id, foreign_session.id)
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
    }
}
