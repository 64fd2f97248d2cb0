//! Ingestion orchestration: the final step that turns a reviewed recap into a
//! session record and wiki updates.

use crate::error::Error;
use crate::extraction::{self, ExtractedEntity};
use crate::{wiki_merge, wiki_merge::MergedEntry};
use entity::{game_sessions, Id};
use entity_api::game_session;
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use service::config::Config;
use utoipa::ToSchema;

/// What ingestion accomplished. The session record always exists when this is
/// returned; `wiki_updated` reports whether the full entity batch landed.
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestReport {
    pub session: game_sessions::Model,
    pub created_entries: Vec<MergedEntry>,
    pub wiki_updated: bool,
}

/// Record a session and fold its extracted entities into the campaign wiki.
///
/// Stages run sequentially. Session creation is the one fatal step; extraction
/// degrades to an empty batch, and merge failures leave the session in place
/// with `wiki_updated` reporting the shortfall.
pub async fn ingest(
    db: &DatabaseConnection,
    config: &Config,
    campaign_id: Id,
    title: String,
    recap: String,
    transcript: String,
) -> Result<IngestReport, Error> {
    let session = game_session::create(
        db,
        game_sessions::Model {
            id: Id::default(),
            campaign_id,
            title,
            recap_text: recap.clone(),
            transcription_text: transcript,
            created_at: chrono::Utc::now().into(),
            updated_at: chrono::Utc::now().into(),
        },
    )
    .await?;

    info!("Recorded game session {} for campaign {}", session.id, campaign_id);

    let entities = extraction::extract_entities(config, &recap).await;

    Ok(fold_into_wiki(db, campaign_id, session, entities).await)
}

/// Merge the entity batch into the wiki and report how much of it landed.
/// An empty batch is a valid outcome: the session stands, the wiki is untouched.
async fn fold_into_wiki(
    db: &DatabaseConnection,
    campaign_id: Id,
    session: game_sessions::Model,
    entities: Vec<ExtractedEntity>,
) -> IngestReport {
    let entity_count = entities.len();

    let created_entries = wiki_merge::merge(db, campaign_id, &session, entities).await;
    let wiki_updated = entity_count > 0 && created_entries.len() == entity_count;

    if !wiki_updated {
        warn!(
            "Wiki update incomplete for session {}: {} of {} entities merged",
            session.id,
            created_entries.len(),
            entity_count
        );
    }

    IngestReport {
        session,
        created_entries,
        wiki_updated,
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use entity::wiki_entries;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn session(campaign_id: Id) -> game_sessions::Model {
        let now = chrono::Utc::now();
        game_sessions::Model {
            id: Id::new_v4(),
            campaign_id,
            title: "Session 1: Into the Cave".to_string(),
            recap_text: "recap".to_string(),
            transcription_text: "transcript".to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn entity(title: &str) -> ExtractedEntity {
        ExtractedEntity {
            entity_type: "NPC".to_string(),
            title: title.to_string(),
            content: "A goblin merchant.".to_string(),
            icon: "👺".to_string(),
            related_to: vec![],
        }
    }

    fn entry(campaign_id: Id, title: &str) -> wiki_entries::Model {
        let now = chrono::Utc::now();
        wiki_entries::Model {
            id: Id::new_v4(),
            campaign_id,
            parent_id: None,
            session_id: None,
            title: title.to_string(),
            content: Some("A goblin merchant.".to_string()),
            icon: "👺".to_string(),
            sibling_order: 0,
            related_pages: "[]".to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn ingest_records_the_session_even_when_extraction_yields_nothing() -> Result<(), Error> {
        // Without an API key extraction degrades to an empty batch, so the
        // session insert is the only statement the pipeline should issue.
        std::env::remove_var("GOOGLE_API_KEY");
        let config = Config::default();

        let campaign_id = Id::new_v4();
        let session = session(campaign_id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![session.clone()]])
            .into_connection();

        let report = ingest(
            &db,
            &config,
            campaign_id,
            session.title.clone(),
            "recap".to_string(),
            "transcript".to_string(),
        )
        .await?;

        assert_eq!(report.session.id, session.id);
        assert!(report.created_entries.is_empty());
        assert!(!report.wiki_updated);

        Ok(())
    }

    #[tokio::test]
    async fn report_flags_an_incomplete_merge() {
        let campaign_id = Id::new_v4();
        let session = session(campaign_id);
        let created = entry(campaign_id, "Dark Cave");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // first entity's lookup blows up
            .append_query_errors([sea_orm::DbErr::Custom("connection reset".to_string())])
            // second entity: miss, then insert
            .append_query_results::<wiki_entries::Model, Vec<_>, _>(vec![vec![]])
            .append_query_results([vec![created]])
            .into_connection();

        let report = fold_into_wiki(
            &db,
            campaign_id,
            session,
            vec![entity("Griznak"), entity("Dark Cave")],
        )
        .await;

        assert_eq!(report.created_entries.len(), 1);
        assert_eq!(report.created_entries[0].title, "Dark Cave");
        assert!(!report.wiki_updated);
    }

    #[tokio::test]
    async fn report_flags_a_complete_merge() {
        let campaign_id = Id::new_v4();
        let session = session(campaign_id);
        let created = entry(campaign_id, "Griznak");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<wiki_entries::Model, Vec<_>, _>(vec![vec![]])
            .append_query_results([vec![created]])
            .into_connection();

        let report = fold_into_wiki(&db, campaign_id, session, vec![entity("Griznak")]).await;

        assert_eq!(report.created_entries.len(), 1);
        assert!(report.wiki_updated);
    }
}
