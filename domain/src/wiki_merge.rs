//! The wiki merge engine.
//!
//! Folds a batch of extracted entities into a campaign's wiki. Matching is by
//! exact title against top-level entries only; a match appends a session-update
//! block to the existing page, a miss creates a new top-level page attributed
//! to the session. Existing prose is never overwritten.

use crate::error::Error;
use crate::extraction::ExtractedEntity;
use entity::{game_sessions, wiki_entries, Id};
use entity_api::wiki_entry;
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

/// Outcome of merging one entity into the wiki.
#[derive(Debug, Serialize, ToSchema)]
pub struct MergedEntry {
    #[schema(value_type = Uuid)]
    pub id: Id,
    pub title: String,
    /// true if the merge created a new page, false if it updated an existing one
    pub created: bool,
}

/// Append a session-update block to a page's existing content.
pub fn append_session_update(
    existing: Option<&str>,
    session_title: &str,
    content: &str,
) -> String {
    format!(
        "{}\n\n**Session Update ({}):**\n{}",
        existing.unwrap_or_default(),
        session_title,
        content
    )
}

/// Union the incoming related titles into the stored related-pages JSON array,
/// preserving order and dropping duplicates. Unparsable stored JSON is treated
/// as an empty list rather than an error.
pub fn merge_related_pages(existing_json: &str, additions: &[String]) -> String {
    let mut titles: Vec<String> = serde_json::from_str(existing_json).unwrap_or_default();

    for title in additions {
        if !titles.contains(title) {
            titles.push(title.clone());
        }
    }

    // A Vec<String> always serializes
    serde_json::to_string(&titles).unwrap_or_else(|_| "[]".to_string())
}

/// Merge a batch of extracted entities into the campaign's wiki, in batch order.
///
/// One entity's database failure is logged and skipped; the rest of the batch
/// continues. The returned list therefore holds one element per entity that
/// actually landed. Concurrent merges against the same (campaign, title) are
/// not guarded; the last writer wins on related_pages and both appends survive.
pub async fn merge(
    db: &DatabaseConnection,
    campaign_id: Id,
    session: &game_sessions::Model,
    entities: Vec<ExtractedEntity>,
) -> Vec<MergedEntry> {
    let mut merged = Vec::with_capacity(entities.len());

    for entity in entities {
        match merge_one(db, campaign_id, session, &entity).await {
            Ok(entry) => merged.push(entry),
            Err(e) => {
                warn!(
                    "Skipping entity '{}' after merge failure: {:?}",
                    entity.title, e
                );
            }
        }
    }

    merged
}

async fn merge_one(
    db: &DatabaseConnection,
    campaign_id: Id,
    session: &game_sessions::Model,
    entity: &ExtractedEntity,
) -> Result<MergedEntry, Error> {
    match wiki_entry::find_root_by_title(db, campaign_id, &entity.title).await? {
        Some(existing) => {
            debug!("Merging '{}' into existing entry {}", entity.title, existing.id);

            let content = append_session_update(
                existing.content.as_deref(),
                &session.title,
                &entity.content,
            );
            let related_pages = merge_related_pages(&existing.related_pages, &entity.related_to);

            let updated =
                wiki_entry::update_merged_content(db, existing.id, Some(content), related_pages)
                    .await?;

            Ok(MergedEntry {
                id: updated.id,
                title: updated.title,
                created: false,
            })
        }
        None => {
            debug!("Creating new wiki entry '{}'", entity.title);

            let created = wiki_entry::create(
                db,
                wiki_entries::Model {
                    id: Id::default(),
                    campaign_id,
                    parent_id: None,
                    session_id: Some(session.id),
                    title: entity.title.clone(),
                    content: Some(entity.content.clone()),
                    icon: entity.icon.clone(),
                    sibling_order: 0,
                    related_pages: merge_related_pages("[]", &entity.related_to),
                    created_at: chrono::Utc::now().into(),
                    updated_at: chrono::Utc::now().into(),
                },
            )
            .await?;

            Ok(MergedEntry {
                id: created.id,
                title: created.title,
                created: true,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_existing_content() {
        let merged = append_session_update(
            Some("A goblin merchant."),
            "Session 2: Return to the Cave",
            "Griznak betrayed the party.",
        );

        assert_eq!(
            merged,
            "A goblin merchant.\n\n**Session Update (Session 2: Return to the Cave):**\nGriznak betrayed the party."
        );
    }

    #[test]
    fn append_to_empty_page_keeps_the_update_block() {
        let merged = append_session_update(None, "Session 1", "First sighting.");
        assert_eq!(merged, "\n\n**Session Update (Session 1):**\nFirst sighting.");
    }

    #[test]
    fn related_pages_union_preserves_order_and_dedups() {
        let merged = merge_related_pages(
            r#"["Dark Cave", "Griznak"]"#,
            &["Griznak".to_string(), "Sunken Vale".to_string()],
        );

        assert_eq!(merged, r#"["Dark Cave","Griznak","Sunken Vale"]"#);
    }

    #[test]
    fn unparsable_related_pages_column_is_treated_as_empty() {
        let merged = merge_related_pages("not json", &["Griznak".to_string()]);
        assert_eq!(merged, r#"["Griznak"]"#);
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
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

    fn entry(campaign_id: Id, title: &str, content: &str) -> wiki_entries::Model {
        let now = chrono::Utc::now();
        wiki_entries::Model {
            id: Id::new_v4(),
            campaign_id,
            parent_id: None,
            session_id: None,
            title: title.to_string(),
            content: Some(content.to_string()),
            icon: "📄".to_string(),
            sibling_order: 0,
            related_pages: "[]".to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn griznak() -> ExtractedEntity {
        ExtractedEntity {
            entity_type: "NPC".to_string(),
            title: "Griznak".to_string(),
            content: "A goblin merchant.".to_string(),
            icon: "👺".to_string(),
            related_to: vec!["Dark Cave".to_string()],
        }
    }

    #[tokio::test]
    async fn merge_creates_a_new_entry_when_title_is_absent() {
        let campaign_id = Id::new_v4();
        let session = session(campaign_id);
        let created = entry(campaign_id, "Griznak", "A goblin merchant.");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // title lookup finds nothing
            .append_query_results::<wiki_entries::Model, Vec<_>, _>(vec![vec![]])
            // insert returns the created row
            .append_query_results([vec![created]])
            .into_connection();

        let merged = merge(&db, campaign_id, &session, vec![griznak()]).await;

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "Griznak");
        assert!(merged[0].created);
    }

    #[tokio::test]
    async fn merge_updates_an_existing_entry_in_place() {
        let campaign_id = Id::new_v4();
        let session = session(campaign_id);
        let existing = entry(campaign_id, "Griznak", "A goblin merchant.");
        let mut updated = existing.clone();
        updated.content = Some(append_session_update(
            Some("A goblin merchant."),
            &session.title,
            "A goblin merchant.",
        ));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // title lookup hits
            .append_query_results([vec![existing.clone()]])
            // update_merged_content refetches by id, then the update returns the row
            .append_query_results([vec![existing]])
            .append_query_results([vec![updated]])
            .into_connection();

        let merged = merge(&db, campaign_id, &session, vec![griznak()]).await;

        assert_eq!(merged.len(), 1);
        assert!(!merged[0].created);
    }

    #[tokio::test]
    async fn merge_continues_past_a_failing_entity() {
        let campaign_id = Id::new_v4();
        let session = session(campaign_id);
        let created = entry(campaign_id, "Dark Cave", "Where Griznak trades.");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // first entity's lookup blows up
            .append_query_errors([sea_orm::DbErr::Custom("connection reset".to_string())])
            // second entity: miss, then insert
            .append_query_results::<wiki_entries::Model, Vec<_>, _>(vec![vec![]])
            .append_query_results([vec![created]])
            .into_connection();

        let dark_cave = ExtractedEntity {
            entity_type: "Location".to_string(),
            title: "Dark Cave".to_string(),
            content: "Where Griznak trades.".to_string(),
            icon: "🕳️".to_string(),
            related_to: vec![],
        };

        let merged = merge(&db, campaign_id, &session, vec![griznak(), dark_cave]).await;

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "Dark Cave");
    }
}
