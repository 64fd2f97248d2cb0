//! CRUD operations for the wiki_entries table.
//!
//! Besides plain CRUD this module owns the two lookups the merge engine and
//! the manual page editor depend on: the root-entry-by-title natural-key
//! lookup and the next-sibling-order computation.

use super::error::{EntityApiErrorKind, Error};
use entity::wiki_entries::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder, TryIntoModel,
};

/// Creates a new wiki entry record
pub async fn create(db: &DatabaseConnection, entry_model: Model) -> Result<Model, Error> {
    debug!(
        "Creating new wiki entry '{}' in campaign: {}",
        entry_model.title, entry_model.campaign_id
    );

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        campaign_id: Set(entry_model.campaign_id),
        parent_id: Set(entry_model.parent_id),
        session_id: Set(entry_model.session_id),
        title: Set(entry_model.title),
        content: Set(entry_model.content),
        icon: Set(entry_model.icon),
        sibling_order: Set(entry_model.sibling_order),
        related_pages: Set(entry_model.related_pages),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.save(db).await?.try_into_model()?)
}

/// Appends merge output to an existing entry: replaces content and the
/// related-pages list, leaving every other field untouched.
pub async fn update_merged_content(
    db: &DatabaseConnection,
    id: Id,
    content: Option<String>,
    related_pages: String,
) -> Result<Model, Error> {
    let result = Entity::find_by_id(id).one(db).await?;

    match result {
        Some(existing) => {
            let active_model = ActiveModel {
                id: Unchanged(existing.id),
                campaign_id: Unchanged(existing.campaign_id),
                parent_id: Unchanged(existing.parent_id),
                session_id: Unchanged(existing.session_id),
                title: Unchanged(existing.title),
                content: Set(content),
                icon: Unchanged(existing.icon),
                sibling_order: Unchanged(existing.sibling_order),
                related_pages: Set(related_pages),
                created_at: Unchanged(existing.created_at),
                updated_at: Set(chrono::Utc::now().into()),
            };

            Ok(active_model.update(db).await?.try_into_model()?)
        }
        None => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }),
    }
}

/// Finds a wiki entry by ID
pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Finds all entries of a campaign in stable sibling order. The tree builder
/// relies on this enumeration order for its tie-breaking.
pub async fn find_by_campaign_id(
    db: &DatabaseConnection,
    campaign_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::CampaignId.eq(campaign_id))
        .order_by_asc(Column::SiblingOrder)
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// The merge engine's natural-key lookup: a top-level entry in the given
/// campaign whose title matches exactly.
pub async fn find_root_by_title(
    db: &DatabaseConnection,
    campaign_id: Id,
    title: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::CampaignId.eq(campaign_id))
        .filter(Column::Title.eq(title))
        .filter(Column::ParentId.is_null())
        .one(db)
        .await?)
}

/// Next sibling_order value for a new entry under the given parent
pub async fn next_sibling_order(
    db: &DatabaseConnection,
    campaign_id: Id,
    parent_id: Option<Id>,
) -> Result<i32, Error> {
    let mut query = Entity::find().filter(Column::CampaignId.eq(campaign_id));
    query = match parent_id {
        Some(parent_id) => query.filter(Column::ParentId.eq(parent_id)),
        None => query.filter(Column::ParentId.is_null()),
    };

    let last = query
        .order_by_desc(Column::SiblingOrder)
        .one(db)
        .await?;

    Ok(last.map(|entry| entry.sibling_order).unwrap_or(0) + 1)
}

/// Deletes a wiki entry by ID. Descendants cascade in the schema.
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
    async fn find_root_by_title_scopes_to_campaign_and_null_parent() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<_>, _>(vec![vec![]])
            .into_connection();

        let campaign_id = Id::new_v4();
        let _ = find_root_by_title(&db, campaign_id, "Dark Cave").await?;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "wiki_entries"."id", "wiki_entries"."campaign_id", "wiki_entries"."parent_id", "wiki_entries"."session_id", "wiki_entries"."title", "wiki_entries"."content", "wiki_entries"."icon", "wiki_entries"."sibling_order", "wiki_entries"."related_pages", "wiki_entries"."created_at", "wiki_entries"."updated_at" FROM "chronicler"."wiki_entries" WHERE "wiki_entries"."campaign_id" = $1 AND "wiki_entries"."title" = $2 AND "wiki_entries"."parent_id" IS NULL LIMIT $3"#,
                [
                    campaign_id.into(),
                    "Dark Cave".into(),
                    1u64.into()
                ]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn next_sibling_order_starts_at_one_for_empty_sibling_group() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<_>, _>(vec![vec![]])
            .into_connection();

        let order = next_sibling_order(&db, Id::new_v4(), None).await?;
        assert_eq!(order, 1);

        Ok(())
    }

    #[tokio::test]
    async fn next_sibling_order_increments_highest_existing_order() -> Result<(), Error> {
        let now = chrono::Utc::now();
        let campaign_id = Id::new_v4();
        let existing = Model {
            id: Id::new_v4(),
            campaign_id,
            parent_id: None,
            session_id: None,
            title: "Dramatis Personae".to_string(),
            content: None,
            icon: "📄".to_string(),
            sibling_order: 7,
            related_pages: "[]".to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing]])
            .into_connection();

        let order = next_sibling_order(&db, campaign_id, None).await?;
        assert_eq!(order, 8);

        Ok(())
    }
}
