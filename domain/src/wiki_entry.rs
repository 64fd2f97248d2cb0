//! Wiki entry operations, scoped through campaign ownership.

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::wiki_tree::{build_tree, WikiTreeNode};
use crate::{campaign, suggestion};
use entity::wiki_entries::{self, Model};
use entity::Id;
use entity_api::{mutate, mutate::IntoUpdateMap, wiki_entry};
use sea_orm::{DatabaseConnection, IntoActiveModel};
use service::config::Config;

/// The campaign's wiki as a nested tree, ready to render.
pub async fn tree(
    db: &DatabaseConnection,
    user_id: Id,
    campaign_id: Id,
) -> Result<Vec<WikiTreeNode>, Error> {
    campaign::find_owned_by(db, user_id, campaign_id).await?;
    let entries = wiki_entry::find_by_campaign_id(db, campaign_id).await?;
    Ok(build_tree(entries))
}

/// Create a manual page. It is appended to the end of its sibling group.
pub async fn create(
    db: &DatabaseConnection,
    user_id: Id,
    campaign_id: Id,
    mut entry_model: Model,
) -> Result<Model, Error> {
    campaign::find_owned_by(db, user_id, campaign_id).await?;

    if let Some(parent_id) = entry_model.parent_id {
        // Parent edges never cross campaigns
        find_in_campaign(db, campaign_id, parent_id).await?;
    }

    entry_model.campaign_id = campaign_id;
    entry_model.sibling_order =
        wiki_entry::next_sibling_order(db, campaign_id, entry_model.parent_id).await?;

    Ok(wiki_entry::create(db, entry_model).await?)
}

pub async fn find(
    db: &DatabaseConnection,
    user_id: Id,
    campaign_id: Id,
    entry_id: Id,
) -> Result<Model, Error> {
    campaign::find_owned_by(db, user_id, campaign_id).await?;
    find_in_campaign(db, campaign_id, entry_id).await
}

/// The debounced-autosave target: only the columns present in the params are
/// touched, so saving unchanged content is a successful no-op.
pub async fn update(
    db: &DatabaseConnection,
    user_id: Id,
    campaign_id: Id,
    entry_id: Id,
    params: impl IntoUpdateMap,
) -> Result<Model, Error> {
    let entry = find(db, user_id, campaign_id, entry_id).await?;
    let active_model = entry.into_active_model();

    let mut update_map = params.into_update_map();
    let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
    update_map.insert("updated_at".to_string(), Some(now.into()));

    Ok(
        mutate::update::<wiki_entries::ActiveModel, wiki_entries::Column>(
            db,
            active_model,
            update_map,
        )
        .await?,
    )
}

/// Deletes an entry; descendants cascade in the schema.
pub async fn delete(
    db: &DatabaseConnection,
    user_id: Id,
    campaign_id: Id,
    entry_id: Id,
) -> Result<(), Error> {
    find(db, user_id, campaign_id, entry_id).await?;
    Ok(wiki_entry::delete_by_id(db, entry_id).await?)
}

/// Cross-reference suggestions for one entry against the rest of its campaign.
pub async fn suggest_related(
    db: &DatabaseConnection,
    config: &Config,
    user_id: Id,
    campaign_id: Id,
    entry_id: Id,
) -> Result<Vec<String>, Error> {
    let entry = find(db, user_id, campaign_id, entry_id).await?;
    let others = wiki_entry::find_by_campaign_id(db, campaign_id).await?;
    Ok(suggestion::suggest_related(config, &entry, &others).await)
}

/// An entry id that exists under a different campaign does not name a resource
/// of this campaign; treat it as absent.
async fn find_in_campaign(
    db: &DatabaseConnection,
    campaign_id: Id,
    entry_id: Id,
) -> Result<Model, Error> {
    let entry = wiki_entry::find_by_id(db, entry_id).await?;

    if entry.campaign_id != campaign_id {
        return Err(Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::NotFound,
            )),
        });
    }

    Ok(entry)
}
