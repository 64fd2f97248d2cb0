//! Campaign operations, scoped to the authenticated owner.

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use entity::campaigns::{self, Model};
use entity::Id;
use entity_api::{campaign, query, IntoQueryFilterMap};
use log::*;
use sea_orm::DatabaseConnection;

/// Fetch a campaign and verify the caller owns it. Everything campaign-scoped
/// (sessions, wiki entries, ingestion) funnels through this check.
pub async fn find_owned_by(
    db: &DatabaseConnection,
    user_id: Id,
    campaign_id: Id,
) -> Result<Model, Error> {
    let campaign = campaign::find_by_id(db, campaign_id).await?;

    if campaign.user_id != user_id {
        warn!("User {user_id} denied access to campaign {campaign_id}");
        return Err(Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Forbidden,
            )),
        });
    }

    Ok(campaign)
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: Id,
    campaign_model: Model,
) -> Result<Model, Error> {
    Ok(campaign::create(db, user_id, campaign_model).await?)
}

pub async fn find_by(
    db: &DatabaseConnection,
    params: impl IntoQueryFilterMap,
) -> Result<Vec<Model>, Error> {
    Ok(
        query::find_by::<campaigns::Entity, campaigns::Column>(db, params.into_query_filter_map())
            .await?,
    )
}

pub async fn update(
    db: &DatabaseConnection,
    user_id: Id,
    campaign_id: Id,
    campaign_model: Model,
) -> Result<Model, Error> {
    find_owned_by(db, user_id, campaign_id).await?;
    Ok(campaign::update(db, campaign_id, campaign_model).await?)
}

/// Deletes the campaign; sessions and wiki entries cascade in the schema.
pub async fn delete(db: &DatabaseConnection, user_id: Id, campaign_id: Id) -> Result<(), Error> {
    find_owned_by(db, user_id, campaign_id).await?;
    Ok(campaign::delete_by_id(db, campaign_id).await?)
}
