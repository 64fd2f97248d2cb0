use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::wiki_entry::UpdateParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{wiki_entries::Model, wiki_entry as WikiEntryApi, Id};
use service::config::ApiVersion;

use log::*;

/// GET the Campaign's wiki as a nested tree
#[utoipa::path(
    get,
    path = "/campaigns/{campaign_id}/wiki",
    params(
        ApiVersion,
        ("campaign_id" = Uuid, Path, description = "Campaign id to retrieve the wiki tree for")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the wiki tree", body = [WikiTreeNode]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Campaign not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(campaign_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET wiki tree for campaign {campaign_id}");

    let tree = WikiEntryApi::tree(app_state.db_conn_ref(), user.id, campaign_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), tree)))
}

/// POST create a new Wiki Entry
#[utoipa::path(
    post,
    path = "/campaigns/{campaign_id}/wiki",
    params(
        ApiVersion,
        ("campaign_id" = Uuid, Path, description = "Campaign id to create the entry under")
    ),
    request_body = wiki_entries::Model,
    responses(
        (status = 201, description = "Successfully created a new Wiki Entry", body = [wiki_entries::Model]),
        (status = 422, description = "Unprocessable Entity"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Campaign or parent entry not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(campaign_id): Path<Id>,
    Json(wiki_entry_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Wiki Entry from: {:?}", wiki_entry_model);

    let entry = WikiEntryApi::create(
        app_state.db_conn_ref(),
        user.id,
        campaign_id,
        wiki_entry_model,
    )
    .await?;

    debug!("New Wiki Entry: {:?}", entry);

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), entry)))
}

/// GET a Wiki Entry by its id
#[utoipa::path(
    get,
    path = "/campaigns/{campaign_id}/wiki/{entry_id}",
    params(
        ApiVersion,
        ("campaign_id" = Uuid, Path, description = "Campaign id the entry belongs to"),
        ("entry_id" = Uuid, Path, description = "Wiki Entry id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Wiki Entry", body = [wiki_entries::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Wiki Entry not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path((campaign_id, entry_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Wiki Entry {entry_id} of campaign {campaign_id}");

    let entry = WikiEntryApi::find(app_state.db_conn_ref(), user.id, campaign_id, entry_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), entry)))
}

/// PUT update a Wiki Entry; this is the autosave target, so only the
/// fields present in the body are written
#[utoipa::path(
    put,
    path = "/campaigns/{campaign_id}/wiki/{entry_id}",
    params(
        ApiVersion,
        ("campaign_id" = Uuid, Path, description = "Campaign id the entry belongs to"),
        ("entry_id" = Uuid, Path, description = "Wiki Entry id to update")
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully updated a Wiki Entry", body = [wiki_entries::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Wiki Entry not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path((campaign_id, entry_id)): Path<(Id, Id)>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Wiki Entry {entry_id} of campaign {campaign_id}");

    let entry = WikiEntryApi::update(
        app_state.db_conn_ref(),
        user.id,
        campaign_id,
        entry_id,
        params,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), entry)))
}

/// DELETE a Wiki Entry and its descendants
#[utoipa::path(
    delete,
    path = "/campaigns/{campaign_id}/wiki/{entry_id}",
    params(
        ApiVersion,
        ("campaign_id" = Uuid, Path, description = "Campaign id the entry belongs to"),
        ("entry_id" = Uuid, Path, description = "Wiki Entry id to delete")
    ),
    responses(
        (status = 204, description = "Successfully deleted a Wiki Entry"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Wiki Entry not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path((campaign_id, entry_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Wiki Entry {entry_id} of campaign {campaign_id}");

    WikiEntryApi::delete(app_state.db_conn_ref(), user.id, campaign_id, entry_id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}

/// POST generate cross-reference suggestions for a Wiki Entry
#[utoipa::path(
    post,
    path = "/campaigns/{campaign_id}/wiki/{entry_id}/suggestions",
    params(
        ApiVersion,
        ("campaign_id" = Uuid, Path, description = "Campaign id the entry belongs to"),
        ("entry_id" = Uuid, Path, description = "Wiki Entry id to suggest related entries for")
    ),
    responses(
        (status = 200, description = "Successfully generated suggestions", body = [String]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Wiki Entry not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn suggestions(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path((campaign_id, entry_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST suggestions for Wiki Entry {entry_id} of campaign {campaign_id}");

    let suggestions = WikiEntryApi::suggest_related(
        app_state.db_conn_ref(),
        &app_state.config,
        user.id,
        campaign_id,
        entry_id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), suggestions)))
}
