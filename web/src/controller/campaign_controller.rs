use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::campaign::IndexParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{campaign as CampaignApi, campaigns::Model, Id};
use service::config::ApiVersion;

use log::*;

/// GET all Campaigns owned by the logged-in user
#[utoipa::path(
    get,
    path = "/campaigns",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved all Campaigns", body = [campaigns::Model]),
        (status = 401, description = "Unauthorized"),
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
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Campaigns for user {}", user.id);

    let campaigns =
        CampaignApi::find_by(app_state.db_conn_ref(), IndexParams { user_id: user.id }).await?;

    debug!("Found Campaigns: {:?}", campaigns);

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), campaigns)))
}

/// POST create a new Campaign
#[utoipa::path(
    post,
    path = "/campaigns",
    params(ApiVersion),
    request_body = campaigns::Model,
    responses(
        (status = 201, description = "Successfully created a new Campaign", body = [campaigns::Model]),
        (status = 422, description = "Unprocessable Entity"),
        (status = 401, description = "Unauthorized"),
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
    Json(campaign_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Campaign from: {:?}", campaign_model);

    let campaign = CampaignApi::create(app_state.db_conn_ref(), user.id, campaign_model).await?;

    debug!("New Campaign: {:?}", campaign);

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), campaign)))
}

/// GET a Campaign by its id
#[utoipa::path(
    get,
    path = "/campaigns/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Campaign id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Campaign", body = [campaigns::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Campaign not found"),
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
    Path(campaign_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Campaign by id: {campaign_id}");

    let campaign =
        CampaignApi::find_owned_by(app_state.db_conn_ref(), user.id, campaign_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), campaign)))
}

/// PUT update a Campaign
#[utoipa::path(
    put,
    path = "/campaigns/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Campaign id to update")
    ),
    request_body = campaigns::Model,
    responses(
        (status = 200, description = "Successfully updated a Campaign", body = [campaigns::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Campaign not found"),
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
    Path(campaign_id): Path<Id>,
    Json(campaign_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Campaign with id: {campaign_id}");

    let campaign =
        CampaignApi::update(app_state.db_conn_ref(), user.id, campaign_id, campaign_model).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), campaign)))
}

/// DELETE a Campaign and everything under it
#[utoipa::path(
    delete,
    path = "/campaigns/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Campaign id to delete")
    ),
    responses(
        (status = 204, description = "Successfully deleted a Campaign"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Campaign not found"),
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
    Path(campaign_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Campaign by id: {campaign_id}");

    CampaignApi::delete(app_state.db_conn_ref(), user.id, campaign_id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
