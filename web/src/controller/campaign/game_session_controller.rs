use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{game_session as GameSessionApi, Id};
use service::config::ApiVersion;

use log::*;

/// GET all Game Sessions of a Campaign
#[utoipa::path(
    get,
    path = "/campaigns/{campaign_id}/sessions",
    params(
        ApiVersion,
        ("campaign_id" = Uuid, Path, description = "Campaign id to list sessions for")
    ),
    responses(
        (status = 200, description = "Successfully retrieved all Game Sessions", body = [game_sessions::Model]),
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
    debug!("GET all Game Sessions for campaign {campaign_id}");

    let sessions = GameSessionApi::list(app_state.db_conn_ref(), user.id, campaign_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), sessions)))
}

/// GET a Game Session by its id
#[utoipa::path(
    get,
    path = "/campaigns/{campaign_id}/sessions/{session_id}",
    params(
        ApiVersion,
        ("campaign_id" = Uuid, Path, description = "Campaign id the session belongs to"),
        ("session_id" = Uuid, Path, description = "Game Session id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Game Session", body = [game_sessions::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Game Session not found"),
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
    Path((campaign_id, session_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Game Session {session_id} of campaign {campaign_id}");

    let session =
        GameSessionApi::find(app_state.db_conn_ref(), user.id, campaign_id, session_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), session)))
}

/// DELETE a Game Session; its wiki entries stay behind with the session link cleared
#[utoipa::path(
    delete,
    path = "/campaigns/{campaign_id}/sessions/{session_id}",
    params(
        ApiVersion,
        ("campaign_id" = Uuid, Path, description = "Campaign id the session belongs to"),
        ("session_id" = Uuid, Path, description = "Game Session id to delete")
    ),
    responses(
        (status = 204, description = "Successfully deleted a Game Session"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Game Session not found"),
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
    Path((campaign_id, session_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Game Session {session_id} of campaign {campaign_id}");

    GameSessionApi::delete(app_state.db_conn_ref(), user.id, campaign_id, session_id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
