use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::ingestion::{IngestParams, RecapParams, TranscribeParams};
use crate::{AppState, Error};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::gateway::blob_store::BlobStoreClient;
use domain::{campaign as CampaignApi, ingestion as IngestionApi, recap as RecapApi,
    transcription as TranscriptionApi};
use serde_json::json;
use service::config::ApiVersion;

use log::*;

/// POST upload a session recording into temporary storage.
/// Returns the bucket path to hand to the transcribe step.
#[utoipa::path(
    post,
    path = "/sessions/upload",
    params(ApiVersion),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Successfully uploaded the recording, returns its temporary path"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed"),
        (status = 502, description = "Storage backend unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn upload(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    debug!("POST upload session recording for user {}", user.id);

    let field = multipart
        .next_field()
        .await
        .map_err(|e| {
            warn!("Malformed multipart upload: {e:?}");
            invalid_input()
        })?
        .ok_or_else(|| {
            warn!("Upload request contained no file field");
            invalid_input()
        })?;

    let file_name = field.file_name().unwrap_or("recording.mp3").to_string();
    let bytes = field.bytes().await.map_err(|e| {
        warn!("Failed to read uploaded file body: {e:?}");
        invalid_input()
    })?;

    info!("Received {} bytes of audio as {file_name}", bytes.len());

    let blob_store = BlobStoreClient::from_config(&app_state.config)?;
    let temp_path = blob_store.store(bytes.to_vec(), user.id, &file_name).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::CREATED.into(),
        json!({ "temp_path": temp_path }),
    )))
}

/// POST transcribe a previously uploaded recording.
/// The temporary blob is removed once the transcript exists.
#[utoipa::path(
    post,
    path = "/sessions/transcribe",
    params(ApiVersion),
    request_body = TranscribeParams,
    responses(
        (status = 200, description = "Successfully transcribed the recording"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Uploaded recording not found"),
        (status = 405, description = "Method not allowed"),
        (status = 502, description = "Transcription backend unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn transcribe(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<TranscribeParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST transcribe recording at {}", params.temp_path);

    let transcription = TranscriptionApi::transcribe(&app_state.config, &params.temp_path).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        json!({ "transcription": transcription }),
    )))
}

/// POST generate a structured session recap from a transcript.
/// Nothing is persisted; the recap goes back to the user for review.
#[utoipa::path(
    post,
    path = "/sessions/recap",
    params(ApiVersion),
    request_body = RecapParams,
    responses(
        (status = 200, description = "Successfully generated a recap"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed"),
        (status = 502, description = "Recap backend unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn recap(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<RecapParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST recap from a {} char transcript", params.transcription.len());

    let recap = RecapApi::generate_recap(&app_state.config, &params.transcription).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        json!({ "recap": recap }),
    )))
}

/// POST record the session and fold its extracted entities into the campaign wiki
#[utoipa::path(
    post,
    path = "/sessions/ingest",
    params(ApiVersion),
    request_body = IngestParams,
    responses(
        (status = 201, description = "Session recorded and wiki updated", body = IngestReport),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Campaign not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn ingest(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<IngestParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST ingest session '{}' into campaign {}", params.title, params.campaign_id);

    CampaignApi::find_owned_by(app_state.db_conn_ref(), user.id, params.campaign_id).await?;

    let report = IngestionApi::ingest(
        app_state.db_conn_ref(),
        &app_state.config,
        params.campaign_id,
        params.title,
        params.recap,
        params.transcription,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), report)))
}

fn invalid_input() -> domain::error::Error {
    domain::error::Error {
        source: None,
        error_kind: domain::error::DomainErrorKind::Internal(
            domain::error::InternalErrorKind::Entity(domain::error::EntityErrorKind::Invalid),
        ),
    }
}
