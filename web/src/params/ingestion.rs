use domain::Id;
use serde::Deserialize;
use utoipa::ToSchema;

/// Body for the transcription step: the bucket path returned by the upload step.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct TranscribeParams {
    pub(crate) temp_path: String,
}

/// Body for the recap step: the (possibly hand-edited) transcript.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct RecapParams {
    pub(crate) transcription: String,
}

/// Body for the final ingest step, carrying everything reviewed by the user.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct IngestParams {
    pub(crate) campaign_id: Id,
    pub(crate) title: String,
    pub(crate) recap: String,
    pub(crate) transcription: String,
}
