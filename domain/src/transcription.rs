//! Transcription stage of the ingestion pipeline.
//!
//! Takes the storage path returned by the upload step, runs the audio through
//! the transcription model, then clears the blob out of the temporary bucket.

use crate::error::Error;
use crate::gateway::{blob_store::BlobStoreClient, gemini::GeminiClient};
use log::*;
use service::config::Config;

const TRANSCRIBE_INSTRUCTION: &str = "Transcribe this tabletop RPG session recording verbatim. \
    Keep the transcript in the same language the speakers use. Do not translate, summarize \
    or annotate; output the spoken words only.";

/// Mime type for an audio file, keyed off the path's extension.
/// Matching is case-insensitive; unknown extensions fall back to audio/mp3.
pub fn mime_type_for_path(path: &str) -> &'static str {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/m4a",
        Some("aac") => "audio/aac",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        Some("mp4") => "audio/mp4",
        Some("webm") => "audio/webm",
        _ => "audio/mp3",
    }
}

/// Transcribe the audio blob at `temp_path` and delete it afterwards.
///
/// A missing blob propagates as NotFound. Deletion failure is logged and
/// swallowed; the transcript has already been produced at that point and an
/// orphaned temp object is not worth failing the request over.
pub async fn transcribe(config: &Config, temp_path: &str) -> Result<String, Error> {
    let blob_store = BlobStoreClient::from_config(config)?;
    let gemini = GeminiClient::from_config(config)?;

    let audio = blob_store.fetch(temp_path).await?;
    let mime_type = mime_type_for_path(temp_path);

    info!(
        "Transcribing {} bytes of {} from {}",
        audio.len(),
        mime_type,
        temp_path
    );

    let transcript = gemini
        .transcribe(&audio, mime_type, TRANSCRIBE_INSTRUCTION)
        .await?;

    if let Err(e) = blob_store.delete(temp_path).await {
        warn!("Failed to clean up temporary audio {}: {:?}", temp_path, e);
    }

    Ok(transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_covers_known_audio_extensions() {
        assert_eq!(mime_type_for_path("user/take.wav"), "audio/wav");
        assert_eq!(mime_type_for_path("user/take.m4a"), "audio/m4a");
        assert_eq!(mime_type_for_path("user/take.aac"), "audio/aac");
        assert_eq!(mime_type_for_path("user/take.flac"), "audio/flac");
        assert_eq!(mime_type_for_path("user/take.ogg"), "audio/ogg");
        assert_eq!(mime_type_for_path("user/take.mp4"), "audio/mp4");
        assert_eq!(mime_type_for_path("user/take.webm"), "audio/webm");
    }

    #[test]
    fn mime_type_ignores_extension_case() {
        assert_eq!(mime_type_for_path("user/take.WAV"), "audio/wav");
        assert_eq!(mime_type_for_path("user/take.M4A"), "audio/m4a");
        assert_eq!(mime_type_for_path("user/take.Ogg"), "audio/ogg");
    }

    #[test]
    fn mime_type_defaults_to_mp3() {
        assert_eq!(mime_type_for_path("user/take.mp3"), "audio/mp3");
        assert_eq!(mime_type_for_path("user/take.xyz"), "audio/mp3");
        assert_eq!(mime_type_for_path("no-extension"), "audio/mp3");
    }
}
