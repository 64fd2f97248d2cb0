//! Storage client for the temporary audio bucket.
//!
//! Uploaded recordings are parked in a Supabase-style object storage bucket
//! between the upload and transcription steps, then deleted. Objects are keyed
//! `<owner_key>/<uuid>.<ext>` so one user's uploads never collide with another's.

use crate::error::{DomainErrorKind, EntityErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use entity::Id;
use log::*;
use service::config::Config;

/// Object storage client for the temporary audio bucket
pub struct BlobStoreClient {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

impl BlobStoreClient {
    /// Create a new storage client with the given service key, project URL and bucket
    pub fn new(service_key: &str, base_url: &str, bucket: &str) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let mut header_value =
            reqwest::header::HeaderValue::from_str(&format!("Bearer {service_key}")).map_err(
                |e| {
                    warn!("Failed to create auth header: {:?}", e);
                    Error {
                        source: Some(Box::new(e)),
                        error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                            "Invalid service key format".to_string(),
                        )),
                    }
                },
            )?;
        header_value.set_sensitive(true);
        headers.insert("authorization", header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            bucket: bucket.to_string(),
        })
    }

    /// Build a client from runtime config. Missing storage settings are a
    /// configuration error.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let base_url = config.supabase_url().ok_or_else(|| {
            warn!("SUPABASE_URL is not configured");
            Error {
                source: None,
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
            }
        })?;
        let service_key = config.supabase_service_key().ok_or_else(|| {
            warn!("SUPABASE_SERVICE_KEY is not configured");
            Error {
                source: None,
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
            }
        })?;

        Self::new(&service_key, &base_url, &config.audio_bucket)
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    /// Upload audio bytes under a fresh object key derived from the owner and the
    /// original file name's extension. Returns the storage path for later fetch/delete.
    pub async fn store(
        &self,
        bytes: Vec<u8>,
        owner_key: Id,
        file_name: &str,
    ) -> Result<String, Error> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "mp3".to_string());
        let path = format!("{}/{}.{}", owner_key, Id::new_v4(), extension);

        debug!("Uploading {} bytes to {}", bytes.len(), path);

        let response = self
            .client
            .post(self.object_url(&path))
            .header("content-type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to upload audio blob: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            info!("Stored temporary audio blob: {}", path);
            Ok(path)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            error!("Storage API: {}", error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Upstream(error_text)),
            })
        }
    }

    /// Download a previously stored blob. A missing object is NotFound.
    pub async fn fetch(&self, path: &str) -> Result<Vec<u8>, Error> {
        let response = self
            .client
            .get(self.object_url(path))
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to fetch audio blob: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            let bytes = response.bytes().await.map_err(|e| {
                warn!("Failed to read audio blob body: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;
            Ok(bytes.to_vec())
        } else if response.status() == reqwest::StatusCode::NOT_FOUND {
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                    EntityErrorKind::NotFound,
                )),
            })
        } else {
            let error_text = response.text().await.unwrap_or_default();
            error!("Storage API: {}", error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Upstream(error_text)),
            })
        }
    }

    /// Delete a stored blob. Callers treat failure as best-effort cleanup.
    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        let response = self
            .client
            .delete(self.object_url(path))
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to delete audio blob: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            debug!("Deleted temporary audio blob: {}", path);
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Storage failed to delete blob {}: {}", path, error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Upstream(error_text)),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_maps_missing_object_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/storage/v1/object/audio-temp/owner/missing.wav")
            .with_status(404)
            .create_async()
            .await;

        let client = BlobStoreClient::new("key", &server.url(), "audio-temp").unwrap();
        let err = client.fetch("owner/missing.wav").await.unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
    }

    #[tokio::test]
    async fn fetch_returns_object_bytes() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/storage/v1/object/audio-temp/owner/take1.wav")
            .with_status(200)
            .with_body(b"RIFF....")
            .create_async()
            .await;

        let client = BlobStoreClient::new("key", &server.url(), "audio-temp").unwrap();
        let bytes = client.fetch("owner/take1.wav").await.unwrap();

        assert_eq!(bytes, b"RIFF....");
    }

    #[tokio::test]
    async fn store_keys_object_under_owner_with_original_extension() {
        let mut server = mockito::Server::new_async().await;
        let owner = Id::new_v4();
        let mock = server
            .mock(
                "POST",
                mockito::Matcher::Regex(format!(
                    "^/storage/v1/object/audio-temp/{owner}/[0-9a-f-]+\\.m4a$"
                )),
            )
            .with_status(200)
            .create_async()
            .await;

        let client = BlobStoreClient::new("key", &server.url(), "audio-temp").unwrap();
        let path = client
            .store(b"audio".to_vec(), owner, "session 12.m4a")
            .await
            .unwrap();

        assert!(path.starts_with(&owner.to_string()));
        assert!(path.ends_with(".m4a"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn store_lowercases_the_extension_in_the_object_key() {
        let mut server = mockito::Server::new_async().await;
        let owner = Id::new_v4();
        let mock = server
            .mock(
                "POST",
                mockito::Matcher::Regex(format!(
                    "^/storage/v1/object/audio-temp/{owner}/[0-9a-f-]+\\.wav$"
                )),
            )
            .with_status(200)
            .create_async()
            .await;

        let client = BlobStoreClient::new("key", &server.url(), "audio-temp").unwrap();
        let path = client
            .store(b"audio".to_vec(), owner, "Session 3.WAV")
            .await
            .unwrap();

        assert!(path.ends_with(".wav"));
        mock.assert_async().await;
    }
}
