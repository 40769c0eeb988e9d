//! Cloudinary storage backend.
//!
//! Uploads go to the Cloudinary upload API with a SHA-256 request signature;
//! the returned `secure_url` is the durable URL stored on posts and staff
//! profiles. Serving is the CDN's job, so `get_object` is unsupported here.

use super::{MediaKind, StorageBackend, StorageError, StorageObject};
use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// Cloudinary storage backend.
pub struct CloudinaryStorage {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Deserialize)]
struct UploadErrorResponse {
    error: UploadErrorDetail,
}

#[derive(Deserialize)]
struct UploadErrorDetail {
    message: String,
}

impl CloudinaryStorage {
    pub fn new(cloud_name: String, api_key: String, api_secret: String, folder: String) -> Self {
        log::info!("CloudinaryStorage initialized for cloud: {}", cloud_name);

        Self {
            http: reqwest::Client::new(),
            cloud_name,
            api_key,
            api_secret,
            folder,
        }
    }

    /// Sign the upload request. Cloudinary expects the signed parameters
    /// serialized in alphabetical order, with the API secret appended.
    fn sign(&self, public_id: &str, timestamp: i64) -> String {
        let to_sign = format!(
            "folder={}&public_id={}&timestamp={}{}",
            self.folder, public_id, timestamp, self.api_secret
        );

        let digest = Sha256::digest(to_sign.as_bytes());
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            hex.push_str(&format!("{:02x}", byte));
        }
        hex
    }

    fn upload_url(&self, kind: MediaKind) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/{}/upload",
            self.cloud_name,
            kind.as_str()
        )
    }
}

#[async_trait]
impl StorageBackend for CloudinaryStorage {
    async fn put_object(
        &self,
        data: Vec<u8>,
        filename: &str,
        kind: MediaKind,
    ) -> Result<String, StorageError> {
        log::info!("CloudinaryStorage: put_object: {}", filename);

        // Cloudinary derives the delivery format itself; the public id is the
        // filename without its extension.
        let public_id = filename
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(filename)
            .to_string();

        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.sign(&public_id, timestamp);

        let form = reqwest::multipart::Form::new()
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", signature)
            .text("folder", self.folder.clone())
            .text("public_id", public_id)
            .part(
                "file",
                reqwest::multipart::Part::bytes(data).file_name(filename.to_string()),
            );

        let response = self
            .http
            .post(self.upload_url(kind))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<UploadErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(StorageError::Upstream(message));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Upstream(format!("malformed upload response: {}", e)))?;

        Ok(body.secure_url)
    }

    async fn get_object(
        &self,
        _key: &str,
        _range: Option<String>,
    ) -> Result<StorageObject, StorageError> {
        Err(StorageError::Unsupported(
            "Cloudinary objects are served directly from the CDN",
        ))
    }

    async fn exists(&self, _filename: &str) -> Result<bool, StorageError> {
        Err(StorageError::Unsupported(
            "Cloudinary objects are served directly from the CDN",
        ))
    }
}
