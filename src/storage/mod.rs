//! Storage backend abstraction for media uploads.
//!
//! Supports multiple backends:
//! - `local`: Local filesystem storage, served back under `/uploads`
//! - `cloudinary`: Cloudinary upload API; files are served from the CDN
//!
//! The application only ever keeps the durable URL a backend returns; it
//! never interprets or transforms the media itself.

pub mod cloudinary;
pub mod local;

use crate::app_config::StorageConfig;
use actix_web::web::Bytes;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed stream of bytes for streaming file content.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// What kind of media is being stored. Backends may use this as a folder or
/// resource-type hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// Represents a retrieved storage object with metadata.
pub struct StorageObject {
    /// Streaming body content
    pub body: ByteStream,
    /// Content length in bytes
    pub content_length: Option<i64>,
    /// MIME content type
    pub content_type: Option<String>,
    /// Entity tag for caching
    pub e_tag: Option<String>,
    /// Content range for partial responses
    pub content_range: Option<String>,
    /// Accept ranges header value
    pub accept_ranges: Option<String>,
    /// Last modified timestamp
    pub last_modified: Option<String>,
}

/// Storage operation errors.
#[derive(Debug)]
pub enum StorageError {
    /// File not found
    NotFound(String),
    /// I/O error
    Io(std::io::Error),
    /// Upstream provider error (network, quota, malformed response)
    Upstream(String),
    /// Invalid range request
    InvalidRange(String),
    /// Operation not supported by this backend
    Unsupported(&'static str),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::NotFound(msg) => write!(f, "Not found: {}", msg),
            StorageError::Io(e) => write!(f, "I/O error: {}", e),
            StorageError::Upstream(msg) => write!(f, "Storage provider error: {}", msg),
            StorageError::InvalidRange(msg) => write!(f, "Invalid range: {}", msg),
            StorageError::Unsupported(msg) => write!(f, "Unsupported operation: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(e.to_string())
        } else {
            StorageError::Io(e)
        }
    }
}

/// Trait for storage backends.
///
/// All storage backends must implement this trait to provide a unified
/// interface for media storage operations.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store a file and return its durable public URL.
    async fn put_object(
        &self,
        data: Vec<u8>,
        filename: &str,
        kind: MediaKind,
    ) -> Result<String, StorageError>;

    /// Retrieve a file for serving.
    ///
    /// The `key` is the canonical filename. Optional `range` parameter
    /// supports HTTP Range requests for streaming.
    async fn get_object(
        &self,
        key: &str,
        range: Option<String>,
    ) -> Result<StorageObject, StorageError>;

    /// Check if a file exists.
    async fn exists(&self, filename: &str) -> Result<bool, StorageError>;
}

/// Generate a collision-free filename that keeps the original extension.
pub fn unique_filename(original: &str) -> String {
    let ext = std::path::Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase());

    let id = uuid::Uuid::new_v4();
    match ext {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

/// Build the configured storage backend.
pub fn from_config(config: &StorageConfig) -> Result<Arc<dyn StorageBackend>, StorageError> {
    match config.backend.as_str() {
        "cloudinary" => Ok(Arc::new(cloudinary::CloudinaryStorage::new(
            config.cloudinary_cloud_name.clone(),
            config.cloudinary_api_key.clone(),
            config.cloudinary_api_secret.clone(),
            config.cloudinary_folder.clone(),
        ))),
        _ => Ok(Arc::new(local::LocalStorage::new(
            config.local_path.clone().into(),
        )?)),
    }
}
