//! Multipart upload handling and serving of locally stored files.
//!
//! Create/update endpoints accept `multipart/form-data` with text fields
//! alongside `images`/`videos` file fields. Files are MIME-filtered by field
//! name and capped by the configured size limit before they ever reach a
//! storage backend.

use super::error::ApiError;
use crate::app_config;
use crate::storage::{self, MediaKind, StorageBackend};
use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use futures_util::TryStreamExt;
use std::collections::HashMap;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(serve_upload);
}

/// A file received in a multipart request, fully buffered.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parsed multipart request: plain text fields plus MIME-checked files.
#[derive(Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    pub images: Vec<UploadedFile>,
    pub videos: Vec<UploadedFile>,
}

impl UploadForm {
    /// Trimmed, non-empty text field value.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    }

    /// Raw text field value, preserved verbatim (for content bodies where
    /// whitespace matters).
    pub fn raw(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// Whether the field is present at all, even when empty.
    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Boolean field sent as "true"/"false" form text.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.fields.get(name).map(|v| v.trim() == "true")
    }

    /// Integer field.
    pub fn int(&self, name: &str) -> Option<i32> {
        self.text(name).and_then(|v| v.parse().ok())
    }
}

/// Read an entire multipart payload, enforcing field-name/MIME pairing, the
/// per-file size cap and the per-kind file count limits.
pub async fn collect_multipart(mut payload: Multipart) -> Result<UploadForm, ApiError> {
    let limits = app_config::limits();
    let max_bytes = limits.max_upload_size_mb as usize * 1024 * 1024;

    let mut form = UploadForm::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart payload: {}", e)))?
    {
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let filename = disposition.get_filename().map(|f| f.to_string());

        let mut data: Vec<u8> = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| ApiError::Validation(format!("Malformed multipart payload: {}", e)))?
        {
            if data.len() + chunk.len() > max_bytes {
                return Err(ApiError::Validation(format!(
                    "File exceeds the maximum upload size of {} MB",
                    limits.max_upload_size_mb
                )));
            }
            data.extend_from_slice(&chunk);
        }

        match filename {
            Some(filename) => {
                let mime_type = field.content_type().cloned();
                match name.as_str() {
                    "image" | "images" => {
                        if mime_type.as_ref().map(|m| m.type_()) != Some(mime::IMAGE) {
                            return Err(ApiError::Validation(
                                "Only image files are allowed for image uploads".to_string(),
                            ));
                        }
                        if form.images.len() >= limits.max_image_files {
                            return Err(ApiError::Validation(format!(
                                "At most {} image files are accepted per request",
                                limits.max_image_files
                            )));
                        }
                        form.images.push(UploadedFile { filename, data });
                    }
                    "video" | "videos" => {
                        if mime_type.as_ref().map(|m| m.type_()) != Some(mime::VIDEO) {
                            return Err(ApiError::Validation(
                                "Only video files are allowed for video uploads".to_string(),
                            ));
                        }
                        if form.videos.len() >= limits.max_video_files {
                            return Err(ApiError::Validation(format!(
                                "At most {} video files are accepted per request",
                                limits.max_video_files
                            )));
                        }
                        form.videos.push(UploadedFile { filename, data });
                    }
                    _ => return Err(ApiError::Validation("Invalid field name".to_string())),
                }
            }
            None => {
                let value = String::from_utf8(data)
                    .map_err(|_| ApiError::Validation(format!("Field '{}' is not UTF-8", name)))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

/// Push uploaded files through the storage backend, returning durable URLs
/// in upload order.
pub async fn store_files(
    backend: &dyn StorageBackend,
    files: Vec<UploadedFile>,
    kind: MediaKind,
) -> Result<Vec<String>, ApiError> {
    let mut urls = Vec::with_capacity(files.len());

    for file in files {
        let filename = storage::unique_filename(&file.filename);
        let url = backend.put_object(file.data, &filename, kind).await?;
        urls.push(url);
    }

    Ok(urls)
}

/// Serve a locally stored upload, honoring HTTP Range requests.
#[get("/uploads/{filename}")]
pub async fn serve_upload(
    req: HttpRequest,
    path: web::Path<String>,
    backend: web::Data<dyn StorageBackend>,
) -> Result<impl Responder, ApiError> {
    let filename = path.into_inner();
    let range = req
        .headers()
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let object = backend.get_object(&filename, range).await?;

    let mut builder = if object.content_range.is_some() {
        HttpResponse::PartialContent()
    } else {
        HttpResponse::Ok()
    };

    if let Some(content_type) = object.content_type {
        builder.insert_header((header::CONTENT_TYPE, content_type));
    }
    if let Some(e_tag) = object.e_tag {
        builder.insert_header((header::ETAG, e_tag));
    }
    if let Some(content_range) = object.content_range {
        builder.insert_header((header::CONTENT_RANGE, content_range));
    }
    if let Some(accept_ranges) = object.accept_ranges {
        builder.insert_header((header::ACCEPT_RANGES, accept_ranges));
    }
    if let Some(last_modified) = object.last_modified {
        builder.insert_header((header::LAST_MODIFIED, last_modified));
    }

    Ok(builder.streaming(object.body))
}
