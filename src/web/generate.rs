use super::error::ApiError;
use super::uploads::collect_multipart;
use crate::generator::ContentGenerator;
use crate::middleware::ClientCtx;
use actix_multipart::Multipart;
use actix_web::{post, web, Responder};
use serde::Serialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(generate_content);
}

#[derive(Serialize)]
pub struct GeneratedJson {
    pub content: String,
    pub excerpt: String,
}

/// AI-assisted content fill for the post editor: a headline and an optional
/// context image in, draft content and an excerpt out. The result is
/// consumed identically to manually authored text.
#[post("/api/generate-content")]
pub async fn generate_content(
    client: ClientCtx,
    payload: Multipart,
    generator: web::Data<dyn ContentGenerator>,
) -> Result<impl Responder, ApiError> {
    client.require_approved_author()?;

    let form = collect_multipart(payload).await?;
    let headline = form
        .text("headline")
        .ok_or_else(|| ApiError::Validation("Headline is required".to_string()))?;

    let image = form.images.first().map(|file| file.data.as_slice());
    let generated = generator.generate(&headline, image).await?;

    Ok(web::Json(GeneratedJson {
        content: generated.content,
        excerpt: generated.excerpt,
    }))
}
