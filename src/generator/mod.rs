//! AI-assisted content generation.
//!
//! The application treats generated text as an opaque source consumed
//! exactly like manually authored content; whether a post actually used it
//! is caller-asserted via the `is_ai_generated` flag and never verified.

pub mod template;

pub use template::TemplateGenerator;

use async_trait::async_trait;

/// What a generator produces for a headline.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedContent {
    pub content: String,
    pub excerpt: String,
}

/// Generation failures. Always terminal for the triggering request; nothing
/// is retried or queued.
#[derive(Debug)]
pub enum GeneratorError {
    Failed(String),
}

impl std::fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorError::Failed(msg) => write!(f, "Failed to generate content: {}", msg),
        }
    }
}

impl std::error::Error for GeneratorError {}

/// Trait for content generators.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Produce blog content and an excerpt for a headline. An uploaded image
    /// may be supplied as additional context.
    async fn generate(
        &self,
        headline: &str,
        image: Option<&[u8]>,
    ) -> Result<GeneratedContent, GeneratorError>;
}
