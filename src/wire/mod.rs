use serde::{Deserialize, Serialize};

/// ========================================
/// Generation request/result shapes
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    SocialPost,
    VideoScript,
    SeoArticle,
}

impl ContentKind {
    pub fn label(self) -> &'static str {
        match self {
            ContentKind::SocialPost => "Social Media",
            ContentKind::VideoScript => "Video Script",
            ContentKind::SeoArticle => "SEO Content",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPostRequest {
    pub platform: String,
    pub content_type: String,
    pub tone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    pub topic: String,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub additional_context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoScriptRequest {
    pub platform: String,
    pub video_type: String,
    pub duration: String,
    pub style: String,
    pub topic: String,
    #[serde(default)]
    pub additional_context: String,
}

fn default_word_count() -> u32 {
    1500
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoArticleRequest {
    pub content_type: String,
    pub primary_keyword: String,
    #[serde(default)]
    pub secondary_keywords: String,
    #[serde(default = "default_word_count")]
    pub word_count: u32,
    pub search_intent: String,
    #[serde(default)]
    pub additional_context: String,
}

/// One submitted intent to produce content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationRequest {
    SocialPost(SocialPostRequest),
    VideoScript(VideoScriptRequest),
    SeoArticle(SeoArticleRequest),
}

impl GenerationRequest {
    pub fn kind(&self) -> ContentKind {
        match self {
            GenerationRequest::SocialPost(_) => ContentKind::SocialPost,
            GenerationRequest::VideoScript(_) => ContentKind::VideoScript,
            GenerationRequest::SeoArticle(_) => ContentKind::SeoArticle,
        }
    }

    pub fn summary(&self) -> RequestSummary {
        match self {
            GenerationRequest::SocialPost(r) => RequestSummary {
                kind: ContentKind::SocialPost,
                platform: r.platform.clone(),
                label: r.content_type.clone(),
                topic: r.topic.clone(),
            },
            GenerationRequest::VideoScript(r) => RequestSummary {
                kind: ContentKind::VideoScript,
                platform: r.platform.clone(),
                label: r.video_type.clone(),
                topic: r.topic.clone(),
            },
            GenerationRequest::SeoArticle(r) => RequestSummary {
                kind: ContentKind::SeoArticle,
                platform: "Website/Blog".to_string(),
                label: r.content_type.clone(),
                topic: r.primary_keyword.clone(),
            },
        }
    }
}

/// What the history keeps about a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub kind: ContentKind,
    pub platform: String,
    pub label: String,
    pub topic: String,
}

/// Instruction text plus the request it was rendered from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedPrompt {
    text: String,
    request: GenerationRequest,
}

impl ComposedPrompt {
    pub(crate) fn new(text: String, request: GenerationRequest) -> Self {
        Self { text, request }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

/// Bounds passed to the model service on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidCredentials,
    RateLimited,
    TransientServiceError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl std::fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Classified outcome of one call to the model service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    Generated { text: String },
    Failed(GenerationFailure),
}

impl GenerationResult {
    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        GenerationResult::Failed(GenerationFailure { kind, message: message.into() })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            GenerationResult::Generated { text } => Some(text.as_str()),
            GenerationResult::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&GenerationFailure> {
        match self {
            GenerationResult::Generated { .. } => None,
            GenerationResult::Failed(f) => Some(f),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Generated { .. })
    }
}
