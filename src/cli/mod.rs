use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::wire::{GenerationRequest, SeoArticleRequest, SocialPostRequest, VideoScriptRequest};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "claude")]
    Anthropic,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
}

impl ProviderKind {
    /// Model used when neither the config file nor `--model` names one.
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "claude-sonnet-4-20250514",
            ProviderKind::OpenAI => "gpt-4.1-mini",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "content_studio", version, about = "Compose marketing content prompts and generate them with a hosted LLM")]
pub struct Args {
    /// TOML config file (default: ./content_studio.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API key for this session; replaces the configured one
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    #[arg(long, value_enum, global = true)]
    pub provider: Option<ProviderKind>,

    #[arg(long, global = true)]
    pub model: Option<String>,

    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,

    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Directory for exported text files
    #[arg(long, global = true)]
    pub out_dir: Option<PathBuf>,

    /// Plain-text company knowledge base used as brand context
    #[arg(long, global = true)]
    pub company_file: Option<PathBuf>,

    /// Write each successful result to a text file
    #[arg(long, default_value_t = false, global = true)]
    pub save: bool,

    /// Write the session history to a text file before exiting
    #[arg(long, default_value_t = false, global = true)]
    pub export_history: bool,

    /// Print the composed prompt and stop; no API call
    #[arg(long, default_value_t = false, global = true)]
    pub prompt_only: bool,

    #[arg(long, default_value_t = false, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Social media post
    Social(SocialArgs),
    /// Video script
    Video(VideoArgs),
    /// SEO article or page
    Seo(SeoArgs),
    /// Run every request in a YAML file within one session
    Batch { file: PathBuf },
    /// List option dimensions, or the values of one dimension
    Options { dimension: Option<String> },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SocialArgs {
    #[arg(long)]
    pub topic: String,
    #[arg(long, default_value = "LinkedIn")]
    pub platform: String,
    #[arg(long, default_value = "Educational Post")]
    pub content_type: String,
    #[arg(long, default_value = "Professional")]
    pub tone: String,
    #[arg(long)]
    pub persona: Option<String>,
    #[arg(long, default_value = "")]
    pub audience: String,
    #[arg(long, default_value = "")]
    pub context: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct VideoArgs {
    #[arg(long)]
    pub topic: String,
    #[arg(long, default_value = "TikTok")]
    pub platform: String,
    #[arg(long, default_value = "Product Demo")]
    pub video_type: String,
    #[arg(long, default_value = "60 seconds")]
    pub duration: String,
    #[arg(long, default_value = "Talking Head")]
    pub style: String,
    #[arg(long, default_value = "")]
    pub context: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SeoArgs {
    #[arg(long)]
    pub keyword: String,
    #[arg(long, default_value = "")]
    pub secondary_keywords: String,
    #[arg(long, default_value = "Blog Post")]
    pub content_type: String,
    #[arg(long, default_value_t = 1500)]
    pub word_count: u32,
    #[arg(long, default_value = "Informational")]
    pub search_intent: String,
    #[arg(long, default_value = "")]
    pub context: String,
}

impl From<SocialArgs> for GenerationRequest {
    fn from(a: SocialArgs) -> Self {
        GenerationRequest::SocialPost(SocialPostRequest {
            platform: a.platform,
            content_type: a.content_type,
            tone: a.tone,
            persona: a.persona,
            topic: a.topic,
            audience: a.audience,
            additional_context: a.context,
        })
    }
}

impl From<VideoArgs> for GenerationRequest {
    fn from(a: VideoArgs) -> Self {
        GenerationRequest::VideoScript(VideoScriptRequest {
            platform: a.platform,
            video_type: a.video_type,
            duration: a.duration,
            style: a.style,
            topic: a.topic,
            additional_context: a.context,
        })
    }
}

impl From<SeoArgs> for GenerationRequest {
    fn from(a: SeoArgs) -> Self {
        GenerationRequest::SeoArticle(SeoArticleRequest {
            content_type: a.content_type,
            primary_keyword: a.keyword,
            secondary_keywords: a.secondary_keywords,
            word_count: a.word_count,
            search_intent: a.search_intent,
            additional_context: a.context,
        })
    }
}

impl Args {
    /// Flags win over the config file.
    pub fn apply_to(&self, cfg: &mut Config) {
        if let Some(p) = self.provider {
            cfg.provider = p;
        }
        if let Some(m) = &self.model {
            cfg.model = Some(m.clone());
        }
        if let Some(n) = self.max_tokens {
            cfg.max_tokens = n;
        }
        if let Some(t) = self.timeout_secs {
            cfg.timeout_secs = t;
        }
        if let Some(d) = &self.out_dir {
            cfg.out_dir = d.clone();
        }
        if let Some(f) = &self.company_file {
            cfg.company_file = Some(f.clone());
        }
    }

    /// Requests named on the command line; `None` for `options`.
    pub fn requests(&self) -> anyhow::Result<Option<Vec<GenerationRequest>>> {
        Ok(match &self.command {
            Command::Social(a) => Some(vec![a.clone().into()]),
            Command::Video(a) => Some(vec![a.clone().into()]),
            Command::Seo(a) => Some(vec![a.clone().into()]),
            Command::Batch { file } => Some(load_batch(file)?),
            Command::Options { .. } => None,
        })
    }
}

/// A batch file is a YAML (or JSON) list of requests tagged by `kind`.
pub fn load_batch(path: &Path) -> anyhow::Result<Vec<GenerationRequest>> {
    let src = fs::read_to_string(path)?;
    serde_yaml::from_str(&src).with_context(|| format!("invalid batch file {}", path.display()))
}
