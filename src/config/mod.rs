use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::Context;
use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::cli::ProviderKind;
use crate::context::{CompanyContext, CompanyProfile};
use crate::registry::Registry;
use crate::wire::Limits;

pub const DEFAULT_CONFIG_FILE: &str = "content_studio.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    /// Defaults per provider when unset.
    pub model: Option<String>,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub api_base: Option<String>,
    pub anthropic_version: String,
    pub api_key: Option<String>,
    pub out_dir: PathBuf,
    pub registry_path: Option<PathBuf>,
    pub company_file: Option<PathBuf>,
    pub company: Option<CompanyProfile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Anthropic,
            model: None,
            max_tokens: 4096,
            timeout_secs: 120,
            api_base: None,
            anthropic_version: "2023-06-01".into(),
            api_key: None,
            out_dir: PathBuf::from("."),
            registry_path: None,
            company_file: None,
            company: None,
        }
    }
}

impl Config {
    /// Load `path` if given, else `content_studio.toml` in the working
    /// directory when it exists, else defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    tracing::debug!("no config file, using defaults");
                    return Ok(Config::default());
                }
                p
            }
        };
        let src = fs::read_to_string(&path)?;
        let cfg: Config =
            toml::from_str(&src).with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    pub fn limits(&self) -> Limits {
        let model = self
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.provider.default_model());
        Limits { model: model.to_string(), max_tokens: self.max_tokens }
    }

    /// The built-in option table unless `registry_path` points at another.
    pub fn registry(&self) -> anyhow::Result<Cow<'static, Registry>> {
        match &self.registry_path {
            Some(p) => Ok(Cow::Owned(Registry::from_yaml_file(p)?)),
            None => Ok(Cow::Borrowed(Registry::builtin()?)),
        }
    }

    /// Company text file wins over the structured profile; with neither,
    /// the bundled LawTrax knowledge base is used. A profile lacking a name
    /// or description leaves the session unconfigured.
    pub fn company_context(&self) -> anyhow::Result<CompanyContext> {
        if let Some(p) = &self.company_file {
            return CompanyContext::from_file(p);
        }
        Ok(match &self.company {
            Some(profile) if profile.is_complete() => CompanyContext::from_profile(profile),
            Some(_) => {
                tracing::warn!("company profile needs a name and description");
                CompanyContext::unconfigured()
            }
            None => CompanyContext::builtin(),
        })
    }

    /// Resolve the API credential once: config file, then environment.
    pub fn credentials(&self) -> Credentials {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    fn credentials_with(&self, env: impl Fn(&str) -> Option<String>) -> Credentials {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Credentials::new(key);
        }
        let names: &[&str] = match self.provider {
            ProviderKind::Anthropic => &["CLAUDE_API_KEY", "ANTHROPIC_API_KEY"],
            ProviderKind::OpenAI => &["OPENAI_API_KEY"],
        };
        names
            .iter()
            .filter_map(|n| env(n))
            .find(|v| !v.trim().is_empty())
            .map(Credentials::new)
            .unwrap_or_default()
    }
}

/// The API secret for a session. Never printed.
#[derive(Clone, Default)]
pub struct Credentials {
    api_key: Option<String>,
}

impl Credentials {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into().trim().to_string();
        Self { api_key: if key.is_empty() { None } else { Some(key) } }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = if self.api_key.is_some() { "<redacted>" } else { "<unset>" };
        f.debug_struct("Credentials").field("api_key", &shown).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_partial_toml() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
provider = "openai"
model = "gpt-4.1-mini"
out_dir = "exports"

[company]
name = "Acme Legal"
description = "Case software"
"#
        )
        .unwrap();
        let cfg = Config::load(Some(f.path())).unwrap();
        assert!(matches!(cfg.provider, ProviderKind::OpenAI));
        assert_eq!(cfg.limits().model, "gpt-4.1-mini");
        assert_eq!(cfg.max_tokens, 4096);
        assert_eq!(cfg.out_dir, PathBuf::from("exports"));
        assert_eq!(cfg.company_context().unwrap().display_name(), "Acme Legal");
    }

    #[test]
    fn default_model_follows_provider() {
        let cfg = Config::default();
        assert_eq!(cfg.limits().model, "claude-sonnet-4-20250514");

        let cfg = Config { provider: ProviderKind::OpenAI, ..Config::default() };
        assert_eq!(cfg.limits().model, "gpt-4.1-mini");

        let cfg = Config { model: Some("  ".into()), ..Config::default() };
        assert_eq!(cfg.limits().model, "claude-sonnet-4-20250514");
    }

    #[test]
    fn no_company_settings_use_bundled_profile() {
        let ctx = Config::default().company_context().unwrap();
        assert_eq!(ctx.display_name(), "LawTrax");
        assert!(ctx.text().contains("Immigration Software for the Modern Attorney"));
        assert!(!ctx.text().contains("No company profile configured."));
    }

    #[test]
    fn incomplete_profile_is_unconfigured() {
        let cfg = Config {
            company: Some(CompanyProfile { name: "Acme Legal".into(), ..Default::default() }),
            ..Config::default()
        };
        assert_eq!(cfg.company_context().unwrap(), CompanyContext::unconfigured());
    }

    #[test]
    fn config_key_beats_environment() {
        let cfg = Config { api_key: Some("from-file".into()), ..Config::default() };
        let creds = cfg.credentials_with(|_| Some("from-env".into()));
        assert_eq!(creds.api_key(), Some("from-file"));
    }

    #[test]
    fn environment_lookup_order() {
        let cfg = Config::default();
        let creds = cfg.credentials_with(|n| match n {
            "CLAUDE_API_KEY" => Some("  ".into()),
            "ANTHROPIC_API_KEY" => Some("sk-ant".into()),
            _ => None,
        });
        assert_eq!(creds.api_key(), Some("sk-ant"));

        let none = cfg.credentials_with(|_| None);
        assert!(!none.is_set());
    }

    #[test]
    fn debug_never_shows_key() {
        let creds = Credentials::new("sk-secret");
        assert!(!format!("{creds:?}").contains("sk-secret"));
    }
}
