use std::path::Path;

use anyhow::Context;
use fs_err as fs;
use serde::{Deserialize, Serialize};

/// Structured company profile, rendered into the brand block of a prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    #[serde(default)]
    pub website: String,
    pub description: String,
    #[serde(default)]
    pub target_market: String,
    #[serde(default)]
    pub features: String,
}

impl CompanyProfile {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.description.trim().is_empty()
    }
}

const LAWTRAX_KNOWLEDGE: &str = include_str!("lawtrax.txt");

/// The brand/company text a prompt is written for. Opaque to the composer.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyContext {
    display_name: String,
    text: String,
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() {
        "N/A"
    } else {
        s
    }
}

impl CompanyContext {
    pub fn from_profile(p: &CompanyProfile) -> Self {
        let text = format!(
            "COMPANY: {}\nWEBSITE: {}\nDESCRIPTION: {}\nTARGET MARKET: {}\nKEY FEATURES: {}",
            or_na(&p.name),
            or_na(&p.website),
            or_na(&p.description),
            or_na(&p.target_market),
            or_na(&p.features),
        );
        let display_name = if p.name.trim().is_empty() { "Your Company" } else { p.name.trim() };
        Self { display_name: display_name.to_string(), text }
    }

    /// Free-form knowledge base kept in a text file. The first `COMPANY:`
    /// line, if any, names the company.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let display_name = text
            .lines()
            .find_map(|l| l.trim().strip_prefix("COMPANY:"))
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Your Company".to_string());
        Self { display_name, text: text.trim().to_string() }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading company file {}", path.display()))?;
        Ok(Self::from_text(text))
    }

    /// LawTrax knowledge base shipped with the binary.
    pub fn builtin() -> Self {
        Self::from_text(LAWTRAX_KNOWLEDGE)
    }

    pub fn unconfigured() -> Self {
        Self {
            display_name: "Your Company".to_string(),
            text: "No company profile configured.".to_string(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
