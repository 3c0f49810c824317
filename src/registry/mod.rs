//! Option registry: the enumerable choice dimensions (platform, tone,
//! persona, ...) and the metadata attached to each allowed value.
//!
//! The table is declared in YAML, parsed once and validated before anything
//! can read it. After that it is only ever handed out by shared reference.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::Context;
use fs_err as fs;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{ComposeError, RegistryError};

/// Dimension identifiers the composer reads.
pub mod dims {
    pub const PLATFORM: &str = "platform";
    pub const CONTENT_TYPE: &str = "content_type";
    pub const TONE: &str = "tone";
    pub const PERSONA: &str = "persona";
    pub const VIDEO_PLATFORM: &str = "video_platform";
    pub const VIDEO_TYPE: &str = "video_type";
    pub const VIDEO_DURATION: &str = "video_duration";
    pub const VIDEO_STYLE: &str = "video_style";
    pub const SEO_CONTENT_TYPE: &str = "seo_content_type";
    pub const SEARCH_INTENT: &str = "search_intent";
    pub const WORD_COUNT: &str = "word_count";
}

const BUILTIN_YAML: &str = include_str!("builtin.yaml");

static BUILTIN: OnceCell<Registry> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaKind {
    Number,
    Text,
    List,
}

impl MetaKind {
    fn name(self) -> &'static str {
        match self {
            MetaKind::Number => "a number",
            MetaKind::Text => "text",
            MetaKind::List => "a list of strings",
        }
    }
}

/// Metadata keys every value of a dimension must carry.
const SCHEMA: &[(&str, &[(&str, MetaKind)])] = &[
    (
        dims::PLATFORM,
        &[
            ("max_chars", MetaKind::Number),
            ("hashtag_count", MetaKind::Number),
            ("tone_descriptor", MetaKind::Text),
            ("format", MetaKind::Text),
            ("best_practices", MetaKind::List),
        ],
    ),
    (dims::CONTENT_TYPE, &[("description", MetaKind::Text)]),
    (dims::TONE, &[("tone_descriptor", MetaKind::Text)]),
    (
        dims::PERSONA,
        &[
            ("description", MetaKind::Text),
            ("pain_points", MetaKind::List),
            ("motivators", MetaKind::List),
        ],
    ),
    (
        dims::VIDEO_PLATFORM,
        &[("format", MetaKind::Text), ("hashtag_count", MetaKind::Number)],
    ),
    (dims::VIDEO_TYPE, &[("description", MetaKind::Text)]),
    (dims::VIDEO_DURATION, &[("description", MetaKind::Text)]),
    (dims::VIDEO_STYLE, &[("description", MetaKind::Text)]),
    (dims::SEO_CONTENT_TYPE, &[("description", MetaKind::Text)]),
    (dims::SEARCH_INTENT, &[("description", MetaKind::Text)]),
    (dims::WORD_COUNT, &[("words", MetaKind::Number)]),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Number(i64),
    Text(String),
    List(Vec<String>),
}

impl MetaValue {
    fn kind(&self) -> MetaKind {
        match self {
            MetaValue::Number(_) => MetaKind::Number,
            MetaValue::Text(_) => MetaKind::Text,
            MetaValue::List(_) => MetaKind::List,
        }
    }
}

impl std::fmt::Display for MetaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaValue::Number(n) => write!(f, "{n}"),
            MetaValue::Text(s) => f.write_str(s),
            MetaValue::List(items) => f.write_str(&items.join("; ")),
        }
    }
}

/// Free-form key/value record attached to one option value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, MetaValue>);

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(key)
    }

    pub fn number(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(MetaValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(MetaValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.0.get(key) {
            Some(MetaValue::List(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetaValue)> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionValue {
    #[serde(deserialize_with = "scalar_id")]
    pub id: String,
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// Value ids are text, but hand-written tables often leave numeric ids
/// unquoted (`- id: 500`).
fn scalar_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
    }
    Ok(match Scalar::deserialize(d)? {
        Scalar::Text(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(f) => f.to_string(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimension {
    pub id: String,
    pub label: String,
    pub values: Vec<OptionValue>,
}

impl Dimension {
    fn find(&self, value: &str) -> Option<&OptionValue> {
        self.values.iter().find(|v| v.id == value)
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    dimensions: Vec<Dimension>,
}

/// Platform constraints resolved from a `platform` value.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformSpec {
    pub name: String,
    pub max_chars: i64,
    pub hashtag_count: i64,
    pub tone_descriptor: String,
    pub format: String,
    pub best_practices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonaProfile {
    pub name: String,
    pub description: String,
    pub pain_points: Vec<String>,
    pub motivators: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Registry {
    dimensions: Vec<Dimension>,
}

impl Registry {
    /// The table compiled into the binary, parsed on first use.
    pub fn builtin() -> Result<&'static Registry, RegistryError> {
        BUILTIN.get_or_try_init(|| Registry::from_yaml_str(BUILTIN_YAML))
    }

    pub fn from_yaml_str(src: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_yaml::from_str(src)?;
        let registry = Registry { dimensions: file.dimensions };
        registry.validate()?;
        tracing::debug!(dimensions = registry.dimensions.len(), "option registry loaded");
        Ok(registry)
    }

    pub fn from_yaml_file(path: &Path) -> anyhow::Result<Self> {
        let src = fs::read_to_string(path)?;
        Registry::from_yaml_str(&src)
            .with_context(|| format!("invalid option registry {}", path.display()))
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let mut seen_dims = HashSet::new();
        for dim in &self.dimensions {
            if !seen_dims.insert(dim.id.as_str()) {
                return Err(RegistryError::DuplicateDimension(dim.id.clone()));
            }
            if dim.values.is_empty() {
                return Err(RegistryError::EmptyDimension(dim.id.clone()));
            }
            let required = SCHEMA
                .iter()
                .find(|(id, _)| *id == dim.id)
                .map(|(_, keys)| *keys)
                .unwrap_or(&[]);
            let mut seen_values = HashSet::new();
            for value in &dim.values {
                if value.id.trim().is_empty() {
                    return Err(RegistryError::EmptyValueId { dimension: dim.id.clone() });
                }
                if !seen_values.insert(value.id.as_str()) {
                    return Err(RegistryError::DuplicateValue {
                        dimension: dim.id.clone(),
                        value: value.id.clone(),
                    });
                }
                for (key, kind) in required {
                    match value.metadata.get(key) {
                        None => {
                            return Err(RegistryError::MissingKey {
                                dimension: dim.id.clone(),
                                value: value.id.clone(),
                                key: key.to_string(),
                            })
                        }
                        Some(v) if v.kind() != *kind => {
                            return Err(RegistryError::WrongType {
                                dimension: dim.id.clone(),
                                value: value.id.clone(),
                                key: key.to_string(),
                                expected: kind.name(),
                            })
                        }
                        Some(_) => {}
                    }
                }
            }
        }
        for (id, _) in SCHEMA {
            if !seen_dims.contains(id) {
                return Err(RegistryError::MissingDimension(id.to_string()));
            }
        }
        Ok(())
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension(&self, dimension: &str) -> Result<&Dimension, ComposeError> {
        self.dimensions
            .iter()
            .find(|d| d.id == dimension)
            .ok_or_else(|| ComposeError::UnknownDimension(dimension.to_string()))
    }

    /// Allowed value ids of a dimension, in declaration order.
    pub fn list_values(&self, dimension: &str) -> Result<Vec<&str>, ComposeError> {
        let dim = self.dimension(dimension)?;
        Ok(dim.values.iter().map(|v| v.id.as_str()).collect())
    }

    pub fn get_metadata(&self, dimension: &str, value: &str) -> Result<&Metadata, ComposeError> {
        let dim = self.dimension(dimension)?;
        dim.find(value)
            .map(|v| &v.metadata)
            .ok_or_else(|| ComposeError::UnknownValue {
                dimension: dimension.to_string(),
                value: value.to_string(),
            })
    }

    /// Text metadata field of a value. Keys covered by the load-time schema
    /// are always present; anything else falls back to an empty string.
    pub fn text(&self, dimension: &str, value: &str, key: &str) -> Result<String, ComposeError> {
        let meta = self.get_metadata(dimension, value)?;
        Ok(meta.text(key).unwrap_or_default().to_string())
    }

    pub fn platform(&self, dimension: &str, value: &str) -> Result<PlatformSpec, ComposeError> {
        let meta = self.get_metadata(dimension, value)?;
        Ok(PlatformSpec {
            name: value.to_string(),
            max_chars: meta.number("max_chars").unwrap_or_default(),
            hashtag_count: meta.number("hashtag_count").unwrap_or_default(),
            tone_descriptor: meta.text("tone_descriptor").unwrap_or_default().to_string(),
            format: meta.text("format").unwrap_or_default().to_string(),
            best_practices: meta.list("best_practices").map(<[String]>::to_vec).unwrap_or_default(),
        })
    }

    pub fn persona(&self, value: &str) -> Result<PersonaProfile, ComposeError> {
        let meta = self.get_metadata(dims::PERSONA, value)?;
        Ok(PersonaProfile {
            name: value.to_string(),
            description: meta.text("description").unwrap_or_default().to_string(),
            pain_points: meta.list("pain_points").map(<[String]>::to_vec).unwrap_or_default(),
            motivators: meta.list("motivators").map(<[String]>::to_vec).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_loads() {
        let reg = Registry::builtin().unwrap();
        let platforms = reg.list_values(dims::PLATFORM).unwrap();
        assert_eq!(
            platforms,
            vec!["LinkedIn", "Instagram", "TikTok", "YouTube", "Twitter/X", "Facebook"]
        );
        let li = reg.platform(dims::PLATFORM, "LinkedIn").unwrap();
        assert_eq!(li.max_chars, 3000);
        assert_eq!(li.hashtag_count, 3);
        assert_eq!(li.best_practices.len(), 6);
    }

    #[test]
    fn word_counts_are_numbers() {
        let reg = Registry::builtin().unwrap();
        let meta = reg.get_metadata(dims::WORD_COUNT, "1500").unwrap();
        assert_eq!(meta.number("words"), Some(1500));
    }

    #[test]
    fn unknown_dimension_and_value() {
        let reg = Registry::builtin().unwrap();
        assert_eq!(
            reg.list_values("mood").unwrap_err(),
            ComposeError::UnknownDimension("mood".into())
        );
        assert_eq!(
            reg.get_metadata(dims::PLATFORM, "MySpace").unwrap_err(),
            ComposeError::UnknownValue { dimension: "platform".into(), value: "MySpace".into() }
        );
        assert!(matches!(
            reg.get_metadata("mood", "happy").unwrap_err(),
            ComposeError::UnknownDimension(_)
        ));
    }

    fn swap_platform_block(replacement: &str) -> String {
        // Replace the whole LinkedIn entry with a caller-supplied one.
        let start = BUILTIN_YAML.find("      - id: LinkedIn").unwrap();
        let end = BUILTIN_YAML.find("      - id: Instagram").unwrap();
        format!("{}{}{}", &BUILTIN_YAML[..start], replacement, &BUILTIN_YAML[end..])
    }

    #[test]
    fn rejects_value_missing_required_key() {
        let src = swap_platform_block(
            "      - id: LinkedIn\n        max_chars: 3000\n        tone_descriptor: x\n        format: y\n        best_practices: [a]\n",
        );
        match Registry::from_yaml_str(&src).unwrap_err() {
            RegistryError::MissingKey { dimension, value, key } => {
                assert_eq!(dimension, "platform");
                assert_eq!(value, "LinkedIn");
                assert_eq!(key, "hashtag_count");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_wrong_metadata_type() {
        let src = swap_platform_block(
            "      - id: LinkedIn\n        max_chars: lots\n        hashtag_count: 3\n        tone_descriptor: x\n        format: y\n        best_practices: [a]\n",
        );
        assert!(matches!(
            Registry::from_yaml_str(&src).unwrap_err(),
            RegistryError::WrongType { .. }
        ));
    }

    #[test]
    fn rejects_duplicate_values() {
        let src = BUILTIN_YAML.replace("      - id: Facebook\n", "      - id: TikTok\n");
        assert!(matches!(
            Registry::from_yaml_str(&src).unwrap_err(),
            RegistryError::DuplicateValue { .. }
        ));
    }

    #[test]
    fn unquoted_numeric_ids_are_text() {
        let src = BUILTIN_YAML.replace(r#"{ id: "750", words: 750 }"#, "{ id: 750, words: 750 }");
        assert!(src != BUILTIN_YAML);
        let reg = Registry::from_yaml_str(&src).unwrap();
        let meta = reg.get_metadata(dims::WORD_COUNT, "750").unwrap();
        assert_eq!(meta.number("words"), Some(750));
    }

    #[test]
    fn rejects_missing_dimension() {
        let src = "dimensions:\n  - id: tone\n    label: Tone\n    values:\n      - id: Friendly\n        tone_descriptor: warm\n";
        assert!(matches!(
            Registry::from_yaml_str(src).unwrap_err(),
            RegistryError::MissingDimension(_)
        ));
    }
}
