use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parsed frontmatter of a SKILL.md file.
///
/// Open-ended: only `name` and `description` are read when indexing.
pub type Manifest = HashMap<String, serde_yaml_ng::Value>;

/// One entry of the discovery index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub description: String,
}

impl Skill {
    /// Extract a skill summary from a manifest.
    ///
    /// Returns `None` unless both `name` and `description` are non-empty
    /// strings. Values are copied verbatim.
    #[must_use]
    pub fn from_manifest(manifest: &Manifest) -> Option<Self> {
        Some(Self {
            name: non_empty_str(manifest, "name")?.to_string(),
            description: non_empty_str(manifest, "description")?.to_string(),
        })
    }
}

fn non_empty_str<'a>(manifest: &'a Manifest, key: &str) -> Option<&'a str> {
    manifest
        .get(key)
        .and_then(serde_yaml_ng::Value::as_str)
        .filter(|s| !s.is_empty())
}

/// The discovery index document, serialized as `{"skills": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillIndex {
    pub skills: Vec<Skill>,
}

impl SkillIndex {
    /// Serialize the index as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize the index as compact JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.skills.len()
    }
}
