use std::path::Path;

use serde_yaml_ng::Value;

use crate::errors::{IndexError, Result};
use crate::models::Manifest;

/// File name of the skill manifest inside a skill directory.
pub const MANIFEST_FILE: &str = "SKILL.md";

const DELIMITER: &str = "---";

/// Extract the frontmatter block delimited by `---`.
///
/// Returns `(manifest, body_text)`. Follows gray-matter's rules:
/// - a document that does not start with `---` (or starts with `----`) has no
///   frontmatter: the manifest is empty and the whole text is the body;
/// - text after the opening `---` on the same line names the block language
///   (`yaml`, `yml` or `json`; empty means YAML);
/// - the block ends at the first line starting with `---`, or at end of
///   file when there is no such line.
///
/// # Errors
///
/// Returns [`IndexError::Parse`] for an unsupported language or a block that
/// is not a mapping, and [`IndexError::Yaml`] / [`IndexError::Json`] on
/// invalid syntax.
pub fn parse_frontmatter(content: &str) -> Result<(Manifest, String)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(rest) = content
        .strip_prefix(DELIMITER)
        .filter(|rest| !rest.starts_with('-'))
    else {
        return Ok((Manifest::new(), content.to_string()));
    };

    let (language, rest) = match rest.find('\n') {
        Some(pos) => (rest[..pos].trim(), &rest[pos..]),
        None => (rest.trim(), ""),
    };

    let close = format!("\n{DELIMITER}");
    let (block, body) = match rest.find(&close) {
        Some(pos) => {
            let after = &rest[pos + close.len()..];
            let after = after.strip_prefix('\r').unwrap_or(after);
            (&rest[..pos], after.strip_prefix('\n').unwrap_or(after))
        }
        None => (rest, ""),
    };

    Ok((parse_block(language, block)?, body.to_string()))
}

fn parse_block(language: &str, block: &str) -> Result<Manifest> {
    match language.to_ascii_lowercase().as_str() {
        "" | "yaml" | "yml" => parse_mapping(block),
        "json" => parse_json(block),
        other => Err(IndexError::Parse {
            message: format!("unsupported frontmatter language '{other}'"),
        }),
    }
}

/// Parse a YAML block into a manifest. Non-string keys are dropped.
fn parse_mapping(yaml: &str) -> Result<Manifest> {
    if yaml.trim().is_empty() {
        return Ok(Manifest::new());
    }
    match serde_yaml_ng::from_str::<Value>(yaml)? {
        Value::Null => Ok(Manifest::new()),
        Value::Mapping(map) => Ok(map
            .into_iter()
            .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), v)))
            .collect()),
        _ => Err(IndexError::Parse {
            message: "frontmatter must be a YAML mapping".into(),
        }),
    }
}

fn parse_json(json: &str) -> Result<Manifest> {
    if json.trim().is_empty() {
        return Ok(Manifest::new());
    }
    match serde_json::from_str::<serde_json::Value>(json)? {
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| -> Result<(String, Value)> { Ok((k, serde_yaml_ng::to_value(v)?)) })
            .collect(),
        _ => Err(IndexError::Parse {
            message: "frontmatter must be a JSON object".into(),
        }),
    }
}

/// Read and parse the manifest of a skill directory.
///
/// Invalid UTF-8 is replaced with U+FFFD rather than rejected. I/O errors are
/// returned unchanged so callers can tell a missing `SKILL.md` (`NotFound`)
/// from other failures.
pub fn read_manifest(dir: &Path) -> Result<Manifest> {
    let bytes = std::fs::read(dir.join(MANIFEST_FILE))?;
    let (manifest, _body) = parse_frontmatter(&String::from_utf8_lossy(&bytes))?;
    Ok(manifest)
}
