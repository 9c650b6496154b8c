//! Discovery index generation.
//!
//! Scans the immediate subdirectories of a skills root, reads each
//! `SKILL.md`, keeps the entries whose frontmatter declares a `name` and a
//! `description`, and sorts the result by name. One bad skill never aborts
//! the scan: only a failure to list the root itself is returned as an error.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::collate::NameCollator;
use crate::errors::{IndexError, Result};
use crate::fs_util::is_not_found;
use crate::models::{Skill, SkillIndex};
use crate::parser::read_manifest;

/// Conventional URL path at which the index is served.
pub const INDEX_PATH: &str = "/.well-known/skills/index.json";

/// Conventional on-disk location of the skills root, relative to a site root.
pub const DEFAULT_SKILLS_DIR: &str = "public/.well-known/skills";

/// Options for index generation.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Exclude skills whose declared `name` differs from their directory name.
    pub require_dir_name_match: bool,
}

/// Why a skill directory was left out of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// `SKILL.md` exists but could not be read.
    Unreadable,
    /// `SKILL.md` frontmatter could not be parsed.
    Malformed,
    /// `name` or `description` is missing, empty, or not a string.
    MissingFields,
    /// `name` differs from the directory name.
    NameMismatch,
}

/// A skill directory skipped during index generation.
#[derive(Debug, Clone)]
pub struct IndexWarning {
    /// The skill directory that caused the warning.
    pub dir: PathBuf,
    pub kind: WarningKind,
    /// Human-readable description of the issue.
    pub message: String,
}

impl fmt::Display for IndexWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.dir.display(), self.message)
    }
}

/// The index together with the entries that were skipped.
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    pub index: SkillIndex,
    pub warnings: Vec<IndexWarning>,
}

/// Build the discovery index for the skills under `root`.
///
/// A missing `root` yields an empty index.
///
/// # Errors
///
/// Returns [`IndexError::Enumerate`] if `root` exists but cannot be listed.
pub fn build_index(root: &Path) -> Result<SkillIndex> {
    build_index_verbose(root, &IndexOptions::default()).map(|report| report.index)
}

/// Build the discovery index, also returning a warning for every skipped
/// skill directory.
///
/// # Errors
///
/// Returns [`IndexError::Enumerate`] if `root` exists but cannot be listed.
pub fn build_index_verbose(root: &Path, opts: &IndexOptions) -> Result<IndexReport> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if is_not_found(&e) => {
            tracing::debug!(root = %root.display(), "skills root does not exist");
            return Ok(IndexReport::default());
        }
        Err(source) => {
            return Err(IndexError::Enumerate {
                path: root.to_path_buf(),
                source,
            })
        }
    };
    let dirs = skill_dirs(entries).map_err(|source| IndexError::Enumerate {
        path: root.to_path_buf(),
        source,
    })?;

    let mut skills = Vec::with_capacity(dirs.len());
    let mut warnings = Vec::new();
    for dir in &dirs {
        match index_entry(dir, opts) {
            Ok(Some(skill)) => skills.push(skill),
            Ok(None) => {}
            Err(warning) => {
                tracing::warn!(
                    dir = %warning.dir.display(),
                    kind = ?warning.kind,
                    error = %warning.message,
                    "skipping skill"
                );
                warnings.push(warning);
            }
        }
    }

    let collator = NameCollator::new();
    skills.sort_by(|a, b| collator.compare(&a.name, &b.name));
    tracing::debug!(
        root = %root.display(),
        indexed = skills.len(),
        skipped = warnings.len(),
        "built skills index"
    );

    Ok(IndexReport {
        index: SkillIndex { skills },
        warnings,
    })
}

/// Keep the subdirectories of a root listing.
///
/// Uses the entry's own file type, so symlinks are not followed.
fn skill_dirs(entries: std::fs::ReadDir) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

/// Read one skill directory.
///
/// `Ok(None)` means the directory has no `SKILL.md` and is skipped silently.
fn index_entry(dir: &Path, opts: &IndexOptions) -> std::result::Result<Option<Skill>, IndexWarning> {
    let warn = |kind: WarningKind, message: String| IndexWarning {
        dir: dir.to_path_buf(),
        kind,
        message,
    };

    let manifest = match read_manifest(dir) {
        Ok(m) => m,
        Err(IndexError::Io(e)) if is_not_found(&e) => {
            tracing::debug!(dir = %dir.display(), "no SKILL.md, skipping");
            return Ok(None);
        }
        Err(IndexError::Io(e)) => {
            return Err(warn(
                WarningKind::Unreadable,
                format!("failed to read SKILL.md: {e}"),
            ))
        }
        Err(e) => {
            return Err(warn(
                WarningKind::Malformed,
                format!("failed to parse SKILL.md: {e}"),
            ))
        }
    };

    let skill = Skill::from_manifest(&manifest).ok_or_else(|| {
        warn(
            WarningKind::MissingFields,
            "missing required frontmatter (name/description)".into(),
        )
    })?;

    if opts.require_dir_name_match {
        let dir_name = dir.file_name().map(|n| n.to_string_lossy());
        if dir_name.as_deref() != Some(skill.name.as_str()) {
            return Err(warn(
                WarningKind::NameMismatch,
                format!(
                    "name '{}' does not match directory name '{}'",
                    skill.name,
                    dir_name.unwrap_or_default()
                ),
            ));
        }
    }

    Ok(Some(skill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn skill_md(name: &str, description: &str) -> String {
        format!("---\nname: {name}\ndescription: {description}\n---\n# {name}\n")
    }

    /// Create `<root>/<dir>/SKILL.md` with the given content.
    fn add_skill(root: &Path, dir: &str, content: &str) {
        let d = root.join(dir);
        fs::create_dir_all(&d).unwrap();
        fs::write(d.join("SKILL.md"), content).unwrap();
    }

    fn names(index: &SkillIndex) -> Vec<&str> {
        index.skills.iter().map(|s| s.name.as_str()).collect()
    }

    fn root_with_two_skills() -> TempDir {
        let root = tempdir().unwrap();
        add_skill(root.path(), "a", &skill_md("Bravo", "B"));
        add_skill(root.path(), "b", &skill_md("Alpha", "A"));
        root
    }

    #[test]
    fn sorts_by_name_not_directory() {
        let root = root_with_two_skills();
        let index = build_index(root.path()).unwrap();
        assert_eq!(
            index.skills,
            vec![
                Skill {
                    name: "Alpha".into(),
                    description: "A".into()
                },
                Skill {
                    name: "Bravo".into(),
                    description: "B".into()
                },
            ]
        );
    }

    #[test]
    fn directory_without_manifest_is_skipped_silently() {
        let root = root_with_two_skills();
        fs::create_dir(root.path().join("c")).unwrap();
        let report = build_index_verbose(root.path(), &IndexOptions::default()).unwrap();
        assert_eq!(names(&report.index), vec!["Alpha", "Bravo"]);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn missing_root_is_empty_index() {
        let root = tempdir().unwrap();
        let index = build_index(&root.path().join("does-not-exist")).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.to_json().unwrap(), r#"{"skills":[]}"#);
    }

    #[test]
    fn empty_root_is_empty_index() {
        let root = tempdir().unwrap();
        assert!(build_index(root.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_description_is_excluded_with_warning() {
        let root = root_with_two_skills();
        add_skill(root.path(), "d", "---\nname: Delta\n---\n");
        let report = build_index_verbose(root.path(), &IndexOptions::default()).unwrap();
        assert_eq!(names(&report.index), vec!["Alpha", "Bravo"]);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, WarningKind::MissingFields);
        assert!(report.warnings[0].dir.ends_with("d"));
    }

    #[test]
    fn falsy_fields_are_excluded() {
        let root = tempdir().unwrap();
        add_skill(root.path(), "empty", "---\nname: ''\ndescription: x\n---\n");
        add_skill(root.path(), "null", "---\nname: x\ndescription: null\n---\n");
        add_skill(root.path(), "number", "---\nname: 7\ndescription: x\n---\n");
        add_skill(root.path(), "none", "# no frontmatter\n");
        let report = build_index_verbose(root.path(), &IndexOptions::default()).unwrap();
        assert!(report.index.is_empty());
        assert_eq!(report.warnings.len(), 4);
        assert!(report
            .warnings
            .iter()
            .all(|w| w.kind == WarningKind::MissingFields));
    }

    #[test]
    fn malformed_frontmatter_is_skipped_with_warning() {
        let root = root_with_two_skills();
        add_skill(root.path(), "bad", "---\nname: [oops\n---\n");
        add_skill(root.path(), "toml", "---toml\nname = \"x\"\n---\n");
        let report = build_index_verbose(root.path(), &IndexOptions::default()).unwrap();
        assert_eq!(names(&report.index), vec!["Alpha", "Bravo"]);
        assert_eq!(report.warnings.len(), 2);
        assert!(report
            .warnings
            .iter()
            .all(|w| w.kind == WarningKind::Malformed));
    }

    #[test]
    fn unclosed_frontmatter_is_indexed() {
        let root = root_with_two_skills();
        add_skill(root.path(), "x", "---\nname: Open\ndescription: no closer\n");
        let report = build_index_verbose(root.path(), &IndexOptions::default()).unwrap();
        assert_eq!(names(&report.index), vec!["Alpha", "Bravo", "Open"]);
        assert_eq!(report.index.skills[2].description, "no closer");
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn invalid_utf8_in_body_is_indexed() {
        let root = root_with_two_skills();
        let dir = root.path().join("latin1");
        fs::create_dir(&dir).unwrap();
        let mut bytes = b"---\nname: Latin\ndescription: ok\n---\nCaf".to_vec();
        bytes.extend_from_slice(&[0xe9, b'\n']);
        fs::write(dir.join("SKILL.md"), bytes).unwrap();

        let report = build_index_verbose(root.path(), &IndexOptions::default()).unwrap();
        assert_eq!(names(&report.index), vec!["Alpha", "Bravo", "Latin"]);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn unreadable_manifest_is_skipped_with_warning() {
        let root = root_with_two_skills();
        // A directory named SKILL.md cannot be read as a file.
        fs::create_dir_all(root.path().join("weird/SKILL.md")).unwrap();

        let report = build_index_verbose(root.path(), &IndexOptions::default()).unwrap();
        assert_eq!(names(&report.index), vec!["Alpha", "Bravo"]);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, WarningKind::Unreadable);
        assert!(report.warnings[0].dir.ends_with("weird"));
    }

    #[test]
    fn stray_files_in_root_are_ignored() {
        let root = root_with_two_skills();
        fs::write(root.path().join("README.md"), "hello").unwrap();
        fs::write(root.path().join("SKILL.md"), skill_md("Root", "R")).unwrap();
        let report = build_index_verbose(root.path(), &IndexOptions::default()).unwrap();
        assert_eq!(names(&report.index), vec!["Alpha", "Bravo"]);
        assert!(report.warnings.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let outside = tempdir().unwrap();
        add_skill(outside.path(), "ext", &skill_md("External", "E"));
        let root = root_with_two_skills();
        std::os::unix::fs::symlink(outside.path().join("ext"), root.path().join("link"))
            .unwrap();
        let index = build_index(root.path()).unwrap();
        assert_eq!(names(&index), vec!["Alpha", "Bravo"]);
    }

    #[test]
    fn nested_skills_are_not_scanned() {
        let root = tempdir().unwrap();
        add_skill(root.path(), "group/inner", &skill_md("Inner", "I"));
        assert!(build_index(root.path()).unwrap().is_empty());
    }

    #[test]
    fn root_that_is_a_file_is_an_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("skills");
        fs::write(&file, "not a dir").unwrap();
        let err = build_index(&file).unwrap_err();
        assert!(matches!(err, IndexError::Enumerate { .. }), "{err}");
    }

    #[test]
    fn values_are_copied_verbatim() {
        let root = tempdir().unwrap();
        add_skill(
            root.path(),
            "x",
            "---\nname: \"  MiXeD <b>case</b> \"\ndescription: \"Line one\\nLine two\"\n---\n",
        );
        let index = build_index(root.path()).unwrap();
        assert_eq!(index.skills[0].name, "  MiXeD <b>case</b> ");
        assert_eq!(index.skills[0].description, "Line one\nLine two");
    }

    #[test]
    fn locale_aware_ordering() {
        let root = tempdir().unwrap();
        add_skill(root.path(), "1", &skill_md("zeta", "z"));
        add_skill(root.path(), "2", &skill_md("Éclair", "e"));
        add_skill(root.path(), "3", &skill_md("apple", "a"));
        add_skill(root.path(), "4", &skill_md("Banana", "b"));
        add_skill(root.path(), "5", &skill_md("Łódź", "l"));
        add_skill(root.path(), "6", &skill_md("Madrid", "m"));
        let index = build_index(root.path()).unwrap();
        assert_eq!(
            names(&index),
            vec!["apple", "Banana", "Éclair", "Łódź", "Madrid", "zeta"]
        );
    }

    #[test]
    fn duplicate_names_are_both_kept() {
        let root = tempdir().unwrap();
        add_skill(root.path(), "one", &skill_md("same", "first"));
        add_skill(root.path(), "two", &skill_md("same", "second"));
        let index = build_index(root.path()).unwrap();
        assert_eq!(names(&index), vec!["same", "same"]);
    }

    #[test]
    fn dir_name_is_not_checked_by_default() {
        let root = root_with_two_skills();
        let report = build_index_verbose(root.path(), &IndexOptions::default()).unwrap();
        assert_eq!(report.index.len(), 2);
    }

    #[test]
    fn dir_name_mismatch_excluded_when_required() {
        let root = root_with_two_skills();
        add_skill(root.path(), "gamma", &skill_md("gamma", "G"));
        let opts = IndexOptions {
            require_dir_name_match: true,
        };
        let report = build_index_verbose(root.path(), &opts).unwrap();
        assert_eq!(names(&report.index), vec!["gamma"]);
        assert_eq!(report.warnings.len(), 2);
        assert!(report
            .warnings
            .iter()
            .all(|w| w.kind == WarningKind::NameMismatch));
        assert!(report.warnings[0].message.contains("does not match"));
    }

    #[test]
    fn idempotent_on_unchanged_tree() {
        let root = root_with_two_skills();
        add_skill(root.path(), "bad", "---\nname: x\n---\n");
        let first = build_index(root.path()).unwrap();
        let second = build_index(root.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn warning_display_names_directory() {
        let w = IndexWarning {
            dir: PathBuf::from("skills/broken"),
            kind: WarningKind::Malformed,
            message: "failed to parse SKILL.md".into(),
        };
        assert_eq!(w.to_string(), "skills/broken: failed to parse SKILL.md");
    }
}
