//! Build the `/.well-known/skills/index.json` discovery index.
//!
//! Skills are directories holding a `SKILL.md` whose YAML frontmatter declares
//! a `name` and a `description`. [`build_index`] scans a skills root and
//! returns the valid skills sorted by name, ready to be served as
//! `{"skills": [...]}`.

pub mod collate;
pub mod errors;
pub mod fs_util;
pub mod indexer;
pub mod models;
pub mod parser;

// Re-export key types at crate root for convenience.
pub use collate::{locale_cmp, NameCollator};
pub use errors::{IndexError, Result};
pub use fs_util::{read_if_exists, write_if_changed};
pub use indexer::{
    build_index, build_index_verbose, IndexOptions, IndexReport, IndexWarning, WarningKind,
    DEFAULT_SKILLS_DIR, INDEX_PATH,
};
pub use models::{Manifest, Skill, SkillIndex};
pub use parser::{parse_frontmatter, read_manifest, MANIFEST_FILE};
