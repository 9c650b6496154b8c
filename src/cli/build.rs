use std::path::{Path, PathBuf};

use similar::TextDiff;
use skills_index::{IndexOptions, SkillIndex};

pub(crate) struct BuildArgs {
    pub(crate) root: PathBuf,
    pub(crate) format: super::Format,
    pub(crate) compact: bool,
    pub(crate) output: Option<PathBuf>,
    pub(crate) check: bool,
    pub(crate) require_dir_name_match: bool,
    pub(crate) deny_warnings: bool,
}

pub(crate) fn run(args: BuildArgs) {
    let opts = IndexOptions {
        require_dir_name_match: args.require_dir_name_match,
    };
    let report = skills_index::build_index_verbose(&args.root, &opts).unwrap_or_else(|e| {
        eprintln!("skills-index: {e}");
        std::process::exit(1);
    });

    let content = render(&report.index, args.format, args.compact).unwrap_or_else(|e| {
        eprintln!("skills-index: {e}");
        std::process::exit(1);
    });

    match &args.output {
        Some(path) if args.check => {
            if !check_output(path, &content) {
                std::process::exit(1);
            }
        }
        Some(path) => match skills_index::write_if_changed(path, &content) {
            Ok(true) => eprintln!("Updated {}", path.display()),
            Ok(false) => eprintln!("Unchanged {}", path.display()),
            Err(e) => {
                eprintln!("skills-index: failed to write {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => print!("{content}"),
    }

    if args.deny_warnings && !report.warnings.is_empty() {
        eprintln!(
            "skills-index: {} skill director{} skipped",
            report.warnings.len(),
            if report.warnings.len() == 1 { "y" } else { "ies" }
        );
        std::process::exit(1);
    }
}

/// Render the index in the requested format, newline-terminated.
fn render(index: &SkillIndex, format: super::Format, compact: bool) -> skills_index::Result<String> {
    let mut out = match format {
        super::Format::Json if compact => index.to_json()?,
        super::Format::Json => index.to_json_pretty()?,
        super::Format::Text => {
            return Ok(index
                .skills
                .iter()
                .map(|s| format!("{}: {}\n", s.name, s.description))
                .collect())
        }
    };
    out.push('\n');
    Ok(out)
}

/// Compare `content` with the file at `path`, printing a diff when stale.
///
/// Returns `true` if the file is up to date.
fn check_output(path: &Path, content: &str) -> bool {
    let existing = match skills_index::read_if_exists(path) {
        Ok(existing) => existing,
        Err(e) => {
            eprintln!("skills-index: failed to read {}: {e}", path.display());
            std::process::exit(1);
        }
    };
    match existing {
        Some(existing) if existing == content => {
            eprintln!("Up to date {}", path.display());
            true
        }
        Some(existing) => {
            eprintln!("Stale {}", path.display());
            let name = path.display().to_string();
            let diff = TextDiff::from_lines(existing.as_str(), content);
            eprint!(
                "{}",
                diff.unified_diff()
                    .context_radius(3)
                    .header(&format!("a/{name}"), &format!("b/{name}"))
            );
            false
        }
        None => {
            eprintln!("Missing {}", path.display());
            false
        }
    }
}
