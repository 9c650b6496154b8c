use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod build;

#[derive(Parser)]
#[command(
    name = "skills-index",
    version,
    about = "Skills discovery index generator"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Show project information
    #[arg(long)]
    about: bool,

    /// Only log errors (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    quiet: bool,
}

/// Output format for the index.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub(crate) enum Format {
    /// `{"skills": [...]}` document (default)
    #[default]
    Json,
    /// One `name: description` line per skill
    Text,
}

#[derive(Subcommand)]
#[command(next_display_order = None)]
enum Commands {
    /// Build the discovery index from a skills root
    #[command(alias = "index")]
    Build {
        /// Directory containing one subdirectory per skill
        #[arg(env = "SKILLS_INDEX_ROOT", default_value = skills_index::DEFAULT_SKILLS_DIR)]
        root: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Emit JSON on a single line
        #[arg(long)]
        compact: bool,
        /// Write output to file instead of stdout (only rewritten on change)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Exit 1 with a diff if the --output file is stale, without writing
        #[arg(long, requires = "output")]
        check: bool,
        /// Skip skills whose name differs from their directory name
        #[arg(long)]
        require_dir_name_match: bool,
        /// Exit 1 if any skill directory was skipped with a warning
        #[arg(long)]
        deny_warnings: bool,
    },
}

pub fn run(cli: Cli) {
    init_tracing(cli.quiet);

    if cli.about {
        print_about();
        return;
    }

    match cli.command {
        Some(Commands::Build {
            root,
            format,
            compact,
            output,
            check,
            require_dir_name_match,
            deny_warnings,
        }) => build::run(build::BuildArgs {
            root,
            format,
            compact,
            output,
            check,
            require_dir_name_match,
            deny_warnings,
        }),
        None => {
            eprintln!("Usage: skills-index <command> [args]");
            eprintln!("Run `skills-index --help` for details.");
            std::process::exit(1);
        }
    }
}

/// Install a stderr log subscriber. `RUST_LOG` takes precedence over `--quiet`.
fn init_tracing(quiet: bool) {
    let default_level = if quiet { "error" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

fn print_about() {
    println!(
        "skills-index: Skills Discovery Index Generator\n\
         ├─ version:    {}\n\
         ├─ author:     {}\n\
         ├─ serves:     {}\n\
         └─ licence:    {} https://www.apache.org/licenses/LICENSE-2.0",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS"),
        skills_index::INDEX_PATH,
        env!("CARGO_PKG_LICENSE"),
    );
}
