// src/main.rs
//
// deanimate: rewrite animated JSX components into plain markup, in place.
//
// - Imports from the animation module are removed.
// - AnimatedHeading → h{level} (default h2), AnimatedParagraph → p, AnimatedText → div;
//   only className survives on these.
// - AnimatedButton and its Primary/Outline/Ghost variants → button, all attributes kept.
// - animationType="…", delay={n}, variant="…" and level={n} are stripped from every tag.
// - Buttons without any transition class get "transition-colors" (unless --no-transition).
// - Files are only written when their content actually changed.
//
// CLI:
//   deanimate [PATHS]...   : rewrite exactly these files
//   deanimate              : discover *.tsx under --root (default: app, components) that
//                            import from the animation module, listing them first
//   --dry-run              : report what would change, write nothing
//   --legacy-heading-close : close every heading with </h2> like the old script did

use anyhow::Result;
use clap::{ArgAction, ColorChoice, Parser};
use std::path::PathBuf;
use tracing::{debug, info, trace};
use tracing_subscriber::EnvFilter;

use deanimate::report::{candidates, file_line, summary_line};
use deanimate::{Discovery, Driver, HeadingClose, Options, Pipeline, Selection, DEFAULT_MODULE};

/// CLI flags
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Files to rewrite (default: discover them under --root)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    paths: Vec<PathBuf>,

    /// Directory to search when no paths are given (repeatable; default: app, components)
    #[arg(long = "root", value_hint = clap::ValueHint::DirPath)]
    roots: Vec<PathBuf>,

    /// File extension to search for (repeatable; default: tsx)
    #[arg(long = "ext")]
    extensions: Vec<String>,

    /// Module path the animated components are imported from
    #[arg(long, default_value = DEFAULT_MODULE)]
    module: String,

    /// Do not add a default transition class to buttons
    #[arg(long = "no-transition", action = ArgAction::SetTrue)]
    no_transition: bool,

    /// Close every heading with the default level, whatever level it opened with
    #[arg(long = "legacy-heading-close", action = ArgAction::SetTrue)]
    legacy_heading_close: bool,

    /// Report changes without writing files
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    color: ColorChoice,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(cli.verbose >= 2)
        .with_writer(std::io::stderr)
        .init();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }

    trace!("cli: {:?}", cli);

    let options = Options {
        module: cli.module.clone(),
        inject_transition: !cli.no_transition,
        heading_close: if cli.legacy_heading_close {
            HeadingClose::Legacy
        } else {
            HeadingClose::Matched
        },
    };
    let pipeline = Pipeline::new(&options)?;
    debug!(rules = ?pipeline.rule_names().collect::<Vec<_>>(), "pipeline ready");

    let selected = selection(&cli);
    let files = selected.resolve();
    info!("{} candidate file(s)", files.len());
    if matches!(selected, Selection::Discover(_)) {
        println!("{}", candidates(&files));
    }

    let dry_run = cli.dry_run;
    let summary = Driver::new(&pipeline)
        .dry_run(dry_run)
        .run(&files, |report| println!("{}", file_line(report, dry_run)));

    println!("{}", summary_line(&summary, dry_run));
    Ok(())
}

fn selection(cli: &Cli) -> Selection {
    if !cli.paths.is_empty() {
        return Selection::Fixed(cli.paths.clone());
    }
    let mut discovery = Discovery::new(cli.module.clone());
    if !cli.roots.is_empty() {
        discovery.roots = cli.roots.clone();
    }
    if !cli.extensions.is_empty() {
        discovery.extensions = cli
            .extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_owned())
            .collect();
    }
    Selection::Discover(discovery)
}
