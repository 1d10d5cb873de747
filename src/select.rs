//! Which files to hand to the driver.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Every animated component name starts with this.
pub const COMPONENT_MARKER: &str = "Animated";

/// Directories searched when no roots are given.
pub const DEFAULT_ROOTS: [&str; 2] = ["app", "components"];

pub const DEFAULT_EXTENSIONS: [&str; 1] = ["tsx"];

#[derive(Clone, Debug)]
pub enum Selection {
    /// Exactly these files, no pre-filter.
    Fixed(Vec<PathBuf>),
    Discover(Discovery),
}

#[derive(Clone, Debug)]
pub struct Discovery {
    pub roots: Vec<PathBuf>,
    pub extensions: Vec<String>,
    /// Animation module path a file must mention to be selected.
    pub module: String,
}

impl Discovery {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            roots: DEFAULT_ROOTS.iter().map(PathBuf::from).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            module: module.into(),
        }
    }

    /// Candidate files under every root, sorted, before the content check.
    pub fn walk(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for root in &self.roots {
            let entries = WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e));
            for entry in entries {
                match entry {
                    Ok(entry) if entry.file_type().is_file() && self.wants(entry.path()) => {
                        files.push(entry.into_path());
                    }
                    Ok(_) => {}
                    Err(err) => debug!(root = %root.display(), error = %err, "walk error"),
                }
            }
        }
        files
    }

    fn wants(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Walked files whose content mentions both the component marker and the module.
    pub fn matching(&self) -> Vec<PathBuf> {
        self.walk()
            .into_iter()
            .filter(|path| match fs::read_to_string(path) {
                Ok(content) => has_animations(&content, &self.module),
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "unreadable, skipped");
                    false
                }
            })
            .collect()
    }
}

impl Selection {
    pub fn resolve(&self) -> Vec<PathBuf> {
        match self {
            Selection::Fixed(paths) => paths.clone(),
            Selection::Discover(discovery) => discovery.matching(),
        }
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.file_type().is_dir() && (name.starts_with('.') || name == "node_modules")
}

/// Content pre-filter for discovery.
pub fn has_animations(content: &str, module: &str) -> bool {
    content.contains(COMPONENT_MARKER) && content.contains(module)
}
