//! Static HTML structure report.
//!
//! Walks a configurable set of project section directories and renders a
//! self-contained HTML page listing the folder/file tree with sizes.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use tracing::{debug, info, warn};

/// Project directories listed by default.
pub const DEFAULT_SECTIONS: &[&str] = &[
    "src", "config", "public", "routes", "scripts", "services", "test", "utils",
];

/// Dotfiles are hidden from the report except these.
static IMPORTANT_FILES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| [".env", ".replit", "package.json", "Cargo.toml"].into_iter().collect());

/// One row of the rendered tree.
#[derive(Debug, Clone, Serialize)]
struct TreeEntry {
    name: String,
    /// "folder", "file", "missing" or "error"; doubles as the CSS class
    kind: &'static str,
    depth: usize,
    size: Option<String>,
    important: bool,
}

#[derive(Debug, Serialize)]
struct SectionView {
    title: String,
    entries: Vec<TreeEntry>,
}

/// Formats a byte count human-readably with one decimal.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{value:.1} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1} TB")
}

/// Builds and writes the structure report for one project root.
pub struct StructureReport {
    root: PathBuf,
    sections: Vec<String>,
}

impl StructureReport {
    /// Creates a report over the given root and section directory names.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, sections: Vec<String>) -> Self {
        Self {
            root: root.into(),
            sections,
        }
    }

    /// Creates a report with the default section list.
    #[must_use]
    pub fn with_default_sections(root: impl Into<PathBuf>) -> Self {
        Self::new(root, DEFAULT_SECTIONS.iter().map(ToString::to_string).collect())
    }

    /// Renders the report to an HTML string.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render(&self) -> Result<String> {
        let mut tera = Tera::default();
        tera.add_raw_template("report", include_str!("../templates/report.html.tera"))
            .map_err(|e| Error::template("report", e))?;

        let mut context = Context::new();
        context.insert(
            "generated_at",
            &chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        );
        context.insert("root_files", &self.root_files());
        context.insert("sections", &self.section_views());

        tera.render("report", &context)
            .map_err(|e| Error::template("report", e))
    }

    /// Renders the report and writes it atomically (temp file + rename).
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or any file operation fails.
    pub fn write(&self, out: &Path) -> Result<()> {
        let html = self.render()?;

        let temp_path = out.with_extension("tmp");
        let mut temp_file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;
        temp_file
            .write_all(html.as_bytes())
            .map_err(|e| Error::io(&temp_path, e))?;
        temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;
        drop(temp_file);

        fs::rename(&temp_path, out).map_err(|e| Error::io(out, e))?;

        info!("Wrote structure report to {}", out.display());
        Ok(())
    }

    /// Visible files directly under the root, sorted by name.
    fn root_files(&self) -> Vec<TreeEntry> {
        let mut names: Vec<String> = match fs::read_dir(&self.root) {
            Ok(entries) => entries
                .filter_map(std::result::Result::ok)
                .filter(|e| e.path().is_file())
                .filter_map(|e| e.file_name().to_str().map(ToString::to_string))
                .filter(|name| is_visible(name))
                .collect(),
            Err(e) => {
                warn!("Cannot read root {}: {e}", self.root.display());
                return vec![error_entry(0)];
            }
        };
        names.sort();

        names
            .into_iter()
            .map(|name| file_entry(&self.root.join(&name), name, 0))
            .collect()
    }

    fn section_views(&self) -> Vec<SectionView> {
        self.sections
            .iter()
            .map(|section| {
                let dir = self.root.join(section);
                let entries = if dir.is_dir() {
                    debug!("Listing section {}", dir.display());
                    let mut entries = Vec::new();
                    list_recursive(&dir, 0, &mut entries);
                    entries
                } else {
                    vec![TreeEntry {
                        name: "Directory not found.".to_string(),
                        kind: "missing",
                        depth: 0,
                        size: None,
                        important: false,
                    }]
                };

                SectionView {
                    title: section.clone(),
                    entries,
                }
            })
            .collect()
    }
}

/// Recursively lists one directory, entries sorted by name per level.
fn list_recursive(dir: &Path, depth: usize, out: &mut Vec<TreeEntry>) {
    let mut names: Vec<String> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(std::result::Result::ok)
            .filter_map(|e| e.file_name().to_str().map(ToString::to_string))
            .filter(|name| is_visible(name))
            .collect(),
        Err(e) => {
            warn!("Cannot read {}: {e}", dir.display());
            out.push(error_entry(depth));
            return;
        }
    };
    names.sort();

    for name in names {
        let path = dir.join(&name);
        if path.is_dir() {
            out.push(TreeEntry {
                name: format!("{name}/"),
                kind: "folder",
                depth,
                size: None,
                important: false,
            });
            list_recursive(&path, depth + 1, out);
        } else {
            out.push(file_entry(&path, name, depth));
        }
    }
}

fn file_entry(path: &Path, name: String, depth: usize) -> TreeEntry {
    let size = fs::metadata(path).ok().map(|m| format_size(m.len()));
    let important = IMPORTANT_FILES.contains(name.as_str());

    TreeEntry {
        name,
        kind: "file",
        depth,
        size,
        important,
    }
}

fn error_entry(depth: usize) -> TreeEntry {
    TreeEntry {
        name: "Permission denied.".to_string(),
        kind: "error",
        depth,
        size: None,
        important: false,
    }
}

/// Dotfiles are hidden unless flagged important.
fn is_visible(name: &str) -> bool {
    !name.starts_with('.') || IMPORTANT_FILES.contains(name)
}
