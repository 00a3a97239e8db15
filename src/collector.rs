use crate::config::Config;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::{fs, fmt::Write as _};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Delimiter prefix written before each file's content in the serialized
/// corpus.
const FILE_HEADER_PREFIX: &str = "==== FILE: ";

/// A single file gathered into the corpus.
#[derive(Debug, Clone)]
pub struct CorpusFile {
    /// Path relative to the collection root
    pub relative_path: String,
    /// Full text content
    pub content: String,
}

/// The concatenated front-end sources selected for one review invocation.
///
/// Files appear in directory-walk order (not sorted). The corpus is built
/// fresh per invocation, held only in memory, and discarded after the remote
/// call completes.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// Files successfully read, in traversal order
    pub files: Vec<CorpusFile>,
    /// Files that matched but could not be read
    pub skipped: usize,
}

impl Corpus {
    /// Number of files successfully read.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Returns true if no files were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Serializes the corpus into a single prompt-ready string.
    ///
    /// Each file contributes a delimiter header line with its relative path
    /// followed by its full content, in traversal order.
    #[must_use]
    pub fn to_prompt_text(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            let _ = writeln!(out, "{}{} ====", FILE_HEADER_PREFIX, file.relative_path);
            out.push_str(&file.content);
            if !file.content.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}

/// Walks a directory tree and gathers matching files into a [`Corpus`].
pub struct Collector {
    root_dir: PathBuf,
    extensions: Vec<String>,
    ignored_dirs: HashSet<String>,
}

impl Collector {
    /// Creates a new collector from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            root_dir: config.root_dir.clone(),
            extensions: config.extensions.clone(),
            ignored_dirs: config.ignored_dirs.clone(),
        }
    }

    /// Collects all matching files under the root directory.
    ///
    /// Collection is intentionally infallible: a missing or unreadable root
    /// yields an empty corpus, and per-file read failures are logged at WARN
    /// and skipped. The caller decides whether an empty corpus is fatal.
    pub fn collect(&self) -> Corpus {
        let mut corpus = Corpus::default();

        if !self.root_dir.is_dir() {
            debug!(
                "Root directory {} is missing or not a directory, collecting nothing",
                self.root_dir.display()
            );
            return corpus;
        }

        debug!("Collecting sources under {}", self.root_dir.display());

        let walker = WalkDir::new(&self.root_dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !self.is_ignored_dir(entry.path(), entry.file_type().is_dir()));

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Walk error (skipping): {e}");
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                debug!("Scanning {}", entry.path().display());
                continue;
            }

            if !entry.file_type().is_file() || !self.matches_extension(entry.path()) {
                continue;
            }

            match fs::read_to_string(entry.path()) {
                Ok(content) => {
                    let relative_path = pathdiff::diff_paths(entry.path(), &self.root_dir)
                        .unwrap_or_else(|| entry.path().to_path_buf())
                        .to_string_lossy()
                        .replace('\\', "/");

                    corpus.files.push(CorpusFile {
                        relative_path,
                        content,
                    });
                    debug!("Collected {} ({} so far)", entry.path().display(), corpus.file_count());
                }
                Err(e) => {
                    // Permission, invalid UTF-8 or plain I/O failure: one bad
                    // file never aborts the whole collection.
                    warn!("Failed to read {} (skipping): {e}", entry.path().display());
                    corpus.skipped += 1;
                }
            }
        }

        debug!(
            "Collection complete: {} file(s) read, {} skipped",
            corpus.file_count(),
            corpus.skipped
        );

        corpus
    }

    /// Returns true for directories whose name is in the ignore set.
    ///
    /// Used with `filter_entry`, so matching subtrees are never opened.
    /// The root itself (depth 0) is always allowed.
    fn is_ignored_dir(&self, path: &Path, is_dir: bool) -> bool {
        if !is_dir || path == self.root_dir {
            return false;
        }

        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.ignored_dirs.contains(name))
    }

    /// Plain suffix match against the configured extension list.
    fn matches_extension(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };

        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}
