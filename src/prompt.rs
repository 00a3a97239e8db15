//! Review prompt composition.
//!
//! A review prompt pairs a specialized system prompt (chosen by review kind)
//! with a user message built from the operator's instruction and the
//! serialized corpus.

use crate::collector::Corpus;

/// Kind of review requested from the model.
///
/// Each kind selects a specialized system prompt; the operator instruction
/// and corpus are the same regardless of kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewKind {
    /// High-level architectural review (default)
    #[default]
    Architecture,
    /// Maintainability and code-quality review
    CodeQuality,
    /// Security-focused review
    Security,
    /// Performance-focused review
    Performance,
}

impl ReviewKind {
    /// Returns the ID string for this review kind.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Architecture => "architecture",
            Self::CodeQuality => "code-quality",
            Self::Security => "security",
            Self::Performance => "performance",
        }
    }

    /// Returns the system prompt for this review kind.
    #[must_use]
    pub const fn system_prompt(self) -> &'static str {
        match self {
            Self::Architecture => {
                "You are a senior front-end architect reviewing a web project.\n\
                 Analyze the provided sources for:\n\
                 - Overall structure and separation of concerns\n\
                 - Coupling between pages, scripts and styles\n\
                 - Duplicated logic and missing abstractions\n\
                 - Opportunities to simplify the module layout\n\n\
                 Respond with structured Markdown, most important findings first."
            }
            Self::CodeQuality => {
                "You are an expert front-end code reviewer.\n\
                 Analyze the provided sources for:\n\
                 - Readability and maintainability issues\n\
                 - Dead code and inconsistent conventions\n\
                 - Error handling gaps in client-side code\n\n\
                 Respond with actionable feedback in structured Markdown."
            }
            Self::Security => {
                "You are a web application security reviewer.\n\
                 Analyze the provided front-end sources for:\n\
                 - XSS sinks and unsafe DOM manipulation\n\
                 - Secrets or credentials committed to the client bundle\n\
                 - Unsafe handling of user input and third-party content\n\n\
                 Respond with a prioritized list of findings in Markdown."
            }
            Self::Performance => {
                "You are a front-end performance specialist.\n\
                 Analyze the provided sources for:\n\
                 - Render-blocking patterns and oversized payloads\n\
                 - Inefficient DOM access and event handling\n\
                 - Caching and lazy-loading opportunities\n\n\
                 Respond with a prioritized list of optimizations in Markdown."
            }
        }
    }
}

/// A fully composed prompt ready for the remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// System prompt selecting the reviewer persona
    pub system: String,
    /// User message: instruction plus serialized corpus
    pub user: String,
}

/// Composes the final prompt from the operator instruction and the corpus.
#[must_use]
pub fn compose(kind: ReviewKind, instruction: &str, corpus: &Corpus) -> Prompt {
    let user = format!(
        "{instruction}\n\nProject sources ({count} file(s)):\n\n{body}",
        count = corpus.file_count(),
        body = corpus.to_prompt_text(),
    );

    Prompt {
        system: kind.system_prompt().to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::CorpusFile;

    fn sample_corpus() -> Corpus {
        Corpus {
            files: vec![
                CorpusFile {
                    relative_path: "index.html".to_string(),
                    content: "<html></html>".to_string(),
                },
                CorpusFile {
                    relative_path: "js/app.js".to_string(),
                    content: "let x = 1;".to_string(),
                },
            ],
            skipped: 0,
        }
    }

    #[test]
    fn test_compose_embeds_instruction_and_count() {
        let prompt = compose(ReviewKind::Architecture, "Review the routing setup", &sample_corpus());

        assert!(prompt.user.starts_with("Review the routing setup"));
        assert!(prompt.user.contains("2 file(s)"));
    }

    #[test]
    fn test_compose_embeds_every_corpus_header() {
        let prompt = compose(ReviewKind::Security, "Audit this", &sample_corpus());

        assert!(prompt.user.contains("==== FILE: index.html ===="));
        assert!(prompt.user.contains("==== FILE: js/app.js ===="));
        assert!(prompt.user.contains("let x = 1;"));
    }

    #[test]
    fn test_each_kind_has_a_distinct_system_prompt() {
        let kinds = [
            ReviewKind::Architecture,
            ReviewKind::CodeQuality,
            ReviewKind::Security,
            ReviewKind::Performance,
        ];

        for kind in kinds {
            assert!(!kind.system_prompt().is_empty());
            assert!(!kind.id().is_empty());
        }
        assert_ne!(
            ReviewKind::Architecture.system_prompt(),
            ReviewKind::Security.system_prompt()
        );
    }

    #[test]
    fn test_default_kind_is_architecture() {
        assert_eq!(ReviewKind::default(), ReviewKind::Architecture);
    }
}
