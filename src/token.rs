use std::sync::Arc;

const CHARS_PER_TOKEN: usize = 4;
const WORD_MULTIPLIER: f64 = 1.3;
const SPECIAL_DIVISOR: usize = 10;

/// Type of tokenizer to use for estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerKind {
    /// Simple character-based tokenizer (~4 chars per token)
    Simple,
    /// Blended tokenizer with word and special character analysis
    Enhanced,
}

impl TokenizerKind {
    /// Creates a new tokenizer instance of this kind.
    #[must_use]
    pub fn create(self) -> Arc<dyn TokenEstimator> {
        match self {
            Self::Simple => Arc::new(SimpleTokenizer),
            Self::Enhanced => Arc::new(EnhancedTokenizer),
        }
    }
}

/// Trait for estimating token counts in text.
///
/// Estimates are advisory: the pipeline logs them and warns when a corpus
/// exceeds the configured budget, but never truncates content.
pub trait TokenEstimator: Send + Sync {
    /// Estimates the number of tokens in the given text.
    fn estimate(&self, text: &str) -> usize;
}

/// Simple character-based tokenizer.
///
/// Roughly 4 characters per token, which works reasonably well for markup
/// and source code.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SimpleTokenizer;

impl TokenEstimator for SimpleTokenizer {
    fn estimate(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        let char_count = text.chars().count();
        char_count
            .saturating_add(CHARS_PER_TOKEN - 1)
            .saturating_div(CHARS_PER_TOKEN)
            .max(1)
    }
}

/// Blended tokenizer averaging a word-based and a character-based estimate,
/// with a penalty for special characters (punctuation-heavy code tokenizes
/// worse than prose).
#[derive(Debug, Clone, Copy)]
pub(crate) struct EnhancedTokenizer;

impl TokenEstimator for EnhancedTokenizer {
    fn estimate(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        let words = text.split_whitespace().count();
        let chars = text.chars().count();
        let special_chars = text
            .chars()
            .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
            .count();

        let word_estimate = (f64::from(words as u32) * WORD_MULTIPLIER) as usize;
        let char_estimate = chars.saturating_div(CHARS_PER_TOKEN);
        let special_penalty = special_chars.saturating_div(SPECIAL_DIVISOR);

        word_estimate
            .saturating_add(char_estimate)
            .saturating_div(2)
            .saturating_add(special_penalty)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokenizer_empty() {
        assert_eq!(SimpleTokenizer.estimate(""), 0);
    }

    #[test]
    fn test_simple_tokenizer_basic() {
        assert_eq!(SimpleTokenizer.estimate("test"), 1); // 4 chars = 1 token
        assert_eq!(SimpleTokenizer.estimate("hello world"), 3); // 11 chars = 3 tokens
    }

    #[test]
    fn test_simple_tokenizer_long_text() {
        let text = "a".repeat(1000);
        assert_eq!(SimpleTokenizer.estimate(&text), 250);
    }

    #[test]
    fn test_enhanced_tokenizer_empty() {
        assert_eq!(EnhancedTokenizer.estimate(""), 0);
    }

    #[test]
    fn test_enhanced_tokenizer_markup() {
        let html = r#"<div class="item file"><span>index.html</span></div>"#;
        let result = EnhancedTokenizer.estimate(html);
        assert!(result > 5);
        assert!(result < 40);
    }

    #[test]
    fn test_enhanced_tokenizer_minimum_is_one() {
        assert_eq!(EnhancedTokenizer.estimate("a"), 1);
    }

    #[test]
    fn test_kind_creates_estimator() {
        let simple = TokenizerKind::Simple.create();
        let enhanced = TokenizerKind::Enhanced.create();
        let code = "function render() { return document.body; }";

        assert!(simple.estimate(code) > 0);
        assert!(enhanced.estimate(code) > 0);
    }
}
