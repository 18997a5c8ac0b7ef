//! Keyword extraction: part-of-speech filtering followed by frequency ranking.

use ag_core::config::KeywordConfig;
use ag_core::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, instrument};

pub mod stopwords;
pub mod tagger;

pub use tagger::{LexiconTagger, PartOfSpeech, PosTagger, TaggedToken};

const MIN_KEYWORD_CHARS: usize = 3;

pub struct KeywordExtractor {
    tagger: Box<dyn PosTagger>,
    max_keywords: usize,
    max_text_chars: usize,
}

impl fmt::Debug for KeywordExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeywordExtractor")
            .field("tagger", &"<dyn PosTagger>")
            .field("max_keywords", &self.max_keywords)
            .field("max_text_chars", &self.max_text_chars)
            .finish()
    }
}

impl KeywordExtractor {
    pub fn new(config: &KeywordConfig) -> Self {
        Self::with_tagger(config, Box::new(LexiconTagger::new()))
    }

    pub fn with_tagger(config: &KeywordConfig, tagger: Box<dyn PosTagger>) -> Self {
        Self {
            tagger,
            max_keywords: config.max_keywords,
            max_text_chars: config.max_text_chars,
        }
    }

    /// Top keywords of `text`, at most the configured number.
    pub fn extract(&self, text: &str) -> Result<Vec<String>> {
        self.extract_top(text, self.max_keywords)
    }

    /// Lower-cased nouns and proper nouns longer than two characters, minus
    /// stop words, ranked by frequency. Equal counts keep first-seen order.
    #[instrument(level = "debug", skip_all, fields(chars = text.len(), limit = limit))]
    pub fn extract_top(&self, text: &str, limit: usize) -> Result<Vec<String>> {
        let text = truncate_chars(text, self.max_text_chars);

        let tokens = self.tagger.tag(text).map_err(|e| {
            debug!(error = %e, "Keyword extraction error");
            Error::ExtractionFailed(e.to_string())
        })?;

        let mut ranked: Vec<(String, usize)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for token in tokens {
            if !token.pos.is_noun()
                || token.is_stop
                || token.text.chars().count() < MIN_KEYWORD_CHARS
            {
                continue;
            }
            let keyword = token.text.to_lowercase();
            match positions.get(&keyword) {
                Some(&i) => ranked[i].1 += 1,
                None => {
                    positions.insert(keyword.clone(), ranked.len());
                    ranked.push((keyword, 1));
                }
            }
        }

        // Stable sort: ties stay in first-encountered order.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        debug!(found = ranked.len(), "Keywords ranked");

        Ok(ranked.into_iter().map(|(keyword, _)| keyword).collect())
    }
}

/// The first `max_chars` characters of `text`.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::new(&KeywordConfig::default())
    }

    struct FailingTagger;

    impl PosTagger for FailingTagger {
        fn tag(&self, _text: &str) -> Result<Vec<TaggedToken>> {
            Err(Error::Unexpected("model not loaded".to_string()))
        }
    }

    #[test]
    fn test_ranked_by_frequency() {
        let text = "The cluster runs on every node. A node joins the cluster. \
                    The cluster elects a leader node. Each server hosts a node.";
        let keywords = extractor().extract(text).unwrap();
        assert_eq!(keywords[0], "node");
        assert_eq!(keywords[1], "cluster");
        assert!(keywords.contains(&"server".to_string()));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let keywords = extractor().extract("apple banana cherry banana apple cherry").unwrap();
        assert_eq!(keywords, vec!["apple", "banana", "cherry"]);
    }

    #[test]
    fn test_lowercased_without_duplicates_or_short_words() {
        let text = "Rust rust RUST is an ox. Go go.";
        let keywords = extractor().extract(text).unwrap();
        let unique: HashSet<_> = keywords.iter().collect();
        assert_eq!(unique.len(), keywords.len());
        assert!(keywords.iter().all(|k| k.chars().count() > 2));
        assert!(keywords.iter().all(|k| *k == k.to_lowercase()));
        assert_eq!(keywords, vec!["rust"]);
    }

    #[test]
    fn test_respects_limit() {
        let text = (0..30).map(|i| format!("widget{}", i)).collect::<Vec<_>>().join(" ");
        let keywords = extractor().extract(&text).unwrap();
        assert_eq!(keywords.len(), 10);
        assert_eq!(extractor().extract_top(&text, 3).unwrap().len(), 3);
    }

    #[test]
    fn test_stop_words_and_verbs_excluded() {
        let keywords = extractor().extract("they said something quickly").unwrap();
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_input_truncated_before_analysis() {
        let config = KeywordConfig {
            max_keywords: 10,
            max_text_chars: 7,
        };
        let keywords = KeywordExtractor::new(&config).extract("network database").unwrap();
        assert_eq!(keywords, vec!["network"]);
    }

    #[test]
    fn test_tagger_failure_is_extraction_failed() {
        let extractor =
            KeywordExtractor::with_tagger(&KeywordConfig::default(), Box::new(FailingTagger));
        let err = extractor.extract("anything at all").unwrap_err();
        assert!(matches!(err, Error::ExtractionFailed(_)));
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
