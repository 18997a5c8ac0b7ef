//! Aggregate statistics over the history log.
//!
//! Everything is recomputed from the log on each call; nothing is cached, so
//! a snapshot always matches the log it was built from.

use ag_core::{AnalyticsSnapshot, KeywordCount, PipelineResult, TimelineBucket};
use std::collections::BTreeMap;

const POPULAR_KEYWORDS: usize = 10;

/// Summarise a history log.
///
/// Keywords are counted once per entry they appear in, summed across
/// entries. The timeline is bucketed by the `YYYY-MM-DD` date of each
/// timestamp and ordered by date ascending. An empty log yields zeroes.
pub fn summarize(history: &[PipelineResult]) -> AnalyticsSnapshot {
    let mut keywords: BTreeMap<String, usize> = BTreeMap::new();
    let mut timeline: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_words = 0usize;
    let mut total_keywords = 0usize;

    for entry in history {
        for keyword in &entry.keywords {
            *keywords.entry(keyword.clone()).or_insert(0) += 1;
        }
        *timeline.entry(entry.date()).or_insert(0) += 1;
        total_words += entry.metadata.word_count;
        total_keywords += entry.metadata.keyword_count;
    }

    let (average_word_count, average_keywords) = if history.is_empty() {
        (0.0, 0.0)
    } else {
        let n = history.len() as f64;
        (total_words as f64 / n, total_keywords as f64 / n)
    };

    let mut popular_keywords: Vec<KeywordCount> = keywords
        .iter()
        .map(|(keyword, &count)| KeywordCount {
            keyword: keyword.clone(),
            count,
        })
        .collect();
    // BTreeMap order is alphabetical, so a stable sort keeps ties alphabetical.
    popular_keywords.sort_by(|a, b| b.count.cmp(&a.count));
    popular_keywords.truncate(POPULAR_KEYWORDS);

    AnalyticsSnapshot {
        total_generations: history.len(),
        keywords,
        popular_keywords,
        timeline: timeline
            .into_iter()
            .map(|(date, count)| TimelineBucket { date, count })
            .collect(),
        average_word_count,
        average_keywords,
    }
}
