use crate::models::NewsArticle;

/// Summaries longer than this (in UTF-16 code units, as browsers measure
/// string length) qualify an article on their own under the loose policy.
pub const LOOSE_SUMMARY_MIN_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevancePolicy {
    /// Keep any article whose summary exceeds [`LOOSE_SUMMARY_MIN_CHARS`],
    /// whether or not it mentions the symbol.
    pub loose_summary_match: bool,
}

impl Default for RelevancePolicy {
    fn default() -> Self {
        Self { loose_summary_match: true }
    }
}

impl RelevancePolicy {
    pub fn is_relevant(&self, article: &NewsArticle, symbol: &str) -> bool {
        let needle = symbol.to_lowercase();
        if needle.is_empty() {
            return true;
        }

        article.title.to_lowercase().contains(&needle)
            || article.description.to_lowercase().contains(&needle)
            || (self.loose_summary_match
                && article.description.encode_utf16().count() > LOOSE_SUMMARY_MIN_CHARS)
    }
}

/// Keep articles that mention `symbol` in the title or summary
/// (case-insensitive), plus, under the loose policy, any with a long summary.
pub fn filter_relevant(
    articles: Vec<NewsArticle>,
    symbol: &str,
    policy: RelevancePolicy,
) -> Vec<NewsArticle> {
    articles
        .into_iter()
        .filter(|a| policy.is_relevant(a, symbol))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::stub::article;

    const LONG_SUMMARY: &str = "Apple reported quarterly results below analyst expectations, \
        citing weaker iPhone demand in China and a stronger dollar weighing on revenue.";

    #[test]
    fn test_keeps_relevant_and_drops_generic() {
        let articles = vec![
            article("Apple Inc. misses earnings", LONG_SUMMARY),
            article("Generic market update", "Stocks drifted lower on Tuesday."),
        ];

        let kept = filter_relevant(articles, "AAPL", RelevancePolicy::default());

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "Apple Inc. misses earnings");
    }

    #[test]
    fn test_symbol_match_is_case_insensitive() {
        let articles = vec![
            article("Why aapl is rallying", ""),
            article("Short note", "Shares of AaPl rose 2%."),
        ];

        assert_eq!(filter_relevant(articles, "AAPL", RelevancePolicy::default()).len(), 2);
    }

    #[test]
    fn test_long_summary_alone_qualifies_under_loose_policy() {
        let unrelated = "x".repeat(LOOSE_SUMMARY_MIN_CHARS + 1);
        let boundary = "y".repeat(LOOSE_SUMMARY_MIN_CHARS);
        let articles = vec![
            article("Oil prices climb", &unrelated),
            article("Bond yields", &boundary),
        ];

        let kept = filter_relevant(articles.clone(), "AAPL", RelevancePolicy::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "Oil prices climb");

        let strict = RelevancePolicy { loose_summary_match: false };
        assert!(filter_relevant(articles, "AAPL", strict).is_empty());
    }

    #[test]
    fn test_summary_length_counts_utf16_units() {
        // 60 chars, 120 UTF-16 units
        let emoji = "📈".repeat(60);
        let articles = vec![article("Markets", &emoji)];

        assert_eq!(filter_relevant(articles, "AAPL", RelevancePolicy::default()).len(), 1);
    }
}
