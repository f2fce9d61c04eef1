//! Cluster label and summary candidates from keywords and descriptions.

use std::collections::HashMap;

use insight_core::Insight;

/// Longest description prefix used as a fallback label.
pub const FALLBACK_LABEL_CHARS: usize = 60;
const UNLABELED: &str = "Unlabeled cluster";

/// The `top_n` most frequent keywords, joined by `", "`.
///
/// Keywords are compared case-insensitively; the first spelling seen is
/// shown and ties go to the keyword seen first. Without any keywords the
/// first non-empty description, truncated, is used instead.
pub fn cluster_label(insights: &[&Insight], top_n: usize) -> String {
    // keyword (lowercased) -> (count, first position, display form)
    let mut freq: HashMap<String, (usize, usize, &str)> = HashMap::new();
    let mut position = 0;
    for insight in insights {
        for kw in &insight.keywords {
            let kw = kw.trim();
            if kw.is_empty() {
                continue;
            }
            let entry = freq.entry(kw.to_lowercase()).or_insert((0, position, kw));
            entry.0 += 1;
            position += 1;
        }
    }

    if freq.is_empty() {
        return insights
            .iter()
            .map(|i| i.feedback_description.trim())
            .find(|d| !d.is_empty())
            .map(|d| d.chars().take(FALLBACK_LABEL_CHARS).collect())
            .unwrap_or_else(|| UNLABELED.to_string());
    }

    let mut ranked: Vec<_> = freq.into_values().collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    ranked
        .into_iter()
        .take(top_n.max(1))
        .map(|(_, _, kw)| kw)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Up to `count` non-empty descriptions joined by `" | "`.
pub fn cluster_summary(insights: &[&Insight], count: usize) -> String {
    insights
        .iter()
        .map(|i| i.feedback_description.trim())
        .filter(|d| !d.is_empty())
        .take(count)
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use insight_core::Sentiment;

    use super::*;

    fn insight(description: &str, keywords: &[&str]) -> Insight {
        Insight {
            id: "i".into(),
            feedback_id: "f".into(),
            form_id: "form".into(),
            organization: "org".into(),
            sentiment: Sentiment::Neutral,
            feedback_description: description.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            embedding: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn label_ranks_by_frequency_then_first_seen() {
        let a = insight("", &["checkout", "slow"]);
        let b = insight("", &["Checkout", "payment", "slow"]);
        let c = insight("", &["checkout", "refund"]);
        let label = cluster_label(&[&a, &b, &c], 3);
        assert_eq!(label, "checkout, slow, payment");
    }

    #[test]
    fn label_falls_back_to_truncated_description() {
        let long = "x".repeat(100);
        let a = insight("  ", &[]);
        let b = insight(&long, &[" "]);
        let label = cluster_label(&[&a, &b], 3);
        assert_eq!(label.chars().count(), FALLBACK_LABEL_CHARS);

        assert_eq!(cluster_label(&[&a], 3), UNLABELED);
    }

    #[test]
    fn summary_joins_first_descriptions() {
        let a = insight("first", &[]);
        let b = insight("", &[]);
        let c = insight("second", &[]);
        let d = insight("third", &[]);
        let e = insight("fourth", &[]);
        assert_eq!(
            cluster_summary(&[&a, &b, &c, &d, &e], 3),
            "first | second | third"
        );
    }
}
