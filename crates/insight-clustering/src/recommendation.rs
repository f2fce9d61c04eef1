//! AI recommendation for a cluster: prompt construction, response parsing,
//! and enrichment statistics.
//!
//! The generative service is unreliable. Any failure or malformed response
//! degrades the cluster to its heuristic label and summary.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};

use insight_core::errors::{AiServiceError, InsightResult};
use insight_core::models::Recommendation;
use insight_core::traits::IGenerativeModel;
use insight_core::{Impact, Insight, Urgency};
use serde::Deserialize;

/// Build the prompt for one cluster.
pub fn build_prompt(cluster_label: &str, sentiment_percentage: f64, insights: &[&Insight]) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are analyzing a cluster of {} related customer feedback insights.",
        insights.len()
    );
    let _ = writeln!(prompt, "Cluster theme: {cluster_label}");
    let _ = writeln!(
        prompt,
        "Negative sentiment share: {sentiment_percentage:.0}%"
    );
    prompt.push_str("\nInsights:\n");
    for (n, insight) in insights.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "{}. [{}] {} (keywords: {})",
            n + 1,
            insight.sentiment,
            insight.feedback_description.trim(),
            insight.keywords.join(", ")
        );
    }
    prompt.push_str(
        "\nRespond with JSON only, no prose, in exactly this shape:\n\
         {\"recommendation\": string, \"impact\": \"high\"|\"medium\"|\"low\", \
         \"urgency\": \"immediate\"|\"soon\"|\"later\", \"cluster_summary\": string}\n",
    );
    prompt
}

#[derive(Deserialize)]
struct RawRecommendation {
    recommendation: String,
    impact: String,
    urgency: String,
    cluster_summary: String,
}

fn malformed(reason: impl Into<String>) -> AiServiceError {
    AiServiceError::MalformedResponse {
        reason: reason.into(),
    }
}

/// Parse the model's reply.
///
/// Tolerates Markdown code fences and prose around the JSON object by
/// taking the span from the first `{` to the last `}`.
pub fn parse_recommendation(raw: &str) -> Result<Recommendation, AiServiceError> {
    let start = raw.find('{').ok_or_else(|| malformed("no JSON object in response"))?;
    let end = raw.rfind('}').ok_or_else(|| malformed("unterminated JSON object"))?;
    if end < start {
        return Err(malformed("unterminated JSON object"));
    }

    let parsed: RawRecommendation = serde_json::from_str(&raw[start..=end])
        .map_err(|e| malformed(format!("invalid JSON: {e}")))?;

    let impact: Impact = parsed.impact.parse().map_err(malformed)?;
    let urgency: Urgency = parsed.urgency.parse().map_err(malformed)?;
    let recommendation = parsed.recommendation.trim().to_string();
    if recommendation.is_empty() {
        return Err(malformed("empty recommendation"));
    }

    Ok(Recommendation {
        recommendation,
        impact,
        urgency,
        cluster_summary: parsed.cluster_summary.trim().to_string(),
    })
}

/// Ask the model for a recommendation and parse it.
pub async fn request_recommendation(
    model: &dyn IGenerativeModel,
    prompt: &str,
) -> InsightResult<Recommendation> {
    let raw = model.generate(prompt).await?;
    Ok(parse_recommendation(&raw)?)
}

/// Counts enriched versus degraded recommendation attempts.
#[derive(Debug, Default)]
pub struct EnrichmentTracker {
    enriched: AtomicUsize,
    degraded: AtomicUsize,
}

impl EnrichmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_enriched(&self) {
        self.enriched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_degraded(&self) {
        self.degraded.fetch_add(1, Ordering::Relaxed);
    }

    /// Fraction of attempts that produced a usable recommendation.
    pub fn enrichment_rate(&self) -> f64 {
        let e = self.enriched.load(Ordering::Relaxed) as f64;
        let d = self.degraded.load(Ordering::Relaxed) as f64;
        let total = e + d;
        if total < f64::EPSILON {
            0.0
        } else {
            e / total
        }
    }

    pub fn enriched_count(&self) -> usize {
        self.enriched.load(Ordering::Relaxed)
    }

    pub fn degraded_count(&self) -> usize {
        self.degraded.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let r = parse_recommendation(
            r#"{"recommendation":"Fix the payment timeout","impact":"high","urgency":"immediate","cluster_summary":"Checkout times out"}"#,
        )
        .unwrap();
        assert_eq!(r.impact, Impact::High);
        assert_eq!(r.urgency, Urgency::Immediate);
        assert_eq!(r.cluster_summary, "Checkout times out");
    }

    #[test]
    fn strips_fences_and_prose() {
        let raw = "Sure! Here you go:\n```json\n{\"recommendation\": \"Add retries\", \"impact\": \"Medium\", \"urgency\": \"SOON\", \"cluster_summary\": \"Flaky sync\"}\n```\nLet me know.";
        let r = parse_recommendation(raw).unwrap();
        assert_eq!(r.recommendation, "Add retries");
        assert_eq!(r.impact, Impact::Medium);
        assert_eq!(r.urgency, Urgency::Soon);
    }

    #[test]
    fn rejects_unknown_enum_values() {
        let raw = r#"{"recommendation":"x","impact":"critical","urgency":"soon","cluster_summary":"s"}"#;
        assert!(matches!(
            parse_recommendation(raw),
            Err(AiServiceError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn rejects_missing_fields_and_non_json() {
        assert!(parse_recommendation(r#"{"recommendation":"x"}"#).is_err());
        assert!(parse_recommendation("I cannot help with that").is_err());
        assert!(parse_recommendation("} backwards {").is_err());
    }

    #[test]
    fn tracker_counts_correctly() {
        let tracker = EnrichmentTracker::new();
        tracker.record_enriched();
        tracker.record_enriched();
        tracker.record_degraded();
        assert_eq!(tracker.enriched_count(), 2);
        assert_eq!(tracker.degraded_count(), 1);
        assert!((tracker.enrichment_rate() - 2.0 / 3.0).abs() < 1e-9);
    }
}
