use chrono::Utc;
use insight_core::models::*;
use proptest::prelude::*;

#[test]
fn sentiment_serializes_with_spaces() {
    let json = serde_json::to_string(&Sentiment::VeryDissatisfied).unwrap();
    assert_eq!(json, "\"very dissatisfied\"");
    let back: Sentiment = serde_json::from_str("\"very satisfied\"").unwrap();
    assert_eq!(back, Sentiment::VerySatisfied);
}

#[test]
fn only_bottom_two_sentiments_are_negative() {
    let negative: Vec<_> = Sentiment::ALL
        .into_iter()
        .filter(|s| s.is_negative())
        .collect();
    assert_eq!(
        negative,
        vec![Sentiment::VeryDissatisfied, Sentiment::Dissatisfied]
    );
}

#[test]
fn insight_deserializes_from_camel_case_document() {
    let doc = serde_json::json!({
        "id": "64b7f0c2a1d3e4f5a6b7c8d9",
        "feedbackId": "64b7f0c2a1d3e4f5a6b7c8da",
        "formId": "64b7f0c2a1d3e4f5a6b7c8db",
        "organization": "64b7f0c2a1d3e4f5a6b7c8dc",
        "sentiment": "dissatisfied",
        "feedbackDescription": "Search never finds anything",
        "keywords": ["search"],
        "embedding": null,
        "createdAt": Utc::now(),
    });
    let insight: Insight = serde_json::from_value(doc).unwrap();
    assert_eq!(insight.sentiment, Sentiment::Dissatisfied);
    assert!(insight.embedding.is_none());
}

#[test]
fn recommendation_uses_snake_case_summary_field() {
    let rec: Recommendation = serde_json::from_str(
        r#"{"recommendation":"Fix search","impact":"high","urgency":"soon","cluster_summary":"Search is broken"}"#,
    )
    .unwrap();
    assert_eq!(rec.impact, Impact::High);
    assert_eq!(rec.cluster_summary, "Search is broken");
}

proptest! {
    #[test]
    fn sentiment_display_parses_back(idx in 0usize..5) {
        let s = Sentiment::ALL[idx];
        prop_assert_eq!(s.to_string().parse::<Sentiment>().unwrap(), s);
    }
}
