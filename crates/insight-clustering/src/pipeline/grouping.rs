//! Partition insights by cluster assignment and score each group.

use insight_core::Insight;

/// Group indices by assignment. Groups are ordered largest first (ties keep
/// cluster order); empty clusters are dropped.
pub fn partition(assignments: &[usize]) -> Vec<Vec<usize>> {
    let k = assignments.iter().max().map_or(0, |&m| m + 1);
    let mut groups = vec![Vec::new(); k];
    for (idx, &cluster) in assignments.iter().enumerate() {
        groups[cluster].push(idx);
    }
    groups.retain(|g| !g.is_empty());
    groups.sort_by_key(|g| std::cmp::Reverse(g.len()));
    groups
}

/// Share of negative-sentiment insights, 0-100. Empty groups score 0.
pub fn negative_percentage(insights: &[&Insight]) -> f64 {
    if insights.is_empty() {
        return 0.0;
    }
    let negative = insights.iter().filter(|i| i.sentiment.is_negative()).count();
    negative as f64 / insights.len() as f64 * 100.0
}
