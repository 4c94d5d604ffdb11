use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{require_timestamp, SchemaViolation, Timestamp, Validate};

/// Global counters shown on the forum landing page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
pub struct ForumStats {
    pub total_categories: u64,
    pub total_threads: u64,
    pub total_posts: u64,
    pub total_reactions: u64,
    pub total_tags: u64,
}

impl Validate for ForumStats {
    fn validate(&self) -> Result<(), SchemaViolation> {
        Ok(())
    }
}

/// A thread ranked by recent activity. The score is computed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct TrendingThread {
    #[schemars(range(min = 1))]
    pub id: u64,
    #[schemars(length(min = 1))]
    pub title: String,
    pub author_name: String,
    #[schemars(range(min = 1))]
    pub category_id: u64,
    pub category_name: String,
    pub post_count: u64,
    pub reaction_count: u64,
    pub score: f64,
    pub created_at: String,
}

impl Validate for TrendingThread {
    fn validate(&self) -> Result<(), SchemaViolation> {
        if !self.score.is_finite() {
            return Err(SchemaViolation::at(
                "score",
                "finite number",
                format!("number {}", self.score),
            ));
        }
        require_timestamp("created_at", &self.created_at)?;
        Ok(())
    }
}

/// Orders trending threads by descending score, newest first among equal scores.
pub fn rank_trending(threads: &mut [TrendingThread]) {
    threads.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| newer_first(&a.created_at, &b.created_at))
    });
}

fn newer_first(a: &str, b: &str) -> Ordering {
    match (Timestamp::parse(a), Timestamp::parse(b)) {
        (Some(ta), Some(tb)) => tb.compare(&ta).unwrap_or_else(|| b.cmp(a)),
        _ => b.cmp(a),
    }
}
