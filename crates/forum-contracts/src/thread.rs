use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{require_ordered, SchemaViolation, Validate};

/// Thread as listed inside a category or tag page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ThreadSummary {
    #[schemars(range(min = 1))]
    pub id: u64,
    #[schemars(range(min = 1))]
    pub category_id: u64,
    #[schemars(length(min = 1))]
    pub title: String,
    pub author_name: String,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub created_at: String,
    pub updated_at: String,
    pub post_count: u64,
    pub tags: Vec<String>,
}

impl Validate for ThreadSummary {
    fn validate(&self) -> Result<(), SchemaViolation> {
        if self.title.trim().is_empty() {
            return Err(SchemaViolation::at("title", "non-blank text", "blank string"));
        }
        require_ordered(&self.created_at, &self.updated_at)
    }
}

/// Single thread view: the summary plus the owning category's name.
///
/// `category_name` is copied from the category referenced by `category_id` when the
/// response is produced; it is trusted, not checked here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ThreadDetail {
    #[serde(flatten)]
    pub summary: ThreadSummary,
    pub category_name: String,
}

impl Validate for ThreadDetail {
    fn validate(&self) -> Result<(), SchemaViolation> {
        self.summary.validate()
    }
}

impl std::ops::Deref for ThreadDetail {
    type Target = ThreadSummary;

    fn deref(&self) -> &ThreadSummary {
        &self.summary
    }
}

impl From<ThreadDetail> for ThreadSummary {
    fn from(detail: ThreadDetail) -> Self {
        detail.summary
    }
}
