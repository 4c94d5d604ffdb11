use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{validate_each, Nullable, SchemaViolation, SearchScope, Validate};

/// Longest content excerpt carried by a search hit, in characters.
pub const SNIPPET_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchResultKind {
    Thread,
    Post,
}

/// One search hit. `title` is set for thread hits; `thread_id` is set for post hits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct SearchResult {
    pub r#type: SearchResultKind,
    #[schemars(range(min = 1))]
    pub id: u64,
    pub title: Nullable<String>,
    pub content: String,
    pub author_name: String,
    pub thread_id: Nullable<u64>,
    pub relevance_score: f64,
}

impl SearchResult {
    pub fn thread(
        id: u64,
        title: impl Into<String>,
        content: &str,
        author_name: impl Into<String>,
        relevance_score: f64,
    ) -> Self {
        Self {
            r#type: SearchResultKind::Thread,
            id,
            title: Nullable::Value(title.into()),
            content: snippet(content),
            author_name: author_name.into(),
            thread_id: Nullable::Null,
            relevance_score,
        }
    }

    pub fn post(
        id: u64,
        thread_id: u64,
        content: &str,
        author_name: impl Into<String>,
        relevance_score: f64,
    ) -> Self {
        Self {
            r#type: SearchResultKind::Post,
            id,
            title: Nullable::Null,
            content: snippet(content),
            author_name: author_name.into(),
            thread_id: Nullable::Value(thread_id),
            relevance_score,
        }
    }

    /// The thread a reader should open for this hit.
    pub fn target_thread(&self) -> Option<u64> {
        match self.r#type {
            SearchResultKind::Thread => Some(self.thread_id.value().copied().unwrap_or(self.id)),
            SearchResultKind::Post => self.thread_id.value().copied(),
        }
    }
}

impl Validate for SearchResult {
    fn validate(&self) -> Result<(), SchemaViolation> {
        match self.r#type {
            SearchResultKind::Thread if self.title.is_null() => {
                return Err(SchemaViolation::at(
                    "title",
                    "text for a thread result",
                    "null",
                ));
            }
            SearchResultKind::Post if self.thread_id.is_null() => {
                return Err(SchemaViolation::at(
                    "thread_id",
                    "integer for a post result",
                    "null",
                ));
            }
            _ => {}
        }
        if !self.relevance_score.is_finite() {
            return Err(SchemaViolation::at(
                "relevance_score",
                "finite number",
                format!("number {}", self.relevance_score),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct SearchResponse {
    pub query: String,
    /// Filter the backend applied, e.g. `all`, `threads`, `posts`.
    pub r#type: String,
    pub total: u64,
    pub results: Vec<SearchResult>,
}

impl SearchResponse {
    pub fn new(
        query: impl Into<String>,
        scope: SearchScope,
        mut results: Vec<SearchResult>,
    ) -> Self {
        sort_results(&mut results);
        Self {
            query: query.into(),
            r#type: scope.as_str().to_string(),
            total: results.len() as u64,
            results,
        }
    }

    /// The applied filter, if it is one the client knows.
    pub fn scope(&self) -> Option<SearchScope> {
        self.r#type.parse().ok()
    }

    pub fn sort_by_relevance(&mut self) {
        sort_results(&mut self.results);
    }

    pub fn is_sorted_by_relevance(&self) -> bool {
        self.results
            .windows(2)
            .all(|w| w[0].relevance_score >= w[1].relevance_score)
    }
}

impl Validate for SearchResponse {
    fn validate(&self) -> Result<(), SchemaViolation> {
        let len = self.results.len() as u64;
        if self.total < len {
            return Err(SchemaViolation::at(
                "total",
                format!("at least the number of results ({len})"),
                format!("number {}", self.total),
            ));
        }
        validate_each("results", &self.results)
    }
}

fn sort_results(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
    });
}

fn snippet(content: &str) -> String {
    content.chars().take(SNIPPET_CHARS).collect()
}
