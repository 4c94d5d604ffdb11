use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{PaginatedResponse, SchemaViolation, Validate};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;
pub const MAX_SEARCH_QUERY_CHARS: usize = 200;

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Page selection accepted by every list endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    #[schemars(range(min = 1))]
    pub page: u64,
    #[serde(default = "default_page_size")]
    #[schemars(range(min = 1, max = 100))]
    pub page_size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Number of records to skip before this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Wraps one page of records in an envelope.
    pub fn respond<T>(&self, items: Vec<T>, total: u64) -> PaginatedResponse<T> {
        PaginatedResponse::new(items, total, self.page, self.page_size)
    }

    /// Slices an in-memory result set down to this page.
    pub fn paginate<T: Clone>(&self, all: &[T]) -> PaginatedResponse<T> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX).min(all.len());
        let len = usize::try_from(self.page_size).unwrap_or(usize::MAX);
        let end = start.saturating_add(len).min(all.len());
        self.respond(all[start..end].to_vec(), all.len() as u64)
    }
}

impl Validate for PageRequest {
    fn validate(&self) -> Result<(), SchemaViolation> {
        if self.page == 0 {
            return Err(SchemaViolation::at("page", "integer >= 1", "number 0"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(SchemaViolation::at(
                "page_size",
                format!("integer in 1..={MAX_PAGE_SIZE}"),
                format!("number {}", self.page_size),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ThreadSort {
    #[default]
    CreatedAt,
    UpdatedAt,
    PostCount,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query for the threads of a category. Pinned threads always come first.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ThreadListQuery {
    #[serde(flatten)]
    pub page: PageRequest,
    #[serde(default)]
    pub sort: ThreadSort,
    #[serde(default)]
    pub order: SortOrder,
}

impl Validate for ThreadListQuery {
    fn validate(&self) -> Result<(), SchemaViolation> {
        self.page.validate()
    }
}

/// Which record kinds a search covers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    #[default]
    Threads,
    Posts,
    All,
}

impl SearchScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchScope::Threads => "threads",
            SearchScope::Posts => "posts",
            SearchScope::All => "all",
        }
    }

    pub fn includes_threads(&self) -> bool {
        matches!(self, SearchScope::Threads | SearchScope::All)
    }

    pub fn includes_posts(&self) -> bool {
        matches!(self, SearchScope::Posts | SearchScope::All)
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchScope {
    type Err = String;

    /// Accepts both the plural filter names and the singular result kinds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "threads" | "thread" => Ok(SearchScope::Threads),
            "posts" | "post" => Ok(SearchScope::Posts),
            "all" => Ok(SearchScope::All),
            other => Err(format!("unknown search scope '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct SearchQuery {
    #[schemars(length(min = 1, max = 200))]
    pub q: String,
    #[serde(default)]
    pub r#type: SearchScope,
}

impl Validate for SearchQuery {
    fn validate(&self) -> Result<(), SchemaViolation> {
        let chars = self.q.chars().count();
        if self.q.trim().is_empty() || chars > MAX_SEARCH_QUERY_CHARS {
            return Err(SchemaViolation::at(
                "q",
                format!("non-blank text of at most {MAX_SEARCH_QUERY_CHARS} characters"),
                format!("string of {chars} characters"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;
    use serde_json::json;

    #[test]
    fn page_request_defaults() {
        let req: PageRequest = decode(&json!({})).unwrap();
        assert_eq!(req, PageRequest::new(1, DEFAULT_PAGE_SIZE));
        assert_eq!(req.offset(), 0);
        assert_eq!(PageRequest::new(3, 20).offset(), 40);
    }

    #[test]
    fn page_size_is_capped() {
        let err = decode::<PageRequest>(&json!({"page_size": 101})).unwrap_err();
        assert_eq!(err.field(), Some("page_size"));
        assert!(decode::<PageRequest>(&json!({"page": 0})).is_err());
    }

    #[test]
    fn paginate_slices_and_counts() {
        let all: Vec<u32> = (1..=45).collect();
        let last = PageRequest::new(3, 20).paginate(&all);
        assert_eq!(last.items, (41..=45).collect::<Vec<_>>());
        assert_eq!(last.total, 45);
        assert_eq!(last.total_pages, 3);

        let past_end = PageRequest::new(9, 20).paginate(&all);
        assert!(past_end.items.is_empty());

        let empty = PageRequest::default().paginate::<u32>(&[]);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn thread_list_query_reads_sort_and_order() {
        let q: ThreadListQuery = decode(&json!({
            "page": 2,
            "sort": "post_count",
            "order": "asc"
        }))
        .unwrap();
        assert_eq!(q.page.page, 2);
        assert_eq!(q.page.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(q.sort, ThreadSort::PostCount);
        assert_eq!(q.order, SortOrder::Asc);

        let err = decode::<ThreadListQuery>(&json!({"sort": "title"})).unwrap_err();
        assert_eq!(err.field(), Some("sort"));
    }

    #[test]
    fn search_scope_accepts_both_spellings() {
        assert_eq!("thread".parse::<SearchScope>().unwrap(), SearchScope::Threads);
        assert_eq!("posts".parse::<SearchScope>().unwrap(), SearchScope::Posts);
        assert!("everything".parse::<SearchScope>().is_err());
        assert!(SearchScope::All.includes_threads() && SearchScope::All.includes_posts());
    }

    #[test]
    fn search_query_bounds() {
        let q: SearchQuery = decode(&json!({"q": "lifetimes"})).unwrap();
        assert_eq!(q.r#type, SearchScope::Threads);
        let too_long = "x".repeat(MAX_SEARCH_QUERY_CHARS + 1);
        assert_eq!(
            decode::<SearchQuery>(&json!({ "q": too_long })).unwrap_err().field(),
            Some("q")
        );
        assert!(decode::<SearchQuery>(&json!({"q": "   "})).is_err());
    }
}
