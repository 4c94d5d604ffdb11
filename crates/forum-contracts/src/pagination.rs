use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{validate_each, SchemaViolation, Validate};

/// Envelope wrapping every list-returning endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Matching records across all pages.
    pub total: u64,
    /// 1-based page index.
    #[schemars(range(min = 1))]
    pub page: u64,
    #[schemars(range(min = 1))]
    pub page_size: u64,
    pub total_pages: u64,
}

/// `ceil(total / page_size)`; an empty result set has zero pages.
pub fn expected_total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

impl<T> PaginatedResponse<T> {
    /// Builds an envelope around one page of `items`, deriving `total_pages`.
    pub fn new(items: Vec<T>, total: u64, page: u64, page_size: u64) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
            total_pages: expected_total_pages(total, page_size),
        }
    }

    pub fn is_last_page(&self) -> bool {
        self.page >= self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }

    /// Checks the envelope arithmetic without looking inside the items.
    pub fn validate_envelope(&self) -> Result<(), SchemaViolation> {
        if self.page == 0 {
            return Err(SchemaViolation::at("page", "integer >= 1", "number 0"));
        }
        if self.page_size == 0 {
            return Err(SchemaViolation::at("page_size", "integer >= 1", "number 0"));
        }
        let expected = expected_total_pages(self.total, self.page_size);
        if self.total_pages != expected {
            return Err(SchemaViolation::at(
                "total_pages",
                format!(
                    "{expected} (ceil of total {} / page_size {})",
                    self.total, self.page_size
                ),
                format!("number {}", self.total_pages),
            ));
        }
        let len = self.items.len() as u64;
        if len > self.page_size {
            return Err(SchemaViolation::at(
                "items",
                format!("at most page_size ({}) items", self.page_size),
                format!("array of {len} items"),
            ));
        }
        if len > self.total {
            return Err(SchemaViolation::at(
                "items",
                format!("at most total ({}) items", self.total),
                format!("array of {len} items"),
            ));
        }
        if len > 0 && self.page > self.total_pages {
            return Err(SchemaViolation::at(
                "page",
                format!("page within 1..={} when items are present", self.total_pages),
                format!("number {}", self.page),
            ));
        }
        Ok(())
    }
}

impl<T: Validate> Validate for PaginatedResponse<T> {
    fn validate(&self) -> Result<(), SchemaViolation> {
        self.validate_envelope()?;
        validate_each("items", &self.items)
    }
}

/// What a caller does with a list response that contains malformed records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RejectPolicy {
    /// Drop only the malformed records and keep the rest.
    Record,
    /// Reject the whole response.
    #[default]
    Response,
}

impl std::str::FromStr for RejectPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "record" => Ok(RejectPolicy::Record),
            "response" => Ok(RejectPolicy::Response),
            other => Err(format!(
                "unknown reject policy '{other}' (expected record|response)"
            )),
        }
    }
}

/// Result of decoding a page under [`RejectPolicy::Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct PageOutcome<T> {
    pub page: PaginatedResponse<T>,
    /// Index in the original `items` array and the reason each dropped record was rejected.
    pub rejected: Vec<(usize, SchemaViolation)>,
}

impl<T> PageOutcome<T> {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}
