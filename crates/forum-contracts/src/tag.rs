use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::{SchemaViolation, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Tag {
    #[schemars(length(min = 1))]
    pub name: String,
    pub thread_count: u64,
}

impl Validate for Tag {
    fn validate(&self) -> Result<(), SchemaViolation> {
        if self.name.trim().is_empty() {
            return Err(SchemaViolation::at("name", "non-blank text", "blank string"));
        }
        Ok(())
    }
}

/// Canonical form of a user-supplied tag label: NFKC, trimmed, lowercased.
/// Returns `None` for labels that are blank after trimming.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let normalized = raw.nfkc().collect::<String>();
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Normalizes a batch of labels into the sorted, de-duplicated set a thread would carry.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags: Vec<String> = raw
        .into_iter()
        .filter_map(|t| normalize_tag(t.as_ref()))
        .collect();
    tags.sort();
    tags.dedup();
    tags
}
