use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{require_timestamp, SchemaViolation, Validate};

/// Top-level grouping of threads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Category {
    #[schemars(range(min = 1))]
    pub id: u64,
    #[schemars(length(min = 1))]
    pub name: String,
    pub description: String,
    pub created_at: String,
    /// Cached count of threads filed under this category.
    pub thread_count: u64,
}

impl Validate for Category {
    fn validate(&self) -> Result<(), SchemaViolation> {
        if self.name.trim().is_empty() {
            return Err(SchemaViolation::at(
                "name",
                "non-blank text",
                "blank string",
            ));
        }
        require_timestamp("created_at", &self.created_at)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "id": 1,
            "name": "General",
            "description": "",
            "created_at": "2024-01-01 09:00:00",
            "thread_count": 4
        })
    }

    #[test]
    fn decodes_category_with_empty_description() {
        let category: Category = decode(&sample()).unwrap();
        assert_eq!(category.name, "General");
        assert_eq!(category.description, "");
        assert_eq!(category.thread_count, 4);
    }

    #[test]
    fn rejects_zero_id_and_negative_count() {
        let mut zero = sample();
        zero["id"] = json!(0);
        assert_eq!(decode::<Category>(&zero).unwrap_err().field(), Some("id"));

        let mut negative = sample();
        negative["thread_count"] = json!(-1);
        assert_eq!(
            decode::<Category>(&negative).unwrap_err().field(),
            Some("thread_count")
        );
    }

    #[test]
    fn rejects_blank_name() {
        let mut blank = sample();
        blank["name"] = json!("   ");
        assert_eq!(decode::<Category>(&blank).unwrap_err().field(), Some("name"));
    }
}
