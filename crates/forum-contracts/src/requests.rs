//! Bodies the client sends when creating or editing forum content.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{normalize_tags, ReactionType, SchemaViolation, Validate};

pub const MAX_CATEGORY_NAME_CHARS: usize = 100;
pub const MAX_TITLE_CHARS: usize = 300;
pub const MAX_AUTHOR_NAME_CHARS: usize = 50;

fn require_text(field: &str, value: &str, max_chars: Option<usize>) -> Result<(), SchemaViolation> {
    let chars = value.chars().count();
    let too_long = max_chars.is_some_and(|max| chars > max);
    if value.trim().is_empty() || too_long {
        let expected = match max_chars {
            Some(max) => format!("non-blank text of at most {max} characters"),
            None => "non-blank text".to_string(),
        };
        return Err(SchemaViolation::at(
            field,
            expected,
            format!("string of {chars} characters"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct CategoryCreate {
    #[schemars(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Validate for CategoryCreate {
    fn validate(&self) -> Result<(), SchemaViolation> {
        require_text("name", &self.name, Some(MAX_CATEGORY_NAME_CHARS))
    }
}

/// Partial update; absent fields are left unchanged.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct CategoryUpdate {
    #[serde(default)]
    #[schemars(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

impl Validate for CategoryUpdate {
    fn validate(&self) -> Result<(), SchemaViolation> {
        if let Some(name) = &self.name {
            require_text("name", name, Some(MAX_CATEGORY_NAME_CHARS))?;
        }
        Ok(())
    }
}

/// Opens a thread together with its first post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ThreadCreate {
    #[schemars(range(min = 1))]
    pub category_id: u64,
    #[schemars(length(min = 1, max = 300))]
    pub title: String,
    #[schemars(length(min = 1, max = 50))]
    pub author_name: String,
    /// Body of the opening post.
    #[schemars(length(min = 1))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ThreadCreate {
    /// Tags as they will be stored on the thread.
    pub fn normalized_tags(&self) -> Vec<String> {
        normalize_tags(&self.tags)
    }
}

impl Validate for ThreadCreate {
    fn validate(&self) -> Result<(), SchemaViolation> {
        require_text("title", &self.title, Some(MAX_TITLE_CHARS))?;
        require_text("author_name", &self.author_name, Some(MAX_AUTHOR_NAME_CHARS))?;
        require_text("content", &self.content, None)
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ThreadUpdate {
    #[serde(default)]
    #[schemars(length(min = 1, max = 300))]
    pub title: Option<String>,
    #[serde(default)]
    pub is_pinned: Option<bool>,
    #[serde(default)]
    pub is_locked: Option<bool>,
}

impl ThreadUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.is_pinned.is_none() && self.is_locked.is_none()
    }
}

impl Validate for ThreadUpdate {
    fn validate(&self) -> Result<(), SchemaViolation> {
        if let Some(title) = &self.title {
            require_text("title", title, Some(MAX_TITLE_CHARS))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct PostCreate {
    #[schemars(range(min = 1))]
    pub thread_id: u64,
    #[schemars(length(min = 1, max = 50))]
    pub author_name: String,
    #[schemars(length(min = 1))]
    pub content: String,
}

impl Validate for PostCreate {
    fn validate(&self) -> Result<(), SchemaViolation> {
        require_text("author_name", &self.author_name, Some(MAX_AUTHOR_NAME_CHARS))?;
        require_text("content", &self.content, None)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct PostUpdate {
    #[schemars(length(min = 1))]
    pub content: String,
}

impl Validate for PostUpdate {
    fn validate(&self) -> Result<(), SchemaViolation> {
        require_text("content", &self.content, None)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ReactionCreate {
    pub reaction_type: ReactionType,
    #[schemars(length(min = 1, max = 50))]
    pub reactor_name: String,
}

impl Validate for ReactionCreate {
    fn validate(&self) -> Result<(), SchemaViolation> {
        require_text("reactor_name", &self.reactor_name, Some(MAX_AUTHOR_NAME_CHARS))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct TagsAdd {
    #[schemars(length(min = 1))]
    pub tags: Vec<String>,
}

impl TagsAdd {
    pub fn normalized(&self) -> Vec<String> {
        normalize_tags(&self.tags)
    }
}

impl Validate for TagsAdd {
    fn validate(&self) -> Result<(), SchemaViolation> {
        if self.tags.is_empty() {
            return Err(SchemaViolation::at(
                "tags",
                "at least one tag",
                "array of 0 items",
            ));
        }
        Ok(())
    }
}

/// Tags attached to a thread after an add.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct TagsAdded {
    #[schemars(range(min = 1))]
    pub thread_id: u64,
    pub tags: Vec<String>,
}

impl Validate for TagsAdded {
    fn validate(&self) -> Result<(), SchemaViolation> {
        Ok(())
    }
}
