use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{require_ordered, require_timestamp, SchemaViolation, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Post {
    #[schemars(range(min = 1))]
    pub id: u64,
    #[schemars(range(min = 1))]
    pub thread_id: u64,
    pub author_name: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
    pub upvotes: u64,
    pub downvotes: u64,
}

impl Post {
    /// Net vote balance; may be negative. Exact for any pair of counters.
    pub fn score(&self) -> i128 {
        i128::from(self.upvotes) - i128::from(self.downvotes)
    }
}

impl Validate for Post {
    fn validate(&self) -> Result<(), SchemaViolation> {
        require_ordered(&self.created_at, &self.updated_at)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Upvote,
    Downvote,
}

impl ReactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionType::Upvote => "upvote",
            ReactionType::Downvote => "downvote",
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionType {
    type Err = SchemaViolation;

    /// Case-sensitive; anything but the two literals is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(ReactionType::Upvote),
            "downvote" => Ok(ReactionType::Downvote),
            other => Err(SchemaViolation::at(
                "reaction_type",
                "one of [\"upvote\",\"downvote\"]",
                format!("string \"{other}\""),
            )),
        }
    }
}

/// A single up- or downvote cast on a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Reaction {
    #[schemars(range(min = 1))]
    pub id: u64,
    #[schemars(range(min = 1))]
    pub post_id: u64,
    pub reaction_type: ReactionType,
    pub reactor_name: String,
    pub created_at: String,
}

impl Validate for Reaction {
    fn validate(&self) -> Result<(), SchemaViolation> {
        require_timestamp("created_at", &self.created_at)?;
        Ok(())
    }
}
