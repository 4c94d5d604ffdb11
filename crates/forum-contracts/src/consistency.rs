//! Cross-record checks. Per-record decoding never runs these; the backend is trusted to keep
//! denormalized names and vote counters in step, and callers opt in when they hold both sides.

use crate::{Category, Post, Reaction, ReactionType, ThreadDetail};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyIssue {
    #[error("thread {thread_id} points at category {expected_id} but category {actual_id} was given")]
    CategoryMismatch {
        thread_id: u64,
        expected_id: u64,
        actual_id: u64,
    },
    #[error("thread {thread_id} carries category name '{carried}' but category {category_id} is '{actual}'")]
    StaleCategoryName {
        thread_id: u64,
        category_id: u64,
        carried: String,
        actual: String,
    },
    #[error("reaction {reaction_id} belongs to post {actual_post} not post {expected_post}")]
    ForeignReaction {
        reaction_id: u64,
        expected_post: u64,
        actual_post: u64,
    },
    #[error("post {post_id} reports {reported} {kind}s but {counted} reactions were found")]
    CounterMismatch {
        post_id: u64,
        kind: ReactionType,
        reported: u64,
        counted: u64,
    },
}

/// Confirms a thread's denormalized `category_name` against the category it references.
pub fn check_thread_category(
    thread: &ThreadDetail,
    category: &Category,
) -> Result<(), ConsistencyIssue> {
    if thread.category_id != category.id {
        return Err(ConsistencyIssue::CategoryMismatch {
            thread_id: thread.id,
            expected_id: thread.category_id,
            actual_id: category.id,
        });
    }
    if thread.category_name != category.name {
        return Err(ConsistencyIssue::StaleCategoryName {
            thread_id: thread.id,
            category_id: category.id,
            carried: thread.category_name.clone(),
            actual: category.name.clone(),
        });
    }
    Ok(())
}

/// Per-type reaction counts for one post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionTally {
    pub upvotes: u64,
    pub downvotes: u64,
}

impl ReactionTally {
    /// Counts the reactions addressed to `post_id`; reactions for other posts are an error.
    pub fn from_reactions(post_id: u64, reactions: &[Reaction]) -> Result<Self, ConsistencyIssue> {
        let mut tally = Self::default();
        for reaction in reactions {
            if reaction.post_id != post_id {
                return Err(ConsistencyIssue::ForeignReaction {
                    reaction_id: reaction.id,
                    expected_post: post_id,
                    actual_post: reaction.post_id,
                });
            }
            tally.add(reaction.reaction_type);
        }
        Ok(tally)
    }

    pub fn add(&mut self, kind: ReactionType) {
        match kind {
            ReactionType::Upvote => self.upvotes += 1,
            ReactionType::Downvote => self.downvotes += 1,
        }
    }

    pub fn get(&self, kind: ReactionType) -> u64 {
        match kind {
            ReactionType::Upvote => self.upvotes,
            ReactionType::Downvote => self.downvotes,
        }
    }
}

/// Confirms a post's vote counters against the full list of its reactions.
pub fn check_post_tally(post: &Post, reactions: &[Reaction]) -> Result<(), ConsistencyIssue> {
    let tally = ReactionTally::from_reactions(post.id, reactions)?;
    for (kind, reported) in [
        (ReactionType::Upvote, post.upvotes),
        (ReactionType::Downvote, post.downvotes),
    ] {
        let counted = tally.get(kind);
        if counted != reported {
            return Err(ConsistencyIssue::CounterMismatch {
                post_id: post.id,
                kind,
                reported,
                counted,
            });
        }
    }
    Ok(())
}
