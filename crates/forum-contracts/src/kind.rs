use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::{
    check, contract_schema, decode, decode_page, encode, Category, CategoryCreate, CategoryUpdate, Contract,
    ForumStats, PageRequest, PaginatedResponse, Post, PostCreate, PostUpdate, Reaction,
    ReactionCreate, RejectPolicy, SchemaViolation, SearchQuery, SearchResponse, SearchResult, Tag,
    TagsAdd, TagsAdded, ThreadCreate, ThreadDetail, ThreadListQuery, ThreadSummary, ThreadUpdate,
    TrendingThread,
};

macro_rules! contract_kinds {
    ($($variant:ident => $name:literal => $ty:ty),+ $(,)?) => {
        /// Every payload contract, addressable by name at runtime.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ContractKind {
            $($variant),+
        }

        impl ContractKind {
            pub const ALL: &'static [ContractKind] = &[$(ContractKind::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $(ContractKind::$variant => $name),+
                }
            }

            /// Violations `value` has against this contract; empty when it is valid.
            pub fn check(&self, value: &Value) -> Vec<SchemaViolation> {
                match self {
                    $(ContractKind::$variant => check::<$ty>(value)),+
                }
            }

            /// Decodes `value` under this contract and encodes the record again.
            pub fn round_trip(&self, value: &Value) -> Result<Value, SchemaViolation> {
                match self {
                    $(ContractKind::$variant => decode::<$ty>(value).and_then(|record| encode(&record))),+
                }
            }

            pub fn schema(&self) -> Value {
                match self {
                    $(ContractKind::$variant => contract_schema::<$ty>()),+
                }
            }
        }

        impl FromStr for ContractKind {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(ContractKind::$variant),)+
                    other => Err(format!(
                        "unknown contract '{other}' (run `forum-contract kinds` for the list)"
                    )),
                }
            }
        }
    };
}

contract_kinds! {
    Category => "category" => Category,
    CategoryList => "category-list" => Vec<Category>,
    CategoryPage => "category-page" => PaginatedResponse<Category>,
    ThreadSummary => "thread-summary" => ThreadSummary,
    ThreadDetail => "thread-detail" => ThreadDetail,
    ThreadPage => "thread-page" => PaginatedResponse<ThreadSummary>,
    Post => "post" => Post,
    PostPage => "post-page" => PaginatedResponse<Post>,
    Reaction => "reaction" => Reaction,
    ReactionList => "reaction-list" => Vec<Reaction>,
    Tag => "tag" => Tag,
    TagList => "tag-list" => Vec<Tag>,
    ForumStats => "forum-stats" => ForumStats,
    TrendingThread => "trending-thread" => TrendingThread,
    TrendingList => "trending-list" => Vec<TrendingThread>,
    SearchResult => "search-result" => SearchResult,
    SearchResponse => "search-response" => SearchResponse,
    CategoryCreate => "category-create" => CategoryCreate,
    CategoryUpdate => "category-update" => CategoryUpdate,
    ThreadCreate => "thread-create" => ThreadCreate,
    ThreadUpdate => "thread-update" => ThreadUpdate,
    PostCreate => "post-create" => PostCreate,
    PostUpdate => "post-update" => PostUpdate,
    ReactionCreate => "reaction-create" => ReactionCreate,
    TagsAdd => "tags-add" => TagsAdd,
    TagsAdded => "tags-added" => TagsAdded,
    PageRequest => "page-request" => PageRequest,
    ThreadListQuery => "thread-list-query" => ThreadListQuery,
    SearchQuery => "search-query" => SearchQuery,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Record types that arrive inside a pagination envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageItemKind {
    Category,
    Thread,
    Post,
}

impl FromStr for PageItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(PageItemKind::Category),
            "thread" => Ok(PageItemKind::Thread),
            "post" => Ok(PageItemKind::Post),
            other => Err(format!(
                "unknown page item '{other}' (expected category|thread|post)"
            )),
        }
    }
}

/// Type-erased summary of [`decode_page`] for callers that pick the item type at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct PageReport {
    pub kept: usize,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
    pub rejected: Vec<(usize, SchemaViolation)>,
}

impl PageItemKind {
    pub fn decode_page(
        &self,
        value: &Value,
        policy: RejectPolicy,
    ) -> Result<PageReport, SchemaViolation> {
        match self {
            PageItemKind::Category => report::<Category>(value, policy),
            PageItemKind::Thread => report::<ThreadSummary>(value, policy),
            PageItemKind::Post => report::<Post>(value, policy),
        }
    }
}

fn report<T: Contract>(
    value: &Value,
    policy: RejectPolicy,
) -> Result<PageReport, SchemaViolation> {
    let outcome = decode_page::<T>(value, policy)?;
    Ok(PageReport {
        kept: outcome.page.items.len(),
        total: outcome.page.total,
        page: outcome.page.page,
        total_pages: outcome.page.total_pages,
        rejected: outcome.rejected,
    })
}
