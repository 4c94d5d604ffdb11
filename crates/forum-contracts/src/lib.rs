//! Payload contracts for the forum API: categories, threads, posts, reactions, tags,
//! pagination envelopes, statistics, trending rankings and search results.
//!
//! Every record derives a JSON Schema (via `schemars`) that is compiled once and used to
//! reject structurally malformed payloads before they are deserialized. Field-level rules
//! that a schema cannot express (timestamp ordering, pagination arithmetic, search result
//! variants) live in [`Validate`] implementations.

mod category;
mod consistency;
mod decode;
mod error;
mod kind;
mod nullable;
mod pagination;
mod post;
mod query;
mod requests;
mod search;
mod stats;
mod tag;
mod thread;
mod timestamp;

pub use category::*;
pub use consistency::*;
pub use decode::*;
pub use error::*;
pub use kind::*;
pub use nullable::*;
pub use pagination::*;
pub use post::*;
pub use query::*;
pub use requests::*;
pub use search::*;
pub use stats::*;
pub use tag::*;
pub use thread::*;
pub use timestamp::*;

/// Field-level validation layered on top of schema-compatible deserialization.
///
/// Implementations report the offending field relative to the record itself; containers
/// re-root nested violations with [`SchemaViolation::within`].
pub trait Validate {
    fn validate(&self) -> Result<(), SchemaViolation>;
}

/// Anything that can be schema-checked, deserialized and validated as a unit.
pub trait Contract: serde::de::DeserializeOwned + schemars::JsonSchema + Validate {}

impl<T> Contract for T where T: serde::de::DeserializeOwned + schemars::JsonSchema + Validate {}

/// Validates every record of a list, reporting the index of the first offender.
pub(crate) fn validate_each<T: Validate>(
    field: &str,
    records: &[T],
) -> Result<(), SchemaViolation> {
    for (idx, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|v| v.within(FieldPath::field(field).join(idx.to_string())))?;
    }
    Ok(())
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), SchemaViolation> {
        for (idx, record) in self.iter().enumerate() {
            record
                .validate()
                .map_err(|v| v.within(FieldPath::root().join(idx.to_string())))?;
        }
        Ok(())
    }
}
