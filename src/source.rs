use async_trait::async_trait;

use crate::error::BoxError;

/// A `BatchSource` defines the single bulk read behind a one-to-one
/// [`Loader`](crate::Loader). It receives the deduplicated slice of keys that
/// were staged during the loader's most recent collection window, and some
/// user defined context struct (typically a handle to the store).
///
/// The source is not required to return a record for every key, and may
/// return records in any order; the loader indexes the result by
/// [`BatchSource::entity_id`] and resolves requesters of absent keys with
/// `None`. A missing record is a normal business outcome, not a fault —
/// faults are reported by returning `Err`, which fails the whole batch.
///
/// Multiple sources (and therefore loaders) can share the same context
/// (likely through an `Arc`).
#[async_trait]
pub trait BatchSource<K, V> {
    type Context;

    async fn fetch(ids: &[K], context: &Self::Context) -> Result<Vec<V>, BoxError>;

    /// The record's own identifier, used to index the bulk-read result.
    fn entity_id(record: &V) -> K;
}

/// A `GroupSource` defines the bulk read behind a
/// [`GroupedLoader`](crate::GroupedLoader): given a set of foreign-key
/// values, return every record that references one of them. The loader
/// groups the result by [`GroupSource::group_key`]; keys with no matching
/// records resolve to an empty group.
///
/// Each group is stably sorted by [`GroupSource::sort_key`] before it is
/// handed to callers, so group ordering never depends on the order the store
/// happened to return records in. Ties keep fetch order.
#[async_trait]
pub trait GroupSource<K, V> {
    type Context;
    type SortKey: Ord;

    async fn fetch(keys: &[K], context: &Self::Context) -> Result<Vec<V>, BoxError>;

    /// The foreign-key value this record is grouped under.
    fn group_key(record: &V) -> K;

    fn sort_key(record: &V) -> Self::SortKey;
}
