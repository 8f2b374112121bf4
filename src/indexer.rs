use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::{
    error::{LoadError, LoadResult},
    source::{BatchSource, GroupSource},
};

/// Runs one bulk fetch and turns the flat result into an outcome for every
/// staged key.
///
/// The two implementations are the two indexing policies the loaders support:
/// key records by their own identifier (one-to-one) or group them by a
/// foreign-key field (one-to-many). Either way the returned vec holds exactly
/// one entry per requested key, so absent keys are cached as explicit misses
/// and are not refetched later in the same request.
#[async_trait]
pub(crate) trait Indexer<K, Out>: 'static {
    type Context;

    async fn fetch_indexed(keys: &[K], context: &Self::Context) -> LoadResult<Vec<(K, Out)>>;
}

/// One-to-one indexing under the record's own id.
pub(crate) struct ById<F>(PhantomData<F>);

#[async_trait]
impl<K, V, F> Indexer<K, Option<V>> for ById<F>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Send,
    F: 'static + BatchSource<K, V>,
    F::Context: Sync,
{
    type Context = F::Context;

    async fn fetch_indexed(keys: &[K], context: &F::Context) -> LoadResult<Vec<(K, Option<V>)>> {
        let records = F::fetch(keys, context).await.map_err(LoadError::fetch)?;
        let mut by_id = HashMap::with_capacity(records.len());
        for record in records {
            // A duplicate id is an upstream integrity problem; last seen wins.
            by_id.insert(F::entity_id(&record), record);
        }
        Ok(keys.iter().map(|key| (key.clone(), by_id.remove(key))).collect())
    }
}

/// One-to-many indexing under a foreign-key field.
pub(crate) struct ByGroup<F>(PhantomData<F>);

#[async_trait]
impl<K, V, F> Indexer<K, Vec<V>> for ByGroup<F>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Send,
    F: 'static + GroupSource<K, V>,
    F::Context: Sync,
{
    type Context = F::Context;

    async fn fetch_indexed(keys: &[K], context: &F::Context) -> LoadResult<Vec<(K, Vec<V>)>> {
        let records = F::fetch(keys, context).await.map_err(LoadError::fetch)?;
        let mut groups: HashMap<K, Vec<V>> = HashMap::new();
        for record in records {
            groups.entry(F::group_key(&record)).or_default().push(record);
        }
        let outcomes = keys
            .iter()
            .map(|key| {
                let mut group = groups.remove(key).unwrap_or_default();
                group.sort_by(|a, b| F::sort_key(a).cmp(&F::sort_key(b)));
                (key.clone(), group)
            })
            .collect();
        if !groups.is_empty() {
            tracing::debug!(
                stray_groups = groups.len(),
                "bulk fetch returned records for keys that were never staged; dropping them"
            );
        }
        Ok(outcomes)
    }
}
