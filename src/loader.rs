use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tokio::sync::{mpsc, oneshot};
use tracing_futures::Instrument;

use crate::{
    error::LoadResult,
    indexer::{ByGroup, ById},
    loader_op::{LoadRequest, LoaderOp},
    loader_worker::LoaderWorker,
    source::{BatchSource, GroupSource},
};

/// Batch loads single records from some expensive resource, primarily
/// intended for mitigating GraphQL's N+1 problem on one-to-one relations
/// (article to editorial, interaction to commenter profile).
///
/// Users call [`Loader::load`] and [`Loader::load_many`] to fetch records
/// from the underlying resource or cache. Outcomes can be seeded out-of-band
/// with [`Loader::prime`] / [`Loader::prime_many`] and forgotten with
/// [`Loader::clear`], [`Loader::clear_many`] and [`Loader::clear_all`].
///
/// A loader is scoped to one request execution: construct it (usually via a
/// request-scoped container) when the request starts and drop it when the
/// request completes. Dropping the loader aborts its worker task, which
/// abandons any in-flight batch without issuing further bulk reads. Nothing
/// is shared between instances, so two requests can never observe each
/// other's cached outcomes.
///
/// The `Loader` struct acts as an intermediary between the async domain in
/// which `load` calls are invoked and the pseudo-single-threaded domain of
/// the `LoaderWorker`. Callers can invoke the `Loader` from multiple parallel
/// tasks; requested operations are enqueued on the request queue and
/// processed sequentially by the worker, which answers through oneshot
/// channels.
pub struct Loader<K, V>
where
    K: 'static + Eq + Debug + Clone + Send,
    V: 'static + Send + Debug + Clone,
{
    request_tx: mpsc::UnboundedSender<LoaderOp<K, Option<V>>>,
    load_task_handle: tokio::task::JoinHandle<()>,
}

impl<K, V> Drop for Loader<K, V>
where
    K: 'static + Eq + Debug + Clone + Send,
    V: 'static + Send + Debug + Clone,
{
    fn drop(&mut self) {
        self.load_task_handle.abort();
    }
}

impl<K, V> Loader<K, V>
where
    K: 'static + Eq + Ord + Hash + Clone + Debug + Send + Sync,
    V: 'static + Send + Sync + Debug + Clone,
{
    /// Creates a new loader instance for the provided [`BatchSource`] and
    /// context.
    ///
    /// Note: the source is passed in as a marker for type inference.
    pub fn new<F, ContextT>(_: F, context: ContextT) -> Self
    where
        ContextT: Send + Sync + 'static,
        F: 'static + BatchSource<K, V, Context = ContextT> + Send,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker =
            LoaderWorker::<K, Option<V>, ById<F>, HashMap<K, Option<V>>, ContextT>::new(
                HashMap::new(),
                rx,
                context,
            );
        let span = tracing::span!(
            tracing::Level::TRACE,
            "loader_worker",
            kv = std::any::type_name::<(K, V)>()
        );
        Self {
            request_tx: tx,
            load_task_handle: tokio::task::spawn(worker.start().instrument(span)),
        }
    }
}

impl<K, V> Loader<K, V>
where
    K: 'static + Eq + Debug + Clone + Send,
    V: 'static + Send + Debug + Clone,
{
    /// Loads a record from the underlying resource.
    ///
    /// Resolves to `Ok(None)` if the source returned no record for the key; a
    /// missing record is a valid outcome, not an error. Fails only when the
    /// bulk fetch behind the batch failed, or when this instance was poisoned
    /// by an earlier failed batch.
    ///
    /// If the key already has a cached outcome, it is returned as soon as the
    /// request is processed. Otherwise the key is staged for batch loading in
    /// the worker's next collection window.
    pub async fn load(&self, key: K) -> LoadResult<Option<V>> {
        let (response_tx, response_rx) = oneshot::channel();
        self.request_tx
            .send(LoaderOp::Load(LoadRequest::One(key, response_tx)))
            .expect("load after the loader's request scope ended");
        response_rx.await.expect("loader worker dropped a pending load")
    }

    /// Loads many records at once.
    ///
    /// Outcomes are returned in the order the keys were given, with `None`
    /// for every key the source returned no record for.
    pub async fn load_many(&self, keys: Vec<K>) -> LoadResult<Vec<Option<V>>> {
        let (response_tx, response_rx) = oneshot::channel();
        self.request_tx
            .send(LoaderOp::Load(LoadRequest::Many(keys, response_tx)))
            .expect("load after the loader's request scope ended");
        response_rx.await.expect("loader worker dropped a pending load")
    }

    /// Adds a record to the cache.
    pub fn prime(&self, key: K, value: V) {
        self.request_tx
            .send(LoaderOp::Prime(key, Some(value)))
            .expect("prime after the loader's request scope ended");
    }

    /// Adds many records to the cache at once.
    pub fn prime_many(&self, key_vals: Vec<(K, V)>) {
        let entries = key_vals.into_iter().map(|(k, v)| (k, Some(v))).collect();
        self.request_tx
            .send(LoaderOp::PrimeMany(entries))
            .expect("prime after the loader's request scope ended");
    }

    /// Removes a key's outcome from the cache.
    ///
    /// The key will be refetched when it is next requested.
    pub fn clear(&self, key: K) {
        self.request_tx
            .send(LoaderOp::Clear(key))
            .expect("clear after the loader's request scope ended");
    }

    /// Removes multiple outcomes from the cache at once.
    pub fn clear_many(&self, keys: Vec<K>) {
        self.request_tx
            .send(LoaderOp::ClearMany(keys))
            .expect("clear after the loader's request scope ended");
    }

    /// Empties the cache entirely.
    pub fn clear_all(&self) {
        self.request_tx
            .send(LoaderOp::ClearAll)
            .expect("clear after the loader's request scope ended");
    }
}

/// Batch loads *groups* of records keyed by a foreign-key field, for
/// one-to-many relations (comments per article, replies per comment, history
/// entries per editorial, articles per volume).
///
/// Where [`Loader`] resolves a key to at most one record, a `GroupedLoader`
/// resolves a key to the ordered list of records referencing it — empty when
/// nothing does, never an error. Scoping, batching and failure semantics are
/// identical to [`Loader`].
pub struct GroupedLoader<K, V>
where
    K: 'static + Eq + Debug + Clone + Send,
    V: 'static + Send + Debug + Clone,
{
    request_tx: mpsc::UnboundedSender<LoaderOp<K, Vec<V>>>,
    load_task_handle: tokio::task::JoinHandle<()>,
}

impl<K, V> Drop for GroupedLoader<K, V>
where
    K: 'static + Eq + Debug + Clone + Send,
    V: 'static + Send + Debug + Clone,
{
    fn drop(&mut self) {
        self.load_task_handle.abort();
    }
}

impl<K, V> GroupedLoader<K, V>
where
    K: 'static + Eq + Ord + Hash + Clone + Debug + Send + Sync,
    V: 'static + Send + Sync + Debug + Clone,
{
    /// Creates a new grouped loader instance for the provided [`GroupSource`]
    /// and context.
    ///
    /// Note: the source is passed in as a marker for type inference.
    pub fn new<F, ContextT>(_: F, context: ContextT) -> Self
    where
        ContextT: Send + Sync + 'static,
        F: 'static + GroupSource<K, V, Context = ContextT> + Send,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = LoaderWorker::<K, Vec<V>, ByGroup<F>, HashMap<K, Vec<V>>, ContextT>::new(
            HashMap::new(),
            rx,
            context,
        );
        let span = tracing::span!(
            tracing::Level::TRACE,
            "grouped_loader_worker",
            kv = std::any::type_name::<(K, V)>()
        );
        Self {
            request_tx: tx,
            load_task_handle: tokio::task::spawn(worker.start().instrument(span)),
        }
    }
}

impl<K, V> GroupedLoader<K, V>
where
    K: 'static + Eq + Hash + Debug + Clone + Send,
    V: 'static + Send + Debug + Clone,
{
    /// Loads the group for a single owner key, flattened to a plain list.
    ///
    /// A key no record references resolves to an empty list.
    pub async fn load(&self, key: K) -> LoadResult<Vec<V>> {
        let (response_tx, response_rx) = oneshot::channel();
        self.request_tx
            .send(LoaderOp::Load(LoadRequest::One(key, response_tx)))
            .expect("load after the loader's request scope ended");
        response_rx.await.expect("loader worker dropped a pending load")
    }

    /// Loads the groups for many owner keys at once, as a key-to-group map.
    pub async fn load_many(&self, keys: Vec<K>) -> LoadResult<HashMap<K, Vec<V>>> {
        let (response_tx, response_rx) = oneshot::channel();
        self.request_tx
            .send(LoaderOp::Load(LoadRequest::Many(keys.clone(), response_tx)))
            .expect("load after the loader's request scope ended");
        let groups = response_rx.await.expect("loader worker dropped a pending load")?;
        Ok(keys.into_iter().zip(groups).collect())
    }

    /// Seeds a key's full group in the cache.
    pub fn prime(&self, key: K, group: Vec<V>) {
        self.request_tx
            .send(LoaderOp::Prime(key, group))
            .expect("prime after the loader's request scope ended");
    }

    /// Removes a key's group from the cache so it is refetched on next use.
    pub fn clear(&self, key: K) {
        self.request_tx
            .send(LoaderOp::Clear(key))
            .expect("clear after the loader's request scope ended");
    }

    /// Empties the cache entirely.
    pub fn clear_all(&self) {
        self.request_tx
            .send(LoaderOp::ClearAll)
            .expect("clear after the loader's request scope ended");
    }
}
