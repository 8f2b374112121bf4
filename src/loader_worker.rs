use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::slice;

use futures::future::FutureExt;
use tokio::sync::mpsc;

use crate::{
    cache::OutcomeCache,
    error::LoadError,
    indexer::Indexer,
    loader_op::{LoadRequest, LoaderOp},
    worker_stats::WorkerStats,
};

/// A `LoaderWorker` is the "single-thread" worker task that actually does the
/// dispatch work for one loader instance.
///
/// Once started, it runs in a loop until the parent loader aborts its
/// `JoinHandle` or drops the request queue tx channel. Aborting mid-flight is
/// the cancellation path: staged keys and pending callers die with the task
/// and no further bulk reads are issued.
///
/// The worker can be in one of three states during its lifetime:
///
/// 1. Waiting for requests.
/// 2. Flushing the request queue and staging keys for dispatch.
/// 3. Executing the bulk fetch for the staged keys.
///
/// One cycle through this loop is a collection window.
///
/// In state (1), the worker awaits any message on the request queue channel,
/// idling until work arrives.
///
/// In state (2), the worker synchronously pulls requests from the queue until
/// the queue reports empty, so every key registered by the current wave of
/// resolvers lands in the same batch. Prime and Clear requests are applied to
/// the cache immediately. For Load requests, the worker answers straight from
/// the cache when every requested key already has an outcome; otherwise it
/// stages the unresolved keys and parks the request.
///
/// In state (3), the worker sorts and dedups the staged keys and runs its
/// [`Indexer`] exactly once over them. On success, the indexed outcomes (one
/// per staged key, misses included) go into the cache and every parked
/// request is answered from it. On failure, every parked request is failed
/// with the same error and the instance is poisoned: subsequent loads fail
/// fast for the rest of the request scope.
pub struct LoaderWorker<K, Out, I, CacheT, ContextT>
where
    K: 'static + Eq + Ord + Hash + Clone + Debug + Send + Sync,
    Out: 'static + Send + Clone + Default + Debug,
    I: Indexer<K, Out, Context = ContextT> + Send,
    CacheT: OutcomeCache,
    ContextT: Send + Sync + 'static,
{
    cache: CacheT,
    request_rx: mpsc::UnboundedReceiver<LoaderOp<K, Out>>,
    keys_to_load: Vec<K>,
    pending_requests: Vec<LoadRequest<K, Out>>,
    context: ContextT,
    poisoned: bool,
    stats: WorkerStats,
    phantom_indexer: PhantomData<I>,
}

impl<K, Out, I, CacheT, ContextT> LoaderWorker<K, Out, I, CacheT, ContextT>
where
    K: 'static + Eq + Ord + Hash + Clone + Debug + Send + Sync,
    Out: 'static + Send + Clone + Default + Debug,
    I: Indexer<K, Out, Context = ContextT> + Send,
    CacheT: OutcomeCache<K = K, Out = Out>,
    ContextT: Send + Sync + 'static,
{
    pub fn new(
        cache: CacheT,
        request_rx: mpsc::UnboundedReceiver<LoaderOp<K, Out>>,
        context: ContextT,
    ) -> Self {
        Self {
            cache,
            request_rx,
            keys_to_load: Vec::new(),
            pending_requests: Vec::new(),
            context,
            poisoned: false,
            stats: WorkerStats::new(std::any::type_name::<(K, Out)>()),
            phantom_indexer: PhantomData,
        }
    }

    pub async fn start(mut self) {
        loop {
            // Async await until we receive the first op.
            match self.request_rx.recv().await {
                None => {
                    tracing::info!("tx channel closed, terminating loader worker");
                    return;
                }
                Some(op) => self.mux_op(op),
            }
            // Flush the remainder of the op queue before dispatching, so that
            // every sibling resolver that has already registered its keys
            // shares the batch.
            while let Some(Some(op)) = self.request_rx.recv().now_or_never() {
                self.mux_op(op);
            }
            if !self.pending_requests.is_empty() {
                self.execute_dispatch().await;
            }
        }
    }

    #[tracing::instrument(skip(self))]
    fn mux_op(&mut self, op: LoaderOp<K, Out>) {
        match op {
            LoaderOp::Load(request) => self.stage_load(request),
            LoaderOp::Prime(key, outcome) => self.cache.insert(key, outcome),
            LoaderOp::PrimeMany(entries) => self.cache.insert_many(entries),
            LoaderOp::Clear(key) => self.cache.remove(slice::from_ref(&key)),
            LoaderOp::ClearMany(keys) => self.cache.remove(&keys),
            LoaderOp::ClearAll => self.cache.flush(),
        }
    }

    fn stage_load(&mut self, request: LoadRequest<K, Out>) {
        if self.poisoned {
            request.fail(LoadError::Poisoned);
            return;
        }
        let requested = request.keys().len();
        self.stats.record_load_request(requested as u32);

        let cached = self.cache.get_key_vals(request.keys());
        let keys_to_load = cached
            .iter()
            .filter_map(|(k, outcome)| if outcome.is_none() { Some((*k).clone()) } else { None })
            .collect::<Vec<_>>();
        tracing::debug!(requested_keys = ?request.keys(), ?keys_to_load);
        self.stats.record_cache_hits((requested - keys_to_load.len()) as u32);
        if keys_to_load.is_empty() {
            let outcomes = cached.into_iter().map(|(_k, outcome)| outcome).collect::<Vec<_>>();
            request.resolve(outcomes);
        } else {
            self.keys_to_load.extend(keys_to_load);
            self.pending_requests.push(request);
        }
    }

    #[tracing::instrument(skip(self))]
    async fn execute_dispatch(&mut self) {
        self.keys_to_load.sort();
        self.keys_to_load.dedup();
        self.stats.record_dispatch(self.keys_to_load.len() as u32);

        match I::fetch_indexed(&self.keys_to_load, &self.context).await {
            Ok(outcomes) => {
                tracing::debug!(?outcomes);
                self.cache.insert_many(outcomes);
                for request in self.pending_requests.drain(..) {
                    let outcomes = self.cache.get(request.keys());
                    request.resolve(outcomes);
                }
            }
            Err(error) => {
                tracing::warn!(%error, "bulk fetch failed, failing every pending request in the batch");
                self.stats.record_dispatch_failed();
                for request in self.pending_requests.drain(..) {
                    request.fail(error.clone());
                }
                self.poisoned = true;
            }
        }
        self.keys_to_load.clear();
    }
}
