use std::fmt::Debug;
use std::slice;

use tokio::sync::oneshot;

use crate::error::{LoadError, LoadResult};

/// Set of possible requests that can be sent to the `LoaderWorker`.
///
/// The three categories of commands are Load, Prime, and Clear; Load is the
/// only one a caller waits on. `Out` is the loader's outcome type:
/// `Option<V>` for one-to-one loaders, `Vec<V>` for grouped loaders.
#[derive(Debug)]
pub enum LoaderOp<K, Out> {
    /// Resolve keys from the cache or the bulk-read collaborator.
    Load(LoadRequest<K, Out>),
    /// Seed outcomes that were obtained elsewhere.
    Prime(K, Out),
    PrimeMany(Vec<(K, Out)>),
    /// Forget outcomes so the keys are refetched when next requested.
    Clear(K),
    ClearMany(Vec<K>),
    ClearAll,
}

#[derive(Debug)]
pub enum LoadRequest<K, Out> {
    One(K, oneshot::Sender<LoadResult<Out>>),
    Many(Vec<K>, oneshot::Sender<LoadResult<Vec<Out>>>),
}

impl<K, Out> LoadRequest<K, Out>
where
    Out: Send + Clone + Default + Debug,
{
    pub fn keys(&self) -> &[K] {
        match self {
            LoadRequest::One(ref key, _) => slice::from_ref(key),
            LoadRequest::Many(ref keys, _) => keys,
        }
    }

    /// Answers the caller from cached outcomes, given in the same order as
    /// [`LoadRequest::keys`]. A key the cache has no entry for resolves to
    /// the outcome type's empty value (`None` / empty group).
    pub fn resolve<'a, I>(self, outcomes: I)
    where
        I: IntoIterator<Item = Option<&'a Out>>,
        Out: 'a,
    {
        match self {
            LoadRequest::One(_, response_tx) => {
                let outcome = outcomes.into_iter().next().flatten().cloned().unwrap_or_default();
                if let Err(e) = response_tx.send(Ok(outcome)) {
                    tracing::error!(?e, "receiver dropped");
                }
            }
            LoadRequest::Many(_, response_tx) => {
                let response =
                    outcomes.into_iter().map(|o| o.cloned().unwrap_or_default()).collect::<Vec<_>>();
                if let Err(e) = response_tx.send(Ok(response)) {
                    tracing::error!(?e, "receiver dropped");
                }
            }
        }
    }

    /// Fails the caller. Used to fan one batch failure out to every request
    /// that had a key staged in it.
    pub fn fail(self, error: LoadError) {
        match self {
            LoadRequest::One(_, response_tx) => {
                if let Err(e) = response_tx.send(Err(error)) {
                    tracing::error!(?e, "receiver dropped");
                }
            }
            LoadRequest::Many(_, response_tx) => {
                if let Err(e) = response_tx.send(Err(error)) {
                    tracing::error!(?e, "receiver dropped");
                }
            }
        }
    }
}
