use std::error::Error;
use std::sync::Arc;

/// Error type returned by the bulk-read collaborators (document store,
/// external profile service). Loaders never inspect it; it is carried through
/// to every caller whose batch it failed.
pub type BoxError = Box<dyn Error + Send + Sync>;

pub type LoadResult<T> = Result<T, LoadError>;

/// Failure modes of a loader instance.
///
/// An absent key is not an error: one-to-one loads resolve it to `None` and
/// grouped loads to an empty list. `LoadError` only covers the cases where no
/// outcome could be produced at all.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    /// The bulk fetch behind a batch failed. Every caller with a key staged
    /// in that batch receives a clone of the same error; nothing is retried
    /// and no partial result is handed out.
    #[error("bulk fetch failed: {0}")]
    Fetch(Arc<dyn Error + Send + Sync>),

    /// The loader instance saw a failed batch earlier in its request scope.
    /// Later loads fail fast instead of re-querying a collaborator that is
    /// known to be unhealthy.
    #[error("loader instance disabled by an earlier failed batch")]
    Poisoned,
}

impl LoadError {
    pub(crate) fn fetch(source: BoxError) -> Self {
        LoadError::Fetch(Arc::from(source))
    }
}
