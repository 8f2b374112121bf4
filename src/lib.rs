mod cache;
mod error;
mod indexer;
mod loader;
mod loader_op;
mod loader_worker;
mod source;
mod worker_stats;

pub mod magazine;

pub use error::{BoxError, LoadError, LoadResult};
pub use loader::{GroupedLoader, Loader};
pub use source::{BatchSource, GroupSource};
