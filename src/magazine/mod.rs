//! The magazine platform's loader call sites: record types, the document
//! store's bulk-read surface, one source per relation, the request-scoped
//! loader container and the resolver-side adapters.

mod loaders;
mod records;
mod sources;
mod store;

pub mod resolve;

pub use loaders::RequestLoaders;
pub use records::{
    ArticleRecord, AuthorRecord, EditorialRecord, EditorialState, ExternalUserRecord,
    HistoryEntryRecord, Id, InteractionRecord, VolumeRecord,
};
pub use sources::{
    ArticlesByVolume, AuthorSource, CommentsByArticle, EditorialSource, ExternalUserSource,
    HistoryByEditorial, RepliesByParent, VolumeSource,
};
pub use store::{BulkRead, MagazineStore, MemoryStore};
