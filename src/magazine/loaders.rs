use std::sync::Arc;

use crate::loader::{GroupedLoader, Loader};

use super::{
    records::{
        ArticleRecord, AuthorRecord, EditorialRecord, ExternalUserRecord, HistoryEntryRecord, Id,
        InteractionRecord, VolumeRecord,
    },
    sources::{
        ArticlesByVolume, AuthorSource, CommentsByArticle, EditorialSource, ExternalUserSource,
        HistoryByEditorial, RepliesByParent, VolumeSource,
    },
    store::MagazineStore,
};

/// Every loader a request's resolvers need, one instance per relation.
///
/// Construct one at the start of request handling and pass it (by reference)
/// to every resolver; drop it when the request completes. Loaders hold no
/// state across requests, so two `RequestLoaders` never observe each other's
/// cached outcomes — request isolation falls out of the scoping rule rather
/// than any locking.
pub struct RequestLoaders {
    pub authors: Loader<Id, AuthorRecord>,
    pub editorials: Loader<Id, EditorialRecord>,
    pub volumes: Loader<Id, VolumeRecord>,
    pub external_users: Loader<Id, ExternalUserRecord>,
    pub comments: GroupedLoader<Id, InteractionRecord>,
    pub replies: GroupedLoader<Id, InteractionRecord>,
    pub editorial_history: GroupedLoader<Id, HistoryEntryRecord>,
    pub volume_articles: GroupedLoader<Id, ArticleRecord>,
}

impl RequestLoaders {
    pub fn new(store: Arc<dyn MagazineStore>) -> Self {
        Self {
            authors: Loader::new(AuthorSource, Arc::clone(&store)),
            editorials: Loader::new(EditorialSource, Arc::clone(&store)),
            volumes: Loader::new(VolumeSource, Arc::clone(&store)),
            external_users: Loader::new(ExternalUserSource, Arc::clone(&store)),
            comments: GroupedLoader::new(CommentsByArticle, Arc::clone(&store)),
            replies: GroupedLoader::new(RepliesByParent, Arc::clone(&store)),
            editorial_history: GroupedLoader::new(HistoryByEditorial, Arc::clone(&store)),
            volume_articles: GroupedLoader::new(ArticlesByVolume, store),
        }
    }
}
