//! The per-relation bulk-fetch definitions behind the request-scoped loaders.
//!
//! Each source is a stateless marker tying one loader to one bulk read on the
//! shared [`MagazineStore`] handle, plus the indexing fields the engine needs:
//! the record's own id for one-to-one relations, the foreign key and sort key
//! for grouped ones.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::BoxError,
    source::{BatchSource, GroupSource},
};

use super::{
    records::{
        ArticleRecord, AuthorRecord, EditorialRecord, ExternalUserRecord, HistoryEntryRecord, Id,
        InteractionRecord, VolumeRecord,
    },
    store::MagazineStore,
};

type Store = Arc<dyn MagazineStore>;

pub struct AuthorSource;

#[async_trait]
impl BatchSource<Id, AuthorRecord> for AuthorSource {
    type Context = Store;

    async fn fetch(ids: &[Id], store: &Store) -> Result<Vec<AuthorRecord>, BoxError> {
        store.authors_by_ids(ids).await
    }

    fn entity_id(record: &AuthorRecord) -> Id {
        record.id.clone()
    }
}

pub struct EditorialSource;

#[async_trait]
impl BatchSource<Id, EditorialRecord> for EditorialSource {
    type Context = Store;

    async fn fetch(ids: &[Id], store: &Store) -> Result<Vec<EditorialRecord>, BoxError> {
        store.editorials_by_ids(ids).await
    }

    fn entity_id(record: &EditorialRecord) -> Id {
        record.id.clone()
    }
}

pub struct VolumeSource;

#[async_trait]
impl BatchSource<Id, VolumeRecord> for VolumeSource {
    type Context = Store;

    async fn fetch(ids: &[Id], store: &Store) -> Result<Vec<VolumeRecord>, BoxError> {
        store.volumes_by_ids(ids).await
    }

    fn entity_id(record: &VolumeRecord) -> Id {
        record.id.clone()
    }
}

pub struct ExternalUserSource;

#[async_trait]
impl BatchSource<Id, ExternalUserRecord> for ExternalUserSource {
    type Context = Store;

    async fn fetch(ids: &[Id], store: &Store) -> Result<Vec<ExternalUserRecord>, BoxError> {
        store.external_users_by_ids(ids).await
    }

    fn entity_id(record: &ExternalUserRecord) -> Id {
        record.id.clone()
    }
}

/// Top-level comments grouped under their article, oldest first.
pub struct CommentsByArticle;

#[async_trait]
impl GroupSource<Id, InteractionRecord> for CommentsByArticle {
    type Context = Store;
    type SortKey = u64;

    async fn fetch(article_ids: &[Id], store: &Store) -> Result<Vec<InteractionRecord>, BoxError> {
        store.comments_by_article_ids(article_ids).await
    }

    fn group_key(record: &InteractionRecord) -> Id {
        record.article_id.clone()
    }

    fn sort_key(record: &InteractionRecord) -> u64 {
        record.created_at
    }
}

/// Replies grouped under the interaction they answer, oldest first.
pub struct RepliesByParent;

#[async_trait]
impl GroupSource<Id, InteractionRecord> for RepliesByParent {
    type Context = Store;
    type SortKey = u64;

    async fn fetch(parent_ids: &[Id], store: &Store) -> Result<Vec<InteractionRecord>, BoxError> {
        store.replies_by_parent_ids(parent_ids).await
    }

    fn group_key(record: &InteractionRecord) -> Id {
        // A top-level row can only come from a misbehaving store; grouping it
        // under its own id keeps it out of every requested group.
        record.parent_id.clone().unwrap_or_else(|| record.id.clone())
    }

    fn sort_key(record: &InteractionRecord) -> u64 {
        record.created_at
    }
}

/// Workflow history grouped under its editorial, in recorded order.
pub struct HistoryByEditorial;

#[async_trait]
impl GroupSource<Id, HistoryEntryRecord> for HistoryByEditorial {
    type Context = Store;
    type SortKey = u64;

    async fn fetch(
        editorial_ids: &[Id],
        store: &Store,
    ) -> Result<Vec<HistoryEntryRecord>, BoxError> {
        store.history_by_editorial_ids(editorial_ids).await
    }

    fn group_key(record: &HistoryEntryRecord) -> Id {
        record.editorial_id.clone()
    }

    fn sort_key(record: &HistoryEntryRecord) -> u64 {
        record.recorded_at
    }
}

/// Articles grouped under their volume, in table-of-contents order.
pub struct ArticlesByVolume;

#[async_trait]
impl GroupSource<Id, ArticleRecord> for ArticlesByVolume {
    type Context = Store;
    type SortKey = u32;

    async fn fetch(volume_ids: &[Id], store: &Store) -> Result<Vec<ArticleRecord>, BoxError> {
        store.articles_by_volume_ids(volume_ids).await
    }

    fn group_key(record: &ArticleRecord) -> Id {
        record.volume_id.clone().unwrap_or_else(|| record.id.clone())
    }

    fn sort_key(record: &ArticleRecord) -> u32 {
        record.position_in_volume
    }
}
