use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::BoxError;

use super::records::{
    ArticleRecord, AuthorRecord, EditorialRecord, ExternalUserRecord, HistoryEntryRecord, Id,
    InteractionRecord, VolumeRecord,
};

/// Narrow bulk-read surface of the platform's document store.
///
/// Every operation takes an unordered, deduplicated key slice and returns all
/// matching records in whatever order the store produces them; it need not
/// cover every requested key. Implementations own their own connection
/// handling, timeouts and retries — the loader layer never retries.
#[async_trait]
pub trait MagazineStore: Send + Sync {
    async fn authors_by_ids(&self, ids: &[Id]) -> Result<Vec<AuthorRecord>, BoxError>;
    async fn editorials_by_ids(&self, ids: &[Id]) -> Result<Vec<EditorialRecord>, BoxError>;
    async fn volumes_by_ids(&self, ids: &[Id]) -> Result<Vec<VolumeRecord>, BoxError>;
    async fn external_users_by_ids(&self, ids: &[Id]) -> Result<Vec<ExternalUserRecord>, BoxError>;

    /// Top-level comments posted under any of the given articles.
    async fn comments_by_article_ids(
        &self,
        article_ids: &[Id],
    ) -> Result<Vec<InteractionRecord>, BoxError>;

    /// Replies answering any of the given interactions.
    async fn replies_by_parent_ids(
        &self,
        parent_ids: &[Id],
    ) -> Result<Vec<InteractionRecord>, BoxError>;

    async fn history_by_editorial_ids(
        &self,
        editorial_ids: &[Id],
    ) -> Result<Vec<HistoryEntryRecord>, BoxError>;

    async fn articles_by_volume_ids(
        &self,
        volume_ids: &[Id],
    ) -> Result<Vec<ArticleRecord>, BoxError>;
}

/// One bulk read issued against a [`MemoryStore`], kept for assertions on
/// batching behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRead {
    pub op: &'static str,
    pub keys: Vec<Id>,
}

/// In-memory [`MagazineStore`] backed by plain vectors.
///
/// Used by the integration tests and handy for embedders wiring resolvers up
/// before a real store exists. Every bulk read is recorded so callers can
/// assert how often and with which key sets the store was hit.
#[derive(Default)]
pub struct MemoryStore {
    pub authors: Vec<AuthorRecord>,
    pub editorials: Vec<EditorialRecord>,
    pub volumes: Vec<VolumeRecord>,
    pub external_users: Vec<ExternalUserRecord>,
    pub articles: Vec<ArticleRecord>,
    pub interactions: Vec<InteractionRecord>,
    pub history: Vec<HistoryEntryRecord>,
    reads: Mutex<Vec<BulkRead>>,
}

impl MemoryStore {
    /// All bulk reads issued so far, in order.
    pub fn reads(&self) -> Vec<BulkRead> {
        self.reads.lock().expect("reads lock").clone()
    }

    /// Number of bulk reads issued for one operation.
    pub fn reads_for(&self, op: &str) -> usize {
        self.reads().iter().filter(|r| r.op == op).count()
    }

    fn record(&self, op: &'static str, keys: &[Id]) {
        self.reads.lock().expect("reads lock").push(BulkRead { op, keys: keys.to_vec() });
    }
}

#[async_trait]
impl MagazineStore for MemoryStore {
    async fn authors_by_ids(&self, ids: &[Id]) -> Result<Vec<AuthorRecord>, BoxError> {
        self.record("authors_by_ids", ids);
        Ok(self.authors.iter().filter(|a| ids.contains(&a.id)).cloned().collect())
    }

    async fn editorials_by_ids(&self, ids: &[Id]) -> Result<Vec<EditorialRecord>, BoxError> {
        self.record("editorials_by_ids", ids);
        Ok(self.editorials.iter().filter(|e| ids.contains(&e.id)).cloned().collect())
    }

    async fn volumes_by_ids(&self, ids: &[Id]) -> Result<Vec<VolumeRecord>, BoxError> {
        self.record("volumes_by_ids", ids);
        Ok(self.volumes.iter().filter(|v| ids.contains(&v.id)).cloned().collect())
    }

    async fn external_users_by_ids(&self, ids: &[Id]) -> Result<Vec<ExternalUserRecord>, BoxError> {
        self.record("external_users_by_ids", ids);
        Ok(self.external_users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn comments_by_article_ids(
        &self,
        article_ids: &[Id],
    ) -> Result<Vec<InteractionRecord>, BoxError> {
        self.record("comments_by_article_ids", article_ids);
        Ok(self
            .interactions
            .iter()
            .filter(|i| i.parent_id.is_none() && article_ids.contains(&i.article_id))
            .cloned()
            .collect())
    }

    async fn replies_by_parent_ids(
        &self,
        parent_ids: &[Id],
    ) -> Result<Vec<InteractionRecord>, BoxError> {
        self.record("replies_by_parent_ids", parent_ids);
        Ok(self
            .interactions
            .iter()
            .filter(|i| i.parent_id.as_ref().is_some_and(|p| parent_ids.contains(p)))
            .cloned()
            .collect())
    }

    async fn history_by_editorial_ids(
        &self,
        editorial_ids: &[Id],
    ) -> Result<Vec<HistoryEntryRecord>, BoxError> {
        self.record("history_by_editorial_ids", editorial_ids);
        Ok(self
            .history
            .iter()
            .filter(|h| editorial_ids.contains(&h.editorial_id))
            .cloned()
            .collect())
    }

    async fn articles_by_volume_ids(
        &self,
        volume_ids: &[Id],
    ) -> Result<Vec<ArticleRecord>, BoxError> {
        self.record("articles_by_volume_ids", volume_ids);
        Ok(self
            .articles
            .iter()
            .filter(|a| a.volume_id.as_ref().is_some_and(|v| volume_ids.contains(v)))
            .cloned()
            .collect())
    }
}
