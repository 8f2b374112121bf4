//! Field-resolver adapters over the request's loaders.
//!
//! Each helper shapes a loader outcome the way one GraphQL field expects it:
//! a nullable single record, a list in the owner's declared order, or a
//! flattened group. The GraphQL engine drives many of these concurrently for
//! sibling objects; keys registered in the same scheduling wave share one
//! bulk read.

use crate::error::LoadResult;

use super::{
    loaders::RequestLoaders,
    records::{
        ArticleRecord, AuthorRecord, EditorialRecord, ExternalUserRecord, HistoryEntryRecord,
        InteractionRecord, VolumeRecord,
    },
};

/// `Article.editorial` — nullable single relation. An article with no
/// editorial resolves to null without staging a key.
pub async fn editorial_of(
    loaders: &RequestLoaders,
    article: &ArticleRecord,
) -> LoadResult<Option<EditorialRecord>> {
    match &article.editorial_id {
        None => Ok(None),
        Some(id) => loaders.editorials.load(id.clone()).await,
    }
}

/// `Article.volume` — nullable single relation.
pub async fn volume_of(
    loaders: &RequestLoaders,
    article: &ArticleRecord,
) -> LoadResult<Option<VolumeRecord>> {
    match &article.volume_id {
        None => Ok(None),
        Some(id) => loaders.volumes.load(id.clone()).await,
    }
}

/// `Article.authors` — list relation through an explicit id list. Keeps the
/// article's byline order and silently drops ids with no record.
pub async fn authors_of(
    loaders: &RequestLoaders,
    article: &ArticleRecord,
) -> LoadResult<Vec<AuthorRecord>> {
    if article.author_ids.is_empty() {
        return Ok(Vec::new());
    }
    let found = loaders.authors.load_many(article.author_ids.clone()).await?;
    Ok(found.into_iter().flatten().collect())
}

/// `Interaction.commenter` — nullable single relation against the external
/// identity provider. Anonymous interactions resolve to null without staging
/// a key.
pub async fn commenter_of(
    loaders: &RequestLoaders,
    interaction: &InteractionRecord,
) -> LoadResult<Option<ExternalUserRecord>> {
    match &interaction.commenter_id {
        None => Ok(None),
        Some(id) => loaders.external_users.load(id.clone()).await,
    }
}

/// `Article.comments` — reverse foreign-key relation: the article's own id
/// keys the grouped loader and the single resulting group is the list.
pub async fn comments_of(
    loaders: &RequestLoaders,
    article: &ArticleRecord,
) -> LoadResult<Vec<InteractionRecord>> {
    loaders.comments.load(article.id.clone()).await
}

/// `Interaction.replies` — reverse foreign-key relation; works at any
/// nesting depth since replies are interactions themselves.
pub async fn replies_of(
    loaders: &RequestLoaders,
    interaction: &InteractionRecord,
) -> LoadResult<Vec<InteractionRecord>> {
    loaders.replies.load(interaction.id.clone()).await
}

/// `Editorial.history` — reverse foreign-key relation.
pub async fn history_of(
    loaders: &RequestLoaders,
    editorial: &EditorialRecord,
) -> LoadResult<Vec<HistoryEntryRecord>> {
    loaders.editorial_history.load(editorial.id.clone()).await
}

/// `Volume.articles` — reverse foreign-key relation.
pub async fn articles_of(
    loaders: &RequestLoaders,
    volume: &VolumeRecord,
) -> LoadResult<Vec<ArticleRecord>> {
    loaders.volume_articles.load(volume.id.clone()).await
}
