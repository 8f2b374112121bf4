use std::fmt;
use std::sync::Arc;

/// Document identifier as stored by the platform: an opaque string compared
/// by value. Cloning is cheap, so ids double as loader keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(Arc<str>);

impl Id {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Id {
    fn from(raw: &str) -> Self {
        Id(Arc::from(raw))
    }
}

impl From<String> for Id {
    fn from(raw: String) -> Self {
        Id(Arc::from(raw))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Staff writer or editor credited on articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRecord {
    pub id: Id,
    pub display_name: String,
    pub bio: Option<String>,
}

/// Reader account held by an external identity provider; referenced by
/// interactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalUserRecord {
    pub id: Id,
    pub handle: String,
    pub tenant: String,
}

/// A published issue of the magazine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeRecord {
    pub id: Id,
    pub title: String,
    pub issue_number: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorialState {
    Draft,
    InReview,
    Approved,
    Published,
}

/// Editorial workflow item an article moves through before publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorialRecord {
    pub id: Id,
    pub title: String,
    pub state: EditorialState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub id: Id,
    pub title: String,
    /// Workflow item this article is tracked under; absent for imported
    /// legacy content.
    pub editorial_id: Option<Id>,
    /// Volume the article was published in; absent while unpublished.
    pub volume_id: Option<Id>,
    /// Credited authors, in byline order.
    pub author_ids: Vec<Id>,
    /// Position within its volume's table of contents.
    pub position_in_volume: u32,
}

/// Reader comment or reply. Replies carry the id of the interaction they
/// answer in `parent_id`; top-level comments have none. Both always reference
/// the article they were posted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRecord {
    pub id: Id,
    pub article_id: Id,
    pub parent_id: Option<Id>,
    /// Absent for anonymous interactions.
    pub commenter_id: Option<Id>,
    pub body: String,
    /// Unix milliseconds, assigned by the document store on insert.
    pub created_at: u64,
}

/// One step of an editorial's workflow history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntryRecord {
    pub id: Id,
    pub editorial_id: Id,
    pub action: String,
    pub actor_id: Option<Id>,
    /// Unix milliseconds, assigned by the document store on insert.
    pub recorded_at: u64,
}
