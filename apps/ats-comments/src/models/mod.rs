//! Record model shared by candidate comments, position comments and candidate reviews.

pub mod comment;
pub mod record;
pub mod review;
pub mod score;

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use comment::Comment;
pub use record::{Author, ReviewStatus, Scope, Subject, Visibility};
pub use review::Review;
pub use score::ScoreLevel;

/// The comment-like shape every record in a section satisfies.
///
/// The section, form and list only see records through this trait. Type-specific
/// data (free text vs. a score) is exposed through `body` and `score`.
pub trait Remark: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn subject(&self) -> Subject;
    fn scope(&self) -> Scope;
    fn visibility(&self) -> Visibility;
    fn review_status(&self) -> ReviewStatus;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn author(&self) -> &Author;
    fn body(&self) -> Option<&str>;
    fn workflow_name(&self) -> Option<&str>;
    fn stage_name(&self) -> Option<&str>;

    fn score(&self) -> Option<ScoreLevel> {
        None
    }

    /// A record is edited once its update timestamp moves past creation.
    fn is_edited(&self) -> bool {
        self.updated_at() != self.created_at()
    }
}
