use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::record::{Author, ReviewStatus, Scope, ScopeKind, Subject, Visibility};
use crate::models::score::ScoreLevel;
use crate::models::Remark;

/// A scored review of a candidate. The comment text is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReviewWire", into = "ReviewWire")]
pub struct Review {
    pub id: Uuid,
    pub subject: Subject,
    pub score: ScoreLevel,
    pub comment: Option<String>,
    pub scope: Scope,
    pub visibility: Visibility,
    pub review_status: ReviewStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: Author,
    pub workflow_name: Option<String>,
    pub stage_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewWire {
    id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    company_candidate_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position_id: Option<Uuid>,
    score: ScoreLevel,
    #[serde(default)]
    comment: Option<String>,
    scope: ScopeKind,
    #[serde(default)]
    stage_id: Option<Uuid>,
    visibility: Visibility,
    review_status: ReviewStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: Uuid,
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    author_email: Option<String>,
    #[serde(default)]
    workflow_name: Option<String>,
    #[serde(default)]
    stage_name: Option<String>,
}

impl TryFrom<ReviewWire> for Review {
    type Error = String;

    fn try_from(wire: ReviewWire) -> Result<Self, Self::Error> {
        Ok(Review {
            id: wire.id,
            subject: Subject::from_wire(wire.company_candidate_id, wire.position_id)?,
            score: wire.score,
            comment: wire.comment,
            scope: Scope::from_wire(wire.scope, wire.stage_id)?,
            visibility: wire.visibility,
            review_status: wire.review_status,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            author: Author {
                id: wire.author_id,
                name: wire.author_name,
                email: wire.author_email,
            },
            workflow_name: wire.workflow_name,
            stage_name: wire.stage_name,
        })
    }
}

impl From<Review> for ReviewWire {
    fn from(review: Review) -> Self {
        ReviewWire {
            id: review.id,
            company_candidate_id: review.subject.candidate_id(),
            position_id: review.subject.position_id(),
            score: review.score,
            comment: review.comment,
            scope: review.scope.kind(),
            stage_id: review.scope.stage_id(),
            visibility: review.visibility,
            review_status: review.review_status,
            created_at: review.created_at,
            updated_at: review.updated_at,
            author_id: review.author.id,
            author_name: review.author.name,
            author_email: review.author.email,
            workflow_name: review.workflow_name,
            stage_name: review.stage_name,
        }
    }
}

impl Remark for Review {
    fn id(&self) -> Uuid {
        self.id
    }

    fn subject(&self) -> Subject {
        self.subject
    }

    fn scope(&self) -> Scope {
        self.scope
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn review_status(&self) -> ReviewStatus {
        self.review_status
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn author(&self) -> &Author {
        &self.author
    }

    fn body(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn score(&self) -> Option<ScoreLevel> {
        Some(self.score)
    }

    fn workflow_name(&self) -> Option<&str> {
        self.workflow_name.as_deref()
    }

    fn stage_name(&self) -> Option<&str> {
        self.stage_name.as_deref()
    }
}
