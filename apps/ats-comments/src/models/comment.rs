use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::record::{Author, ReviewStatus, Scope, ScopeKind, Subject, Visibility};
use crate::models::Remark;

/// A free-text comment on a candidate or a job position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CommentWire", into = "CommentWire")]
pub struct Comment {
    pub id: Uuid,
    pub subject: Subject,
    pub text: String,
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
struct CommentWire {
    id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    company_candidate_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position_id: Option<Uuid>,
    text: String,
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

impl TryFrom<CommentWire> for Comment {
    type Error = String;

    fn try_from(wire: CommentWire) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: wire.id,
            subject: Subject::from_wire(wire.company_candidate_id, wire.position_id)?,
            text: wire.text,
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

impl From<Comment> for CommentWire {
    fn from(comment: Comment) -> Self {
        CommentWire {
            id: comment.id,
            company_candidate_id: comment.subject.candidate_id(),
            position_id: comment.subject.position_id(),
            text: comment.text,
            scope: comment.scope.kind(),
            stage_id: comment.scope.stage_id(),
            visibility: comment.visibility,
            review_status: comment.review_status,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            author_id: comment.author.id,
            author_name: comment.author.name,
            author_email: comment.author.email,
            workflow_name: comment.workflow_name,
            stage_name: comment.stage_name,
        }
    }
}

impl Remark for Comment {
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
        Some(&self.text)
    }

    fn workflow_name(&self) -> Option<&str> {
        self.workflow_name.as_deref()
    }

    fn stage_name(&self) -> Option<&str> {
        self.stage_name.as_deref()
    }
}
