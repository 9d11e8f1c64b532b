//! REST-backed record sources for the three section kinds.
//!
//! All three share one implementation; they differ only in the collection path
//! (keyed by the parent id) and the item root used for per-record mutations.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::api::client::AtsClient;
use crate::errors::ApiError;
use crate::models::{Remark, Subject};
use crate::section::form::{CommentDraft, Draft, ReviewDraft};
use crate::section::source::{scope_to_tab, RecordSource, Tab};

/// Draft kinds that know their request bodies.
pub trait WireDraft: Draft {
    /// Body for the create endpoint. `stage_id` is the caller's current stage.
    fn create_body(&self, stage_id: Option<Uuid>) -> Value;

    /// Body for the update endpoint. Scope and author never change on update.
    fn update_body(&self) -> Value;
}

impl WireDraft for CommentDraft {
    fn create_body(&self, stage_id: Option<Uuid>) -> Value {
        let stage_id = if self.is_global { None } else { stage_id };
        json!({
            "text": self.text.trim(),
            "stageId": stage_id,
            "visibility": self.visibility,
            "reviewStatus": self.review_status,
        })
    }

    fn update_body(&self) -> Value {
        json!({
            "text": self.text.trim(),
            "visibility": self.visibility,
            "reviewStatus": self.review_status,
        })
    }
}

impl WireDraft for ReviewDraft {
    fn create_body(&self, stage_id: Option<Uuid>) -> Value {
        let mut body = self.update_body();
        body["stageId"] = json!(stage_id);
        body
    }

    fn update_body(&self) -> Value {
        json!({
            "score": self.score,
            "comment": self.comment.as_deref().map(str::trim).filter(|c| !c.is_empty()),
            "visibility": self.visibility,
            "reviewStatus": self.review_status,
        })
    }
}

/// A record source over the ATS REST API.
pub struct RestSource<D> {
    client: AtsClient,
    subject: Subject,
    current_stage: Option<Uuid>,
    collection: String,
    item_root: &'static str,
    allows_global: bool,
    _draft: PhantomData<fn() -> D>,
}

pub type CommentSource = RestSource<CommentDraft>;
pub type ReviewSource = RestSource<ReviewDraft>;

impl<D> RestSource<D> {
    fn new(
        client: AtsClient,
        subject: Subject,
        current_stage: Option<Uuid>,
        collection: String,
        item_root: &'static str,
        allows_global: bool,
    ) -> Self {
        Self {
            client,
            subject,
            current_stage,
            collection,
            item_root,
            allows_global,
            _draft: PhantomData,
        }
    }

    /// Whether drafts may opt out of the current stage on create.
    pub fn allows_global(&self) -> bool {
        self.allows_global
    }

    /// `None` when the tab cannot have any records (no current stage).
    fn list_path(&self, tab: Tab) -> Option<String> {
        match tab {
            Tab::Current => self
                .current_stage
                .map(|stage| format!("{}/stages/{stage}", self.collection)),
            Tab::Global => Some(format!("{}/global", self.collection)),
            Tab::All => Some(self.collection.clone()),
        }
    }

    fn item_path(&self, id: Uuid) -> String {
        format!("{}/{id}", self.item_root)
    }

    fn check_subject<R: Remark>(&self, record: &R) -> Result<(), ApiError> {
        if record.subject() != self.subject {
            return Err(ApiError::InvalidRecord(format!(
                "record {} belongs to {:?}, expected {:?}",
                record.id(),
                record.subject(),
                self.subject
            )));
        }
        Ok(())
    }
}

/// Comments on a company candidate. Drafts are always attached to the current
/// stage; global comments created elsewhere are still listed.
pub fn candidate_comments(
    client: AtsClient,
    company_candidate_id: Uuid,
    current_stage: Option<Uuid>,
) -> CommentSource {
    RestSource::new(
        client,
        Subject::Candidate(company_candidate_id),
        current_stage,
        format!("/company-candidates/{company_candidate_id}/comments"),
        "/candidate-comments",
        false,
    )
}

/// Comments on a job position. The only kind whose drafts may be global.
pub fn position_comments(
    client: AtsClient,
    position_id: Uuid,
    current_stage: Option<Uuid>,
) -> CommentSource {
    RestSource::new(
        client,
        Subject::Position(position_id),
        current_stage,
        format!("/positions/{position_id}/comments"),
        "/position-comments",
        true,
    )
}

/// Scored reviews of a company candidate.
pub fn candidate_reviews(
    client: AtsClient,
    company_candidate_id: Uuid,
    current_stage: Option<Uuid>,
) -> ReviewSource {
    RestSource::new(
        client,
        Subject::Candidate(company_candidate_id),
        current_stage,
        format!("/company-candidates/{company_candidate_id}/reviews"),
        "/candidate-reviews",
        false,
    )
}

#[async_trait]
impl<D> RecordSource for RestSource<D>
where
    D: WireDraft,
    D::Record: DeserializeOwned,
{
    type Record = D::Record;
    type Draft = D;

    fn subject(&self) -> Subject {
        self.subject
    }

    fn current_stage(&self) -> Option<Uuid> {
        self.current_stage
    }

    async fn load(&self, tab: Tab) -> Result<Vec<D::Record>, ApiError> {
        let Some(path) = self.list_path(tab) else {
            debug!("No current stage; {tab} tab is empty");
            return Ok(Vec::new());
        };

        let records: Vec<D::Record> = self.client.get_json(&path).await?;
        for record in &records {
            self.check_subject(record)?;
        }
        Ok(scope_to_tab(tab, self.current_stage, records))
    }

    async fn create(&self, draft: &D) -> Result<D::Record, ApiError> {
        let body = if self.allows_global {
            draft.create_body(self.current_stage)
        } else {
            draft.clone().without_global().create_body(self.current_stage)
        };
        let record: D::Record = self.client.post_json(&self.collection, &body).await?;
        self.check_subject(&record)?;
        Ok(record)
    }

    async fn update(&self, id: Uuid, draft: &D) -> Result<D::Record, ApiError> {
        let record: D::Record = self
            .client
            .put_json(&self.item_path(id), &draft.update_body())
            .await?;
        self.check_subject(&record)?;
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.client.delete(&self.item_path(id)).await
    }

    async fn mark_pending(&self, id: Uuid) -> Result<(), ApiError> {
        self.client
            .post_empty(&format!("{}/mark-pending", self.item_path(id)))
            .await
    }

    async fn mark_reviewed(&self, id: Uuid) -> Result<(), ApiError> {
        self.client
            .post_empty(&format!("{}/mark-reviewed", self.item_path(id)))
            .await
    }
}
