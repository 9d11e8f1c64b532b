//! In-memory record source for section tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::{Author, Comment, ReviewStatus, Scope, Subject, Visibility};
use crate::section::form::CommentDraft;
use crate::section::source::{scope_to_tab, RecordSource, Tab};

pub(crate) fn comment(text: &str, stage: Option<Uuid>) -> Comment {
    let now = Utc::now();
    Comment {
        id: Uuid::new_v4(),
        subject: Subject::Candidate(Uuid::new_v4()),
        text: text.to_string(),
        scope: Scope::from_stage(stage),
        visibility: Visibility::Private,
        review_status: ReviewStatus::Reviewed,
        created_at: now,
        updated_at: now,
        author: Author {
            id: Uuid::new_v4(),
            name: Some("Test Recruiter".to_string()),
            email: None,
        },
        workflow_name: None,
        stage_name: None,
    }
}

/// Comment source backed by a vector. Counts every call and can be told to fail.
pub(crate) struct MemorySource {
    subject: Subject,
    stage: Option<Uuid>,
    records: Mutex<Vec<Comment>>,
    loads: Mutex<HashMap<Tab, usize>>,
    creates: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
    fail_loads: AtomicBool,
    fail_mutations: AtomicBool,
}

impl MemorySource {
    pub(crate) fn candidate(stage: Option<Uuid>) -> Self {
        Self {
            subject: Subject::Candidate(Uuid::new_v4()),
            stage,
            records: Mutex::new(Vec::new()),
            loads: Mutex::new(HashMap::new()),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            fail_loads: AtomicBool::new(false),
            fail_mutations: AtomicBool::new(false),
        }
    }

    pub(crate) fn with_records(self, records: Vec<Comment>) -> Self {
        let subject = self.subject;
        *self.records.lock().unwrap() = records
            .into_iter()
            .map(|mut r| {
                r.subject = subject;
                r
            })
            .collect();
        self
    }

    pub(crate) fn loads(&self, tab: Tab) -> usize {
        self.loads.lock().unwrap().get(&tab).copied().unwrap_or(0)
    }

    pub(crate) fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub(crate) fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub(crate) fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    fn check_mutation(&self) -> Result<(), ApiError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(())
    }

    fn with_record<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Comment) -> T,
    ) -> Result<T, ApiError> {
        let mut records = self.records.lock().unwrap();
        let record = records.iter_mut().find(|r| r.id == id).ok_or(ApiError::Status {
            status: 404,
            message: format!("Comment {id} not found"),
        })?;
        Ok(f(record))
    }
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        message: "simulated failure".to_string(),
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    type Record = Comment;
    type Draft = CommentDraft;

    fn subject(&self) -> Subject {
        self.subject
    }

    fn current_stage(&self) -> Option<Uuid> {
        self.stage
    }

    async fn load(&self, tab: Tab) -> Result<Vec<Comment>, ApiError> {
        *self.loads.lock().unwrap().entry(tab).or_insert(0) += 1;
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        let records = self.records.lock().unwrap().clone();
        Ok(scope_to_tab(tab, self.stage, records))
    }

    async fn create(&self, draft: &CommentDraft) -> Result<Comment, ApiError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.check_mutation()?;
        let mut record = comment(&draft.text, if draft.is_global { None } else { self.stage });
        record.subject = self.subject;
        record.visibility = draft.visibility;
        record.review_status = draft.review_status;
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, draft: &CommentDraft) -> Result<Comment, ApiError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.check_mutation()?;
        self.with_record(id, |r| {
            r.text = draft.text.clone();
            r.visibility = draft.visibility;
            r.review_status = draft.review_status;
            r.updated_at = r.created_at + Duration::minutes(1);
            r.clone()
        })
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.check_mutation()?;
        self.with_record(id, |_| ())?;
        self.records.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }

    async fn mark_pending(&self, id: Uuid) -> Result<(), ApiError> {
        self.check_mutation()?;
        self.with_record(id, |r| r.review_status = ReviewStatus::Pending)
    }

    async fn mark_reviewed(&self, id: Uuid) -> Result<(), ApiError> {
        self.check_mutation()?;
        self.with_record(id, |r| r.review_status = ReviewStatus::Reviewed)
    }
}
