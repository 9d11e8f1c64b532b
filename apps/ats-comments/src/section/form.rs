//! Form state for creating and editing remarks.
//!
//! The form validates locally and hands the draft to its section. It never shows
//! errors itself: whatever the section returns goes straight back to the caller.

use uuid::Uuid;

use crate::errors::{SectionError, ValidationError};
use crate::models::{Comment, Remark, Review, ReviewStatus, ScoreLevel, Visibility};
use crate::section::source::RecordSource;
use crate::section::Section;

/// Editable input for one record kind.
pub trait Draft: Clone + Default + Send + Sync + 'static {
    type Record: Remark;

    fn validate(&self) -> Result<(), ValidationError>;

    /// Pre-populates a draft from an existing record (edit mode).
    fn from_record(record: &Self::Record) -> Self;

    /// Drops the global flag for forms that do not offer the toggle.
    fn without_global(self) -> Self {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentDraft {
    pub text: String,
    pub visibility: Visibility,
    pub review_status: ReviewStatus,
    /// Position comments only: omit the stage association.
    pub is_global: bool,
}

impl Draft for CommentDraft {
    type Record = Comment;

    fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        Ok(())
    }

    fn from_record(record: &Comment) -> Self {
        Self {
            text: record.text.clone(),
            visibility: record.visibility,
            review_status: record.review_status,
            is_global: record.scope.is_global(),
        }
    }

    fn without_global(self) -> Self {
        Self {
            is_global: false,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewDraft {
    pub score: Option<ScoreLevel>,
    pub comment: Option<String>,
    pub visibility: Visibility,
    pub review_status: ReviewStatus,
}

impl Draft for ReviewDraft {
    type Record = Review;

    fn validate(&self) -> Result<(), ValidationError> {
        self.score.map(|_| ()).ok_or(ValidationError::MissingScore)
    }

    fn from_record(record: &Review) -> Self {
        Self {
            score: Some(record.score),
            comment: record.comment.clone(),
            visibility: record.visibility,
            review_status: record.review_status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

/// Controlled form around a draft.
#[derive(Debug, Clone)]
pub struct RemarkForm<D: Draft> {
    draft: D,
    mode: FormMode,
    global_toggle: bool,
}

impl<D: Draft> RemarkForm<D> {
    /// An empty form that clears itself after each successful submit.
    pub fn create() -> Self {
        Self {
            draft: D::default(),
            mode: FormMode::Create,
            global_toggle: false,
        }
    }

    /// A form pre-populated from `record`. Contents survive a successful submit.
    pub fn edit(record: &D::Record) -> Self {
        Self {
            draft: D::from_record(record),
            mode: FormMode::Edit(record.id()),
            global_toggle: false,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.effective_draft().validate()
    }

    /// Drives the enabled state of the submit control.
    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validates, then hands the draft to `section`.
    ///
    /// Invalid drafts are rejected before the section (and so the network) is
    /// touched. Section errors are returned unchanged.
    pub async fn submit<S>(&mut self, section: &mut Section<S>) -> Result<D::Record, SectionError>
    where
        S: RecordSource<Record = D::Record, Draft = D>,
    {
        let draft = self.effective_draft();
        draft.validate()?;

        let record = section.submit(&draft, self.mode).await?;

        if self.mode == FormMode::Create {
            self.draft = D::default();
        }
        Ok(record)
    }

    fn effective_draft(&self) -> D {
        if self.global_toggle {
            self.draft.clone()
        } else {
            self.draft.clone().without_global()
        }
    }
}

impl RemarkForm<CommentDraft> {
    /// Enables the "global" toggle offered on position comments.
    pub fn with_global_toggle(mut self) -> Self {
        self.global_toggle = true;
        self
    }

    pub fn has_global_toggle(&self) -> bool {
        self.global_toggle
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    /// Returns `false` when the form has no global toggle.
    pub fn set_global(&mut self, is_global: bool) -> bool {
        if !self.global_toggle {
            return false;
        }
        self.draft.is_global = is_global;
        true
    }
}

impl RemarkForm<ReviewDraft> {
    pub fn select_score(&mut self, score: ScoreLevel) {
        self.draft.score = Some(score);
    }

    /// Blank text is stored as no comment.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        let comment = comment.into();
        self.draft.comment = if comment.trim().is_empty() {
            None
        } else {
            Some(comment)
        };
    }
}
