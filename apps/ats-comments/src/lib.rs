//! Comment and review sections for an applicant-tracking system.
//!
//! A [`section::Section`] holds the state of one comments/reviews panel for a
//! candidate or a job position. Records come from a [`section::source::RecordSource`];
//! the [`api`] module provides REST-backed sources for candidate comments,
//! position comments and candidate reviews.

pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod section;

pub use errors::{ApiError, SectionError, ValidationError};
pub use section::form::{CommentDraft, FormMode, RemarkForm, ReviewDraft};
pub use section::invalidation::{Invalidation, InvalidationBus};
pub use section::source::{RecordSource, Tab};
pub use section::Section;
