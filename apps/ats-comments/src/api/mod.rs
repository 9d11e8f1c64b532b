//! ATS REST backend access.
//!
//! `AtsClient` is the only place that issues HTTP requests; the record sources
//! build on it and never talk to reqwest directly.

pub mod client;
pub mod sources;

#[cfg(test)]
pub(crate) mod fake_backend;

pub use client::AtsClient;
pub use sources::{
    candidate_comments, candidate_reviews, position_comments, CommentSource, RestSource,
    ReviewSource, WireDraft,
};
