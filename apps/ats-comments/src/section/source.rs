//! Record source: the fetch adapter a section is built on.
//!
//! Each concrete usage (candidate comments, position comments, candidate reviews)
//! supplies a `RecordSource` that knows its endpoints. The section only ever sees
//! this trait, so swapping the backend never touches the orchestrator.

use std::collections::HashSet;
use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::{Remark, Scope, Subject};
use crate::section::form::Draft;

/// Which slice of a subject's records a section is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    /// Records tied to the caller's current stage.
    #[default]
    Current,
    /// Records scoped to the whole workflow.
    Global,
    /// Everything, unfiltered.
    All,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Current, Tab::Global, Tab::All];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Current => "Current stage",
            Tab::Global => "Global",
            Tab::All => "All",
        }
    }

    /// Whether `record` belongs on this tab for a caller sitting on `current_stage`.
    pub fn admits<R: Remark>(self, record: &R, current_stage: Option<Uuid>) -> bool {
        match (self, record.scope()) {
            (Tab::All, _) => true,
            (Tab::Global, scope) => scope.is_global(),
            (Tab::Current, Scope::Stage(stage)) => current_stage == Some(stage),
            (Tab::Current, Scope::Global) => false,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tab::Current => "current",
            Tab::Global => "global",
            Tab::All => "all",
        };
        f.write_str(s)
    }
}

/// Keeps only the records the tab admits and drops repeated ids.
/// The backend's order is preserved; the first occurrence of an id wins.
pub fn scope_to_tab<R: Remark>(tab: Tab, current_stage: Option<Uuid>, records: Vec<R>) -> Vec<R> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| tab.admits(r, current_stage))
        .filter(|r| seen.insert(r.id()))
        .collect()
}

/// Loader and mutators for one subject's records.
///
/// Implementations reject on network or decode failure; they never retry.
#[async_trait]
pub trait RecordSource: Send + Sync {
    type Record: Remark;
    type Draft: Draft<Record = Self::Record>;

    /// The candidate or position these records hang off.
    fn subject(&self) -> Subject;

    /// The stage the caller is looking at, if any.
    fn current_stage(&self) -> Option<Uuid>;

    async fn load(&self, tab: Tab) -> Result<Vec<Self::Record>, ApiError>;

    async fn create(&self, draft: &Self::Draft) -> Result<Self::Record, ApiError>;

    async fn update(&self, id: Uuid, draft: &Self::Draft) -> Result<Self::Record, ApiError>;

    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;

    async fn mark_pending(&self, id: Uuid) -> Result<(), ApiError>;

    async fn mark_reviewed(&self, id: Uuid) -> Result<(), ApiError>;
}
