use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who can see a remark downstream. Not enforced client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Private,
    Shared,
    SharedWithCandidate,
}

impl Visibility {
    pub fn label(self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Shared => "shared",
            Visibility::SharedWithCandidate => "shared with candidate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    #[default]
    Reviewed,
}

impl ReviewStatus {
    pub fn toggled(self) -> Self {
        match self {
            ReviewStatus::Pending => ReviewStatus::Reviewed,
            ReviewStatus::Reviewed => ReviewStatus::Pending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Reviewed => "reviewed",
        }
    }
}

/// The parent record a remark hangs off. Exactly one per remark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Candidate(Uuid),
    Position(Uuid),
}

impl Subject {
    pub(crate) fn from_wire(
        company_candidate_id: Option<Uuid>,
        position_id: Option<Uuid>,
    ) -> Result<Self, String> {
        match (company_candidate_id, position_id) {
            (Some(id), None) => Ok(Subject::Candidate(id)),
            (None, Some(id)) => Ok(Subject::Position(id)),
            (Some(_), Some(_)) => {
                Err("record references both a candidate and a position".to_string())
            }
            (None, None) => Err("record references neither a candidate nor a position".to_string()),
        }
    }

    pub(crate) fn candidate_id(self) -> Option<Uuid> {
        match self {
            Subject::Candidate(id) => Some(id),
            Subject::Position(_) => None,
        }
    }

    pub(crate) fn position_id(self) -> Option<Uuid> {
        match self {
            Subject::Position(id) => Some(id),
            Subject::Candidate(_) => None,
        }
    }
}

/// Wire discriminator for [`Scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeKind {
    StageSpecific,
    Global,
}

/// Whether a remark belongs to one workflow stage or to the whole process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Stage(Uuid),
    Global,
}

impl Scope {
    /// `Some(stage)` yields a stage-specific scope, `None` a global one.
    pub fn from_stage(stage_id: Option<Uuid>) -> Self {
        stage_id.map_or(Scope::Global, Scope::Stage)
    }

    pub fn stage_id(self) -> Option<Uuid> {
        match self {
            Scope::Stage(id) => Some(id),
            Scope::Global => None,
        }
    }

    pub fn is_global(self) -> bool {
        matches!(self, Scope::Global)
    }

    pub(crate) fn kind(self) -> ScopeKind {
        match self {
            Scope::Stage(_) => ScopeKind::StageSpecific,
            Scope::Global => ScopeKind::Global,
        }
    }

    pub(crate) fn from_wire(kind: ScopeKind, stage_id: Option<Uuid>) -> Result<Self, String> {
        match (kind, stage_id) {
            (ScopeKind::StageSpecific, Some(id)) => Ok(Scope::Stage(id)),
            (ScopeKind::Global, None) => Ok(Scope::Global),
            (ScopeKind::StageSpecific, None) => {
                Err("stage-specific record without a stageId".to_string())
            }
            (ScopeKind::Global, Some(id)) => Err(format!("global record carries stageId {id}")),
        }
    }
}

/// Denormalized author info. Name and email may both be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Author {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref().filter(|e| !e.trim().is_empty()))
            .unwrap_or("Unknown author")
    }
}
