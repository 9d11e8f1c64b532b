//! Stateless list view of a section's records.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Remark, ReviewStatus, ScoreLevel, Scope, Visibility};
use crate::section::source::Tab;

/// Buttons offered on a row. Absent on read-only sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowActions {
    pub toggle_label: &'static str,
    pub can_delete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: Uuid,
    pub author: String,
    pub body: Option<String>,
    pub score: Option<ScoreLevel>,
    pub review_status: ReviewStatus,
    pub visibility: Visibility,
    pub scope_label: String,
    pub edited: bool,
    pub created_at: DateTime<Utc>,
    pub actions: Option<RowActions>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Loading,
    Empty { message: &'static str },
    Rows(Vec<RowView>),
}

/// Builds the view for `records` in the order given. Loading wins over empty,
/// empty wins over rows.
pub fn build_list_view<R: Remark>(
    records: &[R],
    tab: Tab,
    is_loading: bool,
    actions_enabled: bool,
) -> ListView {
    if is_loading {
        return ListView::Loading;
    }
    if records.is_empty() {
        return ListView::Empty {
            message: empty_message(tab),
        };
    }
    ListView::Rows(
        records
            .iter()
            .map(|r| build_row(r, actions_enabled))
            .collect(),
    )
}

fn build_row<R: Remark>(record: &R, actions_enabled: bool) -> RowView {
    RowView {
        id: record.id(),
        author: record.author().display_name().to_string(),
        body: record.body().map(str::to_string),
        score: record.score(),
        review_status: record.review_status(),
        visibility: record.visibility(),
        scope_label: scope_label(record),
        edited: record.is_edited(),
        created_at: record.created_at(),
        actions: actions_enabled.then(|| RowActions {
            toggle_label: toggle_label(record.review_status()),
            can_delete: true,
        }),
    }
}

fn empty_message(tab: Tab) -> &'static str {
    match tab {
        Tab::Current => "Nothing recorded for this stage yet.",
        Tab::Global => "No global entries yet.",
        Tab::All => "Nothing recorded yet.",
    }
}

fn toggle_label(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::Pending => "Mark as reviewed",
        ReviewStatus::Reviewed => "Mark as pending",
    }
}

fn scope_label<R: Remark>(record: &R) -> String {
    match record.scope() {
        Scope::Global => match record.workflow_name() {
            Some(workflow) => format!("Global ({workflow})"),
            None => "Global".to_string(),
        },
        Scope::Stage(stage_id) => match (record.workflow_name(), record.stage_name()) {
            (Some(workflow), Some(stage)) => format!("{workflow} / {stage}"),
            (None, Some(stage)) => stage.to_string(),
            _ => format!("Stage {stage_id}"),
        },
    }
}

impl fmt::Display for ListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListView::Loading => writeln!(f, "  Loading..."),
            ListView::Empty { message } => writeln!(f, "  {message}"),
            ListView::Rows(rows) => {
                for row in rows {
                    write!(f, "  [{}]", row.review_status.label())?;
                    if let Some(score) = row.score {
                        write!(f, " ({}: {})", score.icon(), score.label())?;
                    }
                    write!(
                        f,
                        " {} · {} · {}",
                        row.author,
                        row.scope_label,
                        row.visibility.label()
                    )?;
                    if row.edited {
                        write!(f, " · edited")?;
                    }
                    writeln!(f)?;
                    if let Some(body) = &row.body {
                        writeln!(f, "      {body}")?;
                    }
                    if let Some(actions) = &row.actions {
                        write!(f, "      > {}", actions.toggle_label)?;
                        if actions.can_delete {
                            write!(f, " | Delete")?;
                        }
                        writeln!(f)?;
                    }
                }
                Ok(())
            }
        }
    }
}
