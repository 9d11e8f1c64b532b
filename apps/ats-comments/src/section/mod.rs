//! Section orchestrator: one comments/reviews panel for a single subject.
//!
//! Owns the UI state (tab, expansion, records, counts, flags) and coordinates the
//! record source, the form and the list view. Every mutation is followed by a
//! full re-fetch; nothing is patched locally.

pub mod form;
pub mod invalidation;
pub mod list;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{ApiError, SectionError};
use crate::models::{Remark, ReviewStatus};

use form::{Draft, FormMode};
use invalidation::{Invalidation, InvalidationBus, Subscription};
use list::{build_list_view, ListView};
use source::{RecordSource, Tab};

/// Observable section state.
#[derive(Debug, Clone)]
pub struct SectionState<R> {
    pub active_tab: Tab,
    pub records: Vec<R>,
    pub is_loading: bool,
    pub is_submitting: bool,
    pub is_expanded: bool,
    /// Size of the `all` tab, shown as a badge even while collapsed.
    pub total_count: usize,
    /// Record awaiting delete confirmation.
    pub pending_delete: Option<Uuid>,
}

impl<R> Default for SectionState<R> {
    fn default() -> Self {
        Self {
            active_tab: Tab::default(),
            records: Vec::new(),
            is_loading: false,
            is_submitting: false,
            is_expanded: false,
            total_count: 0,
            pending_delete: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    List,
    Count,
}

/// Handle for one in-flight fetch. Only the latest ticket of a stream may settle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    stream: Stream,
    generation: u64,
    tab: Tab,
}

impl FetchTicket {
    pub fn tab(&self) -> Tab {
        self.tab
    }
}

pub struct Section<S: RecordSource> {
    id: Uuid,
    source: Arc<S>,
    actions_enabled: bool,
    bus: Option<InvalidationBus>,
    subscription: Option<Subscription>,
    state: SectionState<S::Record>,
    list_generation: u64,
    count_generation: u64,
}

impl<S: RecordSource> Section<S> {
    /// A collapsed section on the `current` tab with row actions wired.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            actions_enabled: true,
            bus: None,
            subscription: None,
            state: SectionState::default(),
            list_generation: 0,
            count_generation: 0,
        }
    }

    /// Rows render without actions and every mutation is refused.
    pub fn read_only(mut self) -> Self {
        self.actions_enabled = false;
        self
    }

    pub fn expanded(mut self) -> Self {
        self.state.is_expanded = true;
        self
    }

    pub fn on_tab(mut self, tab: Tab) -> Self {
        self.state.active_tab = tab;
        self
    }

    /// Publishes this section's mutations on `bus` and reloads on other sections'.
    pub fn with_bus(mut self, bus: &InvalidationBus) -> Self {
        self.subscription = Some(bus.subscribe(self.source.subject(), self.id));
        self.bus = Some(bus.clone());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> &SectionState<S::Record> {
        &self.state
    }

    pub fn records(&self) -> &[S::Record] {
        &self.state.records
    }

    pub fn actions_enabled(&self) -> bool {
        self.actions_enabled
    }

    pub fn view(&self) -> ListView {
        build_list_view(
            &self.state.records,
            self.state.active_tab,
            self.state.is_loading,
            self.actions_enabled,
        )
    }

    // ────────────────────────────────────────────────────────────────────────
    // Fetching
    // ────────────────────────────────────────────────────────────────────────

    /// Initial load: the count always, the list only when expanded.
    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    /// Issues a list fetch ticket for the active tab and marks the section loading.
    pub fn begin_list_fetch(&mut self) -> FetchTicket {
        self.list_generation += 1;
        self.state.is_loading = true;
        FetchTicket {
            stream: Stream::List,
            generation: self.list_generation,
            tab: self.state.active_tab,
        }
    }

    /// Settles a list fetch. Returns `false` when the ticket was stale and the
    /// result was discarded. Failures keep the previous records.
    pub fn apply_list_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<S::Record>, ApiError>,
    ) -> bool {
        if ticket.stream != Stream::List || ticket.generation != self.list_generation {
            debug!(
                generation = ticket.generation,
                latest = self.list_generation,
                "Discarding stale list response"
            );
            return false;
        }
        self.state.is_loading = false;
        match result {
            Ok(records) => self.state.records = records,
            Err(e) => warn!(tab = %ticket.tab, "Failed to load records: {e}"),
        }
        true
    }

    pub fn begin_count_fetch(&mut self) -> FetchTicket {
        self.count_generation += 1;
        FetchTicket {
            stream: Stream::Count,
            generation: self.count_generation,
            tab: Tab::All,
        }
    }

    pub fn apply_count_fetch(&mut self, ticket: FetchTicket, result: Result<usize, ApiError>) -> bool {
        if ticket.stream != Stream::Count || ticket.generation != self.count_generation {
            debug!(
                generation = ticket.generation,
                latest = self.count_generation,
                "Discarding stale count response"
            );
            return false;
        }
        match result {
            Ok(count) => self.state.total_count = count,
            Err(e) => warn!("Failed to load record count: {e}"),
        }
        true
    }

    pub async fn reload_list(&mut self) {
        let ticket = self.begin_list_fetch();
        let result = self.source.load(ticket.tab()).await;
        self.apply_list_fetch(ticket, result);
    }

    pub async fn reload_count(&mut self) {
        let ticket = self.begin_count_fetch();
        let result = self.source.load(Tab::All).await.map(|all| all.len());
        self.apply_count_fetch(ticket, result);
    }

    /// Count always, list if expanded.
    pub async fn refresh(&mut self) {
        self.reload_count().await;
        if self.state.is_expanded {
            self.reload_list().await;
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // UI transitions
    // ────────────────────────────────────────────────────────────────────────

    pub async fn set_tab(&mut self, tab: Tab) {
        if self.state.active_tab == tab {
            return;
        }
        self.state.active_tab = tab;
        if self.state.is_expanded {
            self.reload_list().await;
        }
    }

    /// Flips expansion. Expanding fetches the active tab immediately.
    pub async fn toggle_expanded(&mut self) {
        self.state.is_expanded = !self.state.is_expanded;
        if self.state.is_expanded {
            self.reload_list().await;
        }
    }

    /// Reloads if another section invalidated this subject since the last call.
    pub async fn sync_invalidations(&mut self) -> bool {
        let invalidated = self
            .subscription
            .as_mut()
            .map(Subscription::drain)
            .unwrap_or(false);
        if invalidated {
            self.refresh().await;
        }
        invalidated
    }

    /// Waits for the next invalidation from another section, then reloads.
    /// Returns `false` when there is no bus or it has shut down.
    pub async fn watch_invalidations(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        if !subscription.changed().await {
            return false;
        }
        self.refresh().await;
        true
    }

    // ────────────────────────────────────────────────────────────────────────
    // Mutations
    // ────────────────────────────────────────────────────────────────────────

    /// Creates or updates a record from `draft`, then re-fetches and publishes.
    ///
    /// `is_submitting` is cleared on every path. Failures leave the rest of the
    /// state untouched and are returned to the caller.
    pub async fn submit(
        &mut self,
        draft: &S::Draft,
        mode: FormMode,
    ) -> Result<S::Record, SectionError> {
        self.ensure_writable()?;
        draft.validate()?;

        self.state.is_submitting = true;
        let result = match mode {
            FormMode::Create => self.source.create(draft).await,
            FormMode::Edit(id) => self.source.update(id, draft).await,
        };
        self.state.is_submitting = false;

        let record = result?;
        info!(record_id = %record.id(), ?mode, "Saved record");
        self.after_mutation(true).await;
        Ok(record)
    }

    /// Asks for confirmation before deleting `id`. Nothing is sent yet.
    pub fn request_delete(&mut self, id: Uuid) -> Result<(), SectionError> {
        self.ensure_writable()?;
        self.find(id)?;
        self.state.pending_delete = Some(id);
        Ok(())
    }

    /// Declines the pending delete. Not an error if none was pending.
    pub fn cancel_delete(&mut self) {
        self.state.pending_delete = None;
    }

    /// Deletes the record awaiting confirmation.
    pub async fn confirm_delete(&mut self) -> Result<(), SectionError> {
        self.ensure_writable()?;
        let id = self
            .state
            .pending_delete
            .take()
            .ok_or(SectionError::NoPendingDelete)?;

        self.source.delete(id).await?;
        info!(record_id = %id, "Deleted record");
        self.after_mutation(true).await;
        Ok(())
    }

    /// Flips pending/reviewed on a record in the current list.
    /// Returns the status the record was moved to.
    pub async fn toggle_review_status(&mut self, id: Uuid) -> Result<ReviewStatus, SectionError> {
        self.ensure_writable()?;
        let current = self.find(id)?.review_status();

        match current {
            ReviewStatus::Pending => self.source.mark_reviewed(id).await?,
            ReviewStatus::Reviewed => self.source.mark_pending(id).await?,
        }
        let next = current.toggled();
        info!(record_id = %id, status = next.label(), "Toggled review status");
        self.after_mutation(false).await;
        Ok(next)
    }

    fn ensure_writable(&self) -> Result<(), SectionError> {
        if self.actions_enabled {
            Ok(())
        } else {
            Err(SectionError::ReadOnly)
        }
    }

    fn find(&self, id: Uuid) -> Result<&S::Record, SectionError> {
        self.state
            .records
            .iter()
            .find(|r| r.id() == id)
            .ok_or(SectionError::UnknownRecord(id))
    }

    /// Re-fetches after a successful mutation, then publishes it.
    ///
    /// Anything already queued on this section's subscription (its own earlier
    /// events included) is consumed first; the refresh below covers it.
    async fn after_mutation(&mut self, recount: bool) {
        let invalidated = self
            .subscription
            .as_mut()
            .map(Subscription::drain)
            .unwrap_or(false);
        if recount || invalidated {
            self.reload_count().await;
        }
        if self.state.is_expanded {
            self.reload_list().await;
        }
        if let Some(bus) = &self.bus {
            bus.publish(Invalidation {
                subject: self.source.subject(),
                origin: self.id,
            });
        }
    }
}
