use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::api::ClientError;
use crate::dto::Identified;
use crate::form::{EntityForm, FormMode, SubmitOutcome};

/// What a list view needs from one entity type: how to fetch and delete
/// the collection, and how to build its form.
#[async_trait]
pub trait ListSource: Send + Sync {
    type Item: Identified + Clone + Send + Sync;
    type Form: EntityForm<Entity = Self::Item>;

    async fn fetch(&self) -> Result<Vec<Self::Item>, ClientError>;

    async fn remove(&self, item: &Self::Item) -> Result<(), ClientError>;

    fn open_form(&self, mode: FormMode<Self::Item>) -> Self::Form;

    /// Page message when the collection cannot be loaded.
    fn load_error(&self) -> &'static str;

    fn delete_error(&self) -> &'static str;

    /// Confirmation text for deleting `item`.
    fn delete_prompt(&self, item: &Self::Item) -> String;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    Loading,
    /// A failed load leaves `items` empty and sets `error`.
    Ready { items: Vec<T>, error: Option<String> },
}

/// Identifies one reload; only the latest one may write the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadTicket(u64);

pub struct ListView<S: ListSource> {
    source: S,
    state: ListState<S::Item>,
    form: Option<S::Form>,
    delete_target: Option<S::Item>,
    latest_ticket: u64,
}

impl<S: ListSource> ListView<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: ListState::Loading,
            form: None,
            delete_target: None,
            latest_ticket: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> &ListState<S::Item> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListState::Loading)
    }

    pub fn items(&self) -> &[S::Item] {
        match &self.state {
            ListState::Ready { items, .. } => items,
            ListState::Loading => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ListState::Ready { error, .. } => error.as_deref(),
            ListState::Loading => None,
        }
    }

    pub async fn mount(&mut self) {
        self.reload().await;
    }

    /// Manual retry after a failed load.
    pub async fn retry(&mut self) {
        self.reload().await;
    }

    pub async fn reload(&mut self) {
        let ticket = self.begin_reload();
        let result = self.source.fetch().await;
        self.finish_reload(ticket, result);
    }

    pub fn begin_reload(&mut self) -> ReloadTicket {
        self.latest_ticket += 1;
        self.state = ListState::Loading;
        ReloadTicket(self.latest_ticket)
    }

    /// Applies a fetch result. Returns `false` when a newer reload was
    /// issued after `ticket`, in which case the result is dropped.
    pub fn finish_reload(&mut self, ticket: ReloadTicket, result: Result<Vec<S::Item>, ClientError>) -> bool {
        if ticket.0 != self.latest_ticket {
            debug!(ticket = ticket.0, latest = self.latest_ticket, "Discarding superseded list response");
            return false;
        }

        self.state = match result {
            Ok(items) => {
                debug!(count = items.len(), "List loaded");
                ListState::Ready { items, error: None }
            }
            Err(e) => {
                error!(error = %e, "{}", self.source.load_error());
                ListState::Ready {
                    items: Vec::new(),
                    error: Some(self.source.load_error().to_string()),
                }
            }
        };
        true
    }

    pub fn open_create(&mut self) {
        self.form = Some(self.source.open_form(FormMode::Create));
    }

    pub fn open_edit(&mut self, item: S::Item) {
        self.form = Some(self.source.open_form(FormMode::Edit(item)));
    }

    pub fn form(&self) -> Option<&S::Form> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut S::Form> {
        self.form.as_mut()
    }

    /// Submits the open form. A successful save closes it and reloads once.
    pub async fn submit_form(&mut self) -> Option<SubmitOutcome<S::Item>> {
        let outcome = self.form.as_mut()?.submit().await;
        if outcome.refresh_requested() {
            self.close_form(true).await;
        }
        Some(outcome)
    }

    pub async fn close_form(&mut self, refresh: bool) {
        self.form = None;
        if refresh {
            self.reload().await;
        }
    }

    pub fn request_delete(&mut self, item: S::Item) {
        self.delete_target = Some(item);
    }

    pub fn delete_target(&self) -> Option<&S::Item> {
        self.delete_target.as_ref()
    }

    pub fn delete_prompt(&self) -> Option<String> {
        self.delete_target.as_ref().map(|item| self.source.delete_prompt(item))
    }

    pub fn cancel_delete(&mut self) {
        self.delete_target = None;
    }

    /// Deletes the pending target and reloads. On failure the confirmation
    /// stays open and the page error is set.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(target) = self.delete_target.clone() else {
            return false;
        };

        match self.source.remove(&target).await {
            Ok(()) => {
                info!(id = %target.id(), "Deleted list item");
                self.delete_target = None;
                self.reload().await;
                true
            }
            Err(e) => {
                error!(id = %target.id(), error = %e, "{}", self.source.delete_error());
                let message = self.source.delete_error().to_string();
                match &mut self.state {
                    ListState::Ready { error, .. } => *error = Some(message),
                    ListState::Loading => {
                        self.state = ListState::Ready { items: Vec::new(), error: Some(message) };
                    }
                }
                false
            }
        }
    }
}
