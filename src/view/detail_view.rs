use std::sync::Arc;
use tracing::{error, warn};

use super::sources::ModelsView;
use crate::dto::ModelProvider;
use crate::form::{EntityForm, FormMode, ProviderForm, SubmitOutcome};
use crate::service::{ModelService, ProviderService};

pub const PROVIDER_NOT_FOUND: &str = "Model provider not found";
pub const PROVIDER_LOAD_FAILED: &str = "Failed to load model provider details";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Ready(ModelProvider),
    NotFound,
    Failed(String),
}

/// One provider page: the provider fetched together with its models, a
/// provider edit form, and a model list scoped to the provider.
///
/// Editing the provider refetches the envelope only; model changes go
/// through `models_mut()` and reload only the model list.
pub struct ProviderDetailView<P: ProviderService + ?Sized, M: ModelService + ?Sized> {
    provider_id: String,
    providers: Arc<P>,
    state: DetailState,
    edit_form: Option<ProviderForm<P>>,
    models: ModelsView<M>,
}

impl<P: ProviderService + ?Sized, M: ModelService + ?Sized> ProviderDetailView<P, M> {
    pub fn new(provider_id: impl Into<String>, providers: Arc<P>, models: Arc<M>) -> Self {
        let provider_id = provider_id.into();
        Self {
            models: ModelsView::for_models(models, provider_id.clone()),
            provider_id,
            providers,
            state: DetailState::Loading,
            edit_form: None,
        }
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn provider(&self) -> Option<&ModelProvider> {
        match &self.state {
            DetailState::Ready(provider) => Some(provider),
            _ => None,
        }
    }

    /// Page-level message for the not-found and failed states.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            DetailState::NotFound => Some(PROVIDER_NOT_FOUND),
            DetailState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn models(&self) -> &ModelsView<M> {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut ModelsView<M> {
        &mut self.models
    }

    /// Loads the provider and, once it is known, the model list.
    pub async fn mount(&mut self) {
        self.reload_provider().await;
        if self.provider().is_some() {
            self.models.mount().await;
        }
    }

    pub async fn retry(&mut self) {
        self.mount().await;
    }

    pub async fn reload_provider(&mut self) {
        self.state = DetailState::Loading;
        self.state = match self.providers.get_with_models(&self.provider_id).await {
            Ok(provider) => DetailState::Ready(provider),
            Err(e) if e.is_not_found() => {
                warn!(provider_id = %self.provider_id, "Model provider not found");
                DetailState::NotFound
            }
            Err(e) => {
                error!(provider_id = %self.provider_id, error = %e, "Failed to load model provider");
                DetailState::Failed(PROVIDER_LOAD_FAILED.to_string())
            }
        };
    }

    /// Opens the provider form seeded with the loaded provider.
    pub fn open_edit(&mut self) -> bool {
        let Some(provider) = self.provider().cloned() else {
            return false;
        };
        self.edit_form = Some(ProviderForm::new(Arc::clone(&self.providers), FormMode::Edit(provider)));
        true
    }

    pub fn edit_form(&self) -> Option<&ProviderForm<P>> {
        self.edit_form.as_ref()
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut ProviderForm<P>> {
        self.edit_form.as_mut()
    }

    pub async fn submit_edit(&mut self) -> Option<SubmitOutcome<ModelProvider>> {
        let outcome = self.edit_form.as_mut()?.submit().await;
        if outcome.refresh_requested() {
            self.close_edit(true).await;
        }
        Some(outcome)
    }

    pub async fn close_edit(&mut self, refresh: bool) {
        self.edit_form = None;
        if refresh {
            self.reload_provider().await;
        }
    }
}
