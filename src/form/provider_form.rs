use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use super::validation::check_identity;
use super::{EntityForm, FieldErrors, FormMode, SubmitGuard, SubmitOutcome};
use crate::dto::{ModelProvider, ModelProviderCreate, ModelProviderUpdate};
use crate::service::ProviderService;

/// Working copy of a provider's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDraft {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub api_base_url: String,
    pub api_key_env_var: String,
    pub is_active: bool,
}

impl ProviderDraft {
    pub fn initial(mode: &FormMode<ModelProvider>) -> Self {
        match mode {
            FormMode::Create => Self {
                name: String::new(),
                display_name: String::new(),
                description: String::new(),
                api_base_url: String::new(),
                api_key_env_var: String::new(),
                is_active: true,
            },
            FormMode::Edit(provider) => Self {
                name: provider.name.clone(),
                display_name: provider.display_name.clone(),
                description: provider.description.clone().unwrap_or_default(),
                api_base_url: provider.api_base_url.clone().unwrap_or_default(),
                api_key_env_var: provider.api_key_env_var.clone().unwrap_or_default(),
                is_active: provider.is_active,
            },
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_identity(&self.name, &self.display_name, &mut errors);
        errors
    }

    /// Blank optional fields are left out of the create body.
    pub fn to_create(&self) -> ModelProviderCreate {
        ModelProviderCreate {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            description: non_empty(&self.description),
            api_base_url: non_empty(&self.api_base_url),
            api_key_env_var: non_empty(&self.api_key_env_var),
            is_active: self.is_active,
        }
    }

    /// `name` is create-only and never sent. Optional strings are always
    /// sent so that clearing a field reaches the backend.
    pub fn to_update(&self) -> ModelProviderUpdate {
        ModelProviderUpdate {
            name: None,
            display_name: Some(self.display_name.clone()),
            description: Some(self.description.clone()),
            api_base_url: Some(self.api_base_url.clone()),
            api_key_env_var: Some(self.api_key_env_var.clone()),
            is_active: Some(self.is_active),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

pub struct ProviderForm<S: ProviderService + ?Sized> {
    service: Arc<S>,
    mode: FormMode<ModelProvider>,
    draft: ProviderDraft,
    errors: FieldErrors,
    submitting: bool,
    submit_error: Option<String>,
}

impl<S: ProviderService + ?Sized> ProviderForm<S> {
    pub fn new(service: Arc<S>, mode: FormMode<ModelProvider>) -> Self {
        let draft = ProviderDraft::initial(&mode);
        Self {
            service,
            mode,
            draft,
            errors: FieldErrors::new(),
            submitting: false,
            submit_error: None,
        }
    }

    pub fn draft(&self) -> &ProviderDraft {
        &self.draft
    }

    /// `name` is fixed once the provider exists.
    pub fn name_editable(&self) -> bool {
        !self.mode.is_edit()
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        if self.name_editable() {
            self.draft.name = value.into();
        }
    }

    pub fn set_display_name(&mut self, value: impl Into<String>) {
        self.draft.display_name = value.into();
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.draft.description = value.into();
    }

    pub fn set_api_base_url(&mut self, value: impl Into<String>) {
        self.draft.api_base_url = value.into();
    }

    pub fn set_api_key_env_var(&mut self, value: impl Into<String>) {
        self.draft.api_key_env_var = value.into();
    }

    pub fn set_is_active(&mut self, value: bool) {
        self.draft.is_active = value;
    }
}

#[async_trait]
impl<S: ProviderService + ?Sized> EntityForm for ProviderForm<S> {
    type Entity = ModelProvider;

    fn mode(&self) -> &FormMode<ModelProvider> {
        &self.mode
    }

    fn reset(&mut self, mode: FormMode<ModelProvider>) {
        self.draft = ProviderDraft::initial(&mode);
        self.mode = mode;
        self.errors = FieldErrors::new();
        self.submitting = false;
        self.submit_error = None;
    }

    fn validate(&mut self) -> bool {
        self.errors = self.draft.validate();
        self.errors.is_empty()
    }

    fn field_errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    async fn submit(&mut self) -> SubmitOutcome<ModelProvider> {
        if self.submitting {
            return SubmitOutcome::Busy;
        }
        if !self.validate() {
            return SubmitOutcome::Invalid;
        }

        self.submit_error = None;

        let result = {
            let _busy = SubmitGuard::engage(&mut self.submitting);
            match &self.mode {
                FormMode::Edit(provider) => self.service.update(&provider.id, &self.draft.to_update()).await,
                FormMode::Create => self.service.create(&self.draft.to_create()).await,
            }
        };

        match result {
            Ok(provider) => {
                info!(provider_id = %provider.id, edit = self.mode.is_edit(), "Provider form saved");
                SubmitOutcome::Saved(provider)
            }
            Err(e) => {
                error!(name = %self.draft.name, error = %e, "Error saving model provider");
                let message = e.user_message();
                self.submit_error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    fn title(&self) -> &'static str {
        if self.mode.is_edit() { "Edit Model Provider" } else { "Add Model Provider" }
    }
}
