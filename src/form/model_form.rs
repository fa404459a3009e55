use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::validation::{check_identity, CONTEXT_WINDOW_INVALID, MODEL_TYPE_REQUIRED};
use super::{EntityForm, Field, FieldErrors, FormMode, ParametersEditor, SubmitGuard, SubmitOutcome};
use crate::dto::{Model, ModelCreate, ModelType, ModelUpdate, Parameters};
use crate::service::ModelService;

/// Working copy of a model's editable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDraft {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub model_type: Option<ModelType>,
    pub context_window: Option<u32>,
    pub is_active: bool,
    pub default_parameters: Parameters,
}

impl ModelDraft {
    pub fn initial(mode: &FormMode<Model>) -> Self {
        match mode {
            FormMode::Create => Self {
                name: String::new(),
                display_name: String::new(),
                description: String::new(),
                model_type: Some(ModelType::Chat),
                context_window: None,
                is_active: true,
                default_parameters: Parameters::new(),
            },
            FormMode::Edit(model) => Self {
                name: model.name.clone(),
                display_name: model.display_name.clone(),
                description: model.description.clone().unwrap_or_default(),
                model_type: model.model_type.known(),
                context_window: model.context_window,
                is_active: model.is_active,
                default_parameters: model.default_parameters.clone().unwrap_or_default(),
            },
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_identity(&self.name, &self.display_name, &mut errors);

        if self.model_type.is_none() {
            errors.insert(Field::ModelType, MODEL_TYPE_REQUIRED);
        }
        if self.context_window == Some(0) {
            errors.insert(Field::ContextWindow, CONTEXT_WINDOW_INVALID);
        }
        errors
    }

    /// The owning provider is injected here; the draft never carries it.
    pub fn to_create(&self, provider_id: &str) -> ModelCreate {
        ModelCreate {
            provider_id: provider_id.to_string(),
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            description: (!self.description.is_empty()).then(|| self.description.clone()),
            model_type: self.model_type.unwrap_or_default(),
            context_window: self.context_window,
            is_active: self.is_active,
            default_parameters: self.default_parameters.clone(),
        }
    }

    pub fn to_update(&self) -> ModelUpdate {
        ModelUpdate {
            name: None,
            display_name: Some(self.display_name.clone()),
            description: Some(self.description.clone()),
            model_type: self.model_type,
            context_window: self.context_window,
            is_active: Some(self.is_active),
            default_parameters: Some(self.default_parameters.clone()),
        }
    }
}

pub struct ModelForm<S: ModelService + ?Sized> {
    service: Arc<S>,
    provider_id: String,
    mode: FormMode<Model>,
    draft: ModelDraft,
    parameters: ParametersEditor,
    errors: FieldErrors,
    submitting: bool,
    submit_error: Option<String>,
}

impl<S: ModelService + ?Sized> ModelForm<S> {
    pub fn new(service: Arc<S>, provider_id: impl Into<String>, mode: FormMode<Model>) -> Self {
        let draft = ModelDraft::initial(&mode);
        let parameters = ParametersEditor::new(&draft.default_parameters);
        Self {
            service,
            provider_id: provider_id.into(),
            mode,
            draft,
            parameters,
            errors: FieldErrors::new(),
            submitting: false,
            submit_error: None,
        }
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn draft(&self) -> &ModelDraft {
        &self.draft
    }

    pub fn parameters_editor(&self) -> &ParametersEditor {
        &self.parameters
    }

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

    pub fn set_model_type(&mut self, value: Option<ModelType>) {
        self.draft.model_type = value;
    }

    pub fn set_context_window(&mut self, value: Option<u32>) {
        self.draft.context_window = value;
    }

    pub fn set_is_active(&mut self, value: bool) {
        self.draft.is_active = value;
    }

    /// Feeds parameter text through the editor. The draft only changes when
    /// the text parses as a JSON object.
    pub fn edit_parameters(&mut self, text: &str) -> bool {
        match self.parameters.edit(text) {
            Some(parsed) => {
                self.draft.default_parameters = parsed.clone();
                true
            }
            None => {
                if let Some(reason) = self.parameters.error() {
                    warn!(provider_id = %self.provider_id, reason = %reason, "Rejected parameter edit");
                }
                false
            }
        }
    }
}

#[async_trait]
impl<S: ModelService + ?Sized> EntityForm for ModelForm<S> {
    type Entity = Model;

    fn mode(&self) -> &FormMode<Model> {
        &self.mode
    }

    fn reset(&mut self, mode: FormMode<Model>) {
        self.draft = ModelDraft::initial(&mode);
        self.parameters = ParametersEditor::new(&self.draft.default_parameters);
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

    async fn submit(&mut self) -> SubmitOutcome<Model> {
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
                FormMode::Edit(model) => {
                    self.service
                        .update(&self.provider_id, &model.id, &self.draft.to_update())
                        .await
                }
                FormMode::Create => {
                    self.service
                        .create(&self.provider_id, &self.draft.to_create(&self.provider_id))
                        .await
                }
            }
        };

        match result {
            Ok(model) => {
                info!(provider_id = %self.provider_id, model_id = %model.id, "Model form saved");
                SubmitOutcome::Saved(model)
            }
            Err(e) => {
                error!(provider_id = %self.provider_id, name = %self.draft.name, error = %e, "Error saving model");
                let message = e.user_message();
                self.submit_error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    fn title(&self) -> &'static str {
        if self.mode.is_edit() { "Edit Model" } else { "Add Model" }
    }
}
