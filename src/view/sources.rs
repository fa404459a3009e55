use async_trait::async_trait;
use std::sync::Arc;

use super::list_view::{ListSource, ListView};
use crate::api::ClientError;
use crate::dto::{Model, ModelProvider};
use crate::form::{FormMode, ModelForm, ProviderForm};
use crate::service::{ModelService, ProviderService};

pub struct ProviderSource<P: ProviderService + ?Sized> {
    service: Arc<P>,
}

impl<P: ProviderService + ?Sized> ProviderSource<P> {
    pub fn new(service: Arc<P>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<P: ProviderService + ?Sized> ListSource for ProviderSource<P> {
    type Item = ModelProvider;
    type Form = ProviderForm<P>;

    async fn fetch(&self) -> Result<Vec<ModelProvider>, ClientError> {
        self.service.list().await
    }

    async fn remove(&self, item: &ModelProvider) -> Result<(), ClientError> {
        self.service.delete(&item.id).await
    }

    fn open_form(&self, mode: FormMode<ModelProvider>) -> ProviderForm<P> {
        ProviderForm::new(Arc::clone(&self.service), mode)
    }

    fn load_error(&self) -> &'static str {
        "Failed to load model providers"
    }

    fn delete_error(&self) -> &'static str {
        "Failed to delete model provider"
    }

    fn delete_prompt(&self, item: &ModelProvider) -> String {
        format!(
            "Are you sure you want to delete the model provider \"{}\"? This will also delete all associated models.",
            item.display_name
        )
    }
}

/// Models of a single provider.
pub struct ModelSource<M: ModelService + ?Sized> {
    service: Arc<M>,
    provider_id: String,
}

impl<M: ModelService + ?Sized> ModelSource<M> {
    pub fn new(service: Arc<M>, provider_id: impl Into<String>) -> Self {
        Self { service, provider_id: provider_id.into() }
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }
}

#[async_trait]
impl<M: ModelService + ?Sized> ListSource for ModelSource<M> {
    type Item = Model;
    type Form = ModelForm<M>;

    async fn fetch(&self) -> Result<Vec<Model>, ClientError> {
        self.service.list(&self.provider_id).await
    }

    async fn remove(&self, item: &Model) -> Result<(), ClientError> {
        self.service.delete(&self.provider_id, &item.id).await
    }

    fn open_form(&self, mode: FormMode<Model>) -> ModelForm<M> {
        ModelForm::new(Arc::clone(&self.service), self.provider_id.clone(), mode)
    }

    fn load_error(&self) -> &'static str {
        "Failed to load models"
    }

    fn delete_error(&self) -> &'static str {
        "Failed to delete model"
    }

    fn delete_prompt(&self, item: &Model) -> String {
        format!("Are you sure you want to delete the model \"{}\"?", item.display_name)
    }
}

pub type ProvidersView<P> = ListView<ProviderSource<P>>;
pub type ModelsView<M> = ListView<ModelSource<M>>;

impl<P: ProviderService + ?Sized> ListView<ProviderSource<P>> {
    pub fn for_providers(service: Arc<P>) -> Self {
        ListView::new(ProviderSource::new(service))
    }
}

impl<M: ModelService + ?Sized> ListView<ModelSource<M>> {
    pub fn for_models(service: Arc<M>, provider_id: impl Into<String>) -> Self {
        ListView::new(ModelSource::new(service, provider_id))
    }
}
