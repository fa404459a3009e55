use async_trait::async_trait;
use tracing::info;

use crate::api::{routes, ApiClient, ClientError};
use crate::dto::{Model, ModelCreate, ModelUpdate};

/// Models are a nested resource; every call names the owning provider.
#[async_trait]
pub trait ModelService: Send + Sync {
    async fn list(&self, provider_id: &str) -> Result<Vec<Model>, ClientError>;

    async fn get(&self, provider_id: &str, model_id: &str) -> Result<Model, ClientError>;

    async fn create(&self, provider_id: &str, payload: &ModelCreate) -> Result<Model, ClientError>;

    async fn update(&self, provider_id: &str, model_id: &str, payload: &ModelUpdate) -> Result<Model, ClientError>;

    async fn delete(&self, provider_id: &str, model_id: &str) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpModelService {
    client: ApiClient,
}

impl HttpModelService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModelService for HttpModelService {
    async fn list(&self, provider_id: &str) -> Result<Vec<Model>, ClientError> {
        self.client.get(&routes::models(provider_id)).await
    }

    async fn get(&self, provider_id: &str, model_id: &str) -> Result<Model, ClientError> {
        self.client.get(&routes::model(provider_id, model_id)).await
    }

    async fn create(&self, provider_id: &str, payload: &ModelCreate) -> Result<Model, ClientError> {
        let model: Model = self.client.post(&routes::models(provider_id), payload).await?;
        info!(provider_id = %provider_id, model_id = %model.id, name = %model.name, "Model created");
        Ok(model)
    }

    async fn update(&self, provider_id: &str, model_id: &str, payload: &ModelUpdate) -> Result<Model, ClientError> {
        let model: Model = self.client.put(&routes::model(provider_id, model_id), payload).await?;
        info!(provider_id = %provider_id, model_id = %model_id, "Model updated");
        Ok(model)
    }

    async fn delete(&self, provider_id: &str, model_id: &str) -> Result<(), ClientError> {
        self.client.delete(&routes::model(provider_id, model_id)).await?;
        info!(provider_id = %provider_id, model_id = %model_id, "Model deleted");
        Ok(())
    }
}
