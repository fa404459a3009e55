use async_trait::async_trait;
use tracing::info;

use crate::api::{routes, ApiClient, ClientError};
use crate::dto::{ModelProvider, ModelProviderCreate, ModelProviderUpdate};

#[async_trait]
pub trait ProviderService: Send + Sync {
    async fn list(&self) -> Result<Vec<ModelProvider>, ClientError>;

    async fn list_with_models(&self) -> Result<Vec<ModelProvider>, ClientError>;

    async fn get(&self, id: &str) -> Result<ModelProvider, ClientError>;

    /// Provider plus its `models` in one round trip.
    async fn get_with_models(&self, id: &str) -> Result<ModelProvider, ClientError>;

    async fn create(&self, payload: &ModelProviderCreate) -> Result<ModelProvider, ClientError>;

    async fn update(&self, id: &str, payload: &ModelProviderUpdate) -> Result<ModelProvider, ClientError>;

    /// The backend cascades the delete to the provider's models.
    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpProviderService {
    client: ApiClient,
}

impl HttpProviderService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl ProviderService for HttpProviderService {
    async fn list(&self) -> Result<Vec<ModelProvider>, ClientError> {
        self.client.get(&routes::providers()).await
    }

    async fn list_with_models(&self) -> Result<Vec<ModelProvider>, ClientError> {
        self.client.get(&routes::providers_with_models()).await
    }

    async fn get(&self, id: &str) -> Result<ModelProvider, ClientError> {
        self.client.get(&routes::provider(id)).await
    }

    async fn get_with_models(&self, id: &str) -> Result<ModelProvider, ClientError> {
        self.client.get(&routes::provider_with_models(id)).await
    }

    async fn create(&self, payload: &ModelProviderCreate) -> Result<ModelProvider, ClientError> {
        let provider: ModelProvider = self.client.post(&routes::providers(), payload).await?;
        info!(provider_id = %provider.id, name = %provider.name, "Model provider created");
        Ok(provider)
    }

    async fn update(&self, id: &str, payload: &ModelProviderUpdate) -> Result<ModelProvider, ClientError> {
        let provider: ModelProvider = self.client.put(&routes::provider(id), payload).await?;
        info!(provider_id = %id, "Model provider updated");
        Ok(provider)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.client.delete(&routes::provider(id)).await?;
        info!(provider_id = %id, "Model provider deleted");
        Ok(())
    }
}
