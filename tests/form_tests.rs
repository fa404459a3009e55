//! # 表单控制器测试集
//!
//! - 编辑模式的草稿初始化
//! - 本地校验阻止网络请求
//! - create / update 分流
//! - 失败时保留表单并显示后端消息
//! - 参数编辑器拒绝非法 JSON
//! - 提交被中途放弃后表单不会卡在提交中

use async_trait::async_trait;
use mockito::{Matcher, Server};
use provider_console::api::{ApiClient, ClientConfig, ClientError};
use provider_console::dto::{
    Model, ModelCreate, ModelProvider, ModelProviderCreate, ModelProviderUpdate, ModelType, ModelUpdate, Parameters,
};
use provider_console::form::validation::NAME_INVALID;
use provider_console::form::{EntityForm, Field, FormMode, ModelForm, ProviderForm, SubmitOutcome};
use provider_console::service::{HttpModelService, HttpProviderService, ModelService, ProviderService};
use reqwest::Url;
use serde_json::json;
use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

fn services(server: &Server) -> (Arc<HttpProviderService>, Arc<HttpModelService>) {
    let client = ApiClient::new(Url::parse(&server.url()).unwrap(), ClientConfig::default()).unwrap();
    (
        Arc::new(HttpProviderService::new(client.clone())),
        Arc::new(HttpModelService::new(client)),
    )
}

fn existing_provider() -> ModelProvider {
    ModelProvider {
        id: "p1".to_string(),
        name: "openai".to_string(),
        display_name: "OpenAI".to_string(),
        description: Some("GPT family".to_string()),
        api_base_url: Some("https://api.openai.com/v1".to_string()),
        api_key_env_var: None,
        is_active: true,
        created_at: Some("2024-05-01T10:00:00".to_string()),
        updated_at: Some("2024-05-01T10:00:00".to_string()),
        models: None,
    }
}

fn existing_model() -> Model {
    let mut params = Parameters::new();
    params.insert("temperature".to_string(), json!(0.7));
    Model {
        id: "m1".to_string(),
        provider_id: "p1".to_string(),
        name: "gpt-4".to_string(),
        display_name: "GPT-4".to_string(),
        description: None,
        model_type: ModelType::Chat.into(),
        context_window: Some(8192),
        is_active: true,
        default_parameters: Some(params),
        created_at: None,
        updated_at: None,
    }
}

/// 所有调用都挂起不返回的后端
struct StalledBackend;

#[async_trait]
impl ProviderService for StalledBackend {
    async fn list(&self) -> Result<Vec<ModelProvider>, ClientError> {
        pending().await
    }

    async fn list_with_models(&self) -> Result<Vec<ModelProvider>, ClientError> {
        pending().await
    }

    async fn get(&self, _id: &str) -> Result<ModelProvider, ClientError> {
        pending().await
    }

    async fn get_with_models(&self, _id: &str) -> Result<ModelProvider, ClientError> {
        pending().await
    }

    async fn create(&self, _payload: &ModelProviderCreate) -> Result<ModelProvider, ClientError> {
        pending().await
    }

    async fn update(&self, _id: &str, _payload: &ModelProviderUpdate) -> Result<ModelProvider, ClientError> {
        pending().await
    }

    async fn delete(&self, _id: &str) -> Result<(), ClientError> {
        pending().await
    }
}

#[async_trait]
impl ModelService for StalledBackend {
    async fn list(&self, _provider_id: &str) -> Result<Vec<Model>, ClientError> {
        pending().await
    }

    async fn get(&self, _provider_id: &str, _model_id: &str) -> Result<Model, ClientError> {
        pending().await
    }

    async fn create(&self, _provider_id: &str, _payload: &ModelCreate) -> Result<Model, ClientError> {
        pending().await
    }

    async fn update(&self, _provider_id: &str, _model_id: &str, _payload: &ModelUpdate) -> Result<Model, ClientError> {
        pending().await
    }

    async fn delete(&self, _provider_id: &str, _model_id: &str) -> Result<(), ClientError> {
        pending().await
    }
}

const GIVE_UP_AFTER: Duration = Duration::from_millis(20);

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Provider 表单 ==========

    #[tokio::test]
    async fn test_invalid_name_never_reaches_network() {
        let mut server = Server::new_async().await;
        let create = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let (providers, _) = services(&server);

        for bad in ["OpenAI", "open ai", "open.ai", ""] {
            let mut form = ProviderForm::new(Arc::clone(&providers), FormMode::Create);
            form.set_name(bad);
            form.set_display_name("OpenAI");
            assert_eq!(form.submit().await, SubmitOutcome::Invalid);
            assert!(form.field_errors().contains(Field::Name));
            assert!(!form.is_submitting());
        }
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_edit_mode_seeds_and_locks_name() {
        let server = Server::new_async().await;
        let (providers, _) = services(&server);

        let mut form = ProviderForm::new(providers, FormMode::Edit(existing_provider()));
        let draft = form.draft();
        assert_eq!(draft.name, "openai");
        assert_eq!(draft.display_name, "OpenAI");
        assert_eq!(draft.description, "GPT family");
        assert_eq!(draft.api_base_url, "https://api.openai.com/v1");
        assert_eq!(draft.api_key_env_var, "");
        assert!(draft.is_active);

        assert!(!form.name_editable());
        form.set_name("renamed");
        assert_eq!(form.draft().name, "openai");
        assert_eq!(form.title(), "Edit Model Provider");
    }

    #[tokio::test]
    async fn test_update_omits_name() {
        let mut server = Server::new_async().await;
        let update = server
            .mock("PUT", "/api/v1/model-providers/p1")
            .match_body(Matcher::Json(json!({
                "display_name": "OpenAI Platform",
                "description": "GPT family",
                "api_base_url": "https://api.openai.com/v1",
                "api_key_env_var": "OPENAI_API_KEY",
                "is_active": false
            })))
            .with_status(200)
            .with_body(serde_json::to_string(&existing_provider()).unwrap())
            .expect(1)
            .create_async()
            .await;
        let (providers, _) = services(&server);

        let mut form = ProviderForm::new(providers, FormMode::Edit(existing_provider()));
        form.set_display_name("OpenAI Platform");
        form.set_api_key_env_var("OPENAI_API_KEY");
        form.set_is_active(false);

        let outcome = form.submit().await;
        assert!(outcome.refresh_requested());
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_create_keeps_form_and_surfaces_detail() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/model-providers/")
            .with_status(400)
            .with_body(r#"{"detail": "Model provider with this name already exists."}"#)
            .expect(1)
            .create_async()
            .await;
        let (providers, _) = services(&server);

        let mut form = ProviderForm::new(providers, FormMode::Create);
        form.set_name("openai");
        form.set_display_name("OpenAI");

        let outcome = form.submit().await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed("Model provider with this name already exists.".to_string())
        );
        assert!(!outcome.refresh_requested());
        assert_eq!(form.submit_error(), Some("Model provider with this name already exists."));
        assert!(!form.is_submitting());
        assert_eq!(form.draft().name, "openai");
    }

    #[tokio::test]
    async fn test_reset_to_create_drops_previous_edit() {
        let server = Server::new_async().await;
        let (providers, _) = services(&server);

        let mut form = ProviderForm::new(providers, FormMode::Edit(existing_provider()));
        form.set_display_name("");
        assert!(!form.validate());

        form.reset(FormMode::Create);
        let draft = form.draft();
        assert_eq!(draft.name, "");
        assert_eq!(draft.display_name, "");
        assert_eq!(draft.description, "");
        assert_eq!(draft.api_base_url, "");
        assert!(draft.is_active);
        assert!(form.field_errors().is_empty());
        assert!(form.name_editable());
        assert_eq!(form.title(), "Add Model Provider");
    }

    // ========== Model 表单 ==========

    #[tokio::test]
    async fn test_model_create_injects_provider_id() {
        let mut server = Server::new_async().await;
        let create = server
            .mock("POST", "/api/v1/model-providers/p1/models")
            .match_body(Matcher::Json(json!({
                "provider_id": "p1",
                "name": "gpt-4o",
                "display_name": "GPT-4o",
                "model_type": "chat",
                "context_window": 128000,
                "is_active": true,
                "default_parameters": {"max_tokens": 1024}
            })))
            .with_status(200)
            .with_body(serde_json::to_string(&existing_model()).unwrap())
            .expect(1)
            .create_async()
            .await;
        let (_, models) = services(&server);

        let mut form = ModelForm::new(models, "p1", FormMode::Create);
        form.set_name("gpt-4o");
        form.set_display_name("GPT-4o");
        form.set_context_window(Some(128000));
        assert!(form.edit_parameters(r#"{"max_tokens": 1024}"#));

        assert!(form.submit().await.refresh_requested());
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_model_edit_uses_nested_update_route() {
        let mut server = Server::new_async().await;
        let update = server
            .mock("PUT", "/api/v1/model-providers/p1/models/m1")
            .match_body(Matcher::PartialJson(json!({"model_type": "completion", "is_active": false})))
            .with_status(200)
            .with_body(serde_json::to_string(&existing_model()).unwrap())
            .expect(1)
            .create_async()
            .await;
        let (_, models) = services(&server);

        let mut form = ModelForm::new(models, "p1", FormMode::Edit(existing_model()));
        form.set_model_type(Some(ModelType::Completion));
        form.set_is_active(false);

        assert!(matches!(form.submit().await, SubmitOutcome::Saved(_)));
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_parameters_leave_draft_unchanged() {
        let server = Server::new_async().await;
        let (_, models) = services(&server);

        let mut form = ModelForm::new(models, "p1", FormMode::Edit(existing_model()));
        let before = form.draft().default_parameters.clone();

        assert!(!form.edit_parameters(r#"{"temperature": 0.9,"#));
        assert_eq!(form.draft().default_parameters, before);
        assert!(form.parameters_editor().error().is_some());
        assert_eq!(form.parameters_editor().text(), r#"{"temperature": 0.9,"#);

        assert!(form.edit_parameters(r#"{"temperature": 0.9}"#));
        assert_eq!(form.draft().default_parameters["temperature"], json!(0.9));
        assert!(form.parameters_editor().error().is_none());
    }

    #[tokio::test]
    async fn test_model_validation_messages() {
        let server = Server::new_async().await;
        let (_, models) = services(&server);

        let mut form = ModelForm::new(models, "p1", FormMode::Create);
        form.set_name("GPT 4");
        form.set_model_type(None);
        form.set_context_window(Some(0));

        assert_eq!(form.submit().await, SubmitOutcome::Invalid);
        let errors = form.field_errors();
        assert_eq!(errors.get(Field::Name), Some(NAME_INVALID));
        assert!(errors.contains(Field::DisplayName));
        assert!(errors.contains(Field::ModelType));
        assert!(errors.contains(Field::ContextWindow));
    }

    #[tokio::test]
    async fn test_model_reset_restores_defaults() {
        let server = Server::new_async().await;
        let (_, models) = services(&server);

        let mut form = ModelForm::new(models, "p1", FormMode::Edit(existing_model()));
        form.set_model_type(Some(ModelType::Audio));
        form.reset(FormMode::Create);

        let draft = form.draft();
        assert_eq!(draft.name, "");
        assert_eq!(draft.model_type, Some(ModelType::Chat));
        assert_eq!(draft.context_window, None);
        assert!(draft.default_parameters.is_empty());
        assert_eq!(form.parameters_editor().text(), "{}");
    }

    // ========== 放弃提交 ==========

    #[tokio::test]
    async fn test_abandoned_provider_submit_releases_form() {
        let mut form = ProviderForm::new(Arc::new(StalledBackend), FormMode::Create);
        form.set_name("openai");
        form.set_display_name("OpenAI");

        assert!(tokio::time::timeout(GIVE_UP_AFTER, form.submit()).await.is_err());
        assert!(!form.is_submitting());

        // the next attempt reaches the backend again instead of reporting Busy
        assert!(tokio::time::timeout(GIVE_UP_AFTER, form.submit()).await.is_err());

        form.reset(FormMode::Create);
        assert!(!form.is_submitting());
        form.set_name("openai");
        form.set_display_name("OpenAI");
        assert!(tokio::time::timeout(GIVE_UP_AFTER, form.submit()).await.is_err());
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_abandoned_model_submit_releases_form() {
        let mut form = ModelForm::new(Arc::new(StalledBackend), "p1", FormMode::Edit(existing_model()));

        assert!(tokio::time::timeout(GIVE_UP_AFTER, form.submit()).await.is_err());
        assert!(!form.is_submitting());

        form.reset(FormMode::Create);
        form.set_name("gpt-4o");
        form.set_display_name("GPT-4o");
        assert!(tokio::time::timeout(GIVE_UP_AFTER, form.submit()).await.is_err());
        assert!(!form.is_submitting());
    }
}
