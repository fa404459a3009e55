//! Paths under the model provider resource.

pub const MODEL_PROVIDERS_BASE: &str = "/api/v1/model-providers";

/// Collection route; the backend registers it with a trailing slash.
pub fn providers() -> String {
    format!("{}/", MODEL_PROVIDERS_BASE)
}

pub fn providers_with_models() -> String {
    format!("{}/with-models", MODEL_PROVIDERS_BASE)
}

pub fn provider(id: &str) -> String {
    format!("{}/{}", MODEL_PROVIDERS_BASE, id)
}

pub fn provider_with_models(id: &str) -> String {
    format!("{}/{}/with-models", MODEL_PROVIDERS_BASE, id)
}

pub fn models(provider_id: &str) -> String {
    format!("{}/{}/models", MODEL_PROVIDERS_BASE, provider_id)
}

pub fn model(provider_id: &str, model_id: &str) -> String {
    format!("{}/{}/models/{}", MODEL_PROVIDERS_BASE, provider_id, model_id)
}
