//! # 实体与请求体
//!
//! 与后端 JSON 结构一一对应的类型。

pub mod model_dto;
pub mod provider_dto;

pub use model_dto::{Model, ModelCreate, ModelKind, ModelType, ModelUpdate, Parameters};
pub use provider_dto::{ModelProvider, ModelProviderCreate, ModelProviderUpdate};

/// Server-assigned identity shared by every entity the views manage.
pub trait Identified {
    fn id(&self) -> &str;
}

pub(crate) fn default_true() -> bool {
    true
}
