//! # 实体服务层
//!
//! 每个操作对应一个 HTTP 动词 + 路径，不做重试、不改写响应。

pub mod model_service;
pub mod provider_service;

pub use model_service::{HttpModelService, ModelService};
pub use provider_service::{HttpProviderService, ProviderService};
