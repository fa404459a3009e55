//! 模型 Provider 管理控制台的客户端核心：实体类型、REST 服务、
//! 表单控制器以及列表/详情页状态机。

pub mod api;
pub mod config;
pub mod dto;
pub mod form;
pub mod logger;
pub mod service;
pub mod view;

pub use api::{ApiClient, ClientError};
pub use config::ConsoleConfig;
