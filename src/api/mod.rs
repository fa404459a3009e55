//! # REST 接入层
//!
//! `client` 封装 HTTP 细节，`routes` 只负责拼路径。

pub mod client;
pub mod routes;

pub use client::{ApiClient, ClientConfig, ClientError, TimeoutConfig};
