//! # 后端 REST 客户端
//!
//! 对 reqwest 的薄封装，提供：
//! - 超时和默认请求头配置
//! - 统一的错误类型（含后端 `detail` 消息解析）
//! - 请求日志与简单计数指标
//!
//! 不做重试：失败原样返回给调用方。

use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::ConsoleConfig;

/// 超时配置
///
/// `None` leaves the transport default in place.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// 总请求超时时间
    pub request_timeout: Option<Duration>,
    /// 连接超时时间
    pub connect_timeout: Option<Duration>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_timeout: None,
            connect_timeout: None,
        }
    }
}

impl TimeoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

/// 完整的客户端配置
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// 超时配置
    pub timeout: TimeoutConfig,
    /// 默认请求头
    pub default_headers: HashMap<String, String>,
    /// 用户代理
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: TimeoutConfig::default(),
            default_headers: HashMap::new(),
            user_agent: "Provider-Console/1.0".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: TimeoutConfig) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn add_header(mut self, key: String, value: String) -> Self {
        self.default_headers.insert(key, value);
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// 客户端错误类型
#[derive(Debug, Error)]
pub enum ClientError {
    /// 网络错误
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },
    /// 后端返回非 2xx 状态
    #[error("API error: {message} (status: {status})")]
    Api { status: u16, message: String },
    /// 响应体解析失败
    #[error("Serialization error: {source}")]
    Decode {
        #[from]
        source: serde_json::Error,
    },
    /// 配置错误
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Network { source } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    /// Text suitable for showing next to a form or on a page.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Network { source } => format!("Unable to reach the server: {}", source),
            ClientError::Decode { .. } => "Unexpected response from the server".to_string(),
            ClientError::Config { message } => message.clone(),
        }
    }
}

/// Pulls a readable message out of an error body.
///
/// The backend answers with `{"detail": "..."}`, or with a list of
/// validation entries carrying `msg` for 422s.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(serde_json::Value::Array(entries)) => {
                let msgs: Vec<&str> = entries
                    .iter()
                    .filter_map(|e| e.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if !msgs.is_empty() {
                    return msgs.join("; ");
                }
            }
            _ => {}
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

/// 请求上下文信息，用于日志记录
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// 请求唯一标识符
    pub request_id: String,
    pub method: Method,
    /// 请求 URL
    pub url: String,
    /// 请求开始时间
    pub start_time: Instant,
}

impl RequestContext {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            method,
            url: url.to_string(),
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// 客户端监控指标
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMetrics {
    /// 总请求数
    pub total_requests: u64,
    /// 成功请求数
    pub successful_requests: u64,
    /// 失败请求数
    pub failed_requests: u64,
    /// 最长响应时间
    pub max_response_time: Duration,
}

/// 后端 API 客户端
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: HttpClient,
    base_url: Url,
    config: ClientConfig,
    metrics: Arc<Mutex<ClientMetrics>>,
}

impl ApiClient {
    pub fn new(base_url: Url, config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = HttpClient::builder()
            .no_proxy()
            .user_agent(&config.user_agent);

        if let Some(timeout) = config.timeout.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.timeout.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        let mut default_headers = reqwest::header::HeaderMap::new();
        for (key, value) in &config.default_headers {
            let name = reqwest::header::HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                ClientError::Config { message: format!("Invalid header name {}: {}", key, e) }
            })?;
            let value = reqwest::header::HeaderValue::from_str(value).map_err(|e| {
                ClientError::Config { message: format!("Invalid value for header {}: {}", key, e) }
            })?;
            default_headers.insert(name, value);
        }
        builder = builder.default_headers(default_headers);

        let client = builder.build().map_err(|e| ClientError::Config {
            message: format!("Failed to build HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            base_url,
            config,
            metrics: Arc::new(Mutex::new(ClientMetrics::default())),
        })
    }

    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ClientError> {
        Self::new(config.api_base_url.clone(), config.client.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 获取监控指标
    pub fn metrics(&self) -> ClientMetrics {
        self.metrics.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Absolute URL for an API path such as `/api/v1/model-providers/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    pub async fn get<T>(&self, path: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let ctx = RequestContext::new(Method::GET, &url);
        let response = self.dispatch(&ctx, self.client.get(&url)).await?;
        self.decode(&ctx, response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let ctx = RequestContext::new(Method::POST, &url);
        let response = self.dispatch(&ctx, self.client.post(&url).json(body)).await?;
        self.decode(&ctx, response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let ctx = RequestContext::new(Method::PUT, &url);
        let response = self.dispatch(&ctx, self.client.put(&url).json(body)).await?;
        self.decode(&ctx, response).await
    }

    /// DELETE; any response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = self.url(path);
        let ctx = RequestContext::new(Method::DELETE, &url);
        self.dispatch(&ctx, self.client.delete(&url)).await?;
        Ok(())
    }

    async fn dispatch(&self, ctx: &RequestContext, request: RequestBuilder) -> Result<Response, ClientError> {
        self.log_request_start(ctx);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.log_network_error(ctx, &e);
                self.update_failure_metrics();
                return Err(ClientError::Network { source: e });
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(status, &body);
            self.log_api_error(ctx, &message, status);
            self.update_failure_metrics();
            return Err(ClientError::Api { status: status.as_u16(), message });
        }

        self.log_request_success(ctx, status);
        self.update_success_metrics(ctx.elapsed());
        Ok(response)
    }

    async fn decode<T>(&self, ctx: &RequestContext, response: Response) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(
                request_id = %ctx.request_id,
                url = %ctx.url,
                error = %e,
                "Failed to decode response body"
            );
            ClientError::from(e)
        })
    }

    fn update_success_metrics(&self, response_time: Duration) {
        if let Ok(mut metrics) = self.metrics.lock() {
            metrics.total_requests += 1;
            metrics.successful_requests += 1;
            if response_time > metrics.max_response_time {
                metrics.max_response_time = response_time;
            }
        }
    }

    fn update_failure_metrics(&self) {
        if let Ok(mut metrics) = self.metrics.lock() {
            metrics.total_requests += 1;
            metrics.failed_requests += 1;
        }
    }

    fn log_request_start(&self, ctx: &RequestContext) {
        debug!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            url = %ctx.url,
            "Starting HTTP request"
        );
    }

    fn log_request_success(&self, ctx: &RequestContext, status: StatusCode) {
        info!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            url = %ctx.url,
            status = status.as_u16(),
            elapsed_ms = ctx.elapsed().as_millis(),
            "Request completed successfully"
        );
    }

    fn log_network_error(&self, ctx: &RequestContext, error: &reqwest::Error) {
        let error_details = format!(
            "is_timeout: {}, is_connect: {}, is_request: {}",
            error.is_timeout(),
            error.is_connect(),
            error.is_request(),
        );

        error!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            url = %ctx.url,
            error_type = "network_error",
            error_details = %error_details,
            error_message = %error,
            "Network error occurred"
        );
    }

    fn log_api_error(&self, ctx: &RequestContext, message: &str, status: StatusCode) {
        error!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            url = %ctx.url,
            error_type = "api_error",
            status = status.as_u16(),
            error_message = %message,
            elapsed_ms = ctx.elapsed().as_millis(),
            "API error occurred"
        );
    }
}
