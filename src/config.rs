//! # 控制台配置
//!
//! 从环境变量读取后端地址、超时和用户代理，缺省值适用于本地开发。

use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use std::time::Duration;

use crate::api::client::{ClientConfig, TimeoutConfig};

pub const ENV_API_BASE_URL: &str = "CONSOLE_API_BASE_URL";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "CONSOLE_CONNECT_TIMEOUT_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "CONSOLE_REQUEST_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "CONSOLE_USER_AGENT";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// 后端根地址（不含 `/api/v1`）
    pub api_base_url: Url,
    pub client: ClientConfig,
}

impl ConsoleConfig {
    pub fn new(api_base_url: &str) -> Result<Self> {
        Ok(Self {
            api_base_url: parse_base_url(api_base_url)?,
            client: ClientConfig::default(),
        })
    }

    pub fn with_client(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    /// Reads the `CONSOLE_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_API_BASE_URL)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let mut timeout = TimeoutConfig::default();
        if let Some(secs) = parse_secs(&lookup, ENV_CONNECT_TIMEOUT_SECS)? {
            timeout = timeout.with_connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_secs(&lookup, ENV_REQUEST_TIMEOUT_SECS)? {
            timeout = timeout.with_request_timeout(Duration::from_secs(secs));
        }

        let mut client = ClientConfig::new().with_timeout(timeout);
        if let Some(agent) = lookup(ENV_USER_AGENT).filter(|v| !v.trim().is_empty()) {
            client = client.with_user_agent(agent);
        }

        Ok(Self::new(&base_url)?.with_client(client))
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid API base URL: {}", raw))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow!("unsupported URL scheme for API base URL: {}", other)),
    }
}

fn parse_secs<F>(lookup: &F, key: &str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .with_context(|| format!("{} must be a whole number of seconds, got {:?}", key, raw)),
        _ => Ok(None),
    }
}
