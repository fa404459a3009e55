//! # ApiClient 测试集
//!
//! - 配置类默认值与构建器
//! - 成功响应的解码
//! - 后端错误消息提取
//! - 指标统计
//! - HTTP 请求发送（使用 mockito 模拟）

use mockito::{Matcher, Server};
use provider_console::api::{ApiClient, ClientConfig, ClientError, TimeoutConfig};
use reqwest::Url;
use serde_json::{json, Value};
use std::time::Duration;

fn client_for(server: &Server, config: ClientConfig) -> ApiClient {
    ApiClient::new(Url::parse(&server.url()).unwrap(), config).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== 配置类测试 ==========

    #[test]
    fn test_timeout_config_default() {
        let config = TimeoutConfig::default();
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.connect_timeout, None);
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(TimeoutConfig::new().with_request_timeout(Duration::from_secs(5)))
            .add_header("X-Console".to_string(), "test".to_string())
            .with_user_agent("Test-Agent/1.0".to_string());

        assert_eq!(config.timeout.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.default_headers.get("X-Console"), Some(&"test".to_string()));
        assert_eq!(config.user_agent, "Test-Agent/1.0");
    }

    // ========== 请求发送测试 ==========

    #[tokio::test]
    async fn test_get_decodes_json_and_sends_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/model-providers/")
            .match_header("x-console", "test")
            .match_header("user-agent", "Test-Agent/1.0")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!([{"id": "p1"}]).to_string())
            .expect(1)
            .create_async()
            .await;

        let config = ClientConfig::new()
            .add_header("X-Console".to_string(), "test".to_string())
            .with_user_agent("Test-Agent/1.0".to_string());
        let client = client_for(&server, config);

        let body: Value = client.get("/api/v1/model-providers/").await.unwrap();
        assert_eq!(body, json!([{"id": "p1"}]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_and_put_send_json_body() {
        let mut server = Server::new_async().await;
        let post = server
            .mock("POST", "/things")
            .match_body(Matcher::Json(json!({"name": "a"})))
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/things/1")
            .match_body(Matcher::Json(json!({"name": "b"})))
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let client = client_for(&server, ClientConfig::default());
        let created: Value = client.post("/things", &json!({"name": "a"})).await.unwrap();
        let updated: Value = client.put("/things/1", &json!({"name": "b"})).await.unwrap();
        assert_eq!(created["ok"], json!(true));
        assert_eq!(updated["ok"], json!(true));
        post.assert_async().await;
        put.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_ignores_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/things/1")
            .with_status(200)
            .with_body(r#"{"id": "1"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, ClientConfig::default());
        client.delete("/things/1").await.unwrap();
        mock.assert_async().await;
    }

    // ========== 错误处理测试 ==========

    #[tokio::test]
    async fn test_api_error_carries_detail() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/model-providers/")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "Model provider with this name already exists."}"#)
            .create_async()
            .await;

        let client = client_for(&server, ClientConfig::default());
        let err = client
            .post::<_, Value>("/api/v1/model-providers/", &json!({"name": "openai"}))
            .await
            .unwrap_err();

        match &err {
            ClientError::Api { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "Model provider with this name already exists.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.user_message(), "Model provider with this name already exists.");
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_not_found_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/model-providers/missing")
            .with_status(404)
            .with_body(r#"{"detail": "Model provider not found"}"#)
            .create_async()
            .await;

        let client = client_for(&server, ClientConfig::default());
        let err = client.get::<Value>("/api/v1/model-providers/missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/broken")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = client_for(&server, ClientConfig::default());
        let err = client.get::<Value>("/broken").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let base = Url::parse("http://127.0.0.1:1").unwrap();
        let client = ApiClient::new(base, ClientConfig::default()).unwrap();
        let err = client.get::<Value>("/api/v1/model-providers/").await.unwrap_err();
        assert!(matches!(err, ClientError::Network { .. }));
        assert!(err.user_message().starts_with("Unable to reach the server"));
    }

    // ========== 指标测试 ==========

    #[tokio::test]
    async fn test_metrics_count_outcomes() {
        let mut server = Server::new_async().await;
        let _mock = server.mock("GET", "/ok").with_status(200).with_body("{}").create_async().await;
        let _mock = server.mock("GET", "/fail").with_status(500).with_body("").create_async().await;

        let client = client_for(&server, ClientConfig::default());
        let _: Value = client.get("/ok").await.unwrap();
        let _ = client.get::<Value>("/fail").await.unwrap_err();
        let _: Value = client.get("/ok").await.unwrap();

        let metrics = client.metrics();
        assert_eq!(metrics.total_requests, 3);
        assert_eq!(metrics.successful_requests, 2);
        assert_eq!(metrics.failed_requests, 1);
    }
}
