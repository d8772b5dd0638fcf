// src/clients/transport.rs
// 传输层抽象：HttpClient 只负责拦截逻辑，真正的 HTTP 收发交给 Transport。
// 测试里可以换成内存实现，生产环境用 reqwest。

use crate::config::ClientConfig;
use crate::errors::TransportError;
use crate::setup::build_http_client;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::{debug, warn};

/// 经过请求拦截后、即将发出的请求
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    // 完整地址 (GET 的查询参数已经拼接在这里)
    pub url: String,
    // 交给传输层自行编码的查询参数 (仅非 GET 请求)
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// 2xx 响应
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// HTTP 传输接口
/// 约定：非 2xx 状态码必须以 `TransportError::Status` 返回
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError>;
}

/// 基于 reqwest 的传输实现
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = build_http_client(config)
            .map_err(|e| TransportError::Other(format!("无法创建 HTTP 客户端: {}", e)))?;
        Ok(Self { client })
    }

    /// 复用外部已经构建好的 reqwest::Client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        let timeout = request.timeout;
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .timeout(timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body).map_err(|e| TransportError::Other(e.to_string()))?;
            builder = builder.body(bytes);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            warn!("(Transport) {} {} 返回非 2xx 状态码: {}", request.method, request.url, status);
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| classify(e, timeout))?;
        debug!("(Transport) {} {} -> {} ({} bytes)", request.method, request.url, status, body.len());

        Ok(RawResponse {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

/// 将 reqwest 错误归类为超时 / 网络错误 / 其它
fn classify(error: reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    } else if error.is_builder() {
        TransportError::Other(error.to_string())
    } else {
        TransportError::Network {
            detail: error.to_string(),
        }
    }
}
