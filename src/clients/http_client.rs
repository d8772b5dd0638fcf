// src/clients/http_client.rs
// 请求客户端：持有配置、传输层、提示出口和在途请求登记表。
// 对外只有一个核心操作 `request`，其余方法都是它的简便版本。

use super::interceptors::{interpret_response, prepare_request, Rejection};
use super::pending::{self, cancel_pair, request_key, PendingGuard, PendingRequests, SharedPending};
use super::transport::{ReqwestTransport, Transport};
use crate::config::ClientConfig;
use crate::errors::{RequestError, TransportError};
use crate::notify::{LogNotifier, Notifier};
use crate::response::ApiResponse;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 单次请求参数
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    // 相对 base URL 的路径或绝对地址
    pub url: String,
    pub params: Option<Map<String, Value>>,
    pub data: Option<Value>,
    pub headers: Vec<(String, String)>,
    // 不设置时使用客户端配置的超时
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: None,
            data: None,
            headers: Vec::new(),
            timeout: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// 查询参数，只接受 JSON 对象，其它值忽略
    pub fn params(mut self, params: Value) -> Self {
        if let Value::Object(map) = params {
            self.params = Some(map);
        }
        self
    }

    /// 从任意可序列化的结构生成查询参数，序列化结果必须是对象
    pub fn try_params<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self, RequestError> {
        match serde_json::to_value(params).map_err(RequestError::Encode)? {
            Value::Object(map) => {
                self.params = Some(map);
                Ok(self)
            }
            Value::Null => Ok(self),
            other => Err(RequestError::Encode(serde::ser::Error::custom(format!(
                "查询参数必须是对象，实际为: {}",
                other
            )))),
        }
    }

    pub fn json(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn try_json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, RequestError> {
        let data = serde_json::to_value(body).map_err(RequestError::Encode)?;
        Ok(self.json(data))
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// 请求客户端，克隆后共享同一个登记表
#[derive(Clone)]
pub struct HttpClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    pending: SharedPending,
}

impl HttpClient {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            notifier,
            pending: Arc::new(Mutex::new(PendingRequests::new())),
        }
    }

    /// 使用 reqwest 传输层和日志提示出口
    pub fn from_config(config: ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::new(config, Arc::new(transport), Arc::new(LogNotifier)))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 当前在途请求的 key 列表
    pub fn pending_keys(&self) -> Vec<String> {
        pending::lock(&self.pending).keys()
    }

    pub fn is_pending(&self, url: &str, method: &Method) -> bool {
        pending::lock(&self.pending).contains(&request_key(url, method))
    }

    /// 发起请求。
    ///
    /// - 同 url + method 的旧请求若仍在途，会被取消 (旧请求收到 `RequestError::Canceled`，不弹提示)
    /// - 业务码为 200 时返回完整响应体，data 解码为 `T`
    /// - 其它业务码、传输错误都会先弹提示，再返回错误
    pub async fn request<T>(&self, options: RequestOptions) -> Result<ApiResponse<T>, RequestError>
    where
        T: DeserializeOwned,
    {
        // 1. 登记 (顶掉同 key 的旧请求)
        let key = request_key(&options.url, &options.method);
        let (handle, token) = cancel_pair();
        let guard = PendingGuard::register(&self.pending, key.clone(), handle);

        // 2. 请求拦截
        let prepared = prepare_request(&self.config, options);
        info!("(HttpClient) {}: {}", prepared.method, prepared.url);

        // 3. 发送，同时等待取消信号 (取消优先)
        let outcome = tokio::select! {
            biased;
            reason = token.cancelled() => {
                debug!("(HttpClient) 请求已取消: {} ({})", key, reason);
                return Err(RequestError::Canceled(reason));
            }
            result = self.transport.send(prepared) => result,
        };
        drop(guard);

        // 4. 响应拦截
        let envelope = outcome
            .map_err(Rejection::transport)
            .and_then(|raw| interpret_response(&raw))
            .map_err(|rejection| self.reject(rejection))?;

        envelope
            .decode_data::<T>()
            .map_err(|e| self.reject(Rejection::decode(e)))
    }

    /// 弹出提示并返回错误
    fn reject(&self, rejection: Rejection) -> RequestError {
        warn!("(HttpClient) 请求失败: {}", rejection.error);
        if let Some(notice) = rejection.notice {
            self.notifier.notify(notice);
        }
        rejection.error
    }

    // --- 简便版本 ---

    /// (最简 GET) 不带查询参数
    pub async fn get<T>(&self, url: &str) -> Result<ApiResponse<T>, RequestError>
    where
        T: DeserializeOwned,
    {
        self.request(RequestOptions::get(url)).await
    }

    /// (带 Query 的 GET)
    pub async fn get_with_query<T, Q>(&self, url: &str, query: &Q) -> Result<ApiResponse<T>, RequestError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request(RequestOptions::get(url).try_params(query)?).await
    }

    /// (最简 POST) 只带 Body
    pub async fn post<T, B>(&self, url: &str, body: &B) -> Result<ApiResponse<T>, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(RequestOptions::post(url).try_json(body)?).await
    }

    /// (带 Query 的 POST)
    pub async fn post_with_query<T, Q, B>(
        &self,
        url: &str,
        query: &Q,
        body: &B,
    ) -> Result<ApiResponse<T>, RequestError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let options = RequestOptions::post(url).try_params(query)?.try_json(body)?;
        self.request(options).await
    }
}
