// src/clients/interceptors.rs
// 请求拦截 (合并配置、固定请求头、GET 参数映射) 与响应拦截 (业务码 / 传输错误翻译)。
// 这里全部是纯函数，提示的实际发送由 HttpClient 负责。

use super::http_client::RequestOptions;
use super::query::{append_query, flatten_params};
use super::transport::{PreparedRequest, RawResponse};
use crate::config::ClientConfig;
use crate::errors::{RequestError, TransportError};
use crate::notify::{Notice, TRANSPORT_NOTICE_DURATION};
use crate::response::ApiResponse;
use reqwest::Method;
use serde_json::Value;

pub const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

// --- 业务码提示 ---
pub const MSG_UNAUTHORIZED: &str = "认证失败，无法访问系统资源";
pub const MSG_FORBIDDEN: &str = "当前操作没有权限";
pub const MSG_NOT_FOUND: &str = "访问资源不存在";
pub const MSG_UNKNOWN: &str = "系统未知错误，请反馈给管理员";

// --- 传输错误提示 ---
pub const MSG_NETWORK: &str = "后端接口连接异常";
pub const MSG_TIMEOUT: &str = "系统接口请求超时";

/// 一次失败：返回给调用方的错误，以及需要弹出的提示 (取消时没有)
#[derive(Debug)]
pub struct Rejection {
    pub error: RequestError,
    pub notice: Option<Notice>,
}

impl Rejection {
    pub fn transport(error: TransportError) -> Self {
        let message = describe_transport_error(&error);
        Self {
            error: RequestError::Transport(error),
            notice: Some(Notice::timed(message, TRANSPORT_NOTICE_DURATION)),
        }
    }

    pub fn decode(error: serde_json::Error) -> Self {
        Self {
            notice: Some(Notice::timed(error.to_string(), TRANSPORT_NOTICE_DURATION)),
            error: RequestError::Decode(error),
        }
    }
}

// -------------------------------------
// --- 请求拦截 ---
// -------------------------------------

/// 合并客户端配置与单次请求参数，得到最终要发送的请求
pub fn prepare_request(config: &ClientConfig, options: RequestOptions) -> PreparedRequest {
    let RequestOptions {
        method,
        url,
        params,
        data,
        headers: extra_headers,
        timeout,
    } = options;

    // Content-Type 始终为 JSON，覆盖调用方传入的值
    let mut headers: Vec<(String, String)> = config
        .default_headers
        .iter()
        .cloned()
        .chain(extra_headers)
        .filter(|(name, _)| !name.eq_ignore_ascii_case("content-type"))
        .collect();
    headers.push(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));

    // GET 请求自己映射参数，其余请求交给传输层编码
    let mut query = Vec::new();
    let url = match params {
        Some(params) if method == Method::GET => append_query(&url, &params),
        Some(params) => {
            query = flatten_params(&params)
                .into_iter()
                .map(|pair| (pair.name(), pair.value))
                .collect();
            url
        }
        None => url,
    };

    PreparedRequest {
        method,
        url: combine_url(&config.base_url, &url),
        query,
        headers,
        body: data,
        timeout: timeout.unwrap_or(config.timeout),
    }
}

/// 相对地址拼到 base URL 后面；绝对地址 (含 `//host`) 原样使用
pub fn combine_url(base_url: &str, url: &str) -> String {
    if is_absolute_url(url) || base_url.is_empty() {
        return url.to_string();
    }
    if url.is_empty() {
        return base_url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        url.trim_start_matches('/')
    )
}

fn is_absolute_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    match url.find("://") {
        Some(end) => {
            let scheme = &url[..end];
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

// -------------------------------------
// --- 响应拦截 ---
// -------------------------------------

/// 解析响应体并按业务码分流。空响应体视为没有 data 的成功响应
pub fn interpret_response(raw: &RawResponse) -> Result<ApiResponse<Value>, Rejection> {
    let envelope: ApiResponse<Value> = if raw.body.iter().all(u8::is_ascii_whitespace) {
        ApiResponse {
            code: None,
            msg: String::new(),
            data: None,
        }
    } else {
        serde_json::from_slice(&raw.body).map_err(Rejection::decode)?
    };

    if envelope.is_success() {
        return Ok(envelope);
    }

    let message = describe_server_code(envelope.status_code());
    Err(Rejection {
        error: RequestError::Server(envelope),
        notice: Some(Notice::plain(message)),
    })
}

/// 非成功业务码对应的提示
pub fn describe_server_code(code: Option<i64>) -> &'static str {
    match code {
        Some(401) => MSG_UNAUTHORIZED,
        Some(403) => MSG_FORBIDDEN,
        Some(404) => MSG_NOT_FOUND,
        _ => MSG_UNKNOWN,
    }
}

pub fn describe_transport_error(error: &TransportError) -> String {
    describe_transport_message(&error.to_string())
}

/// 按报错文本翻译传输错误，无法识别的原样返回
pub fn describe_transport_message(message: &str) -> String {
    if message.contains("Network Error") {
        MSG_NETWORK.to_string()
    } else if message.contains("timeout") {
        MSG_TIMEOUT.to_string()
    } else if message.contains("Request failed with status code") {
        format!("系统接口{}异常", last_chars(message, 3))
    } else {
        message.to_string()
    }
}

fn last_chars(s: &str, n: usize) -> &str {
    let start = s
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(index, _)| index)
        .unwrap_or(0);
    &s[start..]
}
