// src/errors.rs
// 定义请求层统一的错误类型。
// 所有失败都只影响单个请求，通过 Result 返回给调用方，不做重试也不吞掉。

use crate::response::ApiResponse;
use thiserror::Error;

/// 传输层错误 (没有拿到响应，或 HTTP 状态码非 2xx)
/// Display 文本与常见前端 HTTP 库的报错文本保持一致，
/// 这样 `interceptors::describe_transport_error` 对类型化错误和自定义文本的判定结果相同。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    // 连接失败、DNS 失败等，没有收到任何响应
    #[error("Network Error")]
    Network { detail: String },

    #[error("timeout of {timeout_ms}ms exceeded")]
    Timeout { timeout_ms: u64 },

    #[error("Request failed with status code {status}")]
    Status { status: u16 },

    #[error("{0}")]
    Other(String),
}

/// 单次请求的错误
#[derive(Error, Debug)]
pub enum RequestError {
    /// 被同 key 的新请求取消，不弹提示
    #[error("{0}")]
    Canceled(String),

    /// 业务失败，携带原始响应体
    #[error("服务端返回错误码 {}: {}", code_label(.0), .0.msg)]
    Server(ApiResponse<serde_json::Value>),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("响应解析失败: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("请求体序列化失败: {0}")]
    Encode(#[source] serde_json::Error),
}

fn code_label(envelope: &ApiResponse<serde_json::Value>) -> String {
    envelope
        .code
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default()
}

impl RequestError {
    pub fn is_canceled(&self) -> bool {
        matches!(self, RequestError::Canceled(_))
    }

    /// 业务失败时取出原始响应体
    pub fn envelope(&self) -> Option<&ApiResponse<serde_json::Value>> {
        match self {
            RequestError::Server(envelope) => Some(envelope),
            _ => None,
        }
    }
}
