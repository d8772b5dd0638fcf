// src/response.rs
// 定义服务端统一响应结构 {code, msg, data}，对应后端的 R<T>

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 成功状态码
pub const SUCCESS_CODE: i64 = 200;

/// 业务状态码
/// 后端有时返回数字 (200)，有时返回字符串 ("401")，这里两种都接受，
/// 序列化时保持原样，比较时统一转换为数字。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseCode {
    Number(serde_json::Number),
    Text(String),
}

impl ResponseCode {
    /// 转换为数字形式；无法识别时返回 None
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ResponseCode::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            }),
            ResponseCode::Text(s) => s.trim().parse().ok(),
        }
    }

    /// 是否属于 "空" 值 (0 或 "")，空值按成功处理
    fn is_blank(&self) -> bool {
        match self {
            ResponseCode::Number(n) => n.as_f64() == Some(0.0),
            ResponseCode::Text(s) => s.is_empty(),
        }
    }
}

impl From<i64> for ResponseCode {
    fn from(code: i64) -> Self {
        ResponseCode::Number(code.into())
    }
}

impl From<&str> for ResponseCode {
    fn from(code: &str) -> Self {
        ResponseCode::Text(code.to_string())
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Number(n) => write!(f, "{}", n),
            ResponseCode::Text(s) => f.write_str(s),
        }
    }
}

/// 统一的 API 响应结构
/// 泛型 T 代表 "data" 字段的类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    // 状态码 (e.g., 200, "401")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ResponseCode>,

    // 消息，缺失或 null 时为空串
    #[serde(default, deserialize_with = "null_as_empty")]
    pub msg: String,

    // 数据 (T)，错误响应中通常没有
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// --- 构造函数 ---

impl<T> ApiResponse<T> {
    /// 创建一个成功的响应 (code 200, data 为 Some(T))
    pub fn success(data: T) -> Self {
        Self {
            code: Some(SUCCESS_CODE.into()),
            msg: String::new(),
            data: Some(data),
        }
    }

    /// 创建一个失败的响应 (data 为 None)
    pub fn error(code: impl Into<ResponseCode>, msg: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            msg: msg.into(),
            data: None,
        }
    }

    /// 归一化后的状态码
    /// 未设置状态码 (缺失、null、0、"") 则默认成功状态
    pub fn status_code(&self) -> Option<i64> {
        match &self.code {
            None => Some(SUCCESS_CODE),
            Some(code) if code.is_blank() => Some(SUCCESS_CODE),
            Some(code) => code.as_i64(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code() == Some(SUCCESS_CODE)
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl ApiResponse<serde_json::Value> {
    /// 将原始 JSON data 解码为调用方需要的类型
    pub fn decode_data<T: DeserializeOwned>(self) -> Result<ApiResponse<T>, serde_json::Error> {
        let data = self.data.map(serde_json::from_value).transpose()?;
        Ok(ApiResponse {
            code: self.code,
            msg: self.msg,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_and_string_codes_normalize_to_the_same_value() {
        let numeric: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({"code": 401, "msg": "bad token"})).unwrap();
        let text: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({"code": "401", "msg": "bad token"})).unwrap();

        assert_eq!(numeric.status_code(), Some(401));
        assert_eq!(text.status_code(), Some(401));
        assert!(!numeric.is_success());
    }

    #[test]
    fn missing_or_blank_code_counts_as_success() {
        for body in [
            json!({"data": 1}),
            json!({"code": null, "data": 1}),
            json!({"code": 0, "data": 1}),
            json!({"code": "", "data": 1}),
        ] {
            let resp: ApiResponse<serde_json::Value> = serde_json::from_value(body).unwrap();
            assert!(resp.is_success(), "{:?}", resp);
        }
    }

    #[test]
    fn null_msg_reads_as_empty() {
        let resp: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({"code": 200, "msg": null})).unwrap();
        assert_eq!(resp.msg, "");
        assert_eq!(resp.data, None);
    }

    #[test]
    fn non_numeric_code_has_no_status() {
        let resp: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({"code": "E_FAIL"})).unwrap();
        assert_eq!(resp.status_code(), None);
    }

    #[test]
    fn raw_code_form_survives_serialization() {
        let resp = ApiResponse::<()>::error("403", "denied");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value, json!({"code": "403", "msg": "denied"}));
    }

    #[test]
    fn decode_data_converts_payload() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct User {
            id: u32,
        }

        let raw = ApiResponse::success(json!({"id": 5}));
        let typed: ApiResponse<User> = raw.decode_data().unwrap();
        assert_eq!(typed.data, Some(User { id: 5 }));
        assert_eq!(typed.status_code(), Some(200));
    }
}
