// src/clients/query.rs
// GET 请求参数映射：自己拼接查询字符串，支持一层嵌套对象 (a[x]=1)。

use serde_json::{Map, Value};

/// 展开后的一个查询参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPair {
    pub key: String,
    // 嵌套对象的子键
    pub sub_key: Option<String>,
    pub value: String,
}

impl QueryPair {
    /// 未编码的参数名，交给传输层自行编码时使用
    pub fn name(&self) -> String {
        match &self.sub_key {
            Some(sub) => format!("{}[{}]", self.key, sub),
            None => self.key.clone(),
        }
    }

    fn encode(&self) -> String {
        match &self.sub_key {
            Some(sub) => format!(
                "{}[{}]={}",
                encode_uri_component(&self.key),
                encode_uri_component(sub),
                encode_uri_component(&self.value)
            ),
            None => format!(
                "{}={}",
                encode_uri_component(&self.key),
                encode_uri_component(&self.value)
            ),
        }
    }
}

/// 按插入顺序展开参数；值为 null 的键直接跳过。
/// 只展开一层，更深的值按 JSON 文本输出。
pub fn flatten_params(params: &Map<String, Value>) -> Vec<QueryPair> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        match value {
            Value::Null => {}
            Value::Object(nested) => {
                for (sub_key, sub_value) in nested {
                    pairs.push(QueryPair {
                        key: key.clone(),
                        sub_key: Some(sub_key.clone()),
                        value: stringify(sub_value),
                    });
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    pairs.push(QueryPair {
                        key: key.clone(),
                        sub_key: Some(index.to_string()),
                        value: stringify(item),
                    });
                }
            }
            scalar => pairs.push(QueryPair {
                key: key.clone(),
                sub_key: None,
                value: stringify(scalar),
            }),
        }
    }
    pairs
}

/// 编码并用 & 连接，不带前导 ? 和末尾 &
pub fn encode_query(pairs: &[QueryPair]) -> String {
    pairs
        .iter()
        .map(QueryPair::encode)
        .collect::<Vec<_>>()
        .join("&")
}

/// 把参数拼到 url 后面；没有可输出的参数时原样返回
pub fn append_query(url: &str, params: &Map<String, Value>) -> String {
    let query = encode_query(&flatten_params(params));
    if query.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, query)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 与浏览器 encodeURIComponent 一致：除 `A-Za-z0-9-_.!~*'()` 外全部百分号编码。
/// urlencoding 额外编码了 `!*'()`，这里再还原回来。
pub fn encode_uri_component(input: &str) -> String {
    let encoded = urlencoding::encode(input);
    if !encoded.contains('%') {
        return encoded.into_owned();
    }
    encoded
        .replace("%21", "!")
        .replace("%2A", "*")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
}
