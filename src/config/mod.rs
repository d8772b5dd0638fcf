// src/config/mod.rs
// 这是 config 模块的入口文件。
// 负责定义请求客户端的基础配置（来自环境变量）和声明子模块。

use std::env;
use std::time::Duration;
use thiserror::Error;

// --- 声明子模块 ---
pub mod theme;

/// 代理配置所在的环境变量
pub const PROXY_ENV_KEY: &str = "VITE_PROXY";

/// 默认请求超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1500);

/// 请求客户端的基础配置，构建后不再变化
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    // 每个请求都会附带的请求头，默认为空 (比如将来在这里放 Authorization)
    pub default_headers: Vec<(String, String)>,
}

/// 配置加载错误枚举
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Dotenv error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("缺少环境变量 {0}")]
    Missing(&'static str),
    #[error("VITE_PROXY 格式错误: {0}")]
    InvalidProxy(#[from] serde_json::Error),
    #[error("VITE_PROXY 中没有任何代理配置")]
    EmptyProxy,
    #[error("base URL 不合法 '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ClientConfig {
    /// 直接指定 base URL，其余使用默认值
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            default_headers: Vec::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// 从 .env 文件和环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        // 尝试加载 .env 文件，文件不存在时忽略
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 通过注入的查找函数加载配置，便于测试时不依赖进程环境
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(PROXY_ENV_KEY).ok_or(ConfigError::Missing(PROXY_ENV_KEY))?;
        let base_url = first_proxy_target(&raw)?;

        // 提前校验，避免到发请求时才发现地址写错
        url::Url::parse(&base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url.clone(),
            source,
        })?;

        Ok(Self::new(base_url))
    }
}

/// 解析形如 [["/api","http://localhost:3000"]] 的代理列表，返回第一个代理的目标地址
/// .env 里常写成单引号，这里统一替换为双引号再按 JSON 解析
fn first_proxy_target(raw: &str) -> Result<String, ConfigError> {
    let normalized = raw.replace('\'', "\"");
    let proxies: Vec<(String, String)> = serde_json::from_str(&normalized)?;
    proxies
        .into_iter()
        .next()
        .map(|(_prefix, target)| target)
        .ok_or(ConfigError::EmptyProxy)
}
