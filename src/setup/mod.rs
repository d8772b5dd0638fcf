// src/setup/mod.rs
// 启动相关的组装逻辑：日志初始化、共享 reqwest::Client 构建

use crate::config::ClientConfig;
use reqwest::Client;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化日志，优先使用 RUST_LOG
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,request_wrapper=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// 构建一个共享的 reqwest::Client 实例
///
/// `reqwest::Client` 内部管理着连接池，整个 HttpClient 只创建一次。
/// 超时使用配置中的值，单个请求还会再设置一次。
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    info!(
        "正在创建共享 HTTP 客户端 (base_url: {}, timeout: {:?})...",
        config.base_url, config.timeout
    );

    Client::builder()
        .timeout(config.timeout)
        .user_agent(format!("request-wrapper/{}", env!("CARGO_PKG_VERSION")))
        .build()
}
