// src/main.rs
// 命令行探针：按环境变量组装 HttpClient，对给定路径发一次 GET，打印响应体。
// 用法: request-probe [path] [key=value ...]

use request_wrapper::{setup, sys_theme, ClientConfig, HttpClient, RequestOptions};
use serde_json::{Map, Value};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 初始化日志
    setup::init_tracing();

    // 2. 加载基础配置
    let config = ClientConfig::from_env()?;
    info!("主题配置: {}", serde_json::to_string(sys_theme())?);

    // 3. 组装客户端
    let client = HttpClient::from_config(config)?;

    // 4. 解析命令行参数
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "/".to_string());
    let params: Map<String, Value> = args
        .filter_map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        })
        .collect();

    let mut options = RequestOptions::get(path);
    if !params.is_empty() {
        options = options.params(Value::Object(params));
    }

    // 5. 发请求
    match client.request::<Value>(options).await {
        Ok(envelope) => {
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(())
        }
        Err(e) => {
            error!("请求失败: {}", e);
            Err(e.into())
        }
    }
}
