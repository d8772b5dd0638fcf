// src/lib.rs
// 请求封装：统一 base URL / 超时，取消重复请求，GET 参数映射，
// 业务响应体 {code, data, msg} 解析与错误提示；另附系统主题配置。

pub mod clients;
pub mod config;
pub mod errors;
pub mod notify;
pub mod response;
pub mod setup;

pub use clients::{HttpClient, RequestOptions};
pub use config::theme::{sys_theme, Layout, ThemeConfig};
pub use config::{ClientConfig, ConfigError};
pub use errors::{RequestError, TransportError};
pub use notify::{LogNotifier, Notice, Notifier};
pub use response::{ApiResponse, ResponseCode};
