// src/clients/mod.rs
// 请求客户端及其拦截逻辑

pub mod http_client;
pub mod interceptors;
pub mod pending;
pub mod query;
pub mod transport;

pub use http_client::{HttpClient, RequestOptions};
pub use pending::{PendingRequests, DUPLICATE_CANCEL_MESSAGE};
pub use transport::{PreparedRequest, RawResponse, ReqwestTransport, Transport};
