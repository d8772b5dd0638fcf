// src/clients/pending.rs
// 在途请求登记表：同一个 key (url + '&' + method) 同时只保留一个请求，
// 新请求进来时取消旧请求。

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use tracing::debug;

/// 被重复请求顶掉时的取消原因
pub const DUPLICATE_CANCEL_MESSAGE: &str = "已取消重复请求，请勿重复请求";

/// 生成登记表使用的 key
pub fn request_key(url: &str, method: &reqwest::Method) -> String {
    format!("{}&{}", url, method.as_str().to_ascii_lowercase())
}

/// 取消句柄，由登记表持有
#[derive(Debug)]
pub struct CancelHandle {
    sender: oneshot::Sender<String>,
}

impl CancelHandle {
    pub fn cancel(self, reason: &str) {
        // 请求已经结束时接收端不存在，忽略即可
        let _ = self.sender.send(reason.to_string());
    }
}

/// 取消信号，随请求一起等待
#[derive(Debug)]
pub struct CancelToken {
    receiver: oneshot::Receiver<String>,
}

impl CancelToken {
    /// 等待取消，返回取消原因。
    /// 句柄被直接丢弃 (而不是 cancel) 时永远不会完成。
    pub async fn cancelled(self) -> String {
        match self.receiver.await {
            Ok(reason) => reason,
            Err(_) => std::future::pending::<String>().await,
        }
    }
}

pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (sender, receiver) = oneshot::channel();
    (CancelHandle { sender }, CancelToken { receiver })
}

#[derive(Debug)]
struct PendingEntry {
    id: u64,
    handle: CancelHandle,
}

/// 在途请求登记表
#[derive(Debug, Default)]
pub struct PendingRequests {
    entries: HashMap<String, PendingEntry>,
    next_id: u64,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记新请求；同 key 的旧请求会被取消并移除。返回新登记项的 id
    pub fn register(&mut self, key: impl Into<String>, handle: CancelHandle) -> u64 {
        let key = key.into();
        if let Some(previous) = self.entries.remove(&key) {
            debug!("(Pending) 取消重复请求: {} (#{})", key, previous.id);
            previous.handle.cancel(DUPLICATE_CANCEL_MESSAGE);
        }

        self.next_id += 1;
        let id = self.next_id;
        self.entries.insert(key, PendingEntry { id, handle });
        id
    }

    /// 移除 key 对应的登记项 (如果存在)
    pub fn release(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// 只有登记项仍然属于 `id` 时才移除，已被新请求顶替的不动
    pub fn release_entry(&mut self, key: &str, id: u64) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.id == id => self.entries.remove(key).is_some(),
            _ => false,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

pub(crate) type SharedPending = Arc<Mutex<PendingRequests>>;

/// 锁不会跨 await 持有；即使某次持锁期间 panic，登记表本身仍然可用
pub(crate) fn lock(pending: &SharedPending) -> MutexGuard<'_, PendingRequests> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 请求结束 (包括调用方丢弃 Future) 时自动移除登记项
pub(crate) struct PendingGuard {
    pending: SharedPending,
    key: String,
    id: u64,
}

impl PendingGuard {
    pub(crate) fn register(pending: &SharedPending, key: String, handle: CancelHandle) -> Self {
        let id = lock(pending).register(key.clone(), handle);
        Self {
            pending: Arc::clone(pending),
            key,
            id,
        }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        lock(&self.pending).release_entry(&self.key, self.id);
    }
}
