// src/notify.rs
// 用户提示出口 (对应前端的 message / toast 组件)。
// 本 crate 不负责渲染，只把提示交给外部实现。

use std::time::Duration;
use tracing::error;

/// 传输层错误提示的停留时间
pub const TRANSPORT_NOTICE_DURATION: Duration = Duration::from_secs(5);

/// 一条错误提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    // None 表示使用提示组件自己的默认时长
    pub duration: Option<Duration>,
}

impl Notice {
    /// 普通提示 (只有文本)
    pub fn plain(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration: None,
        }
    }

    /// 定时自动关闭的提示
    pub fn timed(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            duration: Some(duration),
        }
    }
}

/// 提示出口
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// 默认实现：写到日志里
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.duration {
            Some(duration) => error!("(Notice) {} ({}ms)", notice.message, duration.as_millis()),
            None => error!("(Notice) {}", notice.message),
        }
    }
}
