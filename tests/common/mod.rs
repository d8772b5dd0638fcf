// 集成测试共用的内存传输层和提示记录器
#![allow(dead_code)]

use async_trait::async_trait;
use request_wrapper::clients::{PreparedRequest, RawResponse, Transport};
use request_wrapper::{ClientConfig, HttpClient, Notice, Notifier, TransportError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const BASE_URL: &str = "http://localhost:3000";

/// 每次 send 按顺序取出一个步骤执行
pub enum Step {
    Respond(Value),
    RespondRaw(Vec<u8>),
    Fail(TransportError),
    // 一直不返回，模拟慢请求
    Hang,
    // 等到 Notify 被触发后再返回
    Gate(Arc<Notify>, Value),
}

#[derive(Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    seen: Mutex<Vec<PreparedRequest>>,
}

impl ScriptedTransport {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<PreparedRequest> {
        self.seen.lock().unwrap().clone()
    }
}

fn ok(body: &Value) -> Result<RawResponse, TransportError> {
    Ok(RawResponse {
        status: 200,
        body: serde_json::to_vec(body).unwrap(),
    })
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        self.seen.lock().unwrap().push(request);
        let step = self.steps.lock().unwrap().pop_front().unwrap_or(Step::Hang);
        match step {
            Step::Respond(body) => ok(&body),
            Step::RespondRaw(body) => Ok(RawResponse { status: 200, body }),
            Step::Fail(error) => Err(error),
            Step::Hang => std::future::pending().await,
            Step::Gate(gate, body) => {
                gate.notified().await;
                ok(&body)
            }
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub fn scripted_client(steps: Vec<Step>) -> (HttpClient, Arc<ScriptedTransport>, Arc<RecordingNotifier>) {
    let transport = ScriptedTransport::new(steps);
    let notifier = Arc::new(RecordingNotifier::default());
    let client = HttpClient::new(
        ClientConfig::new(BASE_URL),
        transport.clone(),
        notifier.clone(),
    );
    (client, transport, notifier)
}
