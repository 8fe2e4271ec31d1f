#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use cartmapper_client::error::TransportError;
use cartmapper_client::infrastructure::{MultipartForm, SpeechEngine, Transport, Utterance};
use cartmapper_client::services::Voice;
use cartmapper_client::{ApiClient, HttpReply};
use serde_json::{json, Value};

/// 一次被记录下来的请求
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
    pub form: Option<MultipartForm>,
}

/// 预先设定好响应的传输层，未设定的路由视为连接失败
#[derive(Default)]
pub struct ScriptedTransport {
    routes: HashMap<String, HttpReply>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, method: &str, path: &str, status: u16, body: Value) -> Self {
        self.routes
            .insert(format!("{} {}", method, path), HttpReply::new(status, body));
        self
    }

    pub fn healthy(self) -> Self {
        self.route("GET", "/health", 200, json!({"status": "healthy"}))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| format!("{} {}", c.method, c.path))
            .collect()
    }

    fn reply(&self, call: RecordedCall) -> Result<HttpReply, TransportError> {
        let key = format!("{} {}", call.method, call.path);
        self.calls.lock().unwrap().push(call);
        self.routes
            .get(&key)
            .cloned()
            .ok_or_else(|| TransportError::InvalidRequest {
                endpoint: key,
                message: "connection refused".to_string(),
            })
    }
}

impl Transport for ScriptedTransport {
    async fn get_json(&self, path: &str) -> Result<HttpReply, TransportError> {
        self.reply(RecordedCall {
            method: "GET",
            path: path.to_string(),
            body: None,
            form: None,
        })
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<HttpReply, TransportError> {
        self.reply(RecordedCall {
            method: "POST",
            path: path.to_string(),
            body: Some(body.clone()),
            form: None,
        })
    }

    async fn post_multipart(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<HttpReply, TransportError> {
        self.reply(RecordedCall {
            method: "POST",
            path: path.to_string(),
            body: None,
            form: Some(form),
        })
    }
}

pub const TEN_MB: u64 = 10 * 1024 * 1024;

pub fn client(transport: ScriptedTransport) -> ApiClient<ScriptedTransport> {
    ApiClient::with_transport(transport, TEN_MB)
}

/// 记录所有调用的语音引擎
#[derive(Default)]
pub struct RecordingSpeech {
    pub events: Vec<String>,
}

impl SpeechEngine for RecordingSpeech {
    fn voices(&self) -> Vec<Voice> {
        vec![Voice::new("Samantha", "en-US")]
    }

    fn speak(&mut self, utterance: Utterance) {
        self.events.push(format!("speak:{}", utterance.text));
    }

    fn cancel(&mut self) {
        self.events.push("cancel".to_string());
    }
}
