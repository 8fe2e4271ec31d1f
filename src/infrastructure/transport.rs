//! HTTP 传输层 - 基础设施层
//!
//! 只负责"把请求发出去，把响应拿回来"。
//! 非 2xx 响应仍然是一个正常的 `HttpReply`，只有完全没有拿到响应时才返回 `TransportError`。

use crate::error::TransportError;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// 一次 HTTP 调用的结果
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Value,
}

impl HttpReply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 后端错误响应中的 `detail` 字段
    ///
    /// 非字符串的 detail（例如校验错误列表）会被序列化成 JSON 文本
    pub fn detail(&self) -> Option<String> {
        match self.body.get("detail") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// multipart 表单中的文件部分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFile {
    pub field: String,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// multipart 表单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartForm {
    pub file: MultipartFile,
    pub fields: Vec<(String, String)>,
}

/// HTTP 传输能力
///
/// 路径均相对于后端根地址，例如 `/health`
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get_json(&self, path: &str) -> Result<HttpReply, TransportError>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<HttpReply, TransportError>;

    async fn post_multipart(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<HttpReply, TransportError>;
}

/// 基于 reqwest 的传输实现
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// 读取响应体；非 JSON 的响应体按字符串保存
    async fn into_reply(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<HttpReply, TransportError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|source| TransportError::BodyReadFailed {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        debug!("{} -> {} {}", endpoint, status, body);

        Ok(HttpReply { status, body })
    }
}

impl Transport for ReqwestTransport {
    async fn get_json(&self, path: &str) -> Result<HttpReply, TransportError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| TransportError::RequestFailed {
                endpoint: path.to_string(),
                source,
            })?;

        Self::into_reply(path, response).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<HttpReply, TransportError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|source| TransportError::RequestFailed {
                endpoint: path.to_string(),
                source,
            })?;

        Self::into_reply(path, response).await
    }

    async fn post_multipart(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<HttpReply, TransportError> {
        let MultipartForm { file, fields } = form;

        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(mime) = file.mime_type {
            part = part
                .mime_str(&mime)
                .map_err(|e| TransportError::InvalidRequest {
                    endpoint: path.to_string(),
                    message: e.to_string(),
                })?;
        }

        let mut multipart = Form::new().part(file.field, part);
        for (name, value) in fields {
            multipart = multipart.text(name, value);
        }

        let response = self
            .client
            .post(self.url(path))
            .multipart(multipart)
            .send()
            .await
            .map_err(|source| TransportError::RequestFailed {
                endpoint: path.to_string(),
                source,
            })?;

        Self::into_reply(path, response).await
    }
}
