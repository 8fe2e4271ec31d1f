/// CartMapper 后端 API 客户端
///
/// 封装所有与后端的交互：上传、二维码、查询、健康检查。
/// 所有失败都会被归一化为 `ClientError`，其文本可以直接展示给用户。
use crate::clients::error_mapping::{qr_error, query_error, upload_error};
use crate::config::{Config, MIB};
use crate::error::{ClientError, ClientResult, ErrorKind};
use crate::infrastructure::{HttpReply, MultipartFile, MultipartForm, ReqwestTransport, Transport};
use crate::models::{
    BackendStatus, DocumentList, DocumentStatus, FileType, HealthResponse, MessageResponse,
    QrPayload, QueryRequest, QueryResponse, UploadFile,
};
use crate::utils::truncate_text;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

pub const UPLOAD_PATH: &str = "/upload";
pub const PROCESS_QR_PATH: &str = "/process-qr";
pub const PROCESS_PDF_URL_PATH: &str = "/process-pdf-url";
pub const DOCUMENT_LIST_PATH: &str = "/upload/list";
pub const HEALTH_PATH: &str = "/health";
pub const QUERY_PATH: &str = "/query";

/// 后端 API 客户端
pub struct ApiClient<T: Transport = ReqwestTransport> {
    transport: T,
    max_upload_bytes: u64,
}

impl ApiClient<ReqwestTransport> {
    /// 按配置创建基于 reqwest 的客户端
    pub fn new(config: &Config) -> Self {
        Self::with_transport(
            ReqwestTransport::new(config.api_base_url.clone()),
            config.max_upload_bytes,
        )
    }
}

impl<T: Transport> ApiClient<T> {
    /// 使用自定义传输层创建客户端
    pub fn with_transport(transport: T, max_upload_bytes: u64) -> Self {
        Self {
            transport,
            max_upload_bytes,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// 上传 PDF / CSV 文件
    ///
    /// # 参数
    /// - `file_type`: 声明的文件类型（pdf / csv，不区分大小写）
    /// - `file`: 文件内容
    ///
    /// # 返回
    /// 返回后端的处理结果
    pub async fn upload_file(
        &self,
        file_type: &str,
        file: &UploadFile,
    ) -> ClientResult<MessageResponse> {
        let file_type: FileType = file_type.parse()?;

        if file.size() > self.max_upload_bytes {
            return Err(ClientError::validation(format!(
                "File size exceeds {}MB limit",
                self.max_upload_bytes / MIB
            )));
        }

        info!(
            "📤 正在上传文件: {} (类型: {}, 大小: {} 字节, MIME: {})",
            file.file_name,
            file_type.as_str(),
            file.size(),
            file.mime_type.as_deref().unwrap_or("未知")
        );

        let form = MultipartForm {
            file: MultipartFile {
                field: "file".to_string(),
                file_name: file.file_name.clone(),
                mime_type: file.mime_type.clone(),
                bytes: file.bytes.clone(),
            },
            fields: vec![("file_type".to_string(), file_type.as_str().to_string())],
        };

        let reply = match self.transport.post_multipart(UPLOAD_PATH, form).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("❌ 上传文件失败: {}", e);
                return Err(ClientError::network("Network error while uploading file"));
            }
        };

        if !reply.is_success() {
            let err = upload_error(&reply);
            warn!("⚠️ 上传被后端拒绝 ({}): {}", reply.status, err);
            return Err(err);
        }

        debug!("上传响应: {}", reply.body);
        Ok(decode_message(reply))
    }

    /// 处理二维码内容
    ///
    /// 指向 PDF 的链接走 `/process-pdf-url`，其余走 `/process-qr`
    pub async fn process_qr(&self, data: &str, is_url: bool) -> ClientResult<MessageResponse> {
        let payload = QrPayload::new(data, is_url)?;

        info!(
            "🔍 发送二维码内容: 长度 {}, 类型 {}, 链接类型 {}",
            payload.data().chars().count(),
            payload.data_type(),
            payload.url_type().unwrap_or("N/A")
        );

        let result = if payload.is_pdf_url() {
            let body = to_json(&payload.to_pdf_url_request());
            self.transport.post_json(PROCESS_PDF_URL_PATH, &body).await
        } else {
            let body = to_json(&payload.to_process_request());
            self.transport.post_json(PROCESS_QR_PATH, &body).await
        };

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                error!("❌ 二维码处理请求失败: {}", e);
                return Err(ClientError::network(
                    "Network error while processing QR code",
                ));
            }
        };

        if !reply.is_success() {
            let err = qr_error(&reply);
            warn!("⚠️ 二维码处理失败 ({}): {:?}", reply.status, reply.body);
            return Err(err);
        }

        debug!("二维码处理响应: {}", reply.body);
        Ok(decode_message(reply))
    }

    /// 检查是否已有可查询的文档
    ///
    /// 文档列表接口不可用时退回到健康检查：后端健康即视为有文档（无法直接确认）
    pub async fn check_documents(&self) -> DocumentStatus {
        match self.fetch_documents().await {
            Ok(list) => DocumentStatus {
                available: !list.documents.is_empty(),
                documents: list.documents,
                note: None,
            },
            Err(reason) => {
                warn!("⚠️ 获取文档列表失败: {}，改用健康检查", reason);
                match self.fetch_health().await {
                    Ok(health) => DocumentStatus {
                        available: health.is_healthy(),
                        documents: Vec::new(),
                        note: Some("Could not verify documents".to_string()),
                    },
                    Err(_) => DocumentStatus {
                        available: false,
                        documents: Vec::new(),
                        note: Some("Failed to connect to backend".to_string()),
                    },
                }
            }
        }
    }

    /// 检查后端健康状态，只有 `status == "healthy"` 才算健康
    pub async fn check_backend_status(&self) -> BackendStatus {
        match self.fetch_health().await {
            Ok(health) => BackendStatus::from_health(health),
            Err(reason) => {
                warn!("⚠️ 后端健康检查失败: {}", reason);
                BackendStatus::unreachable()
            }
        }
    }

    /// 提交自然语言查询
    ///
    /// 先做本地校验和健康检查，后端不健康时不会调用 `/query`
    pub async fn submit_query(
        &self,
        query: &str,
        language: &str,
        output_method: &str,
    ) -> ClientResult<QueryResponse> {
        let request = QueryRequest::new(query, language, output_method)?;

        let status = self.check_backend_status().await;
        if !status.is_healthy {
            return Err(ClientError::backend(
                ErrorKind::BackendUnavailable,
                None,
                "Backend service is not available. Please try again later.",
            ));
        }

        info!(
            "💬 提交查询: \"{}\" (语言: {}, 输出: {}, 时间: {})",
            truncate_text(&request.query, 80),
            request.language,
            request.output_method,
            chrono::Utc::now().to_rfc3339()
        );

        let reply = match self.transport.post_json(QUERY_PATH, &to_json(&request)).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("❌ 查询请求失败: {}", e);
                return Err(ClientError::network("Network error while processing query"));
            }
        };

        if !reply.is_success() {
            let err = query_error(&reply);
            warn!("⚠️ 查询失败 ({}): {:?}", reply.status, reply.body);
            return Err(err);
        }

        debug!("查询响应: {}", reply.body);
        let status = reply.status;
        let response: QueryResponse = decode(reply, "Failed to process query")?;

        match response.warning {
            Some(warning) if response.answer.trim().is_empty() => {
                warn!("⚠️ 后端返回警告: {}", warning);
                Err(ClientError::backend(ErrorKind::Warning, Some(status), warning))
            }
            _ => Ok(response),
        }
    }

    /// 原始健康探测，失败时返回合成的不健康状态而不是错误
    pub async fn check_health(&self) -> HealthResponse {
        self.fetch_health().await.unwrap_or_else(|reason| {
            warn!("⚠️ 健康检查失败: {}", reason);
            HealthResponse::unreachable()
        })
    }

    async fn fetch_health(&self) -> Result<HealthResponse, String> {
        let reply = self.get_ok(HEALTH_PATH).await?;
        serde_json::from_value(reply.body).map_err(|e| e.to_string())
    }

    /// 只有传输失败或非 2xx 才算失败；响应体无法解析时按空列表处理
    async fn fetch_documents(&self) -> Result<DocumentList, String> {
        let reply = self.get_ok(DOCUMENT_LIST_PATH).await?;
        Ok(serde_json::from_value(reply.body).unwrap_or_else(|e| {
            warn!("⚠️ 文档列表格式异常: {}，按空列表处理", e);
            DocumentList::default()
        }))
    }

    /// GET 请求，非 2xx 也视为失败
    async fn get_ok(&self, path: &str) -> Result<HttpReply, String> {
        let reply = self
            .transport
            .get_json(path)
            .await
            .map_err(|e| e.to_string())?;
        if reply.is_success() {
            Ok(reply)
        } else {
            Err(format!("{} 返回 {}", path, reply.status))
        }
    }
}

fn to_json<S: serde::Serialize>(value: &S) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// 解析成功响应，响应体不符合预期时给出通用错误
fn decode<R: DeserializeOwned>(reply: HttpReply, generic: &str) -> ClientResult<R> {
    let status = reply.status;
    serde_json::from_value(reply.body).map_err(|e| {
        warn!("⚠️ 响应解析失败: {}", e);
        ClientError::backend(ErrorKind::Other, Some(status), generic)
    })
}

/// 任何 2xx 都是成功
///
/// 响应体不是对象时原样放进 `extra["body"]`，空响应体视为没有消息
fn decode_message(reply: HttpReply) -> MessageResponse {
    match reply.body {
        Value::Null => MessageResponse::default(),
        body @ Value::Object(_) => serde_json::from_value(body.clone()).unwrap_or_else(|e| {
            debug!("响应对象字段不符合预期: {}", e);
            raw_message(body)
        }),
        other => raw_message(other),
    }
}

fn raw_message(body: Value) -> MessageResponse {
    let mut response = MessageResponse::default();
    response.extra.insert("body".to_string(), body);
    response
}
