//! 上传流程 - 流程层
//!
//! 文件上传与二维码提交，结果统一转换为页面上的状态提示

use tracing::{info, warn};

use crate::clients::ApiClient;
use crate::config::MIB;
use crate::error::{ClientError, ClientResult};
use crate::infrastructure::Transport;
use crate::models::{FileType, MessageResponse, UploadFile};
use reqwest::Url;

/// 选择文件时允许的 MIME 类型
pub const ACCEPTED_MIME_TYPES: [&str; 2] = ["application/pdf", "text/csv"];

/// 提示级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

/// 上传结果提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadStatus {
    pub message: String,
    pub severity: Severity,
}

impl UploadStatus {
    fn from_result(result: ClientResult<MessageResponse>, success_default: &str) -> Self {
        match result {
            Ok(resp) => Self {
                message: resp
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| success_default.to_string()),
                severity: Severity::Success,
            },
            Err(err) => Self {
                message: err.to_string(),
                severity: Severity::Error,
            },
        }
    }
}

/// 批量上传结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// 成功上传的文件数
    pub uploaded: usize,
    pub status: UploadStatus,
}

/// 选择文件时的本地校验
pub fn validate_selected_file(file: &UploadFile, max_bytes: u64) -> ClientResult<()> {
    let mime_ok = file
        .mime_type
        .as_deref()
        .map_or(false, |m| ACCEPTED_MIME_TYPES.contains(&m));
    if !mime_ok {
        return Err(ClientError::validation(
            "Invalid file type. Only PDF and CSV files are allowed.",
        ));
    }
    if file.size() > max_bytes {
        return Err(ClientError::validation(format!(
            "File size too large. Maximum size is {}MB.",
            max_bytes / MIB
        )));
    }
    Ok(())
}

/// 手动输入的链接校验，返回规范化后的链接
pub fn validate_manual_url(input: &str) -> ClientResult<String> {
    Url::parse(input.trim())
        .map(|url| url.to_string())
        .map_err(|_| ClientError::validation("Please enter a valid URL"))
}

/// 上传流程
pub struct UploadFlow<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> UploadFlow<'a, T> {
    pub fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// 上传单个文件
    pub async fn upload_file(&self, file_type: &str, file: &UploadFile) -> UploadStatus {
        let result = self.client.upload_file(file_type, file).await;
        UploadStatus::from_result(result, "File processed successfully!")
    }

    /// 提交二维码内容
    pub async fn upload_qr(&self, data: &str, is_url: bool) -> UploadStatus {
        let result = self.client.process_qr(data, is_url).await;
        UploadStatus::from_result(result, "QR processed successfully!")
    }

    /// 按顺序上传多个文件，遇到第一个失败即停止
    ///
    /// 文件类型由 MIME 类型决定
    pub async fn upload_all(&self, files: &[UploadFile]) -> BatchOutcome {
        let max_bytes = self.client.max_upload_bytes();
        if let Some(err) = files
            .iter()
            .find_map(|f| validate_selected_file(f, max_bytes).err())
        {
            return BatchOutcome {
                uploaded: 0,
                status: UploadStatus {
                    message: err.to_string(),
                    severity: Severity::Error,
                },
            };
        }

        let mut uploaded = 0;
        let mut last = UploadStatus {
            message: "No files selected".to_string(),
            severity: Severity::Info,
        };

        for file in files {
            let file_type = FileType::infer_from_mime(file.mime_type.as_deref());
            let status = self.upload_file(file_type.as_str(), file).await;
            if status.severity == Severity::Error {
                warn!("⚠️ {} 上传失败，停止剩余文件: {}", file.file_name, status.message);
                return BatchOutcome {
                    uploaded,
                    status,
                };
            }
            uploaded += 1;
            last = status;
        }

        info!("✓ 已上传 {}/{} 个文件", uploaded, files.len());
        BatchOutcome {
            uploaded,
            status: last,
        }
    }
}
