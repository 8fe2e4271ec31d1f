//! 发往后端的请求类型
//!
//! 所有构造函数都会先做本地校验，校验失败时不会产生任何网络请求。

use crate::error::{ClientError, ClientResult};
use reqwest::Url;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

/// 支持上传的文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Csv,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Csv => "csv",
        }
    }

    /// 根据文件名推断类型：`.pdf` 结尾为 PDF，其余一律视为 CSV
    pub fn infer_from_name(file_name: &str) -> Self {
        if file_name.to_lowercase().ends_with(".pdf") {
            FileType::Pdf
        } else {
            FileType::Csv
        }
    }

    /// 根据 MIME 类型推断：`application/pdf` 为 PDF，其余视为 CSV
    pub fn infer_from_mime(mime_type: Option<&str>) -> Self {
        match mime_type {
            Some("application/pdf") => FileType::Pdf,
            _ => FileType::Csv,
        }
    }
}

impl FromStr for FileType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(FileType::Pdf),
            "csv" => Ok(FileType::Csv),
            _ => Err(ClientError::validation(
                "Invalid file type. Only PDF and CSV files are supported.",
            )),
        }
    }
}

/// 待上传的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, mime_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.map(str::to_string),
            bytes,
        }
    }

    /// 从磁盘读取文件，MIME 类型按扩展名猜测
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = guess_mime(&file_name);
        Ok(Self::new(file_name, mime_type, bytes))
    }

    /// 文件大小（字节）
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn guess_mime(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".pdf") {
        Some("application/pdf")
    } else if lower.ends_with(".csv") {
        Some("text/csv")
    } else {
        None
    }
}

/// 扫描或手动输入得到的二维码内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    data: String,
    is_url: bool,
}

impl QrPayload {
    /// 校验并清理二维码内容
    pub fn new(data: &str, is_url: bool) -> ClientResult<Self> {
        let cleaned = data.trim();
        if cleaned.is_empty() {
            return Err(ClientError::validation("Invalid QR code data"));
        }
        if is_url && Url::parse(cleaned).is_err() {
            return Err(ClientError::validation("Invalid URL format in QR code"));
        }
        Ok(Self {
            data: cleaned.to_string(),
            is_url,
        })
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn is_url(&self) -> bool {
        self.is_url
    }

    /// 是否为直接指向 PDF 的链接
    pub fn is_pdf_url(&self) -> bool {
        self.is_url && self.data.ends_with(".pdf")
    }

    pub fn data_type(&self) -> &'static str {
        if self.is_url {
            "url"
        } else {
            "text"
        }
    }

    pub fn url_type(&self) -> Option<&'static str> {
        match (self.is_url, self.is_pdf_url()) {
            (false, _) => None,
            (true, true) => Some("pdf"),
            (true, false) => Some("other"),
        }
    }

    /// `/process-qr` 请求体
    pub fn to_process_request(&self) -> QrProcessRequest {
        QrProcessRequest {
            qr_data: self.data.clone(),
            is_url: self.is_url,
            data_type: self.data_type().to_string(),
            url_type: self.url_type().map(str::to_string),
        }
    }

    /// `/process-pdf-url` 请求体
    pub fn to_pdf_url_request(&self) -> PdfUrlRequest {
        PdfUrlRequest {
            pdf_url: self.data.clone(),
        }
    }
}

/// `/process-qr` 请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrProcessRequest {
    pub qr_data: String,
    pub is_url: bool,
    pub data_type: String,
    pub url_type: Option<String>,
}

/// `/process-pdf-url` 请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfUrlRequest {
    pub pdf_url: String,
}

/// `/query` 请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub language: String,
    pub output_method: String,
}

impl QueryRequest {
    /// 按顺序校验查询、语言、输出方式，查询文本会被 trim
    pub fn new(query: &str, language: &str, output_method: &str) -> ClientResult<Self> {
        if query.trim().is_empty() {
            return Err(ClientError::validation("Query cannot be empty"));
        }
        if language.is_empty() {
            return Err(ClientError::validation("Language must be specified"));
        }
        if output_method.is_empty() {
            return Err(ClientError::validation("Output method must be specified"));
        }
        Ok(Self {
            query: query.trim().to_string(),
            language: language.to_string(),
            output_method: output_method.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_type_parse() {
        assert_eq!("PDF".parse::<FileType>().unwrap(), FileType::Pdf);
        assert_eq!("Csv".parse::<FileType>().unwrap(), FileType::Csv);
        let err = "xlsx".parse::<FileType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid file type. Only PDF and CSV files are supported."
        );
    }

    #[test]
    fn test_file_type_inference() {
        assert_eq!(FileType::infer_from_name("Receipt.PDF"), FileType::Pdf);
        assert_eq!(FileType::infer_from_name("receipt.csv"), FileType::Csv);
        assert_eq!(FileType::infer_from_name("notes.txt"), FileType::Csv);
        assert_eq!(
            FileType::infer_from_mime(Some("application/pdf")),
            FileType::Pdf
        );
        assert_eq!(FileType::infer_from_mime(None), FileType::Csv);
    }

    #[test]
    fn test_upload_file_from_path() {
        let path = std::env::temp_dir().join("cartmapper_from_path_test.csv");
        std::fs::write(&path, "item,price\nmilk,2\n").unwrap();

        let file = tokio_test::block_on(UploadFile::from_path(&path)).unwrap();
        assert_eq!(file.file_name, "cartmapper_from_path_test.csv");
        assert_eq!(file.mime_type.as_deref(), Some("text/csv"));
        assert_eq!(file.size(), 18);

        std::fs::remove_file(&path).ok();
        assert!(tokio_test::block_on(UploadFile::from_path(&path)).is_err());
    }

    #[test]
    fn test_qr_payload_trims_and_rejects_empty() {
        assert_eq!(
            QrPayload::new("", false).unwrap_err().to_string(),
            "Invalid QR code data"
        );
        assert_eq!(
            QrPayload::new("   ", true).unwrap_err().to_string(),
            "Invalid QR code data"
        );
        assert_eq!(QrPayload::new("  abc  ", false).unwrap().data(), "abc");
    }

    #[test]
    fn test_qr_payload_url_validation() {
        assert_eq!(
            QrPayload::new("not a url", true).unwrap_err().to_string(),
            "Invalid URL format in QR code"
        );
        let payload = QrPayload::new(" https://example.com/receipt.pdf ", true).unwrap();
        assert!(payload.is_pdf_url());
        assert_eq!(payload.url_type(), Some("pdf"));
    }

    #[test]
    fn test_qr_process_request_shape() {
        let url = QrPayload::new("https://shop.example/r/42", true).unwrap();
        assert_eq!(
            serde_json::to_value(url.to_process_request()).unwrap(),
            json!({
                "qr_data": "https://shop.example/r/42",
                "is_url": true,
                "data_type": "url",
                "url_type": "other"
            })
        );

        let text = QrPayload::new("SGVsbG8=", false).unwrap();
        assert_eq!(
            serde_json::to_value(text.to_process_request()).unwrap(),
            json!({
                "qr_data": "SGVsbG8=",
                "is_url": false,
                "data_type": "text",
                "url_type": null
            })
        );
    }

    #[test]
    fn test_query_request_validation_order() {
        assert_eq!(
            QueryRequest::new("  ", "", "").unwrap_err().to_string(),
            "Query cannot be empty"
        );
        assert_eq!(
            QueryRequest::new("milk?", "", "").unwrap_err().to_string(),
            "Language must be specified"
        );
        assert_eq!(
            QueryRequest::new("milk?", "English", "")
                .unwrap_err()
                .to_string(),
            "Output method must be specified"
        );

        let req = QueryRequest::new("  how much milk?  ", "English", "Summary").unwrap();
        assert_eq!(req.query, "how much milk?");
    }
}
