/// 后端错误归一化
///
/// 把后端的 HTTP 状态码 + `detail` 文本映射成可以直接展示给用户的 `ClientError`。
/// 这些标记只是后端约定俗成的文本，并没有正式的错误码。
use crate::error::{ClientError, ErrorKind, TERMS_URL};
use crate::infrastructure::HttpReply;

/// 模型条款未接受
pub const TERMS_REQUIRED_MARKER: &str = "model_terms_required";
/// CSV 不是 UTF-8 编码
pub const UTF8_DECODE_MARKER: &str = "'utf-8' codec can't decode";
/// 文件中有非法字节
pub const INVALID_START_BYTE_MARKER: &str = "invalid start byte";
/// 后端把 PDF 链接当成图片解析
pub const UNIDENTIFIED_IMAGE_MARKER: &str = "cannot identify image file";

/// 条款提示文本（包含链接）
pub fn terms_required_message() -> String {
    format!(
        "The AI model requires terms acceptance. Please contact the administrator to accept the terms at {}",
        TERMS_URL
    )
}

fn terms_required(status: u16) -> ClientError {
    ClientError::backend(ErrorKind::TermsRequired, Some(status), terms_required_message())
}

/// 上传接口的错误映射
pub fn upload_error(reply: &HttpReply) -> ClientError {
    let status = Some(reply.status);
    let detail = reply.detail().unwrap_or_default();

    if detail.contains(UTF8_DECODE_MARKER) {
        return ClientError::backend(
            ErrorKind::Encoding,
            status,
            "The CSV file contains characters that cannot be read. Please ensure the file is saved with UTF-8 encoding.",
        );
    }
    if detail.contains(INVALID_START_BYTE_MARKER) {
        return ClientError::backend(
            ErrorKind::Encoding,
            status,
            "The file contains invalid characters. Please check the file encoding and try again.",
        );
    }

    fallback(reply, "Failed to upload file")
}

/// 二维码接口的错误映射
pub fn qr_error(reply: &HttpReply) -> ClientError {
    let status = Some(reply.status);

    match reply.status {
        500 => {
            let detail = reply.detail().unwrap_or_default();
            if detail.contains(TERMS_REQUIRED_MARKER) {
                terms_required(reply.status)
            } else if detail.contains(UNIDENTIFIED_IMAGE_MARKER) {
                ClientError::backend(
                    ErrorKind::UnrecognizedImage,
                    status,
                    "The QR code contains a PDF URL. Please try uploading the PDF directly instead.",
                )
            } else if detail.is_empty() {
                ClientError::backend(
                    ErrorKind::Server,
                    status,
                    "Server error while processing QR code",
                )
            } else {
                ClientError::backend(
                    ErrorKind::Server,
                    status,
                    format!("Server error while processing QR code: {}", detail),
                )
            }
        }
        400 => ClientError::backend(
            ErrorKind::BadRequest,
            status,
            reply
                .detail()
                .unwrap_or_else(|| "Invalid QR code format".to_string()),
        ),
        _ => fallback(reply, "Failed to process QR code"),
    }
}

/// 查询接口的错误映射
pub fn query_error(reply: &HttpReply) -> ClientError {
    let status = Some(reply.status);

    match reply.status {
        500 => {
            let detail = reply.detail().unwrap_or_default();
            if detail.contains(TERMS_REQUIRED_MARKER) {
                terms_required(reply.status)
            } else if detail.is_empty() {
                ClientError::backend(
                    ErrorKind::Server,
                    status,
                    "Server error. Please try again later.",
                )
            } else {
                ClientError::backend(
                    ErrorKind::Server,
                    status,
                    format!("Server error: {}. Please try again later.", detail),
                )
            }
        }
        404 => ClientError::backend(
            ErrorKind::NoData,
            status,
            "No data available. Please upload a document first.",
        ),
        400 => ClientError::backend(
            ErrorKind::BadRequest,
            status,
            reply
                .detail()
                .unwrap_or_else(|| "Invalid query format".to_string()),
        ),
        _ => fallback(reply, "Failed to process query"),
    }
}

/// 未识别的错误：有 detail 就原样转发，否则使用通用文本
fn fallback(reply: &HttpReply, generic: &str) -> ClientError {
    ClientError::backend(
        ErrorKind::Other,
        Some(reply.status),
        reply.detail().unwrap_or_else(|| generic.to_string()),
    )
}
