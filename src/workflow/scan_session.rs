//! 扫码会话 - 流程层
//!
//! 持有摄像头，处理解码结果：解码成功后先释放摄像头，再把内容交给后端。
//! 会话销毁时摄像头一定会被释放。

use tracing::{info, warn};

use crate::clients::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::infrastructure::{Camera, CameraError, CameraGuard, Transport};
use crate::models::MessageResponse;

pub const CAMERA_ACCESS_MESSAGE: &str =
    "Failed to access camera. Please make sure you have given camera permissions.";

/// 二维码内容分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedContent {
    pub data: String,
    pub is_url: bool,
}

/// 判断解码内容是链接还是编码数据
///
/// 以 http:// 或 https:// 开头视为链接；否则必须是 base64 字符集
pub fn classify_scan(decoded: &str) -> ClientResult<ScannedContent> {
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        return Err(ClientError::validation("Invalid QR code content"));
    }

    let is_url = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let is_base64 = trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='));

    if !is_url && !is_base64 {
        return Err(ClientError::validation(
            "Invalid QR code format. Please scan a valid QR code containing a URL or encoded data.",
        ));
    }

    Ok(ScannedContent {
        data: trimmed.to_string(),
        is_url,
    })
}

/// 扫码会话
pub struct ScanSession<'a, T: Transport, C: Camera> {
    client: &'a ApiClient<T>,
    camera: CameraGuard<C>,
    error: Option<String>,
}

impl<'a, T: Transport, C: Camera> ScanSession<'a, T, C> {
    pub fn new(client: &'a ApiClient<T>, camera: C) -> Self {
        Self {
            client,
            camera: CameraGuard::new(camera),
            error: None,
        }
    }

    /// 开始扫码
    pub fn start(&mut self) -> ClientResult<()> {
        self.error = None;
        self.camera.acquire().map_err(|e| {
            warn!("⚠️ 摄像头开启失败: {}", e);
            self.error = Some(CAMERA_ACCESS_MESSAGE.to_string());
            ClientError::validation(CAMERA_ACCESS_MESSAGE)
        })
    }

    pub fn is_scanning(&self) -> bool {
        self.camera.is_acquired()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn camera(&self) -> &C {
        self.camera.camera()
    }

    /// 收到解码结果
    ///
    /// 无论内容是否合法、后端是否成功，摄像头都会先被释放
    pub async fn on_decoded(&mut self, decoded: &str) -> ClientResult<MessageResponse> {
        self.camera.release();

        let result = match classify_scan(decoded) {
            Ok(content) => {
                info!("📷 扫描到二维码: {}", content.data);
                self.client.process_qr(&content.data, content.is_url).await
            }
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            self.error = Some(err.to_string());
        }
        result
    }

    /// 扫码过程中的错误；没有找到二维码属于正常情况，不提示
    pub fn on_scan_error(&mut self, err: CameraError) {
        if err == CameraError::NotFound {
            return;
        }
        warn!("⚠️ 扫码出错: {}", err);
        self.camera.release();
        self.error = Some(CAMERA_ACCESS_MESSAGE.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_scan() {
        assert_eq!(
            classify_scan("  https://shop.example/r.pdf ").unwrap(),
            ScannedContent {
                data: "https://shop.example/r.pdf".to_string(),
                is_url: true,
            }
        );
        assert!(!classify_scan("SGVsbG8gd29ybGQ=").unwrap().is_url);
        assert_eq!(
            classify_scan("   ").unwrap_err().to_string(),
            "Invalid QR code content"
        );
        assert!(classify_scan("hello world!")
            .unwrap_err()
            .to_string()
            .starts_with("Invalid QR code format"));
    }
}
