//! 错误类型
//!
//! `ClientError` 是唯一对外暴露的错误契约：它的 `Display` 文本可以直接展示给最终用户。
//! 传输层、配置层的错误各自独立，最终都会在边界处被归一化。

use thiserror::Error;

/// 模型条款未接受时引导用户前往的地址
pub const TERMS_URL: &str = "https://console.groq.com/playground?model=mistral-saba-24b";

/// 错误分类
///
/// 调用方可以直接按分类处理，而不必去匹配错误文本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 本地校验失败（未发起任何网络请求）
    Validation,
    /// 没有收到响应
    Network,
    /// 后端健康检查未通过
    BackendUnavailable,
    /// 模型需要接受使用条款
    TermsRequired,
    /// 后端尚无可查询的数据
    NoData,
    /// 文件编码无法被后端读取
    Encoding,
    /// 二维码内容被当作图片处理失败
    UnrecognizedImage,
    /// 后端给出警告而没有回答（例如查询翻译失败）
    Warning,
    /// 后端 500
    Server,
    /// 后端 400
    BadRequest,
    /// 其他后端错误
    Other,
}

/// 客户端错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// 本地校验错误
    #[error("{message}")]
    Validation { message: String },

    /// 传输错误（请求没有得到任何响应）
    #[error("{message}")]
    Network { message: String },

    /// 后端返回了错误，或后端不可用
    #[error("{message}")]
    Backend {
        kind: ErrorKind,
        status: Option<u16>,
        message: String,
    },
}

impl ClientError {
    /// 创建本地校验错误
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation {
            message: message.into(),
        }
    }

    /// 创建网络错误
    pub fn network(message: impl Into<String>) -> Self {
        ClientError::Network {
            message: message.into(),
        }
    }

    /// 创建后端错误
    pub fn backend(kind: ErrorKind, status: Option<u16>, message: impl Into<String>) -> Self {
        ClientError::Backend {
            kind,
            status,
            message: message.into(),
        }
    }

    /// 错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation { .. } => ErrorKind::Validation,
            ClientError::Network { .. } => ErrorKind::Network,
            ClientError::Backend { kind, .. } => *kind,
        }
    }

    /// 后端返回的 HTTP 状态码（如果有）
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Backend { status, .. } => *status,
            _ => None,
        }
    }

    /// 面向用户的错误文本
    pub fn message(&self) -> &str {
        match self {
            ClientError::Validation { message }
            | ClientError::Network { message }
            | ClientError::Backend { message, .. } => message,
        }
    }
}

/// 传输层错误：请求没有拿到任何 HTTP 响应
#[derive(Debug, Error)]
pub enum TransportError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 读取响应体失败
    #[error("读取响应失败 ({endpoint}): {source}")]
    BodyReadFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 请求构建失败（例如非法的 MIME 类型）
    #[error("请求构建失败 ({endpoint}): {message}")]
    InvalidRequest { endpoint: String, message: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 客户端结果类型
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_user_message() {
        let err = ClientError::backend(ErrorKind::NoData, Some(404), "No data available.");
        assert_eq!(err.to_string(), "No data available.");
        assert_eq!(err.message(), "No data available.");
        assert_eq!(err.kind(), ErrorKind::NoData);
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_local_errors_have_no_status() {
        assert_eq!(ClientError::validation("bad").status(), None);
        assert_eq!(ClientError::network("down").kind(), ErrorKind::Network);
    }
}
