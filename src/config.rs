use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// 默认配置文件名
pub const CONFIG_FILE_NAME: &str = "cartmapper.toml";

/// 1 MiB
pub const MIB: u64 = 1024 * 1024;

/// 程序配置
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端 API 根地址
    pub api_base_url: String,
    /// 上传文件大小上限（字节）
    pub max_upload_bytes: u64,
    /// 默认回答语言
    pub default_language: String,
    /// 默认输出方式
    pub default_output_method: String,
    /// 是否朗读回答
    pub voice_enabled: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            max_upload_bytes: 10 * MIB,
            default_language: "English".to_string(),
            default_output_method: "Text Only".to_string(),
            voice_enabled: true,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 只从环境变量读取，缺失项使用默认值
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 读取 `cartmapper.toml`（如果存在），再叠加环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let base = if Path::new(CONFIG_FILE_NAME).exists() {
            Self::from_toml_file(CONFIG_FILE_NAME)?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件加载配置
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 从 TOML 文本解析配置
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            api_base_url: std::env::var("CARTMAPPER_API_URL").unwrap_or(self.api_base_url),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_upload_bytes),
            default_language: std::env::var("DEFAULT_LANGUAGE").unwrap_or(self.default_language),
            default_output_method: std::env::var("DEFAULT_OUTPUT_METHOD").unwrap_or(self.default_output_method),
            voice_enabled: std::env::var("VOICE_ENABLED").ok().and_then(|v| v.parse().ok()).unwrap_or(self.voice_enabled),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.voice_enabled);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = Config::from_toml_str(
            r#"
            api_base_url = "http://receipts.local/api"
            voice_enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "http://receipts.local/api");
        assert!(!config.voice_enabled);
        assert_eq!(config.default_language, "English");
        assert_eq!(config.max_upload_bytes, 10 * MIB);
    }

    #[test]
    fn test_bad_toml_is_error() {
        assert!(Config::from_toml_str("max_upload_bytes = \"lots\"").is_err());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Config::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }
}
