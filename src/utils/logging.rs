/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use crate::models::{BackendStatus, DocumentStatus};
use tracing::{info, warn};

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 CartMapper 客户端启动");
    info!(
        "⏰ 启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 后端地址: {}", config.api_base_url);
    info!(
        "🗣️ 默认语言: {} | 输出方式: {} | 语音: {}",
        config.default_language,
        config.default_output_method,
        if config.voice_enabled { "开启" } else { "关闭" }
    );
    info!("{}", "=".repeat(60));
}

/// 记录后端健康状态
pub fn log_backend_status(status: &BackendStatus) {
    if status.is_healthy {
        info!("✓ 后端服务正常");
    } else {
        warn!(
            "⚠️ 后端服务不可用: {}",
            status.error.as_deref().unwrap_or("状态异常")
        );
    }
}

/// 记录文档可用状态
pub fn log_document_status(status: &DocumentStatus) {
    if status.available {
        info!("✓ 已有 {} 个可查询文档", status.documents.len());
    } else {
        warn!(
            "⚠️ 暂无可查询文档{}",
            status
                .note
                .as_deref()
                .map(|n| format!(" ({})", n))
                .unwrap_or_default()
        );
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("牛奶面包鸡蛋", 2), "牛奶...");
        assert_eq!(truncate_text("milk", 10), "milk");
    }
}
