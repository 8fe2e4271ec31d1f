//! 回答语言与输出方式

use std::fmt::Display;
use std::str::FromStr;

/// 回答语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Hindi,
    Odia,
    Bengali,
    Tamil,
}

impl Language {
    /// 页面可选的全部语言（按展示顺序）
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Hindi,
        Language::Odia,
        Language::Bengali,
        Language::Tamil,
    ];

    /// 后端接收的语言名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Odia => "Odia",
            Language::Bengali => "Bengali",
            Language::Tamil => "Tamil",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("不支持的语言: {}", s))
    }
}

/// 输出方式（回答的详细程度）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputMethod {
    TextOnly,
    Summary,
    Detailed,
}

impl OutputMethod {
    pub const ALL: [OutputMethod; 3] = [
        OutputMethod::TextOnly,
        OutputMethod::Summary,
        OutputMethod::Detailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMethod::TextOnly => "Text Only",
            OutputMethod::Summary => "Summary",
            OutputMethod::Detailed => "Detailed",
        }
    }
}

impl Default for OutputMethod {
    fn default() -> Self {
        OutputMethod::TextOnly
    }
}

impl Display for OutputMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputMethod::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("不支持的输出方式: {}", s))
    }
}
