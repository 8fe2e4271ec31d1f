//! 朗读语音选择 - 业务能力层
//!
//! 根据回答语言决定优先使用的语音以及语速

use crate::models::Language;

/// 可用的系统语音
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 语言标签，例如 `hi-IN`
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

/// 某种语言的朗读参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceProfile {
    /// 按优先级排列的语言标签前缀
    pub preferred_langs: &'static [&'static str],
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl VoiceProfile {
    /// 没有匹配语音时使用的引擎默认参数
    pub fn neutral() -> Self {
        Self {
            preferred_langs: &[],
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// 获取语言对应的朗读参数
///
/// 奥里亚语、孟加拉语、泰米尔语的系统语音经常缺失，回退到印度英语
pub fn voice_profile(language: Language) -> VoiceProfile {
    let (preferred_langs, rate): (&'static [&'static str], f32) = match language {
        Language::English => (&["en-US", "en-GB", "en"], 1.0),
        Language::Hindi => (&["hi-IN", "hi"], 0.9),
        Language::Odia => (&["or-IN", "en-IN"], 0.8),
        Language::Bengali => (&["bn-IN", "en-IN"], 0.8),
        Language::Tamil => (&["ta-IN", "en-IN"], 0.8),
    };

    VoiceProfile {
        preferred_langs,
        rate,
        pitch: 1.0,
        volume: 1.0,
    }
}

/// 从可用语音中挑选最合适的一个
///
/// 顺序：语言偏好列表 → 任意印度英语语音 → 第一个可用语音
pub fn pick_voice(voices: &[Voice], language: Language) -> Option<&Voice> {
    let profile = voice_profile(language);

    profile
        .preferred_langs
        .iter()
        .find_map(|prefix| voices.iter().find(|v| v.lang.starts_with(prefix)))
        .or_else(|| voices.iter().find(|v| v.lang.starts_with("en-IN")))
        .or_else(|| voices.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voices() -> Vec<Voice> {
        vec![
            Voice::new("Samantha", "en-US"),
            Voice::new("Lekha", "hi-IN"),
            Voice::new("Veena", "en-IN"),
        ]
    }

    #[test]
    fn test_pick_voice_follows_preferences() {
        let voices = voices();
        assert_eq!(pick_voice(&voices, Language::Hindi).unwrap().name, "Lekha");
        assert_eq!(
            pick_voice(&voices, Language::English).unwrap().name,
            "Samantha"
        );
        // 泰米尔语没有对应语音，回退到印度英语
        assert_eq!(pick_voice(&voices, Language::Tamil).unwrap().name, "Veena");
    }

    #[test]
    fn test_pick_voice_falls_back_to_first() {
        let voices = vec![Voice::new("Thomas", "fr-FR")];
        assert_eq!(pick_voice(&voices, Language::Odia).unwrap().name, "Thomas");
        assert!(pick_voice(&[], Language::English).is_none());
    }

    #[test]
    fn test_rates() {
        assert_eq!(voice_profile(Language::English).rate, 1.0);
        assert_eq!(voice_profile(Language::Hindi).rate, 0.9);
        assert_eq!(voice_profile(Language::Bengali).rate, 0.8);
    }
}
