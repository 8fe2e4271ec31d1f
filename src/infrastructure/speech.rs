//! 语音合成 - 基础设施层
//!
//! 语音引擎是进程级的共享资源。`SpeechController` 是它唯一的持有者，
//! 保证任何时刻最多只有一段朗读：每次开始朗读前先取消上一段。

use crate::models::Language;
use crate::services::voice_profile::{pick_voice, voice_profile, Voice, VoiceProfile};
use tracing::{debug, info, warn};

/// 一段待朗读的文本
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Option<Voice>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// 语音引擎能力
pub trait SpeechEngine {
    /// 当前可用的语音
    fn voices(&self) -> Vec<Voice>;

    /// 开始朗读
    fn speak(&mut self, utterance: Utterance);

    /// 立即停止所有朗读
    fn cancel(&mut self);
}

/// 语音控制器
///
/// 职责：
/// - 持有语音引擎
/// - 保证同一时刻最多一段朗读
/// - 朗读出错时用默认语音重试一次
/// - 销毁时释放引擎（停止朗读）
pub struct SpeechController<S: SpeechEngine> {
    engine: S,
    active: bool,
    last: Option<Utterance>,
}

impl<S: SpeechEngine> SpeechController<S> {
    pub fn new(engine: S) -> Self {
        Self {
            engine,
            active: false,
            last: None,
        }
    }

    /// 朗读文本，先取消正在进行的朗读
    ///
    /// 只有找到匹配的语音时才使用该语言的语速等参数，否则交给引擎默认值
    pub fn speak(&mut self, text: &str, language: Language) {
        if self.active {
            self.engine.cancel();
        }

        let voice = pick_voice(&self.engine.voices(), language).cloned();
        let profile = match voice {
            Some(_) => voice_profile(language),
            None => VoiceProfile::neutral(),
        };

        debug!(
            "朗读 {} 字符，语言 {}，语音 {:?}",
            text.chars().count(),
            language,
            voice.as_ref().map(|v| v.lang.as_str())
        );

        self.start(Utterance {
            text: text.to_string(),
            voice,
            rate: profile.rate,
            pitch: profile.pitch,
            volume: profile.volume,
        });
    }

    /// 引擎报告朗读出错时调用：上一段使用了指定语音则改用默认语音重读
    ///
    /// # 返回
    /// 是否重新开始了朗读
    pub fn retry_with_default_voice(&mut self) -> bool {
        self.active = false;
        let Some(mut utterance) = self.last.take() else {
            return false;
        };
        if utterance.voice.is_none() {
            return false;
        }

        warn!("⚠️ 朗读失败，改用默认语音重试");
        utterance.voice = None;
        self.start(utterance);
        true
    }

    fn start(&mut self, utterance: Utterance) {
        self.engine.speak(utterance.clone());
        self.last = Some(utterance);
        self.active = true;
    }

    /// 停止朗读
    pub fn cancel(&mut self) {
        self.engine.cancel();
        self.active = false;
        // 被取消的朗读即使随后报错也不重试
        self.last = None;
    }

    /// 最近一次操作后是否仍有朗读在进行
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn engine(&self) -> &S {
        &self.engine
    }
}

impl<S: SpeechEngine> Drop for SpeechController<S> {
    fn drop(&mut self) {
        if self.active {
            self.engine.cancel();
        }
    }
}

/// 只写日志的语音引擎，命令行环境下使用
#[derive(Debug, Default)]
pub struct TracingSpeechEngine;

impl SpeechEngine for TracingSpeechEngine {
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(&mut self, utterance: Utterance) {
        info!("🔊 {}", utterance.text);
    }

    fn cancel(&mut self) {
        debug!("🔇 停止朗读");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
    }

    impl SpeechEngine for Recorder {
        fn voices(&self) -> Vec<Voice> {
            vec![Voice::new("Lekha", "hi-IN")]
        }

        fn speak(&mut self, utterance: Utterance) {
            self.log.push(format!("speak:{}", utterance.text));
        }

        fn cancel(&mut self) {
            self.log.push("cancel".to_string());
        }
    }

    #[test]
    fn test_speak_cancels_previous_utterance() {
        let mut controller = SpeechController::new(Recorder::default());
        controller.speak("first", Language::English);
        controller.speak("second", Language::English);

        assert_eq!(
            controller.engine().log,
            vec!["speak:first", "cancel", "speak:second"]
        );
        assert!(controller.is_active());
    }

    #[derive(Default)]
    struct Capture {
        voices: Vec<Voice>,
        spoken: Vec<Utterance>,
    }

    impl SpeechEngine for Capture {
        fn voices(&self) -> Vec<Voice> {
            self.voices.clone()
        }
        fn speak(&mut self, utterance: Utterance) {
            self.spoken.push(utterance);
        }
        fn cancel(&mut self) {}
    }

    #[test]
    fn test_profile_applies_only_with_matching_voice() {
        let mut controller = SpeechController::new(Capture::default());
        controller.speak("दूध", Language::Hindi);

        let utterance = &controller.engine().spoken[0];
        assert!(utterance.voice.is_none());
        assert_eq!(utterance.rate, 1.0);
    }

    #[test]
    fn test_error_retries_once_with_default_voice() {
        let mut controller = SpeechController::new(Capture {
            voices: vec![Voice::new("Lekha", "hi-IN")],
            ..Default::default()
        });
        controller.speak("दूध", Language::Hindi);

        assert!(controller.retry_with_default_voice());
        let retry = &controller.engine().spoken[1];
        assert!(retry.voice.is_none());
        assert_eq!(retry.text, "दूध");
        assert_eq!(retry.rate, 0.9);

        // 默认语音也失败时不再重试
        assert!(!controller.retry_with_default_voice());
        assert!(!controller.is_active());
        assert_eq!(controller.engine().spoken.len(), 2);
    }

    #[test]
    fn test_hindi_uses_slower_rate_and_matching_voice() {
        let mut controller = SpeechController::new(Capture {
            voices: vec![Voice::new("Samantha", "en-US"), Voice::new("Lekha", "hi-IN")],
            ..Default::default()
        });
        controller.speak("दूध", Language::Hindi);

        let utterance = controller.engine().spoken[0].clone();
        assert_eq!(utterance.rate, 0.9);
        assert_eq!(utterance.voice.unwrap().name, "Lekha");
    }

    #[test]
    fn test_cancel_clears_active() {
        let mut controller = SpeechController::new(Recorder::default());
        controller.speak("hello", Language::English);
        controller.cancel();
        assert!(!controller.is_active());
        assert_eq!(controller.engine().log.last().unwrap(), "cancel");
        assert!(!controller.retry_with_default_voice());
    }
}
