//! 查询页面控制器 - 流程层
//!
//! 核心职责：决定一次查询之前必须通过哪些检查、管理唯一的回答槽位、驱动朗读。
//!
//! 结构：
//! - `QueryPageState::apply` 是纯函数式的状态转换：事件进，命令出
//! - `QueryPage` 负责执行命令（调用 API、操作语音引擎），并把结果作为新事件送回
//!
//! 状态：`Initializing → Ready → Submitting → Ready`

use std::collections::VecDeque;
use std::fmt::Display;

use tracing::{debug, info, warn};

use crate::clients::ApiClient;
use crate::config::Config;
use crate::error::{ClientError, ErrorKind, TERMS_URL};
use crate::infrastructure::{SpeechController, SpeechEngine, Transport};
use crate::models::{
    BackendStatus, DocumentStatus, FileType, Language, MessageResponse, OutputMethod,
    QueryResponse, UploadFile,
};
use crate::services::{annotate_answer, AnswerLine};

pub const ENTER_QUESTION_MESSAGE: &str = "Please enter a question";
pub const BACKEND_UNAVAILABLE_MESSAGE: &str =
    "Backend service is not available. Please try again later.";
pub const UPLOAD_FIRST_MESSAGE: &str = "Please upload a document before asking questions. Click the button below to go to the Upload page.";
pub const NO_DOCUMENTS_MESSAGE: &str = "No documents available. Please upload a document first.";
pub const BACKEND_RETRY_MESSAGE: &str =
    "The backend service is currently unavailable. Please try again in a few minutes.";
pub const SERVER_RETRY_MESSAGE: &str =
    "The server encountered an error. Please try again in a few minutes.";
pub const TERMS_PROMPT_MESSAGE: &str = "The AI model requires terms acceptance. Please contact the administrator to accept the terms.";

/// 页面上展示的错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    Message(String),
    /// 需要管理员接受模型条款，附带跳转链接
    TermsRequired { message: String, link: String },
}

impl PageError {
    fn message(text: impl Into<String>) -> Self {
        PageError::Message(text.into())
    }
}

impl Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageError::Message(message) => f.write_str(message),
            PageError::TermsRequired { message, link } => write!(f, "{} ({})", message, link),
        }
    }
}

/// 把查询错误转换为页面提示
///
/// 按错误文本匹配，结构化的错误分类作为补充
pub fn categorize_query_error(err: &ClientError) -> PageError {
    let message = err.message();

    if err.kind() == ErrorKind::NoData || message.contains("No data available") {
        PageError::message(UPLOAD_FIRST_MESSAGE)
    } else if err.kind() == ErrorKind::BackendUnavailable || message.contains("Backend service") {
        PageError::message(BACKEND_RETRY_MESSAGE)
    } else if err.kind() == ErrorKind::TermsRequired
        || message.contains("model requires terms acceptance")
    {
        PageError::TermsRequired {
            message: TERMS_PROMPT_MESSAGE.to_string(),
            link: TERMS_URL.to_string(),
        }
    } else if message.contains("Server error") {
        PageError::message(SERVER_RETRY_MESSAGE)
    } else if message.is_empty() {
        PageError::message("Failed to process query")
    } else {
        PageError::message(message)
    }
}

/// 页面阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Ready,
    Submitting { request_id: u64 },
}

/// 送入控制器的事件
#[derive(Debug, Clone)]
pub enum PageEvent {
    Mounted,
    BackendChecked(BackendStatus),
    DocumentsChecked(DocumentStatus),
    QueryEdited(String),
    /// 语音输入识别出的文本
    VoiceTranscript(String),
    LanguageSelected(Language),
    OutputMethodSelected(OutputMethod),
    SubmitRequested,
    QueryCompleted {
        request_id: u64,
        result: Result<QueryResponse, ClientError>,
    },
    FileChosen(UploadFile),
    UploadCompleted(Result<MessageResponse, ClientError>),
    VoiceToggled(bool),
    ReplayRequested,
    SpeechStarted,
    SpeechEnded,
    /// 语音引擎报告朗读出错
    SpeechFailed,
    ErrorDismissed,
    Unmounted,
}

/// 控制器要求执行的副作用
#[derive(Debug, Clone, PartialEq)]
pub enum PageCommand {
    CheckBackend,
    CheckDocuments,
    SubmitQuery {
        request_id: u64,
        query: String,
        language: Language,
        output_method: OutputMethod,
    },
    Upload {
        file_type: FileType,
        file: UploadFile,
    },
    Speak {
        text: String,
        language: Language,
    },
    CancelSpeech,
    /// 用默认语音重读上一段
    RetrySpeech,
}

/// 查询页面状态
#[derive(Debug, Clone)]
pub struct QueryPageState {
    pub phase: Phase,
    pub query: String,
    pub language: Language,
    pub output_method: OutputMethod,
    pub response: Option<QueryResponse>,
    pub error: Option<PageError>,
    pub backend: Option<BackendStatus>,
    pub documents_available: bool,
    pub voice_enabled: bool,
    pub is_speaking: bool,
    pub upload_in_progress: bool,
    last_request_id: u64,
}

impl QueryPageState {
    pub fn new(language: Language, output_method: OutputMethod, voice_enabled: bool) -> Self {
        Self {
            phase: Phase::Initializing,
            query: String::new(),
            language,
            output_method,
            response: None,
            error: None,
            backend: None,
            documents_available: false,
            voice_enabled,
            is_speaking: false,
            upload_in_progress: false,
            last_request_id: 0,
        }
    }

    /// 按配置初始化，无法识别的默认值回退到 English / Text Only
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.default_language.parse().unwrap_or_default(),
            config.default_output_method.parse().unwrap_or_default(),
            config.voice_enabled,
        )
    }

    pub fn backend_healthy(&self) -> bool {
        self.backend.as_ref().map_or(false, |b| b.is_healthy)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    /// 当前回答按行拆分并标注商品图标
    pub fn answer_lines(&self) -> Vec<AnswerLine> {
        self.response
            .as_ref()
            .map(|r| annotate_answer(&r.answer))
            .unwrap_or_default()
    }

    /// 状态转换
    pub fn apply(&mut self, event: PageEvent) -> Vec<PageCommand> {
        match event {
            PageEvent::Mounted => {
                self.phase = Phase::Initializing;
                self.error = None;
                vec![PageCommand::CheckBackend]
            }
            PageEvent::BackendChecked(status) => {
                let healthy = status.is_healthy;
                self.backend = Some(status);
                if healthy {
                    vec![PageCommand::CheckDocuments]
                } else {
                    // 后端不健康时文档检查没有意义
                    self.error = Some(PageError::message(BACKEND_UNAVAILABLE_MESSAGE));
                    self.settle();
                    Vec::new()
                }
            }
            PageEvent::DocumentsChecked(status) => {
                self.documents_available = status.available;
                if !status.available {
                    self.error = Some(PageError::message(match status.note {
                        Some(note) => format!(
                            "Document check failed: {}. Please try uploading a document.",
                            note
                        ),
                        None => NO_DOCUMENTS_MESSAGE.to_string(),
                    }));
                }
                self.settle();
                Vec::new()
            }
            PageEvent::QueryEdited(text) | PageEvent::VoiceTranscript(text) => {
                self.query = text;
                Vec::new()
            }
            PageEvent::LanguageSelected(language) => {
                self.language = language;
                Vec::new()
            }
            PageEvent::OutputMethodSelected(method) => {
                self.output_method = method;
                Vec::new()
            }
            PageEvent::SubmitRequested => self.submit(),
            PageEvent::QueryCompleted { request_id, result } => {
                self.complete(request_id, result)
            }
            PageEvent::FileChosen(file) => {
                if self.upload_in_progress {
                    debug!("上传进行中，忽略新文件 {}", file.file_name);
                    return Vec::new();
                }
                self.upload_in_progress = true;
                self.error = None;
                vec![PageCommand::Upload {
                    file_type: FileType::infer_from_name(&file.file_name),
                    file,
                }]
            }
            PageEvent::UploadCompleted(result) => {
                self.upload_in_progress = false;
                match result {
                    Ok(_) => self.documents_available = true,
                    Err(err) => self.error = Some(PageError::message(err.message())),
                }
                Vec::new()
            }
            PageEvent::VoiceToggled(enabled) => {
                self.voice_enabled = enabled;
                if enabled {
                    // 重新开启不会重播上一条回答
                    Vec::new()
                } else {
                    self.is_speaking = false;
                    vec![PageCommand::CancelSpeech]
                }
            }
            PageEvent::ReplayRequested => {
                // 朗读中再按一次是停止
                if self.is_speaking {
                    self.is_speaking = false;
                    return vec![PageCommand::CancelSpeech];
                }
                match &self.response {
                    Some(resp) if self.voice_enabled && !resp.answer.trim().is_empty() => {
                        speak_commands(resp.answer.clone(), self.language)
                    }
                    _ => Vec::new(),
                }
            }
            PageEvent::SpeechStarted => {
                self.is_speaking = self.voice_enabled;
                Vec::new()
            }
            PageEvent::SpeechEnded => {
                self.is_speaking = false;
                Vec::new()
            }
            PageEvent::SpeechFailed => {
                self.is_speaking = false;
                if self.voice_enabled {
                    vec![PageCommand::RetrySpeech]
                } else {
                    Vec::new()
                }
            }
            PageEvent::ErrorDismissed => {
                self.error = None;
                Vec::new()
            }
            PageEvent::Unmounted => {
                self.is_speaking = false;
                vec![PageCommand::CancelSpeech]
            }
        }
    }

    fn settle(&mut self) {
        if self.phase == Phase::Initializing {
            self.phase = Phase::Ready;
        }
    }

    fn submit(&mut self) -> Vec<PageCommand> {
        if self.is_loading() {
            debug!("已有查询在进行中，忽略本次提交");
            return Vec::new();
        }
        if self.query.trim().is_empty() {
            self.error = Some(PageError::message(ENTER_QUESTION_MESSAGE));
            return Vec::new();
        }
        if !self.backend_healthy() {
            self.error = Some(PageError::message(BACKEND_UNAVAILABLE_MESSAGE));
            return Vec::new();
        }
        if !self.documents_available {
            self.error = Some(PageError::message(UPLOAD_FIRST_MESSAGE));
            return Vec::new();
        }

        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.phase = Phase::Submitting { request_id };
        self.error = None;
        self.response = None;

        vec![PageCommand::SubmitQuery {
            request_id,
            query: self.query.clone(),
            language: self.language,
            output_method: self.output_method,
        }]
    }

    fn complete(
        &mut self,
        request_id: u64,
        result: Result<QueryResponse, ClientError>,
    ) -> Vec<PageCommand> {
        if self.phase != (Phase::Submitting { request_id }) {
            warn!("⚠️ 丢弃过期的查询结果 #{}", request_id);
            return Vec::new();
        }
        self.phase = Phase::Ready;

        match result {
            Ok(response) => {
                let speak = self.voice_enabled && !response.answer.trim().is_empty();
                let text = response.answer.clone();
                self.response = Some(response);
                if speak {
                    speak_commands(text, self.language)
                } else {
                    Vec::new()
                }
            }
            Err(err) => {
                warn!("⚠️ 查询失败: {}", err);
                self.error = Some(categorize_query_error(&err));
                Vec::new()
            }
        }
    }
}

/// 开始朗读前先停止正在进行的朗读
fn speak_commands(text: String, language: Language) -> Vec<PageCommand> {
    vec![PageCommand::CancelSpeech, PageCommand::Speak { text, language }]
}

/// 查询页面
///
/// - 持有 API 客户端和语音控制器
/// - 顺序执行命令，因此挂载时的两项检查一定是先后进行的
pub struct QueryPage<T: Transport, S: SpeechEngine> {
    client: ApiClient<T>,
    speech: SpeechController<S>,
    state: QueryPageState,
}

impl<T: Transport, S: SpeechEngine> QueryPage<T, S> {
    pub fn new(client: ApiClient<T>, engine: S, state: QueryPageState) -> Self {
        Self {
            client,
            speech: SpeechController::new(engine),
            state,
        }
    }

    pub fn state(&self) -> &QueryPageState {
        &self.state
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn speech(&self) -> &SpeechController<S> {
        &self.speech
    }

    /// 处理事件，直到没有后续事件为止
    pub async fn dispatch(&mut self, event: PageEvent) {
        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            for command in self.state.apply(event) {
                if let Some(follow_up) = self.execute(command).await {
                    pending.push_back(follow_up);
                }
            }
        }
    }

    pub async fn mount(&mut self) {
        info!("📄 查询页面加载，检查后端与文档状态");
        self.dispatch(PageEvent::Mounted).await;
    }

    /// 填写问题并提交
    pub async fn ask(&mut self, query: impl Into<String>) {
        self.dispatch(PageEvent::QueryEdited(query.into())).await;
        self.dispatch(PageEvent::SubmitRequested).await;
    }

    pub async fn unmount(&mut self) {
        self.dispatch(PageEvent::Unmounted).await;
    }

    async fn execute(&mut self, command: PageCommand) -> Option<PageEvent> {
        match command {
            PageCommand::CheckBackend => Some(PageEvent::BackendChecked(
                self.client.check_backend_status().await,
            )),
            PageCommand::CheckDocuments => Some(PageEvent::DocumentsChecked(
                self.client.check_documents().await,
            )),
            PageCommand::SubmitQuery {
                request_id,
                query,
                language,
                output_method,
            } => {
                let result = self
                    .client
                    .submit_query(&query, language.as_str(), output_method.as_str())
                    .await;
                Some(PageEvent::QueryCompleted { request_id, result })
            }
            PageCommand::Upload { file_type, file } => Some(PageEvent::UploadCompleted(
                self.client.upload_file(file_type.as_str(), &file).await,
            )),
            PageCommand::Speak { text, language } => {
                self.speech.speak(&text, language);
                Some(PageEvent::SpeechStarted)
            }
            PageCommand::CancelSpeech => {
                self.speech.cancel();
                None
            }
            PageCommand::RetrySpeech => {
                if self.speech.retry_with_default_voice() {
                    Some(PageEvent::SpeechStarted)
                } else {
                    None
                }
            }
        }
    }
}
