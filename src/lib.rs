//! # CartMapper Client
//!
//! 购物小票问答系统的客户端：上传小票（PDF / CSV）、扫描二维码、用自然语言提问
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源，只暴露能力
//! - `Transport` - HTTP 传输，`ReqwestTransport` 为默认实现
//! - `SpeechController` - 语音引擎的唯一持有者，同一时刻最多一段朗读
//! - `CameraGuard` - 摄像头占用与释放
//!
//! ### ② 客户端层（Clients）
//! - `ApiClient` - 上传、二维码、查询、健康检查，所有错误归一化为 `ClientError`
//!
//! ### ③ 业务能力层（Services）
//! - `grocery_icons` - 回答中商品的图标
//! - `voice_profile` - 按语言选择朗读语音
//!
//! ### ④ 流程层（Workflow）
//! - `QueryPage` - 查询页面控制器（事件 → 状态 → 命令）
//! - `UploadFlow` - 上传流程
//! - `ScanSession` - 扫码会话

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::ApiClient;
pub use config::Config;
pub use error::{ClientError, ClientResult, ErrorKind};
pub use infrastructure::{HttpReply, ReqwestTransport, SpeechEngine, Transport};
pub use models::{Language, OutputMethod, UploadFile};
pub use workflow::{PageEvent, QueryPage, QueryPageState, ScanSession, UploadFlow};
