//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 加载表单数据，持有存储
//! - 分发命令，输出结果
//!
//! ### `command` - 命令行参数
//! - 把参数解析为 [`Command`]
//!
//! ## 层次关系
//!
//! ```text
//! app (处理一条命令)
//!     ↓
//! workflow::ReorderFlow (处理一次排序请求)
//!     ↓
//! services (能力层：排序计算 / 写入)
//!     ↓
//! infrastructure (基础设施：存储)
//! ```

pub mod app;
pub mod command;

pub use app::App;
pub use command::{Command, USAGE};
