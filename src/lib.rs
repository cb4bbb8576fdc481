//! # Forms Admin
//!
//! 表单管理后台的核心逻辑：页面排序、表单生命周期、答案设置
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 存储接口与内存实现
//! - `MemoryStore` - 单条写入维护位置连续，批量写入原子完成
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个表单
//! - `page_order` - 计算新的页面顺序（纯函数）
//! - `ChangeOrderService` - 校验并写入页面顺序
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次排序请求"的完整流程
//! - `ReorderFlow` - 整理输入 → 排序 → 冲突处理
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 命令解析与分发
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{FormRepository, MemoryStore, PageRepository};
pub use models::{AnswerSettings, Form, FormDocument, FormId, FormState, Page, PageId};
pub use orchestrator::{App, Command};
pub use services::{resolve_page_order, ChangeOrderService, PagePosition};
pub use workflow::{ReorderCtx, ReorderFlow, ReorderOutcome, ReorderRequest};
