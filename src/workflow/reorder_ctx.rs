//! 排序请求上下文
//!
//! 封装"我正在处理哪个表单的第几次排序请求"这一信息

use std::fmt::Display;

use crate::models::FormId;

/// 排序请求上下文
#[derive(Debug, Clone)]
pub struct ReorderCtx {
    /// 表单ID
    pub form_id: FormId,

    /// 请求序号（仅用于日志显示）
    pub request_index: usize,
}

impl ReorderCtx {
    /// 创建新的请求上下文
    pub fn new(form_id: FormId, request_index: usize) -> Self {
        Self {
            form_id,
            request_index,
        }
    }
}

impl Display for ReorderCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[表单 ID#{} 请求#{}]", self.form_id, self.request_index)
    }
}
