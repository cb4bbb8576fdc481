/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;
use crate::models::{Form, Page};

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 表单管理程序启动");
    info!("📁 表单目录: {}", config.fixtures_folder);
    info!("{}", "=".repeat(60));
}

/// 记录表单加载信息
///
/// # 参数
/// - `forms`: 表单数量
/// - `pages`: 页面总数
pub fn log_forms_loaded(forms: usize, pages: usize) {
    info!("✓ 共加载 {} 个表单, {} 个页面", forms, pages);
}

/// 输出表单及其页面
pub fn log_form_summary(form: &Form, pages: &[Page]) {
    info!("\n{}", "─".repeat(60));
    info!("📋 表单 {} | {} | 状态: {}", form.id, form.name, form.state);
    info!(
        "更新时间: {}",
        form.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
    for page in pages {
        info!(
            "  {:>3}. [#{}] {} ({})",
            page.position,
            page.id,
            truncate_text(&page.question_text, 40),
            page.answer_settings.answer_type()
        );
    }
    info!("{}", "─".repeat(60));
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
