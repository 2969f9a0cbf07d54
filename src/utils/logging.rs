/// 日志工具模块
///
/// 提供表单加载、填写、提交各阶段的日志输出
use tracing::{info, warn};

use crate::error::FillError;

/// 记录表单加载信息
///
/// # 参数
/// - `title`: 表单标题
/// - `pages`: 页面数量
/// - `inputs`: 可填写题目数量
pub fn log_form_loaded(title: &str, pages: usize, inputs: usize) {
    info!("{}", "=".repeat(60));
    info!("📄 表单加载完成: {}", truncate_text(title, 60));
    info!("📊 页面数: {} | 可填写题目: {}", pages, inputs);
    info!("{}", "=".repeat(60));
}

/// 记录填写结果
///
/// # 参数
/// - `path`: 实际经过的页面索引
pub fn log_fill_complete(path: &[usize]) {
    let pages: Vec<String> = path.iter().map(|p| (p + 1).to_string()).collect();
    info!("✓ 填写完成，经过页面: {}", pages.join(" → "));
}

/// 逐条输出填写错误
pub fn log_fill_errors(err: &FillError) {
    warn!("⚠️ {}", err);
    for element_error in err.errors() {
        warn!("  - {}", element_error);
    }
}

/// 记录提交开始
///
/// # 参数
/// - `requests`: 预计请求数
/// - `emulate_history`: 是否逐页提交
pub fn log_submission_start(requests: usize, emulate_history: bool) {
    let mode = if emulate_history { "逐页提交" } else { "单次提交" };
    info!("📤 开始提交 ({}), 预计 {} 个请求", mode, requests);
}

/// 记录提交完成
pub fn log_submission_complete(requests: usize) {
    info!("{}", "─".repeat(60));
    info!("✅ 提交成功，共发送 {} 个请求", requests);
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
