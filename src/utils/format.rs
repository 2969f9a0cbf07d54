//! 文本渲染辅助函数（用于 `Form::to_str`）

/// 分隔线宽度
pub const SEP_WIDTH: usize = 50;

/// 为每一行添加缩进
pub fn add_indent(text: &str, indent: usize) -> String {
    if indent == 0 {
        return text.to_string();
    }
    let spaces = " ".repeat(indent);
    text.split_inclusive('\n')
        .map(|line| format!("{}{}", spaces, line))
        .collect()
}

/// 页面之间的分隔线
pub fn page_separator(indent: usize) -> String {
    "=".repeat(SEP_WIDTH + indent)
}

/// 题目之间的分隔线
pub fn element_separator(indent: usize) -> String {
    format!("{}{}", " ".repeat(indent), "-".repeat(SEP_WIDTH))
}
