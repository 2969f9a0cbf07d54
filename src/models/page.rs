//! 表单页面与页面跳转

use crate::models::element::Element;
use crate::utils::{add_indent, element_separator};

/// 页面跳转动作编码（内嵌数据中的原始值）
pub mod action {
    /// 回到第一页
    pub const FIRST: i64 = -1;
    /// 下一页（默认）
    pub const NEXT: i64 = -2;
    /// 提交表单
    pub const SUBMIT: i64 = -3;
}

/// 已解析的跳转目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageTarget {
    /// 跳转到指定索引的页面
    Page(usize),
    /// 提交表单
    Submit,
}

/// 表单页面
#[derive(Debug, Clone)]
pub struct Page {
    /// 页面索引（从 0 开始）
    pub index: usize,
    /// 页面 ID（第一页为 `action::FIRST`）
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub elements: Vec<Element>,
    /// 未被选项覆盖时的跳转目标
    pub default_target: PageTarget,
    /// 默认跳转是否偏离 "下一页"（由表单作者显式设置）
    pub explicit_target: bool,
}

impl Page {
    /// 创建一个空页面，默认跳转到提交
    pub fn new(index: usize, id: i64) -> Self {
        Self {
            index,
            id,
            name: None,
            description: None,
            elements: Vec::new(),
            default_target: PageTarget::Submit,
            explicit_target: false,
        }
    }

    /// 根据当前答案计算下一页
    ///
    /// 页面上选中了带跳转的选项时以该选项为准（多个时取最后一个），否则使用默认跳转
    pub fn next_target(&self) -> PageTarget {
        self.elements
            .iter()
            .filter_map(Element::selected_target)
            .last()
            .unwrap_or(self.default_target)
    }

    /// 文本形式
    pub fn to_str(&self, indent: usize, include_answer: bool) -> String {
        let mut title = format!("第 {} 页:", self.index + 1);
        if let Some(name) = &self.name {
            title = format!("{} {}", title, name);
        }
        if let Some(description) = &self.description {
            title = format!("{}\n{}", title, description);
        }
        if self.explicit_target {
            match self.default_target {
                PageTarget::Submit => title.push_str(" → 提交"),
                PageTarget::Page(index) => title.push_str(&format!(" → 第 {} 页", index + 1)),
            }
        }

        let separator = element_separator(indent);
        let mut parts = vec![title];
        for element in &self.elements {
            parts.push(format!(
                "{}\n{}",
                separator,
                add_indent(&element.to_str(include_answer), indent)
            ));
        }
        parts.join("\n")
    }
}
