use crate::models::page::PageTarget;

/// 选项（单选、下拉、复选、量表、网格列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    /// 选项文本（"其他" 选项为空）
    pub value: String,
    /// 是否为 "其他" 选项
    pub other: bool,
    /// 选择该选项后的跳转目标（仅单选 / 下拉，且不在最后一页）
    pub target: Option<PageTarget>,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            other: false,
            target: None,
        }
    }

    pub fn with_target(mut self, target: PageTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// "其他" 选项
    pub fn other() -> Self {
        Self {
            value: String::new(),
            other: true,
            target: None,
        }
    }

    /// 渲染选项，`other_value` 为 "其他" 选项中填写的内容
    pub fn to_str(&self, other_value: Option<&str>) -> String {
        let label = if self.other {
            match other_value {
                Some(value) => format!("其他: \"{}\"", value),
                None => "其他".to_string(),
            }
        } else {
            self.value.clone()
        };

        match self.target {
            Some(PageTarget::Submit) => format!("{} → 提交", label),
            Some(PageTarget::Page(index)) => format!("{} → 第 {} 页", label, index + 1),
            None => label,
        }
    }
}
