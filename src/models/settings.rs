//! 表单设置

/// 收集电子邮件地址
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectEmails {
    #[default]
    No,
    /// 已验证（需要登录）
    Verified,
    /// 由回复者填写
    UserInput,
}

impl CollectEmails {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(2) => CollectEmails::Verified,
            Some(3) => CollectEmails::UserInput,
            _ => CollectEmails::No,
        }
    }

    /// 是否需要在第一页插入电子邮件题目
    pub fn is_enabled(&self) -> bool {
        *self != CollectEmails::No
    }
}

/// 向回复者发送回复副本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendReceipt {
    /// 未收集电子邮件时没有此设置
    #[default]
    Unused,
    /// 由回复者选择
    OptIn,
    Never,
    Always,
}

impl SendReceipt {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => SendReceipt::OptIn,
            Some(2) => SendReceipt::Never,
            Some(3) => SendReceipt::Always,
            _ => SendReceipt::Unused,
        }
    }
}

/// 表单设置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    // 回复
    pub collect_emails: CollectEmails,
    pub send_receipt: SendReceipt,
    pub submit_once: bool,
    pub edit_responses: bool,
    pub disable_autosave: bool,

    // 展示
    pub show_progressbar: bool,
    pub shuffle_questions: bool,
    pub confirmation_msg: Option<String>,
    pub show_summary: bool,
    resubmit_link: bool,

    // 测验
    pub is_quiz: bool,
    pub immediate_grades: bool,
    pub show_missed: bool,
    pub show_correct_answers: bool,
    pub show_points: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            collect_emails: CollectEmails::No,
            send_receipt: SendReceipt::Unused,
            submit_once: false,
            edit_responses: false,
            disable_autosave: false,
            show_progressbar: false,
            shuffle_questions: false,
            confirmation_msg: None,
            show_summary: false,
            resubmit_link: true,
            is_quiz: false,
            immediate_grades: true,
            show_missed: true,
            show_correct_answers: true,
            show_points: true,
        }
    }
}

impl Settings {
    /// 确认页是否显示 "提交另一份回复" 链接（仅允许提交一次时始终为否）
    pub fn show_resubmit_link(&self) -> bool {
        self.resubmit_link && !self.submit_once
    }

    pub fn set_show_resubmit_link(&mut self, value: bool) {
        self.resubmit_link = value;
    }

    /// 提交前是否需要登录
    pub fn requires_signin(&self) -> bool {
        self.submit_once || self.collect_emails == CollectEmails::Verified
    }

    /// 是否需要发送回复副本（需要验证码）
    pub fn needs_receipt(&self, requested: bool) -> bool {
        match self.send_receipt {
            SendReceipt::Always => true,
            SendReceipt::OptIn => requested,
            SendReceipt::Never | SendReceipt::Unused => false,
        }
    }

    pub fn to_str(&self) -> String {
        let mut lines = vec![
            format!("收集电子邮件: {:?}", self.collect_emails),
            format!("发送回复副本: {:?}", self.send_receipt),
            format!("仅允许提交一次: {}", self.submit_once),
            format!("允许编辑回复: {}", self.edit_responses),
        ];
        if self.is_quiz {
            lines.push(format!("测验: 立即显示成绩 {}", self.immediate_grades));
        }
        if let Some(msg) = &self.confirmation_msg {
            lines.push(format!("确认消息: {}", msg));
        }
        lines.join("\n")
    }
}
