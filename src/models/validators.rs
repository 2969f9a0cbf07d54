//! 题目校验规则
//!
//! 文本题（数字、文本、长度、正则）、复选框（选择数量）、网格（每列最多一个回答）

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ElementErrorKind;

/// 文本题校验规则
#[derive(Debug, Clone)]
pub enum TextRule {
    GreaterThan(f64),
    GreaterOrEqual(f64),
    LessThan(f64),
    LessOrEqual(f64),
    Equal(f64),
    NotEqual(f64),
    Between(f64, f64),
    NotBetween(f64, f64),
    IsNumber,
    Integer,
    Contains(String),
    NotContains(String),
    Email,
    Url,
    MaxLength(usize),
    MinLength(usize),
    RegexContains(Regex),
    RegexNotContains(Regex),
    RegexMatches(Regex),
    RegexNotMatches(Regex),
}

/// 文本题校验器
#[derive(Debug, Clone)]
pub struct TextValidator {
    pub rule: TextRule,
    /// 表单作者设置的自定义错误提示
    pub message: Option<String>,
}

static EMAIL_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());
static URL_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?i:(https?|ftp)://)?[^\s/.]+(\.[^\s/.]+)+(/\S*)?$").ok());

fn matches_pattern(regex: &LazyLock<Option<Regex>>, value: &str) -> bool {
    regex.as_ref().is_some_and(|re| re.is_match(value))
}

/// 整数形式的浮点数不带小数部分
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl TextValidator {
    pub fn new(rule: TextRule) -> Self {
        Self {
            rule,
            message: None,
        }
    }

    /// 完整匹配的正则（Google 的 "匹配" 要求整个输入符合）
    pub fn full_match(pattern: &str) -> Result<Regex, regex::Error> {
        Regex::new(&format!("^(?:{})$", pattern))
    }

    /// 检查输入是否满足规则
    pub fn check(&self, value: &str) -> bool {
        let number = || value.trim().parse::<f64>().ok().filter(|n| n.is_finite());
        match &self.rule {
            TextRule::GreaterThan(x) => number().is_some_and(|n| n > *x),
            TextRule::GreaterOrEqual(x) => number().is_some_and(|n| n >= *x),
            TextRule::LessThan(x) => number().is_some_and(|n| n < *x),
            TextRule::LessOrEqual(x) => number().is_some_and(|n| n <= *x),
            TextRule::Equal(x) => number().is_some_and(|n| n == *x),
            TextRule::NotEqual(x) => number().is_some_and(|n| n != *x),
            TextRule::Between(a, b) => number().is_some_and(|n| *a <= n && n <= *b),
            TextRule::NotBetween(a, b) => number().is_some_and(|n| n < *a || n > *b),
            TextRule::IsNumber => number().is_some(),
            TextRule::Integer => number().is_some_and(|n| n.fract() == 0.0),
            TextRule::Contains(s) => value.contains(s.as_str()),
            TextRule::NotContains(s) => !value.contains(s.as_str()),
            TextRule::Email => matches_pattern(&EMAIL_REGEX, value),
            TextRule::Url => matches_pattern(&URL_REGEX, value),
            TextRule::MaxLength(n) => value.chars().count() <= *n,
            TextRule::MinLength(n) => value.chars().count() >= *n,
            TextRule::RegexContains(re) => re.is_match(value),
            TextRule::RegexNotContains(re) => !re.is_match(value),
            TextRule::RegexMatches(re) => re.is_match(value),
            TextRule::RegexNotMatches(re) => !re.is_match(value),
        }
    }

    /// 校验输入
    pub fn validate(&self, value: &str) -> Result<(), ElementErrorKind> {
        if self.check(value) {
            return Ok(());
        }
        Err(ElementErrorKind::InvalidText {
            value: value.replace('\n', "\\n"),
            reason: self
                .message
                .clone()
                .unwrap_or_else(|| self.describe()),
        })
    }

    /// 生成一个满足规则的占位文本，无法生成时返回 None
    pub fn sample(&self) -> Option<String> {
        let candidate = match &self.rule {
            TextRule::GreaterThan(x) => format_number(x.floor() + 1.0),
            TextRule::GreaterOrEqual(x) => format_number(x.ceil()),
            TextRule::LessThan(x) => format_number(x.ceil() - 1.0),
            TextRule::LessOrEqual(x) => format_number(x.floor()),
            TextRule::Equal(x) => format_number(*x),
            TextRule::NotEqual(x) => format_number(x.floor() + 1.0),
            TextRule::Between(a, _) => format_number(a.ceil()),
            TextRule::NotBetween(_, b) => format_number(b.floor() + 1.0),
            TextRule::IsNumber | TextRule::Integer => "1".to_string(),
            TextRule::Contains(s) => s.clone(),
            TextRule::Email => "user@example.com".to_string(),
            TextRule::Url => "https://example.com".to_string(),
            TextRule::MinLength(n) => "x".repeat((*n).max(1)),
            TextRule::NotContains(_)
            | TextRule::MaxLength(_)
            | TextRule::RegexContains(_)
            | TextRule::RegexNotContains(_)
            | TextRule::RegexMatches(_)
            | TextRule::RegexNotMatches(_) => {
                return ["-", "0", "a", "user@example.com", "https://example.com"]
                    .into_iter()
                    .find(|c| self.check(c))
                    .map(str::to_string);
            }
        };
        self.check(&candidate).then_some(candidate)
    }

    /// 规则的文字说明
    pub fn describe(&self) -> String {
        match &self.rule {
            TextRule::GreaterThan(x) => format!("数字 > {}", format_number(*x)),
            TextRule::GreaterOrEqual(x) => format!("数字 >= {}", format_number(*x)),
            TextRule::LessThan(x) => format!("数字 < {}", format_number(*x)),
            TextRule::LessOrEqual(x) => format!("数字 <= {}", format_number(*x)),
            TextRule::Equal(x) => format!("数字 == {}", format_number(*x)),
            TextRule::NotEqual(x) => format!("数字 != {}", format_number(*x)),
            TextRule::Between(a, b) => {
                format!("数字介于 {} 和 {} 之间", format_number(*a), format_number(*b))
            }
            TextRule::NotBetween(a, b) => {
                format!("数字不在 {} 和 {} 之间", format_number(*a), format_number(*b))
            }
            TextRule::IsNumber => "必须是数字".to_string(),
            TextRule::Integer => "必须是整数".to_string(),
            TextRule::Contains(s) => format!("必须包含 \"{}\"", s),
            TextRule::NotContains(s) => format!("不能包含 \"{}\"", s),
            TextRule::Email => "必须是电子邮件地址".to_string(),
            TextRule::Url => "必须是网址".to_string(),
            TextRule::MaxLength(n) => format!("最多 {} 个字符", n),
            TextRule::MinLength(n) => format!("至少 {} 个字符", n),
            TextRule::RegexContains(re) => format!("必须包含匹配 /{}/ 的内容", re.as_str()),
            TextRule::RegexNotContains(re) => format!("不能包含匹配 /{}/ 的内容", re.as_str()),
            TextRule::RegexMatches(re) => format!("必须匹配 /{}/", re.as_str()),
            TextRule::RegexNotMatches(re) => format!("不能匹配 /{}/", re.as_str()),
        }
    }
}

impl fmt::Display for TextValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "! {} !", self.describe())
    }
}

/// 复选框选择数量规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckboxValidator {
    AtLeast(usize),
    AtMost(usize),
    Exactly(usize),
}

impl CheckboxValidator {
    /// 校验选择数量（未作答时不校验，由必填规则处理）
    pub fn validate(&self, count: usize) -> Result<(), ElementErrorKind> {
        if count == 0 {
            return Ok(());
        }
        let ok = match *self {
            CheckboxValidator::AtLeast(n) => count >= n,
            CheckboxValidator::AtMost(n) => count <= n,
            CheckboxValidator::Exactly(n) => count == n,
        };
        if ok {
            Ok(())
        } else {
            Err(ElementErrorKind::ChoiceCount {
                reason: format!("{} (实际选择 {} 项)", self, count),
            })
        }
    }

    /// 满足规则所需的最少选择数
    pub fn min_choices(&self) -> usize {
        match *self {
            CheckboxValidator::AtLeast(n) | CheckboxValidator::Exactly(n) => n,
            CheckboxValidator::AtMost(_) => 1,
        }
    }
}

impl fmt::Display for CheckboxValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckboxValidator::AtLeast(n) => write!(f, "至少选择 {} 项", n),
            CheckboxValidator::AtMost(n) => write!(f, "最多选择 {} 项", n),
            CheckboxValidator::Exactly(n) => write!(f, "必须选择 {} 项", n),
        }
    }
}

/// 网格校验规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridValidator {
    /// 每列最多一个回答
    ExclusiveColumns,
    /// 无法识别的规则，不做校验
    Unknown,
}

impl GridValidator {
    /// 校验每列是否最多被选择一次
    pub fn validate(&self, rows: &[Vec<String>]) -> Result<(), ElementErrorKind> {
        if *self == GridValidator::Unknown {
            return Ok(());
        }
        let mut seen = HashSet::new();
        for column in rows.iter().flatten() {
            if !seen.insert(column.as_str()) {
                return Err(ElementErrorKind::SameColumn {
                    column: column.clone(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for GridValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridValidator::ExclusiveColumns => write!(f, "! 每列最多一个回答 !"),
            GridValidator::Unknown => write!(f, "! 未知的校验规则 !"),
        }
    }
}
