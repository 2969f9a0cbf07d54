use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use tokio::fs;

use crate::models::element::{checked_seconds, Element, ElementKind, EMAIL_FIELD};
use crate::models::value::Value;
use crate::workflow::FillStrategy;

/// 答案文件中的原始值
///
/// 具体含义由题目类型决定，例如 `"2024-01-02"` 对日期题是日期，对短文本题是文本
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    Integer(i64),
    Text(String),
    List(Vec<String>),
    Grid(Vec<Vec<String>>),
    /// `{ default = true }` 或 `{ empty = true }`
    Flag {
        #[serde(default)]
        default: bool,
        #[serde(default)]
        empty: bool,
    },
}

impl RawAnswer {
    /// 按题目类型转换为答案值；无法识别的文本原样交给题目，由题目报告类型错误
    pub fn to_value(&self, element: &Element) -> Value {
        match (self, &element.kind) {
            (RawAnswer::Flag { default: true, .. }, _) => Value::Default,
            (RawAnswer::Flag { empty: true, .. }, _) => Value::Empty,
            (RawAnswer::Flag { .. }, _) => Value::Unchanged,

            (RawAnswer::Integer(n), ElementKind::Scale(_)) => match u32::try_from(*n) {
                Ok(n) => Value::Scale(n),
                Err(_) => Value::text(n.to_string()),
            },
            (RawAnswer::Integer(n), ElementKind::Time(t)) if t.duration => {
                Duration::try_seconds(*n)
                    .map(Value::Duration)
                    .unwrap_or_else(|| Value::text(n.to_string()))
            }
            (RawAnswer::Integer(n), _) => Value::text(n.to_string()),

            (RawAnswer::Text(s), ElementKind::Date(d)) => parse_date(s, d.has_time),
            (RawAnswer::Text(s), ElementKind::Time(t)) => parse_time(s, t.duration),
            (RawAnswer::Text(s), ElementKind::Checkboxes(_)) => Value::choices([s.clone()]),
            (RawAnswer::Text(s), _) => Value::text(s.clone()),

            // 单选网格可以写成每行一个值的列表
            (RawAnswer::List(values), ElementKind::Grid(_)) => {
                if values.is_empty() {
                    Value::Empty
                } else {
                    Value::Grid(values.iter().map(|v| vec![v.clone()]).collect())
                }
            }
            (RawAnswer::List(values), _) => Value::Choices(values.clone()),
            (RawAnswer::Grid(rows), _) => Value::Grid(rows.clone()),
        }
    }
}

fn parse_date(text: &str, has_time: bool) -> Value {
    if has_time {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M") {
            return Value::DateTime(datetime);
        }
    } else if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Value::Date(date);
    }
    Value::text(text)
}

fn parse_time(text: &str, duration: bool) -> Value {
    if duration {
        let parts: Option<Vec<i64>> = text.split(':').map(|p| p.trim().parse().ok()).collect();
        if let Some([h, m, s]) = parts.as_deref() {
            if let Some(duration) = checked_seconds(*h, *m, *s).and_then(Duration::try_seconds) {
                return Value::Duration(duration);
            }
        }
    } else if let Ok(time) = NaiveTime::parse_from_str(text, "%H:%M") {
        return Value::Time(time);
    }
    Value::text(text)
}

/// TOML 答案文件
///
/// ```toml
/// fill_defaults = true
///
/// [answers]
/// "姓名" = "张三"
/// "1234567" = "选项 A"   # 也可以使用题目 ID
/// "兴趣" = ["阅读", "音乐"]
/// "满意度" = 4
/// "备注" = { empty = true }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswerSheet {
    /// 文件中未出现的题目是否使用默认值（否则保留当前答案）
    #[serde(default)]
    pub fill_defaults: bool,
    /// 题目名称或题目 ID → 答案
    #[serde(default)]
    pub answers: HashMap<String, RawAnswer>,
}

impl AnswerSheet {
    /// 从 TOML 文本解析
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("无法解析答案文件")
    }

    pub fn with_fill_defaults(mut self, fill_defaults: bool) -> Self {
        self.fill_defaults = self.fill_defaults || fill_defaults;
        self
    }

    /// 查找题目对应的答案：先按 ID，再按名称
    pub fn lookup(&self, element: &Element) -> Option<&RawAnswer> {
        self.answers
            .get(&element.id.to_string())
            .or_else(|| {
                element
                    .name
                    .as_ref()
                    .and_then(|name| self.answers.get(name.trim()))
            })
            .or_else(|| match element.kind {
                ElementKind::UserEmail(_) => self.answers.get(EMAIL_FIELD),
                _ => None,
            })
    }
}

impl FillStrategy for AnswerSheet {
    fn value_for(&mut self, element: &Element, _page_index: usize, _element_index: usize) -> Value {
        match self.lookup(element) {
            Some(answer) => answer.to_value(element),
            None if self.fill_defaults => Value::Default,
            None => Value::Unchanged,
        }
    }
}

/// 从 TOML 文件加载答案
pub async fn load_answer_sheet(path: &Path) -> Result<AnswerSheet> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取答案文件: {}", path.display()))?;

    let sheet: AnswerSheet = toml::from_str(&content)
        .with_context(|| format!("无法解析答案文件: {}", path.display()))?;

    tracing::info!("成功加载 {} 条答案: {}", sheet.answers.len(), path.display());

    Ok(sheet)
}
