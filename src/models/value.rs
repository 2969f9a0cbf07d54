//! 题目答案值

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// 调用方为题目提供的值
///
/// 除了具体的答案，还有三个哨兵值：
/// - `Default`: 自动选择一个能通过该题校验的值
/// - `Empty`: 清空答案
/// - `Unchanged`: 保留当前答案（例如预填值或之前 `set_value` 设置的值）
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Default,
    Empty,
    Unchanged,
    /// 文本；单选/下拉/量表题也接受文本形式的选项
    Text(String),
    /// 单个选项
    Choice(String),
    /// 多个选项（复选框）
    Choices(Vec<String>),
    /// 量表分值
    Scale(u32),
    /// 网格：每行一个选项列表，空列表表示该行不作答
    Grid(Vec<Vec<String>>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Duration(Duration),
}

impl Value {
    /// 文本值
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    /// 单选值
    pub fn choice(value: impl Into<String>) -> Self {
        Value::Choice(value.into())
    }

    /// 多选值
    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Choices(values.into_iter().map(Into::into).collect())
    }

    /// 网格值
    pub fn grid<R, I, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Grid(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// 值类型名称（用于错误信息）
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Default => "Default",
            Value::Empty => "Empty",
            Value::Unchanged => "Unchanged",
            Value::Text(_) => "Text",
            Value::Choice(_) => "Choice",
            Value::Choices(_) => "Choices",
            Value::Scale(_) => "Scale",
            Value::Grid(_) => "Grid",
            Value::Date(_) => "Date",
            Value::DateTime(_) => "DateTime",
            Value::Time(_) => "Time",
            Value::Duration(_) => "Duration",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Scale(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Time(value)
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Value::Duration(value)
    }
}
