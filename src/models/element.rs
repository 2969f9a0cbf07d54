//! 表单题目
//!
//! 每种题目知道如何接收答案、校验答案、编码为提交字段以及渲染为文本。
//! 题目内部只保存规范化后的答案（选项文本、"其他" 内容、秒数等）。

use std::collections::HashMap;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::debug;

use crate::error::ElementErrorKind;
use crate::infrastructure::FormFields;
use crate::models::media::ImageObject;
use crate::models::option::ChoiceOption;
use crate::models::page::PageTarget;
use crate::models::validators::{CheckboxValidator, GridValidator, TextRule, TextValidator};
use crate::models::value::Value;

/// 电子邮件伪题目在预填数据中使用的键
pub const EMAIL_ENTRY_ID: i64 = 0;
/// 电子邮件提交字段名
pub const EMAIL_FIELD: &str = "emailAddress";

const OTHER_OPTION: &str = "__other_option__";
const MAX_DURATION_SECS: i64 = 73 * 3600;

/// `时:分:秒` 转换为秒数，溢出时返回 None
pub(crate) fn checked_seconds(hours: i64, minutes: i64, seconds: i64) -> Option<i64> {
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// 预填数据: entry id → 值列表
pub type Prefill = HashMap<i64, Vec<String>>;

fn entry_key(entry_id: i64) -> String {
    format!("entry.{}", entry_id)
}

fn incompatible(expected: &'static str, actual: &Value) -> ElementErrorKind {
    ElementErrorKind::IncompatibleType {
        expected,
        actual: actual.type_name(),
    }
}

fn choice_symbol(selected: bool) -> &'static str {
    if selected {
        ">"
    } else {
        "·"
    }
}

fn quoted_or_empty(value: Option<String>) -> String {
    match value {
        Some(value) => format!("> \"{}\"", value),
        None => "> 空".to_string(),
    }
}

// ========== 文本题 ==========

/// 短文本、段落、电子邮件
#[derive(Debug, Clone)]
pub struct TextInput {
    pub entry_id: i64,
    pub required: bool,
    pub validator: Option<TextValidator>,
    value: Option<String>,
}

impl TextInput {
    pub fn new(entry_id: i64, required: bool, validator: Option<TextValidator>) -> Self {
        Self {
            entry_id,
            required,
            validator,
            value: None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn assign(&mut self, value: Value) -> Result<(), ElementErrorKind> {
        match value {
            Value::Empty => self.value = None,
            Value::Text(text) => self.value = (!text.is_empty()).then_some(text),
            other => return Err(incompatible("Text", &other)),
        }
        Ok(())
    }

    fn validate(&self, single_line: bool) -> Result<(), ElementErrorKind> {
        let Some(value) = &self.value else {
            return if self.required {
                Err(ElementErrorKind::Required)
            } else {
                Ok(())
            };
        };
        if single_line && value.contains('\n') {
            return Err(ElementErrorKind::InvalidText {
                value: value.replace('\n', "\\n"),
                reason: "包含换行符".to_string(),
            });
        }
        match &self.validator {
            Some(validator) => validator.validate(value),
            None => Ok(()),
        }
    }

    fn sample(&self) -> Result<Value, ElementErrorKind> {
        match &self.validator {
            Some(validator) => validator
                .sample()
                .map(Value::Text)
                .ok_or(ElementErrorKind::NoDefaultValue),
            None => Ok(Value::text("-")),
        }
    }

    fn encode(&self, key: String, fields: &mut FormFields) {
        if let Some(value) = &self.value {
            fields.push((key, value.clone()));
        }
    }

    fn prefill(&mut self, values: Option<&Vec<String>>) {
        if let Some(value) = values.and_then(|v| v.first()) {
            self.value = (!value.is_empty()).then(|| value.clone());
        }
    }

    fn hints(&self) -> Vec<String> {
        self.validator.iter().map(ToString::to_string).collect()
    }
}

// ========== 选择题 ==========

/// 单选、下拉列表、复选框
#[derive(Debug, Clone)]
pub struct ChoiceInput {
    pub entry_id: i64,
    pub required: bool,
    pub options: Vec<ChoiceOption>,
    /// "其他" 选项（可填写任意文本）
    pub other_option: Option<ChoiceOption>,
    /// 复选框的选择数量规则
    pub validator: Option<CheckboxValidator>,
    selected: Vec<String>,
    other_value: Option<String>,
}

impl ChoiceInput {
    /// 创建选择题，选项列表中的 "其他" 选项会被单独保存
    pub fn new(entry_id: i64, required: bool, options: Vec<ChoiceOption>) -> Self {
        let (others, options): (Vec<_>, Vec<_>) = options.into_iter().partition(|o| o.other);
        Self {
            entry_id,
            required,
            options,
            other_option: others.into_iter().next(),
            validator: None,
            selected: Vec::new(),
            other_value: None,
        }
    }

    /// 已选择的普通选项
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// "其他" 选项中填写的内容
    pub fn other_value(&self) -> Option<&str> {
        self.other_value.as_deref()
    }

    fn assign(&mut self, value: Value, multiple: bool) -> Result<(), ElementErrorKind> {
        let values = match value {
            Value::Empty => Vec::new(),
            Value::Text(v) | Value::Choice(v) => vec![v],
            Value::Choices(values) if multiple || values.len() <= 1 => values,
            Value::Choices(_) => return Err(ElementErrorKind::MultipleValues),
            other => {
                let expected = if multiple { "Choices" } else { "Choice" };
                return Err(incompatible(expected, &other));
            }
        };
        let (selected, other_value) = self.split(values)?;
        self.selected = selected;
        self.other_value = other_value;
        Ok(())
    }

    /// 将输入值拆分为普通选项和 "其他" 内容
    fn split(&self, values: Vec<String>) -> Result<(Vec<String>, Option<String>), ElementErrorKind> {
        let mut selected: Vec<String> = Vec::new();
        let mut other_value: Option<String> = None;
        for value in values {
            if self.options.iter().any(|o| o.value == value) {
                if !selected.contains(&value) {
                    selected.push(value);
                }
            } else if self.other_option.is_some() {
                if let Some(first) = &other_value {
                    return Err(ElementErrorKind::DuplicateOther {
                        first: first.clone(),
                        second: value,
                    });
                }
                other_value = Some(value);
            } else {
                return Err(ElementErrorKind::InvalidChoice { value });
            }
        }
        Ok((selected, other_value))
    }

    fn answered_count(&self) -> usize {
        let other = self.other_value.as_deref().is_some_and(|v| !v.is_empty());
        self.selected.len() + usize::from(other)
    }

    fn validate(&self) -> Result<(), ElementErrorKind> {
        if self.required && self.selected.is_empty() {
            match self.other_value.as_deref() {
                None => return Err(ElementErrorKind::Required),
                Some("") => return Err(ElementErrorKind::EmptyOther),
                Some(_) => {}
            }
        }
        match &self.validator {
            Some(validator) => validator.validate(self.answered_count()),
            None => Ok(()),
        }
    }

    fn selected_target(&self) -> Option<PageTarget> {
        if let Some(value) = self.selected.last() {
            return self
                .options
                .iter()
                .find(|o| &o.value == value)
                .and_then(|o| o.target);
        }
        if self.other_value.is_some() {
            return self.other_option.as_ref().and_then(|o| o.target);
        }
        None
    }

    fn sample(&self, multiple: bool) -> Result<Value, ElementErrorKind> {
        if !multiple {
            return self
                .options
                .first()
                .map(|o| Value::choice(o.value.clone()))
                .ok_or(ElementErrorKind::NoDefaultValue);
        }
        let count = self.validator.map_or(1, |v| v.min_choices()).max(1);
        if self.options.len() < count {
            return Err(ElementErrorKind::NoDefaultValue);
        }
        Ok(Value::choices(
            self.options.iter().take(count).map(|o| o.value.clone()),
        ))
    }

    fn encode(&self, fields: &mut FormFields) {
        let key = entry_key(self.entry_id);
        for value in &self.selected {
            fields.push((key.clone(), value.clone()));
        }
        if let Some(other) = self.other_value.as_deref().filter(|v| !v.is_empty()) {
            fields.push((key.clone(), OTHER_OPTION.to_string()));
            fields.push((format!("{}.other_option_response", key), other.to_string()));
        }
    }

    fn prefill(&mut self, values: Option<&Vec<String>>) {
        let Some(values) = values else { return };
        match self.split(values.clone()) {
            Ok((selected, other_value)) => {
                self.selected = selected;
                self.other_value = other_value;
            }
            Err(e) => debug!("忽略无效的预填值 (entry {}): {}", self.entry_id, e),
        }
    }

    fn hints(&self, mark: bool) -> Vec<String> {
        let mut hints: Vec<String> = self.validator.iter().map(ToString::to_string).collect();
        for option in &self.options {
            let selected = mark && self.selected.contains(&option.value);
            hints.push(format!("{} {}", choice_symbol(selected), option.to_str(None)));
        }
        if let Some(other) = &self.other_option {
            let chosen = mark && self.other_value.is_some();
            let value = if chosen { self.other_value.as_deref() } else { None };
            hints.push(format!("{} {}", choice_symbol(chosen), other.to_str(value)));
        }
        hints
    }
}

// ========== 量表 ==========

/// 线性量表
#[derive(Debug, Clone)]
pub struct ScaleInput {
    pub entry_id: i64,
    pub required: bool,
    pub options: Vec<ChoiceOption>,
    pub low: Option<String>,
    pub high: Option<String>,
    selected: Option<String>,
}

impl ScaleInput {
    pub fn new(
        entry_id: i64,
        required: bool,
        options: Vec<ChoiceOption>,
        low: Option<String>,
        high: Option<String>,
    ) -> Self {
        Self {
            entry_id,
            required,
            options,
            low,
            high,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    fn assign(&mut self, value: Value) -> Result<(), ElementErrorKind> {
        let value = match value {
            Value::Empty => {
                self.selected = None;
                return Ok(());
            }
            Value::Scale(n) => n.to_string(),
            Value::Text(v) | Value::Choice(v) => v,
            other => return Err(incompatible("Scale", &other)),
        };
        if !self.options.iter().any(|o| o.value == value) {
            return Err(ElementErrorKind::InvalidChoice { value });
        }
        self.selected = Some(value);
        Ok(())
    }

    fn validate(&self) -> Result<(), ElementErrorKind> {
        if self.required && self.selected.is_none() {
            return Err(ElementErrorKind::Required);
        }
        Ok(())
    }

    fn sample(&self) -> Result<Value, ElementErrorKind> {
        self.options
            .first()
            .map(|o| Value::choice(o.value.clone()))
            .ok_or(ElementErrorKind::NoDefaultValue)
    }

    fn prefill(&mut self, values: Option<&Vec<String>>) {
        if let Some(value) = values.and_then(|v| v.first()) {
            if self.options.iter().any(|o| &o.value == value) {
                self.selected = Some(value.clone());
            }
        }
    }

    fn hints(&self) -> Vec<String> {
        let (Some(first), Some(last)) = (self.options.first(), self.options.last()) else {
            return Vec::new();
        };
        let mut hint = format!("{} - {}", first.value, last.value);
        if let Some(low) = self.low.as_deref().filter(|s| !s.is_empty()) {
            hint = format!("({}) {}", low, hint);
        }
        if let Some(high) = self.high.as_deref().filter(|s| !s.is_empty()) {
            hint = format!("{} ({})", hint, high);
        }
        vec![hint]
    }
}

// ========== 网格 ==========

/// 网格中的一行（每行对应一个 entry）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub entry_id: i64,
    pub name: String,
}

/// 单选网格、复选框网格
#[derive(Debug, Clone)]
pub struct GridInput {
    pub rows: Vec<GridRow>,
    pub columns: Vec<ChoiceOption>,
    pub required: bool,
    /// 每行是否允许多选
    pub multichoice: bool,
    pub validator: Option<GridValidator>,
    selected: Vec<Vec<String>>,
}

impl GridInput {
    pub fn new(rows: Vec<GridRow>, columns: Vec<ChoiceOption>, required: bool, multichoice: bool) -> Self {
        let selected = vec![Vec::new(); rows.len()];
        Self {
            rows,
            columns,
            required,
            multichoice,
            validator: None,
            selected,
        }
    }

    pub fn selected(&self) -> &[Vec<String>] {
        &self.selected
    }

    /// 必填且要求每列最多一个回答，但列数少于行数
    pub fn is_misconfigured(&self) -> bool {
        self.required
            && self.validator == Some(GridValidator::ExclusiveColumns)
            && self.columns.len() < self.rows.len()
    }

    fn has_column(&self, value: &str) -> bool {
        self.columns.iter().any(|c| c.value == value)
    }

    fn assign(&mut self, value: Value) -> Result<(), ElementErrorKind> {
        let rows = match value {
            Value::Empty => {
                self.selected = vec![Vec::new(); self.rows.len()];
                return Ok(());
            }
            Value::Grid(rows) => rows,
            other => return Err(incompatible("Grid", &other)),
        };
        if rows.len() != self.rows.len() {
            return Err(ElementErrorKind::RowCountMismatch {
                expected: self.rows.len(),
                actual: rows.len(),
            });
        }

        let mut selected = Vec::with_capacity(rows.len());
        for (row, values) in self.rows.iter().zip(rows) {
            let mut chosen: Vec<String> = Vec::new();
            for value in values {
                if !self.has_column(&value) {
                    return Err(ElementErrorKind::InvalidRowChoice {
                        row: row.name.clone(),
                        value,
                    });
                }
                if !chosen.contains(&value) {
                    chosen.push(value);
                }
            }
            if !self.multichoice && chosen.len() > 1 {
                return Err(ElementErrorKind::MultipleRowValues {
                    row: row.name.clone(),
                });
            }
            selected.push(chosen);
        }
        self.selected = selected;
        Ok(())
    }

    fn validate(&self) -> Result<(), ElementErrorKind> {
        if self.is_misconfigured() {
            return Err(ElementErrorKind::MisconfiguredGrid);
        }
        if self.required {
            if let Some((row, _)) = self
                .rows
                .iter()
                .zip(&self.selected)
                .find(|(_, values)| values.is_empty())
            {
                return Err(ElementErrorKind::RequiredRow {
                    row: row.name.clone(),
                });
            }
        }
        match &self.validator {
            Some(validator) => validator.validate(&self.selected),
            None => Ok(()),
        }
    }

    fn sample(&self) -> Result<Value, ElementErrorKind> {
        if self.columns.is_empty() {
            return Err(ElementErrorKind::NoDefaultValue);
        }
        if self.validator == Some(GridValidator::ExclusiveColumns) {
            if self.columns.len() < self.rows.len() {
                return Err(ElementErrorKind::MisconfiguredGrid);
            }
            return Ok(Value::Grid(
                self.columns
                    .iter()
                    .take(self.rows.len())
                    .map(|c| vec![c.value.clone()])
                    .collect(),
            ));
        }
        let first = self.columns[0].value.clone();
        Ok(Value::Grid(vec![vec![first]; self.rows.len()]))
    }

    fn encode(&self, fields: &mut FormFields) {
        for (row, values) in self.rows.iter().zip(&self.selected) {
            for value in values {
                fields.push((entry_key(row.entry_id), value.clone()));
            }
        }
    }

    fn prefill(&mut self, data: &Prefill) {
        for (i, row) in self.rows.iter().enumerate() {
            if let Some(values) = data.get(&row.entry_id) {
                self.selected[i] = values
                    .iter()
                    .filter(|v| self.columns.iter().any(|c| &&c.value == v))
                    .cloned()
                    .collect();
            }
        }
    }

    fn hints(&self, mark: bool) -> Vec<String> {
        let mut hints: Vec<String> = self.validator.iter().map(ToString::to_string).collect();
        let width = self
            .rows
            .iter()
            .map(|r| r.name.chars().count())
            .max()
            .unwrap_or(0);
        let header: Vec<&str> = self.columns.iter().map(|c| c.value.as_str()).collect();
        hints.push(format!("{}{}", " ".repeat(width + 1), header.join("|")));

        for (row, values) in self.rows.iter().zip(&self.selected) {
            let cells: Vec<String> = self
                .columns
                .iter()
                .map(|c| {
                    let symbol = if mark && values.contains(&c.value) { "+" } else { "?" };
                    format!("{:^w$}", symbol, w = c.value.chars().count())
                })
                .collect();
            hints.push(format!("{:>w$} {}", row.name, cells.join(" "), w = width));
        }
        hints
    }
}

// ========== 日期与时间 ==========

/// 日期（可带年份和时间）
#[derive(Debug, Clone)]
pub struct DateInput {
    pub entry_id: i64,
    pub required: bool,
    pub has_year: bool,
    pub has_time: bool,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
}

impl DateInput {
    pub fn new(entry_id: i64, required: bool, has_year: bool, has_time: bool) -> Self {
        Self {
            entry_id,
            required,
            has_year,
            has_time,
            date: None,
            time: None,
        }
    }

    fn assign(&mut self, value: Value) -> Result<(), ElementErrorKind> {
        match value {
            Value::Empty => {
                self.date = None;
                self.time = None;
            }
            Value::Date(date) if !self.has_time => self.date = Some(date),
            Value::DateTime(datetime) if self.has_time => {
                self.date = Some(datetime.date());
                self.time = Some(datetime.time());
            }
            other => {
                let expected = if self.has_time { "DateTime" } else { "Date" };
                return Err(incompatible(expected, &other));
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ElementErrorKind> {
        if self.required && self.date.is_none() {
            return Err(ElementErrorKind::Required);
        }
        Ok(())
    }

    fn sample(&self) -> Result<Value, ElementErrorKind> {
        let today = Local::now().date_naive();
        if !self.has_time {
            return Ok(Value::Date(today));
        }
        let noon = NaiveTime::from_hms_opt(12, 0, 0).ok_or(ElementErrorKind::NoDefaultValue)?;
        Ok(Value::DateTime(today.and_time(noon)))
    }

    fn encode(&self, fields: &mut FormFields) {
        let Some(date) = self.date else { return };
        let key = entry_key(self.entry_id);
        if self.has_year {
            fields.push((format!("{}_year", key), date.year().to_string()));
        }
        fields.push((format!("{}_month", key), date.month().to_string()));
        fields.push((format!("{}_day", key), date.day().to_string()));
        if let (true, Some(time)) = (self.has_time, self.time) {
            fields.push((format!("{}_hour", key), time.hour().to_string()));
            fields.push((format!("{}_minute", key), time.minute().to_string()));
        }
    }

    fn prefill(&mut self, values: Option<&Vec<String>>) {
        let Some(value) = values.and_then(|v| v.first()) else { return };
        if self.has_time {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M") {
                self.date = Some(datetime.date());
                self.time = Some(datetime.time());
                return;
            }
        } else if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            self.date = Some(date);
            return;
        }
        debug!("忽略无法识别的日期预填值 (entry {}): {}", self.entry_id, value);
    }

    fn answer(&self) -> String {
        let formatted = self.date.map(|date| {
            let mut text = if self.has_year {
                date.format("%Y/%m/%d").to_string()
            } else {
                date.format("%m/%d").to_string()
            };
            if let Some(time) = self.time.filter(|_| self.has_time) {
                text.push_str(&format!(" {}", time.format("%H:%M")));
            }
            text
        });
        quoted_or_empty(formatted)
    }
}

/// 时间或时长
#[derive(Debug, Clone)]
pub struct TimeInput {
    pub entry_id: i64,
    pub required: bool,
    /// 时长（时:分:秒），否则为一天中的时间（时:分）
    pub duration: bool,
    seconds: Option<i64>,
}

impl TimeInput {
    pub fn new(entry_id: i64, required: bool, duration: bool) -> Self {
        Self {
            entry_id,
            required,
            duration,
            seconds: None,
        }
    }

    fn assign(&mut self, value: Value) -> Result<(), ElementErrorKind> {
        match value {
            Value::Empty => self.seconds = None,
            Value::Time(time) if !self.duration => {
                self.seconds = Some(i64::from(time.hour() * 3600 + time.minute() * 60));
            }
            Value::Duration(duration) if self.duration => {
                let seconds = duration.num_seconds();
                if !(0..MAX_DURATION_SECS).contains(&seconds) {
                    return Err(ElementErrorKind::InvalidDuration { seconds });
                }
                self.seconds = Some(seconds);
            }
            other => {
                let expected = if self.duration { "Duration" } else { "Time" };
                return Err(incompatible(expected, &other));
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ElementErrorKind> {
        if self.required && self.seconds.is_none() {
            return Err(ElementErrorKind::Required);
        }
        Ok(())
    }

    fn sample(&self) -> Result<Value, ElementErrorKind> {
        if self.duration {
            return Ok(Value::Duration(Duration::hours(1)));
        }
        NaiveTime::from_hms_opt(12, 0, 0)
            .map(Value::Time)
            .ok_or(ElementErrorKind::NoDefaultValue)
    }

    fn parts(&self) -> Option<(i64, i64, i64)> {
        self.seconds
            .map(|s| (s / 3600, s / 60 % 60, s % 60))
    }

    fn encode(&self, fields: &mut FormFields) {
        let Some((hour, minute, second)) = self.parts() else { return };
        let key = entry_key(self.entry_id);
        fields.push((format!("{}_hour", key), hour.to_string()));
        fields.push((format!("{}_minute", key), minute.to_string()));
        if self.duration {
            fields.push((format!("{}_second", key), second.to_string()));
        }
    }

    fn prefill(&mut self, values: Option<&Vec<String>>) {
        let Some(value) = values.and_then(|v| v.first()) else { return };
        let parts: Option<Vec<i64>> = value.split(':').map(|p| p.trim().parse().ok()).collect();
        let seconds = match (parts.as_deref(), self.duration) {
            (Some([h, m]), false) => u32::try_from(*h)
                .ok()
                .zip(u32::try_from(*m).ok())
                .and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0))
                .map(|t| i64::from(t.hour() * 3600 + t.minute() * 60)),
            (Some([h, m]), true) => checked_seconds(*h, *m, 0),
            (Some([h, m, s]), true) => checked_seconds(*h, *m, *s),
            _ => None,
        }
        .filter(|s| (0..MAX_DURATION_SECS).contains(s));

        match seconds {
            Some(seconds) => self.seconds = Some(seconds),
            None => debug!("忽略无法识别的时间预填值 (entry {}): {}", self.entry_id, value),
        }
    }

    fn answer(&self) -> String {
        let formatted = self.parts().map(|(h, m, s)| {
            if self.duration {
                format!("{:02}:{:02}:{:02}", h, m, s)
            } else {
                format!("{:02}:{:02}", h, m)
            }
        });
        quoted_or_empty(formatted)
    }
}

/// 文件上传（只解析，不支持填写）
#[derive(Debug, Clone)]
pub struct FileUploadInput {
    pub entry_id: i64,
    pub required: bool,
}

// ========== 题目 ==========

/// 题目类型
#[derive(Debug, Clone)]
pub enum ElementKind {
    Short(TextInput),
    Paragraph(TextInput),
    Radio(ChoiceInput),
    Dropdown(ChoiceInput),
    Checkboxes(ChoiceInput),
    Scale(ScaleInput),
    Grid(GridInput),
    Date(DateInput),
    Time(TimeInput),
    /// 收集电子邮件时插入第一页的伪题目
    UserEmail(TextInput),
    FileUpload(FileUploadInput),
    Comment,
    Image(ImageObject),
    /// YouTube 视频
    Video { link: String },
}

/// 表单题目
#[derive(Debug, Clone)]
pub struct Element {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: ElementKind,
}

impl Element {
    pub fn new(id: i64, name: Option<String>, description: Option<String>, kind: ElementKind) -> Self {
        Self {
            id,
            name,
            description,
            kind,
        }
    }

    /// 电子邮件伪题目
    pub fn user_email() -> Self {
        let validator = TextValidator::new(TextRule::Email);
        Self::new(
            EMAIL_ENTRY_ID,
            Some("电子邮件地址".to_string()),
            None,
            ElementKind::UserEmail(TextInput::new(EMAIL_ENTRY_ID, true, Some(validator))),
        )
    }

    /// 是否为需要填写的题目
    pub fn is_input(&self) -> bool {
        !matches!(
            self.kind,
            ElementKind::Comment | ElementKind::Image(_) | ElementKind::Video { .. }
        )
    }

    pub fn required(&self) -> bool {
        match &self.kind {
            ElementKind::Short(t) | ElementKind::Paragraph(t) | ElementKind::UserEmail(t) => t.required,
            ElementKind::Radio(c) | ElementKind::Dropdown(c) | ElementKind::Checkboxes(c) => c.required,
            ElementKind::Scale(s) => s.required,
            ElementKind::Grid(g) => g.required,
            ElementKind::Date(d) => d.required,
            ElementKind::Time(t) => t.required,
            ElementKind::FileUpload(f) => f.required,
            ElementKind::Comment | ElementKind::Image(_) | ElementKind::Video { .. } => false,
        }
    }

    /// 题目类型名称
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ElementKind::Short(_) => "短文本",
            ElementKind::Paragraph(_) => "段落",
            ElementKind::Radio(_) => "单选",
            ElementKind::Dropdown(_) => "下拉列表",
            ElementKind::Checkboxes(_) => "复选框",
            ElementKind::Scale(_) => "线性量表",
            ElementKind::Grid(g) if g.multichoice => "复选框网格",
            ElementKind::Grid(_) => "单选网格",
            ElementKind::Date(d) if d.has_time => "日期时间",
            ElementKind::Date(_) => "日期",
            ElementKind::Time(t) if t.duration => "时长",
            ElementKind::Time(_) => "时间",
            ElementKind::UserEmail(_) => "电子邮件",
            ElementKind::FileUpload(_) => "文件上传",
            ElementKind::Comment => "说明",
            ElementKind::Image(_) => "图片",
            ElementKind::Video { .. } => "视频",
        }
    }

    /// 当前是否没有答案
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            ElementKind::Short(t) | ElementKind::Paragraph(t) | ElementKind::UserEmail(t) => t.value.is_none(),
            ElementKind::Radio(c) | ElementKind::Dropdown(c) | ElementKind::Checkboxes(c) => {
                c.selected.is_empty() && c.other_value.is_none()
            }
            ElementKind::Scale(s) => s.selected.is_none(),
            ElementKind::Grid(g) => g.selected.iter().all(Vec::is_empty),
            ElementKind::Date(d) => d.date.is_none(),
            ElementKind::Time(t) => t.seconds.is_none(),
            _ => true,
        }
    }

    /// 设置答案；值被拒绝时保留原答案
    pub fn set_value(&mut self, value: Value) -> Result<(), ElementErrorKind> {
        self.fill_value(value, false)
    }

    /// 解析哨兵值后设置答案
    ///
    /// `fill_optional` 为真时，非必填题目的 `Value::Default` 也会生成默认值
    pub fn fill_value(&mut self, value: Value, fill_optional: bool) -> Result<(), ElementErrorKind> {
        let value = self.resolve(value, fill_optional)?;
        self.assign(value)
    }

    /// 将 `Value::Default` 替换为具体的值
    pub fn resolve(&self, value: Value, fill_optional: bool) -> Result<Value, ElementErrorKind> {
        match value {
            Value::Default if self.required() || fill_optional => self.default_value(),
            Value::Default => Ok(Value::Empty),
            other => Ok(other),
        }
    }

    /// 生成一个能通过校验的答案
    pub fn default_value(&self) -> Result<Value, ElementErrorKind> {
        match &self.kind {
            ElementKind::Short(t) | ElementKind::Paragraph(t) | ElementKind::UserEmail(t) => t.sample(),
            ElementKind::Radio(c) | ElementKind::Dropdown(c) => c.sample(false),
            ElementKind::Checkboxes(c) => c.sample(true),
            ElementKind::Scale(s) => s.sample(),
            ElementKind::Grid(g) => g.sample(),
            ElementKind::Date(d) => d.sample(),
            ElementKind::Time(t) => t.sample(),
            _ => Err(ElementErrorKind::NotFillable),
        }
    }

    fn assign(&mut self, value: Value) -> Result<(), ElementErrorKind> {
        if value == Value::Unchanged {
            return Ok(());
        }
        match &mut self.kind {
            ElementKind::Short(t) | ElementKind::Paragraph(t) | ElementKind::UserEmail(t) => t.assign(value),
            ElementKind::Radio(c) | ElementKind::Dropdown(c) => c.assign(value, false),
            ElementKind::Checkboxes(c) => c.assign(value, true),
            ElementKind::Scale(s) => s.assign(value),
            ElementKind::Grid(g) => g.assign(value),
            ElementKind::Date(d) => d.assign(value),
            ElementKind::Time(t) => t.assign(value),
            _ if value == Value::Empty => Ok(()),
            _ => Err(ElementErrorKind::NotFillable),
        }
    }

    /// 清空答案
    pub fn clear(&mut self) {
        match &mut self.kind {
            ElementKind::Short(t) | ElementKind::Paragraph(t) | ElementKind::UserEmail(t) => t.value = None,
            ElementKind::Radio(c) | ElementKind::Dropdown(c) | ElementKind::Checkboxes(c) => {
                c.selected.clear();
                c.other_value = None;
            }
            ElementKind::Scale(s) => s.selected = None,
            ElementKind::Grid(g) => g.selected = vec![Vec::new(); g.rows.len()],
            ElementKind::Date(d) => {
                d.date = None;
                d.time = None;
            }
            ElementKind::Time(t) => t.seconds = None,
            _ => {}
        }
    }

    /// 校验当前答案
    pub fn validate(&self) -> Result<(), ElementErrorKind> {
        match &self.kind {
            ElementKind::Short(t) => t.validate(true),
            ElementKind::Paragraph(t) | ElementKind::UserEmail(t) => t.validate(false),
            ElementKind::Radio(c) | ElementKind::Dropdown(c) | ElementKind::Checkboxes(c) => c.validate(),
            ElementKind::Scale(s) => s.validate(),
            ElementKind::Grid(g) => g.validate(),
            ElementKind::Date(d) => d.validate(),
            ElementKind::Time(t) => t.validate(),
            ElementKind::FileUpload(f) if f.required => Err(ElementErrorKind::NotFillable),
            _ => Ok(()),
        }
    }

    /// 编码为提交字段
    pub fn encode(&self) -> FormFields {
        let mut fields = FormFields::new();
        match &self.kind {
            ElementKind::Short(t) | ElementKind::Paragraph(t) => t.encode(entry_key(t.entry_id), &mut fields),
            ElementKind::UserEmail(t) => t.encode(EMAIL_FIELD.to_string(), &mut fields),
            ElementKind::Radio(c) | ElementKind::Dropdown(c) | ElementKind::Checkboxes(c) => c.encode(&mut fields),
            ElementKind::Scale(s) => {
                if let Some(value) = &s.selected {
                    fields.push((entry_key(s.entry_id), value.clone()));
                }
            }
            ElementKind::Grid(g) => g.encode(&mut fields),
            ElementKind::Date(d) => d.encode(&mut fields),
            ElementKind::Time(t) => t.encode(&mut fields),
            _ => {}
        }
        fields
    }

    /// 使用预填链接或编辑链接中的数据设置答案（不做校验）
    pub fn prefill(&mut self, data: &Prefill) {
        match &mut self.kind {
            ElementKind::Short(t) | ElementKind::Paragraph(t) => t.prefill(data.get(&t.entry_id)),
            ElementKind::UserEmail(t) => t.prefill(data.get(&EMAIL_ENTRY_ID)),
            ElementKind::Radio(c) | ElementKind::Dropdown(c) | ElementKind::Checkboxes(c) => {
                c.prefill(data.get(&c.entry_id))
            }
            ElementKind::Scale(s) => s.prefill(data.get(&s.entry_id)),
            ElementKind::Grid(g) => g.prefill(data),
            ElementKind::Date(d) => d.prefill(data.get(&d.entry_id)),
            ElementKind::Time(t) => t.prefill(data.get(&t.entry_id)),
            _ => {}
        }
    }

    /// 当前答案选择的跳转目标（单选 / 下拉）
    pub fn selected_target(&self) -> Option<PageTarget> {
        match &self.kind {
            ElementKind::Radio(c) | ElementKind::Dropdown(c) => c.selected_target(),
            _ => None,
        }
    }

    fn hints(&self, include_answer: bool) -> Vec<String> {
        match &self.kind {
            ElementKind::Short(t) | ElementKind::Paragraph(t) | ElementKind::UserEmail(t) => t.hints(),
            ElementKind::Radio(c) | ElementKind::Dropdown(c) | ElementKind::Checkboxes(c) => c.hints(include_answer),
            ElementKind::Scale(s) => s.hints(),
            ElementKind::Grid(g) => g.hints(include_answer),
            ElementKind::Image(image) => vec![image.to_str()],
            ElementKind::Video { link } => vec![format!("https://youtu.be/{}", link)],
            _ => Vec::new(),
        }
    }

    fn answer(&self) -> Option<String> {
        match &self.kind {
            ElementKind::Short(t) | ElementKind::Paragraph(t) | ElementKind::UserEmail(t) => {
                Some(quoted_or_empty(t.value.clone()))
            }
            ElementKind::Scale(s) => Some(quoted_or_empty(s.selected.clone())),
            ElementKind::Date(d) => Some(d.answer()),
            ElementKind::Time(t) => Some(t.answer()),
            _ => None,
        }
    }

    /// 文本形式；`include_answer` 为真时标出当前答案
    pub fn to_str(&self, include_answer: bool) -> String {
        let mut text = self.type_name().to_string();
        if self.required() {
            text.push('*');
        }
        if let Some(name) = self.name.as_deref().filter(|s| !s.is_empty()) {
            text.push_str(&format!(": {}", name));
        }
        if let Some(description) = self.description.as_deref().filter(|s| !s.is_empty()) {
            text.push_str(&format!("\n{}", description));
        }

        let mut lines = self.hints(include_answer);
        if include_answer {
            lines.extend(self.answer());
        }
        if !lines.is_empty() {
            text.push('\n');
            text.push_str(&lines.join("\n"));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn radio(required: bool, with_other: bool) -> Element {
        let mut options = vec![ChoiceOption::new("A"), ChoiceOption::new("B")];
        if with_other {
            options.push(ChoiceOption::other());
        }
        Element::new(
            1,
            Some("Radio".to_string()),
            None,
            ElementKind::Radio(ChoiceInput::new(11, required, options)),
        )
    }

    fn checkboxes(validator: Option<CheckboxValidator>) -> Element {
        let mut input = ChoiceInput::new(
            22,
            true,
            vec![
                ChoiceOption::new("X"),
                ChoiceOption::new("Y"),
                ChoiceOption::new("Z"),
                ChoiceOption::other(),
            ],
        );
        input.validator = validator;
        Element::new(2, Some("Boxes".to_string()), None, ElementKind::Checkboxes(input))
    }

    fn grid(required: bool, columns: &[&str], validator: Option<GridValidator>) -> Element {
        let rows = vec![
            GridRow {
                entry_id: 31,
                name: "r1".to_string(),
            },
            GridRow {
                entry_id: 32,
                name: "r2".to_string(),
            },
        ];
        let columns = columns.iter().map(|c| ChoiceOption::new(*c)).collect();
        let mut input = GridInput::new(rows, columns, required, false);
        input.validator = validator;
        Element::new(3, Some("Grid".to_string()), None, ElementKind::Grid(input))
    }

    #[test]
    fn test_required_text() {
        let mut element = Element::new(
            4,
            None,
            None,
            ElementKind::Short(TextInput::new(44, true, None)),
        );
        assert_eq!(element.validate(), Err(ElementErrorKind::Required));

        element.set_value(Value::text("")).unwrap();
        assert_eq!(element.validate(), Err(ElementErrorKind::Required));

        element.set_value(Value::text("hello")).unwrap();
        assert!(element.validate().is_ok());
        assert_eq!(element.encode(), fields(&[("entry.44", "hello")]));
    }

    #[test]
    fn test_short_rejects_newlines() {
        let mut element = Element::new(
            4,
            None,
            None,
            ElementKind::Short(TextInput::new(44, false, None)),
        );
        element.set_value(Value::text("a\nb")).unwrap();
        assert!(matches!(
            element.validate(),
            Err(ElementErrorKind::InvalidText { .. })
        ));
    }

    #[test]
    fn test_invalid_choice_keeps_previous_answer() {
        let mut element = radio(true, false);
        element.set_value(Value::choice("A")).unwrap();
        assert_eq!(
            element.set_value(Value::choice("C")),
            Err(ElementErrorKind::InvalidChoice {
                value: "C".to_string()
            })
        );
        assert_eq!(element.encode(), fields(&[("entry.11", "A")]));
    }

    #[test]
    fn test_radio_rejects_multiple_values() {
        let mut element = radio(false, false);
        assert_eq!(
            element.set_value(Value::choices(["A", "B"])),
            Err(ElementErrorKind::MultipleValues)
        );
        assert!(element.set_value(Value::choices(["B"])).is_ok());
    }

    #[test]
    fn test_other_option() {
        let mut element = radio(true, true);
        element.set_value(Value::text("Something")).unwrap();
        assert!(element.validate().is_ok());
        assert_eq!(
            element.encode(),
            fields(&[
                ("entry.11", "__other_option__"),
                ("entry.11.other_option_response", "Something"),
            ])
        );

        element.set_value(Value::text("")).unwrap();
        assert_eq!(element.validate(), Err(ElementErrorKind::EmptyOther));
    }

    #[test]
    fn test_duplicate_other() {
        let mut element = checkboxes(None);
        assert_eq!(
            element.set_value(Value::choices(["X", "foo", "bar"])),
            Err(ElementErrorKind::DuplicateOther {
                first: "foo".to_string(),
                second: "bar".to_string()
            })
        );
    }

    #[test]
    fn test_checkbox_count() {
        let mut element = checkboxes(Some(CheckboxValidator::AtLeast(2)));
        element.set_value(Value::choices(["X"])).unwrap();
        assert!(matches!(
            element.validate(),
            Err(ElementErrorKind::ChoiceCount { .. })
        ));
        element.set_value(Value::choices(["X", "custom"])).unwrap();
        assert!(element.validate().is_ok());
    }

    #[test]
    fn test_scale() {
        let options = (1..=5).map(|i| ChoiceOption::new(i.to_string())).collect();
        let mut element = Element::new(
            5,
            None,
            None,
            ElementKind::Scale(ScaleInput::new(55, true, options, Some("bad".into()), None)),
        );
        element.set_value(Value::Scale(3)).unwrap();
        assert_eq!(element.encode(), fields(&[("entry.55", "3")]));
        assert!(element.set_value(Value::Scale(6)).is_err());
        assert_eq!(
            element.set_value(Value::text("x")),
            Err(ElementErrorKind::InvalidChoice {
                value: "x".to_string()
            })
        );
    }

    #[test]
    fn test_grid_rows() {
        let mut element = grid(true, &["c1", "c2"], None);
        assert_eq!(
            element.set_value(Value::grid(vec![vec!["c1"]])),
            Err(ElementErrorKind::RowCountMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            element.set_value(Value::grid(vec![vec!["c1", "c2"], vec![]])),
            Err(ElementErrorKind::MultipleRowValues {
                row: "r1".to_string()
            })
        );

        element
            .set_value(Value::grid(vec![vec!["c2"], vec![]]))
            .unwrap();
        assert_eq!(
            element.validate(),
            Err(ElementErrorKind::RequiredRow {
                row: "r2".to_string()
            })
        );

        element
            .set_value(Value::grid(vec![vec!["c2"], vec!["c1"]]))
            .unwrap();
        assert!(element.validate().is_ok());
        assert_eq!(
            element.encode(),
            fields(&[("entry.31", "c2"), ("entry.32", "c1")])
        );
    }

    #[test]
    fn test_misconfigured_grid() {
        let element = grid(true, &["only"], Some(GridValidator::ExclusiveColumns));
        assert_eq!(element.validate(), Err(ElementErrorKind::MisconfiguredGrid));
        assert_eq!(
            element.default_value(),
            Err(ElementErrorKind::MisconfiguredGrid)
        );
    }

    #[test]
    fn test_date_time_encoding() {
        let mut element = Element::new(
            6,
            None,
            None,
            ElementKind::Date(DateInput::new(66, true, true, true)),
        );
        let datetime = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        assert!(element.set_value(Value::Date(datetime.date())).is_err());
        element.set_value(Value::DateTime(datetime)).unwrap();
        assert_eq!(
            element.encode(),
            fields(&[
                ("entry.66_year", "2024"),
                ("entry.66_month", "3"),
                ("entry.66_day", "9"),
                ("entry.66_hour", "14"),
                ("entry.66_minute", "5"),
            ])
        );
    }

    #[test]
    fn test_time_prefill_bounds() {
        let prefill = |duration: bool, value: &str| {
            let mut input = TimeInput::new(77, false, duration);
            input.prefill(Some(&vec![value.to_string()]));
            input.seconds
        };

        assert_eq!(prefill(true, "1:02:03"), Some(3723));
        assert_eq!(prefill(true, "72:59:59"), Some(MAX_DURATION_SECS - 1));
        assert_eq!(prefill(true, "73:00:00"), None);
        assert_eq!(prefill(true, "-1:00:00"), None);
        assert_eq!(prefill(true, "9223372036854775807:0:0"), None);

        assert_eq!(prefill(false, "14:05"), Some(14 * 3600 + 5 * 60));
        assert_eq!(prefill(false, "25:00"), None);
        assert_eq!(prefill(false, "9223372036854775807:0"), None);
        assert_eq!(checked_seconds(i64::MAX, 0, 0), None);
    }

    #[test]
    fn test_duration() {
        let mut element = Element::new(
            7,
            None,
            None,
            ElementKind::Time(TimeInput::new(77, false, true)),
        );
        assert_eq!(
            element.set_value(Value::Duration(Duration::hours(73))),
            Err(ElementErrorKind::InvalidDuration {
                seconds: 73 * 3600
            })
        );
        element
            .set_value(Value::Duration(Duration::seconds(3723)))
            .unwrap();
        assert_eq!(
            element.encode(),
            fields(&[
                ("entry.77_hour", "1"),
                ("entry.77_minute", "2"),
                ("entry.77_second", "3"),
            ])
        );
        assert!(element.to_str(true).ends_with("> \"01:02:03\""));
    }

    #[test]
    fn test_default_values_pass_validation() {
        let min_length = TextValidator::new(TextRule::MinLength(4));
        let mut elements = vec![
            radio(true, true),
            checkboxes(Some(CheckboxValidator::Exactly(2))),
            grid(true, &["c1", "c2", "c3"], Some(GridValidator::ExclusiveColumns)),
            Element::new(
                8,
                None,
                None,
                ElementKind::Paragraph(TextInput::new(88, true, Some(min_length))),
            ),
            Element::new(
                9,
                None,
                None,
                ElementKind::Date(DateInput::new(99, true, false, false)),
            ),
            Element::new(
                10,
                None,
                None,
                ElementKind::Time(TimeInput::new(100, true, false)),
            ),
            Element::user_email(),
        ];
        for element in &mut elements {
            element.set_value(Value::Default).unwrap();
            assert!(element.validate().is_ok(), "{}", element.to_str(true));
        }
    }

    #[test]
    fn test_default_on_optional_is_empty() {
        let mut element = radio(false, false);
        element.set_value(Value::choice("B")).unwrap();
        element.set_value(Value::Default).unwrap();
        assert!(element.is_empty());

        element.fill_value(Value::Default, true).unwrap();
        assert_eq!(element.encode(), fields(&[("entry.11", "A")]));
    }

    #[test]
    fn test_unsatisfiable_default() {
        let pattern = TextValidator::full_match("[A-Z]{5}").unwrap();
        let element = Element::new(
            8,
            None,
            None,
            ElementKind::Short(TextInput::new(
                88,
                true,
                Some(TextValidator::new(TextRule::RegexMatches(pattern))),
            )),
        );
        assert_eq!(
            element.default_value(),
            Err(ElementErrorKind::NoDefaultValue)
        );
    }

    #[test]
    fn test_prefill() {
        let mut data = Prefill::new();
        data.insert(11, vec!["B".to_string()]);
        data.insert(EMAIL_ENTRY_ID, vec!["me@example.com".to_string()]);

        let mut element = radio(true, false);
        element.prefill(&data);
        assert_eq!(element.encode(), fields(&[("entry.11", "B")]));

        let mut email = Element::user_email();
        email.prefill(&data);
        assert_eq!(
            email.encode(),
            fields(&[("emailAddress", "me@example.com")])
        );
    }

    #[test]
    fn test_render() {
        let mut element = radio(true, true);
        element.set_value(Value::text("B")).unwrap();
        assert_eq!(element.to_str(true), "单选*: Radio\n· A\n> B\n· 其他");
        assert_eq!(element.to_str(false), "单选*: Radio\n· A\n· B\n· 其他");
    }
}
