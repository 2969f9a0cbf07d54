//! `FB_PUBLIC_LOAD_DATA_` 结构适配
//!
//! 内嵌数据是一组没有字段名的嵌套数组，所有下标只在本文件中出现。
//! 缺失的尾部元素按 null 处理。

use std::collections::HashMap;

use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::ParseError;
use crate::models::element::{
    ChoiceInput, DateInput, Element, ElementKind, FileUploadInput, GridInput, GridRow, Prefill,
    ScaleInput, TextInput, TimeInput, EMAIL_ENTRY_ID,
};
use crate::models::media::{Alignment, ImageObject};
use crate::models::option::ChoiceOption;
use crate::models::page::{action, Page, PageTarget};
use crate::models::settings::{CollectEmails, SendReceipt, Settings};
use crate::models::validators::{CheckboxValidator, GridValidator, TextRule, TextValidator};

mod doc {
    pub const FORM: usize = 1;
    pub const NAME: usize = 3;
    pub const SIGNIN_REQUIRED: usize = 18;
}

mod form {
    pub const DESCRIPTION: usize = 0;
    pub const ELEMENTS: usize = 1;
    pub const FIRST_BLOCK: usize = 2;
    pub const TITLE: usize = 8;
    pub const SECOND_BLOCK: usize = 10;
    pub const QUIZ_BLOCK: usize = 16;
}

mod settings {
    // 第一组
    pub const CONFIRMATION_MSG: usize = 0;
    pub const SHOW_RESUBMIT_LINK: usize = 1;
    pub const SHOW_SUMMARY: usize = 2;
    pub const EDIT_RESPONSES: usize = 3;
    // 第二组
    pub const SHOW_PROGRESSBAR: usize = 0;
    pub const SUBMIT_ONCE: usize = 1;
    pub const SHUFFLE_QUESTIONS: usize = 2;
    pub const RECEIPT: usize = 3;
    pub const DISABLE_AUTOSAVE: usize = 5;
    pub const COLLECT_EMAILS: usize = 6;
    // 测验
    pub const GRADES_SETTINGS: usize = 0;
    pub const IMMEDIATE_GRADES: usize = 1;
    pub const IS_QUIZ: usize = 2;
    pub const SHOW_MISSED: usize = 2;
    pub const SHOW_CORRECT: usize = 3;
    pub const SHOW_POINTS: usize = 4;
}

mod element {
    pub const ID: usize = 0;
    pub const NAME: usize = 1;
    pub const DESCRIPTION: usize = 2;
    pub const TYPE: usize = 3;
    pub const ENTRIES: usize = 4;
    pub const PAGE_ACTION: usize = 5;
    pub const MEDIA: usize = 6;
    pub const VIDEO_LINK: usize = 3;
    pub const GRID_VALIDATOR: usize = 8;
}

/// 图片 `[id, _, [width, height, alignment]]`
mod image {
    pub const ID: usize = 0;
    pub const STYLE: usize = 2;
    pub const WIDTH: usize = 0;
    pub const HEIGHT: usize = 1;
    pub const ALIGNMENT: usize = 2;
}

mod entry {
    pub const ID: usize = 0;
    pub const OPTIONS: usize = 1;
    pub const REQUIRED: usize = 2;
    /// 网格行名 `[name]` 或量表标签 `[low, high]`
    pub const LABELS: usize = 3;
    pub const VALIDATOR: usize = 4;
    pub const TIME_FLAGS: usize = 6;
    pub const DATE_FLAGS: usize = 7;
    pub const GRID_FLAGS: usize = 11;
}

mod option {
    pub const VALUE: usize = 0;
    pub const ACTION: usize = 2;
    pub const OTHER: usize = 4;
}

mod draft {
    pub const ENTRIES: usize = 0;
    pub const ENTRY_ID: usize = 1;
    pub const ENTRY_VALUES: usize = 2;
    pub const EMAIL: usize = 6;
}

/// 题目类型编码
mod kind {
    pub const SHORT: i64 = 0;
    pub const PARAGRAPH: i64 = 1;
    pub const RADIO: i64 = 2;
    pub const DROPDOWN: i64 = 3;
    pub const CHECKBOXES: i64 = 4;
    pub const SCALE: i64 = 5;
    pub const COMMENT: i64 = 6;
    pub const GRID: i64 = 7;
    pub const PAGE: i64 = 8;
    pub const DATE: i64 = 9;
    pub const TIME: i64 = 10;
    pub const IMAGE: i64 = 11;
    pub const VIDEO: i64 = 12;
    pub const FILE_UPLOAD: i64 = 13;
}

/// 校验规则编码 `[type, subtype, args, message]`
mod rule {
    pub const NUMBER: i64 = 1;
    pub const TEXT: i64 = 2;
    pub const REGEX: i64 = 4;
    pub const LENGTH: i64 = 6;
    pub const CHECKBOX: i64 = 7;
}

// ========== 取值辅助 ==========

/// 取数组元素，null 和越界都视为缺失
fn at(value: &JsonValue, index: usize) -> Option<&JsonValue> {
    value.as_array()?.get(index).filter(|v| !v.is_null())
}

fn array_at<'a>(value: &'a JsonValue, index: usize, path: &str) -> Result<&'a [JsonValue], ParseError> {
    at(value, index)
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| ParseError::shape(format!("{}[{}]", path, index), "array"))
}

fn i64_at(value: &JsonValue, index: usize, path: &str) -> Result<i64, ParseError> {
    at(value, index)
        .and_then(as_i64)
        .ok_or_else(|| ParseError::shape(format!("{}[{}]", path, index), "integer"))
}

fn as_i64(value: &JsonValue) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn opt_i64(value: &JsonValue, index: usize) -> Option<i64> {
    at(value, index).and_then(as_i64)
}

fn opt_str(value: &JsonValue, index: usize) -> Option<String> {
    at(value, index)
        .and_then(JsonValue::as_str)
        .map(str::to_string)
}

/// 布尔值可能是 true/false 或 0/1
fn flag(value: &JsonValue, index: usize) -> Option<bool> {
    let v = at(value, index)?;
    v.as_bool().or_else(|| v.as_i64().map(|n| n != 0))
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|s| !s.is_empty())
}

// ========== 表单 ==========

/// 解析后的表单结构
#[derive(Debug, Clone)]
pub struct FormData {
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub settings: Settings,
    pub pages: Vec<Page>,
    pub signin_required: bool,
}

/// 解析内嵌数据
pub fn parse_form_data(data: &JsonValue) -> Result<FormData, ParseError> {
    let form = at(data, doc::FORM)
        .filter(|f| f.is_array())
        .ok_or_else(|| ParseError::shape("data[1]", "array"))?;

    let name = non_empty(opt_str(data, doc::NAME));
    let title = non_empty(opt_str(form, form::TITLE)).or_else(|| name.clone());
    let description = non_empty(opt_str(form, form::DESCRIPTION));
    let settings = parse_settings(form);
    let signin_required = flag(data, doc::SIGNIN_REQUIRED).unwrap_or(false);

    let elements = match at(form, form::ELEMENTS) {
        Some(elements) => elements
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| ParseError::shape("form[1]", "array"))?,
        None => &[],
    };
    let mut pages = parse_pages(elements)?;

    if settings.collect_emails.is_enabled() {
        if let Some(first) = pages.first_mut() {
            first.elements.insert(0, Element::user_email());
        }
    }

    Ok(FormData {
        name,
        title,
        description,
        settings,
        pages,
        signin_required,
    })
}

/// 解析设置，任何一组都可能缺失
pub fn parse_settings(form: &JsonValue) -> Settings {
    let mut result = Settings::default();

    if let Some(first) = at(form, form::FIRST_BLOCK) {
        result.confirmation_msg = non_empty(opt_str(first, settings::CONFIRMATION_MSG));
        result.set_show_resubmit_link(flag(first, settings::SHOW_RESUBMIT_LINK).unwrap_or(false));
        result.show_summary = flag(first, settings::SHOW_SUMMARY).unwrap_or(false);
        result.edit_responses = flag(first, settings::EDIT_RESPONSES).unwrap_or(false);
    }

    if let Some(second) = at(form, form::SECOND_BLOCK) {
        result.show_progressbar = flag(second, settings::SHOW_PROGRESSBAR).unwrap_or(false);
        result.submit_once = flag(second, settings::SUBMIT_ONCE).unwrap_or(false);
        result.shuffle_questions = flag(second, settings::SHUFFLE_QUESTIONS).unwrap_or(false);
        result.send_receipt = SendReceipt::from_code(opt_i64(second, settings::RECEIPT));
        result.disable_autosave = flag(second, settings::DISABLE_AUTOSAVE).unwrap_or(false);
        result.collect_emails = CollectEmails::from_code(opt_i64(second, settings::COLLECT_EMAILS));
    }

    if let Some(quiz) = at(form, form::QUIZ_BLOCK) {
        result.is_quiz = flag(quiz, settings::IS_QUIZ).unwrap_or(false);
        if result.is_quiz {
            result.immediate_grades = flag(quiz, settings::IMMEDIATE_GRADES).unwrap_or(false);
            if let Some(grades) = at(quiz, settings::GRADES_SETTINGS) {
                result.show_missed = flag(grades, settings::SHOW_MISSED).unwrap_or(false);
                result.show_correct_answers = flag(grades, settings::SHOW_CORRECT).unwrap_or(false);
                result.show_points = flag(grades, settings::SHOW_POINTS).unwrap_or(false);
            }
        }
    }

    result
}

// ========== 页面与跳转 ==========

/// 页面的跳转信息（第一遍扫描）
struct PageInfo {
    id: i64,
    /// 到达本页之前那一页的默认跳转
    prev_action: i64,
}

/// 页面 ID → 页面索引
struct PageMap {
    index_by_id: HashMap<i64, usize>,
    count: usize,
}

impl PageMap {
    fn new(pages: &[PageInfo]) -> Self {
        Self {
            index_by_id: pages.iter().enumerate().map(|(i, p)| (p.id, i)).collect(),
            count: pages.len(),
        }
    }

    /// 将跳转编码解析为目标（`current` 为编码所在页面）
    ///
    /// 最后一页上的选项跳转会被 Google 忽略，返回 None
    fn resolve(&self, code: i64, current: usize) -> Result<Option<PageTarget>, ParseError> {
        if current + 1 >= self.count {
            return Ok(None);
        }
        let target = match code {
            action::NEXT => PageTarget::Page(current + 1),
            action::SUBMIT => PageTarget::Submit,
            id => match self.index_by_id.get(&id) {
                Some(&index) => PageTarget::Page(index),
                None => return Err(ParseError::shape(format!("跳转目标 {}", id), "page id")),
            },
        };
        Ok(Some(target))
    }
}

fn element_type(elem: &JsonValue, path: &str) -> Result<i64, ParseError> {
    i64_at(elem, element::TYPE, path)
}

/// 两遍解析：先找出所有页面以建立跳转映射，再解析题目
fn parse_pages(elements: &[JsonValue]) -> Result<Vec<Page>, ParseError> {
    let mut infos = vec![PageInfo {
        id: action::FIRST,
        prev_action: action::NEXT,
    }];
    for (i, elem) in elements.iter().enumerate() {
        let path = format!("elements[{}]", i);
        if element_type(elem, &path)? == kind::PAGE {
            infos.push(PageInfo {
                id: i64_at(elem, element::ID, &path)?,
                prev_action: opt_i64(elem, element::PAGE_ACTION).unwrap_or(action::NEXT),
            });
        }
    }
    let map = PageMap::new(&infos);

    let mut pages = vec![Page::new(0, action::FIRST)];
    for (i, elem) in elements.iter().enumerate() {
        let path = format!("elements[{}]", i);
        if element_type(elem, &path)? == kind::PAGE {
            let mut page = Page::new(pages.len(), i64_at(elem, element::ID, &path)?);
            page.name = non_empty(opt_str(elem, element::NAME));
            page.description = non_empty(opt_str(elem, element::DESCRIPTION));
            pages.push(page);
            continue;
        }
        let current = pages.len() - 1;
        let parsed = parse_element(elem, &path, &map, current)?;
        if let Some(page) = pages.last_mut() {
            page.elements.push(parsed);
        }
    }

    // 本页的默认跳转由下一页记录
    for (index, page) in pages.iter_mut().enumerate() {
        let Some(next) = infos.get(index + 1) else {
            page.default_target = PageTarget::Submit;
            page.explicit_target = false;
            continue;
        };
        match next.prev_action {
            action::NEXT => {
                page.default_target = PageTarget::Page(index + 1);
                page.explicit_target = false;
            }
            code => {
                page.default_target = map.resolve(code, index)?.unwrap_or(PageTarget::Submit);
                page.explicit_target = true;
            }
        }
    }

    debug!("解析完成: {} 页", pages.len());
    Ok(pages)
}

// ========== 题目 ==========

fn first_entry<'a>(elem: &'a JsonValue, path: &str) -> Result<&'a JsonValue, ParseError> {
    array_at(elem, element::ENTRIES, path)?
        .first()
        .ok_or_else(|| ParseError::shape(format!("{}[4][0]", path), "entry"))
}

fn required(entry: &JsonValue) -> bool {
    flag(entry, entry::REQUIRED).unwrap_or(false)
}

fn parse_element(
    elem: &JsonValue,
    path: &str,
    pages: &PageMap,
    current: usize,
) -> Result<Element, ParseError> {
    let id = i64_at(elem, element::ID, path)?;
    let name = non_empty(opt_str(elem, element::NAME));
    let description = non_empty(opt_str(elem, element::DESCRIPTION));

    let kind = match element_type(elem, path)? {
        code @ (kind::SHORT | kind::PARAGRAPH) => {
            let entry = first_entry(elem, path)?;
            let validator = at(entry, entry::VALIDATOR)
                .and_then(|v| at(v, 0))
                .and_then(parse_text_validator);
            let input = TextInput::new(i64_at(entry, entry::ID, path)?, required(entry), validator);
            if code == kind::SHORT {
                ElementKind::Short(input)
            } else {
                ElementKind::Paragraph(input)
            }
        }
        code @ (kind::RADIO | kind::DROPDOWN | kind::CHECKBOXES) => {
            let entry = first_entry(elem, path)?;
            // 只有单选和下拉列表支持按选项跳转
            let actions = code != kind::CHECKBOXES;
            let options = parse_options(entry, path, actions.then_some((pages, current)))?;
            let mut input = ChoiceInput::new(i64_at(entry, entry::ID, path)?, required(entry), options);
            match code {
                kind::RADIO => ElementKind::Radio(input),
                kind::DROPDOWN => ElementKind::Dropdown(input),
                _ => {
                    input.validator = at(entry, entry::VALIDATOR)
                        .and_then(|v| at(v, 0))
                        .and_then(parse_checkbox_validator);
                    ElementKind::Checkboxes(input)
                }
            }
        }
        kind::SCALE => {
            let entry = first_entry(elem, path)?;
            let options = parse_options(entry, path, None)?;
            let labels = at(entry, entry::LABELS);
            ElementKind::Scale(ScaleInput::new(
                i64_at(entry, entry::ID, path)?,
                required(entry),
                options,
                labels.and_then(|l| opt_str(l, 0)),
                labels.and_then(|l| opt_str(l, 1)),
            ))
        }
        kind::GRID => {
            let entries = array_at(elem, element::ENTRIES, path)?;
            let first = first_entry(elem, path)?;
            let rows = entries
                .iter()
                .map(|e| {
                    Ok(GridRow {
                        entry_id: i64_at(e, entry::ID, path)?,
                        name: at(e, entry::LABELS)
                            .and_then(|l| opt_str(l, 0))
                            .unwrap_or_default(),
                    })
                })
                .collect::<Result<Vec<_>, ParseError>>()?;
            let columns = parse_options(first, path, None)?;
            let multichoice = at(first, entry::GRID_FLAGS)
                .and_then(|f| flag(f, 0))
                .unwrap_or(false);
            let mut input = GridInput::new(rows, columns, required(first), multichoice);
            input.validator = at(elem, element::GRID_VALIDATOR).map(parse_grid_validator);
            ElementKind::Grid(input)
        }
        kind::DATE => {
            let entry = first_entry(elem, path)?;
            let flags = at(entry, entry::DATE_FLAGS);
            ElementKind::Date(DateInput::new(
                i64_at(entry, entry::ID, path)?,
                required(entry),
                flags.and_then(|f| flag(f, 1)).unwrap_or(false),
                flags.and_then(|f| flag(f, 0)).unwrap_or(false),
            ))
        }
        kind::TIME => {
            let entry = first_entry(elem, path)?;
            let duration = at(entry, entry::TIME_FLAGS)
                .and_then(|f| flag(f, 0))
                .unwrap_or(false);
            ElementKind::Time(TimeInput::new(
                i64_at(entry, entry::ID, path)?,
                required(entry),
                duration,
            ))
        }
        kind::FILE_UPLOAD => {
            let entry = first_entry(elem, path)?;
            ElementKind::FileUpload(FileUploadInput {
                entry_id: i64_at(entry, entry::ID, path)?,
                required: required(entry),
            })
        }
        kind::COMMENT => ElementKind::Comment,
        kind::IMAGE => ElementKind::Image(
            at(elem, element::MEDIA).map(parse_image).unwrap_or_default(),
        ),
        kind::VIDEO => ElementKind::Video {
            link: at(elem, element::MEDIA)
                .and_then(|m| opt_str(m, element::VIDEO_LINK))
                .unwrap_or_default(),
        },
        code => return Err(ParseError::UnknownElementType { code }),
    };

    Ok(Element::new(id, name, description, kind))
}

/// 解析图片信息，地址稍后从页面 HTML 中补上
pub fn parse_image(raw: &JsonValue) -> ImageObject {
    let style = at(raw, image::STYLE);
    ImageObject {
        id: opt_str(raw, image::ID),
        width: style.and_then(|s| opt_i64(s, image::WIDTH)),
        height: style.and_then(|s| opt_i64(s, image::HEIGHT)),
        alignment: Alignment::from_code(style.and_then(|s| opt_i64(s, image::ALIGNMENT))),
        url: None,
    }
}

/// 解析选项 `[value, _, action, _, other]`
fn parse_options(
    entry: &JsonValue,
    path: &str,
    actions: Option<(&PageMap, usize)>,
) -> Result<Vec<ChoiceOption>, ParseError> {
    let Some(raw) = at(entry, entry::OPTIONS) else {
        return Ok(Vec::new());
    };
    let raw = raw
        .as_array()
        .ok_or_else(|| ParseError::shape(format!("{}[4][0][1]", path), "array"))?;

    let mut options = Vec::with_capacity(raw.len());
    for opt in raw {
        let mut option = if flag(opt, option::OTHER).unwrap_or(false) {
            ChoiceOption::other()
        } else {
            ChoiceOption::new(opt_str(opt, option::VALUE).unwrap_or_default())
        };
        if let (Some((pages, current)), Some(code)) = (actions, opt_i64(opt, option::ACTION)) {
            option.target = pages.resolve(code, current)?;
        }
        options.push(option);
    }
    Ok(options)
}

// ========== 校验规则 ==========

fn number_arg(args: Option<&JsonValue>, index: usize) -> Option<f64> {
    let v = at(args?, index)?;
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn string_arg(args: Option<&JsonValue>, index: usize) -> Option<String> {
    let v = at(args?, index)?;
    v.as_str()
        .map(str::to_string)
        .or_else(|| v.as_i64().map(|n| n.to_string()))
}

/// 解析文本题校验规则，无法识别时记录警告并忽略
pub fn parse_text_validator(raw: &JsonValue) -> Option<TextValidator> {
    let kind = opt_i64(raw, 0)?;
    let subtype = opt_i64(raw, 1).unwrap_or(0);
    let args = at(raw, 2);
    let num = |i| number_arg(args, i);
    let text = |i| string_arg(args, i);

    let rule = match (kind, subtype) {
        (rule::NUMBER, 1) => num(0).map(TextRule::GreaterThan),
        (rule::NUMBER, 2) => num(0).map(TextRule::GreaterOrEqual),
        (rule::NUMBER, 3) => num(0).map(TextRule::LessThan),
        (rule::NUMBER, 4) => num(0).map(TextRule::LessOrEqual),
        (rule::NUMBER, 5) => num(0).map(TextRule::Equal),
        (rule::NUMBER, 6) => num(0).map(TextRule::NotEqual),
        (rule::NUMBER, 7) => num(0).zip(num(1)).map(|(a, b)| TextRule::Between(a, b)),
        (rule::NUMBER, 8) => num(0).zip(num(1)).map(|(a, b)| TextRule::NotBetween(a, b)),
        (rule::NUMBER, 9) => Some(TextRule::IsNumber),
        (rule::NUMBER, 10) => Some(TextRule::Integer),
        (rule::TEXT, 100) => text(0).map(TextRule::Contains),
        (rule::TEXT, 101) => text(0).map(TextRule::NotContains),
        (rule::TEXT, 102) => Some(TextRule::Email),
        (rule::TEXT, 103) => Some(TextRule::Url),
        (rule::LENGTH, 202) => num(0).map(|n| TextRule::MaxLength(n as usize)),
        (rule::LENGTH, 203) => num(0).map(|n| TextRule::MinLength(n as usize)),
        (rule::REGEX, 299..=302) => text(0).and_then(|pattern| {
            let compiled = if matches!(subtype, 301 | 302) {
                TextValidator::full_match(&pattern)
            } else {
                regex::Regex::new(&pattern)
            };
            match compiled {
                Ok(re) => Some(match subtype {
                    299 => TextRule::RegexContains(re),
                    300 => TextRule::RegexNotContains(re),
                    301 => TextRule::RegexMatches(re),
                    _ => TextRule::RegexNotMatches(re),
                }),
                Err(e) => {
                    warn!("⚠️ 无法编译正则表达式 /{}/: {}", pattern, e);
                    None
                }
            }
        }),
        _ => {
            warn!("⚠️ 未知的文本校验规则: {}", raw);
            None
        }
    }?;

    Some(TextValidator {
        rule,
        message: non_empty(opt_str(raw, 3)),
    })
}

/// 解析复选框校验规则 `[7, subtype, [n]]`
pub fn parse_checkbox_validator(raw: &JsonValue) -> Option<CheckboxValidator> {
    let count = number_arg(at(raw, 2), 0).map(|n| n as usize);
    match (opt_i64(raw, 0), opt_i64(raw, 1), count) {
        (Some(rule::CHECKBOX), Some(200), Some(n)) => Some(CheckboxValidator::AtLeast(n)),
        (Some(rule::CHECKBOX), Some(201), Some(n)) => Some(CheckboxValidator::AtMost(n)),
        (Some(rule::CHECKBOX), Some(204), Some(n)) => Some(CheckboxValidator::Exactly(n)),
        _ => {
            warn!("⚠️ 未知的复选框校验规则: {}", raw);
            None
        }
    }
}

/// 解析网格校验规则，只识别 `[[8, 205]]`
pub fn parse_grid_validator(raw: &JsonValue) -> GridValidator {
    if *raw == serde_json::json!([[8, 205]]) {
        GridValidator::ExclusiveColumns
    } else {
        warn!("⚠️ 未知的网格校验规则: {}", raw);
        GridValidator::Unknown
    }
}

// ========== 预填与翻页 ==========

/// 从编辑链接的草稿 (`partialResponse`) 中读取已有答案
pub fn parse_draft(draft: &str) -> Result<Prefill, ParseError> {
    let data: JsonValue = serde_json::from_str(draft)?;
    let mut prefill = Prefill::new();

    if let Some(entries) = at(&data, draft::ENTRIES).and_then(JsonValue::as_array) {
        for item in entries {
            let Some(entry_id) = opt_i64(item, draft::ENTRY_ID) else {
                continue;
            };
            let values = at(item, draft::ENTRY_VALUES)
                .and_then(JsonValue::as_array)
                .map(|values| {
                    values
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            prefill.insert(entry_id, values);
        }
    }
    if let Some(email) = opt_str(&data, draft::EMAIL) {
        prefill.insert(EMAIL_ENTRY_ID, vec![email]);
    }
    Ok(prefill)
}

/// `pageHistory` 中最后一个页面索引
pub fn last_history_index(history: &str) -> Option<usize> {
    history.rsplit(',').next()?.trim().parse().ok()
}
