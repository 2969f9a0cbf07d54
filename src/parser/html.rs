//! 页面 HTML 提取
//!
//! 从表单页面中取出内嵌数据 `FB_PUBLIC_LOAD_DATA_`、隐藏字段和标题，
//! 从确认页中取出链接

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::ParseError;

/// 提交令牌
pub const FBZX: &str = "fbzx";
/// 已访问的页面列表
pub const PAGE_HISTORY: &str = "pageHistory";
/// 之前页面答案的草稿
pub const PARTIAL_RESPONSE: &str = "partialResponse";

static DATA_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?s)FB_PUBLIC_LOAD_DATA_\s*=\s*(\[.+\])\s*;"));

/// 表单页面的原始内容
#[derive(Debug, Clone)]
pub struct RawFormPage {
    pub data: JsonValue,
    pub fbzx: String,
    pub history: String,
    pub draft: String,
    /// 图片题 ID → 页面上的图片地址
    pub images: HashMap<i64, String>,
}

/// 隐藏字段中的翻页状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTokens {
    pub history: Option<String>,
    pub draft: Option<String>,
}

fn select<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(e) => {
            debug!("选择器无效 {}: {}", css, e);
            Vec::new()
        }
    }
}

fn input_value(document: &Html, name: &str) -> Option<String> {
    select(document, &format!("input[name=\"{}\"]", name))
        .into_iter()
        .find_map(|input| input.value().attr("value").map(str::to_string))
}

/// 在 `<script>` 中查找内嵌数据
fn embedded_data(document: &Html) -> Result<Option<JsonValue>, ParseError> {
    let pattern = DATA_REGEX.as_ref().map_err(Clone::clone)?;
    for script in select(document, "script") {
        let text: String = script.text().collect();
        if let Some(captures) = pattern.captures(&text) {
            let data = serde_json::from_str(&captures[1])?;
            return Ok(Some(data));
        }
    }
    Ok(None)
}

/// 图片题的图片地址
///
/// 从 `<img>` 向上找到最近的题目块：带 `data-item-id` 的是图片题，
/// 带 `data-params` 的是其他题目或选项的附图，忽略
fn image_urls(document: &Html) -> HashMap<i64, String> {
    let mut urls = HashMap::new();
    for img in select(document, "form img[src]") {
        let Some(src) = img.value().attr("src") else {
            continue;
        };
        let item_id = img
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|parent| {
                let parent = parent.value();
                parent.attr("data-item-id").is_some() || parent.attr("data-params").is_some()
            })
            .and_then(|parent| parent.value().attr("data-item-id"))
            .and_then(|id| id.parse::<i64>().ok());
        match item_id {
            Some(id) => {
                urls.entry(id).or_insert_with(|| src.to_string());
            }
            None => debug!("找不到图片所属的题目: {}", src),
        }
    }
    urls
}

/// 解析表单页面
pub fn parse_form_page(body: &str) -> Result<RawFormPage, ParseError> {
    let document = Html::parse_document(body);
    let data = embedded_data(&document)?.ok_or(ParseError::MissingData)?;
    let input = |name: &'static str| {
        input_value(&document, name).ok_or(ParseError::MissingInput { name })
    };

    Ok(RawFormPage {
        data,
        fbzx: input(FBZX)?,
        history: input(PAGE_HISTORY)?,
        draft: input(PARTIAL_RESPONSE)?,
        images: image_urls(&document),
    })
}

/// 解析提交响应中的翻页状态
pub fn parse_page_tokens(body: &str) -> PageTokens {
    let document = Html::parse_document(body);
    PageTokens {
        history: input_value(&document, PAGE_HISTORY),
        draft: input_value(&document, PARTIAL_RESPONSE),
    }
}

/// 页面标题
pub fn page_title(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    select(&document, "title")
        .first()
        .map(|title| title.text().collect::<String>().trim().to_string())
}

/// 页面中所有链接
pub fn links(body: &str) -> Vec<String> {
    let document = Html::parse_document(body);
    select(&document, "a[href]")
        .into_iter()
        .filter_map(|a| a.value().attr("href").map(str::to_string))
        .collect()
}
