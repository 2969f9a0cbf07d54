//! 表单 - 外观层
//!
//! 把加载、填写、提交串成一个对象：
//! 1. `load` / `from_html`：检查地址和响应，解析页面、设置和预填数据
//! 2. `fill` / `set_value` / `validate`：写入并校验答案
//! 3. `submit`：通过注入的 `HttpTransport` 发送答案
//!
//! 状态：`Loaded → Filled → Submitted`，修改答案后回到 `Loaded`

use std::collections::HashMap;

use reqwest::Url;
use tracing::{debug, info};

use crate::error::{ElementError, FillError, FormError, ParseError, Result, SubmissionError};
use crate::infrastructure::{HttpResponse, HttpTransport};
use crate::models::element::{Element, ElementKind, Prefill, EMAIL_ENTRY_ID, EMAIL_FIELD};
use crate::models::page::Page;
use crate::models::settings::Settings;
use crate::models::value::Value;
use crate::parser::html::{page_title, parse_form_page};
use crate::parser::schema::{parse_draft, parse_form_data};
use crate::utils::format::{add_indent, page_separator};
use crate::utils::logging::{log_fill_complete, log_fill_errors, log_form_loaded};
use crate::workflow::filler::{fill_pages, reachable_pages, DefaultStrategy, FillOptions, FillStrategy};
use crate::workflow::submitter::{Submission, SubmissionResult, SubmitOptions};

const VIEW_FORM: &str = "viewform";
const FORM_RESPONSE: &str = "formResponse";
const EDIT_PARAM: &str = "edit2";
const SIGNIN_HOST: &str = "accounts.google.com";

/// 表单生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// 已加载，答案尚未通过校验
    Loaded,
    /// 填写或校验成功
    Filled,
    /// 已提交
    Submitted,
}

/// Google 表单
#[derive(Debug, Clone)]
pub struct Form {
    /// 加载地址（跟随重定向之后）
    pub url: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub settings: Settings,
    pub pages: Vec<Page>,
    action_url: String,
    fbzx: String,
    history: String,
    draft: String,
    signin_required: bool,
    prefill: Prefill,
    state: FormState,
}

/// 检查加载表单时的响应
fn check_load_response(response: &HttpResponse) -> std::result::Result<(), ParseError> {
    let url = response.url.clone();
    let host = Url::parse(&url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string));

    if matches!(response.status, 404 | 410) {
        return Err(ParseError::NoSuchForm { url });
    }
    if response.status == 401 || host.as_deref() == Some(SIGNIN_HOST) {
        return Err(ParseError::SigninRequired { url });
    }
    if url.ends_with("closedform") {
        let title = page_title(&response.body).unwrap_or_default();
        return Err(ParseError::ClosedForm { title });
    }
    if url.ends_with("editingdisabled") {
        return Err(ParseError::EditingDisabled { url });
    }
    if !response.is_success() {
        return Err(ParseError::UnexpectedStatus {
            status: response.status,
            url,
        });
    }
    Ok(())
}

fn parse_view_url(url: &str) -> std::result::Result<Url, ParseError> {
    let invalid = || ParseError::InvalidUrl {
        url: url.to_string(),
    };
    let parsed = Url::parse(url).map_err(|_| invalid())?;
    if !parsed.path().trim_end_matches('/').ends_with(VIEW_FORM) {
        return Err(invalid());
    }
    Ok(parsed)
}

/// `.../viewform?...` → `.../formResponse`，只保留 `edit2` 参数
fn action_url(view: &Url) -> String {
    let mut action = view.clone();
    let path = view.path().trim_end_matches('/');
    let base = path.strip_suffix(VIEW_FORM).unwrap_or(path);
    action.set_path(&format!("{}{}", base, FORM_RESPONSE));

    let edit: Vec<String> = view
        .query_pairs()
        .filter(|(key, _)| key == EDIT_PARAM)
        .map(|(_, value)| value.into_owned())
        .collect();
    action.set_query(None);
    action.set_fragment(None);
    for value in edit {
        action.query_pairs_mut().append_pair(EDIT_PARAM, &value);
    }
    action.to_string()
}

fn is_edit_url(url: &Url) -> bool {
    url.query_pairs().any(|(key, _)| key == EDIT_PARAM)
}

/// 预填链接中的 `entry.<id>=value`，只有带 `usp=pp_url` 的链接才算预填链接
fn url_prefill(url: &Url) -> Prefill {
    let mut prefill = Prefill::new();
    if !url.query_pairs().any(|(key, value)| key == "usp" && value == "pp_url") {
        return prefill;
    }
    for (key, value) in url.query_pairs() {
        let id = if key == EMAIL_FIELD {
            Some(EMAIL_ENTRY_ID)
        } else {
            key.strip_prefix("entry.").and_then(|id| id.parse().ok())
        };
        if let Some(id) = id {
            prefill.entry(id).or_default().push(value.into_owned());
        }
    }
    prefill
}

impl Form {
    /// 通过传输加载表单
    pub async fn load<T>(transport: &T, url: &str) -> Result<Form>
    where
        T: HttpTransport + ?Sized,
    {
        info!("🔍 加载表单: {}", url);
        let response = transport.get(url).await?;
        check_load_response(&response)?;
        Self::from_html(&response.url, &response.body)
    }

    /// 从已获取的页面构建表单
    ///
    /// `url` 必须是 `viewform` 地址，用于计算提交地址和预填数据
    pub fn from_html(url: &str, body: &str) -> Result<Form> {
        let view = parse_view_url(url)?;
        let mut raw = parse_form_page(body)?;
        let data = parse_form_data(&raw.data)?;
        let raw_images = std::mem::take(&mut raw.images);

        let prefill = if is_edit_url(&view) {
            debug!("编辑链接，使用草稿中的答案");
            parse_draft(&raw.draft)?
        } else {
            url_prefill(&view)
        };

        let mut form = Form {
            url: url.to_string(),
            name: data.name,
            title: data.title,
            description: data.description,
            settings: data.settings,
            pages: data.pages,
            action_url: action_url(&view),
            fbzx: raw.fbzx,
            history: raw.history,
            draft: raw.draft,
            signin_required: data.signin_required,
            prefill,
            state: FormState::Loaded,
        };
        form.apply_prefill();
        form.resolve_images(&raw_images);

        let inputs = form.elements().filter(|e| e.is_input()).count();
        log_form_loaded(
            form.title.as_deref().unwrap_or_default(),
            form.pages.len(),
            inputs,
        );
        Ok(form)
    }

    fn apply_prefill(&mut self) {
        if self.prefill.is_empty() {
            return;
        }
        for page in &mut self.pages {
            for element in &mut page.elements {
                element.prefill(&self.prefill);
            }
        }
    }

    /// 页面 HTML 只包含当前页，其他页面上的图片没有地址
    fn resolve_images(&mut self, urls: &HashMap<i64, String>) {
        let mut resolved = 0;
        for page in &mut self.pages {
            for element in &mut page.elements {
                if let ElementKind::Image(image) = &mut element.kind {
                    if let Some(url) = urls.get(&element.id) {
                        image.url = Some(url.clone());
                        resolved += 1;
                    }
                }
            }
        }
        if resolved > 0 {
            debug!("找到 {} 张图片的地址", resolved);
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// 提交地址
    pub fn action_url(&self) -> &str {
        &self.action_url
    }

    /// 提交前是否需要登录
    pub fn requires_signin(&self) -> bool {
        self.signin_required || self.settings.requires_signin()
    }

    /// 按文档顺序遍历所有题目
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.pages.iter().flat_map(|page| page.elements.iter())
    }

    pub fn find_element(&self, page_index: usize, element_index: usize) -> Option<&Element> {
        self.pages.get(page_index)?.elements.get(element_index)
    }

    /// 按当前答案计算可达页面
    pub fn reachable_pages(&self) -> Vec<usize> {
        reachable_pages(&self.pages)
    }

    /// 使用策略填写
    pub fn fill<S>(&mut self, strategy: &mut S) -> Result<()>
    where
        S: FillStrategy + ?Sized,
    {
        self.fill_with_options(strategy, FillOptions::default())
    }

    pub fn fill_with_options<S>(&mut self, strategy: &mut S, options: FillOptions) -> Result<()>
    where
        S: FillStrategy + ?Sized,
    {
        self.run_fill(Some(strategy), options)
    }

    /// 不取新值，只校验当前答案
    pub fn validate(&mut self) -> Result<()> {
        self.run_fill::<DefaultStrategy>(None, FillOptions::default())
    }

    fn run_fill<S>(&mut self, strategy: Option<&mut S>, options: FillOptions) -> Result<()>
    where
        S: FillStrategy + ?Sized,
    {
        match fill_pages(&mut self.pages, strategy, options) {
            Ok(path) => {
                log_fill_complete(&path);
                self.state = FormState::Filled;
                Ok(())
            }
            Err(err) => {
                log_fill_errors(&err);
                self.state = FormState::Loaded;
                Err(err.into())
            }
        }
    }

    /// 设置单个题目的答案
    pub fn set_value(&mut self, page_index: usize, element_index: usize, value: Value) -> Result<()> {
        let element = self
            .pages
            .get_mut(page_index)
            .and_then(|page| page.elements.get_mut(element_index))
            .ok_or(FillError::NoSuchElement {
                page_index,
                element_index,
            })?;

        // 答案被拒绝时保持原值和原状态
        element.set_value(value).map_err(|kind| {
            FormError::from(FillError::Invalid(vec![ElementError {
                page_index,
                element_index,
                element_id: element.id,
                name: element.name.clone().unwrap_or_default(),
                kind,
            }]))
        })?;
        self.state = FormState::Loaded;
        Ok(())
    }

    /// 清空答案后重新应用预填数据
    pub fn reset(&mut self) {
        self.clear();
        self.apply_prefill();
    }

    /// 清空所有答案（包括预填）
    pub fn clear(&mut self) {
        for page in &mut self.pages {
            for element in &mut page.elements {
                element.clear();
            }
        }
        self.state = FormState::Loaded;
    }

    /// 文本形式
    pub fn to_str(&self, indent: usize, include_answer: bool) -> String {
        let mut header = Vec::new();
        if let Some(title) = self.title.as_ref().or(self.name.as_ref()) {
            header.push(title.clone());
        }
        if let Some(description) = &self.description {
            header.push(description.clone());
        }
        header.push(add_indent(&self.settings.to_str(), indent));

        let separator = page_separator(indent);
        let mut parts = vec![header.join("\n")];
        for page in &self.pages {
            parts.push(separator.clone());
            parts.push(page.to_str(indent, include_answer));
        }
        parts.join("\n")
    }

    /// 提交答案
    ///
    /// 需要先成功调用 `fill` 或 `validate`；失败时状态不变
    pub async fn submit<T>(&mut self, transport: &T, options: SubmitOptions) -> Result<SubmissionResult>
    where
        T: HttpTransport + ?Sized,
    {
        if self.state == FormState::Loaded {
            return Err(SubmissionError::NotValidated.into());
        }
        if self.requires_signin() {
            return Err(SubmissionError::SigninRequired.into());
        }

        let path = self.reachable_pages();
        let submission = Submission {
            action_url: &self.action_url,
            fbzx: &self.fbzx,
            history: &self.history,
            draft: &self.draft,
            pages: &self.pages,
            path: &path,
            needs_receipt: self.settings.needs_receipt(options.need_receipt),
        };
        let result = submission.send(transport, &options).await?;
        self.state = FormState::Submitted;
        Ok(result)
    }
}
