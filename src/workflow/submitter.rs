//! 提交流程 - 流程层
//!
//! 核心职责：把已填写的答案编码为 `application/x-www-form-urlencoded` 请求并发送
//!
//! 两种模式：
//! 1. 默认：一次 POST 提交所有可达页面的答案，`pageHistory` 在本地计算
//! 2. 逐页提交（`emulate_history`）：每个可达页面一次 POST，
//!    使用上一次响应返回的 `pageHistory` / `partialResponse`

use tracing::{debug, info};

use crate::error::{FormError, SubmissionError};
use crate::infrastructure::{FormFields, HttpResponse, HttpTransport};
use crate::models::page::Page;
use crate::parser::html::{self, FBZX, PAGE_HISTORY, PARTIAL_RESPONSE};
use crate::parser::schema::last_history_index;
use crate::utils::logging::{log_submission_complete, log_submission_start};

const CONTINUE: &str = "continue";
const CAPTCHA_RESPONSE: &str = "g-recaptcha-response";
const SIGNIN_HOST: &str = "accounts.google.com";
const FORMS_HOST: &str = "docs.google.com";

/// 提交选项
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    /// 逐页提交，模拟真实翻页
    pub emulate_history: bool,
    /// 请求发送回复副本（仅在表单设置为 "由回复者选择" 时有效）
    pub need_receipt: bool,
    /// 已解出的验证码令牌
    pub captcha_response: Option<String>,
}

/// 提交成功后确认页上的链接
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionResult {
    /// 再次提交
    pub resubmit: Option<String>,
    /// 查看汇总图表
    pub summary: Option<String>,
    /// 编辑回复
    pub edit: Option<String>,
    /// 查看测验成绩
    pub quiz_score: Option<String>,
    /// 发送的请求数
    pub requests: usize,
}

impl SubmissionResult {
    /// 从确认页中提取链接
    pub fn from_page(body: &str, requests: usize) -> Self {
        let mut result = Self {
            requests,
            ..Self::default()
        };
        for link in html::links(body) {
            let host = reqwest::Url::parse(&link)
                .ok()
                .and_then(|url| url.host_str().map(str::to_string));
            if host.as_deref() != Some(FORMS_HOST) {
                continue;
            }
            if link.contains("viewanalytics") {
                result.summary.get_or_insert(link);
            } else if link.contains("edit2") {
                result.edit.get_or_insert(link);
            } else if link.contains("viewscore") {
                result.quiz_score.get_or_insert(link);
            } else if link.contains("viewform") {
                result.resubmit.get_or_insert(link);
            }
        }
        result
    }
}

/// 提交所需的表单状态
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub action_url: &'a str,
    pub fbzx: &'a str,
    /// 加载页面时的 `pageHistory`
    pub history: &'a str,
    /// 加载页面时的 `partialResponse`
    pub draft: &'a str,
    pub pages: &'a [Page],
    /// 可达页面索引
    pub path: &'a [usize],
    /// 是否需要验证码（发送回复副本）
    pub needs_receipt: bool,
}

/// 检查提交响应
pub fn check_response(response: &HttpResponse) -> Result<(), SubmissionError> {
    let host = reqwest::Url::parse(&response.url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string));

    if matches!(response.status, 404 | 410) {
        return Err(SubmissionError::NoSuchForm {
            url: response.url.clone(),
        });
    }
    if response.status == 401 || host.as_deref() == Some(SIGNIN_HOST) {
        return Err(SubmissionError::SigninRequired);
    }
    if response.url.ends_with("closedform") {
        return Err(SubmissionError::FormClosed);
    }
    if response.url.ends_with("editingdisabled") {
        return Err(SubmissionError::EditingDisabled);
    }
    if !response.is_success() {
        return Err(SubmissionError::BadStatus {
            status: response.status,
            url: response.url.clone(),
        });
    }
    Ok(())
}

fn page_fields(pages: &[Page], index: usize) -> FormFields {
    pages
        .get(index)
        .map(|page| page.elements.iter().flat_map(|e| e.encode()).collect())
        .unwrap_or_default()
}

/// 最后一次请求的响应必须是确认页；仍带有 `pageHistory` 说明服务器重新返回了表单页
fn confirm(body: &str, requests: usize) -> Result<SubmissionResult, FormError> {
    if let Some(history) = html::parse_page_tokens(body).history {
        return Err(SubmissionError::NotConfirmed {
            page: last_history_index(&history),
        }
        .into());
    }
    Ok(SubmissionResult::from_page(body, requests))
}

impl<'a> Submission<'a> {
    /// 预计发送的请求数
    pub fn request_count(&self, options: &SubmitOptions) -> usize {
        if options.emulate_history {
            self.path.len().max(1)
        } else {
            1
        }
    }

    fn captcha(&self, options: &SubmitOptions) -> Result<Option<String>, SubmissionError> {
        if !self.needs_receipt {
            return Ok(None);
        }
        options
            .captcha_response
            .clone()
            .map(Some)
            .ok_or(SubmissionError::CaptchaRequired)
    }

    async fn post<T>(&self, transport: &T, fields: FormFields) -> Result<HttpResponse, FormError>
    where
        T: HttpTransport + ?Sized,
    {
        debug!("提交 {} 个字段到 {}", fields.len(), self.action_url);
        let response = transport.post_form(self.action_url, &fields).await?;
        check_response(&response)?;
        Ok(response)
    }

    /// 发送提交请求
    pub async fn send<T>(&self, transport: &T, options: &SubmitOptions) -> Result<SubmissionResult, FormError>
    where
        T: HttpTransport + ?Sized,
    {
        let captcha = self.captcha(options)?;
        log_submission_start(self.request_count(options), options.emulate_history);

        let result = if options.emulate_history {
            self.send_per_page(transport, captcha).await?
        } else {
            self.send_once(transport, captcha).await?
        };

        log_submission_complete(result.requests);
        Ok(result)
    }

    /// 一次提交所有可达页面
    async fn send_once<T>(&self, transport: &T, captcha: Option<String>) -> Result<SubmissionResult, FormError>
    where
        T: HttpTransport + ?Sized,
    {
        let mut fields: FormFields = self
            .path
            .iter()
            .flat_map(|&index| page_fields(self.pages, index))
            .collect();

        let history: Vec<String> = self.path.iter().map(ToString::to_string).collect();
        fields.push((FBZX.to_string(), self.fbzx.to_string()));
        fields.push((PAGE_HISTORY.to_string(), history.join(",")));
        fields.push((PARTIAL_RESPONSE.to_string(), self.draft.to_string()));
        if let Some(token) = captcha {
            fields.push((CAPTCHA_RESPONSE.to_string(), token));
        }

        let response = self.post(transport, fields).await?;
        confirm(&response.body, 1)
    }

    /// 逐页提交，每次使用上一个响应中的翻页状态
    async fn send_per_page<T>(&self, transport: &T, captcha: Option<String>) -> Result<SubmissionResult, FormError>
    where
        T: HttpTransport + ?Sized,
    {
        let mut history = self.history.to_string();
        let mut draft = self.draft.to_string();
        let path: &[usize] = if self.path.is_empty() { &[0] } else { self.path };

        for (step, &page_index) in path.iter().enumerate() {
            let next = path.get(step + 1).copied();

            let mut fields = page_fields(self.pages, page_index);
            fields.push((FBZX.to_string(), self.fbzx.to_string()));
            if next.is_some() {
                fields.push((CONTINUE.to_string(), "1".to_string()));
            }
            fields.push((PAGE_HISTORY.to_string(), history.clone()));
            fields.push((PARTIAL_RESPONSE.to_string(), draft.clone()));
            if let (None, Some(token)) = (next, &captcha) {
                fields.push((CAPTCHA_RESPONSE.to_string(), token.clone()));
            }

            info!("📄 提交第 {} 页 ({}/{})", page_index + 1, step + 1, path.len());
            let response = self.post(transport, fields).await?;

            let Some(expected) = next else {
                return confirm(&response.body, path.len());
            };

            let tokens = html::parse_page_tokens(&response.body);
            history = tokens
                .history
                .ok_or(SubmissionError::MissingToken { name: PAGE_HISTORY })?;
            draft = tokens
                .draft
                .ok_or(SubmissionError::MissingToken { name: PARTIAL_RESPONSE })?;

            let actual = last_history_index(&history);
            if actual != Some(expected) {
                return Err(SubmissionError::UnexpectedPage { expected, actual }.into());
            }
        }

        // 路径至少包含第一页，循环总会在最后一页返回
        Err(SubmissionError::UnexpectedPage {
            expected: 0,
            actual: None,
        }
        .into())
    }
}
