//! 集成测试公共工具：内存传输和表单页面构造

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use gform_submit::{HttpResponse, HttpTransport, TransportError};
use serde_json::{json, Value as JsonValue};

pub const VIEW_URL: &str = "https://docs.google.com/forms/d/e/FORM_ID/viewform";
pub const ACTION_URL: &str = "https://docs.google.com/forms/d/e/FORM_ID/formResponse";
pub const FBZX: &str = "-4242";
pub const INITIAL_DRAFT: &str = r#"[null,null,"-4242"]"#;

/// 记录的请求
#[derive(Debug, Clone)]
pub struct Request {
    pub method: &'static str,
    pub url: String,
    pub fields: Vec<(String, String)>,
}

impl Request {
    /// 字段的所有值
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values(name).first().copied()
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.iter().any(|(key, _)| key == name)
    }
}

/// 按顺序返回预设响应，并记录所有请求
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        gform_submit::logger::init();
        Self::default()
    }

    pub fn push(&self, status: u16, url: &str, body: impl Into<String>) -> &Self {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            url: url.to_string(),
            body: body.into(),
        });
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST")
            .collect()
    }

    fn respond(&self, request: Request) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        self.responses.lock().unwrap().pop_front().ok_or_else(|| {
            TransportError::request_failed(
                url,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no queued response"),
            )
        })
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.respond(Request {
            method: "GET",
            url: url.to_string(),
            fields: Vec::new(),
        })
    }

    async fn post_form(
        &self,
        url: &str,
        fields: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        self.respond(Request {
            method: "POST",
            url: url.to_string(),
            fields: fields.to_vec(),
        })
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// 带内嵌数据和隐藏字段的表单页面
pub fn form_page(data: &JsonValue, history: &str, draft: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>Survey</title></head><body>
<script type="text/javascript" nonce="abc">var FB_PUBLIC_LOAD_DATA_ = {};</script>
<form action="{}" method="POST">
<input type="hidden" name="fbzx" value="{}">
<input type="hidden" name="pageHistory" value="{}">
<input type="hidden" name="partialResponse" value="{}">
</form></body></html>"#,
        data,
        ACTION_URL,
        FBZX,
        escape(history),
        escape(draft)
    )
}

/// 逐页提交时服务器返回的中间页面（只关心隐藏字段）
pub fn next_page(history: &str, draft: &str) -> String {
    form_page(&json!([null, ["", []]]), history, draft)
}

/// 确认页
pub fn confirmation_page() -> String {
    r#"<html><body><div>已记录您的回复</div>
<a href="https://docs.google.com/forms/d/e/FORM_ID/viewform?usp=form_confirm">提交另一份回复</a>
<a href="https://docs.google.com/forms/d/e/FORM_ID/viewanalytics">查看其他人的回复</a>
</body></html>"#
        .to_string()
}

/// 三页表单：
/// - 第 1 页: "Name"（必填短文本）、"Route"（必填单选，Left → 第 2 页，Right → 第 3 页）
/// - 第 2 页: "Details"（必填段落），之后直接提交
/// - 第 3 页: "Colors"（必填复选框，至少 1 项，带 "其他"）、"Rating"（选填量表）
pub fn survey_data(second_block: JsonValue) -> JsonValue {
    let elements = json!([
        [1, "Name", null, 0, [[101, null, 1]]],
        [2, "Route", null, 2, [[102, [["Left", null, -2], ["Right", null, 600]], 1]]],
        [500, "Details page", null, 8, null, -2],
        [3, "Details", null, 1, [[103, null, 1]]],
        [600, "Last page", null, 8, null, -3],
        [4, "Colors", null, 4, [[104, [["Red"], ["Green"], ["", null, null, null, 1]], 1, null, [[7, 200, ["1"]]]]]],
        [5, "Rating", null, 5, [[105, [["1"], ["2"], ["3"]], 0, ["Bad", "Good"]]]]
    ]);
    let form = json!([
        "A small survey",
        elements,
        ["Thanks!", 1, 0, 0],
        null, null, null, null, null,
        "Survey",
        null,
        second_block
    ]);
    json!([null, form, null, "survey-name"])
}

pub fn survey_page() -> String {
    form_page(&survey_data(JsonValue::Null), "0", INITIAL_DRAFT)
}

/// 设置了第二组设置（回复副本、收集邮箱等）的表单
pub fn survey_page_with(second_block: JsonValue) -> String {
    form_page(&survey_data(second_block), "0", INITIAL_DRAFT)
}
