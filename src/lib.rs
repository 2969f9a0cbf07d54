//! # GForm Submit
//!
//! 解析、填写并提交 Google 表单的 Rust 库
//!
//! ## 架构设计
//!
//! 本库采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 只暴露 HTTP 能力
//! - `HttpTransport` - GET / 表单 POST，核心逻辑从不自己打开连接
//! - `ReqwestTransport` - 基于 reqwest 的默认实现
//!
//! ### ② 模型层（Models）
//! - `models/` - 题目、页面、设置、校验规则
//! - `Element` - 每种题目自己负责校验、编码、渲染
//! - `AnswerSheet` - TOML 答案文件
//!
//! ### ③ 解析层（Parser）
//! - `parser/html` - 从页面中提取内嵌数据和隐藏字段
//! - `parser/schema` - 内嵌 JSON 的索引布局只在这里出现
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/filler` - 按跳转顺序填写并校验可达页面
//! - `workflow/submitter` - 单次提交或逐页提交
//!
//! ### ⑤ 外观层（Form）
//! - `Form` - `load → fill → submit`
//!
//! ## 示例
//!
//! ```no_run
//! use gform_submit::{DefaultStrategy, Form, ReqwestTransport, SubmitOptions};
//!
//! # async fn run() -> gform_submit::Result<()> {
//! let transport = ReqwestTransport::new(&gform_submit::Config::default())?;
//! let mut form = Form::load(&transport, "https://docs.google.com/forms/d/e/.../viewform").await?;
//! form.fill(&mut DefaultStrategy)?;
//! let result = form.submit(&transport, SubmitOptions::default()).await?;
//! println!("{:?}", result.resubmit);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod form;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod parser;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{
    ElementError, ElementErrorKind, FillError, FormError, ParseError, Result, SubmissionError,
    TransportError,
};
pub use form::{Form, FormState};
pub use infrastructure::{FormFields, HttpResponse, HttpTransport, ReqwestTransport};
pub use models::{
    load_answer_sheet, AnswerSheet, Element, ElementKind, Page, PageTarget, Settings, Value,
};
pub use workflow::{DefaultStrategy, FillOptions, FillStrategy, SubmissionResult, SubmitOptions};
