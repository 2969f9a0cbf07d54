//! 页面解析
//!
//! - `html` - 从 HTML 中提取内嵌数据、隐藏字段、标题和链接
//! - `schema` - 将内嵌数据转换为页面、题目和设置

pub mod html;
pub mod schema;

pub use html::{parse_form_page, parse_page_tokens, PageTokens, RawFormPage};
pub use schema::{last_history_index, parse_draft, parse_form_data, FormData};
