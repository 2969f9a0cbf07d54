use thiserror::Error;

/// 表单操作错误类型
///
/// 按阶段划分：加载（解析）、填写、提交，外加底层网络错误
#[derive(Debug, Error)]
pub enum FormError {
    /// 页面结构无法解析
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 填写或校验失败
    #[error("填写错误: {0}")]
    Fill(#[from] FillError),
    /// 提交失败
    #[error("提交错误: {0}")]
    Submission(#[from] SubmissionError),
    /// 网络传输失败
    #[error("网络错误: {0}")]
    Transport(#[from] TransportError),
}

/// 解析错误
///
/// 页面结构与已知格式不符时返回，通常意味着表单格式已变更或不受支持
#[derive(Debug, Error)]
pub enum ParseError {
    /// 不是表单地址
    #[error("无效的表单地址: {url}")]
    InvalidUrl { url: String },
    /// 表单不存在
    #[error("表单不存在: {url}")]
    NoSuchForm { url: String },
    /// 需要登录才能访问
    #[error("表单需要登录: {url}")]
    SigninRequired { url: String },
    /// 表单已关闭
    #[error("表单 \"{title}\" 已关闭")]
    ClosedForm { title: String },
    /// 回复编辑已禁用
    #[error("回复编辑已禁用: {url}")]
    EditingDisabled { url: String },
    /// 非预期的 HTTP 状态码
    #[error("加载表单返回状态码 {status}: {url}")]
    UnexpectedStatus { status: u16, url: String },
    /// 页面中找不到内嵌数据
    #[error("页面中缺少表单数据 (FB_PUBLIC_LOAD_DATA_)")]
    MissingData,
    /// 页面中缺少隐藏字段
    #[error("页面中缺少隐藏字段: {name}")]
    MissingInput { name: &'static str },
    /// 数据结构与预期不符
    #[error("表单结构无法识别 ({path}): 期望 {expected}")]
    UnexpectedShape { path: String, expected: &'static str },
    /// 未知的题目类型
    #[error("未知的题目类型: {code}")]
    UnknownElementType { code: i64 },
    /// 内嵌 JSON 解析失败
    #[error("内嵌 JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),
    /// 提取规则无效
    #[error("正则表达式无效: {0}")]
    Regex(#[from] regex::Error),
}

impl ParseError {
    pub(crate) fn shape(path: impl Into<String>, expected: &'static str) -> Self {
        ParseError::UnexpectedShape {
            path: path.into(),
            expected,
        }
    }
}

/// 单个题目的错误
///
/// 记录题目位置（页面索引、题目索引）和题目名称，便于一次性展示所有问题
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[第 {page_index} 页 第 {element_index} 题] \"{name}\": {kind}")]
pub struct ElementError {
    pub page_index: usize,
    pub element_index: usize,
    pub element_id: i64,
    pub name: String,
    pub kind: ElementErrorKind,
}

/// 题目错误的具体类型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElementErrorKind {
    #[error("必填题目未填写")]
    Required,
    #[error("必填行 \"{row}\" 未填写")]
    RequiredRow { row: String },
    #[error("\"其他\" 选项内容为空")]
    EmptyOther,
    #[error("重复的 \"其他\" 选项: \"{first}\" 与 \"{second}\"")]
    DuplicateOther { first: String, second: String },
    #[error("无效选项: \"{value}\"")]
    InvalidChoice { value: String },
    #[error("行 \"{row}\" 中的无效选项: \"{value}\"")]
    InvalidRowChoice { row: String, value: String },
    #[error("不允许多选")]
    MultipleValues,
    #[error("行 \"{row}\" 不允许多选")]
    MultipleRowValues { row: String },
    #[error("行数不匹配: 期望 {expected}, 实际 {actual}")]
    RowCountMismatch { expected: usize, actual: usize },
    #[error("值类型不兼容: 期望 {expected}, 实际 {actual}")]
    IncompatibleType {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("无效文本 \"{value}\": {reason}")]
    InvalidText { value: String, reason: String },
    #[error("时长超出范围 [0, 73 小时): {seconds} 秒")]
    InvalidDuration { seconds: i64 },
    #[error("列 \"{column}\" 被多行选择")]
    SameColumn { column: String },
    #[error("网格配置错误: 列数少于行数，无法满足每列最多一个回答")]
    MisconfiguredGrid,
    #[error("选择数量不符合要求: {reason}")]
    ChoiceCount { reason: String },
    #[error("无法为该题目生成默认值")]
    NoDefaultValue,
    #[error("该题目类型不支持填写")]
    NotFillable,
}

/// 填写错误
///
/// 不会在第一个错误处停止，所有题目的错误会一并返回
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FillError {
    /// 一个或多个题目无效
    #[error("{} 个题目填写无效", .0.len())]
    Invalid(Vec<ElementError>),
    /// 所选答案导致页面跳转形成死循环
    #[error("所选答案导致页面跳转死循环 (第 {page} 页被重复访问)")]
    InfiniteLoop {
        page: usize,
        errors: Vec<ElementError>,
    },
    /// 页面或题目索引越界
    #[error("题目不存在: 第 {page_index} 页 第 {element_index} 题")]
    NoSuchElement {
        page_index: usize,
        element_index: usize,
    },
}

impl FillError {
    /// 返回收集到的所有题目错误
    pub fn errors(&self) -> &[ElementError] {
        match self {
            FillError::Invalid(errors) => errors,
            FillError::InfiniteLoop { errors, .. } => errors,
            FillError::NoSuchElement { .. } => &[],
        }
    }
}

/// 提交错误
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// 表单尚未通过校验
    #[error("表单尚未填写或校验")]
    NotValidated,
    /// 表单需要登录
    #[error("表单需要登录才能提交")]
    SigninRequired,
    /// 需要验证码但未提供
    #[error("需要验证码 (g-recaptcha-response) 但未提供")]
    CaptchaRequired,
    /// 表单已关闭
    #[error("表单已关闭")]
    FormClosed,
    /// 回复编辑已禁用
    #[error("回复编辑已禁用")]
    EditingDisabled,
    /// 表单不存在
    #[error("表单不存在: {url}")]
    NoSuchForm { url: String },
    /// 非 2xx 响应
    #[error("提交返回状态码 {status}: {url}")]
    BadStatus { status: u16, url: String },
    /// 响应中缺少隐藏字段
    #[error("响应中缺少隐藏字段: {name}")]
    MissingToken { name: &'static str },
    /// 最后一次请求没有返回确认页（服务器重新返回了表单页）
    #[error("提交未被确认: 服务器返回了表单页 (第 {page:?} 页)")]
    NotConfirmed { page: Option<usize> },
    /// 服务器返回的页面与预期不一致
    #[error("页面跳转与预期不一致: 期望 {expected}, 实际 {actual:?}")]
    UnexpectedPage {
        expected: usize,
        actual: Option<usize>,
    },
}

/// 网络传输错误
#[derive(Debug, Error)]
pub enum TransportError {
    /// 请求失败
    #[error("请求失败 ({url}): {source}")]
    RequestFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 客户端构建失败
    #[error("HTTP 客户端构建失败: {source}")]
    ClientBuildFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

// ========== 便捷构造函数 ==========

impl TransportError {
    /// 创建请求失败错误
    pub fn request_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TransportError::RequestFailed {
            url: url.into(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 表单操作结果类型
pub type Result<T> = std::result::Result<T, FormError>;
