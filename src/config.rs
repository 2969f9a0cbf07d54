/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 表单地址 (viewform 链接)
    pub form_url: Option<String>,
    /// TOML 答案文件路径
    pub answers_file: Option<String>,
    /// 是否逐页提交（模拟真实翻页）
    pub emulate_history: bool,
    /// 是否为非必填题目生成默认值
    pub fill_optional: bool,
    /// 答案文件中未出现的题目是否使用默认值
    pub fill_defaults: bool,
    /// 请求发送回复副本
    pub need_receipt: bool,
    /// 已解出的验证码令牌
    pub captcha_response: Option<String>,
    /// 只填写不提交
    pub dry_run: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- HTTP 配置 ---
    pub user_agent: String,
    pub http_timeout_secs: u64,
    /// 打印表单时的缩进
    pub dump_indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            form_url: None,
            answers_file: None,
            emulate_history: false,
            fill_optional: false,
            fill_defaults: false,
            need_receipt: false,
            captcha_response: None,
            dry_run: false,
            verbose_logging: false,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
            http_timeout_secs: 30,
            dump_indent: 2,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            form_url: std::env::var("FORM_URL").ok().or(default.form_url),
            answers_file: std::env::var("ANSWERS_FILE").ok().or(default.answers_file),
            emulate_history: std::env::var("EMULATE_HISTORY").ok().and_then(|v| v.parse().ok()).unwrap_or(default.emulate_history),
            fill_optional: std::env::var("FILL_OPTIONAL").ok().and_then(|v| v.parse().ok()).unwrap_or(default.fill_optional),
            fill_defaults: std::env::var("FILL_DEFAULTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.fill_defaults),
            need_receipt: std::env::var("NEED_RECEIPT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.need_receipt),
            captcha_response: std::env::var("CAPTCHA_RESPONSE").ok().or(default.captcha_response),
            dry_run: std::env::var("DRY_RUN").ok().and_then(|v| v.parse().ok()).unwrap_or(default.dry_run),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            user_agent: std::env::var("USER_AGENT").unwrap_or(default.user_agent),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.http_timeout_secs),
            dump_indent: std::env::var("DUMP_INDENT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.dump_indent),
        }
    }
}
