use std::path::Path;

use anyhow::{Context, Result};
use gform_submit::{
    load_answer_sheet, Config, DefaultStrategy, FillOptions, Form, ReqwestTransport,
    SubmissionResult, SubmitOptions,
};
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    transport: ReqwestTransport,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let transport = ReqwestTransport::new(&config).context("创建 HTTP 客户端失败")?;

        Ok(Self { config, transport })
    }

    /// 运行应用主逻辑：加载 → 打印 → 填写 → 提交
    pub async fn run(&self) -> Result<()> {
        let url = self
            .config
            .form_url
            .as_deref()
            .context("未设置 FORM_URL")?;

        let mut form = Form::load(&self.transport, url)
            .await
            .with_context(|| format!("加载表单失败: {}", url))?;
        println!("{}", form.to_str(self.config.dump_indent, false));

        self.fill(&mut form).await?;
        println!("{}", form.to_str(self.config.dump_indent, true));

        if self.config.dry_run {
            warn!("⚠️ DRY_RUN 已开启，跳过提交");
            return Ok(());
        }

        let options = SubmitOptions {
            emulate_history: self.config.emulate_history,
            need_receipt: self.config.need_receipt,
            captcha_response: self.config.captcha_response.clone(),
        };
        let result = form
            .submit(&self.transport, options)
            .await
            .context("提交失败")?;

        print_result(&result);
        Ok(())
    }

    /// 有答案文件时按文件填写，否则全部使用默认值
    async fn fill(&self, form: &mut Form) -> Result<()> {
        let options = FillOptions {
            fill_optional: self.config.fill_optional,
        };

        match &self.config.answers_file {
            Some(path) => {
                let mut sheet = load_answer_sheet(Path::new(path))
                    .await?
                    .with_fill_defaults(self.config.fill_defaults);
                info!("📝 使用答案文件: {}", path);
                form.fill_with_options(&mut sheet, options)
                    .context("按答案文件填写失败")?;
            }
            None => {
                info!("📝 未设置 ANSWERS_FILE，使用默认值填写");
                form.fill_with_options(&mut DefaultStrategy, options)
                    .context("默认值填写失败")?;
            }
        }
        Ok(())
    }
}

/// 记录启动信息
fn log_startup(config: &Config) {
    info!("🚀 启动表单提交程序");
    info!(
        "⚙️ 逐页提交: {} | 填写非必填: {} | 仅填写: {}",
        config.emulate_history, config.fill_optional, config.dry_run
    );
}

/// 输出确认页上的链接
fn print_result(result: &SubmissionResult) {
    info!("{}", "=".repeat(60));
    info!("✅ 提交完成 ({} 个请求)", result.requests);
    let links = [
        ("再次提交", &result.resubmit),
        ("查看汇总", &result.summary),
        ("编辑回复", &result.edit),
        ("查看成绩", &result.quiz_score),
    ];
    for (label, link) in links {
        if let Some(link) = link {
            info!("🔗 {}: {}", label, link);
        }
    }
    info!("{}", "=".repeat(60));
}
