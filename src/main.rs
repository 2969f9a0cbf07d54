mod app;

use anyhow::Result;
use app::App;
use gform_submit::{logger, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logger::init_with_verbose(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config)?.run().await?;

    Ok(())
}
