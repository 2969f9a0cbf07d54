//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 初始化日志（默认 info 级别）
pub fn init() {
    init_with_verbose(false);
}

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则根据 `verbose` 选择 debug 或 info 级别。
/// 重复调用不会报错（测试中会多次调用）。
pub fn init_with_verbose(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
