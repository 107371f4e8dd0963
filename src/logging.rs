use tracing_subscriber::EnvFilter;

/// 初始化日志。默认级别 info，可以用 `RUST_LOG` 覆盖。
/// 重复调用时保留第一次安装的订阅者。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .try_init();
}
