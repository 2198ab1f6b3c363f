//! Logging setup / 日志初始化

use once_cell::sync::OnceCell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: OnceCell<()> = OnceCell::new();

/// Default filter when `RUST_LOG` is unset / 默认日志级别
pub const DEFAULT_DIRECTIVE: &str = "minio_rw=info";

/// Install a stderr `fmt` subscriber once per process. A subscriber already
/// installed by the host wins; ours is then silently skipped.
pub fn init() {
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_DIRECTIVE.into()))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    });
}
