use tracing_subscriber::{fmt, EnvFilter};

/// Env var that switches log output to JSON lines.
pub const LOG_JSON_ENV: &str = "WBTC_LOG_JSON";

/// stderr subscriber; `RUST_LOG` filters (default `info`), `WBTC_LOG_JSON=1`
/// for JSON. Safe to call twice.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let use_json = std::env::var(LOG_JSON_ENV).map(|value| value == "1").unwrap_or(false);

    let builder = fmt::Subscriber::builder().with_env_filter(env_filter).with_writer(std::io::stderr);
    let _ = if use_json { builder.json().try_init() } else { builder.pretty().try_init() };
}
