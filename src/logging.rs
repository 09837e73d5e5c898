use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` controls filtering (default
/// `info`); `LOG_FORMAT=json` switches to one JSON object per line.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        fmt().json().with_env_filter(filter).with_current_span(true).init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}
