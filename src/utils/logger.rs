use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 沒有設定 RUST_LOG 時使用的 directive；`verbose` 至少開到 debug
pub fn filter_directive(verbose: bool, level: Option<&str>) -> String {
    let level = match level {
        Some("trace") => "trace",
        _ if verbose => "debug",
        Some(level) => level,
        None => "info",
    };
    format!("public_content_api={}", level)
}

fn default_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

pub fn init_cli_logger(directive: &str) {
    tracing_subscriber::registry()
        .with(default_filter(directive))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// 服務內嵌使用：JSON 格式方便集中收集
pub fn init_json_logger(directive: &str) {
    tracing_subscriber::registry()
        .with(default_filter(directive))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .json(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(false, None), "public_content_api=info");
        assert_eq!(filter_directive(true, None), "public_content_api=debug");
        assert_eq!(filter_directive(false, Some("warn")), "public_content_api=warn");
        assert_eq!(filter_directive(true, Some("error")), "public_content_api=debug");
        assert_eq!(filter_directive(true, Some("trace")), "public_content_api=trace");
    }
}
