use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. `--verbose` wins over a configured level.
pub fn filter_directive(verbose: bool, log_level: Option<&str>) -> String {
    if verbose {
        return "rsdroid_testkit=debug,info".to_string();
    }
    match log_level {
        Some(level) => format!("rsdroid_testkit={}", level.to_ascii_lowercase()),
        None => "rsdroid_testkit=info".to_string(),
    }
}

fn default_filter(verbose: bool, log_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, log_level)))
}

pub fn init_cli_logger(verbose: bool, log_level: Option<&str>) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// JSON lines, for runs whose output is collected by a profiler harness.
pub fn init_json_logger(verbose: bool, log_level: Option<&str>) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_drives_filter() {
        assert_eq!(filter_directive(false, Some("debug")), "rsdroid_testkit=debug");
        assert_eq!(filter_directive(false, Some("WARN")), "rsdroid_testkit=warn");
    }

    #[test]
    fn info_without_configured_level() {
        assert_eq!(filter_directive(false, None), "rsdroid_testkit=info");
    }

    #[test]
    fn verbose_overrides_configured_level() {
        assert_eq!(
            filter_directive(true, Some("error")),
            "rsdroid_testkit=debug,info"
        );
    }
}
