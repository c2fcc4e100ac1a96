//! Log filter selection for the binary

use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, `info` when unset; `--verbose` forces `debug`
pub fn log_filter(verbose: bool) -> EnvFilter {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    log_filter_from(verbose, directives.as_deref())
}

/// Filter from explicit `RUST_LOG`-style directives
pub fn log_filter_from(verbose: bool, directives: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }

    match directives.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => {
            EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
        }
        None => EnvFilter::new("info"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_info() {
        assert_eq!(log_filter_from(false, None).to_string(), "info");
        assert_eq!(log_filter_from(false, Some("  ")).to_string(), "info");
    }

    #[test]
    fn test_rust_log_can_lower_verbosity() {
        assert_eq!(log_filter_from(false, Some("warn")).to_string(), "warn");
    }

    #[test]
    fn test_rust_log_module_directive() {
        let filter = log_filter_from(false, Some("keyed_batcher=trace"));
        assert_eq!(filter.to_string(), "keyed_batcher=trace");
    }

    #[test]
    fn test_verbose_forces_debug() {
        assert_eq!(log_filter_from(true, Some("warn")).to_string(), "debug");
    }
}
