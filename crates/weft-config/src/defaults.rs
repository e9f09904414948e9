use crate::logging::LogFormat;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default worker count; zero lets the pool size itself from the CPU count.
pub const DEFAULT_WORKER_THREADS: usize = 0;

/// Default log filter expression used by the binaries.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default size of the transaction worker pool.
#[must_use]
pub const fn default_worker_threads() -> usize {
    DEFAULT_WORKER_THREADS
}

/// Resource operations create missing parent directories unless disabled.
#[must_use]
pub const fn default_create_parent_directories() -> bool {
    true
}
