// Bike Sharing Dashboard - Core Library
// Exposes all modules for use in the TUI, API server, and tests

pub mod aggregate;
pub mod config;
pub mod insights;
pub mod loader;
pub mod pager;
pub mod records;
pub mod service;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use aggregate::{
    column_mean, mean_by, ChartKind, ChartPoint, ChartSeries, GroupMean, UserTypeMeans,
};
pub use config::{Config, ConfigArgs, ConfigError, DataConfig, LoggingConfig, ServerConfig};
pub use insights::{Insight, DASHBOARD_TITLE, KEY_INSIGHTS, WELCOME};
pub use loader::{load_daily, load_hourly, load_table, LoadError, Table};
pub use pager::{clamp_page, page, page_count, PageWindow, DEFAULT_PAGE_SIZE};
pub use records::{
    CsvRecord, DailyRecord, HourlyRecord, RentalRecord, RowViolation, Season, WeatherSituation,
};
pub use service::{ChartId, DashboardService, Dataset, Overview};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_level`. Logs go to stderr so they never
/// interleave with summary output or the terminal dashboard.
pub fn init_tracing(default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
