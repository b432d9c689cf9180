use std::sync::Once;

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// `env_logger` filter, falls back to `RUST_LOG` and then to `info`.
    pub env_filter: Option<String>,
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.init();
    });
}
