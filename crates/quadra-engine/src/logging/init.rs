use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "quadra_engine=trace,wgpu=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}

/// Explicit filter wins over `RUST_LOG`; `None` means the `info` default.
fn resolve_filter(explicit: Option<String>, env: Option<String>) -> Option<String> {
    explicit.or(env).filter(|f| !f.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_overrides_env() {
        let f = resolve_filter(Some("quadra_engine=trace".into()), Some("warn".into()));
        assert_eq!(f.as_deref(), Some("quadra_engine=trace"));
    }

    #[test]
    fn env_used_when_no_explicit_filter() {
        assert_eq!(resolve_filter(None, Some("debug".into())).as_deref(), Some("debug"));
    }

    #[test]
    fn blank_filter_falls_back_to_default() {
        assert_eq!(resolve_filter(None, Some("  ".into())), None);
        assert_eq!(resolve_filter(None, None), None);
    }
}
