use codelens_core::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Targets that receive the configured level when `RUST_LOG` is unset
const LOG_TARGETS: [&str; 4] = ["codelens_api", "codelens_ai", "codelens_core", "tower_http"];

fn default_directives(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

fn env_filter_or(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Subscriber for the startup window before `logging.format` is known.
/// Scope it with [`tracing::subscriber::with_default`] around config loading.
pub fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    Registry::default()
        .with(env_filter_or("info"))
        .with(tracing_subscriber::fmt::layer().compact())
}

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
///
/// Calling this twice is harmless; the second subscriber is dropped.
pub fn init_tracing(config: &LoggingConfig) {
    let env_filter = || env_filter_or(&config.level);

    let result = match config.format.as_str() {
        "json" => Registry::default()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        "compact" => Registry::default()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init(),
        _ => Registry::default()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(
            default_directives("debug"),
            "codelens_api=debug,codelens_ai=debug,codelens_core=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_bootstrap_subscriber_sees_config_loading() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }

        tracing::subscriber::with_default(bootstrap_subscriber(), || {
            assert!(tracing::enabled!(
                target: "codelens_core::config_manager",
                tracing::Level::INFO
            ));
            assert!(!tracing::enabled!(
                target: "codelens_core::config_manager",
                tracing::Level::DEBUG
            ));
        });
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            format: "compact".to_string(),
        };
        init_tracing(&config);
        init_tracing(&config);
    }
}
