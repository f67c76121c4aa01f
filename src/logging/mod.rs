//! Structured logging helpers for the relay
//!
//! Filter construction for the tracing subscriber, request id propagation,
//! and privacy-safe previews of prompt content.

pub mod fields;
pub mod middleware;

pub use fields::{preview_chat, truncate_prompt};
pub use middleware::{assign_request_id, generate_request_id, RequestId, REQUEST_ID_HEADER};

use crate::config::LoggingConfig;

/// Build filter directives string from LoggingConfig
///
/// Returns the base level followed by one `ark::<component>=<level>`
/// directive per configured component.
///
/// # Examples
///
/// ```
/// use ark::config::LoggingConfig;
/// use ark::logging::build_filter_directives;
///
/// let mut config = LoggingConfig::default();
/// config.component_levels.insert("upstream".to_string(), "debug".to_string());
///
/// assert_eq!(build_filter_directives(&config), "info,ark::upstream=debug");
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    for (component, level) in &config.component_levels {
        filter_str.push_str(&format!(",ark::{}={}", component, level));
    }

    filter_str
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_base_only() {
        let config = LoggingConfig::default();
        assert_eq!(build_filter_directives(&config), "info");
    }

    #[test]
    fn test_filter_directives_components_are_ordered() {
        let mut config = LoggingConfig {
            level: "warn".to_string(),
            ..Default::default()
        };
        config
            .component_levels
            .insert("upstream".to_string(), "trace".to_string());
        config
            .component_levels
            .insert("api".to_string(), "debug".to_string());

        assert_eq!(
            build_filter_directives(&config),
            "warn,ark::api=debug,ark::upstream=trace"
        );
    }
}
