use crate::config::types::{Config, CrawlerConfig, UserAgentConfig, UNLIMITED_PAGES};
use crate::ConfigError;
use url::Url;

/// Upper bound for the per-request timeout (seconds)
pub const MAX_TIMEOUT_SECS: u64 = 60;

/// Upper bound for the streaming pacing delay (milliseconds)
pub const MAX_PACING_DELAY_MS: u64 = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_boilerplate(&config.extraction.boilerplate)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.timeout < 1 || config.timeout > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "timeout must be between 1 and {} seconds, got {}",
            MAX_TIMEOUT_SECS, config.timeout
        )));
    }

    if config.max_pages < 1 || config.max_pages > UNLIMITED_PAGES {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and {}, got {}",
            UNLIMITED_PAGES, config.max_pages
        )));
    }

    if config.pacing_delay > MAX_PACING_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "pacing_delay must be <= {}ms, got {}ms",
            MAX_PACING_DELAY_MS, config.pacing_delay
        )));
    }

    if config.progress_interval < 1 {
        return Err(ConfigError::Validation(
            "progress_interval must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Rejects blank phrases, which would match everywhere
fn validate_boilerplate(phrases: &[String]) -> Result<(), ConfigError> {
    if phrases.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "boilerplate phrases cannot be blank".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = Config::default();
        config.crawler.timeout = 0;
        assert!(validate(&config).is_err());

        config.crawler.timeout = 61;
        assert!(validate(&config).is_err());

        config.crawler.timeout = 1;
        assert!(validate(&config).is_ok());

        config.crawler.timeout = 60;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_max_pages_bounds() {
        let mut config = Config::default();
        config.crawler.max_pages = 0;
        assert!(validate(&config).is_err());

        config.crawler.max_pages = UNLIMITED_PAGES + 1;
        assert!(validate(&config).is_err());

        config.crawler.max_pages = UNLIMITED_PAGES;
        assert!(validate(&config).is_ok());
        assert!(config.crawler.is_unlimited());
    }

    #[test]
    fn test_pacing_and_progress() {
        let mut config = Config::default();
        config.crawler.pacing_delay = MAX_PACING_DELAY_MS + 1;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.crawler.progress_interval = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_crawler_name_characters() {
        let mut config = Config::default();
        config.user_agent.crawler_name = "bad name".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = "good-name2".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_contact_url() {
        let mut config = Config::default();
        config.user_agent.contact_url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_blank_boilerplate_rejected() {
        let mut config = Config::default();
        config.extraction.boilerplate = vec!["  ".to_string()];
        assert!(validate(&config).is_err());
    }
}
