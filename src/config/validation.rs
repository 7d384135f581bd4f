use crate::config::types::{CrawlerConfig, ScreenshotConfig, SitemapConfig, SweepConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// The target host is deliberately left alone here: the URL rewriter owns
/// hostname validation and reports it as its own error.
pub fn validate(config: &SweepConfig) -> Result<(), ConfigError> {
    validate_sitemap_config(&config.sitemap)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_screenshot_config(&config.screenshot)?;
    Ok(())
}

/// Validates the sitemap section
fn validate_sitemap_config(config: &SitemapConfig) -> Result<(), ConfigError> {
    // A blank URL counts as missing and is reported by the orchestrator
    let Some(url) = config.url.as_deref().filter(|url| !url.trim().is_empty()) else {
        return Ok(());
    };

    let parsed = Url::parse(url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid sitemap URL '{}': {}", url, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Sitemap URL '{}' must use http or https",
            url
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.conn_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "conn-limit must be >= 1, got {}",
            config.conn_limit
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.limit == Some(0) {
        return Err(ConfigError::Validation(
            "limit must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates screenshot configuration
fn validate_screenshot_config(config: &ScreenshotConfig) -> Result<(), ConfigError> {
    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output-dir cannot be empty".to_string(),
        ));
    }

    if config.browser.trim().is_empty() {
        return Err(ConfigError::Validation(
            "browser cannot be empty".to_string(),
        ));
    }

    if config.window_width == 0 {
        return Err(ConfigError::Validation(
            "window-width must be >= 1".to_string(),
        ));
    }

    Ok(())
}
