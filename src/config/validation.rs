use crate::config::types::{
    Config, CrawlerConfig, PageSpeedConfig, ScoringConfig, StorageConfig, UserAgentConfig,
    WorkerConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_page_speed_config(&config.page_speed)?;
    validate_storage_config(&config.storage)?;
    validate_worker_config(&config.worker)?;
    validate_scoring_config(&config.scoring)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > 50 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and 50, got {}",
            config.max_pages
        )));
    }

    if config.fetch_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_ms must be >= 100ms, got {}ms",
            config.fetch_timeout_ms
        )));
    }

    if config.max_sitemap_urls < 1 {
        return Err(ConfigError::Validation(
            "max_sitemap_urls must be >= 1".to_string(),
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

/// Validates page-speed probe configuration
fn validate_page_speed_config(config: &PageSpeedConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid page-speed endpoint: {}", e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "page-speed endpoint must be http(s), got '{}'",
            config.endpoint
        )));
    }

    if config.strategy != "mobile" && config.strategy != "desktop" {
        return Err(ConfigError::Validation(format!(
            "page-speed strategy must be 'mobile' or 'desktop', got '{}'",
            config.strategy
        )));
    }

    if config.timeout_ms < 1000 {
        return Err(ConfigError::Validation(format!(
            "page-speed timeout_ms must be >= 1000ms, got {}ms",
            config.timeout_ms
        )));
    }

    if matches!(&config.api_key, Some(key) if key.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "page-speed api_key cannot be blank when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates worker configuration
fn validate_worker_config(config: &WorkerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_audits < 1 || config.max_concurrent_audits > 64 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_audits must be between 1 and 64, got {}",
            config.max_concurrent_audits
        )));
    }

    Ok(())
}

/// Validates scoring thresholds
fn validate_scoring_config(config: &ScoringConfig) -> Result<(), ConfigError> {
    if config.title_max_length < 1 {
        return Err(ConfigError::Validation(
            "title_max_length must be >= 1".to_string(),
        ));
    }

    if config.teaser_issue_count < 1 {
        return Err(ConfigError::Validation(
            "teaser_issue_count must be >= 1".to_string(),
        ));
    }

    Ok(())
}
