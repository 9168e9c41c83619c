use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, ProfileEntry, RagConfig, OUTPUT_FORMATS,
};
use crate::profile::GENERIC_PROFILE;
use crate::url::compile_patterns;
use crate::ConfigError;
use std::collections::HashSet;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_rag_config(&config.rag)?;
    validate_profiles(&config.profiles)?;
    Ok(())
}

/// Validates crawler configuration
pub(crate) fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.retries < 1 {
        return Err(ConfigError::Validation(
            "retries must be >= 1 (it counts total attempts)".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    compile_patterns(&config.include_patterns)?;
    compile_patterns(&config.exclude_patterns)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if !OUTPUT_FORMATS.contains(&config.format.as_str()) {
        return Err(ConfigError::UnknownFormat(config.format.clone()));
    }

    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates chunking configuration
pub(crate) fn validate_rag_config(config: &RagConfig) -> Result<(), ConfigError> {
    if config.chunk_size == 0 {
        return Err(ConfigError::Validation(
            "chunk_size must be >= 1".to_string(),
        ));
    }

    if config.chunk_overlap >= config.chunk_size {
        return Err(ConfigError::Validation(format!(
            "chunk_overlap ({}) must be smaller than chunk_size ({})",
            config.chunk_overlap, config.chunk_size
        )));
    }

    if config.min_chunk_size > config.chunk_size {
        return Err(ConfigError::Validation(format!(
            "min_chunk_size ({}) cannot exceed chunk_size ({})",
            config.min_chunk_size, config.chunk_size
        )));
    }

    Ok(())
}

/// Validates user-defined profiles
fn validate_profiles(profiles: &[ProfileEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in profiles {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "profile name cannot be empty".to_string(),
            ));
        }

        if entry.name == GENERIC_PROFILE {
            return Err(ConfigError::Validation(format!(
                "profile name '{}' is reserved for the fallback profile",
                GENERIC_PROFILE
            )));
        }

        if !seen.insert(entry.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "profile '{}' is defined more than once",
                entry.name
            )));
        }

        if entry.content_selectors.is_empty() && entry.navigation_selectors.is_empty() {
            return Err(ConfigError::Validation(format!(
                "profile '{}' needs at least one content or navigation selector",
                entry.name
            )));
        }

        compile_patterns(&entry.url_patterns)?;
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
    fn test_concurrency_bounds() {
        let mut crawler = CrawlerConfig::default();
        crawler.concurrency = 0;
        assert!(validate_crawler_config(&crawler).is_err());
        crawler.concurrency = 101;
        assert!(validate_crawler_config(&crawler).is_err());
        crawler.concurrency = 100;
        assert!(validate_crawler_config(&crawler).is_ok());
    }

    #[test]
    fn test_zero_retries_rejected() {
        let mut crawler = CrawlerConfig::default();
        crawler.retries = 0;
        assert!(matches!(
            validate_crawler_config(&crawler),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let mut crawler = CrawlerConfig::default();
        crawler.exclude_patterns = vec!["(unclosed".to_string()];
        assert!(matches!(
            validate_crawler_config(&crawler),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_rag_overlap_must_be_smaller_than_chunk() {
        let mut rag = RagConfig::default();
        rag.chunk_overlap = rag.chunk_size;
        assert!(validate_rag_config(&rag).is_err());
    }

    #[test]
    fn test_rag_min_chunk_cannot_exceed_chunk() {
        let mut rag = RagConfig::default();
        rag.min_chunk_size = rag.chunk_size + 1;
        assert!(validate_rag_config(&rag).is_err());
    }

    #[test]
    fn test_profile_validation() {
        let valid = ProfileEntry {
            name: "wiki".to_string(),
            content_selectors: vec!["div.wiki".to_string()],
            ..Default::default()
        };
        assert!(validate_profiles(&[valid.clone()]).is_ok());

        let reserved = ProfileEntry {
            name: "generic".to_string(),
            ..valid.clone()
        };
        assert!(validate_profiles(&[reserved]).is_err());

        assert!(validate_profiles(&[valid.clone(), valid.clone()]).is_err());

        let no_selectors = ProfileEntry {
            name: "bare".to_string(),
            ..Default::default()
        };
        assert!(validate_profiles(&[no_selectors]).is_err());

        let bad_pattern = ProfileEntry {
            url_patterns: vec!["[".to_string()],
            ..valid
        };
        assert!(validate_profiles(&[bad_pattern]).is_err());
    }
}
