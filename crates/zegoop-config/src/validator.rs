//! Configuration validation.

use crate::schema::Config;

/// Provider ids the gateway knows how to call.
const KNOWN_PROVIDERS: [&str; 3] = ["openai", "anthropic", "gemini"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_storage(config, &mut result);
        Self::validate_surfaces(config, &mut result);
        Self::validate_providers(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        if config.storage.path.trim().is_empty() {
            result.add_error(ValidationError::new(
                "storage.path",
                "Storage path cannot be empty",
            ));
        }
    }

    fn validate_surfaces(config: &Config, result: &mut ValidationResult) {
        let surfaces = &config.surfaces;

        if surfaces.hover_delay_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "surfaces.hover_delay_ms",
                "A zero hover delay sends a lookup for every word the pointer crosses",
            ));
        }

        if surfaces.tooltip_dismiss_ms == 0 {
            result.add_error(ValidationError::new(
                "surfaces.tooltip_dismiss_ms",
                "tooltip_dismiss_ms must be greater than 0",
            ));
        }

        if surfaces.action_menu_dismiss_ms == 0 {
            result.add_error(ValidationError::new(
                "surfaces.action_menu_dismiss_ms",
                "action_menu_dismiss_ms must be greater than 0",
            ));
        }
    }

    fn validate_providers(config: &Config, result: &mut ValidationResult) {
        for (id, provider) in &config.providers {
            if !KNOWN_PROVIDERS.contains(&id.as_str()) {
                result.add_warning(ValidationWarning::new(
                    format!("providers.{}", id),
                    "Unknown provider, overrides will be ignored",
                ));
            }

            if let Some(url) = &provider.base_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    result.add_error(ValidationError::new(
                        format!("providers.{}.base_url", id),
                        "base_url must start with http:// or https://",
                    ));
                }
            }

            if provider.max_tokens == Some(0) {
                result.add_error(ValidationError::new(
                    format!("providers.{}.max_tokens", id),
                    "max_tokens must be greater than 0",
                ));
            }

            if let Some(temperature) = provider.temperature {
                if !(0.0..=2.0).contains(&temperature) {
                    result.add_warning(ValidationWarning::new(
                        format!("providers.{}.temperature", id),
                        "temperature outside 0.0..=2.0 may be rejected by the API",
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
