use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Startup-time template configuration problems. Always fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Default template {template:?} has no {placeholder} placeholder")]
    MissingPlaceholder {
        template: String,
        placeholder: &'static str,
    },

    #[error("Template must be non-empty")]
    EmptyTemplate,
}
