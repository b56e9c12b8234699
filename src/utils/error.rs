use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid definition {path}: {message}")]
    DefinitionError { path: String, message: String },
}

impl DeployError {
    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            DeployError::HttpError(e) if e.is_timeout() => {
                "The workspace did not respond in time".to_string()
            }
            DeployError::HttpError(e) if e.is_connect() => {
                "Could not connect to the workspace".to_string()
            }
            DeployError::HttpError(e) => format!("HTTP request failed: {}", e),
            DeployError::IoError(e) => format!("File system error: {}", e),
            DeployError::JsonError(e) => format!("Invalid JSON: {}", e),
            DeployError::YamlError(e) => format!("Invalid YAML: {}", e),
            DeployError::TomlError(e) => format!("Invalid TOML manifest: {}", e),
            DeployError::MissingConfigError { field } => {
                format!("{} not provided", field)
            }
            DeployError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
            DeployError::ApiError { status, .. } => {
                format!("Workspace API rejected the request ({})", status)
            }
            DeployError::DefinitionError { path, message } => {
                format!("Cannot use {}: {}", path, message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DeployError::HttpError(_) => {
                "Check the workspace URL and your network connection".to_string()
            }
            DeployError::IoError(_) => "Check that the path exists and is readable".to_string(),
            DeployError::JsonError(_) => {
                "Re-export the configuration and make sure it is valid JSON".to_string()
            }
            DeployError::YamlError(_) | DeployError::DefinitionError { .. } => {
                "Fix the definition file so it is a valid YAML mapping".to_string()
            }
            DeployError::TomlError(_) => "Fix the syntax of the manifest file".to_string(),
            DeployError::MissingConfigError { field } => match field.as_str() {
                "host" => "Use --host or set DATABRICKS_HOST".to_string(),
                "token" => "Use --token or set DATABRICKS_TOKEN".to_string(),
                other => format!("Provide a value for {}", other),
            },
            DeployError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value passed for {}", field)
            }
            DeployError::ApiError { status, .. } => match status {
                401 | 403 => "Check that the token is valid and has the required grants".to_string(),
                404 => "Check that the catalog, schema or endpoint exists".to_string(),
                _ => "Inspect the response body above for details".to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_suggests_env_var() {
        let err = DeployError::MissingConfigError {
            field: "token".to_string(),
        };
        assert_eq!(err.user_friendly_message(), "token not provided");
        assert!(err.recovery_suggestion().contains("DATABRICKS_TOKEN"));
    }

    #[test]
    fn test_api_error_suggestion_by_status() {
        let unauthorized = DeployError::ApiError {
            status: 403,
            body: "{}".to_string(),
        };
        assert!(unauthorized.recovery_suggestion().contains("token"));

        let missing = DeployError::ApiError {
            status: 404,
            body: String::new(),
        };
        assert!(missing.recovery_suggestion().contains("exists"));
    }
}
