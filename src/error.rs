use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CostError {
    // IO-related errors
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Data processing errors
    #[error("Failed to parse JSON: {context}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize JSON: {context}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse JSON from stdin")]
    StdinJsonParse(#[from] serde_json::Error),

    #[error("Invalid pricing table: {message}")]
    InvalidPricing { message: String },

    // Configuration errors
    #[error("Invalid value '{value}' for environment variable '{var}'")]
    InvalidConfig { var: String, value: String },

    // Record source failures
    #[error("Failed to fetch records for conversation '{conversation_id}': {message}")]
    RecordSource {
        conversation_id: String,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, CostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_error_message() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = CostError::JsonSerialize {
            context: "cost output".to_string(),
            source,
        };
        assert_eq!(err.to_string(), "Failed to serialize JSON: cost output");
    }
}
