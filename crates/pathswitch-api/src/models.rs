//! API Models

use pathswitch_engine::{EngineConfig, EngineSnapshot};
use serde::{Deserialize, Serialize};

/// Standard API response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded
    pub success: bool,
    /// Payload on success
    pub data: Option<T>,
    /// Details on failure
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    /// Successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed response
    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

/// Engine snapshot together with the configuration it runs under
#[derive(Debug, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Engine state
    #[serde(flatten)]
    pub snapshot: EngineSnapshot,
    /// Live configuration
    pub config: EngineConfig,
}
