//! Wire DTOs for rejected requests

use serde::Serialize;

/// JSON body for 403/429 responses: `{ error, message, status }`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    pub status: u16,
}

impl ErrorBody {
    /// Body for a probe rejection (403). The message stays generic so the
    /// response does not reveal which rule matched.
    pub fn forbidden() -> Self {
        Self {
            error: "Forbidden".to_string(),
            message: "Request blocked".to_string(),
            status: 403,
        }
    }

    /// Body for a throttled request (429)
    pub fn throttled() -> Self {
        Self {
            error: "Too Many Requests".to_string(),
            message: "Request limit exceeded, slow down".to_string(),
            status: 429,
        }
    }
}
