//! Shared response envelope types for API handlers.
//!
//! Every endpoint answers with `{ "data": ..., "message": ..., "status": ... }`.
//! `status` mirrors the HTTP status code as a string; handlers are
//! responsible for keeping the two consistent.

use serde::{Deserialize, Serialize};

const DEFAULT_MESSAGE: &str = "success";
const DEFAULT_STATUS: &str = "200";

/// Envelope around a single resource (or nothing).
///
/// # Example
///
/// ```ignore
/// Ok(Json(ApiResponse::success(Some(item), "get example success")))
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub message: String,
    pub status: String,
}

impl<T> ApiResponse<T> {
    /// A successful response with status `"200"`.
    pub fn success(data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            status: DEFAULT_STATUS.to_string(),
        }
    }

    /// An error response with no payload.
    pub fn error(message: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            data: None,
            message: message.into(),
            status: status.into(),
        }
    }

    /// Replace the status string.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Attach a payload, e.g. details for an error response.
    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }
}

impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self {
            data: None,
            message: DEFAULT_MESSAGE.to_string(),
            status: DEFAULT_STATUS.to_string(),
        }
    }
}

/// Envelope around a list of resources. `data` is never null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    pub message: String,
    pub status: String,
}

impl<T> ApiListResponse<T> {
    /// A successful list response with status `"200"`.
    pub fn success(data: Vec<T>, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            status: DEFAULT_STATUS.to_string(),
        }
    }

    /// Replace the status string.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

impl<T> Default for ApiListResponse<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            message: DEFAULT_MESSAGE.to_string(),
            status: DEFAULT_STATUS.to_string(),
        }
    }
}
