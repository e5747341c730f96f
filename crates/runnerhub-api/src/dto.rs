//! Request and response DTOs.
//!
//! This module is the single ms↔s conversion boundary: the external
//! contract expresses durations in milliseconds, the core works in seconds
//! everywhere.

use serde::{Deserialize, Serialize};

use runnerhub_core::error::AppError;
use runnerhub_core::types::ProjectId;
use runnerhub_lease::DurationChange;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Body of `POST /api/sessions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSessionBody {
    /// The project the session is requested for.
    pub project_id: ProjectId,
}

/// Body of `PUT /api/admin/duration`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDurationBody {
    /// New platform-wide lease duration in milliseconds. Must be a whole
    /// number of seconds.
    pub duration_ms: u64,
}

impl SetDurationBody {
    /// Converts the external milliseconds value into core seconds.
    pub fn duration_secs(&self) -> Result<u64, AppError> {
        if self.duration_ms == 0 || self.duration_ms % 1000 != 0 {
            return Err(AppError::validation(
                "duration_ms must be a positive whole number of seconds",
            ));
        }
        Ok(self.duration_ms / 1000)
    }
}

/// Response of `PUT /api/admin/duration`, in external milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationChangeResponse {
    /// Previous duration in milliseconds.
    pub previous_ms: u64,
    /// New duration in milliseconds.
    pub new_ms: u64,
}

impl From<DurationChange> for DurationChangeResponse {
    fn from(change: DurationChange) -> Self {
        Self {
            previous_ms: change.previous_secs * 1000,
            new_ms: change.new_secs * 1000,
        }
    }
}

/// Response carrying a count of affected records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Records affected.
    pub count: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}
