//! DTOs for health check endpoint.

use serde::Serialize;

/// Health check response with component status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// Health status for each system component.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub notification_queue: CheckStatus,
    pub storage: CheckStatus,
    pub payments: CheckStatus,
    pub email: CheckStatus,
}

impl HealthChecks {
    /// A component reported as `disabled` is intentionally off and does not
    /// degrade the service; only `error` does.
    pub fn all_healthy(&self) -> bool {
        [
            &self.database,
            &self.notification_queue,
            &self.storage,
            &self.payments,
            &self.email,
        ]
        .iter()
        .all(|c| c.status != CheckStatus::ERROR)
    }
}

/// Individual component health status.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    pub const OK: &'static str = "ok";
    pub const DISABLED: &'static str = "disabled";
    pub const ERROR: &'static str = "error";

    pub fn ok(message: impl Into<String>) -> Self {
        Self::with(Self::OK, message)
    }

    pub fn disabled(message: impl Into<String>) -> Self {
        Self::with(Self::DISABLED, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with(Self::ERROR, message)
    }

    fn with(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: Some(message.into()),
        }
    }
}
