//! The structured result printed for every command.
//!
//! Exactly one of these crosses the process boundary per invocation, as a
//! single JSON line on stdout:
//!
//! ```text
//! {"success":true,"message":"..."}
//! {"success":false,"error":"..."}
//! ```

use std::process::ExitCode;

use serde::{Deserialize, Serialize};

/// Outcome of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: &impl core::fmt::Display) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.to_string()),
        }
    }

    /// Serialise as the single result line (no trailing newline).
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// `0` for success, `1` for any failure.
    pub fn exit_code(&self) -> ExitCode {
        if self.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

impl<E: core::fmt::Display> From<Result<String, E>> for OperationResult {
    fn from(result: Result<String, E>) -> Self {
        match result {
            Ok(message) => Self::ok(message),
            Err(e) => Self::failed(&e),
        }
    }
}
