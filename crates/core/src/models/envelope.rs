use serde::Deserialize;

use crate::errors::CoreError;

/// Wire shape shared by every insights endpoint:
/// `{ "success": bool, "data": T, "error": "...", "rate_limit_exceeded": bool }`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,

    pub data: Option<T>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub rate_limit_exceeded: bool,
}

/// Validated result of an API call. Every envelope maps to exactly one variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Success(T),
    Failure { error: String },
    RateLimited { message: String },
}

impl<T> ApiEnvelope<T> {
    pub fn into_outcome(self) -> ApiOutcome<T> {
        if self.rate_limit_exceeded {
            let message = self
                .error
                .or(self.message)
                .unwrap_or_else(|| "Daily limit reached".to_string());
            return ApiOutcome::RateLimited { message };
        }
        match (self.success, self.data) {
            (true, Some(data)) => ApiOutcome::Success(data),
            (true, None) => ApiOutcome::Failure {
                error: "Response reported success but carried no data".into(),
            },
            (false, _) => ApiOutcome::Failure {
                error: self
                    .error
                    .or(self.message)
                    .unwrap_or_else(|| "Unknown error".to_string()),
            },
        }
    }
}

impl<T> ApiOutcome<T> {
    /// Collapse into a `Result`, tagging failures with the endpoint that produced them.
    pub fn into_result(self, endpoint: &str) -> Result<T, CoreError> {
        match self {
            ApiOutcome::Success(data) => Ok(data),
            ApiOutcome::Failure { error } => Err(CoreError::Api {
                endpoint: endpoint.to_string(),
                message: error,
            }),
            ApiOutcome::RateLimited { message } => Err(CoreError::RateLimited { message }),
        }
    }
}
