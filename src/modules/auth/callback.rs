use serde::Deserialize;

use crate::shared::error::{AppError, AppResult};

/// Query string the provider appends when redirecting back to us.
#[derive(Deserialize, Debug, Default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_code: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    pub fn extract_code(&self) -> AppResult<&str> {
        if let Some(error) = &self.error {
            tracing::info!(
                "Provider callback carried error {} ({:?})",
                error,
                self.error_code
            );
            return Err(AppError::AuthorizationDenied {
                error: error.clone(),
                description: self.error_description.clone(),
            });
        }

        match self.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Ok(code),
            _ => Err(AppError::BadRequest(
                "Missing authorization code".to_string(),
            )),
        }
    }
}
