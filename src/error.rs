use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("incorrect password")]
    Auth,

    #[error("message not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}

impl AppError {
    /// Text shown to the person at the keyboard. Store failures are phrased as
    /// transient so the action can simply be retried.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Auth => "Incorrect password".to_string(),
            AppError::NotFound(_) => "That message no longer exists. Refresh and try again.".to_string(),
            AppError::StoreUnavailable(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlx_errors_map_to_store_unavailable() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
    }

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = AppError::Validation("Please write a message".to_string());
        assert_eq!(err.user_message(), "Please write a message");
    }
}
