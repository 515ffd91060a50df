use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{operation} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        last: Box<Error>,
    },

    #[error("required account not found: {0}")]
    AccountNotFound(String),

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("no API credentials: set TWITTER_BEARER_TOKEN or pass --follows-csv")]
    MissingCredentials,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Rate limits, server errors and transport failures are transient; a
    /// bad credential or an unknown account is not going to change after a
    /// sleep.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) => true,
            Error::Api { status, .. } => !matches!(status, 400 | 401 | 403 | 404),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_server_errors_are_retryable() {
        let limited = Error::Api {
            status: 429,
            body: "Rate limit exceeded".into(),
        };
        let unavailable = Error::Api {
            status: 503,
            body: String::new(),
        };
        assert!(limited.is_retryable());
        assert!(unavailable.is_retryable());
    }

    #[test]
    fn client_errors_are_final() {
        for status in [400, 401, 403, 404] {
            let err = Error::Api {
                status,
                body: String::new(),
            };
            assert!(!err.is_retryable(), "status {status}");
        }
        assert!(!Error::AccountNotFound("x".into()).is_retryable());
    }
}
