use std::fmt;

/// Failure talking to the remote document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Connection(String),
    #[error("store responded with HTTP {status}")]
    Status { status: u16 },
    #[error("unexpected store payload: {0}")]
    Decode(String),
    #[error("record not found")]
    NotFound,
    #[error("store client error: {0}")]
    Client(String),
}

impl StoreError {
    pub fn category(&self) -> FailureCategory {
        match self {
            StoreError::Connection(_) => FailureCategory::NoConnection,
            StoreError::Status { status } => FailureCategory::Server(*status),
            StoreError::Decode(_) | StoreError::NotFound | StoreError::Client(_) => {
                FailureCategory::Unknown
            }
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            StoreError::Status {
                status: status.as_u16(),
            }
        } else if err.is_connect() || err.is_timeout() || err.is_request() {
            StoreError::Connection(err.to_string())
        } else if err.is_decode() || err.is_body() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Client(err.to_string())
        }
    }
}

/// User-facing bucket for a store failure, shown as transient status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    NoConnection,
    Server(u16),
    Unknown,
}

impl FailureCategory {
    pub fn status_text(self) -> String {
        match self {
            FailureCategory::NoConnection => {
                "Failed: check your internet connection".to_string()
            }
            FailureCategory::Server(code) => format!("Failed: server problem ({code})"),
            FailureCategory::Unknown => "Failed: something went wrong".to_string(),
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_user_facing_categories() {
        assert_eq!(
            StoreError::Connection("refused".to_string()).category(),
            FailureCategory::NoConnection
        );
        assert_eq!(
            StoreError::Status { status: 503 }.category(),
            FailureCategory::Server(503)
        );
        assert_eq!(StoreError::NotFound.category(), FailureCategory::Unknown);
        assert_eq!(
            FailureCategory::Server(500).status_text(),
            "Failed: server problem (500)"
        );
    }
}
