/// Structured error types for upstream gateway failures
///
/// API clients classify failures so the pipeline can decide what is worth a
/// warning versus a silent fallback. Pipeline boundaries convert these to
/// string errors via Display.

#[derive(Debug, Clone)]
pub enum GatewayError {
    /// Request exceeded the per-request timeout
    Timeout { endpoint: String, timeout_ms: u64 },

    /// Upstream returned a non-success HTTP status
    HttpStatus {
        endpoint: String,
        status: u16,
        body: Option<String>,
    },

    /// Connection level failure (DNS, TLS, refused)
    Network { endpoint: String, message: String },

    /// Response body could not be decoded
    Parse { endpoint: String, message: String },
}

impl GatewayError {
    pub fn from_reqwest(endpoint: &str, timeout_ms: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout {
                endpoint: endpoint.to_string(),
                timeout_ms,
            }
        } else if err.is_decode() {
            GatewayError::Parse {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            GatewayError::HttpStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: None,
            }
        } else {
            GatewayError::Network {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// True for failures that are expected to clear on the next cycle
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Timeout { .. } | GatewayError::Network { .. } => true,
            GatewayError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            GatewayError::Parse { .. } => false,
        }
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::Timeout {
                endpoint,
                timeout_ms,
            } => write!(f, "Timeout after {}ms calling {}", timeout_ms, endpoint),
            GatewayError::HttpStatus {
                endpoint,
                status,
                body,
            } => write!(
                f,
                "HTTP {} from {}: {}",
                status,
                endpoint,
                body.as_deref().unwrap_or("no body")
            ),
            GatewayError::Network { endpoint, message } => {
                write!(f, "Network error calling {}: {}", endpoint, message)
            }
            GatewayError::Parse { endpoint, message } => {
                write!(f, "Failed to parse response from {}: {}", endpoint, message)
            }
        }
    }
}

impl std::error::Error for GatewayError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        let timeout = GatewayError::Timeout {
            endpoint: "x".into(),
            timeout_ms: 10_000,
        };
        assert!(timeout.is_transient());

        let rate_limited = GatewayError::HttpStatus {
            endpoint: "x".into(),
            status: 429,
            body: None,
        };
        assert!(rate_limited.is_transient());

        let not_found = GatewayError::HttpStatus {
            endpoint: "x".into(),
            status: 404,
            body: None,
        };
        assert!(!not_found.is_transient());
    }
}
