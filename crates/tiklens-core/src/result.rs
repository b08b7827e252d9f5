// ── Connection result ──
//
// The single value an acquisition attempt produces. Transport errors are
// folded in here with a structured kind; nothing escapes as an `Err`.

use serde::Serialize;

use tiklens_api::{ConnectResponse, Error, RouterData};

/// Why an attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network-level failure or no usable login endpoint.
    Unreachable,
    /// Credentials rejected.
    Authentication,
    /// A response arrived but could not be decoded.
    MalformedResponse,
    /// Router REST API or intermediary reported an error.
    Backend,
    /// The transport timeout elapsed.
    Timeout,
    /// The request could not be formed (empty or invalid host, bad URL).
    InvalidRequest,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionResult {
    Success(RouterData),
    Failure { kind: FailureKind, message: String },
}

impl ConnectionResult {
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { message, .. } => Some(message),
        }
    }
}

impl From<&Error> for FailureKind {
    fn from(err: &Error) -> Self {
        match err {
            Error::Authentication { .. } => Self::Authentication,
            Error::Timeout { .. } => Self::Timeout,
            Error::Transport(e) if e.is_timeout() => Self::Timeout,
            Error::Unreachable { .. } => Self::Unreachable,
            Error::Transport(e) if e.is_connect() || e.is_request() => Self::Unreachable,
            Error::Deserialization { .. } => Self::MalformedResponse,
            Error::Transport(e) if e.is_decode() || e.is_body() => Self::MalformedResponse,
            Error::Backend { .. } => Self::Backend,
            Error::Transport(e) if e.is_status() => Self::Backend,
            Error::InvalidUrl(_) | Error::InvalidHost { .. } | Error::Tls(_) => Self::InvalidRequest,
            Error::Transport(e) if e.is_builder() => Self::InvalidRequest,
            Error::Transport(_) => Self::Unknown,
        }
    }
}

impl From<Result<RouterData, Error>> for ConnectionResult {
    fn from(result: Result<RouterData, Error>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Failure {
                kind: FailureKind::from(&err),
                message: failure_message(err),
            },
        }
    }
}

/// Backend errors carry text meant for the user as-is; everything else
/// uses the error's display form.
fn failure_message(err: Error) -> String {
    match err {
        Error::Backend { message, .. } => message,
        other => other.to_string(),
    }
}

/// Mirror a result as the intermediary's `/api/connect` envelope.
impl From<ConnectionResult> for ConnectResponse {
    fn from(result: ConnectionResult) -> Self {
        match result {
            ConnectionResult::Success(data) => ConnectResponse::ok(data),
            ConnectionResult::Failure { message, .. } => ConnectResponse::failed(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_kinds() {
        let cases = [
            (
                Error::Authentication {
                    message: "invalid credentials".into(),
                },
                FailureKind::Authentication,
            ),
            (
                Error::Unreachable {
                    url: "http://10.0.0.1:8728/login".into(),
                    reason: "404".into(),
                },
                FailureKind::Unreachable,
            ),
            (
                Error::Timeout {
                    timeout: std::time::Duration::from_secs(30),
                },
                FailureKind::Timeout,
            ),
            (
                Error::Backend {
                    status: Some(500),
                    message: "internal".into(),
                },
                FailureKind::Backend,
            ),
            (
                Error::Deserialization {
                    message: "expected value".into(),
                    body: "<html>".into(),
                },
                FailureKind::MalformedResponse,
            ),
            (
                Error::InvalidUrl(url::ParseError::EmptyHost),
                FailureKind::InvalidRequest,
            ),
            (
                Error::InvalidHost {
                    host: "10.0.0.1:8080".into(),
                    reason: "set the port with --auth-port",
                },
                FailureKind::InvalidRequest,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(FailureKind::from(&err), expected, "for {err}");
        }
    }

    #[test]
    fn failure_keeps_error_text() {
        let result = ConnectionResult::from(Err::<RouterData, _>(Error::Backend {
            status: None,
            message: "router said no".into(),
        }));
        assert!(!result.is_success());
        assert_eq!(result.message(), Some("router said no"));
    }

    #[test]
    fn mirrors_into_connect_envelope() {
        let response = ConnectResponse::from(ConnectionResult::failure(
            FailureKind::Unreachable,
            "no route",
        ));
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("no route"));

        let response = ConnectResponse::from(ConnectionResult::Success(RouterData::default()));
        assert!(response.success);
        assert_eq!(response.data, Some(RouterData::default()));
    }
}
