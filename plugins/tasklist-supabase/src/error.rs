//! Error body decoding for the auth and rest endpoints.

use reqwest::StatusCode;
use serde::Deserialize;

use tasklist_core::auth::AuthError;
use tasklist_core::store::StoreError;

/// Auth endpoints answer with one of several shapes depending on the route.
#[derive(Debug, Default, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RestErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

pub(crate) fn auth_error(status: StatusCode, body: &str) -> AuthError {
    let parsed: AuthErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = [
        parsed.msg,
        parsed.error_description,
        parsed.message,
        parsed.error,
    ]
    .into_iter()
    .flatten()
    .find(|m| !m.trim().is_empty())
    .unwrap_or_else(|| format!("HTTP {}", status));
    AuthError::Rejected(message)
}

pub(crate) fn store_error(status: StatusCode, body: &str) -> StoreError {
    let parsed: RestErrorBody = serde_json::from_str(body).unwrap_or_default();
    StoreError::Remote {
        code: parsed.code,
        message: parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status)),
        details: parsed.details,
        hint: parsed.hint,
    }
}

pub(crate) fn auth_transport(err: reqwest::Error) -> AuthError {
    if err.is_decode() {
        AuthError::Serialization(err.to_string())
    } else {
        AuthError::Connection(err.to_string())
    }
}

pub(crate) fn store_transport(err: reqwest::Error) -> StoreError {
    if err.is_decode() {
        StoreError::Serialization(err.to_string())
    } else {
        StoreError::Connection(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_prefers_msg_then_description() {
        let err = auth_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"code":422,"error_code":"user_already_exists","msg":"User already registered"}"#,
        );
        assert_eq!(err.message(), "User already registered");

        let err = auth_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(err.message(), "Invalid login credentials");
    }

    #[test]
    fn test_auth_error_falls_back_to_status() {
        let err = auth_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.message(), "HTTP 502 Bad Gateway");
    }

    #[test]
    fn test_store_error_keeps_detail_fields() {
        let err = store_error(
            StatusCode::FORBIDDEN,
            r#"{"code":"42501","details":null,"hint":null,"message":"new row violates row-level security policy for table \"tasks\""}"#,
        );
        match err {
            StoreError::Remote {
                code,
                message,
                details,
                hint,
            } => {
                assert_eq!(code.as_deref(), Some("42501"));
                assert!(message.contains("row-level security"));
                assert!(details.is_none());
                assert!(hint.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_store_error_without_body() {
        let err = store_error(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.to_string(), "HTTP 503 Service Unavailable");
    }
}
