//! HTTP status to broker error mapping
//!
//! | Status | Kind | Message selection |
//! |---|---|---|
//! | 401 | `Unauthorized` | always |
//! | 403 | `RequestDenied` | first `ERROR` message, text only |
//! | 404 | `ResourceNotFound` | first `ERROR` message |
//! | 409 | `Validation` | first `ERROR` message |
//! | 422 | `Validation` | consecutive messages with the same field are joined |
//! | 400 | `ClientError` | first `ERROR` message |
//! | 500 | `ServerError` | first `ERROR` message |
//! | 503 | `ServiceUnavailable` | first `ERROR` message |
//! | other | `ResourceAccess` | generic, includes the status |

use rhc_domain::{BrokerError, Envelope, ErrorKind, Message};

/// Messages from an error body; an unparsable body yields none.
#[must_use]
pub fn error_messages(body: &[u8]) -> Vec<Message> {
    match Envelope::from_slice(body) {
        Ok(envelope) => envelope.messages,
        Err(e) => {
            tracing::debug!(error = %e, "error response body is not a broker envelope");
            Vec::new()
        }
    }
}

/// Maps an error response following the status table.
///
/// Returns `None` when a 400/403/404/409/500/503 body carries no message
/// of severity `ERROR`; [`error_for_response`] decides what to raise then.
#[must_use]
pub fn map_error(status: u16, body: &[u8]) -> Option<BrokerError> {
    let messages = error_messages(body);
    let first_error = || messages.iter().find(|m| m.is_error());

    let error = match status {
        401 => Some(BrokerError::new(ErrorKind::Unauthorized, "Not authenticated")),
        403 => first_error()
            .map(|m| BrokerError::new(ErrorKind::RequestDenied, m.text_or_empty())),
        404 => first_error().map(|m| from_message(ErrorKind::ResourceNotFound, m)),
        409 => first_error().map(|m| {
            BrokerError::validation(m.text_or_empty(), m.field.clone()).with_code(m.exit_code)
        }),
        422 => Some(aggregate_validation(&messages)),
        400 => first_error().map(|m| from_message(ErrorKind::ClientError, m)),
        500 => first_error().map(|m| from_message(ErrorKind::ServerError, m)),
        503 => first_error().map(|m| from_message(ErrorKind::ServiceUnavailable, m)),
        other => Some(BrokerError::resource_access(format!(
            "Server returned an unexpected error code: {other}"
        ))),
    };

    error.map(|e| e.with_status(status))
}

/// Maps an error response, never failing to produce an error.
///
/// When [`map_error`] finds no `ERROR` message, the status still selects
/// the kind and the message names the status.
#[must_use]
pub fn error_for_response(status: u16, body: &[u8]) -> BrokerError {
    map_error(status, body).unwrap_or_else(|| {
        tracing::debug!(status, "error response carried no ERROR message");
        BrokerError::new(
            kind_for_status(status),
            format!("The server returned an error ({status}) without an explanation."),
        )
        .with_status(status)
    })
}

/// Error kind implied by a status code alone.
#[must_use]
pub const fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        401 => ErrorKind::Unauthorized,
        403 => ErrorKind::RequestDenied,
        404 => ErrorKind::ResourceNotFound,
        409 | 422 => ErrorKind::Validation,
        400 => ErrorKind::ClientError,
        500 => ErrorKind::ServerError,
        503 => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::ResourceAccess,
    }
}

fn from_message(kind: ErrorKind, message: &Message) -> BrokerError {
    BrokerError::new(kind, message.text_or_empty()).with_code(message.exit_code)
}

/// Joins runs of messages that share a field; the last run is raised.
fn aggregate_validation(messages: &[Message]) -> BrokerError {
    let mut current: Option<BrokerError> = None;
    for message in messages {
        if let Some(error) = current.as_mut().filter(|e| e.field == message.field) {
            error.append(message.text_or_empty());
            continue;
        }
        current = Some(
            BrokerError::validation(message.text_or_empty(), message.field.clone())
                .with_code(message.exit_code),
        );
    }
    current.unwrap_or_else(|| BrokerError::validation("The request was not valid.", None))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_401_ignores_body() {
        let bodies: [&[u8]; 3] = [
            b"",
            b"not json",
            br#"{"messages":[{"severity":"error","text":"x"}]}"#,
        ];
        for body in bodies {
            let error = map_error(401, body).unwrap();
            assert_eq!(error.kind, ErrorKind::Unauthorized);
            assert_eq!(error.status, Some(401));
        }
    }

    #[test]
    fn test_404_uses_first_error_message() {
        let body = br#"{"messages":[{"severity":"info","text":"ignored"},{"severity":"error","text":"not found","exit_code":101},{"severity":"error","text":"second"}]}"#;
        let error = map_error(404, body).unwrap();
        assert_eq!(error.kind, ErrorKind::ResourceNotFound);
        assert_eq!(error.message, "not found");
        assert_eq!(error.code, Some(101));
    }

    #[test]
    fn test_severity_is_upcased() {
        let body = br#"{"messages":[{"severity":"Error","text":"denied","exit_code":5}]}"#;
        let error = map_error(403, body).unwrap();
        assert_eq!(error.kind, ErrorKind::RequestDenied);
        assert_eq!(error.message, "denied");
        // 403 keeps the text only
        assert_eq!(error.code, None);
    }

    #[test]
    fn test_409_validation_carries_field() {
        let body = br#"{"messages":[{"severity":"error","text":"taken","field":"id","exit_code":103}]}"#;
        let error = map_error(409, body).unwrap();
        assert_eq!(error.kind, ErrorKind::Validation);
        assert_eq!(error.field.as_deref(), Some("id"));
        assert_eq!(error.code, Some(103));
    }

    #[test]
    fn test_422_joins_messages_for_same_field() {
        let body = br#"{"messages":[
            {"field":"name","text":"too short"},
            {"field":"name","text":"must be alphanumeric"}]}"#;
        let error = map_error(422, body).unwrap();
        assert_eq!(error.kind, ErrorKind::Validation);
        assert_eq!(error.field.as_deref(), Some("name"));
        assert_eq!(error.message, "too short must be alphanumeric");
    }

    #[test]
    fn test_422_raises_last_run() {
        let body = br#"{"messages":[
            {"field":"name","text":"too short"},
            {"field":"scale","text":"not a boolean"},
            {"field":"scale","text":"really"}]}"#;
        let error = map_error(422, body).unwrap();
        assert_eq!(error.field.as_deref(), Some("scale"));
        assert_eq!(error.message, "not a boolean really");
    }

    #[test]
    fn test_422_without_messages() {
        let error = map_error(422, b"").unwrap();
        assert_eq!(error.kind, ErrorKind::Validation);
        assert!(error.field.is_none());
    }

    #[test]
    fn test_status_kinds() {
        let body = br#"{"messages":[{"severity":"ERROR","text":"boom"}]}"#;
        assert_eq!(map_error(400, body).unwrap().kind, ErrorKind::ClientError);
        assert_eq!(map_error(500, body).unwrap().kind, ErrorKind::ServerError);
        assert_eq!(
            map_error(503, body).unwrap().kind,
            ErrorKind::ServiceUnavailable
        );
    }

    #[test]
    fn test_unexpected_status() {
        let error = map_error(418, b"").unwrap();
        assert_eq!(error.kind, ErrorKind::ResourceAccess);
        assert!(error.message.contains("418"));
    }

    #[test]
    fn test_no_error_message_falls_through() {
        let body = br#"{"messages":[{"severity":"warning","text":"hmm"}]}"#;
        for status in [400, 403, 404, 409, 500, 503] {
            assert!(map_error(status, body).is_none(), "status {status}");
        }
        assert!(map_error(500, b"<html>oops</html>").is_none());
    }

    #[test]
    fn test_error_for_response_resolves_fallthrough() {
        let error = error_for_response(503, b"<html>maintenance</html>");
        assert_eq!(error.kind, ErrorKind::ServiceUnavailable);
        assert_eq!(error.status, Some(503));
        assert!(error.message.contains("503"));

        let error = error_for_response(404, br#"{"messages":[{"severity":"error","text":"gone"}]}"#);
        assert_eq!(error.message, "gone");
    }
}
