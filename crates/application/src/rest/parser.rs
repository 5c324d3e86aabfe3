//! Response parsing

use rhc_domain::{BrokerError, Envelope, Message, Payload, RawResponse};

use super::error_mapper::error_for_response;

/// A successful broker response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedResponse {
    /// Hydrated payload; `None` for 204 No Content.
    pub payload: Option<Payload>,
    /// Messages that accompanied the payload.
    pub messages: Vec<Message>,
    /// API version the broker answered with.
    pub api_version: Option<serde_json::Value>,
    /// API versions the broker supports.
    pub supported_api_versions: Vec<serde_json::Value>,
}

impl ParsedResponse {
    /// Texts of the messages with the given severities, in order.
    #[must_use]
    pub fn texts_with(&self, severities: &[rhc_domain::Severity]) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|m| m.severity().is_some_and(|s| severities.contains(&s)))
            .filter_map(|m| m.text.as_deref())
            .collect()
    }
}

/// Interprets a transport response.
///
/// # Errors
///
/// Returns the mapped [`BrokerError`] for non-2xx statuses, and a
/// `ResourceAccess` error when a success body cannot be decoded.
pub fn interpret(response: &RawResponse) -> Result<ParsedResponse, BrokerError> {
    if !response.is_success() {
        return Err(error_for_response(response.status, &response.body));
    }
    if response.is_no_content() {
        return Ok(ParsedResponse::default());
    }

    let envelope = Envelope::from_slice(&response.body).map_err(|e| parse_failure(response, &e))?;
    let payload = Payload::from_envelope(&envelope).map_err(|e| parse_failure(response, &e))?;

    tracing::debug!(
        status = response.status,
        payload = payload.type_name(),
        messages = envelope.messages.len(),
        "parsed broker response"
    );

    Ok(ParsedResponse {
        payload: Some(payload),
        messages: envelope.messages,
        api_version: envelope.api_version,
        supported_api_versions: envelope.supported_api_versions,
    })
}

fn parse_failure(response: &RawResponse, error: &serde_json::Error) -> BrokerError {
    BrokerError::resource_access(format!(
        "Failed to parse the response from the server: {error}"
    ))
    .with_status(response.status)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rhc_domain::{Domain, ErrorKind, FromPayload, Severity};

    #[test]
    fn test_no_content_skips_decoding() {
        let parsed = interpret(&RawResponse::with_body(204, "this is not json")).unwrap();
        assert!(parsed.payload.is_none());
        assert!(parsed.messages.is_empty());
    }

    #[test]
    fn test_recognised_type_is_hydrated() {
        let parsed = interpret(&RawResponse::with_body(
            200,
            r#"{"type":"domain","data":{"id":"myns"},"messages":[{"severity":"info","text":"ok"}],"api_version":1.6}"#,
        ))
        .unwrap();
        let domain = Domain::from_payload(parsed.payload.clone().unwrap()).unwrap();
        assert_eq!(domain.id, "myns");
        assert_eq!(parsed.texts_with(&[Severity::Info]), vec!["ok"]);
        assert_eq!(parsed.api_version, Some(serde_json::json!(1.6)));
    }

    #[test]
    fn test_unrecognised_type_returns_data() {
        let parsed = interpret(&RawResponse::with_body(
            200,
            r#"{"type":"future-thing","data":{"x":[1]}}"#,
        ))
        .unwrap();
        assert_eq!(
            parsed.payload,
            Some(Payload::Raw(serde_json::json!({"x": [1]})))
        );
    }

    #[test]
    fn test_invalid_json_is_resource_access() {
        let error = interpret(&RawResponse::with_body(200, "<html>")).unwrap_err();
        assert_eq!(error.kind, ErrorKind::ResourceAccess);
        assert_eq!(error.status, Some(200));
        assert!(error.message.starts_with("Failed to parse the response"));
    }

    #[test]
    fn test_data_not_matching_type_is_resource_access() {
        let error = interpret(&RawResponse::with_body(
            201,
            r#"{"type":"domains","data":"nope"}"#,
        ))
        .unwrap_err();
        assert_eq!(error.kind, ErrorKind::ResourceAccess);
    }

    #[test]
    fn test_error_status_is_mapped() {
        let error = interpret(&RawResponse::with_body(
            404,
            r#"{"messages":[{"severity":"error","text":"not found"}]}"#,
        ))
        .unwrap_err();
        assert_eq!(error.kind, ErrorKind::ResourceNotFound);
        assert_eq!(error.message, "not found");
    }
}
