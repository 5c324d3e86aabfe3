//! Broker transport implementation using reqwest.
//!
//! This adapter implements the `Transport` port. Every HTTP response is
//! returned as is, whatever its status; only failures to get a response
//! become errors, classified so the retry policy can tell transient ones
//! apart.

use std::error::Error as StdError;
use std::io;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use rhc_application::ports::{Transport, TransportError};
use rhc_domain::{BrokerRequest, Credentials, HttpMethod, RawResponse};

/// Timeout applied when neither the request nor the config sets one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for [`ReqwestTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Default request timeout.
    pub timeout: Duration,
    /// User-Agent header.
    pub user_agent: String,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("rhc/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP transport backed by `reqwest::Client`.
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(options: &TransportOptions) -> Result<Self, TransportError> {
        if options.insecure {
            tracing::warn!("TLS certificate verification is disabled");
        }
        let client = Client::builder()
            .user_agent(options.user_agent.clone())
            .danger_accept_invalid_certs(options.insecure)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self {
            client,
            timeout: options.timeout,
        })
    }

    /// Creates a transport around an existing client.
    #[must_use]
    pub const fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Target URL with GET/DELETE parameters appended to the query.
    fn target_url(request: &BrokerRequest) -> Result<Url, TransportError> {
        let mut url = request
            .parse_url()
            .map_err(|e| TransportError::InvalidRequest(format!("{e}: {}", request.url)))?;
        if !request.method.form_encoded() && !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.params);
        }
        Ok(url)
    }

    /// Form body for POST/PUT/PATCH parameters.
    fn form_body(request: &BrokerRequest) -> Result<Option<String>, TransportError> {
        if !request.method.form_encoded() || request.params.is_empty() {
            return Ok(None);
        }
        serde_urlencoded::to_string(&request.params)
            .map(Some)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))
    }

    /// Classifies a reqwest failure.
    fn map_error(error: &reqwest::Error) -> TransportError {
        let message = error_chain(error);
        let lower = message.to_lowercase();

        if error.is_timeout() {
            return TransportError::Timeout(message);
        }
        if lower.contains("certificate") {
            return TransportError::Certificate(message);
        }
        if lower.contains("tls") || lower.contains("ssl") || lower.contains("handshake") {
            return TransportError::Ssl(message);
        }
        if is_broken_connection(error) || lower.contains("connection closed before message completed")
        {
            return TransportError::ConnectionReset(message);
        }
        if error.is_connect() {
            return TransportError::Connect(message);
        }
        if error.is_builder() {
            return TransportError::InvalidRequest(message);
        }
        TransportError::Other(message)
    }
}

/// The error and its sources, joined with `: `.
fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn is_broken_connection(error: &(dyn StdError + 'static)) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(cause) = source {
        if let Some(io_error) = cause.downcast_ref::<io::Error>()
            && matches!(
                io_error.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
            )
        {
            return true;
        }
        source = cause.source();
    }
    false
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &BrokerRequest) -> Result<RawResponse, TransportError> {
        let url = Self::target_url(request)?;
        let timeout = request.timeout.unwrap_or(self.timeout);

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        builder = match &request.credentials {
            Some(Credentials::Basic { login, password }) => {
                builder.basic_auth(login, Some(password))
            }
            Some(Credentials::Token(token)) => builder.bearer_auth(token),
            None => builder,
        };

        if let Some(body) = Self::form_body(request)? {
            builder = builder
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(body);
        }

        let start = Instant::now();
        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;
        let status = response.status().as_u16();

        // Repeated headers (set-cookie) stay as separate entries.
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e))?
            .to_vec();

        Ok(RawResponse::new(status, headers, body).with_duration(start.elapsed()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_transport_creation() {
        assert!(ReqwestTransport::new(&TransportOptions::default()).is_ok());
        let insecure = TransportOptions {
            insecure: true,
            ..TransportOptions::default()
        };
        assert!(ReqwestTransport::new(&insecure).is_ok());
    }

    #[test]
    fn test_get_params_go_to_query() {
        let request = BrokerRequest::get("https://broker.test/broker/rest/cartridge/php")
            .with_param("include", "status_messages");
        let url = ReqwestTransport::target_url(&request).unwrap();
        assert_eq!(url.query(), Some("include=status_messages"));
        assert_eq!(ReqwestTransport::form_body(&request).unwrap(), None);
    }

    #[test]
    fn test_post_params_are_form_encoded() {
        let request = BrokerRequest::new(HttpMethod::Post, "https://broker.test/apps")
            .with_param("name", "my app")
            .with_param("cartridges[]", "php-5.4")
            .with_param("cartridges[]", "mysql-5.5");
        let url = ReqwestTransport::target_url(&request).unwrap();
        assert_eq!(url.query(), None);
        assert_eq!(
            ReqwestTransport::form_body(&request).unwrap().as_deref(),
            Some("name=my+app&cartridges%5B%5D=php-5.4&cartridges%5B%5D=mysql-5.5")
        );
    }

    #[test]
    fn test_invalid_url() {
        let request = BrokerRequest::get("not a url");
        assert!(matches!(
            ReqwestTransport::target_url(&request),
            Err(TransportError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_broken_connection_detection() {
        let reset = io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer");
        assert!(is_broken_connection(&reset));
        let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        assert!(!is_broken_connection(&refused));
    }
}
