//! Broker client and link-following operations

use std::time::Duration;

use rhc_domain::{
    Application, BrokerError, BrokerRequest, Cartridge, Credentials, Deployment, Domain,
    EnvironmentVariable, ErrorKind, FromPayload, GearGroup, HttpMethod, Key, Link, Links,
    Payload, User,
};
use tokio::sync::OnceCell;

use super::parser::{ParsedResponse, interpret};
use super::retry::{RetryPolicy, transport_failure};
use super::session::SessionState;
use crate::ports::Transport;

const API_PATH: &str = "/broker/rest/api";

/// How to reach and authenticate against the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Broker host name, or a full API URL.
    pub server: String,
    /// Credentials sent with every request.
    pub credentials: Option<Credentials>,
    /// Per-request timeout; the transport default applies when `None`.
    pub timeout: Option<Duration>,
    /// Retry policy for transient transport failures.
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Creates a config for a server with no credentials.
    #[must_use]
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            credentials: None,
            timeout: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Sets the credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// URL of the API root document.
    ///
    /// A bare host becomes `https://<host>/broker/rest/api`; a value that
    /// already has a scheme is used as is.
    #[must_use]
    pub fn api_url(&self) -> String {
        let server = self.server.trim().trim_end_matches('/');
        if server.contains("://") {
            server.to_string()
        } else {
            format!("https://{server}{API_PATH}")
        }
    }
}

/// The broker's API root: top-level links and version information.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiRoot {
    /// Top-level operations (`GET_USER`, `LIST_DOMAINS`, ...).
    pub links: Links,
    /// API version the broker answered with.
    pub api_version: Option<serde_json::Value>,
    /// API versions the broker supports.
    pub supported_api_versions: Vec<serde_json::Value>,
}

/// Parameters for creating an application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewApplication {
    /// Application name.
    pub name: String,
    /// Cartridges to install.
    pub cartridges: Vec<String>,
    /// Create a scalable application.
    pub scale: bool,
    /// Gear size.
    pub gear_profile: Option<String>,
    /// Repository to seed the application from.
    pub initial_git_url: Option<String>,
}

impl NewApplication {
    /// An unscaled application with the given cartridges.
    #[must_use]
    pub fn new(name: impl Into<String>, cartridges: Vec<String>) -> Self {
        Self {
            name: name.into(),
            cartridges,
            ..Self::default()
        }
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("name".to_string(), self.name.clone())];
        params.extend(
            self.cartridges
                .iter()
                .map(|c| ("cartridges[]".to_string(), c.clone())),
        );
        if self.scale {
            params.push(("scale".to_string(), "true".to_string()));
        }
        if let Some(profile) = &self.gear_profile {
            params.push(("gear_profile".to_string(), profile.clone()));
        }
        if let Some(url) = &self.initial_git_url {
            params.push(("initial_git_url".to_string(), url.clone()));
        }
        params
    }
}

/// Lifecycle events for an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationEvent {
    /// Start every cartridge.
    Start,
    /// Stop gracefully.
    Stop,
    /// Kill every process.
    ForceStop,
    /// Stop then start.
    Restart,
    /// Reload configuration.
    Reload,
    /// Clean up logs and temporary files.
    Tidy,
}

impl ApplicationEvent {
    /// Link relation carrying the event.
    #[must_use]
    pub const fn rel(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Stop => "STOP",
            Self::ForceStop => "FORCE_STOP",
            Self::Restart => "RESTART",
            Self::Reload => "RELOAD",
            Self::Tidy => "TIDY",
        }
    }

    /// Value of the `event` parameter.
    #[must_use]
    pub const fn event(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::ForceStop => "force-stop",
            Self::Restart => "restart",
            Self::Reload => "reload",
            Self::Tidy => "tidy",
        }
    }
}

/// Lifecycle events for a single cartridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartridgeEvent {
    /// Start the cartridge.
    Start,
    /// Stop the cartridge.
    Stop,
    /// Restart the cartridge.
    Restart,
    /// Reload the cartridge configuration.
    Reload,
}

impl CartridgeEvent {
    /// Link relation carrying the event.
    #[must_use]
    pub const fn rel(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Stop => "STOP",
            Self::Restart => "RESTART",
            Self::Reload => "RELOAD",
        }
    }

    /// Value of the `event` parameter.
    #[must_use]
    pub const fn event(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Reload => "reload",
        }
    }
}

type Params = Vec<(String, String)>;

fn param(name: &str, value: impl Into<String>) -> (String, String) {
    (name.to_string(), value.into())
}

/// Client for the broker REST API.
///
/// Holds the session cookie and the cached API root. Every operation is a
/// single request that either yields the typed payload or a [`BrokerError`].
pub struct BrokerClient<T: Transport> {
    transport: T,
    config: ClientConfig,
    session: SessionState,
    api: OnceCell<ApiRoot>,
}

impl<T: Transport> BrokerClient<T> {
    /// Creates a client.
    #[must_use]
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            session: SessionState::new(),
            api: OnceCell::new(),
        }
    }

    /// The client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session cookie state.
    #[must_use]
    pub const fn session(&self) -> &SessionState {
        &self.session
    }

    /// Sends one request and interprets the response.
    ///
    /// # Errors
    ///
    /// Returns the mapped broker error, or a `Timeout`/`Connection`/
    /// `ResourceAccess` error when no response could be obtained.
    pub async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        params: Params,
    ) -> Result<ParsedResponse, BrokerError> {
        let mut request = BrokerRequest::new(method, url)
            .with_header("Accept", "application/json")
            .with_credentials(self.config.credentials.clone())
            .with_timeout(self.config.timeout);
        request.params = params;
        if let Some(cookie) = self.session.cookie_header() {
            request = request.with_header("Cookie", cookie);
        }

        tracing::debug!(method = %request.method, url = %request.url, "broker request");
        let response = self
            .config
            .retry
            .run(|attempt| {
                let request = &request;
                async move {
                    if attempt > 0 {
                        tracing::debug!(attempt, url = %request.url, "resending broker request");
                    }
                    self.transport.send(request).await
                }
            })
            .await
            .map_err(transport_failure)?;
        tracing::debug!(
            status = response.status,
            elapsed_ms = response.duration.as_millis(),
            "broker response"
        );

        self.session.capture(&response);
        interpret(&response)
    }

    /// Calls a link with its declared method.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn call(&self, link: &Link, params: Params) -> Result<ParsedResponse, BrokerError> {
        self.request(link.method, &link.href, params).await
    }

    async fn follow_unit(
        &self,
        links: &Links,
        rel: &str,
        params: Params,
    ) -> Result<ParsedResponse, BrokerError> {
        let link = find_link(links, rel)?;
        self.call(link, params).await
    }

    async fn follow<R: FromPayload>(
        &self,
        links: &Links,
        rel: &str,
        params: Params,
    ) -> Result<R, BrokerError> {
        let parsed = self.follow_unit(links, rel, params).await?;
        extract(parsed.payload, rel)
    }

    /// Fetches the API root once per client.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be fetched or is not a link table.
    pub async fn api(&self) -> Result<&ApiRoot, BrokerError> {
        self.api
            .get_or_try_init(|| async {
                let url = self.config.api_url();
                let parsed = self.request(HttpMethod::Get, &url, Vec::new()).await?;
                let links: Links = extract(parsed.payload, "API")?;
                tracing::debug!(links = links.len(), url = %url, "loaded API root");
                Ok::<_, BrokerError>(ApiRoot {
                    links,
                    api_version: parsed.api_version,
                    supported_api_versions: parsed.supported_api_versions,
                })
            })
            .await
    }

    /// The authenticated user.
    ///
    /// # Errors
    ///
    /// Fails when the broker rejects the credentials.
    pub async fn user(&self) -> Result<User, BrokerError> {
        let api = self.api().await?;
        self.follow(&api.links, "GET_USER", Vec::new()).await
    }

    /// Domains the user can access.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn domains(&self) -> Result<Vec<Domain>, BrokerError> {
        let api = self.api().await?;
        self.follow(&api.links, "LIST_DOMAINS", Vec::new()).await
    }

    /// A domain by namespace, compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when no domain matches.
    pub async fn find_domain(&self, namespace: &str) -> Result<Domain, BrokerError> {
        self.domains()
            .await?
            .into_iter()
            .find(|d| d.namespace().eq_ignore_ascii_case(namespace))
            .ok_or_else(|| not_found(format!("Domain {namespace} does not exist")))
    }

    /// Creates a domain.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the namespace is taken or invalid.
    pub async fn add_domain(&self, namespace: &str) -> Result<Domain, BrokerError> {
        let api = self.api().await?;
        let link = find_link(&api.links, "ADD_DOMAIN")?;
        let params = vec![param(namespace_param(link), namespace)];
        extract(self.call(link, params).await?.payload, "ADD_DOMAIN")
    }

    /// Renames a domain.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the new namespace is rejected.
    pub async fn update_domain(
        &self,
        domain: &Domain,
        new_namespace: &str,
    ) -> Result<Domain, BrokerError> {
        let link = find_link(&domain.links, "UPDATE")?;
        let params = vec![param(namespace_param(link), new_namespace)];
        extract(self.call(link, params).await?.payload, "UPDATE")
    }

    /// Deletes a domain; `force` also deletes its applications.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` when the domain still has applications and
    /// `force` is false.
    pub async fn delete_domain(
        &self,
        domain: &Domain,
        force: bool,
    ) -> Result<ParsedResponse, BrokerError> {
        self.follow_unit(&domain.links, "DELETE", vec![param("force", force.to_string())])
            .await
    }

    /// Cartridges the broker offers.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn available_cartridges(&self) -> Result<Vec<Cartridge>, BrokerError> {
        let api = self.api().await?;
        self.follow(&api.links, "LIST_CARTRIDGES", Vec::new()).await
    }

    /// The user's SSH keys.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn sshkeys(&self) -> Result<Vec<Key>, BrokerError> {
        let user = self.user().await?;
        self.follow(&user.links, "LIST_KEYS", Vec::new()).await
    }

    /// An SSH key by name.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when no key has that name.
    pub async fn find_key(&self, name: &str) -> Result<Key, BrokerError> {
        self.sshkeys()
            .await?
            .into_iter()
            .find(|k| k.name == name)
            .ok_or_else(|| not_found(format!("SSH key '{name}' does not exist")))
    }

    /// Uploads an SSH public key.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a duplicate name or malformed key.
    pub async fn add_key(&self, name: &str, kind: &str, content: &str) -> Result<Key, BrokerError> {
        let user = self.user().await?;
        let params = vec![
            param("name", name),
            param("type", kind),
            param("content", content),
        ];
        self.follow(&user.links, "ADD_KEY", params).await
    }

    /// Removes an SSH key.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn delete_key(&self, key: &Key) -> Result<ParsedResponse, BrokerError> {
        self.follow_unit(&key.links, "DELETE", Vec::new()).await
    }

    /// Applications in a domain.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn applications(&self, domain: &Domain) -> Result<Vec<Application>, BrokerError> {
        self.follow(&domain.links, "LIST_APPLICATIONS", Vec::new())
            .await
    }

    /// An application by name, compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when no application matches.
    pub async fn find_application(
        &self,
        domain: &Domain,
        name: &str,
    ) -> Result<Application, BrokerError> {
        self.applications(domain)
            .await?
            .into_iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                not_found(format!(
                    "Application {name} does not exist in domain {}",
                    domain.namespace()
                ))
            })
    }

    /// Creates an application.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a bad name or unknown cartridge.
    pub async fn add_application(
        &self,
        domain: &Domain,
        spec: &NewApplication,
    ) -> Result<Application, BrokerError> {
        self.follow(&domain.links, "ADD_APPLICATION", spec.params())
            .await
    }

    /// Sends a lifecycle event to an application.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn application_event(
        &self,
        application: &Application,
        event: ApplicationEvent,
    ) -> Result<ParsedResponse, BrokerError> {
        self.follow_unit(
            &application.links,
            event.rel(),
            vec![param("event", event.event())],
        )
        .await
    }

    /// Deletes an application.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn delete_application(
        &self,
        application: &Application,
    ) -> Result<ParsedResponse, BrokerError> {
        self.follow_unit(&application.links, "DELETE", Vec::new())
            .await
    }

    /// Cartridges installed in an application.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn cartridges(&self, application: &Application) -> Result<Vec<Cartridge>, BrokerError> {
        self.follow(&application.links, "LIST_CARTRIDGES", Vec::new())
            .await
    }

    /// An installed cartridge by name.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the application has no such cartridge.
    pub async fn find_cartridge(
        &self,
        application: &Application,
        name: &str,
    ) -> Result<Cartridge, BrokerError> {
        self.cartridges(application)
            .await?
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| {
                not_found(format!(
                    "Cartridge {name} is not installed in {}",
                    application.name
                ))
            })
    }

    /// Adds a cartridge to an application.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an unknown or conflicting cartridge.
    pub async fn add_cartridge(
        &self,
        application: &Application,
        name: &str,
    ) -> Result<Cartridge, BrokerError> {
        let link = find_link(&application.links, "ADD_CARTRIDGE")?;
        let key = if link.accepts("cartridge") && !link.accepts("name") {
            "cartridge"
        } else {
            "name"
        };
        extract(
            self.call(link, vec![param(key, name)]).await?.payload,
            "ADD_CARTRIDGE",
        )
    }

    /// Sends a lifecycle event to one cartridge.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn cartridge_event(
        &self,
        cartridge: &Cartridge,
        event: CartridgeEvent,
    ) -> Result<ParsedResponse, BrokerError> {
        self.follow_unit(
            &cartridge.links,
            event.rel(),
            vec![param("event", event.event())],
        )
        .await
    }

    /// Reloads a cartridge with its status messages included.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn cartridge_status(&self, cartridge: &Cartridge) -> Result<Cartridge, BrokerError> {
        self.follow(
            &cartridge.links,
            "GET",
            vec![param("include", "status_messages")],
        )
        .await
    }

    /// Changes the scaling bounds of a cartridge; `None` keeps a bound.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bounds the cartridge cannot honour.
    pub async fn scale_cartridge(
        &self,
        cartridge: &Cartridge,
        min: Option<i64>,
        max: Option<i64>,
    ) -> Result<Cartridge, BrokerError> {
        let mut params = Vec::new();
        if let Some(min) = min {
            params.push(param("scales_from", min.to_string()));
        }
        if let Some(max) = max {
            params.push(param("scales_to", max.to_string()));
        }
        if params.is_empty() {
            return Err(BrokerError::validation(
                "Specify a minimum or maximum scale.",
                None,
            ));
        }
        self.follow(&cartridge.links, "UPDATE", params).await
    }

    /// Removes a cartridge from its application.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn remove_cartridge(&self, cartridge: &Cartridge) -> Result<ParsedResponse, BrokerError> {
        self.follow_unit(&cartridge.links, "DELETE", Vec::new())
            .await
    }

    /// Gear groups of an application.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn gear_groups(&self, application: &Application) -> Result<Vec<GearGroup>, BrokerError> {
        self.follow(&application.links, "GET_GEAR_GROUPS", Vec::new())
            .await
    }

    /// User-defined environment variables of an application.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn environment_variables(
        &self,
        application: &Application,
    ) -> Result<Vec<EnvironmentVariable>, BrokerError> {
        self.follow(&application.links, "LIST_ENVIRONMENT_VARIABLES", Vec::new())
            .await
    }

    /// Sets environment variables.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for reserved or malformed names.
    pub async fn set_environment_variables(
        &self,
        application: &Application,
        variables: &[EnvironmentVariable],
    ) -> Result<ParsedResponse, BrokerError> {
        let mut params = Vec::new();
        for variable in variables {
            params.push(param("environment_variables[][name]", variable.name.clone()));
            params.push(param(
                "environment_variables[][value]",
                variable.value.clone().unwrap_or_default(),
            ));
        }
        self.follow_unit(&application.links, "SET_UNSET_ENVIRONMENT_VARIABLES", params)
            .await
    }

    /// Removes environment variables; a name sent without a value is unset.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn unset_environment_variables(
        &self,
        application: &Application,
        names: &[String],
    ) -> Result<ParsedResponse, BrokerError> {
        let params = names
            .iter()
            .map(|name| param("environment_variables[][name]", name.clone()))
            .collect();
        self.follow_unit(&application.links, "SET_UNSET_ENVIRONMENT_VARIABLES", params)
            .await
    }

    /// Deployments of an application, oldest first.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn deployments(&self, application: &Application) -> Result<Vec<Deployment>, BrokerError> {
        self.follow(&application.links, "LIST_DEPLOYMENTS", Vec::new())
            .await
    }

    /// Rolls an application to a previous deployment.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown deployment id.
    pub async fn activate_deployment(
        &self,
        application: &Application,
        deployment_id: &str,
    ) -> Result<ParsedResponse, BrokerError> {
        self.follow_unit(
            &application.links,
            "ACTIVATE",
            vec![
                param("event", "activate"),
                param("deployment_id", deployment_id),
            ],
        )
        .await
    }
}

fn find_link<'a>(links: &'a Links, rel: &str) -> Result<&'a Link, BrokerError> {
    links
        .get(rel)
        .ok_or_else(|| BrokerError::operation_not_supported(rel))
}

/// Newer brokers name the namespace parameter `name`, older ones `id`.
fn namespace_param(link: &Link) -> &'static str {
    if link.accepts("name") { "name" } else { "id" }
}

fn not_found(message: String) -> BrokerError {
    BrokerError::new(ErrorKind::ResourceNotFound, message)
}

fn extract<R: FromPayload>(payload: Option<Payload>, rel: &str) -> Result<R, BrokerError> {
    let Some(payload) = payload else {
        return Err(BrokerError::resource_access(format!(
            "The server returned no content for {rel}."
        )));
    };
    R::from_payload(payload).map_err(|other| {
        BrokerError::resource_access(format!(
            "Unexpected response type '{}' for {rel}.",
            other.type_name()
        ))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use rhc_domain::RawResponse;

    use crate::ports::TransportError;

    const API: &str = r#"{"type":"links","api_version":1.6,"supported_api_versions":[1.5,1.6],"data":{
        "GET_USER":{"href":"https://broker.test/broker/rest/user","method":"GET"},
        "LIST_DOMAINS":{"href":"https://broker.test/broker/rest/domains","method":"GET"},
        "ADD_DOMAIN":{"href":"https://broker.test/broker/rest/domains","method":"POST",
            "required_params":[{"name":"id","type":"string"}]}}}"#;

    const DOMAINS: &str = r#"{"type":"domains","data":[{"id":"myns","links":{
        "UPDATE":{"href":"https://broker.test/broker/rest/domain/myns","method":"PUT",
            "required_params":[{"name":"id"}]},
        "LIST_APPLICATIONS":{"href":"https://broker.test/broker/rest/domain/myns/applications","method":"GET"}}}]}"#;

    #[derive(Default)]
    struct MockTransport {
        responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
        requests: Mutex<Vec<BrokerRequest>>,
    }

    impl MockTransport {
        fn with(responses: Vec<Result<RawResponse, TransportError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::default(),
            }
        }

        fn requests(&self) -> Vec<BrokerRequest> {
            self.requests.lock().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: &BrokerRequest) -> Result<RawResponse, TransportError> {
            self.requests.lock().push(request.clone());
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Other("no response queued".to_string())))
        }
    }

    fn ok(body: &str) -> Result<RawResponse, TransportError> {
        Ok(RawResponse::with_body(200, body))
    }

    fn client(responses: Vec<Result<RawResponse, TransportError>>) -> BrokerClient<MockTransport> {
        let config = ClientConfig::new("broker.test")
            .with_credentials(Some(Credentials::Basic {
                login: "alice".to_string(),
                password: "secret".to_string(),
            }))
            .with_retry(RetryPolicy::new(2, Duration::from_millis(10)));
        BrokerClient::new(MockTransport::with(responses), config)
    }

    #[test]
    fn test_api_url() {
        assert_eq!(
            ClientConfig::new("openshift.redhat.com").api_url(),
            "https://openshift.redhat.com/broker/rest/api"
        );
        assert_eq!(
            ClientConfig::new("http://localhost:8080/broker/rest/api/").api_url(),
            "http://localhost:8080/broker/rest/api"
        );
    }

    #[test]
    fn test_new_application_params() {
        let spec = NewApplication {
            scale: true,
            gear_profile: Some("medium".to_string()),
            ..NewApplication::new("blog", vec!["php-5.4".to_string(), "mysql-5.5".to_string()])
        };
        assert_eq!(
            spec.params(),
            vec![
                param("name", "blog"),
                param("cartridges[]", "php-5.4"),
                param("cartridges[]", "mysql-5.5"),
                param("scale", "true"),
                param("gear_profile", "medium"),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_domain() {
        let client = client(vec![
            ok(API),
            ok(r#"{"type":"domain","data":{"id":"myns"},"messages":[]}"#),
        ]);

        let domain = client.add_domain("myns").await.unwrap();
        assert_eq!(domain.id, "myns");

        let requests = client.transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url, "https://broker.test/broker/rest/api");
        assert_eq!(requests[1].method, HttpMethod::Post);
        assert_eq!(requests[1].params, vec![param("id", "myns")]);
        assert_eq!(requests[1].header("accept"), Some("application/json"));
        assert!(requests[1].credentials.is_some());
    }

    #[tokio::test]
    async fn test_api_root_is_fetched_once() {
        let client = client(vec![ok(API), ok(DOMAINS), ok(DOMAINS)]);
        let first = client.domains().await.unwrap();
        let second = client.domains().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(client.transport.requests().len(), 3);
        let api = client.api().await.unwrap();
        assert_eq!(api.api_version, Some(serde_json::json!(1.6)));
        assert_eq!(api.supported_api_versions.len(), 2);
    }

    #[tokio::test]
    async fn test_not_found_application_list() {
        let client = client(vec![
            ok(API),
            ok(DOMAINS),
            Ok(RawResponse::with_body(
                404,
                r#"{"messages":[{"severity":"error","text":"not found"}]}"#,
            )),
        ]);
        let domain = client.find_domain("MYNS").await.unwrap();
        let error = client.applications(&domain).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::ResourceNotFound);
        assert_eq!(error.message, "not found");
        assert_eq!(error.status, Some(404));
    }

    #[tokio::test]
    async fn test_update_validation_is_aggregated() {
        let client = client(vec![
            ok(API),
            ok(DOMAINS),
            Ok(RawResponse::with_body(
                422,
                r#"{"messages":[{"field":"name","text":"too short"},{"field":"name","text":"must be alphanumeric"}]}"#,
            )),
        ]);
        let domain = client.find_domain("myns").await.unwrap();
        let error = client.update_domain(&domain, "x").await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::Validation);
        assert_eq!(error.field.as_deref(), Some("name"));
        assert_eq!(error.message, "too short must be alphanumeric");

        let update = &client.transport.requests()[2];
        assert_eq!(update.method, HttpMethod::Put);
    }

    #[tokio::test]
    async fn test_session_cookie_is_replayed() {
        let api = RawResponse::new(
            200,
            vec![(
                "Set-Cookie".to_string(),
                "rh_sso=token123; Path=/; Secure".to_string(),
            )],
            API.as_bytes().to_vec(),
        );
        let client = client(vec![Ok(api), ok(DOMAINS), ok(DOMAINS)]);
        client.domains().await.unwrap();
        client.domains().await.unwrap();

        let requests = client.transport.requests();
        assert_eq!(requests[0].header("cookie"), None);
        assert_eq!(requests[1].header("cookie"), Some("rh_sso=token123"));
        assert_eq!(requests[2].header("cookie"), Some("rh_sso=token123"));
    }

    #[tokio::test]
    async fn test_missing_domain() {
        let client = client(vec![ok(API), ok(DOMAINS)]);
        let error = client.find_domain("other").await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::ResourceNotFound);
    }

    #[tokio::test]
    async fn test_missing_link_is_not_supported() {
        let client = client(vec![ok(API), ok(DOMAINS)]);
        let domain = client.find_domain("myns").await.unwrap();
        let error = client.delete_domain(&domain, true).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::OperationNotSupported);
        assert_eq!(client.transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_no_content_delete() {
        let domains = r#"{"type":"domains","data":[{"id":"myns","links":{
            "DELETE":{"href":"https://broker.test/broker/rest/domain/myns","method":"DELETE"}}}]}"#;
        let client = client(vec![
            ok(API),
            ok(domains),
            Ok(RawResponse::with_body(204, "")),
        ]);
        let domain = client.find_domain("myns").await.unwrap();
        let parsed = client.delete_domain(&domain, true).await.unwrap();
        assert!(parsed.payload.is_none());
        assert_eq!(
            client.transport.requests()[2].params,
            vec![param("force", "true")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_are_retried_then_surface() {
        let timeout = || Err(TransportError::Timeout("operation timed out".to_string()));
        let client = client(vec![timeout(), timeout(), timeout()]);
        let error = client.api().await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::Timeout);
        assert_eq!(client.transport.requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_then_success() {
        let client = client(vec![
            Err(TransportError::ConnectionReset("reset by peer".to_string())),
            ok(API),
            ok(DOMAINS),
        ]);
        assert_eq!(client.domains().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unexpected_payload_type() {
        let client = client(vec![
            ok(API),
            ok(r#"{"type":"user","data":{"login":"alice"}}"#),
        ]);
        let error = client.domains().await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::ResourceAccess);
        assert!(error.message.contains("'user'"));
    }
}
