//! Per-invocation state: configuration, broker client and process runner

use std::time::Duration;

use anyhow::{Context as _, bail};
use rhc_application::{BrokerClient, ClientConfig};
use rhc_domain::{Application, ConfigDocument, Credentials, Domain, SessionSettings};
use rhc_infrastructure::{
    ConfigRepository, DEFAULT_TIMEOUT, ProcessRunner, ReqwestTransport, TransportOptions,
};

use crate::cli::GlobalArgs;

/// Everything a command needs.
pub struct Context {
    pub global: GlobalArgs,
    pub repository: ConfigRepository,
    pub document: ConfigDocument,
    pub client: BrokerClient<ReqwestTransport>,
    pub runner: ProcessRunner,
}

impl Context {
    /// Loads the configuration file and builds the client.
    pub async fn load(global: GlobalArgs) -> anyhow::Result<Self> {
        let repository = match &global.config {
            Some(path) => ConfigRepository::at(path),
            None => ConfigRepository::locate()?,
        };
        let document = repository.load().await?;
        let (config, options) = resolve(&global, &document.settings());
        tracing::debug!(
            config = %repository.path().display(),
            api = %config.api_url(),
            "resolved session"
        );
        let transport =
            ReqwestTransport::new(&options).context("Unable to initialise the HTTP client")?;

        Ok(Self {
            global,
            repository,
            document,
            client: BrokerClient::new(transport, config),
            runner: ProcessRunner::new(),
        })
    }

    /// The domain named by `namespace`, or the user's only domain.
    pub async fn domain(&self, namespace: Option<&str>) -> anyhow::Result<Domain> {
        if let Some(namespace) = namespace {
            return Ok(self.client.find_domain(namespace).await?);
        }
        let mut domains = self.client.domains().await?;
        match domains.len() {
            0 => bail!("You have no domains. Create one with 'rhc domain create <namespace>'."),
            1 => Ok(domains.remove(0)),
            _ => bail!("You have access to more than one domain; choose one with -n <namespace>."),
        }
    }

    /// An application in the given domain, or in the user's only domain.
    pub async fn application(
        &self,
        namespace: Option<&str>,
        name: &str,
    ) -> anyhow::Result<Application> {
        let domain = self.domain(namespace).await?;
        Ok(self.client.find_application(&domain, name).await?)
    }
}

/// Combines command-line options with file settings.
///
/// Command-line values win; `insecure` is on if either side sets it.
pub fn resolve(global: &GlobalArgs, settings: &SessionSettings) -> (ClientConfig, TransportOptions) {
    let server = global
        .server
        .clone()
        .unwrap_or_else(|| settings.server_or_default().to_string());
    let timeout = global
        .timeout
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .or(settings.timeout);

    let config = ClientConfig::new(server)
        .with_credentials(credentials(global, settings))
        .with_timeout(timeout);
    let options = TransportOptions {
        insecure: global.insecure || settings.insecure,
        timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        ..TransportOptions::default()
    };
    (config, options)
}

fn credentials(global: &GlobalArgs, settings: &SessionSettings) -> Option<Credentials> {
    if let Some(token) = global.token.as_ref().filter(|t| !t.is_empty()) {
        return Some(Credentials::Token(token.clone()));
    }
    let login = global.rhlogin.clone().or_else(|| settings.login.clone())?;
    match &global.password {
        Some(password) => Some(Credentials::Basic {
            login,
            password: password.clone(),
        }),
        None => {
            tracing::debug!(%login, "no password given, sending no credentials");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn settings() -> SessionSettings {
        SessionSettings {
            login: Some("file-user".to_string()),
            server: Some("file.example.com".to_string()),
            insecure: false,
            timeout: Some(Duration::from_secs(30)),
        }
    }

    #[test]
    fn test_flags_override_file() {
        let global = GlobalArgs {
            server: Some("flag.example.com".to_string()),
            rhlogin: Some("flag-user".to_string()),
            password: Some("secret".to_string()),
            timeout: Some(5),
            ..GlobalArgs::default()
        };
        let (config, options) = resolve(&global, &settings());
        assert_eq!(config.server, "flag.example.com");
        assert_eq!(
            config.credentials,
            Some(Credentials::Basic {
                login: "flag-user".to_string(),
                password: "secret".to_string()
            })
        );
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_file_fills_gaps() {
        let global = GlobalArgs {
            password: Some("secret".to_string()),
            ..GlobalArgs::default()
        };
        let (config, _) = resolve(&global, &settings());
        assert_eq!(config.server, "file.example.com");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert!(matches!(
            config.credentials,
            Some(Credentials::Basic { ref login, .. }) if login == "file-user"
        ));
    }

    #[test]
    fn test_defaults_without_file() {
        let (config, options) = resolve(&GlobalArgs::default(), &SessionSettings::default());
        assert_eq!(config.server, rhc_domain::config::DEFAULT_SERVER);
        assert_eq!(config.credentials, None);
        assert_eq!(options.timeout, DEFAULT_TIMEOUT);
        assert!(!options.insecure);
    }

    #[test]
    fn test_token_beats_password() {
        let global = GlobalArgs {
            rhlogin: Some("alice".to_string()),
            password: Some("secret".to_string()),
            token: Some("tok".to_string()),
            ..GlobalArgs::default()
        };
        let (config, _) = resolve(&global, &settings());
        assert_eq!(config.credentials, Some(Credentials::Token("tok".to_string())));
    }

    #[test]
    fn test_login_without_password_sends_nothing() {
        let (config, _) = resolve(&GlobalArgs::default(), &settings());
        assert_eq!(config.credentials, None);
    }

    #[test]
    fn test_insecure_from_either_side() {
        let file = SessionSettings {
            insecure: true,
            ..SessionSettings::default()
        };
        assert!(resolve(&GlobalArgs::default(), &file).1.insecure);

        let global = GlobalArgs {
            insecure: true,
            ..GlobalArgs::default()
        };
        assert!(resolve(&global, &SessionSettings::default()).1.insecure);
    }
}
