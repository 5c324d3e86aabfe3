//! Error rendering and process exit codes

use rhc_domain::{BrokerError, ErrorKind};
use rhc_infrastructure::{ConfigError, ProcessError};

/// Exit code for a failed command.
///
/// Broker errors carry their own code, a failed external tool passes on
/// its status, and everything else exits with 1.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if let Some(broker) = cause.downcast_ref::<BrokerError>() {
            return broker.exit_code();
        }
        if let Some(process) = cause.downcast_ref::<ProcessError>() {
            return process.exit_code();
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return 1;
        }
    }
    1
}

/// Message printed for a failed command.
pub fn render(error: &anyhow::Error) -> String {
    let Some(broker) = error.downcast_ref::<BrokerError>() else {
        return format!("{error:#}");
    };
    match broker.kind {
        ErrorKind::Unauthorized => format!(
            "{}. Check your login and password; pass the password with -p or RHC_PASSWORD, or use --token.",
            broker.message
        ),
        ErrorKind::Validation => match &broker.field {
            Some(field) => format!("{} ({field})", broker.message),
            None => broker.message.clone(),
        },
        ErrorKind::Timeout | ErrorKind::Connection => broker.message.clone(),
        _ if broker.message.is_empty() => broker.kind.title().to_string(),
        _ => broker.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_broker_exit_code() {
        let error = anyhow::Error::new(
            BrokerError::new(ErrorKind::ResourceNotFound, "Application blog not found")
                .with_code(Some(101)),
        );
        assert_eq!(exit_code(&error), 101);
        assert_eq!(render(&error), "Application blog not found");
    }

    #[test]
    fn test_exit_code_through_context() {
        let error = Err::<(), _>(BrokerError::new(ErrorKind::ServiceUnavailable, "down"))
            .context("while listing domains")
            .unwrap_err();
        assert_eq!(exit_code(&error), 129);
    }

    #[test]
    fn test_process_exit_code() {
        let error = anyhow::Error::new(ProcessError::Failed {
            program: "git".to_string(),
            code: 128,
            stderr: String::new(),
        });
        assert_eq!(exit_code(&error), 128);
    }

    #[test]
    fn test_other_errors_exit_with_one() {
        assert_eq!(exit_code(&anyhow::anyhow!("bad input")), 1);
    }

    #[test]
    fn test_unauthorized_hint() {
        let error = anyhow::Error::new(BrokerError::new(ErrorKind::Unauthorized, "Not authenticated"));
        let rendered = render(&error);
        assert!(rendered.starts_with("Not authenticated."));
        assert!(rendered.contains("RHC_PASSWORD"));
        assert_eq!(exit_code(&error), 97);
    }

    #[test]
    fn test_validation_names_field() {
        let error = anyhow::Error::new(BrokerError::validation(
            "Namespace is already in use",
            Some("id".to_string()),
        ));
        assert_eq!(render(&error), "Namespace is already in use (id)");
    }
}
