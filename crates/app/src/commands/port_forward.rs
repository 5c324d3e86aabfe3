//! `rhc port-forward`

use anyhow::bail;
use regex::Regex;

use super::{interrupt_token, ssh_destination};
use crate::cli::AppArgs;
use crate::context::Context;

/// `service -> host:port` lines printed by `rhc-list-ports`.
const PORT_LINE: &str = r"^\s*(\S+) -> ([0-9A-Za-z.\-]+):(\d+)\s*$";

/// A remote port exposed by a gear.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ForwardedPort {
    service: String,
    host: String,
    port: u16,
}

impl ForwardedPort {
    fn forward_spec(&self) -> String {
        format!("127.0.0.1:{port}:{}:{port}", self.host, port = self.port)
    }
}

pub async fn run(ctx: &Context, target: &AppArgs) -> anyhow::Result<()> {
    let application = ctx
        .application(target.namespace.as_deref(), &target.app)
        .await?;
    let destination = ssh_destination(&application)?;

    println!("Checking available ports...");
    let listing = ctx
        .runner
        .output(ctx.global.ssh_program(), &[destination.as_str(), "rhc-list-ports 2>&1"])
        .await?;
    let ports = parse_ports(&listing)?;
    if ports.is_empty() {
        bail!("No available ports to forward for {}", application.name);
    }

    let mut args = vec!["-N".to_string()];
    for port in &ports {
        println!(
            "  {:<12} 127.0.0.1:{} => {}:{}",
            port.service, port.port, port.host, port.port
        );
        args.push("-L".to_string());
        args.push(port.forward_spec());
    }
    args.push(destination);
    println!("Press Ctrl-C to stop forwarding.");

    let cancel = interrupt_token();
    if !ctx.runner.interactive_until(ctx.global.ssh_program(), &args, &cancel).await? {
        eprintln!("Interrupted");
    }
    println!("Ports closed");
    Ok(())
}

fn parse_ports(listing: &str) -> anyhow::Result<Vec<ForwardedPort>> {
    let port_line = Regex::new(PORT_LINE)?;
    Ok(listing
        .lines()
        .filter_map(|line| {
            let captures = port_line.captures(line)?;
            Some(ForwardedPort {
                service: captures[1].to_string(),
                host: captures[2].to_string(),
                port: captures[3].parse().ok()?,
            })
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_ports() {
        let listing = "Binding to ports...\nhttpd -> 127.7.132.1:8080\nmysql -> 127.7.132.2:3306\npermission denied\n";
        let ports = parse_ports(listing).unwrap();
        assert_eq!(
            ports,
            vec![
                ForwardedPort {
                    service: "httpd".to_string(),
                    host: "127.7.132.1".to_string(),
                    port: 8080,
                },
                ForwardedPort {
                    service: "mysql".to_string(),
                    host: "127.7.132.2".to_string(),
                    port: 3306,
                },
            ]
        );
    }

    #[test]
    fn test_parse_ports_skips_invalid_port() {
        assert!(parse_ports("svc -> 10.0.0.1:99999\n").unwrap().is_empty());
        assert!(parse_ports("").unwrap().is_empty());
    }

    #[test]
    fn test_forward_spec() {
        let port = ForwardedPort {
            service: "mysql".to_string(),
            host: "127.7.132.2".to_string(),
            port: 3306,
        };
        assert_eq!(port.forward_spec(), "127.0.0.1:3306:127.7.132.2:3306");
    }
}
