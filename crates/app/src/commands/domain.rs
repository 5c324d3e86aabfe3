//! `rhc domain`

use rhc_domain::Domain;

use super::{field, print_messages};
use crate::cli::DomainCommand;
use crate::context::Context;

pub async fn run(ctx: &Context, command: DomainCommand) -> anyhow::Result<()> {
    match command {
        DomainCommand::Create { namespace } => {
            let domain = ctx.client.add_domain(&namespace).await?;
            println!("Domain {} created", domain.namespace());
        }
        DomainCommand::Show { namespace } => {
            let domain = ctx.domain(namespace.as_deref()).await?;
            show(&domain);
            let applications = ctx.client.applications(&domain).await?;
            if applications.is_empty() {
                println!("  No applications");
            }
            for app in applications {
                println!(
                    "  {} ({})",
                    app.name,
                    app.framework.as_deref().unwrap_or("unknown")
                );
            }
        }
        DomainCommand::List => {
            let domains = ctx.client.domains().await?;
            if domains.is_empty() {
                println!("You have no domains.");
            }
            for domain in &domains {
                show(domain);
            }
        }
        DomainCommand::Update { old, new } => {
            let domain = ctx.client.find_domain(&old).await?;
            let updated = ctx.client.update_domain(&domain, &new).await?;
            println!(
                "Domain {} renamed to {}",
                domain.namespace(),
                updated.namespace()
            );
        }
        DomainCommand::Delete { namespace, force } => {
            let domain = ctx.client.find_domain(&namespace).await?;
            let response = ctx.client.delete_domain(&domain, force).await?;
            print_messages(&response);
            println!("Domain {} deleted", domain.namespace());
        }
    }
    Ok(())
}

fn show(domain: &Domain) {
    println!("Domain {}", domain.namespace());
    field("Suffix:", domain.suffix.as_deref());
    field("Creator:", domain.creator.as_deref());
}
