//! `rhc deployment`

use super::print_messages;
use crate::cli::DeploymentCommand;
use crate::context::Context;

pub async fn run(ctx: &Context, command: DeploymentCommand) -> anyhow::Result<()> {
    match command {
        DeploymentCommand::List(target) => {
            let application = ctx
                .application(target.namespace.as_deref(), &target.app)
                .await?;
            let deployments = ctx.client.deployments(&application).await?;
            if deployments.is_empty() {
                println!("No deployments for {}", application.name);
            }
            for deployment in &deployments {
                let marker = if deployment.is_activated() { "*" } else { " " };
                println!(
                    "{marker} {:<10} {:<20} {}",
                    deployment.id,
                    deployment.git_ref.as_deref().unwrap_or("-"),
                    deployment.created_at.as_deref().unwrap_or("-")
                );
            }
        }
        DeploymentCommand::Activate { id, target } => {
            let application = ctx
                .application(target.namespace.as_deref(), &target.app)
                .await?;
            let response = ctx.client.activate_deployment(&application, &id).await?;
            print_messages(&response);
            println!("Deployment {id} activated on {}", application.name);
        }
    }
    Ok(())
}
