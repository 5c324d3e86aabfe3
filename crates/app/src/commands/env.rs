//! `rhc env`

use rhc_domain::EnvironmentVariable;

use super::print_messages;
use crate::cli::EnvCommand;
use crate::context::Context;

pub async fn run(ctx: &Context, command: EnvCommand) -> anyhow::Result<()> {
    match command {
        EnvCommand::Set { variables, target } => {
            let variables = variables
                .iter()
                .map(|raw| EnvironmentVariable::parse_assignment(raw))
                .collect::<Result<Vec<_>, _>>()?;
            let application = ctx
                .application(target.namespace.as_deref(), &target.app)
                .await?;
            let response = ctx
                .client
                .set_environment_variables(&application, &variables)
                .await?;
            print_messages(&response);
            for variable in &variables {
                println!("Set {}", variable.name);
            }
        }
        EnvCommand::Unset { names, target } => {
            let application = ctx
                .application(target.namespace.as_deref(), &target.app)
                .await?;
            let response = ctx
                .client
                .unset_environment_variables(&application, &names)
                .await?;
            print_messages(&response);
            for name in &names {
                println!("Removed {name}");
            }
        }
        EnvCommand::List(target) => {
            let application = ctx
                .application(target.namespace.as_deref(), &target.app)
                .await?;
            let mut variables = ctx.client.environment_variables(&application).await?;
            variables.sort_by(|a, b| a.name.cmp(&b.name));
            for variable in &variables {
                println!("{}={}", variable.name, variable.value.as_deref().unwrap_or_default());
            }
        }
    }
    Ok(())
}
