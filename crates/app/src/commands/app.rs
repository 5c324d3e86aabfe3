//! `rhc app`

use rhc_application::{ApplicationEvent, NewApplication};
use rhc_domain::{Application, GearGroup};

use super::{field, print_messages};
use crate::cli::{AppArgs, AppCommand};
use crate::context::Context;

pub async fn run(ctx: &Context, command: AppCommand) -> anyhow::Result<()> {
    match command {
        AppCommand::Create {
            app,
            cartridges,
            namespace,
            scaling,
            gear_size,
            from_code,
        } => {
            let domain = ctx.domain(namespace.as_deref()).await?;
            let spec = NewApplication {
                scale: scaling,
                gear_profile: gear_size,
                initial_git_url: from_code,
                ..NewApplication::new(app, cartridges)
            };
            let application = ctx.client.add_application(&domain, &spec).await?;
            println!("Application {} created", application.name);
            show(&application);
            for message in &application.messages {
                println!("{message}");
            }
        }
        AppCommand::Show { target, gears } => {
            let application = ctx
                .application(target.namespace.as_deref(), &target.app)
                .await?;
            if gears {
                let groups = ctx.client.gear_groups(&application).await?;
                show_gears(&groups);
            } else {
                show(&application);
                for cartridge in ctx.client.cartridges(&application).await? {
                    let scale = cartridge
                        .scale_description()
                        .map(|s| format!(" (scales {s})"))
                        .unwrap_or_default();
                    println!("  {}{scale}", cartridge.name);
                }
            }
        }
        AppCommand::List { namespace } => {
            let domain = ctx.domain(namespace.as_deref()).await?;
            let applications = ctx.client.applications(&domain).await?;
            if applications.is_empty() {
                println!("No applications in domain {}", domain.namespace());
            }
            for application in &applications {
                show(application);
            }
        }
        AppCommand::Delete(target) => {
            let application = find(ctx, &target).await?;
            let response = ctx.client.delete_application(&application).await?;
            print_messages(&response);
            println!("Application {} deleted", application.name);
        }
        AppCommand::Start(target) => event(ctx, &target, ApplicationEvent::Start).await?,
        AppCommand::Stop(target) => event(ctx, &target, ApplicationEvent::Stop).await?,
        AppCommand::ForceStop(target) => event(ctx, &target, ApplicationEvent::ForceStop).await?,
        AppCommand::Restart(target) => event(ctx, &target, ApplicationEvent::Restart).await?,
        AppCommand::Reload(target) => event(ctx, &target, ApplicationEvent::Reload).await?,
        AppCommand::Tidy(target) => event(ctx, &target, ApplicationEvent::Tidy).await?,
    }
    Ok(())
}

async fn find(ctx: &Context, target: &AppArgs) -> anyhow::Result<Application> {
    ctx.application(target.namespace.as_deref(), &target.app)
        .await
}

async fn event(ctx: &Context, target: &AppArgs, event: ApplicationEvent) -> anyhow::Result<()> {
    let application = find(ctx, target).await?;
    let response = ctx.client.application_event(&application, event).await?;
    print_messages(&response);
    println!("{} {}: done", application.name, event.event());
    Ok(())
}

fn show(application: &Application) {
    println!("{} @ {}", application.qualified_name(), application.app_url.as_deref().unwrap_or("-"));
    field("Created:", application.creation_time.as_deref());
    field("Gear size:", application.gear_profile.as_deref());
    field("Git URL:", application.git_url.as_deref());
    field("SSH:", application.ssh_url.as_deref());
    field("Initial Git:", application.initial_git_url.as_deref());
    if application.scalable {
        println!("  {:<16}yes", "Scalable:");
    }
}

fn show_gears(groups: &[GearGroup]) {
    println!("{:<34} {:<10} {:<24} SSH URL", "ID", "State", "Cartridges");
    for group in groups {
        let cartridges = group.cartridge_names();
        for gear in &group.gears {
            println!(
                "{:<34} {:<10} {:<24} {}",
                gear.id,
                gear.state.as_deref().unwrap_or("unknown"),
                cartridges,
                gear.ssh_url.as_deref().unwrap_or("-")
            );
        }
    }
}
