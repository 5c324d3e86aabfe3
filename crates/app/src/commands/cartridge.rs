//! `rhc cartridge`

use anyhow::bail;
use rhc_application::CartridgeEvent;
use rhc_domain::{Application, Cartridge};

use super::{field, print_messages};
use crate::cli::{CartridgeArgs, CartridgeCommand};
use crate::context::Context;

pub async fn run(ctx: &Context, command: CartridgeCommand) -> anyhow::Result<()> {
    match command {
        CartridgeCommand::List => {
            let mut cartridges = ctx.client.available_cartridges().await?;
            cartridges.sort_by(|a, b| b.is_web().cmp(&a.is_web()).then(a.name.cmp(&b.name)));
            for cartridge in &cartridges {
                let kind = if cartridge.is_web() { "web" } else { "addon" };
                println!(
                    "{:<24} {:<6} {}",
                    cartridge.name,
                    kind,
                    cartridge.display_name.as_deref().unwrap_or_default()
                );
            }
        }
        CartridgeCommand::Add(args) => {
            let application = application(ctx, &args).await?;
            let cartridge = ctx.client.add_cartridge(&application, &args.cartridge).await?;
            println!("Added {} to {}", cartridge.name, application.name);
            show(&cartridge);
        }
        CartridgeCommand::Remove(args) => {
            let (application, cartridge) = find(ctx, &args).await?;
            let response = ctx.client.remove_cartridge(&cartridge).await?;
            print_messages(&response);
            println!("Removed {} from {}", cartridge.name, application.name);
        }
        CartridgeCommand::Start(args) => event(ctx, &args, CartridgeEvent::Start).await?,
        CartridgeCommand::Stop(args) => event(ctx, &args, CartridgeEvent::Stop).await?,
        CartridgeCommand::Restart(args) => event(ctx, &args, CartridgeEvent::Restart).await?,
        CartridgeCommand::Reload(args) => event(ctx, &args, CartridgeEvent::Reload).await?,
        CartridgeCommand::Status(args) => {
            let (_, cartridge) = find(ctx, &args).await?;
            let cartridge = ctx.client.cartridge_status(&cartridge).await?;
            if cartridge.status_messages.is_empty() {
                println!("No status reported for {}", cartridge.name);
            }
            for status in &cartridge.status_messages {
                match status.get("message").and_then(|m| m.as_str()) {
                    Some(message) => println!("{}", message.trim_end()),
                    None => println!("{status}"),
                }
            }
        }
        CartridgeCommand::Scale {
            cartridge: args,
            min,
            max,
        } => {
            if min.is_none() && max.is_none() {
                bail!("Specify --min, --max or both.");
            }
            let (_, cartridge) = find(ctx, &args).await?;
            let cartridge = ctx.client.scale_cartridge(&cartridge, min, max).await?;
            println!("{} scaling updated", cartridge.name);
            show(&cartridge);
        }
    }
    Ok(())
}

async fn application(ctx: &Context, args: &CartridgeArgs) -> anyhow::Result<Application> {
    ctx.application(args.target.namespace.as_deref(), &args.target.app)
        .await
}

async fn find(ctx: &Context, args: &CartridgeArgs) -> anyhow::Result<(Application, Cartridge)> {
    let application = application(ctx, args).await?;
    let cartridge = ctx
        .client
        .find_cartridge(&application, &args.cartridge)
        .await?;
    Ok((application, cartridge))
}

async fn event(ctx: &Context, args: &CartridgeArgs, event: CartridgeEvent) -> anyhow::Result<()> {
    let (application, cartridge) = find(ctx, args).await?;
    let response = ctx.client.cartridge_event(&cartridge, event).await?;
    print_messages(&response);
    println!("{} on {}: {} done", cartridge.name, application.name, event.event());
    Ok(())
}

fn show(cartridge: &Cartridge) {
    field("Name:", cartridge.display_name.as_deref());
    field("Gear size:", cartridge.gear_profile.as_deref());
    field("Scaling:", cartridge.scale_description().as_deref());
    if let Some(scale) = cartridge.current_scale {
        println!("  {:<16}{scale}", "Current scale:");
    }
}
