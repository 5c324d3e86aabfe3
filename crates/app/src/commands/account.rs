//! `rhc account` and `rhc server`

use super::field;
use crate::context::Context;

pub async fn account(ctx: &Context) -> anyhow::Result<()> {
    let user = ctx.client.user().await?;
    println!("Login {} on {}", user.login, ctx.client.config().server);
    field("Plan:", user.plan_id.as_deref());
    println!(
        "  {:<16}{} of {}",
        "Gears used:", user.consumed_gears, user.max_gears
    );
    Ok(())
}

pub async fn server(ctx: &Context) -> anyhow::Result<()> {
    let api = ctx.client.api().await?;
    println!("Connected to {}", ctx.client.config().api_url());
    if let Some(version) = &api.api_version {
        println!("  {:<16}{}", "API version:", display_value(version));
    }
    if !api.supported_api_versions.is_empty() {
        let versions = api
            .supported_api_versions
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {:<16}{versions}", "Supported:");
    }
    Ok(())
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
