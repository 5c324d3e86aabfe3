//! `rhc setup`: persist session defaults

use crate::context::Context;

pub async fn run(mut ctx: Context) -> anyhow::Result<()> {
    let global = &ctx.global;
    let document = &mut ctx.document;

    if let Some(server) = &global.server {
        document.set("libra_server", server.clone());
    } else if document.get("libra_server").is_none() {
        document.set("libra_server", ctx.client.config().server.clone());
    }
    if let Some(login) = &global.rhlogin {
        document.set("default_rhlogin", login.clone());
    }
    if global.insecure {
        document.set("insecure", "true");
    }
    if let Some(timeout) = global.timeout.filter(|secs| *secs > 0) {
        document.set("timeout", timeout.to_string());
    }

    if ctx.client.config().credentials.is_some() {
        let user = ctx.client.user().await?;
        println!("Authenticated as {}", user.login);
    }

    ctx.repository.save(&ctx.document).await?;
    println!("Saved configuration to {}", ctx.repository.path().display());
    Ok(())
}
