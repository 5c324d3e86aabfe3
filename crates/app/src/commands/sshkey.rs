//! `rhc sshkey`

use anyhow::{Context as _, bail};
use rhc_domain::Key;

use super::print_messages;
use crate::cli::SshkeyCommand;
use crate::context::Context;

pub async fn run(ctx: &Context, command: SshkeyCommand) -> anyhow::Result<()> {
    match command {
        SshkeyCommand::List => {
            let keys = ctx.client.sshkeys().await?;
            if keys.is_empty() {
                println!("You have no SSH keys. Add one with 'rhc sshkey add <name> <file>'.");
            }
            for key in &keys {
                show(key);
            }
        }
        SshkeyCommand::Show { name } => {
            show(&ctx.client.find_key(&name).await?);
        }
        SshkeyCommand::Add { name, path } => {
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Unable to read {}", path.display()))?;
            let Some((kind, material)) = content
                .lines()
                .find(|line| !line.trim().is_empty())
                .and_then(Key::parse_public_key)
            else {
                bail!("{} is not a valid OpenSSH public key", path.display());
            };
            let key = ctx.client.add_key(&name, &kind, &material).await?;
            println!("Key {} added", key.name);
            show(&key);
        }
        SshkeyCommand::Remove { name } => {
            let key = ctx.client.find_key(&name).await?;
            let response = ctx.client.delete_key(&key).await?;
            print_messages(&response);
            println!("Key {name} removed");
        }
    }
    Ok(())
}

fn show(key: &Key) {
    println!(
        "{} ({}) {}",
        key.name,
        key.kind,
        key.fingerprint.as_deref().unwrap_or("invalid key")
    );
}
