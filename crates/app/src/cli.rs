//! Command-line definition

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command-line client for the OpenShift broker.
#[derive(Debug, Parser)]
#[command(name = "rhc", version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options accepted by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Broker host name, or the full URL of the API root
    #[arg(long, global = true, env = "LIBRA_SERVER")]
    pub server: Option<String>,

    /// OpenShift login
    #[arg(short = 'l', long, global = true)]
    pub rhlogin: Option<String>,

    /// Password for the login
    #[arg(short = 'p', long, global = true, env = "RHC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Authorization token used instead of a password
    #[arg(long, global = true, env = "RHC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Do not verify the server's TLS certificate
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Seconds to wait for each broker request
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Configuration file to use instead of ~/.openshift/express.conf
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print debug output
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// ssh executable used for remote commands (defaults to `ssh`)
    #[arg(long, global = true, env = "RHC_SSH", value_name = "PATH")]
    pub ssh: Option<String>,
}

impl GlobalArgs {
    /// The ssh executable to run.
    #[must_use]
    pub fn ssh_program(&self) -> &str {
        self.ssh.as_deref().unwrap_or("ssh")
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the account you are logged in as
    Account,

    /// Check that the broker is reachable and show its API versions
    Server,

    /// Save the server and login options to the configuration file
    Setup,

    /// Create, show, rename and delete domains
    #[command(subcommand)]
    Domain(DomainCommand),

    /// Create and manage applications
    #[command(subcommand)]
    App(AppCommand),

    /// Add, remove and control cartridges
    #[command(subcommand)]
    Cartridge(CartridgeCommand),

    /// Manage application environment variables
    #[command(subcommand)]
    Env(EnvCommand),

    /// Manage the SSH keys registered with your account
    #[command(subcommand)]
    Sshkey(SshkeyCommand),

    /// List and activate application deployments
    #[command(subcommand)]
    Deployment(DeploymentCommand),

    /// Open a shell on an application, or run a command on all its gears
    Ssh(SshArgs),

    /// Clone an application's git repository
    GitClone {
        #[command(flatten)]
        target: AppArgs,

        /// Directory to clone into (defaults to the application name)
        directory: Option<PathBuf>,
    },

    /// Save or restore an application snapshot
    #[command(subcommand)]
    Snapshot(SnapshotCommand),

    /// Follow an application's log files
    Tail {
        #[command(flatten)]
        target: AppArgs,

        /// Files to follow
        #[arg(short = 'f', long, default_value = "*/log*/*")]
        files: String,

        /// Extra options for tail
        #[arg(short = 'o', long)]
        opts: Option<String>,
    },

    /// Forward an application's remote ports to this machine
    PortForward(AppArgs),
}

/// An application, optionally qualified by its domain.
#[derive(Debug, Clone, Args)]
pub struct AppArgs {
    /// Application name
    pub app: String,

    /// Domain of the application (defaults to your only domain)
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,
}

/// An application selected with `-a`.
#[derive(Debug, Clone, Args)]
pub struct AppOption {
    /// Application name
    #[arg(short = 'a', long)]
    pub app: String,

    /// Domain of the application (defaults to your only domain)
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum DomainCommand {
    /// Create a domain
    Create {
        /// Namespace for the new domain
        namespace: String,
    },
    /// Show a domain and its applications
    Show {
        /// Namespace (defaults to your only domain)
        namespace: Option<String>,
    },
    /// List your domains
    List,
    /// Rename a domain
    Update {
        /// Current namespace
        old: String,
        /// New namespace
        new: String,
    },
    /// Delete a domain
    Delete {
        /// Namespace to delete
        namespace: String,
        /// Also delete every application in the domain
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum AppCommand {
    /// Create an application
    Create {
        /// Application name
        app: String,

        /// Cartridges to install, web framework first
        #[arg(required = true)]
        cartridges: Vec<String>,

        /// Domain to create the application in
        #[arg(short = 'n', long)]
        namespace: Option<String>,

        /// Make the application scalable
        #[arg(short = 's', long)]
        scaling: bool,

        /// Gear size
        #[arg(short = 'g', long)]
        gear_size: Option<String>,

        /// Git repository to seed the application from
        #[arg(long)]
        from_code: Option<String>,
    },
    /// Show an application
    Show {
        #[command(flatten)]
        target: AppArgs,

        /// Show the gears of the application
        #[arg(long)]
        gears: bool,
    },
    /// List applications in a domain
    List {
        /// Domain (defaults to your only domain)
        #[arg(short = 'n', long)]
        namespace: Option<String>,
    },
    /// Delete an application
    Delete(AppArgs),
    /// Start an application
    Start(AppArgs),
    /// Stop an application
    Stop(AppArgs),
    /// Kill every process of an application
    ForceStop(AppArgs),
    /// Restart an application
    Restart(AppArgs),
    /// Reload an application's configuration
    Reload(AppArgs),
    /// Clean up an application's logs and temporary files
    Tidy(AppArgs),
}

/// A cartridge of an application.
#[derive(Debug, Clone, Args)]
pub struct CartridgeArgs {
    /// Cartridge name
    pub cartridge: String,

    #[command(flatten)]
    pub target: AppOption,
}

#[derive(Debug, Subcommand)]
pub enum CartridgeCommand {
    /// List the cartridges the broker offers
    List,
    /// Add a cartridge to an application
    Add(CartridgeArgs),
    /// Remove a cartridge from an application
    Remove(CartridgeArgs),
    /// Start a cartridge
    Start(CartridgeArgs),
    /// Stop a cartridge
    Stop(CartridgeArgs),
    /// Restart a cartridge
    Restart(CartridgeArgs),
    /// Reload a cartridge's configuration
    Reload(CartridgeArgs),
    /// Show a cartridge's status
    Status(CartridgeArgs),
    /// Set the scaling bounds of a cartridge
    Scale {
        #[command(flatten)]
        cartridge: CartridgeArgs,

        /// Minimum number of gears
        #[arg(long)]
        min: Option<i64>,

        /// Maximum number of gears (-1 for unlimited)
        #[arg(long, allow_hyphen_values = true)]
        max: Option<i64>,
    },
}

#[derive(Debug, Subcommand)]
pub enum EnvCommand {
    /// Set variables given as NAME=VALUE
    Set {
        /// Variables to set
        #[arg(required = true, value_name = "NAME=VALUE")]
        variables: Vec<String>,

        #[command(flatten)]
        target: AppOption,
    },
    /// Remove variables
    Unset {
        /// Names to remove
        #[arg(required = true)]
        names: Vec<String>,

        #[command(flatten)]
        target: AppOption,
    },
    /// List an application's variables
    List(AppOption),
}

#[derive(Debug, Subcommand)]
pub enum SshkeyCommand {
    /// List your SSH keys
    List,
    /// Show one key
    Show {
        /// Key name
        name: String,
    },
    /// Upload a public key
    Add {
        /// Key name
        name: String,
        /// Public key file
        path: PathBuf,
    },
    /// Remove a key
    Remove {
        /// Key name
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum DeploymentCommand {
    /// List an application's deployments
    List(AppOption),
    /// Roll an application back to a deployment
    Activate {
        /// Deployment id
        id: String,

        #[command(flatten)]
        target: AppOption,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SshArgs {
    #[command(flatten)]
    pub target: AppArgs,

    /// Run the command on every gear of the application
    #[arg(long)]
    pub gears: bool,

    /// Maximum number of gears to run on at once
    #[arg(long, default_value_t = 5)]
    pub limit: usize,

    /// Prefix every output line with the gear label
    #[arg(long, conflicts_with = "raw")]
    pub always_prefix: bool,

    /// Print gear output without labels
    #[arg(long)]
    pub raw: bool,

    /// Command to run
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum SnapshotCommand {
    /// Download a snapshot of an application
    Save {
        #[command(flatten)]
        target: AppArgs,

        /// Archive to write (defaults to <app>.tar.gz)
        #[arg(long)]
        filepath: Option<PathBuf>,
    },
    /// Restore an application from a snapshot
    Restore {
        #[command(flatten)]
        target: AppArgs,

        /// Archive to upload (defaults to <app>.tar.gz)
        #[arg(long)]
        filepath: Option<PathBuf>,
    },
}
