use clap::{Args, Parser, Subcommand};

/// Provision and tear down a DigitalOcean game server droplet.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct DsArgs {
    /// Load configs from a specified path in addition to the standard paths
    #[clap(short, long)]
    pub config_path: Option<String>,
    /// Log level for dosetup logs, i.e. DEBUG, INFO, WARN, ERROR, default INFO
    #[clap(long)]
    pub log_level: Option<String>,
    /// Path of the JSON file recording created servers, default servers.json
    #[clap(long)]
    pub registry_path: Option<String>,
    /// DigitalOcean API token, prompted for when absent
    #[clap(long, env = "DIGITALOCEAN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    #[clap(subcommand)]
    pub subcmd: DsSubcommand,
}

impl DsArgs {
    pub fn clear_sensitive(&self) -> Self {
        let mut c = self.clone();
        c.token = None;
        c
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum DsSubcommand {
    Create(CreateCli),
    Delete(DeleteCli),
}

/// Create a new droplet
#[derive(Args, Debug, Clone, Default)]
pub struct CreateCli {
    /// Base domain the DNS record is created under, prompted for when absent
    #[clap(long)]
    pub domain: Option<String>,
    /// Run the setup playbook against the new host instead of printing the command
    #[clap(long)]
    pub ansible: bool,
    /// Upload this public key to the account before creating the droplet
    #[clap(long)]
    pub ssh_public_key: Option<String>,
}

/// Delete a droplet
#[derive(Args, Debug, Clone, Default)]
pub struct DeleteCli {
    /// Destroy every droplet carrying this tag
    #[clap(long, conflicts_with = "list")]
    pub tag: Option<String>,
    /// Run the save playbook before destroying, only with --list
    #[clap(long)]
    pub save: bool,
    /// Destroy the single droplet recorded in the registry file
    #[clap(long)]
    pub list: bool,
}
