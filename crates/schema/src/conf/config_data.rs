use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com/v2";
pub const DEFAULT_REGISTRY_PATH: &str = "servers.json";

#[derive(Clone, Serialize, Deserialize, Debug, Eq, PartialEq)]
#[serde(default)] // This allows fields to be omitted in TOML
pub struct ConfigData {
    pub api_url: String,
    pub region: String,
    pub image: String,
    pub size: String,
    // Machine names are `{name_prefix}-{random suffix}`
    pub name_prefix: String,
    pub tag: String,
    // Base domain used when --domain is absent, prompts if both are missing
    pub domain: Option<String>,
    pub poll_interval_secs: u64,
    pub registry_path: String,
    pub playbook_command: String,
    pub private_key_path: String,
    pub setup_playbook: String,
    pub save_playbook: String,
    pub handoff_delay_secs: u64,
    pub log_level: String,
    pub ssh_key_name: String,
    pub http_timeout_secs: u64,
}

impl Default for ConfigData {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            region: "sfo2".to_string(),
            image: "docker-16-04".to_string(),
            size: "512mb".to_string(),
            name_prefix: "factorio".to_string(),
            tag: "factorio".to_string(),
            domain: None,
            poll_interval_secs: 6,
            registry_path: DEFAULT_REGISTRY_PATH.to_string(),
            playbook_command: "ansible-playbook".to_string(),
            private_key_path: "~/.ssh/id_rsa".to_string(),
            setup_playbook: "setup-factorio.yml".to_string(),
            save_playbook: "save-factorio.yml".to_string(),
            handoff_delay_secs: 15,
            log_level: "INFO".to_string(),
            ssh_key_name: "machine-name".to_string(),
            http_timeout_secs: 60,
        }
    }
}

impl ConfigData {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn handoff_delay(&self) -> Duration {
        Duration::from_secs(self.handoff_delay_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
