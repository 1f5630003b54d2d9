use serde::{Deserialize, Serialize};

use crate::droplet::Droplet;

/// Snapshot of a created droplet, as kept in the local registry file.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ServerRecord {
    pub id: u64,
    pub name: String,
    pub memory: u64,
    pub vcpus: u64,
    pub disk: u64,
    pub ip_address: Option<String>,
}

impl ServerRecord {
    pub fn from_droplet(droplet: &Droplet) -> Self {
        Self {
            id: droplet.id,
            name: droplet.name.clone(),
            memory: droplet.memory,
            vcpus: droplet.vcpus,
            disk: droplet.disk,
            ip_address: droplet.ip_address(),
        }
    }
}

impl From<&Droplet> for ServerRecord {
    fn from(value: &Droplet) -> Self {
        ServerRecord::from_droplet(value)
    }
}
