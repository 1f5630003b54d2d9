//! Request and response bodies of the DigitalOcean v2 REST API, limited to the
//! fields the provisioning flow reads or sends.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DropletStatus {
    #[default]
    New,
    Active,
    Off,
    Archive,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub ip_address: String,
    #[serde(rename = "type")]
    pub network_type: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Networks {
    #[serde(default)]
    pub v4: Vec<Network>,
    #[serde(default)]
    pub v6: Vec<Network>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub sizes: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Droplet {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub memory: u64,
    #[serde(default)]
    pub vcpus: u64,
    #[serde(default)]
    pub disk: u64,
    #[serde(default)]
    pub status: DropletStatus,
    #[serde(default)]
    pub networks: Networks,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub size_slug: Option<String>,
}

impl Droplet {
    pub fn ip_address(&self) -> Option<String> {
        self.networks.v4.iter()
            .find(|n| n.network_type == "public")
            .map(|n| n.ip_address.clone())
    }

    pub fn is_new(&self) -> bool {
        self.status == DropletStatus::New
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropletCreateRequest {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: String,
    pub ssh_keys: Vec<u64>,
    pub backups: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshKey {
    pub id: u64,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshKeyCreateRequest {
    pub name: String,
    pub public_key: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResource {
    pub resource_id: String,
    pub resource_type: String,
}

impl TagResource {
    pub fn droplet(id: u64) -> Self {
        Self {
            resource_id: id.to_string(),
            resource_type: "droplet".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResourcesRequest {
    pub resources: Vec<TagResource>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    #[serde(default)]
    pub ttl: Option<u64>,
    #[serde(default)]
    pub zone_file: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl DomainRecord {
    pub fn a_record(name: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            id: None,
            record_type: "A".to_string(),
            name: name.into(),
            data: ip.into(),
            ttl: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Pages {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub pages: Option<Pages>,
}

impl Links {
    pub fn has_next(links: &Option<Links>) -> bool {
        links.as_ref()
            .and_then(|l| l.pages.as_ref())
            .and_then(|p| p.next.as_ref())
            .is_some()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DropletEnvelope {
    pub droplet: Droplet,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DropletsPage {
    #[serde(default)]
    pub droplets: Vec<Droplet>,
    #[serde(default)]
    pub links: Option<Links>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SshKeysPage {
    #[serde(default)]
    pub ssh_keys: Vec<SshKey>,
    #[serde(default)]
    pub links: Option<Links>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SshKeyEnvelope {
    pub ssh_key: SshKey,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegionsPage {
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub links: Option<Links>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TagEnvelope {
    pub tag: Tag,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DomainEnvelope {
    pub domain: Domain,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DomainRecordEnvelope {
    pub domain_record: DomainRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::easy_json::EasyJsonDeser;

    #[test]
    fn droplet_response_parses() {
        let body = r#"{
            "droplet": {
                "id": 3164444,
                "name": "example.com",
                "memory": 1024,
                "vcpus": 1,
                "disk": 25,
                "locked": false,
                "status": "active",
                "networks": {
                    "v4": [
                        {"ip_address": "10.128.192.124", "netmask": "255.255.0.0", "gateway": "nil", "type": "private"},
                        {"ip_address": "192.241.165.154", "netmask": "255.255.255.0", "gateway": "192.241.165.1", "type": "public"}
                    ],
                    "v6": []
                },
                "region": {"slug": "sfo2", "name": "San Francisco 2", "available": true, "sizes": ["s-1vcpu-1gb"]},
                "tags": ["web"]
            }
        }"#;
        let env = body.json_from::<DropletEnvelope>().unwrap();
        assert_eq!(env.droplet.status, DropletStatus::Active);
        assert_eq!(env.droplet.ip_address().as_deref(), Some("192.241.165.154"));
        assert_eq!(env.droplet.region.unwrap().slug, "sfo2");
    }

    #[test]
    fn unknown_status_is_tolerated() {
        let body = r#"{"id": 1, "name": "x", "status": "migrating"}"#;
        let d = body.json_from::<Droplet>().unwrap();
        assert_eq!(d.status, DropletStatus::Unknown);
        assert!(!d.is_new());
        assert_eq!(d.ip_address(), None);
    }

    #[test]
    fn a_record_serializes_type_field() {
        let r = DomainRecord::a_record("factorio-x1y2z.net", "1.2.3.4");
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["type"], "A");
        assert!(v.get("id").is_none());
    }
}
