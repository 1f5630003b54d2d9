use std::path::Path;

use tracing::info;

use dosetup_schema::conf::config_data::ConfigData;
use dosetup_schema::droplet::{DomainRecord, Droplet, DropletCreateRequest, SshKey, SshKeyCreateRequest};
use dosetup_schema::errors::{EnhanceErrorInfo, ToErrorInfo};
use dosetup_schema::util::naming;
use dosetup_schema::{DsResult, ErrorCode, ErrorInfoContext, SafeOption};

use crate::infra::CloudApi;

/// Drives the droplet lifecycle against a cloud API for one base domain.
pub struct MachineSetup<C: CloudApi> {
    pub api: C,
    pub domain: String,
    pub config: ConfigData,
}

impl<C: CloudApi> MachineSetup<C> {
    pub fn new(api: C, domain: impl Into<String>, config: ConfigData) -> Self {
        Self {
            api,
            domain: domain.into(),
            config,
        }
    }

    pub fn create_domain_name(&self, name: &str) -> String {
        naming::create_domain_name(name, &self.domain)
    }

    /// Fails unless the configured region exists and is accepting new droplets.
    pub async fn check_region(&self) -> DsResult<()> {
        let regions = self.api.list_regions().await?;
        let found = regions.iter().find(|r| r.slug == self.config.region);
        match found {
            Some(r) if r.available => Ok(()),
            Some(_) => format!("Region {} is not available", self.config.region)
                .to_error_code(ErrorCode::InvalidRegion),
            None => format!("Unknown region {}", self.config.region)
                .to_error_code::<()>(ErrorCode::InvalidRegion)
                .with_detail("known", regions.iter().map(|r| r.slug.clone()).collect::<Vec<_>>().join(",")),
        }
    }

    /// Uploads a local public key, reusing an existing account key with the same contents.
    pub async fn add_local_ssh_key(&self, path: impl AsRef<Path>) -> DsResult<SshKey> {
        let path = path.as_ref();
        let public_key = std::fs::read_to_string(path)
            .error_info("Failed to read public key")
            .add(path.to_string_lossy().to_string())?
            .trim()
            .to_string();
        let existing = self.api.list_ssh_keys().await?;
        if let Some(k) = existing.into_iter().find(|k| k.public_key.trim() == public_key) {
            info!("SSH key {} already present on account", k.name);
            return Ok(k);
        }
        let request = SshKeyCreateRequest {
            name: self.config.ssh_key_name.clone(),
            public_key,
        };
        let key = self.api.create_ssh_key(&request).await?;
        info!("Uploaded SSH key {} id {}", key.name, key.id);
        Ok(key)
    }

    /// Creates the droplet, waits for it to leave `new` and applies the tag.
    pub async fn create_new_server(&self, name: &str, tag: Option<&str>) -> DsResult<Droplet> {
        let ssh_keys = self.api.list_ssh_keys().await?
            .iter()
            .map(|k| k.id)
            .collect::<Vec<u64>>();
        let request = DropletCreateRequest {
            name: self.create_domain_name(name),
            region: self.config.region.clone(),
            size: self.config.size.clone(),
            image: self.config.image.clone(),
            ssh_keys,
            backups: false,
            tags: vec![],
        };
        info!("Creating droplet {} in {} with {} ssh keys", request.name, request.region, request.ssh_keys.len());
        let created = self.api.create_droplet(&request).await?;
        let mut droplet = self.api.get_droplet(created.id).await?;
        while droplet.is_new() {
            info!("Droplet {} status {}, waiting", droplet.id, droplet.status);
            tokio::time::sleep(self.config.poll_interval()).await;
            droplet = self.api.get_droplet(created.id).await?;
        }
        info!("Droplet {} status {}", droplet.id, droplet.status);
        if let Some(t) = tag {
            self.api.create_tag(t).await?;
            self.api.tag_droplet(t, droplet.id).await.add(t.to_string())?;
            info!("Tagged droplet {} with {}", droplet.id, t);
        }
        Ok(droplet)
    }

    /// Points `{name}.net.{domain}` at the droplet's public address.
    /// The droplet is reloaded in place so its networks are current.
    pub async fn setup_domain_for_droplet(&self, droplet: &mut Droplet, name: &str) -> DsResult<DomainRecord> {
        let domain = self.api.get_domain(&self.domain).await?;
        *droplet = self.api.get_droplet(droplet.id).await?;
        let ip = droplet.ip_address()
            .ok_msg("Droplet has no public IPv4 address")
            .with_detail("droplet_id", droplet.id.to_string())?;
        let record = DomainRecord::a_record(naming::dns_record_name(name), ip);
        let created = self.api.create_domain_record(&domain.name, &record).await?;
        info!("Created A record {} -> {} on {}", created.name, created.data, domain.name);
        Ok(created)
    }

    pub async fn destroy_machines_by_tag(&self, tag: &str) -> DsResult<Vec<Droplet>> {
        if tag.trim().is_empty() {
            return "Empty tag, refusing to destroy by tag".to_error_code(ErrorCode::MissingArguments);
        }
        let droplets = self.api.list_droplets_by_tag(tag).await?;
        if droplets.is_empty() {
            info!("No droplets tagged {}", tag);
        }
        for d in &droplets {
            info!("Destroying droplet {} ({})", d.name, d.id);
            self.api.destroy_droplet(d.id).await.add(d.name.clone())?;
        }
        Ok(droplets)
    }

    pub async fn destroy_machine_by_id(&self, id: u64) -> DsResult<Droplet> {
        let droplet = self.api.get_droplet(id).await?;
        info!("Destroying droplet {} ({})", droplet.name, droplet.id);
        self.api.destroy_droplet(id).await?;
        Ok(droplet)
    }
}

#[cfg(test)]
mod tests {
    use crate::infra::mock_cloud::MockCloudApi;

    use super::*;

    fn setup(api: MockCloudApi) -> MachineSetup<MockCloudApi> {
        let mut config = ConfigData::default();
        config.poll_interval_secs = 0;
        MachineSetup::new(api, "example.com", config)
    }

    #[tokio::test]
    async fn creates_polls_and_tags() {
        let api = MockCloudApi::new().with_loads_until_active(3);
        let s = setup(api.clone());
        let d = s.create_new_server("factorio-ab12c", Some("factorio")).await.unwrap();
        assert!(!d.is_new());

        let state = api.state();
        assert_eq!(state.loads, 3);
        let request = &state.create_requests[0];
        assert_eq!(request.name, "factorio-ab12c.net.example.com");
        assert_eq!(request.region, "sfo2");
        assert_eq!(request.image, "docker-16-04");
        assert_eq!(request.size, "512mb");
        assert_eq!(request.ssh_keys, vec![512190]);
        assert!(!request.backups);
        assert!(state.droplets[&d.id].tags.contains(&"factorio".to_string()));
    }

    #[tokio::test]
    async fn untagged_creation_skips_tagging() {
        let api = MockCloudApi::new().with_loads_until_active(1);
        let s = setup(api.clone());
        let d = s.create_new_server("factorio-zz", None).await.unwrap();
        assert!(api.state().tags.is_empty());
        assert!(api.state().droplets[&d.id].tags.is_empty());
    }

    #[tokio::test]
    async fn registers_a_record_for_public_ip() {
        let api = MockCloudApi::new().with_domain("example.com");
        let s = setup(api.clone());
        let mut d = s.create_new_server("factorio-ab12c", None).await.unwrap();
        let record = s.setup_domain_for_droplet(&mut d, "factorio-ab12c").await.unwrap();
        assert_eq!(record.record_type, "A");
        assert_eq!(record.name, "factorio-ab12c.net");
        assert_eq!(Some(record.data), d.ip_address());
    }

    #[tokio::test]
    async fn missing_domain_fails_registration() {
        let api = MockCloudApi::new();
        let s = setup(api.clone());
        let mut d = s.create_new_server("factorio-ab12c", None).await.unwrap();
        let e = s.setup_domain_for_droplet(&mut d, "factorio-ab12c").await.unwrap_err();
        assert_eq!(e.code, ErrorCode::ApiResponseFailure);
        assert!(api.state().records.is_empty());
    }

    #[tokio::test]
    async fn region_check() {
        let s = setup(MockCloudApi::new());
        s.check_region().await.unwrap();

        let mut bad = setup(MockCloudApi::new());
        bad.config.region = "atlantis1".to_string();
        assert_eq!(bad.check_region().await.unwrap_err().code, ErrorCode::InvalidRegion);
    }

    #[tokio::test]
    async fn destroys_only_tagged_droplets() {
        let api = MockCloudApi::new()
            .with_droplet(1, "a", vec!["factorio"])
            .with_droplet(2, "b", vec!["other"])
            .with_droplet(3, "c", vec!["factorio", "other"]);
        let s = setup(api.clone());
        let destroyed = s.destroy_machines_by_tag("factorio").await.unwrap();
        assert_eq!(destroyed.len(), 2);
        assert_eq!(api.state().destroyed, vec![1, 3]);
        assert!(api.state().droplets.contains_key(&2));
    }

    #[tokio::test]
    async fn blank_tag_destroys_nothing() {
        let api = MockCloudApi::new().with_droplet(1, "a", vec![""]);
        let s = setup(api.clone());
        assert_eq!(s.destroy_machines_by_tag(" ").await.unwrap_err().code, ErrorCode::MissingArguments);
        assert!(api.state().destroyed.is_empty());
    }

    #[tokio::test]
    async fn destroy_by_id() {
        let api = MockCloudApi::new().with_droplet(7, "factorio-x.net.example.com", vec![]);
        let s = setup(api.clone());
        let d = s.destroy_machine_by_id(7).await.unwrap();
        assert_eq!(d.name, "factorio-x.net.example.com");
        assert_eq!(api.state().destroyed, vec![7]);
        assert!(s.destroy_machine_by_id(7).await.is_err());
    }

    #[tokio::test]
    async fn uploads_new_key_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id_rsa.pub");
        std::fs::write(&path, "ssh-rsa BBBB me@host\n").unwrap();
        let api = MockCloudApi::new();
        let s = setup(api.clone());
        let first = s.add_local_ssh_key(&path).await.unwrap();
        let second = s.add_local_ssh_key(&path).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.name, "machine-name");
        assert_eq!(api.state().ssh_keys.len(), 2);
    }
}
