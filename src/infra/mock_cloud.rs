use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use dosetup_schema::droplet::{Domain, DomainRecord, Droplet, DropletCreateRequest, DropletStatus, Network, Networks, Region, SshKey, SshKeyCreateRequest, Tag};
use dosetup_schema::errors::ToErrorInfo;
use dosetup_schema::{DsResult, ErrorCode};

use crate::infra::CloudApi;

#[derive(Debug, Default)]
pub struct MockCloudState {
    pub next_id: u64,
    pub droplets: BTreeMap<u64, Droplet>,
    // Remaining loads before a droplet leaves the `new` status
    pub pending_loads: BTreeMap<u64, usize>,
    pub create_requests: Vec<DropletCreateRequest>,
    pub loads: usize,
    pub ssh_keys: Vec<SshKey>,
    pub regions: Vec<Region>,
    pub tags: Vec<String>,
    pub domains: Vec<String>,
    pub records: Vec<(String, DomainRecord)>,
    pub destroyed: Vec<u64>,
}

/// In-memory stand-in for the DigitalOcean API. Clones share state.
#[derive(Clone, Debug)]
pub struct MockCloudApi {
    state: Arc<Mutex<MockCloudState>>,
    pub loads_until_active: usize,
}

impl MockCloudApi {
    pub fn new() -> Self {
        let state = MockCloudState {
            next_id: 1000,
            regions: vec![Region {
                slug: "sfo2".to_string(),
                name: "San Francisco 2".to_string(),
                available: true,
                sizes: vec!["512mb".to_string()],
            }],
            ssh_keys: vec![SshKey {
                id: 512190,
                fingerprint: "3b:16:bf:e4:8b:00:8b:b8:59:8c:a9:d3:f0:19:45:fa".to_string(),
                public_key: "ssh-rsa AAAA operator".to_string(),
                name: "operator".to_string(),
            }],
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            loads_until_active: 2,
        }
    }

    pub fn with_domain(self, domain: impl Into<String>) -> Self {
        self.state().domains.push(domain.into());
        self
    }

    pub fn with_loads_until_active(mut self, loads: usize) -> Self {
        self.loads_until_active = loads;
        self
    }

    pub fn with_droplet(self, id: u64, name: impl Into<String>, tags: Vec<&str>) -> Self {
        let droplet = Droplet {
            id,
            name: name.into(),
            memory: 512,
            vcpus: 1,
            disk: 20,
            status: DropletStatus::Active,
            networks: Self::public_network(id),
            tags: tags.into_iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };
        self.state().droplets.insert(id, droplet);
        self
    }

    pub fn state(&self) -> MutexGuard<'_, MockCloudState> {
        match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn public_network(id: u64) -> Networks {
        Networks {
            v4: vec![Network {
                ip_address: format!("203.0.113.{}", id % 250),
                network_type: "public".to_string(),
            }],
            v6: vec![],
        }
    }

    fn not_found<T>(what: String) -> DsResult<T> {
        format!("DigitalOcean GET {} returned 404 Not Found", what).to_error_code(ErrorCode::ApiResponseFailure)
    }
}

impl Default for MockCloudApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CloudApi for MockCloudApi {
    async fn list_ssh_keys(&self) -> DsResult<Vec<SshKey>> {
        Ok(self.state().ssh_keys.clone())
    }

    async fn create_ssh_key(&self, request: &SshKeyCreateRequest) -> DsResult<SshKey> {
        let mut state = self.state();
        state.next_id += 1;
        let key = SshKey {
            id: state.next_id,
            fingerprint: format!("fp:{}", state.next_id),
            public_key: request.public_key.clone(),
            name: request.name.clone(),
        };
        state.ssh_keys.push(key.clone());
        Ok(key)
    }

    async fn list_regions(&self) -> DsResult<Vec<Region>> {
        Ok(self.state().regions.clone())
    }

    async fn create_droplet(&self, request: &DropletCreateRequest) -> DsResult<Droplet> {
        let mut state = self.state();
        state.next_id += 1;
        let id = state.next_id;
        let droplet = Droplet {
            id,
            name: request.name.clone(),
            memory: 512,
            vcpus: 1,
            disk: 20,
            status: DropletStatus::New,
            tags: request.tags.clone(),
            size_slug: Some(request.size.clone()),
            ..Default::default()
        };
        state.create_requests.push(request.clone());
        state.pending_loads.insert(id, self.loads_until_active);
        state.droplets.insert(id, droplet.clone());
        Ok(droplet)
    }

    async fn get_droplet(&self, id: u64) -> DsResult<Droplet> {
        let mut state = self.state();
        state.loads += 1;
        let remaining = state.pending_loads.get(&id).cloned().unwrap_or(0);
        if remaining > 0 {
            state.pending_loads.insert(id, remaining - 1);
        }
        let droplet = match state.droplets.get_mut(&id) {
            Some(d) => d,
            None => return Self::not_found(format!("droplets/{}", id)),
        };
        if remaining <= 1 && droplet.status == DropletStatus::New {
            droplet.status = DropletStatus::Active;
            droplet.networks = Self::public_network(id);
        }
        Ok(droplet.clone())
    }

    async fn list_droplets_by_tag(&self, tag: &str) -> DsResult<Vec<Droplet>> {
        Ok(self.state().droplets.values()
            .filter(|d| d.tags.iter().any(|t| t == tag))
            .cloned()
            .collect())
    }

    async fn destroy_droplet(&self, id: u64) -> DsResult<()> {
        let mut state = self.state();
        if state.droplets.remove(&id).is_none() {
            return Self::not_found(format!("droplets/{}", id));
        }
        state.destroyed.push(id);
        Ok(())
    }

    async fn create_tag(&self, name: &str) -> DsResult<Tag> {
        let mut state = self.state();
        if !state.tags.iter().any(|t| t == name) {
            state.tags.push(name.to_string());
        }
        Ok(Tag { name: name.to_string() })
    }

    async fn tag_droplet(&self, tag: &str, droplet_id: u64) -> DsResult<()> {
        let mut state = self.state();
        if !state.tags.iter().any(|t| t == tag) {
            return Self::not_found(format!("tags/{}", tag));
        }
        match state.droplets.get_mut(&droplet_id) {
            Some(d) => {
                d.tags.push(tag.to_string());
                Ok(())
            }
            None => Self::not_found(format!("droplets/{}", droplet_id)),
        }
    }

    async fn get_domain(&self, name: &str) -> DsResult<Domain> {
        if self.state().domains.iter().any(|d| d == name) {
            Ok(Domain { name: name.to_string(), ttl: Some(1800), zone_file: None })
        } else {
            Self::not_found(format!("domains/{}", name))
        }
    }

    async fn create_domain_record(&self, domain: &str, record: &DomainRecord) -> DsResult<DomainRecord> {
        let mut state = self.state();
        if !state.domains.iter().any(|d| d == domain) {
            return Self::not_found(format!("domains/{}", domain));
        }
        state.next_id += 1;
        let mut created = record.clone();
        created.id = Some(state.next_id);
        state.records.push((domain.to_string(), created.clone()));
        Ok(created)
    }
}
