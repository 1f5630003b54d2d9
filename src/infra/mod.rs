pub mod digital_ocean;
pub mod machine_setup;
pub mod mock_cloud;
pub mod playbook;

use async_trait::async_trait;
use dosetup_schema::droplet::{Domain, DomainRecord, Droplet, DropletCreateRequest, Region, SshKey, SshKeyCreateRequest, Tag};
use dosetup_schema::DsResult;

/// The subset of the DigitalOcean API used to provision, register and destroy droplets.
#[async_trait]
pub trait CloudApi: Send + Sync {
    async fn list_ssh_keys(&self) -> DsResult<Vec<SshKey>>;
    async fn create_ssh_key(&self, request: &SshKeyCreateRequest) -> DsResult<SshKey>;
    async fn list_regions(&self) -> DsResult<Vec<Region>>;
    async fn create_droplet(&self, request: &DropletCreateRequest) -> DsResult<Droplet>;
    async fn get_droplet(&self, id: u64) -> DsResult<Droplet>;
    async fn list_droplets_by_tag(&self, tag: &str) -> DsResult<Vec<Droplet>>;
    async fn destroy_droplet(&self, id: u64) -> DsResult<()>;
    async fn create_tag(&self, name: &str) -> DsResult<Tag>;
    async fn tag_droplet(&self, tag: &str, droplet_id: u64) -> DsResult<()>;
    async fn get_domain(&self, name: &str) -> DsResult<Domain>;
    async fn create_domain_record(&self, domain: &str, record: &DomainRecord) -> DsResult<DomainRecord>;
}
