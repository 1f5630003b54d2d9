use std::time::Duration;

use async_trait::async_trait;
use reqwest::{ClientBuilder, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use dosetup_schema::droplet::{ApiErrorBody, Domain, DomainEnvelope, DomainRecord, DomainRecordEnvelope, Droplet, DropletCreateRequest, DropletEnvelope, DropletsPage, Links, Region, RegionsPage, SshKey, SshKeyCreateRequest, SshKeyEnvelope, SshKeysPage, Tag, TagEnvelope, TagResource, TagResourcesRequest};
use dosetup_schema::errors::EnhanceErrorInfo;
use dosetup_schema::helpers::easy_json::EasyJsonDeser;
use dosetup_schema::{error_msg, DsResult, ErrorCode, ErrorInfoContext};

use crate::infra::CloudApi;

const PER_PAGE: &str = "200";

/// REST client for api.digitalocean.com, authenticated with a bearer token.
/// One pooled `reqwest::Client` serves every request, so polling reuses connections.
#[derive(Clone)]
pub struct DigitalOceanClient {
    pub url: String,
    pub timeout: Duration,
    client: reqwest::Client,
    token: String,
}

impl DigitalOceanClient {
    pub fn new(url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> DsResult<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .error_msg(ErrorCode::ApiRequestFailure, "Failed to build client")?;
        Ok(Self {
            url: url.into(),
            timeout,
            client,
            token: token.into(),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), endpoint)
    }

    async fn send<Req: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Req>,
    ) -> DsResult<(StatusCode, String)> {
        let url = self.endpoint_url(endpoint);
        debug!("DigitalOcean {} {}", method, url);
        let mut builder = self.client
            .request(method.clone(), url.clone())
            .bearer_auth(&self.token)
            .query(query);
        if let Some(b) = body {
            builder = builder.json(b);
        }
        let response = builder.send().await
            .error_msg(ErrorCode::ApiRequestFailure, "Failed to send request")
            .with_detail("method", method.to_string())
            .with_detail("url", url.clone())?;
        let status = response.status();
        let text = response.text().await
            .error_msg(ErrorCode::ApiRequestFailure, "Failed to get response text")
            .with_detail("url", url.clone())?;
        if !status.is_success() {
            let api_error = text.json_from::<ApiErrorBody>().unwrap_or_default();
            let lib_message = if api_error.message.is_empty() { text.clone() } else { api_error.message };
            return Err::<(StatusCode, String), _>(error_msg(
                ErrorCode::ApiResponseFailure,
                format!("DigitalOcean {} {} returned {}", method, endpoint, status),
                lib_message,
            )).with_detail("api_error_id", api_error.id);
        }
        Ok((status, text))
    }

    pub async fn json_get<Resp: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> DsResult<Resp> {
        let (_, text) = self.send::<()>(Method::GET, endpoint, query, None).await?;
        text.json_from::<Resp>().with_code(ErrorCode::ApiResponseFailure).add(endpoint.to_string())
    }

    pub async fn json_post<Req: Serialize + ?Sized, Resp: DeserializeOwned>(
        &self,
        endpoint: &str,
        r: &Req,
    ) -> DsResult<Resp> {
        let (_, text) = self.send(Method::POST, endpoint, &[], Some(r)).await?;
        text.json_from::<Resp>().with_code(ErrorCode::ApiResponseFailure).add(endpoint.to_string())
    }

    /// POST for endpoints answering 204 No Content.
    pub async fn post_no_content<Req: Serialize + ?Sized>(&self, endpoint: &str, r: &Req) -> DsResult<()> {
        self.send(Method::POST, endpoint, &[], Some(r)).await.map(|_| ())
    }

    pub async fn delete(&self, endpoint: &str) -> DsResult<()> {
        self.send::<()>(Method::DELETE, endpoint, &[], None).await.map(|_| ())
    }

    /// Collects every page of a list endpoint, following `links.pages.next`.
    async fn paginated<P, T, F>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        extract: F,
    ) -> DsResult<Vec<T>>
    where
        P: DeserializeOwned,
        F: Fn(P) -> (Vec<T>, Option<Links>),
    {
        let mut results = vec![];
        let mut page = 1;
        loop {
            let mut q = query.to_vec();
            q.push(("per_page", PER_PAGE.to_string()));
            q.push(("page", page.to_string()));
            let (items, links) = extract(self.json_get::<P>(endpoint, &q).await?);
            results.extend(items);
            if !Links::has_next(&links) {
                break;
            }
            page += 1;
        }
        Ok(results)
    }
}

#[async_trait]
impl CloudApi for DigitalOceanClient {
    async fn list_ssh_keys(&self) -> DsResult<Vec<SshKey>> {
        self.paginated("account/keys", &[], |p: SshKeysPage| (p.ssh_keys, p.links)).await
    }

    async fn create_ssh_key(&self, request: &SshKeyCreateRequest) -> DsResult<SshKey> {
        self.json_post::<_, SshKeyEnvelope>("account/keys", request).await.map(|e| e.ssh_key)
    }

    async fn list_regions(&self) -> DsResult<Vec<Region>> {
        self.paginated("regions", &[], |p: RegionsPage| (p.regions, p.links)).await
    }

    async fn create_droplet(&self, request: &DropletCreateRequest) -> DsResult<Droplet> {
        self.json_post::<_, DropletEnvelope>("droplets", request).await.map(|e| e.droplet)
    }

    async fn get_droplet(&self, id: u64) -> DsResult<Droplet> {
        self.json_get::<DropletEnvelope>(&format!("droplets/{}", id), &[]).await.map(|e| e.droplet)
    }

    async fn list_droplets_by_tag(&self, tag: &str) -> DsResult<Vec<Droplet>> {
        self.paginated(
            "droplets",
            &[("tag_name", tag.to_string())],
            |p: DropletsPage| (p.droplets, p.links),
        ).await
    }

    async fn destroy_droplet(&self, id: u64) -> DsResult<()> {
        self.delete(&format!("droplets/{}", id)).await
    }

    async fn create_tag(&self, name: &str) -> DsResult<Tag> {
        let tag = Tag { name: name.to_string() };
        self.json_post::<_, TagEnvelope>("tags", &tag).await.map(|e| e.tag)
    }

    async fn tag_droplet(&self, tag: &str, droplet_id: u64) -> DsResult<()> {
        let request = TagResourcesRequest {
            resources: vec![TagResource::droplet(droplet_id)],
        };
        self.post_no_content(&format!("tags/{}/resources", tag), &request).await
    }

    async fn get_domain(&self, name: &str) -> DsResult<Domain> {
        self.json_get::<DomainEnvelope>(&format!("domains/{}", name), &[]).await.map(|e| e.domain)
    }

    async fn create_domain_record(&self, domain: &str, record: &DomainRecord) -> DsResult<DomainRecord> {
        self.json_post::<_, DomainRecordEnvelope>(&format!("domains/{}/records", domain), record)
            .await
            .map(|e| e.domain_record)
    }
}
